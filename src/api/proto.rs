//! Hand-written protobuf messages for the Comic-Fuz API.
//!
//! The upstream schema is private; these definitions cover only the fields
//! this tool consumes. prost skips unknown fields on decode, so additions on
//! the server side are harmless. `serde::Serialize` on the viewer messages
//! feeds the human-readable `index.json` provenance file.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum DeviceType {
    Unspecified = 0,
    Ios = 1,
    Android = 2,
    Browser = 3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ImageQuality {
    Normal = 0,
    High = 1,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct DeviceInfo {
    #[prost(enumeration = "DeviceType", tag = "1")]
    pub device_type: i32,
}

/// The client identifies itself as a browser on every call, matching the
/// cookie-based web session this tool authenticates with.
pub fn browser_device() -> DeviceInfo {
    DeviceInfo {
        device_type: DeviceType::Browser as i32,
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SignInRequest {
    #[prost(message, optional, tag = "1")]
    pub device_info: Option<DeviceInfo>,
    #[prost(string, tag = "2")]
    pub email: String,
    #[prost(string, tag = "3")]
    pub password: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SignInResponse {
    #[prost(bool, tag = "1")]
    pub success: bool,
}

/// `/v1/web_mypage` takes an empty body; the response carries the account
/// mail address only when the session cookie is live.
#[derive(Clone, PartialEq, prost::Message)]
pub struct WebMypageResponse {
    #[prost(string, tag = "1")]
    pub mail_address: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct BookStorePageRequest {
    #[prost(message, optional, tag = "1")]
    pub device_info: Option<DeviceInfo>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct BookStorePageResponse {
    #[prost(message, optional, tag = "1")]
    pub info: Option<StoreInfo>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct StoreInfo {
    /// Shelf groups as laid out on the store page; the magazine listing this
    /// tool cares about is the first group.
    #[prost(message, repeated, tag = "3")]
    pub magazine_shelves: Vec<MagazineShelf>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct MagazineShelf {
    #[prost(message, repeated, tag = "1")]
    pub details: Vec<StoreIssueDetail>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct StoreIssueDetail {
    #[prost(uint32, tag = "1")]
    pub id: u32,
    #[prost(string, tag = "2")]
    pub magazine_name: String,
    #[prost(string, tag = "3")]
    pub update_date: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct MagazineViewer2Request {
    #[prost(message, optional, tag = "1")]
    pub device_info: Option<DeviceInfo>,
    #[prost(uint32, tag = "2")]
    pub magazine_issue_id: u32,
    #[prost(message, optional, tag = "3")]
    pub viewer_mode: Option<ViewerMode>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct ViewerMode {
    #[prost(enumeration = "ImageQuality", tag = "1")]
    pub image_quality: i32,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct MagazineViewer2Response {
    #[prost(message, optional, tag = "1")]
    pub magazine_issue: Option<MagazineIssue>,
    #[prost(message, repeated, tag = "3")]
    pub pages: Vec<ViewerPage>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct MagazineIssue {
    #[prost(uint32, tag = "1")]
    pub id: u32,
    #[prost(string, tag = "2")]
    pub magazine_name: String,
    #[prost(string, tag = "3")]
    pub magazine_issue_name: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct ViewerPage {
    #[prost(message, optional, tag = "1")]
    pub image: Option<PageImage>,
}

/// Everything needed to fetch and decrypt one page: the URL (relative to the
/// image host) and the hex-encoded AES key/IV pair.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct PageImage {
    #[prost(string, tag = "1")]
    pub image_url: String,
    #[prost(string, tag = "2")]
    pub encryption_key: String,
    #[prost(string, tag = "3")]
    pub iv: String,
}
