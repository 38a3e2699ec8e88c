//! HTTP client for the Comic-Fuz API.
//!
//! All API calls are protobuf bodies over POST. Authentication is a single
//! session cookie injected on every request once acquired; encrypted page
//! blobs are plain GETs against a separate image host.

pub mod error;
pub mod proto;

use std::time::Duration;

use prost::Message;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, USER_AGENT};
use reqwest::{Client, Proxy, Response};

use self::error::ApiError;

pub const DEFAULT_API_HOST: &str = "https://api.comic-fuz.com";
pub const DEFAULT_IMG_HOST: &str = "https://img.comic-fuz.com";

/// The site rejects non-browser user agents.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, Gecko) Chrome/126.0.0.0 Safari/537.36 Edg/126.0.0.0";

/// Cookie prefix the site expects in front of the session token.
const COOKIE_PREFIX: &str = "is_logged_in=true; fuz_session_key=";

pub struct FuzClient {
    http: Client,
    api_host: String,
    img_host: String,
    token: Option<String>,
}

impl std::fmt::Debug for FuzClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuzClient")
            .field("api_host", &self.api_host)
            .field("img_host", &self.img_host)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl FuzClient {
    /// Build a client with the fixed browser headers and an optional HTTP
    /// proxy (`host:port`, applied to both the API and the image host).
    pub fn new(api_host: &str, img_host: &str, proxy: Option<&str>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

        let mut builder = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60));
        if let Some(proxy) = proxy {
            builder = builder.proxy(Proxy::all(format!("http://{proxy}"))?);
        }

        Ok(Self {
            http: builder.build()?,
            api_host: api_host.trim_end_matches('/').to_string(),
            img_host: img_host.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// POST a raw protobuf body and return the response after a status check.
    /// Used directly where the caller needs response headers (sign-in).
    pub async fn post_raw(&self, path: &str, body: Vec<u8>) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.api_host, path);
        let mut request = self.http.post(&url).body(body);
        if let Some(token) = &self.token {
            request = request.header(COOKIE, format!("{COOKIE_PREFIX}{token}"));
        }

        tracing::debug!("POST {}", url);
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status {
                status: response.status().as_u16(),
                path: path.to_string(),
            });
        }
        Ok(response)
    }

    /// Encode a request message, POST it, and decode the typed response.
    pub async fn call<Req, Resp>(&self, path: &str, request: &Req) -> Result<Resp, ApiError>
    where
        Req: Message,
        Resp: Message + Default,
    {
        let response = self.post_raw(path, request.encode_to_vec()).await?;
        let body = response.bytes().await?;
        Resp::decode(body.as_ref()).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }

    /// Fetch one encrypted page blob from the image host.
    pub async fn get_image(&self, image_url: &str) -> Result<Vec<u8>, ApiError> {
        let url = format!("{}{}", self.img_host, image_url);
        tracing::debug!("GET {}", url);
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status {
                status: response.status().as_u16(),
                path: image_url.to_string(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_strips_trailing_slash_from_hosts() {
        let client = FuzClient::new("https://api.example.com/", "https://img.example.com/", None)
            .unwrap();
        assert_eq!(client.api_host, "https://api.example.com");
        assert_eq!(client.img_host, "https://img.example.com");
    }

    #[test]
    fn token_lifecycle() {
        let mut client =
            FuzClient::new(DEFAULT_API_HOST, DEFAULT_IMG_HOST, None).unwrap();
        assert!(!client.has_token());
        client.set_token("abc123".into());
        assert!(client.has_token());
        client.clear_token();
        assert!(!client.has_token());
    }

    #[test]
    fn debug_redacts_token() {
        let mut client =
            FuzClient::new(DEFAULT_API_HOST, DEFAULT_IMG_HOST, None).unwrap();
        client.set_token("secret-session-key".into());
        let printed = format!("{:?}", client);
        assert!(!printed.contains("secret-session-key"));
    }

    #[test]
    fn invalid_proxy_is_rejected() {
        assert!(FuzClient::new(DEFAULT_API_HOST, DEFAULT_IMG_HOST, Some("\u{0}bad")).is_err());
    }
}
