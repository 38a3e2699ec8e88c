//! Issue resolution: fetch one issue's metadata and page descriptors, derive
//! the destination layout, and persist provenance before any page download.

use std::path::{Path, PathBuf};

use anyhow::Context;
use prost::Message;

use crate::api::error::ApiError;
use crate::api::proto::{
    browser_device, ImageQuality, MagazineViewer2Request, MagazineViewer2Response, ViewerMode,
};
use crate::api::FuzClient;

/// An issue ready to download: decoded response plus the display names the
/// destination paths are built from.
pub struct ResolvedIssue {
    pub magazine_name: String,
    pub issue_label: String,
    pub response: MagazineViewer2Response,
}

impl ResolvedIssue {
    /// `[<magazine>]<issue>` — the issue's directory (and zip stem).
    pub fn dir_name(&self) -> String {
        format!("[{}]{}", self.magazine_name, self.issue_label)
    }

    pub fn issue_dir(&self, output_root: &Path) -> PathBuf {
        output_root.join(&self.magazine_name).join(self.dir_name())
    }

    pub fn zip_path(&self, output_root: &Path) -> PathBuf {
        output_root
            .join(&self.magazine_name)
            .join(format!("{}.zip", self.dir_name()))
    }
}

/// Fetch metadata and the ordered page list for one issue id. Required
/// before any page can be downloaded; always requests HIGH image quality.
pub async fn resolve(client: &FuzClient, issue_id: u32) -> Result<ResolvedIssue, ApiError> {
    let request = MagazineViewer2Request {
        device_info: Some(browser_device()),
        magazine_issue_id: issue_id,
        viewer_mode: Some(ViewerMode {
            image_quality: ImageQuality::High as i32,
        }),
    };
    let response: MagazineViewer2Response =
        client.call("/v1/magazine_viewer_2", &request).await?;

    let issue = response.magazine_issue.clone().unwrap_or_default();
    Ok(ResolvedIssue {
        magazine_name: short_magazine_name(&issue.magazine_name).to_string(),
        issue_label: normalize_digits(&issue.magazine_issue_name),
        response,
    })
}

/// Write the raw viewer response (`index.protobuf`) and its JSON rendering
/// (`index.json`) into the issue directory as provenance, creating the
/// directory in the process.
pub async fn write_provenance(
    dir: &Path,
    response: &MagazineViewer2Response,
) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("could not create issue directory {}", dir.display()))?;
    tokio::fs::write(dir.join("index.protobuf"), response.encode_to_vec()).await?;
    let json = serde_json::to_string_pretty(response)?;
    tokio::fs::write(dir.join("index.json"), json).await?;
    Ok(())
}

/// Romanized aliases for the magazine family; unknown names pass through.
fn short_magazine_name(name: &str) -> &str {
    match name {
        "まんがタイムきらら" => "Kirara",
        "まんがタイムきららMAX" => "Max",
        "まんがタイムきららキャラット" => "Carat",
        "まんがタイムきららフォワード" => "Forward",
        other => other,
    }
}

/// Issue labels occasionally carry full-width digits; fold them to ASCII so
/// directory names sort and compare consistently.
fn normalize_digits(label: &str) -> String {
    label
        .chars()
        .map(|c| match c {
            '\u{FF10}'..='\u{FF19}' => {
                char::from_digit(c as u32 - 0xFF10, 10).unwrap_or(c)
            }
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::proto::{MagazineIssue, PageImage, ViewerPage};

    #[test]
    fn short_names_map_the_known_family() {
        assert_eq!(short_magazine_name("まんがタイムきらら"), "Kirara");
        assert_eq!(short_magazine_name("まんがタイムきららMAX"), "Max");
        assert_eq!(short_magazine_name("まんがタイムきららキャラット"), "Carat");
        assert_eq!(short_magazine_name("まんがタイムきららフォワード"), "Forward");
        assert_eq!(short_magazine_name("週刊なんとか"), "週刊なんとか");
    }

    #[test]
    fn fullwidth_digits_fold_to_ascii() {
        assert_eq!(normalize_digits("２０２４年９月号"), "2024年9月号");
        assert_eq!(normalize_digits("2024年9月号"), "2024年9月号");
        assert_eq!(normalize_digits(""), "");
    }

    fn resolved() -> ResolvedIssue {
        ResolvedIssue {
            magazine_name: "Max".into(),
            issue_label: "2024年9月号".into(),
            response: MagazineViewer2Response {
                magazine_issue: Some(MagazineIssue {
                    id: 4120,
                    magazine_name: "まんがタイムきららMAX".into(),
                    magazine_issue_name: "２０２４年９月号".into(),
                }),
                pages: vec![ViewerPage {
                    image: Some(PageImage {
                        image_url: "/m/0.jpg.enc?h=s".into(),
                        encryption_key: "00".repeat(16),
                        iv: "00".repeat(16),
                    }),
                }],
            },
        }
    }

    #[test]
    fn destination_layout_matches_contract() {
        let issue = resolved();
        let root = Path::new("/data/magazines");
        assert_eq!(
            issue.issue_dir(root),
            Path::new("/data/magazines/Max/[Max]2024年9月号")
        );
        assert_eq!(
            issue.zip_path(root),
            Path::new("/data/magazines/Max/[Max]2024年9月号.zip")
        );
    }

    #[tokio::test]
    async fn provenance_files_written_before_pages() {
        let dir = tempfile::tempdir().unwrap();
        let issue_dir = dir.path().join("Max").join("[Max]2024年9月号");
        let issue = resolved();

        write_provenance(&issue_dir, &issue.response).await.unwrap();

        let raw = std::fs::read(issue_dir.join("index.protobuf")).unwrap();
        let decoded = MagazineViewer2Response::decode(raw.as_ref()).unwrap();
        assert_eq!(decoded, issue.response);

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(issue_dir.join("index.json")).unwrap())
                .unwrap();
        assert_eq!(json["magazine_issue"]["id"], 4120);
        assert_eq!(json["pages"].as_array().unwrap().len(), 1);
    }
}
