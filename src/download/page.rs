//! A single page's fetch → decrypt → write path.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::crypto;
use super::error::{PageError, PageOutcome};
use super::ordinal::{self, OrdinalError};
use crate::api::proto::PageImage;
use crate::api::FuzClient;

/// Encrypted page URLs look like `/<dir>/<token>.<ext>.enc?<query>`; the
/// token encodes the page ordinal, the extension survives decryption.
static FILENAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/([0-9a-zA-Z_-]+)\.(\w+)\.enc\?").expect("valid pattern"));

/// Derive the destination filename (`<3-digit ordinal>.<ext>`) from a page's
/// image URL. `None` when the URL does not carry a recognizable token (the
/// caller soft-skips); an invalid ordinal character propagates as an error.
pub(crate) fn page_filename(image_url: &str) -> Result<Option<String>, OrdinalError> {
    let Some(captures) = FILENAME_PATTERN.captures(image_url) else {
        return Ok(None);
    };
    let ordinal = ordinal::decode(&captures[1])?;
    Ok(Some(format!("{:03}.{}", ordinal, &captures[2])))
}

/// Fetch, decrypt, and persist one page.
///
/// Idempotent: with overwrite off, an existing destination file short-circuits
/// before any network traffic, so re-running a partially finished issue only
/// does the remaining work.
pub(crate) async fn download_page(
    client: &FuzClient,
    dir: &Path,
    image: &PageImage,
    overwrite: bool,
) -> Result<PageOutcome, PageError> {
    if image.image_url.is_empty() {
        return Ok(PageOutcome::MissingUrl);
    }
    let Some(filename) = page_filename(&image.image_url)? else {
        return Ok(PageOutcome::UnrecognizedUrl);
    };

    let dest = dir.join(&filename);
    if !overwrite && dest.exists() {
        return Ok(PageOutcome::AlreadyExists);
    }

    let encrypted = client.get_image(&image.image_url).await?;
    let decrypted = crypto::decrypt_page(&image.encryption_key, &image.iv, encrypted)?;
    tokio::fs::write(&dest, &decrypted).await?;
    tracing::debug!(path = %dest.display(), "page written");
    Ok(PageOutcome::Downloaded)
}
