//! Session acquisition for the Comic-Fuz API.
//!
//! The flow mirrors the site's web login: try a token persisted from a
//! previous run and validate it against `/v1/web_mypage`; if that fails (or
//! no token store is configured) perform a fresh `/v1/sign_in` exchange and
//! pull the `fuz_session_key` cookie out of the response headers. The token
//! is replaced only by re-authentication — there is no refresh endpoint.

pub mod error;

use std::sync::LazyLock;

use prost::Message;
use regex::Regex;
use reqwest::header::{HeaderMap, SET_COOKIE};
use tokio::fs;

use crate::api::proto::{browser_device, SignInRequest, SignInResponse, WebMypageResponse};
use crate::api::{error::ApiError, FuzClient};
use crate::config::Config;

pub use self::error::AuthError;

/// Fixed pattern the session token is parsed out of `Set-Cookie` with.
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"fuz_session_key=(\w+)").expect("valid pattern"));

/// Obtain a working session and install it on the client.
///
/// One network round trip when a cached token validates, up to one more for
/// the sign-in exchange. A rejected sign-in is fatal.
pub async fn acquire(client: &mut FuzClient, config: &Config) -> Result<(), AuthError> {
    if let Some(stored) = read_stored_token(config).await? {
        client.set_token(stored);
        match validate(client).await? {
            Some(mail_address) => {
                tracing::info!("Logged in as {}", mail_address);
                return Ok(());
            }
            None => {
                tracing::info!("Stored session token is no longer valid, signing in again");
                client.clear_token();
            }
        }
    }

    let token = sign_in(client, config).await?;
    if let Some(path) = &config.token_file {
        fs::write(path, &token).await?;
        tracing::info!("Session token saved to {}", path.display());
    }
    client.set_token(token);
    Ok(())
}

/// Read the persisted token, if a store is configured and the file exists.
async fn read_stored_token(config: &Config) -> Result<Option<String>, AuthError> {
    let Some(path) = &config.token_file else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }
    let token = fs::read_to_string(path).await?.trim().to_string();
    Ok((!token.is_empty()).then_some(token))
}

/// Check the current token against the authenticated mypage endpoint.
/// Returns the account mail address when the session is live.
async fn validate(client: &FuzClient) -> Result<Option<String>, AuthError> {
    // The endpoint takes an empty body; an invalid session yields a response
    // with no mail address (or an error status), not a protocol failure.
    let response = match client.post_raw("/v1/web_mypage", Vec::new()).await {
        Ok(r) => r,
        Err(ApiError::Status { status, .. }) => {
            tracing::debug!("Session validation returned HTTP {}", status);
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    let body = response.bytes().await.map_err(ApiError::from)?;
    let mypage = WebMypageResponse::decode(body.as_ref()).map_err(|source| ApiError::Decode {
        path: "/v1/web_mypage".into(),
        source,
    })?;
    Ok((!mypage.mail_address.is_empty()).then_some(mypage.mail_address))
}

/// Perform the sign-in exchange and extract the session token from the
/// response's `Set-Cookie` headers.
async fn sign_in(client: &FuzClient, config: &Config) -> Result<String, AuthError> {
    let (email, password) = match (&config.email, &config.password) {
        (Some(e), Some(p)) => (e.clone(), p.clone()),
        _ => return Err(AuthError::MissingCredentials),
    };

    let request = SignInRequest {
        device_info: Some(browser_device()),
        email,
        password,
    };

    tracing::debug!("Signing in");
    let response = client
        .post_raw("/v1/sign_in", request.encode_to_vec())
        .await?;
    let headers = response.headers().clone();
    let body = response.bytes().await.map_err(ApiError::from)?;
    let decoded = SignInResponse::decode(body.as_ref()).map_err(|source| ApiError::Decode {
        path: "/v1/sign_in".into(),
        source,
    })?;

    if !decoded.success {
        return Err(AuthError::SignInRejected);
    }

    extract_session_token(&headers).ok_or(AuthError::TokenMissing)
}

fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    for value in headers.get_all(SET_COOKIE) {
        if let Ok(header) = value.to_str() {
            if let Some(captures) = TOKEN_PATTERN.captures(header) {
                return Some(captures[1].to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers_with(values: &[&str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for v in values {
            headers.append(SET_COOKIE, HeaderValue::from_str(v).unwrap());
        }
        headers
    }

    #[test]
    fn extracts_token_from_set_cookie() {
        let headers = headers_with(&[
            "is_logged_in=true; Path=/",
            "fuz_session_key=a1B2c3; Path=/; HttpOnly; Secure",
        ]);
        assert_eq!(extract_session_token(&headers).as_deref(), Some("a1B2c3"));
    }

    #[test]
    fn token_stops_at_cookie_attributes() {
        let headers = headers_with(&["fuz_session_key=abc123; Expires=Wed, 01 Jan 2031 00:00:00 GMT"]);
        assert_eq!(extract_session_token(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn no_token_in_unrelated_cookies() {
        let headers = headers_with(&["tracking=xyz; Path=/", "is_logged_in=true"]);
        assert!(extract_session_token(&headers).is_none());
    }

    #[tokio::test]
    async fn stored_token_absent_when_no_store_configured() {
        let config = crate::config::test_config(|c| c.token_file = None);
        assert!(read_stored_token(&config).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn stored_token_trimmed_and_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let token_path = dir.path().join("token.txt");
        std::fs::write(&token_path, "  sess_abc\n").unwrap();

        let config = crate::config::test_config(|c| c.token_file = Some(token_path));
        assert_eq!(
            read_stored_token(&config).await.unwrap().as_deref(),
            Some("sess_abc")
        );
    }

    #[tokio::test]
    async fn empty_token_file_treated_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let token_path = dir.path().join("token.txt");
        std::fs::write(&token_path, "\n").unwrap();

        let config = crate::config::test_config(|c| c.token_file = Some(token_path));
        assert!(read_stored_token(&config).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sign_in_without_credentials_fails_fast() {
        let client =
            FuzClient::new("http://127.0.0.1:1", "http://127.0.0.1:1", None).unwrap();
        let config = crate::config::test_config(|c| {
            c.email = None;
            c.password = None;
        });
        match sign_in(&client, &config).await {
            Err(AuthError::MissingCredentials) => {}
            other => panic!("expected MissingCredentials, got {:?}", other.map(|_| ())),
        }
    }
}
