use thiserror::Error;

/// Authentication failures. All of these are fatal: the process reports the
/// message and halts, there is no in-process retry.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no credentials configured; set USER_EMAIL and PASSWORD (or pass --email/--password)")]
    MissingCredentials,

    #[error("sign-in rejected; check that the email and password are correct")]
    SignInRejected,

    #[error("sign-in succeeded but no session token was present in the response headers")]
    TokenMissing,

    #[error(transparent)]
    Api(#[from] crate::api::error::ApiError),

    #[error("could not access token store: {0}")]
    TokenStore(#[from] std::io::Error),
}
