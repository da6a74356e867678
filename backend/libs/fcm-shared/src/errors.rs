use thiserror::Error;

/// FCM Client Error Types
#[derive(Error, Debug)]
pub enum FcmError {
    #[error("Failed to load service account key: {0}")]
    CredentialsError(String),

    #[error("Failed to parse private key: {0}")]
    KeyParseError(String),

    #[error("Failed to encode JWT: {0}")]
    JwtEncodeError(String),

    #[error("Failed to get access token: {0}")]
    TokenError(String),

    #[error("Token request failed with status: {0}")]
    TokenRequestFailed(String),

    #[error("Failed to parse token response: {0}")]
    TokenParseError(String),

    #[error("FCM send request failed: {0}")]
    SendRequestError(String),

    #[error("Failed to parse FCM response: {0}")]
    ResponseParseError(String),

    /// Rejection reported by the provider; displays the provider's own message.
    #[error("{message}")]
    ApiError { status: u16, message: String },

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Internal error")]
    Internal,
}

impl FcmError {
    /// HTTP status returned by the provider, if the error came from an API response.
    pub fn provider_status(&self) -> Option<u16> {
        match self {
            FcmError::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
