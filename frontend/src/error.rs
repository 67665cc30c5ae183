use thiserror::Error;

pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// Reasons a login response could not be turned into a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("Invalid response format from server")]
    UnrecognizedShape,
    #[error("No token received from server")]
    EmptyToken,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network failure: {0}")]
    Network(String),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error(transparent)]
    Login(#[from] LoginError),
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    /// Builds a status error from a response body, falling back to
    /// `fallback` when the body carries no text.
    pub fn from_status(status: u16, body: &str, fallback: &str) -> Self {
        let trimmed = body.trim();
        let message = if trimmed.is_empty() {
            fallback.to_string()
        } else {
            trimmed.to_string()
        };
        ApiError::Status { status, message }
    }

    /// Text shown in the toast for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Decode(_) => LoginError::UnrecognizedShape.to_string(),
            ApiError::Login(err) => err.to_string(),
            ApiError::Validation(message) => message.clone(),
        }
    }
}
