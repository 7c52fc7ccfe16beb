/// Errors surfaced by the remote trading service, classified by how the UI
/// reacts to them. Nothing here is retried automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Missing token, or the service rejected the one attached. Forces login.
    Unauthorized,
    /// Non-2xx response carrying a server-supplied message, shown verbatim.
    Rejected(String),
    /// Transport-level failure (fetch threw before a response arrived).
    Network(String),
    /// 2xx body missing expected fields. Surfaced like a rejection.
    Malformed(String),
}

impl ApiError {
    /// Text suitable for a user-facing notification or inline form error.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Unauthorized: No token found".to_string(),
            ApiError::Rejected(msg) => msg.clone(),
            ApiError::Network(_) => "Something went wrong. Please try again.".to_string(),
            ApiError::Malformed(_) => "Unexpected response from the server".to_string(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Unauthorized => write!(f, "Unauthorized"),
            ApiError::Rejected(msg) => write!(f, "Rejected: {}", msg),
            ApiError::Network(msg) => write!(f, "Network Error: {}", msg),
            ApiError::Malformed(msg) => write!(f, "Malformed Response: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = Result<T, ApiError>;
