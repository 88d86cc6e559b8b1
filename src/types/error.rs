//! Error types for the pledge service

use hyper::StatusCode;

/// Main error type for pledge operations
#[derive(Debug, thiserror::Error)]
pub enum PledgeError {
    #[error("Missing fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Invalid {field}: {value}")]
    InvalidEnum {
        field: String,
        value: String,
        allowed: Vec<&'static str>,
    },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Method not supported: {0}")]
    MethodNotSupported(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PledgeError {
    /// Convert error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingFields(_) => StatusCode::BAD_REQUEST,
            Self::InvalidEnum { .. } => StatusCode::BAD_REQUEST,
            Self::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MethodNotSupported(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the caller can fix the request and resubmit
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            Self::MissingFields(_) | Self::InvalidEnum { .. } | Self::BadRequest(_)
        )
    }

    /// Build the JSON error body returned to callers.
    ///
    /// Server-side failures only carry diagnostic detail when `expose_detail`
    /// is set (dev mode); the full error is always logged by the caller.
    pub fn to_body(&self, expose_detail: bool) -> serde_json::Value {
        match self {
            Self::MissingFields(missing) => serde_json::json!({
                "error": self.to_string(),
                "details": { "missing": missing },
            }),
            Self::InvalidEnum {
                field,
                value,
                allowed,
            } => serde_json::json!({
                "error": self.to_string(),
                "details": { "field": field, "value": value, "allowed": allowed },
            }),
            Self::MethodNotSupported(_) => serde_json::json!({ "error": "Method Not Allowed" }),
            Self::BadRequest(message) => serde_json::json!({
                "error": "Bad Request",
                "details": message,
            }),
            Self::StoreUnavailable(_) | Self::Config(_) | Self::Internal(_) => {
                if expose_detail {
                    serde_json::json!({ "error": "Server error", "details": self.to_string() })
                } else {
                    serde_json::json!({ "error": "Server error" })
                }
            }
        }
    }
}

impl From<std::io::Error> for PledgeError {
    fn from(err: std::io::Error) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for PledgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::BadRequest(format!("JSON error: {}", err))
    }
}

impl From<hyper::Error> for PledgeError {
    fn from(err: hyper::Error) -> Self {
        Self::Internal(format!("HTTP error: {}", err))
    }
}

impl From<mongodb::error::Error> for PledgeError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

/// Result type alias for pledge operations
pub type Result<T> = std::result::Result<T, PledgeError>;
