use std::error::Error as StdError;

use crate::domain::ValidationError;
use crate::transport::TransportError;

#[derive(Debug, thiserror::Error)]
/// Errors returned by every resource client.
///
/// The first five variants form a closed taxonomy derived from the HTTP
/// status of the response; [`NacError::Connection`] means the gateway could
/// not be reached at all (DNS, TLS, timeouts). Callers are expected to
/// branch on the variant, not on the message text.
pub enum NacError {
    /// Credentials missing, invalid or expired (HTTP 401/403).
    #[error("authentication failed (HTTP {status})")]
    Authentication { status: u16, body: Option<String> },

    /// The referenced resource does not exist server-side (HTTP 404).
    #[error("resource not found")]
    NotFound { body: Option<String> },

    /// Caller-supplied data failed validation, either locally before any
    /// request was sent, or because the server reported HTTP 422.
    #[error("invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// Remote system fault (HTTP 500 and above).
    #[error("service error (HTTP {status})")]
    Service { status: u16, body: Option<String> },

    /// Any other non-2xx response.
    #[error("API error (HTTP {status})")]
    Api { status: u16, body: Option<String> },

    /// The gateway could not be reached (DNS, TLS, timeout).
    #[error("gateway connection error: {0}")]
    Connection(#[source] Box<dyn StdError + Send + Sync>),
}

impl From<ValidationError> for NacError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidParameter {
            message: err.to_string(),
        }
    }
}

impl From<TransportError> for NacError {
    fn from(err: TransportError) -> Self {
        Self::InvalidParameter {
            message: err.to_string(),
        }
    }
}

fn non_empty(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Map an HTTP status to its error kind; `None` for 2xx.
///
/// This is the single point of translation from transport responses to the
/// error taxonomy; every resource client goes through it.
pub(crate) fn classify(status: u16, body: &str) -> Option<NacError> {
    match status {
        200..=299 => None,
        401 | 403 => Some(NacError::Authentication {
            status,
            body: non_empty(body),
        }),
        404 => Some(NacError::NotFound {
            body: non_empty(body),
        }),
        422 => Some(NacError::InvalidParameter {
            message: non_empty(body).unwrap_or_else(|| "unprocessable request".to_owned()),
        }),
        500.. => Some(NacError::Service {
            status,
            body: non_empty(body),
        }),
        _ => Some(NacError::Api {
            status,
            body: non_empty(body),
        }),
    }
}
