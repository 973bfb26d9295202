//! Error taxonomy for the bounty board client
//!
//! Every failure surfaces as [`Error`]. HTTP statuses map 1:1 onto variants;
//! transport failures and undecodable bodies land in [`Error::Api`] so callers
//! have a single catch-all path. [`ParseError`] covers JSON that decoded fine
//! but does not satisfy the model contract.

use serde_json::Value;
use thiserror::Error;

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure while normalizing a JSON payload into a domain object
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{entity}: expected a JSON object")]
    NotAnObject { entity: &'static str },

    #[error("{entity}: expected a JSON array")]
    NotAnArray { entity: &'static str },

    #[error("{entity}: missing required field `{field}`")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("{entity}: field `{field}` has the wrong type (expected {expected})")]
    InvalidType {
        entity: &'static str,
        field: &'static str,
        expected: &'static str,
    },

    #[error("{entity}: field `{field}` has an invalid value: {reason}")]
    InvalidValue {
        entity: &'static str,
        field: &'static str,
        reason: String,
    },

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("unknown bounty status `{0}`")]
    UnknownStatus(String),
}

impl ParseError {
    /// Name of the offending field, when the failure is tied to one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ParseError::MissingField { field, .. }
            | ParseError::InvalidType { field, .. }
            | ParseError::InvalidValue { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Errors returned by the bounty board clients
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP 404
    #[error("Resource not found: {path}")]
    NotFound { path: String },

    /// HTTP 400
    #[error("Validation error: {body}")]
    Validation {
        body: String,
        response: Option<Value>,
    },

    /// HTTP 401
    #[error("Authentication required")]
    Authentication { response: Option<Value> },

    /// HTTP 429
    #[error("Rate limit exceeded")]
    RateLimit {
        retry_after: Option<u64>,
        response: Option<Value>,
    },

    /// HTTP 5xx
    #[error("Server error: {status_code}")]
    Server {
        status_code: u16,
        response: Option<Value>,
    },

    /// Any other failed exchange. `status_code` is 0 when no response arrived.
    #[error("{message}")]
    Api {
        message: String,
        status_code: u16,
        response: Option<Value>,
        #[source]
        source: Option<BoxError>,
    },

    /// The response decoded but did not match the expected shape
    #[error("Invalid response payload: {0}")]
    Parse(#[from] ParseError),

    /// Bounty creation needs an x402 payment header this client cannot sign
    #[error(
        "x402 payment signing required: sign the payment with an x402 library and send it in the X-Payment header"
    )]
    PaymentRequired,

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn transport(message: impl Into<String>, source: BoxError) -> Self {
        Error::Api {
            message: message.into(),
            status_code: 0,
            response: None,
            source: Some(source),
        }
    }

    /// Human-readable message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status tied to this error; `Some(0)` for transport failures
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::NotFound { .. } => Some(404),
            Error::Validation { .. } => Some(400),
            Error::Authentication { .. } => Some(401),
            Error::RateLimit { .. } => Some(429),
            Error::Server { status_code, .. } | Error::Api { status_code, .. } => {
                Some(*status_code)
            }
            Error::Parse(_) | Error::PaymentRequired | Error::Config(_) => None,
        }
    }

    /// Structured response body, if the server sent parseable JSON
    pub fn response(&self) -> Option<&Value> {
        match self {
            Error::Validation { response, .. }
            | Error::Authentication { response }
            | Error::RateLimit { response, .. }
            | Error::Server { response, .. }
            | Error::Api { response, .. } => response.as_ref(),
            _ => None,
        }
    }

    /// Seconds to wait before retrying, from the `Retry-After` header
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Error::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// True when the request never produced an HTTP response (timeout, DNS, refused)
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Api { status_code: 0, .. })
    }
}
