use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::{self, Debug};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

/// Flat view over error codes. Screens only ever distinguish these.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Network,
    Cancelled,
    Internal,
    InvalidState,
    InvalidInput,
    InvalidDistance,
    NotFound,
    PermissionDenied,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self.code {
            1 => ErrorKind::Configuration,
            3 | 4 => ErrorKind::Network,
            6 => ErrorKind::Cancelled,
            100 => ErrorKind::InvalidState,
            101 => ErrorKind::InvalidInput,
            102 => ErrorKind::InvalidDistance,
            103 => ErrorKind::NotFound,
            104 => ErrorKind::PermissionDenied,
            _ => ErrorKind::Internal,
        }
    }

    /// Transport failures and upstream 5xx/status errors are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Network
    }

    pub fn is_not_found_error(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_invalid_state_error(&self) -> bool {
        self.kind() == ErrorKind::InvalidState
    }

    pub fn configuration_error() -> Error {
        Error {
            code: 1,
            message: "configuration error".into(),
        }
    }

    pub fn reqwest_error(err: reqwest::Error) -> Error {
        tracing::debug!(?err, "reqwest error");

        Error {
            code: 3,
            message: "reqwest error".into(),
        }
    }

    pub fn upstream_error() -> Error {
        Error {
            code: 4,
            message: "upstream error".into(),
        }
    }

    pub fn unexpected_error() -> Error {
        Error {
            code: 5,
            message: "unexpected error".into(),
        }
    }

    pub fn cancelled_error() -> Error {
        Error {
            code: 6,
            message: "request cancelled".into(),
        }
    }

    pub fn invalid_state_error() -> Error {
        Error {
            code: 100,
            message: "invalid state".into(),
        }
    }

    pub fn invalid_input_error() -> Error {
        Error {
            code: 101,
            message: "invalid input".into(),
        }
    }

    pub fn invalid_distance_error() -> Error {
        Error {
            code: 102,
            message: "invalid distance".into(),
        }
    }

    pub fn not_found_error() -> Error {
        Error {
            code: 103,
            message: "not found".into(),
        }
    }

    pub fn permission_denied_error() -> Error {
        Error {
            code: 104,
            message: "permission denied".into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(_: env::VarError) -> Self {
        Error::configuration_error()
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::reqwest_error(err)
    }
}

impl From<futures::future::Aborted> for Error {
    fn from(_: futures::future::Aborted) -> Self {
        Error::cancelled_error()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            1..=99 => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            103 => (StatusCode::NOT_FOUND, self.message.as_str()),
            104 => (StatusCode::FORBIDDEN, self.message.as_str()),
            _ => (StatusCode::BAD_REQUEST, self.message.as_str()),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_to_kinds() {
        assert_eq!(Error::invalid_distance_error().kind(), ErrorKind::InvalidDistance);
        assert_eq!(Error::not_found_error().kind(), ErrorKind::NotFound);
        assert_eq!(Error::upstream_error().kind(), ErrorKind::Network);
        assert_eq!(Error::unexpected_error().kind(), ErrorKind::Internal);
    }

    #[test]
    fn only_network_errors_are_retryable() {
        assert!(Error::upstream_error().is_retryable());
        assert!(!Error::not_found_error().is_retryable());
        assert!(!Error::invalid_input_error().is_retryable());
        assert!(!Error::cancelled_error().is_retryable());
    }

    #[test]
    fn internal_errors_hide_their_message() {
        let response = Error::configuration_error().into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = Error::not_found_error().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = Error::invalid_state_error().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
