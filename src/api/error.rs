use thiserror::Error;

use crate::auth::CredentialError;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Non-2xx response where a success was required, or an unclassified
    /// status.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Sign-in succeeded but no session token could be extracted from the
    /// response.
    #[error("Sign-in response carried no session token")]
    MissingToken,

    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Malformed request URL: {0}")]
    BadUrl(String),

    #[error("Decoding error: {0}")]
    Decoding(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Credential store error: {0}")]
    Credentials(#[from] CredentialError),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid carrying excessive data in errors
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn statuses_map_to_typed_variants() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, "nope"),
            ApiError::AccessDenied(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, "missing"),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, "upstream"),
            ApiError::ServerError(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::IM_A_TEAPOT, "short and stout"),
            ApiError::InvalidResponse(_)
        ));
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let body = "x".repeat(2000);
        let error = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        let message = error.to_string();
        assert!(message.contains("truncated"));
        assert!(message.len() < body.len());
    }
}
