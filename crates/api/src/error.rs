//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DomainError;
use store::StoreError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// No identity on a request that needs one.
    Unauthenticated { login_url: String },
    /// A collaborator the request needs is not configured.
    Unavailable(String),
    /// Domain logic error.
    Domain(DomainError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, error_body(msg)),
            ApiError::Unauthenticated { login_url } => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({
                    "error": DomainError::Unauthenticated.to_string(),
                    "login_url": login_url,
                }),
            ),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, error_body(msg)),
            ApiError::Domain(err) => {
                let status = domain_error_status(&err);
                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    tracing::error!(error = %err, "internal server error");
                }
                (status, error_body(err.to_string()))
            }
        };

        metrics::counter!("shop_http_errors_total", "status" => status.as_str().to_owned())
            .increment(1);
        (status, axum::Json(body)).into_response()
    }
}

fn error_body(message: String) -> serde_json::Value {
    serde_json::json!({ "error": message })
}

fn domain_error_status(err: &DomainError) -> StatusCode {
    match err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Forbidden { .. } => StatusCode::FORBIDDEN,
        DomainError::Unauthenticated => StatusCode::UNAUTHORIZED,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::InvalidTransition { .. } => StatusCode::CONFLICT,
        DomainError::Store(StoreError::DuplicateSlug(_)) => StatusCode::CONFLICT,
        DomainError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

#[cfg(test)]
mod tests {
    use domain::ValidationError;

    use super::*;

    #[test]
    fn domain_errors_map_to_statuses() {
        let cases = [
            (
                DomainError::NotFound {
                    entity: "Item",
                    key: "x".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                DomainError::Forbidden { action: "x" },
                StatusCode::FORBIDDEN,
            ),
            (DomainError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (
                DomainError::Validation(ValidationError::InvalidQuantity(0)),
                StatusCode::BAD_REQUEST,
            ),
            (
                DomainError::InvalidTransition {
                    line: "x".to_string(),
                    reason: "y",
                },
                StatusCode::CONFLICT,
            ),
            (
                DomainError::Store(StoreError::DuplicateSlug("x".to_string())),
                StatusCode::CONFLICT,
            ),
            (
                DomainError::Store(StoreError::Corrupt("x".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(domain_error_status(&err), expected, "{err}");
        }
    }
}
