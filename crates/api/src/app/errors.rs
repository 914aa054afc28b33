//! Error-to-response mapping. Every error body is `{"error": "..."}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use contaerp_core::DomainError;
use contaerp_store::StoreError;
use tracing::error;

pub struct ApiError(StoreError);

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(StoreError::Domain(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            StoreError::Domain(domain) => match domain {
                DomainError::Validation(_) | DomainError::InvalidId(_) => {
                    (StatusCode::BAD_REQUEST, domain.to_string())
                }
                DomainError::InvariantViolation(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, domain.to_string())
                }
                DomainError::NotFound => (StatusCode::NOT_FOUND, domain.to_string()),
                DomainError::Conflict(_) => (StatusCode::CONFLICT, domain.to_string()),
                // The middleware answers 401 for missing or invalid tokens;
                // by the time a handler raises this the caller is known.
                DomainError::Unauthorized => (StatusCode::FORBIDDEN, domain.to_string()),
            },
            StoreError::Database(e) => {
                error!(error = %e, "database failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
            }
            StoreError::Migration(e) => {
                error!(error = %e, "migration failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
            }
        };
        json_error(status, message)
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({ "error": message.into() })),
    )
        .into_response()
}

pub fn unauthorized(message: &str) -> Response {
    json_error(StatusCode::UNAUTHORIZED, message)
}

pub fn not_found() -> ApiError {
    ApiError(StoreError::Domain(DomainError::NotFound))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restricted_delete_maps_to_conflict() {
        let err = ApiError::from(DomainError::conflict(
            "account is referenced by financial documents",
        ));
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let err = ApiError::from(DomainError::validation("bank does not exist"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
