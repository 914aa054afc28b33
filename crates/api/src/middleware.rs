//! Bearer-token authentication middleware.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use tracing::debug;

use crate::app::AppState;
use crate::app::errors::unauthorized;
use crate::context::Identity;

/// Validate the `Authorization: Bearer <token>` header and inject the
/// request [`Identity`]. Rejects with a JSON 401 otherwise.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    let Some(token) = token else {
        return unauthorized("missing bearer token");
    };

    match state.validator.validate(token, Utc::now()) {
        Ok(claims) => {
            request.extensions_mut().insert(Identity::from_claims(claims));
            next.run(request).await
        }
        Err(e) => {
            debug!(error = %e, "token rejected");
            unauthorized(&e.to_string())
        }
    }
}
