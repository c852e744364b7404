//! Bearer-token middleware.
//!
//! Checks that an `Authorization: Bearer <token>` header is present and
//! well-formed before the handler runs. Token verification belongs to
//! whatever identity provider a deployment plugs in; this layer only
//! rejects requests that cannot possibly carry a credential.

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;

/// The accepted token, stashed in request extensions for downstream use.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

pub async fn require_bearer(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_owned();

    if header_value.is_empty() {
        return Err(ApiError::Unauthorized("Authorization header is required"));
    }

    let Some(token) = header_value.strip_prefix("Bearer ") else {
        return Err(ApiError::Unauthorized(
            "invalid authorization format, expected 'Bearer <token>'",
        ));
    };

    if token.is_empty() {
        return Err(ApiError::Unauthorized("bearer token cannot be empty"));
    }

    request.extensions_mut().insert(BearerToken(token.to_owned()));

    Ok(next.run(request).await)
}
