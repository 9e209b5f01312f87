use axum::{
    extract::{Request, State},
    http::HeaderName,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::models::error::ApiError;

pub static X_API_KEY: HeaderName = HeaderName::from_static("x-api-key");

/// Compares the `X-API-Key` header against the configured secret.
pub struct ApiKeyGate {
    secret: Option<String>,
}

impl ApiKeyGate {
    pub fn new(secret: Option<String>) -> Self {
        let secret = secret.filter(|s| !s.is_empty());
        if secret.is_none() {
            warn!("No API key configured; every guarded endpoint will answer 401");
        }
        Self { secret }
    }

    pub fn verify(&self, provided: Option<&str>) -> Result<(), ApiError> {
        let Some(secret) = self.secret.as_deref() else {
            return Err(ApiError::Unauthorized("API key not configured".to_string()));
        };

        match provided {
            Some(key) if bool::from(key.as_bytes().ct_eq(secret.as_bytes())) => Ok(()),
            Some(_) => Err(ApiError::Unauthorized("Invalid API key".to_string())),
            None => Err(ApiError::Unauthorized("Missing X-API-Key header".to_string())),
        }
    }
}

pub async fn require_api_key(
    State(gate): State<Arc<ApiKeyGate>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = req
        .headers()
        .get(&X_API_KEY)
        .and_then(|h| h.to_str().ok());

    gate.verify(provided)?;

    Ok(next.run(req).await)
}
