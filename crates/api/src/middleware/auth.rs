//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use pulseboard_core::types::OwnerId;
use pulseboard_core::CoreError;

use crate::auth::jwt::{validate_token, JwtConfig};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated owner extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires the
/// owner tier:
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(owner_id = %auth.owner_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The owner identifier (from `claims.sub`).
    pub owner_id: OwnerId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::NotAuthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::NotAuthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let owner_id = authenticate_token(token, &state.config.jwt)?;
        Ok(AuthUser { owner_id })
    }
}

/// Validate a raw access token and return its owner identifier.
///
/// Shared by the header extractor above and the WebSocket upgrade handler,
/// which receives the token as a query parameter (browsers cannot set
/// headers on a WebSocket upgrade).
pub fn authenticate_token(token: &str, config: &JwtConfig) -> Result<OwnerId, AppError> {
    let claims = validate_token(token, config).map_err(|_| {
        AppError::Core(CoreError::NotAuthorized("Invalid or expired token".into()))
    })?;
    Ok(claims.sub)
}
