//! Session extractor
//!
//! Validates the bearer token and yields [`CurrentUser`] to any handler
//! that declares it as a parameter.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use shared::error::{AppError, ErrorCode};

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Reuse if something upstream already extracted it
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => JwtService::extract_from_header(header)
                .ok_or_else(|| AppError::new(ErrorCode::TokenInvalid))?,
            None => return Err(AppError::not_authenticated()),
        };

        match state.jwt_service.validate(token) {
            Ok(claims) => {
                let user = CurrentUser::try_from(claims).map_err(|e| {
                    AppError::with_message(
                        ErrorCode::TokenInvalid,
                        format!("malformed claims: {}", e),
                    )
                })?;
                parts.extensions.insert(user.clone());
                Ok(user)
            }
            Err(JwtError::Expired) => Err(AppError::new(ErrorCode::TokenExpired)),
            Err(e) => {
                tracing::warn!(error = %e, uri = %parts.uri, "Token validation failed");
                Err(AppError::new(ErrorCode::TokenInvalid))
            }
        }
    }
}
