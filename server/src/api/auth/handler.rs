//! Auth API Handlers

use axum::{Json, extract::State};
use serde::Serialize;
use validator::Validate;

use crate::auth::{self, CurrentUser};
use crate::core::ServerState;
use crate::db::models::{LoginRequest, RegisterRequest, User, UserPublic, UserRole};
use crate::db::repository::{RepoError, UserRepository};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};

/// Token plus the user it belongs to
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserPublic,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let role = payload.role.unwrap_or(UserRole::Customer);
    if role == UserRole::Admin {
        return Err(AppError::validation("admin accounts cannot be self-registered"));
    }

    let password_hash = auth::hash_password(&payload.password)?;
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .create(
            payload.email.to_lowercase(),
            payload.name,
            password_hash,
            role,
        )
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::new(ErrorCode::EmailExists),
            other => other.into(),
        })?;

    let token = state
        .jwt_service
        .issue(&user)
        .map_err(|e| AppError::internal(e.to_string()))?;

    tracing::info!(email = %user.email, role = ?user.role, "User registered");
    Ok(ok(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = UserRepository::new(state.db.clone());
    let user: User = repo
        .find_by_email(&payload.email.to_lowercase())
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !auth::verify_password(&payload.password, &user.password_hash) {
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .jwt_service
        .issue(&user)
        .map_err(|e| AppError::internal(e.to_string()))?;

    Ok(ok(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<UserPublic>>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    Ok(ok(user.into()))
}
