//! User registration and profile endpoints

use axum::{extract::State, Extension, Json};

use crate::error::{ApiError, Result};
use crate::models::{RegisterUserRequest, RegisterUserResponse, UserProfileResponse};
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// POST /api/users/register
/// Creates a user profile and returns its API token
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<Json<RegisterUserResponse>> {
    let email = payload.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::BadRequest("A valid email is required".to_string()));
    }

    let profile = state
        .db
        .create_user_profile(email, payload.display_name.as_deref())
        .await?;

    tracing::info!("Registered user: {}", profile.id);

    Ok(Json(RegisterUserResponse {
        user_id: profile.id,
        token: profile.api_token,
    }))
}

/// GET /api/users/me
/// Returns the authenticated user's profile
pub async fn me(
    Extension(auth): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> Result<Json<UserProfileResponse>> {
    let profile = state
        .db
        .get_user_profile(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User profile not found".to_string()))?;

    Ok(Json(UserProfileResponse {
        user_id: profile.id,
        email: profile.email,
        display_name: profile.display_name,
        created_at: profile.created_at,
    }))
}
