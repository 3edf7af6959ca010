use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::auth::extractors::AuthUser;
use crate::auth::password::hash_password;
use crate::error::AppError;
use crate::state::AppState;

use super::dto::{RegisterRequest, UserProfile};
use super::repo::User;
use super::validate::validate_registration;

pub fn routes() -> Router<AppState> {
    Router::new().route("/users", get(get_current_user).post(register))
}

/// GET /users returns the profile of the identity bound by the Basic
/// auth check; no further lookup.
#[instrument(skip_all)]
pub async fn get_current_user(AuthUser(user): AuthUser) -> Json<UserProfile> {
    Json(UserProfile {
        first_name: user.first_name,
        last_name: user.last_name,
        email_address: user.email_address,
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<StatusCode, AppError> {
    let errors = validate_registration(&state.db, &payload).await?;
    if !errors.is_empty() {
        warn!(count = errors.len(), "registration payload rejected");
        return Err(AppError::Validation(errors));
    }

    let password_hash = hash_password(payload.password.as_deref().unwrap_or_default())?;

    // Validation guarantees the fields below are present and non-blank.
    let user = User::create(
        &state.db,
        payload.first_name.as_deref().unwrap_or_default(),
        payload.last_name.as_deref().unwrap_or_default(),
        payload.email_address.as_deref().unwrap_or_default(),
        &password_hash,
    )
    .await?;

    info!(user_id = %user.id, "user registered");
    Ok(StatusCode::CREATED)
}
