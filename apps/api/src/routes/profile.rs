use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use finsense_core::validation::validate_profile_update;
use finsense_core::{Profile, ProfileUpdate};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/profile", get(get_profile).put(update_profile))
}

/// The caller's profile, created with defaults on first access.
async fn get_profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Profile>> {
    let profile = state.db.profiles().get_or_create(&user.user_id).await?;
    Ok(Json(profile))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(changes): Json<ProfileUpdate>,
) -> ApiResult<Json<Profile>> {
    validate_profile_update(&changes)?;

    let profile = state.db.profiles().update(&user.user_id, &changes).await?;
    Ok(Json(profile))
}
