use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use uuid::Uuid;

use duel_db::models::{DirectoryFilter, ProfileUpdate};
use duel_types::api::{Claims, DirectoryQuery, SaveProfileRequest};
use duel_types::models::Profile;

use crate::auth::AppState;
use crate::convert::profile_from_row;
use crate::error::{ApiError, blocking};

/// GET /profiles/me — 404 until the first save.
pub async fn get_me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Profile>, ApiError> {
    let db = state.clone();
    let uid = claims.sub.to_string();
    let row = blocking(move || db.db.get_profile(&uid))
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(profile_from_row(row)))
}

/// PUT /profiles/me — whole-form upsert keyed on the token's user id.
pub async fn save_me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SaveProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    let update = ProfileUpdate {
        display_name: req.display_name,
        startup_name: req.startup_name,
        category: req.category,
        stage: req.stage,
        website: req.website,
        twitter: req.twitter,
        linkedin: req.linkedin,
        github: req.github,
        avatar_url: req.avatar_url,
        avatar_data: req.avatar_data,
        cover_url: req.cover_url,
        cover_data: req.cover_data,
    };

    let db = state.clone();
    let uid = claims.sub.to_string();
    let row = blocking(move || {
        db.db.upsert_profile(&uid, &update)?;
        db.db.get_profile(&uid)
    })
    .await?
    .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("profile missing after upsert")))?;

    Ok(Json(profile_from_row(row)))
}

/// GET /profiles — the founder directory. Never includes the caller's own
/// card; q/category/stage filters are applied in the store.
pub async fn directory(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<DirectoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = DirectoryFilter {
        q: query.q,
        category: query.category,
        stage: query.stage,
    };

    let db = state.clone();
    let uid = claims.sub.to_string();
    let rows = blocking(move || db.db.list_directory(&uid, &filter)).await?;

    let profiles: Vec<Profile> = rows.into_iter().map(profile_from_row).collect();
    Ok(Json(profiles))
}

/// GET /profiles/{user_id} — another founder's public card.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<Profile>, ApiError> {
    let db = state.clone();
    let row = blocking(move || db.db.get_profile(&user_id.to_string()))
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(profile_from_row(row)))
}
