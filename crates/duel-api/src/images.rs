use axum::{
    Extension, Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use bytes::Bytes;
use tracing::error;
use uuid::Uuid;

use duel_types::api::{Claims, ImageUploadResponse};

use crate::auth::AppState;
use crate::error::{ApiError, blocking};
use crate::storage::StoredImage;

/// 10 MB cap for avatars and covers.
const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// POST /images — raw image bytes (avatar/cover uploads). Returns the
/// public URL, or the inlined data: URI when the store had to fall back.
pub async fn upload(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    headers: HeaderMap,
    bytes: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    if bytes.is_empty() {
        return Err(ApiError::Validation("empty upload".into()));
    }
    if bytes.len() > MAX_IMAGE_SIZE {
        return Err(ApiError::TooLarge);
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let stored = state.storage.store(&content_type, &bytes).await;

    let response = match stored {
        StoredImage::Hosted { id, url } => {
            let db = state.clone();
            let uid = claims.sub.to_string();
            let size = bytes.len() as i64;
            blocking(move || db.db.insert_image(&id.to_string(), &uid, &content_type, size))
                .await?;
            ImageUploadResponse {
                id: Some(id),
                url: Some(url),
                data: None,
            }
        }
        StoredImage::Inline { data } => ImageUploadResponse {
            id: None,
            url: None,
            data: Some(data),
        },
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /images/{id} — public read with the recorded content type. This is
/// the "public URL" the store hands out, so no auth here.
pub async fn serve(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let row = blocking(move || db.db.get_image(&id.to_string()))
        .await?
        .ok_or(ApiError::NotFound)?;

    let bytes = state.storage.read(id).await.map_err(|e| {
        error!("Image {} in DB but unreadable on disk: {}", id, e);
        ApiError::NotFound
    })?;

    Ok(([(header::CONTENT_TYPE, row.content_type)], bytes))
}
