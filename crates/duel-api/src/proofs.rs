use axum::{
    Extension, Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use duel_types::events::GatewayEvent;
use duel_types::models::{Challenge, ChallengeStatus};
use duel_types::schedule::timeline;

use crate::auth::AppState;
use crate::convert::{challenge_from_row, proof_from_row};
use crate::error::{ApiError, blocking};
use crate::storage::StoredImage;

/// 10 MB cap on proof images.
const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// The upload-window rules, authoritative here rather than trusted to the
/// client: participants only, accepted challenges only, the day must have
/// unlocked, and nothing lands after the window.
fn check_upload(
    challenge: &Challenge,
    day: u32,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<(), ApiError> {
    if !challenge.is_participant(user_id) {
        return Err(ApiError::Forbidden(
            "only participants can submit proofs".into(),
        ));
    }
    if challenge.status != ChallengeStatus::Accepted {
        return Err(ApiError::Validation(
            "this challenge is not active".into(),
        ));
    }

    let window = timeline(challenge.start_at(), now);
    if window.ended {
        return Err(ApiError::Validation("this challenge has ended".into()));
    }
    if !window.day_open(day) {
        return Err(ApiError::Validation(format!("day {} is not open yet", day)));
    }
    Ok(())
}

/// POST /challenges/{id}/proofs/{day} — raw image bytes in the body.
/// Re-uploading the same (challenge, day, user) replaces the stored proof.
pub async fn upload(
    State(state): State<AppState>,
    Path((challenge_id, day)): Path<(Uuid, u32)>,
    Extension(claims): Extension<duel_types::api::Claims>,
    headers: HeaderMap,
    bytes: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    if bytes.is_empty() {
        return Err(ApiError::Validation("empty upload".into()));
    }
    if bytes.len() > MAX_IMAGE_SIZE {
        return Err(ApiError::TooLarge);
    }

    let db = state.clone();
    let cid = challenge_id.to_string();
    let row = blocking(move || db.db.get_challenge(&cid))
        .await?
        .ok_or(ApiError::NotFound)?;
    let challenge = challenge_from_row(row);

    check_upload(&challenge, day, claims.sub, Utc::now())?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    // Normal path: disk-backed store, public URL. Degraded path: inline the
    // bytes as a data: URI rather than failing the upload.
    let stored = state.storage.store(&content_type, &bytes).await;
    let (proof_url, proof_data) = match &stored {
        StoredImage::Hosted { url, .. } => (Some(url.clone()), None),
        StoredImage::Inline { data } => (None, Some(data.clone())),
    };

    let db = state.clone();
    let uid = claims.sub.to_string();
    let cid = challenge_id.to_string();
    let size = bytes.len() as i64;
    let ct = content_type.clone();
    let stored_for_db = stored.clone();
    let row = blocking(move || {
        if let StoredImage::Hosted { id, .. } = stored_for_db {
            db.db.insert_image(&id.to_string(), &uid, &ct, size)?;
        }
        db.db.upsert_proof(
            &Uuid::new_v4().to_string(),
            &cid,
            day,
            &uid,
            proof_url.as_deref(),
            proof_data.as_deref(),
        )
    })
    .await?;

    let proof = proof_from_row(row);

    // Both founders in this duel see the proof land; nobody else does
    state
        .dispatcher
        .send_to_participants(
            challenge.from_user_id,
            challenge.to_user_id,
            GatewayEvent::ProofCreate {
                challenge_id,
                proof: proof.clone(),
            },
        )
        .await;

    Ok((StatusCode::CREATED, Json(proof)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn accepted_challenge(started_hours_ago: i64) -> Challenge {
        let accepted_at = Utc::now() - Duration::hours(started_hours_ago);
        Challenge {
            id: Uuid::new_v4(),
            from_user_id: Uuid::new_v4(),
            to_user_id: Uuid::new_v4(),
            status: ChallengeStatus::Accepted,
            message: None,
            created_at: accepted_at - Duration::hours(1),
            accepted_at: Some(accepted_at),
        }
    }

    #[test]
    fn participants_only() {
        let c = accepted_challenge(1);
        let outsider = Uuid::new_v4();
        assert!(matches!(
            check_upload(&c, 1, outsider, Utc::now()),
            Err(ApiError::Forbidden(_))
        ));
        assert!(check_upload(&c, 1, c.from_user_id, Utc::now()).is_ok());
        assert!(check_upload(&c, 1, c.to_user_id, Utc::now()).is_ok());
    }

    #[test]
    fn pending_and_rejected_challenges_refuse_proofs() {
        let mut c = accepted_challenge(1);
        c.status = ChallengeStatus::Pending;
        assert!(matches!(
            check_upload(&c, 1, c.from_user_id, Utc::now()),
            Err(ApiError::Validation(_))
        ));
        c.status = ChallengeStatus::Rejected;
        assert!(check_upload(&c, 1, c.from_user_id, Utc::now()).is_err());
    }

    #[test]
    fn future_days_stay_locked_until_their_index() {
        let c = accepted_challenge(25); // day index 1
        assert!(check_upload(&c, 1, c.from_user_id, Utc::now()).is_ok());
        assert!(check_upload(&c, 2, c.from_user_id, Utc::now()).is_ok());
        assert!(check_upload(&c, 3, c.from_user_id, Utc::now()).is_err());
        assert!(check_upload(&c, 0, c.from_user_id, Utc::now()).is_err());
    }

    #[test]
    fn nothing_lands_after_the_window() {
        let c = accepted_challenge(80);
        let err = check_upload(&c, 1, c.from_user_id, Utc::now()).unwrap_err();
        assert!(matches!(err, ApiError::Validation(msg) if msg.contains("ended")));
    }

    #[test]
    fn window_starts_at_creation_for_rows_without_accepted_at() {
        let mut c = accepted_challenge(1);
        c.accepted_at = None;
        c.created_at = Utc::now() - Duration::hours(30);
        // created 30h ago -> day index 1, day 2 open
        assert!(check_upload(&c, 2, c.from_user_id, Utc::now()).is_ok());
    }
}
