use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use duel_types::api::{
    ActiveChallenge, Claims, ChallengeDetail, RespondRequest, SendChallengeRequest, TaskView,
};
use duel_types::events::GatewayEvent;
use duel_types::models::{Challenge, ChallengeStatus, Profile};
use duel_types::schedule::timeline;
use duel_types::tasks;

use crate::auth::AppState;
use crate::convert::{challenge_from_row, parse_uuid, profile_from_row, proof_from_row};
use crate::error::{ApiError, blocking};

/// POST /challenges — send a challenge request.
///
/// The gate the original client enforced on trust now lives here: the
/// sender's profile must carry website and X links before anything is
/// written, and self-challenges or duplicate pending requests are refused.
pub async fn send(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SendChallengeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.to_user_id == claims.sub {
        return Err(ApiError::Validation("you cannot challenge yourself".into()));
    }

    let db = state.clone();
    let me = claims.sub.to_string();
    let my_profile = blocking(move || db.db.get_profile(&me)).await?;

    let sender_ready = my_profile
        .map(profile_from_row)
        .is_some_and(|p| p.can_send_challenges());
    if !sender_ready {
        return Err(ApiError::Validation(
            "Add your website and X account link to your profile to send a challenge.".into(),
        ));
    }

    let db = state.clone();
    let to = req.to_user_id.to_string();
    if !blocking(move || db.db.user_exists(&to)).await? {
        return Err(ApiError::NotFound);
    }

    let db = state.clone();
    let from = claims.sub.to_string();
    let to = req.to_user_id.to_string();
    if blocking(move || db.db.has_pending_challenge(&from, &to)).await? {
        return Err(ApiError::Conflict(
            "you already have a pending challenge with this founder".into(),
        ));
    }

    let challenge_id = Uuid::new_v4();
    let db = state.clone();
    let from = claims.sub.to_string();
    let to = req.to_user_id.to_string();
    let message = req.message.clone();
    let row = blocking(move || {
        let cid = challenge_id.to_string();
        db.db.insert_challenge(&cid, &from, &to, message.as_deref())?;
        db.db.get_challenge(&cid)
    })
    .await?
    .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("challenge missing after insert")))?;

    let challenge = challenge_from_row(row);

    // Ring the receiver's bell
    state
        .dispatcher
        .send_to_user(
            req.to_user_id,
            GatewayEvent::ChallengeCreate {
                challenge: challenge.clone(),
            },
        )
        .await;

    Ok((StatusCode::CREATED, Json(challenge)))
}

/// POST /challenges/{id}/respond — accept or reject, receiver only.
/// `pending` is the only state this can leave; accepting stamps accepted_at
/// and seeds the 3-day task schedule.
pub async fn respond(
    State(state): State<AppState>,
    Path(challenge_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<RespondRequest>,
) -> Result<Json<Challenge>, ApiError> {
    if req.status == ChallengeStatus::Pending {
        return Err(ApiError::Validation(
            "status must be accepted or rejected".into(),
        ));
    }

    let db = state.clone();
    let cid = challenge_id.to_string();
    let row = blocking(move || db.db.get_challenge(&cid))
        .await?
        .ok_or(ApiError::NotFound)?;
    let challenge = challenge_from_row(row);

    if challenge.to_user_id != claims.sub {
        return Err(ApiError::Forbidden(
            "only the challenged founder can respond".into(),
        ));
    }

    let accept = req.status == ChallengeStatus::Accepted;
    let db = state.clone();
    let cid = challenge_id.to_string();
    let transitioned = blocking(move || {
        let transitioned = db.db.respond_challenge(&cid, req.status.as_str(), accept)?;
        if transitioned && accept {
            db.db.seed_tasks(&cid, &tasks::draw_task_codes())?;
        }
        Ok(transitioned)
    })
    .await?;

    if !transitioned {
        return Err(ApiError::Conflict(
            "this challenge has already been responded to".into(),
        ));
    }

    let db = state.clone();
    let cid = challenge_id.to_string();
    let row = blocking(move || db.db.get_challenge(&cid))
        .await?
        .ok_or(ApiError::NotFound)?;
    let challenge = challenge_from_row(row);

    // Tell the sender what happened
    state
        .dispatcher
        .send_to_user(
            challenge.from_user_id,
            GatewayEvent::ChallengeUpdate {
                challenge: challenge.clone(),
            },
        )
        .await;

    Ok(Json(challenge))
}

/// GET /challenges/incoming — the caller's pending inbox, newest first.
pub async fn incoming(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let uid = claims.sub.to_string();
    let rows = blocking(move || db.db.list_incoming_pending(&uid)).await?;
    let challenges: Vec<Challenge> = rows.into_iter().map(challenge_from_row).collect();
    Ok(Json(challenges))
}

/// GET /challenges/outgoing — who the caller has already challenged.
pub async fn outgoing(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let uid = claims.sub.to_string();
    let targets = blocking(move || db.db.list_outgoing_pending_targets(&uid)).await?;
    let ids: Vec<Uuid> = targets
        .iter()
        .map(|t| parse_uuid(t, "challenges.to_user_id"))
        .collect();
    Ok(Json(ids))
}

/// GET /challenges/active — accepted challenges with both profiles joined.
pub async fn active(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let uid = claims.sub.to_string();
    let (rows, profile_rows) = blocking(move || {
        let rows = db.db.list_accepted_for(&uid)?;

        let mut ids: Vec<String> = rows
            .iter()
            .flat_map(|c| [c.from_user_id.clone(), c.to_user_id.clone()])
            .collect();
        ids.sort();
        ids.dedup();

        let profiles = db.db.get_profiles_by_ids(&ids)?;
        Ok((rows, profiles))
    })
    .await?;

    let by_id: HashMap<Uuid, Profile> = profile_rows
        .into_iter()
        .map(profile_from_row)
        .map(|p| (p.user_id, p))
        .collect();

    let items: Vec<ActiveChallenge> = rows
        .into_iter()
        .map(challenge_from_row)
        .map(|challenge| ActiveChallenge {
            from: by_id.get(&challenge.from_user_id).cloned(),
            to: by_id.get(&challenge.to_user_id).cloned(),
            challenge,
        })
        .collect();

    Ok(Json(items))
}

/// GET /challenges/{id} — the detail screen: challenge, tasks, proofs, and
/// the derived window state, participants only.
pub async fn detail(
    State(state): State<AppState>,
    Path(challenge_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ChallengeDetail>, ApiError> {
    let db = state.clone();
    let cid = challenge_id.to_string();
    let (row, task_rows, proof_rows) = blocking(move || {
        let Some(row) = db.db.get_challenge(&cid)? else {
            return Ok(None);
        };
        let tasks = db.db.list_tasks(&cid)?;
        let proofs = db.db.list_proofs(&cid)?;
        Ok(Some((row, tasks, proofs)))
    })
    .await?
    .ok_or(ApiError::NotFound)?;

    let challenge = challenge_from_row(row);
    if !challenge.is_participant(claims.sub) {
        return Err(ApiError::Forbidden(
            "only participants can view this challenge".into(),
        ));
    }

    let tasks: Vec<TaskView> = task_rows
        .into_iter()
        .map(|t| TaskView {
            day: t.day,
            task_name: tasks::task_name(&t.task_code).to_string(),
            task_code: t.task_code,
        })
        .collect();

    let proofs = proof_rows.into_iter().map(proof_from_row).collect();
    let window = timeline(challenge.start_at(), chrono::Utc::now());

    Ok(Json(ChallengeDetail {
        challenge,
        tasks,
        proofs,
        timeline: window,
    }))
}
