use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Challenge, ChallengeStatus, Profile, TaskProof};
use crate::schedule::Timeline;

// -- JWT Claims --

/// JWT claims shared between duel-api (REST middleware) and duel-gateway
/// (WebSocket Identify). Canonical definition lives here in duel-types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
}

// -- Profiles --

/// Body of PUT /profiles/me. The owner id comes from the token, never the
/// body; omitted fields clear the stored value (the client always sends the
/// whole form).
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaveProfileRequest {
    pub display_name: Option<String>,
    pub startup_name: Option<String>,
    pub category: Option<String>,
    pub stage: Option<String>,
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub avatar_url: Option<String>,
    pub avatar_data: Option<String>,
    pub cover_url: Option<String>,
    pub cover_data: Option<String>,
}

/// Query filters for the founder directory.
#[derive(Debug, Default, Deserialize)]
pub struct DirectoryQuery {
    /// Case-insensitive substring over display and startup name.
    pub q: Option<String>,
    pub category: Option<String>,
    pub stage: Option<String>,
}

// -- Challenges --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendChallengeRequest {
    pub to_user_id: Uuid,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RespondRequest {
    pub status: ChallengeStatus,
}

/// An accepted challenge with both participants' profiles joined in.
#[derive(Debug, Serialize)]
pub struct ActiveChallenge {
    pub challenge: Challenge,
    pub from: Option<Profile>,
    pub to: Option<Profile>,
}

#[derive(Debug, Serialize)]
pub struct TaskView {
    pub day: u32,
    pub task_code: String,
    pub task_name: String,
}

/// Everything the challenge-detail screen needs in one fetch.
#[derive(Debug, Serialize)]
pub struct ChallengeDetail {
    pub challenge: Challenge,
    pub tasks: Vec<TaskView>,
    pub proofs: Vec<TaskProof>,
    pub timeline: Timeline,
}

// -- Images --

/// Result of an image upload. `url` on the normal path; `data` carries the
/// inlined data: URI when the store had to fall back.
#[derive(Debug, Serialize)]
pub struct ImageUploadResponse {
    pub id: Option<Uuid>,
    pub url: Option<String>,
    pub data: Option<String>,
}
