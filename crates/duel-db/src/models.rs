/// Database row types — these map directly to SQLite rows.
/// Distinct from duel-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: String,
    pub email: String,
    pub password: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct ProfileRow {
    pub user_id: String,
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
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct ChallengeRow {
    pub id: String,
    pub from_user_id: String,
    pub to_user_id: String,
    pub status: String,
    pub message: Option<String>,
    pub created_at: String,
    pub accepted_at: Option<String>,
}

pub struct TaskRow {
    pub challenge_id: String,
    pub day: u32,
    pub task_code: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct ProofRow {
    pub id: String,
    pub challenge_id: String,
    pub day: u32,
    pub user_id: String,
    pub proof_url: Option<String>,
    pub proof_data: Option<String>,
    pub created_at: String,
}

pub struct ImageRow {
    pub id: String,
    pub owner_id: String,
    pub content_type: String,
    pub size: i64,
    pub created_at: String,
}

/// Fields written on a profile upsert; timestamps are the store's concern.
#[derive(Debug, Default, Clone)]
pub struct ProfileUpdate {
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

/// Server-side filters for the founder directory.
#[derive(Debug, Default, Clone)]
pub struct DirectoryFilter {
    pub q: Option<String>,
    pub category: Option<String>,
    pub stage: Option<String>,
}
