//! Row -> domain conversions. DB rows are stringly typed; anything corrupt
//! gets a warn and a default rather than a 500 on every listing.

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use duel_db::models::{ChallengeRow, ProfileRow, ProofRow};
use duel_types::models::{Challenge, ChallengeStatus, Profile, TaskProof};

pub fn parse_uuid(s: &str, context: &str) -> Uuid {
    s.parse().unwrap_or_else(|e| {
        warn!("Corrupt uuid '{}' in {}: {}", s, context, e);
        Uuid::default()
    })
}

/// SQLite stores default timestamps as "YYYY-MM-DD HH:MM:SS" without
/// timezone; RFC 3339 also appears on rows written by the app. Accept both.
pub fn parse_timestamp(s: &str, context: &str) -> DateTime<Utc> {
    s.parse::<DateTime<Utc>>()
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}' in {}: {}", s, context, e);
            DateTime::default()
        })
}

pub fn profile_from_row(row: ProfileRow) -> Profile {
    Profile {
        user_id: parse_uuid(&row.user_id, "profiles.user_id"),
        display_name: row.display_name,
        startup_name: row.startup_name,
        category: row.category,
        stage: row.stage,
        website: row.website,
        twitter: row.twitter,
        linkedin: row.linkedin,
        github: row.github,
        avatar_url: row.avatar_url,
        avatar_data: row.avatar_data,
        cover_url: row.cover_url,
        cover_data: row.cover_data,
        created_at: parse_timestamp(&row.created_at, "profiles.created_at"),
        updated_at: parse_timestamp(&row.updated_at, "profiles.updated_at"),
    }
}

pub fn challenge_from_row(row: ChallengeRow) -> Challenge {
    Challenge {
        id: parse_uuid(&row.id, "challenges.id"),
        from_user_id: parse_uuid(&row.from_user_id, "challenges.from_user_id"),
        to_user_id: parse_uuid(&row.to_user_id, "challenges.to_user_id"),
        status: ChallengeStatus::parse(&row.status).unwrap_or_else(|| {
            warn!("Corrupt status '{}' on challenge '{}'", row.status, row.id);
            ChallengeStatus::Pending
        }),
        message: row.message,
        created_at: parse_timestamp(&row.created_at, "challenges.created_at"),
        accepted_at: row
            .accepted_at
            .as_deref()
            .map(|s| parse_timestamp(s, "challenges.accepted_at")),
    }
}

pub fn proof_from_row(row: ProofRow) -> TaskProof {
    TaskProof {
        id: parse_uuid(&row.id, "proofs.id"),
        challenge_id: parse_uuid(&row.challenge_id, "proofs.challenge_id"),
        day: row.day,
        user_id: parse_uuid(&row.user_id, "proofs.user_id"),
        proof_url: row.proof_url,
        proof_data: row.proof_data,
        created_at: parse_timestamp(&row.created_at, "proofs.created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_sqlite_and_rfc3339_timestamps() {
        let sqlite = parse_timestamp("2026-08-30 12:00:00", "test");
        assert_eq!(sqlite.to_rfc3339(), "2026-08-30T12:00:00+00:00");

        let rfc = parse_timestamp("2026-08-30T12:00:00Z", "test");
        assert_eq!(sqlite, rfc);
    }
}
