use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A founder's public card. Every field except the owner id is optional:
/// profiles start empty and are filled in over time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: Uuid,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// A profile can send challenges only once its website and X (twitter)
    /// links are filled in.
    pub fn can_send_challenges(&self) -> bool {
        let filled = |f: &Option<String>| f.as_deref().is_some_and(|s| !s.trim().is_empty());
        filled(&self.website) && filled(&self.twitter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ChallengeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Accepted and rejected are terminal; no transition leaves them.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub status: ChallengeStatus,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
}

impl Challenge {
    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.from_user_id == user_id || self.to_user_id == user_id
    }

    /// The 3-day window starts when the challenge is accepted, falling back
    /// to the creation time for rows from before accepted_at existed.
    pub fn start_at(&self) -> DateTime<Utc> {
        self.accepted_at.unwrap_or(self.created_at)
    }
}

/// A participant's proof image for one day. Exactly one of proof_url /
/// proof_data is set: a hosted URL normally, an inlined data: URI when the
/// image store was unavailable at upload time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskProof {
    pub id: Uuid,
    pub challenge_id: Uuid,
    pub day: u32,
    pub user_id: Uuid,
    pub proof_url: Option<String>,
    pub proof_data: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(website: Option<&str>, twitter: Option<&str>) -> Profile {
        Profile {
            user_id: Uuid::new_v4(),
            display_name: Some("Ada".into()),
            startup_name: None,
            category: None,
            stage: None,
            website: website.map(Into::into),
            twitter: twitter.map(Into::into),
            linkedin: None,
            github: None,
            avatar_url: None,
            avatar_data: None,
            cover_url: None,
            cover_data: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn send_gate_requires_website_and_twitter() {
        assert!(profile(Some("https://a.dev"), Some("https://x.com/a")).can_send_challenges());
        assert!(!profile(None, Some("https://x.com/a")).can_send_challenges());
        assert!(!profile(Some("https://a.dev"), None).can_send_challenges());
        // whitespace-only counts as empty
        assert!(!profile(Some("   "), Some("https://x.com/a")).can_send_challenges());
    }

    #[test]
    fn status_round_trip() {
        for s in [
            ChallengeStatus::Pending,
            ChallengeStatus::Accepted,
            ChallengeStatus::Rejected,
        ] {
            assert_eq!(ChallengeStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(ChallengeStatus::parse("bogus"), None);
        assert!(!ChallengeStatus::Pending.is_terminal());
        assert!(ChallengeStatus::Accepted.is_terminal());
    }
}
