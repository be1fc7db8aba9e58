use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Challenge, TaskProof};

/// Events sent over the WebSocket gateway. Every variant is delivered over
/// a per-user channel addressed by the server, so a client only ever sees
/// events about itself or challenges it is a participant of.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum GatewayEvent {
    /// Server confirms successful authentication
    Ready { user_id: Uuid, email: String },

    /// A new challenge request arrived (targeted at the receiver)
    ChallengeCreate { challenge: Challenge },

    /// A challenge you sent was accepted or rejected (targeted at the sender)
    ChallengeUpdate { challenge: Challenge },

    /// A participant submitted a proof for a day of a challenge
    /// (targeted at both participants)
    ProofCreate {
        challenge_id: Uuid,
        proof: TaskProof,
    },
}

/// Commands sent FROM client TO server over WebSocket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum GatewayCommand {
    /// Authenticate the WebSocket connection
    Identify { token: String },
}
