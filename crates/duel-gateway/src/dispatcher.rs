use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use duel_types::events::GatewayEvent;

/// Manages all connected clients and fans out events.
///
/// Every event is addressed: new-challenge and response notifications go to
/// the affected user, proof submissions go to both participants of the
/// challenge. There is no shared bus, so a connection can only ever see
/// events for challenges it is party to.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    /// Per-user targeted send channels: user_id -> (conn_id, sender)
    user_channels: RwLock<HashMap<Uuid, (Uuid, mpsc::UnboundedSender<GatewayEvent>)>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                user_channels: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Register a per-user targeted channel. A reconnect replaces the old
    /// channel; the conn_id lets the stale connection's cleanup detect that.
    pub async fn register_user_channel(
        &self,
        user_id: Uuid,
    ) -> (Uuid, mpsc::UnboundedReceiver<GatewayEvent>) {
        let conn_id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner
            .user_channels
            .write()
            .await
            .insert(user_id, (conn_id, tx));
        (conn_id, rx)
    }

    /// Unregister a per-user targeted channel, but only if conn_id matches.
    pub async fn unregister_user_channel(&self, user_id: Uuid, conn_id: Uuid) {
        let mut channels = self.inner.user_channels.write().await;
        if let Some((stored_conn_id, _)) = channels.get(&user_id) {
            if *stored_conn_id == conn_id {
                channels.remove(&user_id);
            }
        }
    }

    /// Send a targeted event to a specific user. Dropped silently if the
    /// user has no live connection.
    pub async fn send_to_user(&self, user_id: Uuid, event: GatewayEvent) {
        let channels = self.inner.user_channels.read().await;
        if let Some((_, tx)) = channels.get(&user_id) {
            let _ = tx.send(event);
        }
    }

    /// Deliver a challenge-scoped event to its participants and nobody else.
    pub async fn send_to_participants(
        &self,
        from_user_id: Uuid,
        to_user_id: Uuid,
        event: GatewayEvent,
    ) {
        self.send_to_user(from_user_id, event.clone()).await;
        if to_user_id != from_user_id {
            self.send_to_user(to_user_id, event).await;
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duel_types::models::TaskProof;

    fn ready(email: &str) -> GatewayEvent {
        GatewayEvent::Ready {
            user_id: Uuid::new_v4(),
            email: email.into(),
        }
    }

    fn proof_event(challenge_id: Uuid, user_id: Uuid) -> GatewayEvent {
        GatewayEvent::ProofCreate {
            challenge_id,
            proof: TaskProof {
                id: Uuid::new_v4(),
                challenge_id,
                day: 1,
                user_id,
                proof_url: None,
                proof_data: Some("data:image/png;base64,AAAA".into()),
                created_at: chrono::Utc::now(),
            },
        }
    }

    #[tokio::test]
    async fn targeted_send_reaches_only_the_addressee() {
        let dispatcher = Dispatcher::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let (_conn_a, mut rx_a) = dispatcher.register_user_channel(alice).await;
        let (_conn_b, mut rx_b) = dispatcher.register_user_channel(bob).await;

        dispatcher.send_to_user(alice, ready("alice@duel.dev")).await;

        assert!(matches!(rx_a.recv().await, Some(GatewayEvent::Ready { .. })));
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn proof_events_stay_between_the_participants() {
        let dispatcher = Dispatcher::new();
        let sender = Uuid::new_v4();
        let receiver = Uuid::new_v4();
        let outsider = Uuid::new_v4();

        let (_c1, mut rx_sender) = dispatcher.register_user_channel(sender).await;
        let (_c2, mut rx_receiver) = dispatcher.register_user_channel(receiver).await;
        let (_c3, mut rx_outsider) = dispatcher.register_user_channel(outsider).await;

        let challenge_id = Uuid::new_v4();
        dispatcher
            .send_to_participants(sender, receiver, proof_event(challenge_id, sender))
            .await;

        // Both parties see the proof land, a connected third user never does
        assert!(matches!(
            rx_sender.recv().await,
            Some(GatewayEvent::ProofCreate { .. })
        ));
        assert!(matches!(
            rx_receiver.recv().await,
            Some(GatewayEvent::ProofCreate { .. })
        ));
        assert!(rx_outsider.try_recv().is_err());
    }

    #[tokio::test]
    async fn stale_connection_cannot_unregister_a_newer_one() {
        let dispatcher = Dispatcher::new();
        let alice = Uuid::new_v4();

        let (old_conn, _old_rx) = dispatcher.register_user_channel(alice).await;
        let (_new_conn, mut new_rx) = dispatcher.register_user_channel(alice).await;

        // The old connection winding down must not tear out the new channel
        dispatcher.unregister_user_channel(alice, old_conn).await;
        dispatcher.send_to_user(alice, ready("alice@duel.dev")).await;
        assert!(new_rx.recv().await.is_some());
    }
}
