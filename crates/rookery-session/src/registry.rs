//! The live connections of one game.
//!
//! A participant's connection is represented by its [`Outbox`]: the
//! sending half of a channel whose receiving half is drained by that
//! connection's writer task. When the socket dies the writer exits, the
//! receiver is dropped, and the outbox reports itself closed. That is how
//! the registry notices disconnects: on the next send, or when the room
//! sweeps with [`SessionRegistry::prune_closed`] after a connection ends.

use std::collections::HashMap;

use rookery_protocol::{Recipient, ServerMessage, Username};
use tokio::sync::{mpsc, RwLock};

/// Where messages for one participant are queued.
pub type Outbox = mpsc::UnboundedSender<ServerMessage>;

/// Username → connection map for one game.
///
/// Reads (broadcast iteration) take a shared lock; `add`, `remove` and
/// pruning take the exclusive lock, so writes never race each other.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    connections: RwLock<HashMap<Username, Outbox>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `outbox` for `username`, replacing any earlier connection.
    /// Returns the replaced one.
    pub async fn add(&self, username: Username, outbox: Outbox) -> Option<Outbox> {
        self.connections.write().await.insert(username, outbox)
    }

    /// Unregisters `username`. Returns `false` if it was not registered.
    pub async fn remove(&self, username: &Username) -> bool {
        self.connections.write().await.remove(username).is_some()
    }

    pub async fn contains(&self, username: &Username) -> bool {
        self.connections.read().await.contains_key(username)
    }

    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }

    /// Registered usernames, sorted.
    pub async fn participants(&self) -> Vec<Username> {
        let mut names: Vec<Username> = self.connections.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Sends `message` to every live connection except `exclude`.
    ///
    /// Dead connections are pruned. Returns how many participants the
    /// message was queued for.
    pub async fn broadcast(&self, exclude: Option<&Username>, message: &ServerMessage) -> usize {
        let mut delivered = 0;
        let mut dead = Vec::new();
        {
            let connections = self.connections.read().await;
            for (username, outbox) in connections.iter() {
                if exclude == Some(username) {
                    continue;
                }
                if try_send(outbox, message) {
                    delivered += 1;
                } else {
                    dead.push((username.clone(), outbox.clone()));
                }
            }
        }
        self.prune(dead).await;
        delivered
    }

    /// Sends `message` to `username` only.
    ///
    /// A no-op returning `false` if the participant is not registered or
    /// has already disconnected (in which case it is pruned).
    pub async fn send_to(&self, username: &Username, message: &ServerMessage) -> bool {
        let outbox = self.connections.read().await.get(username).cloned();
        let Some(outbox) = outbox else {
            return false;
        };

        if try_send(&outbox, message) {
            return true;
        }
        self.prune(vec![(username.clone(), outbox)]).await;
        false
    }

    /// Routes `message` according to `recipient`.
    pub async fn deliver(&self, recipient: &Recipient, message: &ServerMessage) {
        match recipient {
            Recipient::All => {
                self.broadcast(None, message).await;
            }
            Recipient::AllExcept(username) => {
                self.broadcast(Some(username), message).await;
            }
            Recipient::Participant(username) => {
                self.send_to(username, message).await;
            }
        }
    }

    /// Drops every connection whose outbox is closed. Returns how many were
    /// removed.
    pub async fn prune_closed(&self) -> usize {
        let mut connections = self.connections.write().await;
        let before = connections.len();
        connections.retain(|username, outbox| {
            let open = !outbox.is_closed();
            if !open {
                tracing::debug!(%username, "pruned closed connection");
            }
            open
        });
        before - connections.len()
    }

    /// Removes dead connections, unless the participant reconnected in the
    /// meantime and the entry now holds a different outbox.
    async fn prune(&self, dead: Vec<(Username, Outbox)>) {
        if dead.is_empty() {
            return;
        }
        let mut connections = self.connections.write().await;
        for (username, outbox) in dead {
            if connections.get(&username).is_some_and(|current| current.same_channel(&outbox)) {
                connections.remove(&username);
                tracing::debug!(%username, "pruned closed connection");
            }
        }
    }
}

fn try_send(outbox: &Outbox, message: &ServerMessage) -> bool {
    !outbox.is_closed() && outbox.send(message.clone()).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> Username {
        Username::from(name)
    }

    fn note(text: &str) -> ServerMessage {
        ServerMessage::notification(text)
    }

    #[tokio::test]
    async fn test_broadcast_skips_excluded() {
        let registry = SessionRegistry::new();
        let (a_tx, mut a_rx) = mpsc::unbounded_channel();
        let (b_tx, mut b_rx) = mpsc::unbounded_channel();
        registry.add(user("alice"), a_tx).await;
        registry.add(user("bob"), b_tx).await;

        let delivered = registry.broadcast(Some(&user("alice")), &note("hello")).await;

        assert_eq!(delivered, 1);
        assert_eq!(b_rx.try_recv().unwrap(), note("hello"));
        assert!(a_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_prunes_dead_connections() {
        let registry = SessionRegistry::new();
        let (a_tx, a_rx) = mpsc::unbounded_channel();
        let (b_tx, mut b_rx) = mpsc::unbounded_channel();
        registry.add(user("alice"), a_tx).await;
        registry.add(user("bob"), b_tx).await;
        drop(a_rx);

        let delivered = registry.broadcast(None, &note("x")).await;

        assert_eq!(delivered, 1);
        assert!(b_rx.try_recv().is_ok());
        assert!(!registry.contains(&user("alice")).await);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_send_to_absent_is_noop() {
        let registry = SessionRegistry::new();
        assert!(!registry.send_to(&user("ghost"), &note("x")).await);
    }

    #[tokio::test]
    async fn test_send_to_reaches_only_target() {
        let registry = SessionRegistry::new();
        let (a_tx, mut a_rx) = mpsc::unbounded_channel();
        let (b_tx, mut b_rx) = mpsc::unbounded_channel();
        registry.add(user("alice"), a_tx).await;
        registry.add(user("bob"), b_tx).await;

        assert!(registry.send_to(&user("bob"), &note("psst")).await);

        assert_eq!(b_rx.try_recv().unwrap(), note("psst"));
        assert!(a_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_send_to_closed_prunes() {
        let registry = SessionRegistry::new();
        let (tx, rx) = mpsc::unbounded_channel();
        registry.add(user("alice"), tx).await;
        drop(rx);

        assert!(!registry.send_to(&user("alice"), &note("x")).await);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_add_replaces_previous_connection() {
        let registry = SessionRegistry::new();
        let (old_tx, mut old_rx) = mpsc::unbounded_channel();
        let (new_tx, mut new_rx) = mpsc::unbounded_channel();

        assert!(registry.add(user("alice"), old_tx).await.is_none());
        assert!(registry.add(user("alice"), new_tx).await.is_some());
        registry.send_to(&user("alice"), &note("x")).await;

        assert!(new_rx.try_recv().is_ok());
        assert!(old_rx.try_recv().is_err());
        assert_eq!(registry.participants().await, vec![user("alice")]);
    }

    #[tokio::test]
    async fn test_prune_keeps_reconnected_outbox() {
        let registry = SessionRegistry::new();
        let (old_tx, old_rx) = mpsc::unbounded_channel();
        let (new_tx, _new_rx) = mpsc::unbounded_channel();
        registry.add(user("alice"), new_tx).await;
        drop(old_rx);

        registry.prune(vec![(user("alice"), old_tx)]).await;

        assert!(registry.contains(&user("alice")).await);
    }

    #[tokio::test]
    async fn test_prune_closed_removes_only_dropped_receivers() {
        let registry = SessionRegistry::new();
        let (a_tx, a_rx) = mpsc::unbounded_channel();
        let (b_tx, _b_rx) = mpsc::unbounded_channel();
        registry.add(user("alice"), a_tx).await;
        registry.add(user("bob"), b_tx).await;
        drop(a_rx);

        assert_eq!(registry.prune_closed().await, 1);
        assert_eq!(registry.participants().await, vec![user("bob")]);
        assert_eq!(registry.prune_closed().await, 0);
    }

    #[tokio::test]
    async fn test_deliver_routes_by_recipient() {
        let registry = SessionRegistry::new();
        let (a_tx, mut a_rx) = mpsc::unbounded_channel();
        let (b_tx, mut b_rx) = mpsc::unbounded_channel();
        registry.add(user("alice"), a_tx).await;
        registry.add(user("bob"), b_tx).await;

        registry.deliver(&Recipient::All, &note("all")).await;
        registry.deliver(&Recipient::AllExcept(user("bob")), &note("not bob")).await;
        registry.deliver(&Recipient::Participant(user("bob")), &note("bob only")).await;

        assert_eq!(a_rx.try_recv().unwrap(), note("all"));
        assert_eq!(a_rx.try_recv().unwrap(), note("not bob"));
        assert!(a_rx.try_recv().is_err());
        assert_eq!(b_rx.try_recv().unwrap(), note("all"));
        assert_eq!(b_rx.try_recv().unwrap(), note("bob only"));
    }
}
