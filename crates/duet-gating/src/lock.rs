//! Per-conversation serialization (spec.md §5: "Within one conversation,
//! Orchestrator invocations triggered by distinct events MUST be
//! serialized"). One `tokio::sync::Mutex` per chat id, looked up through a
//! `DashMap` the same way `ConversationStore` keys its per-chat state.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use duet_core::types::ChatId;

#[derive(Default)]
pub struct ConversationLocks {
    locks: DashMap<ChatId, Arc<Mutex<()>>>,
}

impl ConversationLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Acquire the serialization lock for `chat_id`, creating it on first
    /// use. The returned guard is owned so it can be held across an `await`
    /// without borrowing `self`.
    pub async fn lock(&self, chat_id: &ChatId) -> OwnedMutexGuard<()> {
        let mutex = self
            .locks
            .entry(chat_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        mutex.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn second_lock_waits_for_first_to_drop() {
        let locks = ConversationLocks::new();
        let chat = ChatId::from("c1");

        let guard = locks.lock(&chat).await;
        let locks = Arc::new(locks);
        let locks_clone = Arc::clone(&locks);
        let chat_clone = chat.clone();
        let handle = tokio::spawn(async move {
            let _second = locks_clone.lock(&chat_clone).await;
        });

        tokio::task::yield_now().await;
        assert!(!handle.is_finished());
        drop(guard);
        handle.await.unwrap();
    }
}
