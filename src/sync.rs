use crate::engine::FilterState;
use crate::store::{ListKind, ListStore, StoreChange};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

/// Keeps the classifier's in-memory lists consistent with the persisted
/// store. Hydrates eagerly at startup, then applies change events as they
/// arrive; each event fully replaces one list.
pub struct ListSync {
    state: Arc<FilterState>,
    store: ListStore,
    rx: broadcast::Receiver<StoreChange>,
}

impl ListSync {
    /// Subscribes to the change feed immediately, so writes landing
    /// between `hydrate` and `run` are not lost.
    pub fn new(state: Arc<FilterState>, store: ListStore) -> Self {
        let rx = store.subscribe();
        Self { state, store, rx }
    }

    fn read_list_or_empty(&self, kind: ListKind) -> Vec<String> {
        self.store.db().read_list(kind).unwrap_or_else(|e| {
            warn!("Failed to read {} from store: {}", kind.key(), e);
            Vec::new()
        })
    }

    /// Loads both lists from the store into memory. Called before the
    /// intercept loop starts so early requests never see empty lists.
    pub fn hydrate(&self) {
        let whitelist = self.read_list_or_empty(ListKind::Whitelist);
        let blacklist = self.read_list_or_empty(ListKind::Blacklist);
        info!(
            "Hydrated lists from store: {} whitelisted, {} blacklisted",
            whitelist.len(),
            blacklist.len()
        );
        self.state.replace_whitelist(whitelist);
        self.state.replace_blacklist(blacklist);
    }

    fn apply(&self, change: StoreChange) {
        match change.kind {
            ListKind::Whitelist => self.state.replace_whitelist(change.domains),
            ListKind::Blacklist => self.state.replace_blacklist(change.domains),
        }
    }

    /// Change-event loop. Runs until the store handle is dropped.
    pub async fn run(mut self) {
        loop {
            match self.rx.recv().await {
                Ok(change) => self.apply(change),
                Err(RecvError::Lagged(missed)) => {
                    // Dropped events carry full values, so a re-read from
                    // the store restores consistency.
                    warn!("List sync lagged by {} events, re-hydrating", missed);
                    self.hydrate();
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
}
