pub mod sqlite;
pub mod types;

pub use sqlite::StoreDb;
pub use types::{AddOutcome, ListKind, StoreChange, KEY_BLOCKED_COUNT};

use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::warn;

#[derive(Debug)]
enum StoreCommand {
    /// Best-effort counter persist, issued on every block.
    PersistBlockedCount(u64),
    /// Panel add-domain: read-modify-write of one list, with a reply.
    AppendDomain {
        kind: ListKind,
        domain: String,
        reply: oneshot::Sender<AddOutcome>,
    },
}

/// Handle to the persisted store. All writes are serialized through a
/// single writer task; every committed list write publishes a
/// `StoreChange` on the broadcast feed, which is what keeps the in-memory
/// mirrors current.
#[derive(Clone)]
pub struct ListStore {
    db: Arc<StoreDb>,
    tx: mpsc::Sender<StoreCommand>,
    changes: broadcast::Sender<StoreChange>,
}

impl ListStore {
    pub fn spawn(db: Arc<StoreDb>) -> Self {
        let (tx, mut rx) = mpsc::channel(256);
        let (changes, _) = broadcast::channel(64);

        let writer_db = db.clone();
        let writer_changes = changes.clone();
        tokio::spawn(async move {
            while let Some(cmd) = rx.recv().await {
                Self::apply(&writer_db, &writer_changes, cmd);
            }
        });

        Self { db, tx, changes }
    }

    fn apply(db: &StoreDb, changes: &broadcast::Sender<StoreChange>, cmd: StoreCommand) {
        match cmd {
            StoreCommand::PersistBlockedCount(count) => {
                // Advisory telemetry: a failed write is dropped, the next
                // increment writes the absolute value again.
                if let Err(e) = db.write_blocked_count(count) {
                    warn!("Failed to persist blocked count: {}", e);
                }
            }
            StoreCommand::AppendDomain {
                kind,
                domain,
                reply,
            } => {
                let outcome = Self::append_domain(db, changes, kind, &domain);
                let _ = reply.send(outcome);
            }
        }
    }

    fn append_domain(
        db: &StoreDb,
        changes: &broadcast::Sender<StoreChange>,
        kind: ListKind,
        domain: &str,
    ) -> AddOutcome {
        let domain = domain.trim().to_ascii_lowercase();
        if domain.is_empty() {
            return AddOutcome::Empty;
        }

        let mut list = match db.read_list(kind) {
            Ok(list) => list,
            Err(e) => {
                warn!("Failed to read {} for append: {}", kind.key(), e);
                return AddOutcome::Failed;
            }
        };

        if list.iter().any(|d| d == &domain) {
            return AddOutcome::Duplicate;
        }

        list.push(domain);
        if let Err(e) = db.write_list(kind, &list) {
            warn!("Failed to write {}: {}", kind.key(), e);
            return AddOutcome::Failed;
        }

        // No receivers is fine (panel running without the sync loop).
        let _ = changes.send(StoreChange {
            kind,
            domains: list,
        });
        AddOutcome::Added
    }

    /// Queues a counter persist without waiting for completion. If the
    /// writer is backed up the write is dropped rather than stalling the
    /// intercept path.
    pub fn persist_blocked_count(&self, count: u64) {
        let _ = self.tx.try_send(StoreCommand::PersistBlockedCount(count));
    }

    /// Appends a domain to a list on behalf of the panel. Trims the input;
    /// empty and duplicate entries are no-ops.
    pub async fn add_domain(&self, kind: ListKind, domain: String) -> AddOutcome {
        let (reply, rx) = oneshot::channel();
        let cmd = StoreCommand::AppendDomain {
            kind,
            domain,
            reply,
        };
        if self.tx.send(cmd).await.is_err() {
            return AddOutcome::Failed;
        }
        rx.await.unwrap_or(AddOutcome::Failed)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }

    /// Direct read access, used for startup hydration and recovery reads.
    pub fn db(&self) -> &StoreDb {
        &self.db
    }
}
