use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::time::{self, Duration};
use tracing::info;

/// Lock-free request counters.
///
/// `blocked_requests` is the persistent blocked counter from the data model:
/// it is seeded from the store at startup and only ever incremented.
#[derive(Debug)]
pub struct StatsCollector {
    total_requests: AtomicU64,
    blocked_requests: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub total_requests: u64,
    pub blocked_requests: u64,
    pub block_rate_pct: f64,
}

impl StatsCollector {
    pub fn new(initial_blocked: u64) -> Arc<Self> {
        Arc::new(Self {
            total_requests: AtomicU64::new(0),
            blocked_requests: AtomicU64::new(initial_blocked),
        })
    }

    /// Spawns the periodic stats dumper. Separate from `new` so tests can
    /// build a collector without a running task.
    pub fn spawn_dumper(self: &Arc<Self>, log_interval_sec: u64) {
        let stats = self.clone();
        tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(log_interval_sec));
            // The first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                stats.dump_stats();
            }
        });
    }

    pub fn inc_requests(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the blocked counter and returns the new value.
    pub fn inc_blocked(&self) -> u64 {
        self.blocked_requests.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn blocked(&self) -> u64 {
        self.blocked_requests.load(Ordering::Relaxed)
    }

    pub fn get_snapshot(&self) -> StatsSnapshot {
        let total = self.total_requests.load(Ordering::Relaxed);
        let blocked = self.blocked_requests.load(Ordering::Relaxed);
        StatsSnapshot {
            total_requests: total,
            blocked_requests: blocked,
            block_rate_pct: if total > 0 {
                (blocked as f64 / total as f64) * 100.0
            } else {
                0.0
            },
        }
    }

    fn dump_stats(&self) {
        let snap = self.get_snapshot();
        info!(
            "STATS DUMP: Requests: {}, Blocked: {} ({:.1}%)",
            snap.total_requests, snap.blocked_requests, snap.block_rate_pct
        );
    }
}
