use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracknix::badge::BadgeSurface;
use tracknix::config::LoggingConfig;
use tracknix::engine::{Classifier, FilterState};
use tracknix::interceptor::{HookAction, RequestInterceptor};
use tracknix::logger::DecisionLogger;
use tracknix::stats::StatsCollector;
use tracknix::store::{ListStore, StoreDb};
use tracknix::trackers::TrackerSet;

const BADGE_COLOR: &str = "#d93025";

/// Badge surface that records every update for assertions.
struct TestBadge {
    updates: Mutex<Vec<(String, String)>>,
}

impl TestBadge {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            updates: Mutex::new(Vec::new()),
        })
    }

    fn last(&self) -> Option<(String, String)> {
        self.updates.lock().unwrap().last().cloned()
    }

    fn count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }
}

impl BadgeSurface for TestBadge {
    fn update(&self, text: &str, color: &str) {
        self.updates
            .lock()
            .unwrap()
            .push((text.to_string(), color.to_string()));
    }
}

struct Harness {
    interceptor: RequestInterceptor,
    stats: Arc<StatsCollector>,
    badge: Arc<TestBadge>,
    filter: Arc<FilterState>,
    db: Arc<StoreDb>,
}

fn build_harness(db_path: &str, extra_trackers: &[&str], initial_blocked: u64) -> Harness {
    let db = Arc::new(StoreDb::open(db_path).expect("open store"));
    db.initialize().expect("init store");
    let store = ListStore::spawn(db.clone());

    let stats = StatsCollector::new(initial_blocked);
    let filter = Arc::new(FilterState::new());
    let extra: Vec<String> = extra_trackers.iter().map(|s| s.to_string()).collect();
    let trackers = Arc::new(TrackerSet::new(&extra));
    let badge = TestBadge::new();
    let logger = DecisionLogger::new(LoggingConfig::default());

    let interceptor = RequestInterceptor::new(
        Classifier::new(trackers, filter.clone()),
        stats.clone(),
        store,
        badge.clone(),
        BADGE_COLOR.to_string(),
        logger,
    );

    Harness {
        interceptor,
        stats,
        badge,
        filter,
        db,
    }
}

/// Waits for the fire-and-forget writer to land the expected counter value.
async fn wait_for_persisted_count(db: &StoreDb, expected: u64) {
    for _ in 0..50 {
        if db.read_blocked_count().unwrap_or(0) == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!(
        "Persisted count never reached {} (currently {:?})",
        expected,
        db.read_blocked_count()
    );
}

#[tokio::test]
async fn blocked_tracker_increments_counter_and_badge() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("store.db");
    let h = build_harness(db_path.to_str().unwrap(), &["ads.example.com"], 0);

    let action = h.interceptor.intercept("https://ads.example.com/track");
    assert_eq!(action, HookAction::Cancel);
    assert_eq!(h.stats.blocked(), 1);
    assert_eq!(
        h.badge.last(),
        Some(("1".to_string(), BADGE_COLOR.to_string()))
    );

    // Counter persist is fire-and-forget but lands shortly after.
    wait_for_persisted_count(&h.db, 1).await;

    // An unmatched request allows and leaves the counter alone.
    let action = h.interceptor.intercept("https://plain.example.com/index");
    assert_eq!(action, HookAction::None);
    assert_eq!(h.stats.blocked(), 1);
    assert_eq!(h.badge.count(), 1);
}

#[tokio::test]
async fn whitelisted_host_allowed_despite_blacklist_and_tracker() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("store.db");
    let h = build_harness(db_path.to_str().unwrap(), &["shop.example.com"], 0);

    h.filter
        .replace_whitelist(vec!["shop.example.com".to_string()]);
    h.filter
        .replace_blacklist(vec!["shop.example.com".to_string()]);

    let action = h.interceptor.intercept("https://shop.example.com/cart");
    assert_eq!(action, HookAction::None);
    assert_eq!(h.stats.blocked(), 0);
    assert_eq!(h.badge.count(), 0, "allow must have no badge side effect");
}

#[tokio::test]
async fn blacklisted_host_blocked() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("store.db");
    let h = build_harness(db_path.to_str().unwrap(), &[], 0);

    h.filter
        .replace_blacklist(vec!["bad.example.com".to_string()]);

    assert_eq!(
        h.interceptor.intercept("https://bad.example.com/page"),
        HookAction::Cancel
    );
    assert_eq!(h.stats.blocked(), 1);
}

#[tokio::test]
async fn malformed_url_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("store.db");
    let h = build_harness(db_path.to_str().unwrap(), &[], 0);

    assert_eq!(h.interceptor.intercept("::not a url::"), HookAction::None);
    assert_eq!(h.stats.blocked(), 0);
}

#[tokio::test]
async fn counter_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("store.db");
    let path = db_path.to_str().unwrap();

    {
        let h = build_harness(path, &["ads.example.com"], 0);
        h.interceptor.intercept("https://ads.example.com/track");
        wait_for_persisted_count(&h.db, 1).await;
    }

    // "Restart": reopen the store, seed the collector with the persisted
    // count, block once more.
    let db = StoreDb::open(path).expect("reopen store");
    db.initialize().expect("re-init store");
    let persisted = db.read_blocked_count().expect("read count");
    assert_eq!(persisted, 1);

    let h = build_harness(path, &["ads.example.com"], persisted);
    h.interceptor.intercept("https://ads.example.com/track");
    assert_eq!(
        h.badge.last(),
        Some(("2".to_string(), BADGE_COLOR.to_string()))
    );
    wait_for_persisted_count(&h.db, 2).await;
}
