use crate::badge::BadgeSurface;
use crate::engine::{Classifier, MatchedRule, Verdict};
use crate::logger::{DecisionAction, DecisionEntry, DecisionLogger};
use crate::stats::StatsCollector;
use crate::store::ListStore;
use std::sync::Arc;
use std::time::Instant;

/// What the host does with the request: nothing, or cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookAction {
    None,
    Cancel,
}

/// The request interception hook. Wraps the pure classifier with the block
/// side effects (counter increment, badge update, counter persist, decision
/// log), each exactly once per blocked request, synchronously with the
/// verdict. The whole path is free of awaits and I/O waits.
pub struct RequestInterceptor {
    classifier: Classifier,
    stats: Arc<StatsCollector>,
    store: ListStore,
    badge: Arc<dyn BadgeSurface>,
    badge_color: String,
    logger: Arc<DecisionLogger>,
}

impl RequestInterceptor {
    pub fn new(
        classifier: Classifier,
        stats: Arc<StatsCollector>,
        store: ListStore,
        badge: Arc<dyn BadgeSurface>,
        badge_color: String,
        logger: Arc<DecisionLogger>,
    ) -> Self {
        Self {
            classifier,
            stats,
            store,
            badge,
            badge_color,
            logger,
        }
    }

    pub fn intercept(&self, raw_url: &str) -> HookAction {
        let start = Instant::now();
        self.stats.inc_requests();

        let decision = self.classifier.classify(raw_url);

        let (action, log_action) = match decision.verdict {
            Verdict::Allow => (HookAction::None, DecisionAction::Allowed),
            Verdict::Block => {
                let blocked = self.stats.inc_blocked();
                self.badge.update(&blocked.to_string(), &self.badge_color);
                self.store.persist_blocked_count(blocked);
                (HookAction::Cancel, DecisionAction::Blocked)
            }
        };

        self.logger.log(DecisionEntry {
            url: raw_url.to_string(),
            host: decision.host,
            action: log_action,
            rule: decision.rule.map(|rule| match rule {
                MatchedRule::Tracker(fragment) => format!("tracker:{}", fragment),
                MatchedRule::Blacklist => "blacklist".to_string(),
            }),
            latency_us: start.elapsed().as_micros() as u64,
        });

        action
    }
}
