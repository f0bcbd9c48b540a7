use super::state::FilterState;
use crate::trackers::TrackerSet;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Outcome of classifying one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Block,
}

/// The rule that produced a Block verdict, for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchedRule {
    Tracker(String),
    Blacklist,
}

#[derive(Debug, Clone)]
pub struct Decision {
    pub verdict: Verdict,
    pub host: Option<String>,
    pub rule: Option<MatchedRule>,
}

impl Decision {
    fn allow(host: Option<String>) -> Self {
        Self {
            verdict: Verdict::Allow,
            host,
            rule: None,
        }
    }

    fn block(host: Option<String>, rule: MatchedRule) -> Self {
        Self {
            verdict: Verdict::Block,
            host,
            rule: Some(rule),
        }
    }
}

/// The per-request decision function. Pure: reads the in-memory lists and
/// the tracker set, performs no I/O. Side effects of a Block (counter,
/// badge, persistence) live in the interceptor.
pub struct Classifier {
    trackers: Arc<TrackerSet>,
    state: Arc<FilterState>,
}

impl Classifier {
    pub fn new(trackers: Arc<TrackerSet>, state: Arc<FilterState>) -> Self {
        Self { trackers, state }
    }

    /// Classifies a request URL. Evaluation order is load-bearing:
    /// whitelist exempts before any block rule is consulted.
    ///
    /// A URL that fails to parse is allowed (fail-open); a URL without a
    /// host skips the hostname checks but still gets tracker matching.
    pub fn classify(&self, raw_url: &str) -> Decision {
        let host = match Url::parse(raw_url) {
            Ok(url) => url.host_str().map(|h| h.to_ascii_lowercase()),
            Err(e) => {
                debug!("Allowing unparseable request URL {:?}: {}", raw_url, e);
                return Decision::allow(None);
            }
        };

        // 1. Whitelist wins over everything.
        if let Some(h) = host.as_deref() {
            if self.state.whitelist_contains(h) {
                return Decision::allow(host);
            }
        }

        // 2. Tracker fragment anywhere in the URL, or blacklisted host.
        let lowered = raw_url.to_ascii_lowercase();
        if let Some(fragment) = self.trackers.first_match(&lowered) {
            let rule = MatchedRule::Tracker(fragment.to_string());
            return Decision::block(host, rule);
        }
        if let Some(h) = host.as_deref() {
            if self.state.blacklist_contains(h) {
                return Decision::block(host, MatchedRule::Blacklist);
            }
        }

        // 3. No rule matched.
        Decision::allow(host)
    }
}
