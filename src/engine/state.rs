use arc_swap::ArcSwap;
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// In-memory mirror of the persisted whitelist and blacklist.
///
/// Readers (the classifier) see a consistent snapshot per lookup; the sync
/// handler is the only writer and replaces a whole set at a time, never
/// merging. Hostnames are stored lowercased.
#[derive(Debug, Default)]
pub struct FilterState {
    whitelist: ArcSwap<FxHashSet<Box<str>>>,
    blacklist: ArcSwap<FxHashSet<Box<str>>>,
}

fn build_set(domains: Vec<String>) -> Arc<FxHashSet<Box<str>>> {
    let mut set = FxHashSet::default();
    for d in domains {
        let d = d.trim().to_ascii_lowercase();
        if !d.is_empty() {
            set.insert(d.into_boxed_str());
        }
    }
    Arc::new(set)
}

fn sorted_snapshot(set: &FxHashSet<Box<str>>) -> Vec<String> {
    let mut out: Vec<String> = set.iter().map(|d| d.to_string()).collect();
    out.sort();
    out
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_whitelist(&self, domains: Vec<String>) {
        self.whitelist.store(build_set(domains));
    }

    pub fn replace_blacklist(&self, domains: Vec<String>) {
        self.blacklist.store(build_set(domains));
    }

    pub fn whitelist_contains(&self, host: &str) -> bool {
        self.whitelist.load().contains(host)
    }

    pub fn blacklist_contains(&self, host: &str) -> bool {
        self.blacklist.load().contains(host)
    }

    /// Sorted copy of the whitelist, for display surfaces.
    pub fn whitelist_snapshot(&self) -> Vec<String> {
        sorted_snapshot(&self.whitelist.load())
    }

    /// Sorted copy of the blacklist, for display surfaces.
    pub fn blacklist_snapshot(&self) -> Vec<String> {
        sorted_snapshot(&self.blacklist.load())
    }
}
