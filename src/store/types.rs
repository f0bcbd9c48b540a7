/// The two user-mutable domain lists in the persisted store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Whitelist,
    Blacklist,
}

impl ListKind {
    pub fn key(self) -> &'static str {
        match self {
            ListKind::Whitelist => "whitelist",
            ListKind::Blacklist => "blacklist",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "whitelist" => Some(ListKind::Whitelist),
            "blacklist" => Some(ListKind::Blacklist),
            _ => None,
        }
    }
}

pub const KEY_BLOCKED_COUNT: &str = "blockedCount";

/// Published after every committed write to a list key. Carries the full
/// new value; consumers replace, never merge.
#[derive(Debug, Clone)]
pub struct StoreChange {
    pub kind: ListKind,
    pub domains: Vec<String>,
}

/// Result of a panel add-domain action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// Already present; the list is unchanged.
    Duplicate,
    /// Empty after trimming; the list is unchanged.
    Empty,
    /// The store write failed; the list is unchanged.
    Failed,
}
