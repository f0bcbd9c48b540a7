#[derive(Debug, Clone)]
pub struct DecisionEntry {
    pub url: String,
    pub host: Option<String>,
    pub action: DecisionAction,
    /// The rule that matched, if blocked ("tracker:<fragment>" or "blacklist").
    pub rule: Option<String>,
    pub latency_us: u64,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum DecisionAction {
    Allowed,
    Blocked,
}

pub trait DecisionSink: Send + Sync {
    fn log(&self, entry: &DecisionEntry);
}
