mod classifier;
pub mod state;

pub use classifier::{Classifier, Decision, MatchedRule, Verdict};
pub use state::FilterState;
