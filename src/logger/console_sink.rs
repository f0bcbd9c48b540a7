use crate::config::LoggingConfig;
use crate::logger::types::{DecisionAction, DecisionEntry, DecisionSink};
use tracing::info;

pub struct ConsoleSink {
    config: LoggingConfig,
}

impl ConsoleSink {
    pub fn new(config: LoggingConfig) -> Self {
        Self { config }
    }
}

impl DecisionSink for ConsoleSink {
    fn log(&self, entry: &DecisionEntry) {
        if !self.config.enable {
            return;
        }

        let should_log = match entry.action {
            DecisionAction::Blocked => self.config.log_blocked,
            DecisionAction::Allowed => self.config.log_allowed,
        };
        if !should_log {
            return;
        }

        if self.config.format == "json" {
            info!(
                target: "decision",
                url = %entry.url,
                host = ?entry.host,
                action = ?entry.action,
                rule = ?entry.rule,
                lat_us = %entry.latency_us
            );
        } else {
            let action_str = match entry.action {
                DecisionAction::Blocked => {
                    format!("BLOCKED[{}]", entry.rule.as_deref().unwrap_or("unknown"))
                }
                DecisionAction::Allowed => "ALLOWED".to_string(),
            };
            info!(
                "{} -> {} [{}us]",
                entry.url, action_str, entry.latency_us
            );
        }
    }
}
