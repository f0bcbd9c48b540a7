pub mod console_sink;
pub mod types;

pub use self::console_sink::ConsoleSink;
pub use self::types::{DecisionAction, DecisionEntry, DecisionSink};

use crate::config::LoggingConfig;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

/// Front for the decision log sinks. `log` never blocks and never fails:
/// entries go over a bounded channel with `try_send`, and a full buffer
/// drops the entry rather than stalling the intercept path.
pub struct DecisionLogger {
    sinks: Vec<mpsc::Sender<DecisionEntry>>,
}

impl DecisionLogger {
    pub fn new(config: LoggingConfig) -> Arc<Self> {
        let mut sinks = Vec::new();

        for sink_type in &config.decision_sinks {
            if sink_type == "console" {
                let (tx, mut rx) = mpsc::channel::<DecisionEntry>(1000);
                let sink = ConsoleSink::new(config.clone());

                tokio::spawn(async move {
                    while let Some(entry) = rx.recv().await {
                        sink.log(&entry);
                    }
                });
                sinks.push(tx);
            } else {
                warn!("Unknown decision log sink type: {}", sink_type);
            }
        }

        Arc::new(Self { sinks })
    }

    pub fn log(&self, entry: DecisionEntry) {
        let len = self.sinks.len();
        for (i, sink) in self.sinks.iter().enumerate() {
            if i == len - 1 {
                let _ = sink.try_send(entry);
                break;
            }
            let _ = sink.try_send(entry.clone());
        }
    }
}
