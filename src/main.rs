use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::signal;
use tracing::{info, warn};

use tracknix::api::{self, PanelState};
use tracknix::badge::{BadgeSurface, LogBadge};
use tracknix::config::Config;
use tracknix::engine::{Classifier, FilterState};
use tracknix::init::setup_logging;
use tracknix::interceptor::{HookAction, RequestInterceptor};
use tracknix::logger::DecisionLogger;
use tracknix::stats::StatsCollector;
use tracknix::store::{ListStore, StoreDb};
use tracknix::sync::ListSync;
use tracknix::trackers::TrackerSet;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load Config
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path).await?
    } else {
        Config::default()
    };

    // 2. Setup Logging
    setup_logging(&config);
    info!("Starting tracknix...");

    if !std::path::Path::new(&config_path).exists() {
        info!("Config file not found, using defaults.");
    }

    // 3. Open Store & First-Run Init (idempotent, never overwrites)
    let db = Arc::new(StoreDb::open(&config.store.path).context("Failed to open store")?);
    db.initialize().context("Failed to initialize store")?;
    let store = ListStore::spawn(db.clone());

    // 4. Init Stats, seeded with the persisted blocked counter
    let initial_blocked = db.read_blocked_count().unwrap_or_else(|e| {
        warn!("Failed to read persisted blocked count: {}", e);
        0
    });
    let stats = StatsCollector::new(initial_blocked);
    if config.stats.enable {
        stats.spawn_dumper(config.stats.log_interval_seconds);
    }

    // 5. Tracker Set & In-Memory Lists (eager hydration)
    let trackers = Arc::new(TrackerSet::new(&config.trackers.extra));
    info!("Loaded {} tracker fragments", trackers.len());

    let filter = Arc::new(FilterState::new());
    let sync = ListSync::new(filter.clone(), store.clone());
    sync.hydrate();
    tokio::spawn(sync.run());

    // 6. Badge, seeded with the persisted count
    let badge: Arc<dyn BadgeSurface> = Arc::new(LogBadge);
    badge.update(&initial_blocked.to_string(), &config.badge.warning_color);

    // 7. Decision Logger
    let logger = DecisionLogger::new(config.logging.clone());

    // 8. Build Interceptor
    let classifier = Classifier::new(trackers, filter.clone());
    let interceptor = RequestInterceptor::new(
        classifier,
        stats.clone(),
        store.clone(),
        badge,
        config.badge.warning_color.clone(),
        logger,
    );

    // 9. Start Panel Server (Embedded UI)
    if config.panel.enable {
        let panel_state = Arc::new(PanelState::new(stats.clone(), store.clone()));
        let host = config.panel.host.clone();
        let port = config.panel.port;
        tokio::spawn(async move {
            api::start_panel_server(panel_state, host, port).await;
        });
    }

    // 10. Intercept Loop: one URL per line on stdin, OK (allow) or
    //     ERR (cancel) per line on stdout.
    info!("Intercept loop ready");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    let intercept_loop = async {
        while let Ok(Some(line)) = lines.next_line().await {
            let url = line.trim();
            if url.is_empty() {
                continue;
            }
            let verdict = match interceptor.intercept(url) {
                HookAction::None => b"OK\n".as_slice(),
                HookAction::Cancel => b"ERR\n".as_slice(),
            };
            if stdout.write_all(verdict).await.is_err() {
                break;
            }
            if stdout.flush().await.is_err() {
                break;
            }
        }
    };

    // 11. Graceful Shutdown
    tokio::select! {
        _ = intercept_loop => {
            info!("Intercept input closed.");
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received.");
        }
    }

    Ok(())
}
