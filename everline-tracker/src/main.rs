use std::sync::Arc;

use everline_tracker::config::TrackerConfig;
use everline_tracker::feed::{FeedClient, FeedSource, MockFeed};
use everline_tracker::line::StationTable;
use everline_tracker::poller::Poller;
use everline_tracker::schedule::ScheduleLookup;
use everline_tracker::web::{AppState, create_router};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "everline_tracker=info,tower_http=info";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = TrackerConfig::from_env().expect("Invalid configuration");

    let schedule = ScheduleLookup::everline();
    for (day_type, report) in schedule.coverage() {
        for gap in &report.gaps {
            info!(%day_type, %gap, "no scheduled service");
        }
        for overlap in &report.overlaps {
            warn!(%day_type, %overlap, "overlapping schedule ranges; earlier range wins");
        }
    }

    let table = Arc::new(StationTable::everline());

    match config.mock_feed.clone() {
        Some(path) => {
            info!(%path, "serving captured feed payload");
            let feed = MockFeed::load(&path).expect("Failed to load mock feed");
            run(feed, config, table, schedule).await;
        }
        None => {
            info!(url = %config.feed.url, "polling live feed");
            let client =
                FeedClient::new(config.feed.clone()).expect("Failed to create feed client");
            run(client, config, table, schedule).await;
        }
    }
}

async fn run<S: FeedSource>(
    source: S,
    config: TrackerConfig,
    table: Arc<StationTable>,
    schedule: ScheduleLookup,
) {
    let poller = Poller::new(source, Arc::clone(&table), config.poller.clone());

    // First poll up front so the API has data as soon as it starts
    match poller.poll_once().await {
        Ok(snapshot) => info!(trains = snapshot.train_count(), "initial poll succeeded"),
        Err(e) => warn!(error = %e, "initial poll failed; will retry"),
    }
    poller.start_auto_update();

    let state = AppState::new(poller.slot(), table, schedule, poller.config().stale_after);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .expect("Failed to bind listen address");
    info!("Everline tracker listening on http://{}", config.listen_addr);
    info!("  GET /health        - Health check");
    info!("  GET /stations      - Station list");
    info!("  GET /trains        - Latest train positions");
    info!("  GET /trains/count  - Number of trains on the line");
    info!("  GET /interval      - Scheduled interval (?time=HHMM&weekend=bool)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    poller.stop_auto_update();
    info!("shut down");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
