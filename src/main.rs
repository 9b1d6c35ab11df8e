use std::sync::Arc;
use tickwatch::config::Config;
use tickwatch::services::{LogNotifier, Monitor};
use tickwatch::sources::YahooFinanceClient;
use tickwatch::types::MonitorSnapshot;
use tickwatch::{api, AppState};
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tickwatch=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    config.monitor.indicators.validate()?;
    config.monitor.thresholds.validate()?;
    if config.monitor.symbols.is_empty() {
        anyhow::bail!("WATCH_SYMBOLS must name at least one symbol");
    }

    info!(
        "Watching {} ({} bars over {}), refreshing every {}s",
        config.monitor.symbols.join(", "),
        config.monitor.interval,
        config.monitor.period,
        config.monitor.refresh_secs
    );

    // Snapshot hand-off from the monitor loop to the API
    let (tx, rx) = watch::channel(Arc::new(MonitorSnapshot {
        period: config.monitor.period.clone(),
        interval: config.monitor.interval.clone(),
        ..Default::default()
    }));

    let source = Arc::new(YahooFinanceClient::new()?);
    let monitor = Monitor::new(source, config.monitor.clone(), Arc::new(LogNotifier));
    tokio::spawn(monitor.run(tx));

    let state = AppState {
        config: config.clone(),
        snapshot: rx,
    };

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = api::router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Tickwatch server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
