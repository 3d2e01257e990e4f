//! Pomodoro widget - shared-state bridge and countdown widget host
//!
//! This is the main entry point for the pomodoro-widget application.

use std::sync::Arc;
use chrono::Utc;
use tokio::net::TcpListener;
use tracing::info;

use pomodoro_widget::{
    api::create_router,
    bridge::{StateWriter, TimerUpdate},
    config::{Command, Config, ServeArgs},
    services::LogNotifier,
    state::{AppState, AppStateOptions},
    store::FileStore,
    tasks::widget_host_task,
    utils::shutdown_signal,
    widget::{render, TimelineProvider},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro_widget={},tower_http=info", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    config.validate()?;

    let store = Arc::new(FileStore::new(&config.container_root, config.app_group.clone()));

    match config.command() {
        Command::Serve(args) => serve(&config, store, args).await,
        Command::Link => {
            let container = store.link()?;
            println!("{}", container.display());
            Ok(())
        }
        Command::Update(args) => {
            let writer = StateWriter::new(store, Arc::new(LogNotifier))
                .with_drift_tolerance(config.drift_tolerance)
                .with_widget_kind(config.widget_kind.clone());
            let snapshot = writer.update(TimerUpdate::from(args), Utc::now())?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            Ok(())
        }
        Command::Query => {
            let writer = StateWriter::new(store, Arc::new(LogNotifier));
            println!("{}", serde_json::to_string_pretty(&writer.query(Utc::now()))?);
            Ok(())
        }
        Command::Render => {
            let provider = TimelineProvider::new(store, config.fallback_refresh());
            let now = Utc::now();
            let timeline = provider.timeline(now);
            if let Some(entry) = timeline.current(now) {
                println!("{}", render(entry, now));
            }
            println!("next refresh: {}", timeline.refresh_after.to_rfc3339());
            Ok(())
        }
    }
}

async fn serve(config: &Config, store: Arc<FileStore>, args: ServeArgs) -> anyhow::Result<()> {
    info!("Starting pomodoro-widget bridge v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: group={}, container={}, drift_tolerance={}s, fallback_refresh={}s",
        config.app_group,
        store.container().display(),
        config.drift_tolerance,
        config.fallback_refresh
    );

    if !store.is_linked() {
        tracing::warn!(
            "Group container {} missing; updates will fail until `pomodoro-widget link` is run",
            store.container().display()
        );
    }

    let state = Arc::new(AppState::new(
        store,
        AppStateOptions {
            port: args.port,
            host: args.host.clone(),
            widget_kind: config.widget_kind.clone(),
            drift_tolerance: config.drift_tolerance,
            fallback_refresh: config.fallback_refresh(),
        },
    ));

    // Start the widget host background task
    let host_state = Arc::clone(&state);
    tokio::spawn(async move {
        widget_host_task(host_state).await;
    });

    let app = create_router(state);

    let addr = args.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /widget/update - Write timer state for the widget");
    info!("  GET  /widget/state  - Effective timer state");
    info!("  GET  /widget/entry  - What the widget currently shows");
    info!("  POST /widget/reload - Ask the widget to re-render");
    info!("  GET  /status        - Bridge status");
    info!("  GET  /health        - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        signal = shutdown_signal() => {
            info!("Shutdown signal {} received", signal);
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
