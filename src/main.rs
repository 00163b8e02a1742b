use anyhow::Result;
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use weather_station_web::{
    api::{self, AppState},
    config::Config,
    ingest::IngestService,
    ingest_log::IngestLog,
    report::ReportClock,
    report_store::ReportStore,
    status::{PageSettings, StatusService},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present; env vars may also be set externally
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    // Ingest and status page share one store for the report file
    let store = ReportStore::new(config.report_path.clone());
    info!(
        path = %config.report_path.display(),
        zone = %config.local_timezone,
        "Report store ready"
    );

    let ingest_log = config.ingest_log_path.clone().map(IngestLog::new);
    if let Some(path) = &config.ingest_log_path {
        info!(path = %path.display(), "Ingest payloads will be logged");
    }

    let ingest = IngestService::new(
        ReportClock::new(config.local_timezone, config.local_label.clone()),
        store.clone(),
        ingest_log,
    );
    let status = StatusService::new(
        store,
        PageSettings {
            label: config.local_label.clone(),
            zone: config.local_timezone.name().to_owned(),
            location: config.site_location.clone(),
            site_name: config.site_name.clone(),
            offset_note: config.offset_note.clone(),
            dst_note: config.dst_note.clone(),
        },
    );

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, api::router(AppState::new(ingest, status)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
