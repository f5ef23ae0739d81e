use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use telemetry_dash::backend::BackendClient;
use telemetry_dash::common::AppState;
use telemetry_dash::config::Config;
use telemetry_dash::dashboard::{Command, Dashboard, LogView};
use telemetry_dash::weather::WeatherClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration (fail-fast)
    let config = Config::from_env()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,telemetry_dash=debug".into());
    if config.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!(
        dashboard = %config.dashboard_url,
        poll_interval_ms = config.poll_interval_ms,
        time_range = %config.initial_time_range,
        "Configuration loaded"
    );

    let backend = BackendClient::new(&config)?;
    let weather = WeatherClient::new(&config)?;
    let state = AppState::new(config, Arc::new(backend), Arc::new(weather), Arc::new(LogView));

    let mut dashboard = Dashboard::new(state);
    dashboard.start().await;

    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(read_commands(tx));

    tokio::select! {
        () = dashboard.run(rx) => {},
        () = shutdown_signal() => {},
    }

    tracing::info!("Dashboard shut down");
    Ok(())
}

/// Forward stdin lines as commands until EOF or `quit`.
async fn read_commands(tx: mpsc::Sender<Command>) {
    tracing::info!("Commands: device <id>|none, range day|week, advice, close, quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read stdin");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") {
            break;
        }

        match line.parse::<Command>() {
            Ok(command) => {
                if tx.send(command).await.is_err() {
                    break;
                }
            }
            Err(e) => tracing::warn!(error = %e, "Ignoring input"),
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        },
    }
}
