use deploy_hook::error::{DeployError, Result};
use deploy_hook::runner::ShellCommandRunner;
use deploy_hook::{AppState, HookConfig, api, load_config, logging};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

const DEFAULT_CONFIG_PATH: &str = "deploy_hook.toml";

/// Reads the config file named by `DEPLOY_HOOK_CONFIG` (or the default path,
/// if present) and applies the `BIND_ADDRESS` override.
fn resolve_config() -> Result<HookConfig> {
    let (config_path, required) = match std::env::var("DEPLOY_HOOK_CONFIG") {
        Ok(path) => (PathBuf::from(path), true),
        Err(_) => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
    };

    let mut config = load_config(&config_path, required)?;
    if let Ok(bind_address) = std::env::var("BIND_ADDRESS") {
        config.bind_address = bind_address;
    }
    Ok(config)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to register SIGTERM handler: {}", e);
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
    info!("Shutdown signal received, finishing in-flight requests");
}

async fn serve(config: HookConfig) -> Result<()> {
    let runner = Arc::new(ShellCommandRunner::new(
        config.working_dir.clone(),
        config.command_timeout(),
    ));
    let bind_address = config.bind_address.clone();
    let state = Arc::new(AppState::new(config, runner));
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .map_err(|source| DeployError::BindFailed {
            address: bind_address.clone(),
            source,
        })?;

    info!("Server is running on http://{}/", bind_address);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let config = match resolve_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // Held until exit so buffered file logs get flushed
    let log_guard = match logging::setup_logging(&config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Logging setup failed: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(dir) = &config.working_dir {
        info!("Deploying in {}", dir.display());
    }
    match config.command_timeout() {
        Some(timeout) => info!("Command timeout: {}s", timeout.as_secs()),
        None => info!("Command timeout disabled"),
    }

    let result = serve(config).await;
    if let Err(e) = &result {
        error!("{}", e);
    }
    drop(log_guard);
    if result.is_err() {
        std::process::exit(1);
    }
}
