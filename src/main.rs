use anyhow::{Context, Result};
use dangan::core::config::{Config, DEFAULT_CONFIG_FILE};
use dangan::core::state::AppContext;
use dangan::core::tracing_init::init_tracing;
use dangan::session::menu::{run_menu, INTERRUPTED_MESSAGE};
use dangan::session::terminal::StdTerminal;
use std::path::Path;
use tokio::signal;
use tracing::{error, info};

fn main() -> Result<()> {
    let config_path = Path::new(DEFAULT_CONFIG_FILE);

    // Load and validate configuration
    let config = Config::load_or_default(config_path).context(format!(
        "Failed to load configuration from '{}'",
        config_path.display()
    ))?;

    // Initialize tracing/logging
    let logging = init_tracing(&config.logging).context("Failed to initialize logging")?;
    let ctx = AppContext::new(config, logging);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?;

    let result = runtime.block_on(async_main(ctx));

    // After Ctrl+C the session thread is still parked on stdin; don't wait for it
    runtime.shutdown_background();

    result
}

async fn async_main(ctx: AppContext) -> Result<()> {
    info!(
        data_file = %ctx.store.path().display(),
        log_file = ?ctx.logging.file(),
        logger = %ctx.logging.logger_name(),
        "User management system starting"
    );

    let store = ctx.store.clone();
    let session = tokio::task::spawn_blocking(move || {
        let mut terminal = StdTerminal::new();
        run_menu(&store, &mut terminal)
    });

    tokio::select! {
        joined = session => {
            match joined {
                Ok(exit) => {
                    info!(exit = ?exit, "Session ended");
                }
                Err(e) => {
                    eprintln!("\nFatal error: {}", e);
                    error!(critical = true, error = ?e, "Session thread failed");
                }
            }
        }
        _ = shutdown_signal() => {
            println!("\n\n{}", INTERRUPTED_MESSAGE);
            info!("User management system interrupted by user (Ctrl+C)");
        }
    }

    Ok(())
}

/// Wait for Ctrl+C
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}
