// Policy scanner entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config (auto-copying defaults on first run)
// 3. Load the stored API key, if any
// 4. Build the API client
// 5. Create mpsc channels
// 6. Spawn app logic task
// 7. Run the TUI event loop until the user quits
// 8. Cleanup on exit

use policy_scanner::api::ApiClient;
use policy_scanner::app;
use policy_scanner::config;
use policy_scanner::keystore::KeyStore;
use policy_scanner::tui;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("Policy scanner starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: server={}, api {}, page size {}",
        config.server.base_url, config.server.api_version, config.ui.page_size
    );

    // 3. Load the stored API key, if any
    let keystore = KeyStore::new(&config.credentials_path);
    let api_key = keystore.load();
    match &api_key {
        Some(_) => info!("API key loaded from {}", keystore.path().display()),
        None => info!("No API key stored, running in demo mode"),
    }

    // 4. Build the API client
    let api = ApiClient::new(
        config.server.base_url.clone(),
        config.server.api_version.clone(),
        api_key,
    );

    // 5. Create mpsc channels
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let app_state = app::AppState::new(config.clone(), api, keystore);

    // 6. Spawn app logic task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 7. Run the TUI event loop (blocking until user quits)
    // The TUI consumes ui_rx and sends commands through cmd_tx.
    if let Err(e) = tui::run(ui_rx, cmd_tx, config).await {
        error!("TUI error: {}", e);
    }

    // 8. Cleanup: wait for app task to finish (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("Policy scanner shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("policyscan.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("policy_scanner=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
