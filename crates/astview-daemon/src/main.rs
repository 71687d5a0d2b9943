use std::env;

use astview_daemon::config::AppConfig;
use astview_daemon::config::loader::load_config;
use astview_daemon::context::AppContext;
use astview_daemon::reconciler::Reconciler;
use astview_daemon::{heartbeat, observability};
use astview_db_mysql::ViewManager;

/// How the configuration path was determined.
#[derive(Debug, Clone, Copy)]
enum ConfigSource {
    /// From --config CLI argument
    CliArgument,
    /// From ASTVIEW_CONFIG environment variable
    EnvironmentVariable,
    /// Default path (astview.toml)
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CliArgument => write!(f, "CLI argument (--config)"),
            Self::EnvironmentVariable => write!(f, "environment variable (ASTVIEW_CONFIG)"),
            Self::Default => write!(f, "default"),
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present (before anything else reads the environment)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist - it's optional
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    // Initialize tracing early with the startup level
    observability::init_tracing();

    // Parse config path from CLI, environment, or use default
    let (config_path, source) = resolve_config_path();

    let config = match load_config(Some(&config_path)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    observability::apply_debug_flag(config.debug);

    tracing::info!(
        path = %config_path,
        source = %source,
        "Configuration loaded"
    );

    // Everything past configuration runs inside one error boundary; a
    // failure that escapes ends the process for the supervisor to restart.
    if let Err(err) = run(config).await {
        tracing::error!(error = %err, "Fatal error, shutting down");
        std::process::exit(1);
    }
}

/// Starts the heartbeat and the reconciliation loop.
///
/// Never returns in a healthy process: the reconciler runs for the process
/// lifetime and exit code 0 is never produced.
async fn run(config: AppConfig) -> anyhow::Result<()> {
    let context = AppContext::initialize(config).await?;

    tokio::spawn(heartbeat::run(context.pool.clone()));

    let reconciler = Reconciler::new(ViewManager::new(context.pool.clone()), context.host.clone());
    reconciler.run(context.config.update_interval()).await;

    Ok(())
}

/// Resolve the configuration file path.
///
/// Priority order:
/// 1. CLI argument: --config <path>
/// 2. Environment variable: ASTVIEW_CONFIG
/// 3. Default: astview.toml
fn resolve_config_path() -> (String, ConfigSource) {
    // 1. Check CLI: --config <path>
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            if let Some(path) = args.next() {
                return (path, ConfigSource::CliArgument);
            }
        }
    }

    // 2. Check environment variable
    if let Ok(path) = env::var("ASTVIEW_CONFIG") {
        if !path.is_empty() {
            return (path, ConfigSource::EnvironmentVariable);
        }
    }

    // 3. Default to astview.toml
    ("astview.toml".to_string(), ConfigSource::Default)
}
