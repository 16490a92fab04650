//! User authentication service: HTTP server binary
//!
//! ```sh
//! # Run with default config (~/.config/user-auth/config.toml)
//! user-auth-service
//!
//! # Custom config path and port
//! user-auth-service --config /etc/user-auth/config.toml --port 8081
//!
//! # Validate config without starting
//! user-auth-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use user_auth::server::{init_tracing, run, ServerOptions};
use user_auth::{default_config_path, AppConfig};

/// Authentication service: registration, login and JWT validation.
#[derive(Parser, Debug)]
#[command(name = "user-auth-service", version, about)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "USER_AUTH_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    init_tracing(&config);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            if cli.check {
                return Err(e.into());
            }
            error!("Using default configuration.");
        }
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        config.validate()?;
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.server.address());
        println!("   Database    : {}", config.database.url);
        println!("   Token TTL   : {}h", config.security.jwt_expiration_hours);
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    info!("Starting user authentication service...");
    run(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await
}
