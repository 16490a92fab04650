//! Server runtime: tracing setup, dependency wiring and the HTTP listener.

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::application::UserService;
use crate::config::AppConfig;
use crate::infrastructure::crypto::jwt::{JwtConfig, JwtService};
use crate::infrastructure::crypto::password::PasswordHasher;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::database::repositories::UserRepository;
use crate::infrastructure::init_database;
use crate::interfaces::http::{create_api_router, AppState};

/// Options for starting the service.
pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup.
    pub auto_migrate: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

/// Install the global tracing subscriber. `RUST_LOG` wins over the config.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

/// Build the token service once for the lifetime of the process.
///
/// Without a configured secret a random one is generated, which means tokens
/// stop verifying after a restart.
pub fn build_jwt_service(config: &AppConfig) -> JwtService {
    let mut jwt_config = config.jwt_config();
    if !jwt_config.has_secret() {
        warn!("No JWT secret configured; generated an ephemeral one");
        jwt_config = JwtConfig::generated(jwt_config.expiration_hours);
    }
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );
    JwtService::new(&jwt_config)
}

/// Connect, migrate, and serve until SIGINT/SIGTERM.
pub async fn run(options: ServerOptions) -> Result<(), Box<dyn std::error::Error>> {
    let config = options.config;

    let db = init_database(&config.database_config()).await?;
    if options.auto_migrate {
        info!("Running database migrations...");
        Migrator::up(&db, None).await?;
        info!("Migrations completed");
    }

    let repo = Arc::new(UserRepository::new(db.clone()));
    let jwt = Arc::new(build_jwt_service(&config));
    let hasher = PasswordHasher::new(config.security.bcrypt_cost);
    let users = Arc::new(UserService::new(repo, jwt, hasher));

    let router = create_api_router(AppState::new(users));

    let addr = config.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("Shutdown complete");
    Ok(())
}

/// Resolves on SIGTERM or SIGINT (Ctrl+C).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT signal (Ctrl+C)"),
        _ = terminate => info!("Received SIGTERM signal"),
    }
}
