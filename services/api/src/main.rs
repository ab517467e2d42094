use std::sync::Arc;

use anyhow::Result;
use common::{
    database::{DatabaseConfig, init_pool},
    mail::{MailConfig, build_transport},
};
use tokio::net::TcpListener;
use tracing::info;

use leakage_api::{
    AppState,
    config::ServerConfig,
    init_tracing,
    jwt::{JwtConfig, JwtService},
    notifier::Notifier,
    password::{PasswordConfig, PasswordService},
    repositories::{PgReportRepository, PgUserRepository},
    routes, run_migrations,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    info!("Starting API service");

    let server_config = ServerConfig::from_env()?;
    let jwt_config = JwtConfig::from_env()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    run_migrations(&pool).await?;
    info!("Database migrations applied");

    let transport = build_transport(&MailConfig::from_env()).await;

    let app_state = AppState {
        users: Arc::new(PgUserRepository::new(pool.clone())),
        reports: Arc::new(PgReportRepository::new(pool)),
        jwt: JwtService::new(jwt_config),
        passwords: PasswordService::new(PasswordConfig::from_env())?,
        notifier: Notifier::new(transport),
    };

    let app = routes::create_router(app_state, server_config.max_body_bytes);

    let address = server_config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("API service listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
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
