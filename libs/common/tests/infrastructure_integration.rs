//! Integration tests for the infrastructure components
//!
//! These need a reachable PostgreSQL instance (`DATABASE_URL`) and are
//! ignored by default. Run them with `cargo test -- --ignored`.

use common::{
    database::{DatabaseConfig, health_check, init_pool},
    mail::{EmailMessage, MailConfig, build_transport},
};
use sqlx::Row;

/// Verifies PostgreSQL is accessible and can run a query
#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_database_integration() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    let row = sqlx::query("SELECT 1 as result").fetch_one(&pool).await?;
    let result: i32 = row.get("result");
    assert_eq!(result, 1, "PostgreSQL simple query test failed");

    Ok(())
}

/// Verifies the transport selected by the environment accepts a message.
/// With `MAIL_FROM` set this sends a real email through SES to `MAIL_TEST_TO`.
#[tokio::test]
#[ignore = "may send real email"]
async fn test_mail_integration() -> Result<(), Box<dyn std::error::Error>> {
    let config = MailConfig::from_env();
    let transport = build_transport(&config).await;

    let to = std::env::var("MAIL_TEST_TO").unwrap_or_else(|_| "test@example.com".to_string());
    let message = EmailMessage {
        to,
        subject: "Water Leakage System mail check".to_string(),
        html: "<p>Mail delivery is working.</p>".to_string(),
        text: "Mail delivery is working.".to_string(),
    };

    transport.send(&message).await?;
    Ok(())
}
