//! Common library for the water leakage reporting backend
//!
//! This crate provides the infrastructure shared by the API server and the
//! seeding tool: PostgreSQL connectivity, outbound mail delivery and the
//! error types those layers produce.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, init_pool, health_check};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = init_pool(&config).await?;
//!     let is_healthy = health_check(&pool).await?;
//!     println!("Database health check: {}", is_healthy);
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
pub mod mail;
