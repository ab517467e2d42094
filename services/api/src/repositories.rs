//! Persistence adapter
//!
//! Handlers talk to storage through the [`UserRepository`] and
//! [`ReportRepository`] traits. The PostgreSQL bindings are used by the
//! server; the in-memory binding backs the test-suite.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    report::{NewReport, Report, ReportChanges, ReportScope, ReportStats, ReportUpdate},
    user::{BanUpdate, NewUser, User},
};

pub mod memory;
pub mod report;
pub mod user;

pub use memory::InMemoryStore;
pub use report::PgReportRepository;
pub use user::PgUserRepository;

/// Number of reports included in the statistics overview
pub const RECENT_REPORTS_LIMIT: i64 = 10;

/// User storage operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. Returns `None` when the email is already registered,
    /// compared case-insensitively.
    async fn create(&self, new_user: &NewUser) -> Result<Option<User>>;

    /// Find a user by email, ignoring case
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// All users, newest first
    async fn list(&self) -> Result<Vec<User>>;

    /// Number of registered users
    async fn count(&self) -> Result<i64>;

    /// Set the banned flag, reporting the previous flag read under the same
    /// row lock. Returns `None` when the user does not exist.
    async fn set_banned(&self, id: Uuid, banned: bool) -> Result<Option<BanUpdate>>;

    /// Check the backing store is reachable
    async fn health_check(&self) -> Result<bool>;
}

/// Water report storage operations
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Insert a report with status `PENDING`
    async fn create(&self, new_report: &NewReport) -> Result<Report>;

    /// Find a report by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>>;

    /// Reports visible in `scope`, newest first
    async fn list(&self, scope: ReportScope) -> Result<Vec<Report>>;

    /// Apply changes and refresh `updated_at`, reporting the status the row
    /// held when it was locked for the write. Returns `None` when absent.
    async fn update(&self, id: Uuid, changes: &ReportChanges) -> Result<Option<ReportUpdate>>;

    /// Delete a report. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Totals, per-enum counts and the most recent reports
    async fn stats(&self, recent_limit: i64) -> Result<ReportStats>;
}
