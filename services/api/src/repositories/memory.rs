//! In-memory storage implementation

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ReportRepository, UserRepository};
use crate::models::{
    report::{
        IssueType, NewReport, Report, ReportChanges, ReportOwner, ReportScope, ReportStats,
        ReportStatus, ReportUpdate, Severity, tally,
    },
    user::{BanUpdate, NewUser, User},
};

/// In-memory storage for development and testing
///
/// Implements both repositories over one store so reports can join their
/// owner the way the SQL binding does.
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<Vec<User>>,
    reports: RwLock<Vec<Report>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change a user's role. Roles have no HTTP surface; tests and seeding
    /// promote accounts through this.
    pub async fn set_role(&self, id: Uuid, role: crate::models::user::Role) -> Option<User> {
        let mut users = self.users.write().await;
        let user = users.iter_mut().find(|u| u.id == id)?;
        user.role = role;
        user.updated_at = Utc::now();
        Some(user.clone())
    }

    fn owner_of(users: &[User], user_id: Uuid) -> Option<ReportOwner> {
        users.iter().find(|u| u.id == user_id).map(|u| ReportOwner {
            id: u.id,
            email: u.email.clone(),
            full_name: u.full_name.clone(),
        })
    }

    /// Reports matching `scope`, newest first, with the owner refreshed
    async fn snapshot(&self, scope: ReportScope) -> Vec<Report> {
        let users = self.users.read().await;
        let reports = self.reports.read().await;

        // Insertion order breaks ties between equal timestamps.
        let mut visible: Vec<Report> = reports
            .iter()
            .rev()
            .filter(|r| scope.includes(r))
            .cloned()
            .map(|mut r| {
                if let Some(owner) = Self::owner_of(&users, r.user_id) {
                    r.user = owner;
                }
                r
            })
            .collect();
        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        visible
    }
}

fn same_email(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, new_user: &NewUser) -> Result<Option<User>> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| same_email(&u.email, &new_user.email)) {
            return Ok(None);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email.clone(),
            full_name: new_user.full_name.clone(),
            password_hash: new_user.password_hash.clone(),
            role: new_user.role,
            is_banned: false,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(Some(user))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| same_email(&u.email, email)).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<User>> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.iter().rev().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.users.read().await.len() as i64)
    }

    async fn set_banned(&self, id: Uuid, banned: bool) -> Result<Option<BanUpdate>> {
        let mut users = self.users.write().await;
        Ok(users.iter_mut().find(|u| u.id == id).map(|user| {
            let was_banned = user.is_banned;
            user.is_banned = banned;
            user.updated_at = Utc::now();
            BanUpdate {
                user: user.clone(),
                was_banned,
            }
        }))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

#[async_trait]
impl ReportRepository for InMemoryStore {
    async fn create(&self, new_report: &NewReport) -> Result<Report> {
        let owner = {
            let users = self.users.read().await;
            Self::owner_of(&users, new_report.user_id)
        }
        .ok_or_else(|| anyhow::anyhow!("Owner {} does not exist", new_report.user_id))?;

        let now = Utc::now();
        let report = Report {
            id: Uuid::new_v4(),
            user_id: new_report.user_id,
            user: owner,
            issue_type: new_report.issue_type,
            severity: new_report.severity,
            description: new_report.description.clone(),
            location_address: new_report.location_address.clone(),
            latitude: new_report.latitude,
            longitude: new_report.longitude,
            image_base64_data: new_report.image_base64_data.clone(),
            status: ReportStatus::Pending,
            assigned_to: None,
            created_at: now,
            updated_at: now,
        };

        self.reports.write().await.push(report.clone());
        Ok(report)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>> {
        Ok(self
            .snapshot(ReportScope::All)
            .await
            .into_iter()
            .find(|r| r.id == id))
    }

    async fn list(&self, scope: ReportScope) -> Result<Vec<Report>> {
        Ok(self.snapshot(scope).await)
    }

    async fn update(&self, id: Uuid, changes: &ReportChanges) -> Result<Option<ReportUpdate>> {
        let previous_status = {
            let mut reports = self.reports.write().await;
            let Some(report) = reports.iter_mut().find(|r| r.id == id) else {
                return Ok(None);
            };
            let previous_status = report.status;

            if let Some(status) = changes.status {
                report.status = status;
            }
            if let Some(assigned_to) = &changes.assigned_to {
                report.assigned_to = assigned_to.clone();
            }
            report.updated_at = Utc::now();
            previous_status
        };

        Ok(ReportRepository::find_by_id(self, id)
            .await?
            .map(|report| ReportUpdate {
                report,
                previous_status,
            }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut reports = self.reports.write().await;
        let before = reports.len();
        reports.retain(|r| r.id != id);
        Ok(reports.len() < before)
    }

    async fn stats(&self, recent_limit: i64) -> Result<ReportStats> {
        let all = self.snapshot(ReportScope::All).await;
        let count_by = |key: fn(&Report) -> String| all.iter().map(move |r| (key(r), 1));

        Ok(ReportStats {
            total_reports: all.len() as i64,
            status_counts: tally(ReportStatus::ALL, count_by(|r| r.status.to_string())),
            severity_counts: tally(Severity::ALL, count_by(|r| r.severity.to_string())),
            issue_type_counts: tally(IssueType::ALL, count_by(|r| r.issue_type.to_string())),
            recent_reports: all
                .iter()
                .take(recent_limit.max(0) as usize)
                .cloned()
                .collect(),
        })
    }
}
