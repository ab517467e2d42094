//! PostgreSQL water report repository

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::{debug, info};
use uuid::Uuid;

use super::ReportRepository;
use crate::models::report::{
    IssueType, NewReport, Report, ReportChanges, ReportOwner, ReportScope, ReportStats,
    ReportStatus, ReportUpdate, Severity, tally,
};

/// Report columns plus the joined owner, selected from alias `r` joined to `u`
const REPORT_SELECT: &str = r#"
    r.id, r.user_id, r.issue_type, r.severity, r.description, r.location_address,
    r.latitude, r.longitude, r.image_base64_data, r.status, r.assigned_to,
    r.created_at, r.updated_at,
    u.email AS user_email, u.full_name AS user_full_name
"#;

/// Water report repository
#[derive(Clone)]
pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    /// Create a new report repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn group_counts(&self, column: &str) -> Result<Vec<(String, i64)>> {
        let sql = format!(
            "SELECT {column} AS key, COUNT(*) AS count FROM water_reports GROUP BY {column}"
        );
        let rows: Vec<(String, i64)> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }
}

fn report_from_row(row: &PgRow) -> Result<Report> {
    let user_id: Uuid = row.try_get("user_id")?;

    Ok(Report {
        id: row.try_get("id")?,
        user_id,
        user: ReportOwner {
            id: user_id,
            email: row.try_get("user_email")?,
            full_name: row.try_get("user_full_name")?,
        },
        issue_type: row.try_get::<String, _>("issue_type")?.parse()?,
        severity: row.try_get::<String, _>("severity")?.parse()?,
        description: row.try_get("description")?,
        location_address: row.try_get("location_address")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        image_base64_data: row.try_get("image_base64_data")?,
        status: row.try_get::<String, _>("status")?.parse()?,
        assigned_to: row.try_get("assigned_to")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn create(&self, new_report: &NewReport) -> Result<Report> {
        info!("Creating report for user: {}", new_report.user_id);

        let sql = format!(
            r#"
            WITH r AS (
                INSERT INTO water_reports (
                    id, user_id, issue_type, severity, description, location_address,
                    latitude, longitude, image_base64_data, status
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING *
            )
            SELECT {REPORT_SELECT}
            FROM r JOIN users u ON u.id = r.user_id
            "#
        );

        let row = sqlx::query(&sql)
            .bind(Uuid::new_v4())
            .bind(new_report.user_id)
            .bind(new_report.issue_type.as_str())
            .bind(new_report.severity.as_str())
            .bind(&new_report.description)
            .bind(&new_report.location_address)
            .bind(new_report.latitude)
            .bind(new_report.longitude)
            .bind(&new_report.image_base64_data)
            .bind(ReportStatus::Pending.as_str())
            .fetch_one(&self.pool)
            .await?;

        report_from_row(&row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>> {
        debug!("Finding report by ID: {}", id);

        let sql = format!(
            "SELECT {REPORT_SELECT} FROM water_reports r JOIN users u ON u.id = r.user_id WHERE r.id = $1"
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(report_from_row).transpose()
    }

    async fn list(&self, scope: ReportScope) -> Result<Vec<Report>> {
        let owner = match scope {
            ReportScope::All => None,
            ReportScope::OwnedBy(user_id) => Some(user_id),
        };

        let sql = format!(
            r#"
            SELECT {REPORT_SELECT}
            FROM water_reports r JOIN users u ON u.id = r.user_id
            WHERE ($1::uuid IS NULL OR r.user_id = $1)
            ORDER BY r.created_at DESC
            "#
        );
        let rows = sqlx::query(&sql).bind(owner).fetch_all(&self.pool).await?;

        rows.iter().map(report_from_row).collect()
    }

    async fn update(&self, id: Uuid, changes: &ReportChanges) -> Result<Option<ReportUpdate>> {
        info!("Updating report: {}", id);

        let sql = format!(
            r#"
            WITH prev AS (
                SELECT id AS target_id, status AS previous_status
                FROM water_reports
                WHERE id = $1
                FOR UPDATE
            ),
            r AS (
                UPDATE water_reports w
                SET status = COALESCE($2, w.status),
                    assigned_to = CASE WHEN $3 THEN $4 ELSE w.assigned_to END,
                    updated_at = NOW()
                FROM prev
                WHERE w.id = prev.target_id
                RETURNING w.*, prev.previous_status
            )
            SELECT {REPORT_SELECT}, r.previous_status
            FROM r JOIN users u ON u.id = r.user_id
            "#
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .bind(changes.status.map(|s| s.as_str()))
            .bind(changes.assigned_to.is_some())
            .bind(changes.assigned_to.clone().flatten())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| -> Result<ReportUpdate> {
            Ok(ReportUpdate {
                report: report_from_row(&row)?,
                previous_status: row.try_get::<String, _>("previous_status")?.parse()?,
            })
        })
        .transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        info!("Deleting report: {}", id);

        let result = sqlx::query("DELETE FROM water_reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn stats(&self, recent_limit: i64) -> Result<ReportStats> {
        let total_reports: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM water_reports")
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            r#"
            SELECT {REPORT_SELECT}
            FROM water_reports r JOIN users u ON u.id = r.user_id
            ORDER BY r.created_at DESC
            LIMIT $1
            "#
        );
        let recent = sqlx::query(&sql)
            .bind(recent_limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(ReportStats {
            total_reports,
            status_counts: tally(ReportStatus::ALL, self.group_counts("status").await?),
            severity_counts: tally(Severity::ALL, self.group_counts("severity").await?),
            issue_type_counts: tally(IssueType::ALL, self.group_counts("issue_type").await?),
            recent_reports: recent.iter().map(report_from_row).collect::<Result<_>>()?,
        })
    }
}
