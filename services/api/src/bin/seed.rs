//! Populate an empty database with demo accounts and reports
//!
//! Set `SEED_RESET=true` to wipe both tables first.

use anyhow::{Context, Result};
use common::database::{DatabaseConfig, init_pool};
use tracing::info;
use uuid::Uuid;

use leakage_api::{
    init_tracing,
    models::{
        report::{IssueType, NewReport, ReportChanges, ReportStatus, Severity},
        user::{NewUser, Role},
    },
    password::{PasswordConfig, PasswordService},
    repositories::{
        PgReportRepository, PgUserRepository, ReportRepository, UserRepository,
    },
    run_migrations,
};

struct SampleReport {
    owner: usize,
    issue_type: IssueType,
    severity: Severity,
    description: &'static str,
    address: &'static str,
    latitude: f64,
    longitude: f64,
    status: ReportStatus,
    assigned_to: Option<&'static str>,
}

const SAMPLE_REPORTS: [SampleReport; 5] = [
    SampleReport {
        owner: 0,
        issue_type: IssueType::Leakage,
        severity: Severity::High,
        description: "Major pipe leak on Main Street causing road flooding",
        address: "123 Main Street, Downtown",
        latitude: 40.7128,
        longitude: -74.0060,
        status: ReportStatus::Pending,
        assigned_to: Some("John Technician"),
    },
    SampleReport {
        owner: 1,
        issue_type: IssueType::WaterQualityProblem,
        severity: Severity::Critical,
        description: "Brown water coming from tap, possible contamination",
        address: "456 Oak Avenue, Residential Area",
        latitude: 40.7589,
        longitude: -73.9851,
        status: ReportStatus::InProgress,
        assigned_to: Some("John Technician"),
    },
    SampleReport {
        owner: 2,
        issue_type: IssueType::Leakage,
        severity: Severity::Medium,
        description: "Small leak under kitchen sink",
        address: "789 Pine Street, Suburb",
        latitude: 40.6892,
        longitude: -74.0445,
        status: ReportStatus::Resolved,
        assigned_to: None,
    },
    SampleReport {
        owner: 3,
        issue_type: IssueType::Other,
        severity: Severity::Low,
        description: "Water pressure is very low in the bathroom",
        address: "321 Elm Street, Uptown",
        latitude: 40.7831,
        longitude: -73.9712,
        status: ReportStatus::Pending,
        assigned_to: None,
    },
    SampleReport {
        owner: 4,
        issue_type: IssueType::Leakage,
        severity: Severity::Critical,
        description: "Burst water main flooding the street",
        address: "654 Maple Drive, Industrial District",
        latitude: 40.7282,
        longitude: -74.0776,
        status: ReportStatus::InProgress,
        assigned_to: Some("John Technician"),
    },
];

async fn create_user(
    users: &PgUserRepository,
    passwords: &PasswordService,
    email: &str,
    password: &str,
    full_name: &str,
    role: Role,
) -> Result<Uuid> {
    let new_user = NewUser {
        email: email.to_string(),
        full_name: Some(full_name.to_string()),
        password_hash: passwords.hash(password).await?,
        role,
    };

    let user = users
        .create(&new_user)
        .await?
        .with_context(|| format!("User {} already exists", email))?;
    info!("Created {} user {}", role, email);
    Ok(user.id)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;
    run_migrations(&pool).await?;

    let reset = std::env::var("SEED_RESET")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let users = PgUserRepository::new(pool.clone());
    let reports = PgReportRepository::new(pool.clone());
    let passwords = PasswordService::new(PasswordConfig::from_env())?;

    if reset {
        sqlx::query("TRUNCATE water_reports, users")
            .execute(&pool)
            .await
            .context("Failed to clear existing data")?;
        info!("Cleared existing data");
    } else if users.count().await? > 0 {
        info!("Database already contains users, skipping seed (set SEED_RESET=true to reseed)");
        return Ok(());
    }

    create_user(
        &users,
        &passwords,
        "admin@leakageapp.com",
        "admin123",
        "System Administrator",
        Role::Admin,
    )
    .await?;
    create_user(
        &users,
        &passwords,
        "technician@leakageapp.com",
        "tech123",
        "John Technician",
        Role::Technician,
    )
    .await?;

    let mut owners = Vec::with_capacity(5);
    for i in 1..=5 {
        let id = create_user(
            &users,
            &passwords,
            &format!("user{i}@example.com"),
            &format!("user{i}123"),
            &format!("User {i}"),
            Role::User,
        )
        .await?;
        owners.push(id);
    }

    for sample in &SAMPLE_REPORTS {
        let report = reports
            .create(&NewReport {
                user_id: owners[sample.owner],
                issue_type: sample.issue_type,
                severity: sample.severity,
                description: sample.description.to_string(),
                location_address: Some(sample.address.to_string()),
                latitude: Some(sample.latitude),
                longitude: Some(sample.longitude),
                image_base64_data: Vec::new(),
            })
            .await?;

        let changes = ReportChanges {
            status: Some(sample.status).filter(|s| *s != ReportStatus::Pending),
            assigned_to: sample.assigned_to.map(|a| Some(a.to_string())),
        };
        if !changes.is_empty() {
            reports.update(report.id, &changes).await?;
        }
    }
    info!("Created {} sample water reports", SAMPLE_REPORTS.len());

    info!("Database seeded successfully");
    info!("Admin: admin@leakageapp.com / admin123");
    info!("Technician: technician@leakageapp.com / tech123");
    info!("Users: user1@example.com to user5@example.com / user1123 to user5123");

    Ok(())
}
