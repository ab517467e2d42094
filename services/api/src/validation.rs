//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;
use uuid::Uuid;

use crate::models::report::{
    CreateReportRequest, IssueType, NewReport, ReportChanges, ReportStatus, Severity,
    UpdateReportRequest,
};

/// Trim and lower-case an email address so lookups are case-insensitive
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Trim an optional text field, mapping blank values to `None`
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.chars().count() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate a report creation request and bind it to its owner
///
/// Every missing required field is named in a single message.
pub fn validate_new_report(request: CreateReportRequest, owner: Uuid) -> Result<NewReport, String> {
    let issue_type = non_blank(request.issue_type);
    let severity = non_blank(request.severity);
    let description = non_blank(request.description);

    let missing: Vec<&str> = [
        ("issue_type", issue_type.is_none()),
        ("severity", severity.is_none()),
        ("description", description.is_none()),
    ]
    .into_iter()
    .filter_map(|(field, absent)| absent.then_some(field))
    .collect();

    let (Some(issue_type), Some(severity), Some(description)) = (issue_type, severity, description)
    else {
        return Err(format!("Missing required field(s): {}", missing.join(", ")));
    };

    let issue_type: IssueType = issue_type.parse().map_err(|e| {
        format!(
            "{} (expected one of {})",
            e,
            expected(IssueType::ALL.iter().map(IssueType::as_str))
        )
    })?;
    let severity: Severity = severity.parse().map_err(|e| {
        format!(
            "{} (expected one of {})",
            e,
            expected(Severity::ALL.iter().map(Severity::as_str))
        )
    })?;

    if let Some(latitude) = request.latitude {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err("latitude must be between -90 and 90".to_string());
        }
    }
    if let Some(longitude) = request.longitude {
        if !(-180.0..=180.0).contains(&longitude) {
            return Err("longitude must be between -180 and 180".to_string());
        }
    }

    Ok(NewReport {
        user_id: owner,
        issue_type,
        severity,
        description,
        location_address: non_blank(request.location_address),
        latitude: request.latitude,
        longitude: request.longitude,
        image_base64_data: request.image_base64_data.unwrap_or_default(),
    })
}

/// Validate a report update request
pub fn parse_report_changes(request: UpdateReportRequest) -> Result<ReportChanges, String> {
    let status = match non_blank(request.status) {
        Some(raw) => Some(raw.to_uppercase().parse::<ReportStatus>().map_err(|_| {
            format!(
                "Invalid status provided. Must be {}.",
                expected(ReportStatus::ALL.iter().map(ReportStatus::as_str))
            )
        })?),
        None => None,
    };

    let changes = ReportChanges {
        status,
        assigned_to: request.assigned_to.map(non_blank),
    };

    if changes.is_empty() {
        return Err("No updateable fields provided (status, assigned_to).".to_string());
    }

    Ok(changes)
}

fn expected<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let values: Vec<&str> = values.collect();
    match values.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{}, or {}", rest.join(", "), last),
        Some((last, _)) => last.to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateReportRequest {
        CreateReportRequest {
            issue_type: Some("LEAKAGE".to_string()),
            severity: Some("HIGH".to_string()),
            description: Some("leak".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert_eq!(normalize_email("  A@X.Com "), "a@x.com");
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret123").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_valid_report_is_bound_to_owner() {
        let owner = Uuid::new_v4();
        let report = validate_new_report(create_request(), owner).unwrap();
        assert_eq!(report.user_id, owner);
        assert_eq!(report.issue_type, IssueType::Leakage);
        assert_eq!(report.severity, Severity::High);
        assert!(report.image_base64_data.is_empty());
    }

    #[test]
    fn test_missing_report_fields_are_all_named() {
        let request = CreateReportRequest {
            description: Some("   ".to_string()),
            ..Default::default()
        };
        let err = validate_new_report(request, Uuid::new_v4()).unwrap_err();
        assert_eq!(
            err,
            "Missing required field(s): issue_type, severity, description"
        );
    }

    #[test]
    fn test_invalid_report_enums_are_rejected() {
        let request = CreateReportRequest {
            severity: Some("APOCALYPTIC".to_string()),
            ..create_request()
        };
        let err = validate_new_report(request, Uuid::new_v4()).unwrap_err();
        assert!(err.starts_with("invalid severity: APOCALYPTIC"), "{err}");
        assert!(err.contains("LOW, MEDIUM, HIGH, or CRITICAL"), "{err}");

        let request = CreateReportRequest {
            issue_type: Some("leakage".to_string()),
            ..create_request()
        };
        assert!(validate_new_report(request, Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_coordinates_out_of_range_are_rejected() {
        let request = CreateReportRequest {
            latitude: Some(91.0),
            ..create_request()
        };
        assert!(validate_new_report(request, Uuid::new_v4()).is_err());

        let request = CreateReportRequest {
            latitude: Some(40.71),
            longitude: Some(-74.00),
            ..create_request()
        };
        let report = validate_new_report(request, Uuid::new_v4()).unwrap();
        assert_eq!(report.latitude, Some(40.71));
        assert_eq!(report.longitude, Some(-74.00));
    }

    #[test]
    fn test_status_is_case_normalized() {
        let changes = parse_report_changes(UpdateReportRequest {
            status: Some(" in_progress ".to_string()),
            assigned_to: None,
        })
        .unwrap();
        assert_eq!(changes.status, Some(ReportStatus::InProgress));
        assert_eq!(changes.assigned_to, None);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = parse_report_changes(UpdateReportRequest {
            status: Some("CLOSED".to_string()),
            assigned_to: None,
        })
        .unwrap_err();
        assert_eq!(
            err,
            "Invalid status provided. Must be PENDING, IN_PROGRESS, or RESOLVED."
        );
    }

    #[test]
    fn test_empty_assignee_clears_assignment() {
        let changes = parse_report_changes(UpdateReportRequest {
            status: None,
            assigned_to: Some(Some("".to_string())),
        })
        .unwrap();
        assert_eq!(changes.assigned_to, Some(None));

        let changes = parse_report_changes(UpdateReportRequest {
            status: None,
            assigned_to: Some(None),
        })
        .unwrap();
        assert_eq!(changes.assigned_to, Some(None));
    }

    #[test]
    fn test_update_without_fields_is_rejected() {
        assert!(parse_report_changes(UpdateReportRequest::default()).is_err());
    }
}
