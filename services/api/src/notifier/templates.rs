//! Email bodies for report and account notifications

use common::mail::EmailMessage;

use crate::models::{
    report::{Report, ReportStatus, Severity},
    user::User,
};

const RESOLVED_NOTE: &str =
    "Great news! Your report has been resolved. Thank you for helping keep our community safe!";
const IN_PROGRESS_NOTE: &str =
    "Our team is actively working on resolving this issue. We'll keep you updated on the progress.";

pub fn status_label(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::Pending => "Pending Review",
        ReportStatus::InProgress => "In Progress",
        ReportStatus::Resolved => "Resolved",
    }
}

pub fn status_color(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::Pending => "#ffc107",
        ReportStatus::InProgress => "#007bff",
        ReportStatus::Resolved => "#28a745",
    }
}

pub fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Low => "#28a745",
        Severity::Medium => "#ffc107",
        Severity::High => "#fd7e14",
        Severity::Critical => "#dc3545",
    }
}

/// Escape text for inclusion in HTML element content or attribute values
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn greeting_name<'a>(full_name: Option<&'a str>, email: &'a str) -> &'a str {
    full_name.filter(|n| !n.trim().is_empty()).unwrap_or(email)
}

fn status_note(status: ReportStatus) -> Option<(&'static str, &'static str, &'static str)> {
    match status {
        ReportStatus::Resolved => Some(("#d4edda", "#155724", RESOLVED_NOTE)),
        ReportStatus::InProgress => Some(("#cce5ff", "#004085", IN_PROGRESS_NOTE)),
        ReportStatus::Pending => None,
    }
}

/// Message telling a report owner their report moved from `previous` to its
/// current status
pub fn report_status_email(report: &Report, previous: ReportStatus) -> EmailMessage {
    let name = greeting_name(report.user.full_name.as_deref(), &report.user.email);
    let issue_type = report.issue_type.as_str().replace('_', " ");
    let location = report
        .location_address
        .as_deref()
        .unwrap_or("GPS coordinates provided");
    let note = status_note(report.status);

    let note_html = note
        .map(|(background, color, text)| {
            format!(
                r#"<div style="background: {background}; border-radius: 4px; padding: 15px; margin-top: 15px;"><p style="color: {color}; margin: 0;">{text}</p></div>"#
            )
        })
        .unwrap_or_default();

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
<div style="background: #667eea; padding: 30px; text-align: center;"><h1 style="color: white; margin: 0; font-size: 24px;">Water Leakage Report Update</h1></div>
<div style="padding: 30px; background-color: #f8f9fa;">
<h2 style="color: #333;">Hello {name},</h2>
<p style="color: #666; font-size: 16px;">Your water leakage report has been updated with a new status.</p>
<div style="background: white; border-radius: 8px; padding: 20px; margin: 20px 0;">
<h3 style="margin-top: 0;">Report Details:</h3>
<p><strong>Report ID:</strong> {id}</p>
<p><strong>Issue Type:</strong> {issue_type}</p>
<p><strong>Description:</strong> {description}</p>
<p><strong>Location:</strong> {location}</p>
<p><strong>Severity:</strong> <span style="color: {severity_color}; font-weight: bold;">{severity}</span></p>
</div>
<div style="background: white; border-radius: 8px; padding: 20px; margin: 20px 0;">
<h3 style="margin-top: 0;">Status Update:</h3>
<p style="font-size: 18px;"><span style="color: #999; text-decoration: line-through;">{old_label}</span> &rarr; <span style="color: {new_color}; font-weight: bold;">{new_label}</span></p>
{note_html}
</div>
<p style="color: #666; font-size: 14px; text-align: center;">Thank you for using our Water Leakage Reporting System.</p>
</div>
<div style="background: #333; padding: 20px; text-align: center;"><p style="color: #999; margin: 0; font-size: 12px;">This is an automated message. Please do not reply to this email.</p></div>
</div>"#,
        name = escape_html(name),
        id = report.id,
        issue_type = escape_html(&issue_type),
        description = escape_html(&report.description),
        location = escape_html(location),
        severity_color = severity_color(report.severity),
        severity = report.severity,
        old_label = status_label(previous),
        new_color = status_color(report.status),
        new_label = status_label(report.status),
    );

    let mut text = format!(
        "Hello {name},\n\nYour water leakage report {id} has been updated.\n\
         Issue type: {issue_type}\nSeverity: {severity}\nLocation: {location}\n\
         Status: {old} -> {new}\n",
        id = report.id,
        severity = report.severity,
        old = status_label(previous),
        new = status_label(report.status),
    );
    if let Some((_, _, note)) = note {
        text.push('\n');
        text.push_str(note);
        text.push('\n');
    }

    EmailMessage {
        to: report.user.email.clone(),
        subject: format!("Water Report Status Update - {}", report.id),
        html,
        text,
    }
}

/// Message telling a user their account was suspended or reactivated
pub fn ban_state_email(user: &User, banned: bool) -> EmailMessage {
    let name = greeting_name(user.full_name.as_deref(), &user.email);

    let (subject, header_color, title, body_color, summary, closing) = if banned {
        (
            "Account Suspended - Water Leakage System",
            "#dc3545",
            "Account Suspended",
            "#721c24",
            "Your account has been suspended by our administrative team. You will no longer be able to submit reports or access your account.",
            "If you believe this action was taken in error, please contact our support team for assistance.",
        )
    } else {
        (
            "Account Reactivated - Water Leakage System",
            "#28a745",
            "Account Reactivated",
            "#155724",
            "Good news! Your account has been reactivated. You can submit water leakage reports and use all app features again.",
            "Thank you for your patience, and welcome back to our community!",
        )
    };

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
<div style="background: {header_color}; padding: 30px; text-align: center;"><h1 style="color: white; margin: 0; font-size: 24px;">{title}</h1></div>
<div style="padding: 30px; background-color: #f8f9fa;">
<h2 style="color: #333;">Hello {name},</h2>
<div style="border-radius: 4px; padding: 20px; margin: 20px 0;">
<p style="color: {body_color}; margin: 0;">{summary}</p>
<p style="color: {body_color}; margin: 10px 0 0 0;">{closing}</p>
</div>
</div>
<div style="background: #333; padding: 20px; text-align: center;"><p style="color: #999; margin: 0; font-size: 12px;">This is an automated message. Please do not reply to this email.</p></div>
</div>"#,
        name = escape_html(name),
    );

    EmailMessage {
        to: user.email.clone(),
        subject: subject.to_string(),
        html,
        text: format!("Hello {name},\n\n{summary}\n\n{closing}\n"),
    }
}
