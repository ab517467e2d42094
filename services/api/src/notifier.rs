//! Email notifications for report status and account changes
//!
//! Delivery is best effort: failures are logged and never surface to the
//! caller, so a mail outage cannot fail an update that was already stored.

use std::sync::Arc;

use common::mail::MailTransport;
use tracing::{error, info};

use crate::models::{
    report::{Report, ReportStatus},
    user::User,
};

pub mod templates;

/// Sends notification emails through the configured transport
#[derive(Clone)]
pub struct Notifier {
    transport: Arc<dyn MailTransport>,
}

impl Notifier {
    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Self { transport }
    }

    /// Tell the report owner the status moved away from `previous`
    pub async fn report_status_changed(&self, report: &Report, previous: ReportStatus) {
        let message = templates::report_status_email(report, previous);
        match self.transport.send(&message).await {
            Ok(()) => info!(
                "Status update email sent to {} for report {} via {}",
                message.to,
                report.id,
                self.transport.name()
            ),
            Err(e) => error!(
                "Failed to send status update email for report {}: {}",
                report.id, e
            ),
        }
    }

    /// Tell a user their account was suspended (`banned`) or reactivated
    pub async fn ban_state_changed(&self, user: &User, banned: bool) {
        let kind = if banned { "Ban" } else { "Unban" };
        let message = templates::ban_state_email(user, banned);
        match self.transport.send(&message).await {
            Ok(()) => info!("{} notification email sent to {}", kind, message.to),
            Err(e) => error!("Failed to send {} notification to {}: {}", kind, message.to, e),
        }
    }
}
