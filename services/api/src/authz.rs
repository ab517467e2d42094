//! Authorization gate
//!
//! Every handler asks [`authorize`] before touching storage. Role checks
//! live here and nowhere else.

use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{
        report::ReportScope,
        user::{Role, User},
    },
};

/// The caller resolved from a bearer token
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub id: Uuid,
    /// Used to attribute administrative actions in logs
    pub email: String,
    pub role: Role,
    pub banned: bool,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
            banned: user.is_banned,
        }
    }
}

/// Operations subject to authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// List reports; what is visible comes from [`report_scope`]
    ListReports,
    CreateReport,
    ReadReport { owner: Uuid },
    UpdateReport,
    DeleteReport,
    ViewReportStats,
    ListUsers,
    CountUsers,
    BanUser,
    ReadProfile,
}

/// Whether `identity` may perform `action`
pub fn can_access(identity: &Identity, action: Action) -> bool {
    if identity.banned {
        return false;
    }

    match action {
        Action::ListReports | Action::CreateReport | Action::ReadProfile => true,
        Action::ReadReport { owner } => identity.is_admin() || owner == identity.id,
        Action::UpdateReport
        | Action::DeleteReport
        | Action::ViewReportStats
        | Action::ListUsers
        | Action::CountUsers
        | Action::BanUser => identity.is_admin(),
    }
}

/// [`can_access`] as a handler guard
pub fn authorize(identity: &Identity, action: Action) -> Result<(), ApiError> {
    if can_access(identity, action) {
        return Ok(());
    }

    let message = if identity.banned {
        "User account is banned"
    } else if matches!(action, Action::ReadReport { .. }) {
        "Access denied"
    } else {
        "Admin access required"
    };
    Err(ApiError::Forbidden(message.to_string()))
}

/// Reports a caller may list: admins see everything, others their own
pub fn report_scope(identity: &Identity) -> ReportScope {
    if identity.is_admin() {
        ReportScope::All
    } else {
        ReportScope::OwnedBy(identity.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role) -> Identity {
        Identity {
            id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            role,
            banned: false,
        }
    }

    const ADMIN_ONLY: [Action; 6] = [
        Action::UpdateReport,
        Action::DeleteReport,
        Action::ViewReportStats,
        Action::ListUsers,
        Action::CountUsers,
        Action::BanUser,
    ];

    #[test]
    fn test_admin_only_actions() {
        let admin = identity(Role::Admin);
        for action in ADMIN_ONLY {
            assert!(can_access(&admin, action), "{action:?}");
            assert!(!can_access(&identity(Role::User), action), "{action:?}");
            assert!(!can_access(&identity(Role::Technician), action), "{action:?}");
        }
    }

    #[test]
    fn test_report_read_requires_owner_or_admin() {
        let owner = identity(Role::User);
        let stranger = identity(Role::Technician);
        let action = Action::ReadReport { owner: owner.id };

        assert!(can_access(&owner, action));
        assert!(!can_access(&stranger, action));
        assert!(can_access(&identity(Role::Admin), action));

        let err = authorize(&stranger, action).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(ref m) if m == "Access denied"));
    }

    #[test]
    fn test_banned_identity_is_denied_everything() {
        let mut admin = identity(Role::Admin);
        admin.banned = true;

        for action in [Action::ListReports, Action::CreateReport, Action::ReadProfile]
            .into_iter()
            .chain(ADMIN_ONLY)
        {
            assert!(!can_access(&admin, action), "{action:?}");
        }
    }

    #[test]
    fn test_report_scope_follows_role() {
        let user = identity(Role::User);
        assert_eq!(report_scope(&user), ReportScope::OwnedBy(user.id));
        assert_eq!(report_scope(&identity(Role::Admin)), ReportScope::All);
    }
}
