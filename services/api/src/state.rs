//! Application state shared across handlers

use std::sync::Arc;

use crate::{
    jwt::JwtService,
    notifier::Notifier,
    password::PasswordService,
    repositories::{ReportRepository, UserRepository},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub reports: Arc<dyn ReportRepository>,
    pub jwt: JwtService,
    pub passwords: PasswordService,
    pub notifier: Notifier,
}
