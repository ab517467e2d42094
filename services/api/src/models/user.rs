//! User model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

text_enum! {
    /// Application role controlling permitted operations
    Role: "role" {
        User => "USER",
        Admin => "ADMIN",
        Technician => "TECHNICIAN",
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub password_hash: String,
    pub role: Role,
    pub is_banned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user creation payload; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub full_name: Option<String>,
    pub password_hash: String,
    pub role: Role,
}

/// A ban flag change and the flag it replaced
#[derive(Debug, Clone)]
pub struct BanUpdate {
    pub user: User,
    pub was_banned: bool,
}

/// Public view of a user. Never carries the credential.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub is_banned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            is_banned: user.is_banned,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse::from(&user)
    }
}

/// Request for user registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
}

/// Request for user login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Response for register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Request to ban or unban a user
#[derive(Debug, Deserialize)]
pub struct BanRequest {
    pub is_banned: Option<bool>,
}

/// Response for the user count endpoint
#[derive(Debug, Serialize)]
pub struct UserCountResponse {
    pub count: i64,
}
