//! Shared harness for router tests: in-memory storage, a recording mail
//! transport and cheap password hashing.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use axum_test::TestServer;
use common::{
    error::MailError,
    mail::{EmailMessage, MailTransport},
};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use uuid::Uuid;

use leakage_api::{
    AppState,
    jwt::{JwtConfig, JwtService},
    models::user::Role,
    notifier::Notifier,
    password::{PasswordConfig, PasswordService},
    repositories::InMemoryStore,
    routes::create_router,
};

pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Mail transport keeping every message it is asked to send
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingMailer {
    pub async fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl MailTransport for RecordingMailer {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        self.sent.lock().await.push(message.clone());
        Ok(())
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<InMemoryStore>,
    pub mailer: Arc<RecordingMailer>,
    pub jwt: JwtService,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let mailer = Arc::new(RecordingMailer::default());
        let jwt = JwtService::new(JwtConfig {
            secret: "test-secret".to_string(),
            token_expiry: 3600,
        });

        let state = AppState {
            users: store.clone(),
            reports: store.clone(),
            jwt: jwt.clone(),
            passwords: PasswordService::new(PasswordConfig {
                memory_kib: 8,
                iterations: 1,
                parallelism: 1,
            })
            .unwrap(),
            notifier: Notifier::new(mailer.clone()),
        };

        let server = TestServer::new(create_router(state, MAX_BODY_BYTES)).unwrap();

        Self {
            server,
            store,
            mailer,
            jwt,
        }
    }

    /// Register an account and return its token and id
    pub async fn register(&self, email: &str, password: &str) -> (String, Uuid) {
        let response = self
            .server
            .post("/auth/register")
            .json(&json!({ "email": email, "password": password }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);

        let body: Value = response.json();
        let token = body["token"].as_str().unwrap().to_string();
        let id = body["user"]["id"].as_str().unwrap().parse().unwrap();
        (token, id)
    }

    /// Register an account and promote it to ADMIN
    pub async fn admin(&self, email: &str) -> (String, Uuid) {
        let (token, id) = self.register(email, "admin-password").await;
        self.store.set_role(id, Role::Admin).await.unwrap();
        (token, id)
    }

    /// Create a report as `token` and return its id
    pub async fn create_report(&self, token: &str, description: &str) -> Uuid {
        let response = self
            .server
            .post("/reports")
            .add_header(AUTH, bearer(token))
            .json(&json!({
                "issue_type": "LEAKAGE",
                "severity": "HIGH",
                "description": description,
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);

        let body: Value = response.json();
        body["id"].as_str().unwrap().parse().unwrap()
    }
}

pub const AUTH: HeaderName = header::AUTHORIZATION;

pub fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}
