/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup and cleanup
/// - Test user creation (regular and admin)
/// - Token generation
/// - Request/response helpers driving the router directly

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use sqlx::PgPool;
use std::sync::Mutex;
use taskshare_api::app::{build_router, AppState};
use taskshare_api::config::{ApiConfig, AuthConfig, Config, DatabaseConfig};
use taskshare_shared::auth::jwt::TokenService;
use taskshare_shared::auth::password::hash_password;
use taskshare_shared::models::user::{CreateUser, Role, User};
use tower::Service as _;
use uuid::Uuid;

const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub tokens: TokenService,
    created_users: Mutex<Vec<Uuid>>,
}

impl TestContext {
    /// Creates a new test context against the database in `DATABASE_URL`
    pub async fn new() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set for integration tests"))?;

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url: database_url.clone(),
                max_connections: 5,
            },
            auth: AuthConfig {
                jwt_secret: TEST_SECRET.to_string(),
                access_ttl_minutes: 30,
                refresh_ttl_days: 7,
            },
        };

        let db = PgPool::connect(&database_url).await?;

        // Run migrations (path relative to Cargo.toml, not this file)
        sqlx::migrate!("../migrations").run(&db).await?;

        let tokens = TokenService::with_defaults(TEST_SECRET);

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            tokens,
            created_users: Mutex::new(Vec::new()),
        })
    }

    /// Creates a user with a unique email and the password "password123"
    pub async fn create_user(&self, role: Role) -> anyhow::Result<User> {
        let email = format!("test-{}@example.com", Uuid::new_v4());
        let password_hash = hash_password("password123")?;

        let user = User::create(
            &self.db,
            CreateUser {
                name: "Test User".to_string(),
                email,
                password_hash,
            },
        )
        .await?;

        // New accounts always start as regular users; admin promotion is an
        // out-of-band operation, so tests do it directly in the store.
        let user = if role == Role::Admin {
            sqlx::query_as::<_, User>(
                r#"
                UPDATE users SET role = 'admin' WHERE id = $1
                RETURNING id, name, email, password_hash, role, created_at
                "#,
            )
            .bind(user.id)
            .fetch_one(&self.db)
            .await?
        } else {
            user
        };

        self.created_users.lock().unwrap().push(user.id);
        Ok(user)
    }

    /// Issues an access token for a user, signed with the test secret
    pub fn access_token(&self, user: &User) -> String {
        self.tokens.issue_access(user.id, user.role).unwrap()
    }

    /// Issues a refresh token for a user
    pub fn refresh_token(&self, user: &User) -> String {
        self.tokens.issue_refresh(user.id, user.role).unwrap()
    }

    /// Sends a request and returns the status and parsed JSON body
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };

        (status, json)
    }

    /// Sends a request with a raw Cookie header (for the refresh endpoint)
    /// and returns the status, Set-Cookie values, and parsed JSON body
    pub async fn request_with_cookie(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, Vec<String>, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let cookies = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_string))
            .collect();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };

        (status, cookies, json)
    }

    /// Cleans up data created by this test context
    ///
    /// Deletes only the users this context created and their tasks/shares,
    /// so concurrently-running tests are unaffected.
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        let user_ids: Vec<Uuid> = self.created_users.lock().unwrap().clone();
        if user_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            DELETE FROM shares
            WHERE user_id = ANY($1)
               OR task_id IN (SELECT id FROM tasks WHERE owner_id = ANY($1))
            "#,
        )
        .bind(&user_ids)
        .execute(&self.db)
        .await?;

        sqlx::query("DELETE FROM tasks WHERE owner_id = ANY($1)")
            .bind(&user_ids)
            .execute(&self.db)
            .await?;

        sqlx::query("DELETE FROM users WHERE id = ANY($1)")
            .bind(&user_ids)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}

/// Extracts the refresh token value from a list of Set-Cookie headers
pub fn refresh_cookie_value(cookies: &[String]) -> Option<String> {
    cookies.iter().find_map(|cookie| {
        cookie
            .split(';')
            .next()?
            .strip_prefix("refresh_token=")
            .map(str::to_string)
    })
}
