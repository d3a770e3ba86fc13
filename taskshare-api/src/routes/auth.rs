/// Authentication endpoints
///
/// - `POST /register` - Register a new user
/// - `POST /login` - Authenticate and receive tokens
/// - `POST /refresh` - Rotate the access/refresh pair via the refresh cookie
/// - `POST /logout` - Clear the refresh cookie
/// - `GET /me` - Current user's profile
///
/// The access token travels in the response body for bearer-header use; the
/// refresh token travels only as an HttpOnly, Secure, SameSite=Strict
/// cookie. Logout clears the cookie and nothing else: tokens are stateless,
/// so there is no server-side invalidation.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{AppendHeaders, IntoResponse},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use taskshare_shared::{
    auth::{
        jwt::TokenType,
        middleware::AuthContext,
        password::{hash_password, verify_password},
    },
    models::user::{CreateUser, Role, User},
};
use validator::Validate;

/// Name of the refresh token cookie
const REFRESH_COOKIE: &str = "refresh_token";

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (length limits enforced by the credential store)
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Token response body
///
/// The refresh token is deliberately absent: it is carried by the cookie.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// Access token for the Authorization header
    pub access_token: String,

    /// Always "bearer"
    pub token_type: &'static str,
}

/// Profile response for `GET /me`
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub name: String,
    pub email: String,
    pub role: Role,
}

fn refresh_cookie(token: &str, max_age_secs: i64) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; Secure; SameSite=Strict",
        REFRESH_COOKIE, token, max_age_secs
    )
}

fn clear_refresh_cookie() -> String {
    format!(
        "{}=; Path=/; Max-Age=0; HttpOnly; Secure; SameSite=Strict",
        REFRESH_COOKIE
    )
}

fn extract_refresh_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .map(str::trim)
        .filter_map(|pair| pair.split_once('='))
        .find_map(|(name, value)| (name == REFRESH_COOKIE).then_some(value))
}

/// Issues an access/refresh pair and builds the token response
///
/// Used by both login and refresh; refresh always rotates the cookie.
fn token_response(
    state: &AppState,
    user_id: uuid::Uuid,
    role: Role,
) -> ApiResult<impl IntoResponse> {
    let access_token = state.tokens.issue_access(user_id, role)?;
    let refresh_token = state.tokens.issue_refresh(user_id, role)?;

    let max_age_secs = state.config.auth.refresh_ttl_days * 24 * 60 * 60;
    let cookie = refresh_cookie(&refresh_token, max_age_secs);

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(TokenResponse {
            access_token,
            token_type: "bearer",
        }),
    ))
}

/// `POST /register`
///
/// # Errors
///
/// - `400 Bad Request`: password length out of bounds
/// - `409 Conflict`: email already registered
/// - `422 Unprocessable Entity`: DTO validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<Value>> {
    req.validate()?;

    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let password_hash = hash_password(&req.password)?;

    // The unique constraint still backs this up if two registrations race
    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            email: req.email,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok(Json(json!({ "success": true })))
}

/// `POST /login`
///
/// Authenticates and returns an access token in the body plus a refresh
/// token cookie.
///
/// # Errors
///
/// - `401 Unauthorized`: unknown email or wrong password (indistinguishable)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    token_response(&state, user.id, user.role)
}

/// `POST /refresh`
///
/// Exchanges a valid refresh cookie for a new access/refresh pair. The old
/// refresh token is not invalidated; with no revocation store it simply
/// expires on its own schedule.
///
/// # Errors
///
/// - `401 Unauthorized`: cookie missing, token invalid, or not refresh-kind
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let token = extract_refresh_cookie(&headers)
        .ok_or_else(|| ApiError::Unauthorized("Refresh token missing".to_string()))?;

    let claims = state
        .tokens
        .validate(token)
        .map_err(|_| ApiError::Unauthorized("Invalid refresh token".to_string()))?;

    if claims.token_type != TokenType::Refresh {
        return Err(ApiError::Unauthorized("Invalid refresh token".to_string()));
    }

    token_response(&state, claims.sub, claims.role)
}

/// `POST /logout`
///
/// Clears the refresh cookie. Performs no server-side token invalidation.
pub async fn logout() -> impl IntoResponse {
    (
        AppendHeaders([(header::SET_COOKIE, clear_refresh_cookie())]),
        Json(json!({ "success": true })),
    )
}

/// `GET /me`
///
/// Returns the authenticated user's profile.
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ProfileResponse>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(ProfileResponse {
        name: user.name,
        email: user.email,
        role: user.role,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_cookie_attributes() {
        let cookie = refresh_cookie("tok", 604800);
        assert!(cookie.starts_with("refresh_token=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Max-Age=604800"));
    }

    #[test]
    fn test_clear_refresh_cookie() {
        let cookie = clear_refresh_cookie();
        assert!(cookie.starts_with("refresh_token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_extract_refresh_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            "theme=dark; refresh_token=abc.def.ghi; lang=en".parse().unwrap(),
        );
        assert_eq!(extract_refresh_cookie(&headers), Some("abc.def.ghi"));

        let empty = HeaderMap::new();
        assert_eq!(extract_refresh_cookie(&empty), None);
    }

    #[test]
    fn test_extract_refresh_cookie_matches_set_cookie_name() {
        // The cookie written by refresh_cookie must round-trip through the
        // extractor; look-alike names must not
        let mut headers = HeaderMap::new();
        let value = format!("old_{}=nope; {}=tok", REFRESH_COOKIE, REFRESH_COOKIE);
        headers.insert(header::COOKIE, value.parse().unwrap());
        assert_eq!(extract_refresh_cookie(&headers), Some("tok"));
    }
}
