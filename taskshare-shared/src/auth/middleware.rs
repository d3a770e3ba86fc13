/// Session middleware for axum
///
/// Extracts the bearer token from the `Authorization` header, validates it
/// through the [`TokenService`], and rejects refresh tokens presented as
/// bearer credentials. On success an [`AuthContext`] is inserted into the
/// request extensions for the remainder of request processing; it is never
/// persisted or cached across requests.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use taskshare_shared::auth::jwt::TokenService;
/// use taskshare_shared::auth::middleware::{create_auth_middleware, AuthContext};
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("user {}", auth.user_id)
/// }
///
/// let tokens = TokenService::with_defaults("a-secret-of-at-least-32-bytes!!!");
/// let app: Router = Router::new()
///     .route("/me", get(handler))
///     .layer(middleware::from_fn(create_auth_middleware(tokens)));
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{Claims, TokenService, TokenType};
use crate::models::user::Role;

/// Authenticated identity for the current request
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user id
    pub user_id: Uuid,

    /// Role carried by the validated token
    pub role: Role,
}

impl AuthContext {
    /// Creates an auth context from validated token claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
        }
    }
}

/// Error type for the session middleware
///
/// Every variant maps to 401: a missing credential, an invalid or expired
/// token, and a wrong-kind token are indistinguishable to the client.
#[derive(Debug)]
pub enum AuthError {
    /// Missing or malformed Authorization header
    MissingCredentials,

    /// Token failed validation or is not an access token
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingCredentials => "Missing credentials",
            AuthError::InvalidToken => "Invalid or expired token",
        };

        (StatusCode::UNAUTHORIZED, message).into_response()
    }
}

/// Bearer-token authentication middleware
///
/// Rejects with 401 when the header is missing, the token fails validation,
/// or the token is not of the access kind.
pub async fn auth_middleware(
    tokens: TokenService,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingCredentials)?;

    let claims = tokens.validate(token).map_err(|_| AuthError::InvalidToken)?;

    // Refresh tokens are valid tokens but not session credentials
    if claims.token_type != TokenType::Access {
        return Err(AuthError::InvalidToken);
    }

    req.extensions_mut().insert(AuthContext::from_claims(&claims));

    Ok(next.run(req).await)
}

/// Creates an authentication middleware closure capturing the token service
pub fn create_auth_middleware(
    tokens: TokenService,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>>
       + Clone {
    move |req, next| {
        let tokens = tokens.clone();
        Box::pin(auth_middleware(tokens, req, next))
    }
}
