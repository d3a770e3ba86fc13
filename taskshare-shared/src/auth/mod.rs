/// Authentication and authorization utilities
///
/// This module provides the security primitives for TaskShare:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing with length preconditions
/// - [`jwt`]: Signed access/refresh token issuance and validation
/// - [`middleware`]: Bearer-token session middleware for axum
/// - [`access`]: Per-task permission resolution (owner/editor/viewer) and the
///   admin gate
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with random per-password salts
/// - **Tokens**: HS256-signed JWTs, access (short-lived) and refresh
///   (long-lived) kinds
/// - **Opaque validation failures**: token validation never tells the caller
///   whether the signature, structure, or expiry was at fault

pub mod access;
pub mod jwt;
pub mod middleware;
pub mod password;
