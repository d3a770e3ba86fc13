/// API route handlers
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh, logout, me)
/// - `tasks`: Task CRUD and sharing
/// - `admin`: Admin-only user/task browsing and force deletion

pub mod admin;
pub mod auth;
pub mod health;
pub mod tasks;
