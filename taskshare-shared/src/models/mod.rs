/// Database models for TaskShare
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts with role-based access control
/// - `task`: User-owned tasks with soft deletion
/// - `share`: Per-task viewer/editor grants to other users
/// - `audit_log`: Immutable records of admin actions

pub mod audit_log;
pub mod share;
pub mod task;
pub mod user;
