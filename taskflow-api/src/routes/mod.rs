/// API route handlers
///
/// - `auth`: signup, login, current-user lookup
/// - `tasks`: per-user task CRUD
/// - `health`: liveness and store connectivity
/// - `admin`: manual digest trigger

pub mod admin;
pub mod auth;
pub mod health;
pub mod tasks;
