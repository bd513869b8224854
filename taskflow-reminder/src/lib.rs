//! # TaskFlow Reminder
//!
//! Daily due-task digest: once a day, each user with tasks due today
//! (and not done) gets one plain-text email listing them.
//!
//! ## Module Organization
//!
//! - `mailer`: mail transport abstraction (SMTP via lettre + mock)
//! - `digest`: digest email composition
//! - `scheduler`: the daily loop and the per-run dispatch
//!
//! The scheduler runs inside the API process as an independent tokio
//! task and shares the storage backend with request handling.

pub mod digest;
pub mod mailer;
pub mod scheduler;
