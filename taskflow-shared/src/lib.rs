//! # TaskFlow Shared Library
//!
//! This crate contains the types and business logic shared between the
//! TaskFlow API server, the reminder scheduler, and the board client.
//!
//! ## Module Organization
//!
//! - `models`: Task and user domain types plus wire serialization
//! - `auth`: JWT tokens, password hashing, request auth context
//! - `db`: Postgres connection pool and migration runner
//! - `store`: Injectable storage interface (Postgres + in-memory)

pub mod auth;
pub mod db;
pub mod models;
pub mod store;

/// Current version of the TaskFlow shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
