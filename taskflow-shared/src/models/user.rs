/// User model
///
/// Users own tasks; deleting a user cascades to every task they own
/// (enforced by the `tasks.user_id` foreign key).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     email TEXT NOT NULL UNIQUE,
///     password_hash TEXT NOT NULL,
///     name TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Emails are stored and compared exactly as given (case-sensitive).
/// Passwords are stored as Argon2id hashes, never in plaintext.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user account row
///
/// Deliberately not `Serialize`: the password hash must never reach a
/// response body. Use [`User::public`] for anything client-facing.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user id (BIGSERIAL, monotonically assigned)
    pub id: i64,

    /// Email address, unique across all users
    pub email: String,

    /// Argon2id password hash (PHC string format)
    pub password_hash: String,

    /// Optional display name
    pub name: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Email address
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    /// Optional display name
    pub name: Option<String>,
}

/// The client-facing slice of a user account
///
/// Returned from signup, login, and `GET /auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    /// Unique user id
    pub id: i64,

    /// Email address
    pub email: String,

    /// Optional display name
    pub name: Option<String>,
}

impl User {
    /// Projects the account onto its public fields
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}
