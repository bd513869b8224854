/// Authentication building blocks
///
/// - `jwt`: session token creation and validation (HS256, 7 days)
/// - `password`: Argon2id hashing and verification
/// - `middleware`: bearer-header parsing and the per-request auth context

pub mod jwt;
pub mod middleware;
pub mod password;
