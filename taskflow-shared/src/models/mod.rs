/// Domain models
///
/// - `user`: user accounts and the public profile shape
/// - `task`: tasks, the board enums, and the wire formatting rules

pub mod task;
pub mod user;
