//! # TaskFlow Board Client
//!
//! Headless client for the TaskFlow kanban board. Holds the task list
//! as the single source of truth, models drag-and-drop as an explicit
//! state machine with optimistic column moves, and persists drops
//! through a per-task update queue that discards stale in-flight
//! responses.
//!
//! ## Modules
//!
//! - `state`: Board state and the drag gesture machine
//! - `sync`: REST client, update queue, and background persistence

pub mod state;
pub mod sync;
