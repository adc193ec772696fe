//! # Kadro Core
//!
//! Card ordering and the reorder-commit protocol for Kadro kanban boards.
//!
//! This crate provides the board's client-side state (optimistic drag
//! reordering with rollback) and the server-side atomic move operation,
//! without any dependency on a specific UI. Projects hold ordered columns,
//! columns hold cards ranked by a dense zero-based `order`; a drag computes
//! a complete new ordering for the touched columns, applies it locally at
//! once, and commits it to the server in a single all-or-nothing batch.

pub mod board;
pub mod domain;
pub mod error;
pub mod service;
pub mod storage;

#[cfg(feature = "http-api")]
pub mod http;

// Re-export commonly used types
pub use board::{
    drag::{DragCoordinator, DropHalf, DropTarget, MoveTransport, PendingMove},
    state::{BoardSnapshot, BoardState},
};
pub use domain::{
    card::{Card, CardId, Column, ColumnId, ProjectId},
    ordering::{plan_move, MovePlan},
};
pub use error::{FieldError, KadroError, Result};
pub use service::{
    payload::{MovePayload, MoveResponse},
    reorder::{LocalTransport, ReorderService},
};
pub use storage::{CardPlacement, CardStore, MemoryStore};

#[cfg(feature = "sqlite-store")]
pub use storage::SqliteStore;
