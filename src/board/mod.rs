pub mod drag;
pub mod state;

pub use drag::{DragCoordinator, DropHalf, DropTarget, MoveTransport, PendingMove};
pub use state::{BoardSnapshot, BoardState};
