pub mod payload;
pub mod reorder;

pub use payload::{CardOrder, CardRecord, ColumnCards, ErrorResponse, MovePayload, MoveResponse};
pub use reorder::{LocalTransport, ReorderService};
