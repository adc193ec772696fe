use crate::{
    domain::card::{Card, CardId, ColumnId},
    error::Result,
};
use async_trait::async_trait;

pub mod memory;

#[cfg(feature = "sqlite-store")]
pub mod sqlite;

pub use memory::MemoryStore;

#[cfg(feature = "sqlite-store")]
pub use sqlite::SqliteStore;

/// One row-level position update: card → (column, order)
#[derive(Debug, Clone, PartialEq)]
pub struct CardPlacement {
    pub card_id: CardId,
    pub column_id: ColumnId,
    pub order: u32,
}

/// Storage gateway for card persistence
///
/// `apply_placements` is the transactional primitive the reorder protocol
/// relies on: every placement in one call is applied atomically, or none
/// is. Backends without native transactions must provide an equivalent
/// all-or-nothing batch write.
#[async_trait]
pub trait CardStore: Send + Sync {
    /// Initializes the storage backend
    async fn initialize(&self) -> Result<()>;

    /// Saves a card (insert or replace)
    async fn save_card(&self, card: &Card) -> Result<()>;

    /// Loads a card by id
    async fn load_card(&self, id: &CardId) -> Result<Card>;

    /// Lists a column's cards ordered by rank
    async fn column_cards(&self, column_id: &ColumnId) -> Result<Vec<Card>>;

    /// Applies every placement in one atomic batch
    ///
    /// A placement referencing a missing card aborts the whole batch with
    /// no partial effect.
    async fn apply_placements(&self, placements: &[CardPlacement]) -> Result<()>;
}
