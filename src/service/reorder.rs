use crate::{
    board::drag::MoveTransport,
    domain::card::Card,
    error::Result,
    service::payload::MovePayload,
    storage::CardStore,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Server-side move commit
///
/// Validates a proposed move, then persists column membership and order for
/// every card the payload lists in one atomic batch. Either every listed
/// card is updated or none is; readers never observe a partial reordering.
///
/// Re-submitting a payload is safe: the second application re-asserts the
/// same values. Overlapping calls on the same cards serialize on the
/// store's locking and the later commit wins, which can leave order values
/// non-dense across a column until the next move renumbers it.
pub struct ReorderService {
    store: Arc<dyn CardStore>,
}

impl ReorderService {
    pub fn new(store: Arc<dyn CardStore>) -> Self {
        Self { store }
    }

    /// Applies one move payload and returns the authoritative post-move
    /// record of the moved card
    pub async fn move_task(&self, payload: &MovePayload) -> Result<Card> {
        payload.validate()?;

        // Fail fast: an unknown task aborts before any write happens
        self.store.load_card(&payload.task_id).await?;

        let placements = payload.placements();
        tracing::debug!(
            task = %payload.task_id,
            rows = placements.len(),
            "applying move"
        );
        self.store.apply_placements(&placements).await?;

        let card = self.store.load_card(&payload.task_id).await?;
        tracing::info!(
            task = %card.id,
            column = %card.column_id,
            order = card.order,
            "move committed"
        );
        Ok(card)
    }
}

/// In-process transport: drives a `ReorderService` directly
///
/// Used by tests and embedded single-process deployments; an HTTP client
/// transport lives with the network layer, outside this crate.
pub struct LocalTransport {
    service: ReorderService,
}

impl LocalTransport {
    pub fn new(service: ReorderService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl MoveTransport for LocalTransport {
    async fn submit_move(&self, payload: &MovePayload) -> Result<Card> {
        self.service.move_task(payload).await
    }
}
