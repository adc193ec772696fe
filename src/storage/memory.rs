use crate::{
    domain::card::{Card, CardId, ColumnId},
    error::{KadroError, Result},
    storage::{CardPlacement, CardStore},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// In-memory card store
///
/// The batch primitive stages the whole update on a copy of the map and
/// swaps it in only once every placement resolved, so readers never observe
/// a partially applied move.
pub struct MemoryStore {
    cards: Mutex<HashMap<CardId, Card>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            cards: Mutex::new(HashMap::new()),
        }
    }

    fn cards(&self) -> Result<MutexGuard<'_, HashMap<CardId, Card>>> {
        self.cards
            .lock()
            .map_err(|_| KadroError::Persistence("card map lock poisoned".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CardStore for MemoryStore {
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn save_card(&self, card: &Card) -> Result<()> {
        self.cards()?.insert(card.id, card.clone());
        Ok(())
    }

    async fn load_card(&self, id: &CardId) -> Result<Card> {
        self.cards()?
            .get(id)
            .cloned()
            .ok_or_else(|| KadroError::CardNotFound(id.to_string()))
    }

    async fn column_cards(&self, column_id: &ColumnId) -> Result<Vec<Card>> {
        let mut cards: Vec<Card> = self
            .cards()?
            .values()
            .filter(|card| &card.column_id == column_id)
            .cloned()
            .collect();
        cards.sort_by_key(|card| card.order);
        Ok(cards)
    }

    async fn apply_placements(&self, placements: &[CardPlacement]) -> Result<()> {
        let mut cards = self.cards()?;

        let mut staged = cards.clone();
        for placement in placements {
            let card = staged
                .get_mut(&placement.card_id)
                .ok_or_else(|| KadroError::CardNotFound(placement.card_id.to_string()))?;
            card.place_in(placement.column_id, placement.order);
        }

        *cards = staged;
        tracing::debug!(rows = placements.len(), "applied placement batch");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::ProjectId;

    fn seeded_column(store: &MemoryStore, count: u32) -> (ColumnId, Vec<Card>) {
        let column = ColumnId::new();
        let project = ProjectId::new();
        let cards: Vec<Card> = (0..count)
            .map(|i| Card::new(format!("card{i}"), column, project, i))
            .collect();
        for card in &cards {
            let mut map = store.cards().unwrap();
            map.insert(card.id, card.clone());
        }
        (column, cards)
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let store = MemoryStore::new();
        let card = Card::new("Test".to_string(), ColumnId::new(), ProjectId::new(), 0);

        store.save_card(&card).await.unwrap();
        let loaded = store.load_card(&card.id).await.unwrap();

        assert_eq!(loaded, card);
    }

    #[tokio::test]
    async fn test_load_missing_card() {
        let store = MemoryStore::new();
        let result = store.load_card(&CardId::new()).await;
        assert!(matches!(result, Err(KadroError::CardNotFound(_))));
    }

    #[tokio::test]
    async fn test_column_cards_sorted_by_order() {
        let store = MemoryStore::new();
        let column = ColumnId::new();
        let project = ProjectId::new();
        for order in [2u32, 0, 1] {
            store
                .save_card(&Card::new(format!("card{order}"), column, project, order))
                .await
                .unwrap();
        }

        let cards = store.column_cards(&column).await.unwrap();
        let orders: Vec<u32> = cards.iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_apply_placements_moves_cards() {
        let store = MemoryStore::new();
        let (column, cards) = seeded_column(&store, 3);
        let other = ColumnId::new();

        store
            .apply_placements(&[CardPlacement {
                card_id: cards[1].id,
                column_id: other,
                order: 0,
            }])
            .await
            .unwrap();

        let moved = store.load_card(&cards[1].id).await.unwrap();
        assert_eq!(moved.column_id, other);
        assert_eq!(moved.order, 0);
        assert_eq!(store.column_cards(&column).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_batch_leaves_no_partial_writes() {
        let store = MemoryStore::new();
        let (column, cards) = seeded_column(&store, 2);

        let result = store
            .apply_placements(&[
                CardPlacement {
                    card_id: cards[0].id,
                    column_id: column,
                    order: 1,
                },
                CardPlacement {
                    card_id: CardId::new(),
                    column_id: column,
                    order: 0,
                },
            ])
            .await;

        assert!(matches!(result, Err(KadroError::CardNotFound(_))));

        // First placement must not have leaked through
        let untouched = store.load_card(&cards[0].id).await.unwrap();
        assert_eq!(untouched.order, 0);
    }
}
