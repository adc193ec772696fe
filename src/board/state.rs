use crate::{
    domain::card::{Card, CardId, Column, ColumnId},
    domain::ordering::MovePlan,
    error::{KadroError, Result},
};
use std::collections::{HashMap, HashSet};

/// Immutable copy of a set of column card sequences, kept for rollback
///
/// Snapshots are scoped to the columns one move touches, so concurrent
/// moves on different cards roll back independently without clobbering
/// each other's optimistic state.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSnapshot {
    columns: Vec<(ColumnId, Vec<Card>)>,
}

/// In-memory client copy of one board view
///
/// Owns the columns and per-column card sequences for the lifetime of a
/// board view session. Ordering changes are applied optimistically through
/// `apply_move` and undone through `restore` when a commit fails.
///
/// Invariant: the multiset of card ids across all columns is unchanged by
/// any `apply_move`/`restore` pair; a move never drops or duplicates a
/// card.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardState {
    columns: Vec<Column>,
    cards: HashMap<ColumnId, Vec<Card>>,
    in_flight: HashSet<CardId>,
}

impl BoardState {
    /// Builds the view state from a flat card list, grouping per column and
    /// sorting by rank
    pub fn new(columns: Vec<Column>, cards: Vec<Card>) -> Self {
        let mut columns = columns;
        columns.sort_by_key(|column| column.order);

        let mut by_column: HashMap<ColumnId, Vec<Card>> =
            columns.iter().map(|column| (column.id, Vec::new())).collect();
        for card in cards {
            by_column.entry(card.column_id).or_default().push(card);
        }
        for cards in by_column.values_mut() {
            cards.sort_by_key(|card| card.order);
        }

        Self {
            columns,
            cards: by_column,
            in_flight: HashSet::new(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// A column's cards in display order (empty for an unknown column)
    pub fn column_cards(&self, column_id: &ColumnId) -> &[Card] {
        self.cards
            .get(column_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn cards_by_column(&self) -> &HashMap<ColumnId, Vec<Card>> {
        &self.cards
    }

    /// Finds the column currently holding a card
    pub fn column_of(&self, card_id: &CardId) -> Option<ColumnId> {
        self.cards.iter().find_map(|(column_id, cards)| {
            cards
                .iter()
                .any(|card| &card.id == card_id)
                .then_some(*column_id)
        })
    }

    pub fn card_count(&self) -> usize {
        self.cards.values().map(Vec::len).sum()
    }

    /// Replaces the affected columns' sequences with the plan output
    ///
    /// Synchronous and infallible for a plan computed against this state.
    pub fn apply_move(&mut self, plan: &MovePlan) {
        for column in &plan.columns {
            self.cards.insert(column.column_id, column.cards.clone());
        }
    }

    /// Copies the named columns' sequences for later rollback
    pub fn snapshot_columns(&self, column_ids: &[ColumnId]) -> BoardSnapshot {
        BoardSnapshot {
            columns: column_ids
                .iter()
                .map(|id| (*id, self.column_cards(id).to_vec()))
                .collect(),
        }
    }

    /// Copies every column's sequence
    pub fn snapshot(&self) -> BoardSnapshot {
        let ids: Vec<ColumnId> = self.columns.iter().map(|column| column.id).collect();
        self.snapshot_columns(&ids)
    }

    /// Resets the snapshot's columns to their captured sequences
    pub fn restore(&mut self, snapshot: BoardSnapshot) {
        for (column_id, cards) in snapshot.columns {
            self.cards.insert(column_id, cards);
        }
    }

    /// Marks a card's move as in flight; refused while a prior commit for
    /// the same card is unresolved
    pub fn lock_card(&mut self, card_id: CardId) -> Result<()> {
        if !self.in_flight.insert(card_id) {
            return Err(KadroError::MoveInFlight(card_id.to_string()));
        }
        Ok(())
    }

    pub fn release_card(&mut self, card_id: &CardId) {
        self.in_flight.remove(card_id);
    }

    pub fn is_locked(&self, card_id: &CardId) -> bool {
        self.in_flight.contains(card_id)
    }
}
