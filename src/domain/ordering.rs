use crate::domain::card::{Card, CardId, ColumnId};
use crate::error::{KadroError, Result};
use std::collections::HashMap;

/// The complete post-move state of every column touched by one drag
///
/// Columns whose membership and order are unchanged by the move never
/// appear here; a move to the card's own current position yields an empty
/// plan.
#[derive(Debug, Clone, PartialEq)]
pub struct MovePlan {
    pub card_id: CardId,
    pub columns: Vec<PlannedColumn>,
}

/// One touched column with its cards renumbered densely from zero
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedColumn {
    pub column_id: ColumnId,
    pub cards: Vec<Card>,
}

impl MovePlan {
    pub fn is_noop(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_ids(&self) -> Vec<ColumnId> {
        self.columns.iter().map(|c| c.column_id).collect()
    }
}

/// Computes the new ordering produced by dropping `card_id` into
/// `target_column` at `target_index`.
///
/// The index is interpreted against the target sequence with the moving
/// card already removed, and is clamped to `0..=len`. Tie-breaking against
/// the card under the pointer is the drag layer's job; this function only
/// accepts an already-resolved integer index.
///
/// Pure: same inputs give the same output, and `cards_by_column` is never
/// mutated. Every returned column carries dense `order` values starting at
/// zero with the relative order of untouched cards preserved.
pub fn plan_move(
    cards_by_column: &HashMap<ColumnId, Vec<Card>>,
    card_id: &CardId,
    target_column: &ColumnId,
    target_index: usize,
) -> Result<MovePlan> {
    let (source_column, moving) = cards_by_column
        .iter()
        .find_map(|(column_id, cards)| {
            cards
                .iter()
                .find(|card| &card.id == card_id)
                .map(|card| (*column_id, card.clone()))
        })
        .ok_or_else(|| KadroError::CardNotFound(card_id.to_string()))?;

    if !cards_by_column.contains_key(target_column) {
        return Err(KadroError::ColumnNotFound(target_column.to_string()));
    }

    let mut columns = Vec::new();

    if source_column == *target_column {
        let mut cards = without_card(&cards_by_column[&source_column], card_id);
        let index = target_index.min(cards.len());
        cards.insert(index, moving);
        renumber(source_column, &mut cards);

        if touched(&cards_by_column[&source_column], &cards) {
            columns.push(PlannedColumn {
                column_id: source_column,
                cards,
            });
        }
    } else {
        let mut source_cards = without_card(&cards_by_column[&source_column], card_id);
        renumber(source_column, &mut source_cards);

        let mut target_cards = cards_by_column[&target_column].clone();
        let index = target_index.min(target_cards.len());
        target_cards.insert(index, moving);
        renumber(*target_column, &mut target_cards);

        // Cross-column moves change membership on both sides, but the
        // touched check still filters renumber-only noise on pathological
        // non-dense input.
        if touched(&cards_by_column[&source_column], &source_cards) {
            columns.push(PlannedColumn {
                column_id: source_column,
                cards: source_cards,
            });
        }
        if touched(&cards_by_column[&target_column], &target_cards) {
            columns.push(PlannedColumn {
                column_id: *target_column,
                cards: target_cards,
            });
        }
    }

    Ok(MovePlan {
        card_id: *card_id,
        columns,
    })
}

fn without_card(cards: &[Card], card_id: &CardId) -> Vec<Card> {
    cards
        .iter()
        .filter(|card| &card.id != card_id)
        .cloned()
        .collect()
}

fn renumber(column_id: ColumnId, cards: &mut [Card]) {
    for (index, card) in cards.iter_mut().enumerate() {
        card.column_id = column_id;
        card.order = index as u32;
    }
}

fn touched(before: &[Card], after: &[Card]) -> bool {
    before.len() != after.len()
        || before
            .iter()
            .zip(after.iter())
            .any(|(b, a)| b.id != a.id || b.order != a.order)
}
