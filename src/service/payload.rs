use crate::{
    domain::card::{Card, CardId, ColumnId, ProjectId},
    domain::ordering::MovePlan,
    error::{FieldError, KadroError, Result},
    storage::CardPlacement,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The complete post-move state of every column touched by one drag,
/// as sent from the client to the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovePayload {
    pub task_id: CardId,
    pub columns: Vec<ColumnCards>,
}

/// One touched column's full card ordering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnCards {
    pub id: ColumnId,
    pub cards: Vec<CardOrder>,
}

/// A card's rank within its column entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardOrder {
    pub id: CardId,
    pub order: u32,
}

impl MovePayload {
    pub fn from_plan(plan: &MovePlan) -> Self {
        Self {
            task_id: plan.card_id,
            columns: plan
                .columns
                .iter()
                .map(|column| ColumnCards {
                    id: column.column_id,
                    cards: column
                        .cards
                        .iter()
                        .map(|card| CardOrder {
                            id: card.id,
                            order: card.order,
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    /// Structural validation, reported as field-level errors
    ///
    /// Runs before anything touches the store; a payload that fails here
    /// never reaches the transaction.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.columns.is_empty() {
            errors.push(FieldError::new("columns", "must not be empty"));
        }

        let mut seen_cards: HashSet<CardId> = HashSet::new();
        let mut task_listed = false;

        for (column_index, column) in self.columns.iter().enumerate() {
            if column.cards.is_empty() {
                errors.push(FieldError::new(
                    format!("columns[{column_index}].cards"),
                    "must not be empty",
                ));
            }

            let mut seen_orders: HashSet<u32> = HashSet::new();
            for (card_index, card) in column.cards.iter().enumerate() {
                if !seen_cards.insert(card.id) {
                    errors.push(FieldError::new(
                        format!("columns[{column_index}].cards[{card_index}].id"),
                        "card listed more than once",
                    ));
                }
                if !seen_orders.insert(card.order) {
                    errors.push(FieldError::new(
                        format!("columns[{column_index}].cards[{card_index}].order"),
                        "duplicate order value within column",
                    ));
                }
                if card.id == self.task_id {
                    task_listed = true;
                }
            }
        }

        if !self.columns.is_empty() && !task_listed {
            errors.push(FieldError::new(
                "taskId",
                "moved card is not listed in any column",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(KadroError::InvalidPayload(errors))
        }
    }

    /// Flattens the payload into row-level placement updates
    pub fn placements(&self) -> Vec<CardPlacement> {
        self.columns
            .iter()
            .flat_map(|column| {
                column.cards.iter().map(|card| CardPlacement {
                    card_id: card.id,
                    column_id: column.id,
                    order: card.order,
                })
            })
            .collect()
    }
}

/// Successful move response: the authoritative post-move card record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveResponse {
    pub success: bool,
    pub data: CardRecord,
}

/// Wire view of a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    pub id: CardId,
    pub title: String,
    pub column_id: ColumnId,
    pub order: u32,
    pub project_id: ProjectId,
    pub updated_at: DateTime<Utc>,
}

impl From<&Card> for CardRecord {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id,
            title: card.title.clone(),
            column_id: card.column_id,
            order: card.order,
            project_id: card.project_id,
            updated_at: card.updated_at,
        }
    }
}

impl From<Card> for CardRecord {
    fn from(card: Card) -> Self {
        Self::from(&card)
    }
}

/// Error response body shared by every failure class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ordering::plan_move;
    use std::collections::HashMap;

    fn sample_payload() -> (MovePayload, Vec<Card>) {
        let project = ProjectId::new();
        let col_a = ColumnId::new();
        let col_b = ColumnId::new();
        let cards: Vec<Card> = (0..3)
            .map(|i| Card::new(format!("card{i}"), col_a, project, i))
            .collect();
        let moved = cards[1].id;

        let board: HashMap<ColumnId, Vec<Card>> =
            [(col_a, cards.clone()), (col_b, vec![])].into_iter().collect();
        let plan = plan_move(&board, &moved, &col_b, 0).unwrap();
        (MovePayload::from_plan(&plan), cards)
    }

    #[test]
    fn test_from_plan_covers_touched_columns() {
        let (payload, cards) = sample_payload();

        assert_eq!(payload.task_id, cards[1].id);
        assert_eq!(payload.columns.len(), 2);
        let total: usize = payload.columns.iter().map(|c| c.cards.len()).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_valid_payload_passes() {
        let (payload, _) = sample_payload();
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_wire_format_uses_camel_case() {
        let (payload, _) = sample_payload();
        let json = serde_json::to_string(&payload).unwrap();

        assert!(json.contains("\"taskId\""));
        assert!(json.contains("\"columns\""));
        assert!(!json.contains("task_id"));
    }

    #[test]
    fn test_empty_columns_rejected() {
        let payload = MovePayload {
            task_id: CardId::new(),
            columns: vec![],
        };

        match payload.validate() {
            Err(KadroError::InvalidPayload(errors)) => {
                assert!(errors.iter().any(|e| e.field == "columns"));
            }
            other => panic!("expected InvalidPayload, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_card_list_rejected() {
        let (mut payload, _) = sample_payload();
        payload.columns[0].cards.clear();

        assert!(matches!(
            payload.validate(),
            Err(KadroError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_duplicate_card_rejected() {
        let (mut payload, _) = sample_payload();
        let duplicated = payload.columns[1].cards[0].clone();
        payload.columns[0].cards.push(CardOrder {
            id: duplicated.id,
            order: 99,
        });

        match payload.validate() {
            Err(KadroError::InvalidPayload(errors)) => {
                assert!(errors.iter().any(|e| e.field.ends_with(".id")));
            }
            other => panic!("expected InvalidPayload, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_order_rejected() {
        let (mut payload, _) = sample_payload();
        let source = payload
            .columns
            .iter_mut()
            .find(|c| c.cards.len() == 2)
            .unwrap();
        source.cards[1].order = source.cards[0].order;

        match payload.validate() {
            Err(KadroError::InvalidPayload(errors)) => {
                assert!(errors.iter().any(|e| e.field.ends_with(".order")));
            }
            other => panic!("expected InvalidPayload, got {other:?}"),
        }
    }

    #[test]
    fn test_unlisted_task_rejected() {
        let (mut payload, _) = sample_payload();
        payload.task_id = CardId::new();

        match payload.validate() {
            Err(KadroError::InvalidPayload(errors)) => {
                assert!(errors.iter().any(|e| e.field == "taskId"));
            }
            other => panic!("expected InvalidPayload, got {other:?}"),
        }
    }

    #[test]
    fn test_non_integer_order_rejected_at_parse() {
        let json = format!(
            r#"{{"taskId":"{}","columns":[{{"id":"{}","cards":[{{"id":"{}","order":1.5}}]}}]}}"#,
            CardId::new(),
            ColumnId::new(),
            CardId::new()
        );

        assert!(serde_json::from_str::<MovePayload>(&json).is_err());
    }

    #[test]
    fn test_placements_flatten_every_row() {
        let (payload, _) = sample_payload();
        let placements = payload.placements();
        assert_eq!(placements.len(), 3);
        assert!(placements.iter().any(|p| p.card_id == payload.task_id));
    }

    #[test]
    fn test_error_response_omits_empty_details() {
        let body = ErrorResponse {
            success: false,
            error: "Card not found".to_string(),
            details: None,
        };

        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("details"));
    }
}
