use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Unique identifier for a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(Uuid);

impl CardId {
    /// Creates a fresh random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CardId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CardId {
    type Err = crate::error::KadroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| crate::error::KadroError::InvalidId(s.to_string()))
    }
}

/// Unique identifier for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(Uuid);

impl ColumnId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ColumnId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ColumnId {
    type Err = crate::error::KadroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| crate::error::KadroError::InvalidId(s.to_string()))
    }
}

/// Unique identifier for a project board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(Uuid);

impl ProjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProjectId {
    type Err = crate::error::KadroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| crate::error::KadroError::InvalidId(s.to_string()))
    }
}

/// A card on the board
///
/// `order` is a dense, zero-based rank within the card's column: no two
/// cards in one column share a value, and increasing `order` matches
/// top-to-bottom display position. The reorder core mutates only
/// `column_id` and `order`; creation and deletion belong to the CRUD layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    pub column_id: ColumnId,
    pub order: u32,
    pub project_id: ProjectId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    /// Creates a new card at the given rank in a column
    pub fn new(title: String, column_id: ColumnId, project_id: ProjectId, order: u32) -> Self {
        let now = Utc::now();
        Self {
            id: CardId::new(),
            title,
            column_id,
            order,
            project_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Repositions the card, refreshing `updated_at` when anything changed
    pub fn place_in(&mut self, column_id: ColumnId, order: u32) {
        if self.column_id != column_id || self.order != order {
            self.column_id = column_id;
            self.order = order;
            self.updated_at = Utc::now();
        }
    }
}

/// An ordered bucket of cards within a project board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    pub project_id: ProjectId,
    pub order: u32,
}

impl Column {
    pub fn new(title: String, project_id: ProjectId, order: u32) -> Self {
        Self {
            id: ColumnId::new(),
            title,
            project_id,
            order,
        }
    }
}
