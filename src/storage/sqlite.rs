use crate::{
    domain::card::{Card, CardId, ColumnId, ProjectId},
    error::{KadroError, Result},
    storage::{CardPlacement, CardStore},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS cards (
    id          TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    column_id   TEXT NOT NULL,
    ord         INTEGER NOT NULL,
    project_id  TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_cards_column ON cards (column_id, ord);
"#;

/// SQLite-backed card store
///
/// `apply_placements` runs inside one transaction; a placement whose UPDATE
/// matches no row aborts and rolls back the whole batch.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) a database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| KadroError::Persistence("connection lock poisoned".to_string()))
    }
}

fn parse_card(
    id: String,
    title: String,
    column_id: String,
    order: u32,
    project_id: String,
    created_at: String,
    updated_at: String,
) -> Result<Card> {
    Ok(Card {
        id: CardId::from_str(&id)?,
        title,
        column_id: ColumnId::from_str(&column_id)?,
        order,
        project_id: ProjectId::from_str(&project_id)?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| KadroError::Persistence(format!("bad timestamp {raw}: {err}")))
}

type CardRow = (String, String, String, u32, String, String, String);

fn card_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CardRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

#[async_trait]
impl CardStore for SqliteStore {
    async fn initialize(&self) -> Result<()> {
        self.conn()?.execute_batch(SCHEMA)?;
        Ok(())
    }

    async fn save_card(&self, card: &Card) -> Result<()> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO cards (id, title, column_id, ord, project_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                card.id.to_string(),
                card.title,
                card.column_id.to_string(),
                card.order,
                card.project_id.to_string(),
                card.created_at.to_rfc3339(),
                card.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    async fn load_card(&self, id: &CardId) -> Result<Card> {
        let row = self
            .conn()?
            .query_row(
                "SELECT id, title, column_id, ord, project_id, created_at, updated_at
                 FROM cards WHERE id = ?1",
                params![id.to_string()],
                card_row,
            )
            .optional()?;

        match row {
            Some((id, title, column_id, order, project_id, created_at, updated_at)) => {
                parse_card(id, title, column_id, order, project_id, created_at, updated_at)
            }
            None => Err(KadroError::CardNotFound(id.to_string())),
        }
    }

    async fn column_cards(&self, column_id: &ColumnId) -> Result<Vec<Card>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, column_id, ord, project_id, created_at, updated_at
             FROM cards WHERE column_id = ?1 ORDER BY ord ASC",
        )?;
        let rows = stmt
            .query_map(params![column_id.to_string()], card_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(id, title, column_id, order, project_id, created_at, updated_at)| {
                parse_card(id, title, column_id, order, project_id, created_at, updated_at)
            })
            .collect()
    }

    async fn apply_placements(&self, placements: &[CardPlacement]) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let now = Utc::now().to_rfc3339();

        for placement in placements {
            let updated = tx.execute(
                "UPDATE cards SET column_id = ?1, ord = ?2, updated_at = ?3 WHERE id = ?4",
                params![
                    placement.column_id.to_string(),
                    placement.order,
                    now,
                    placement.card_id.to_string(),
                ],
            )?;

            // Dropping the open transaction rolls back everything applied
            // so far in this batch.
            if updated == 0 {
                return Err(KadroError::CardNotFound(placement.card_id.to_string()));
            }
        }

        tx.commit()?;
        tracing::debug!(rows = placements.len(), "placement batch committed");
        Ok(())
    }
}
