use crate::{
    board::state::{BoardSnapshot, BoardState},
    domain::card::{Card, CardId, ColumnId},
    domain::ordering::plan_move,
    error::{KadroError, Result},
    service::payload::MovePayload,
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

/// Which half of the card under the pointer the drop landed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropHalf {
    Upper,
    Lower,
}

/// A drop location inside a target column, tie-break already resolved to an
/// integer index
///
/// The index counts positions in the target column with the dragged card
/// excluded from the sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct DropTarget {
    pub column_id: ColumnId,
    pub index: usize,
}

impl DropTarget {
    pub fn at(column_id: ColumnId, index: usize) -> Self {
        Self { column_id, index }
    }

    /// Resolves a drop over another card to an insertion index
    ///
    /// Upper half places the dragged card before the card under the
    /// pointer, lower half places it after.
    pub fn over_card(column_id: ColumnId, hover_index: usize, half: DropHalf) -> Self {
        let index = match half {
            DropHalf::Upper => hover_index,
            DropHalf::Lower => hover_index + 1,
        };
        Self { column_id, index }
    }
}

/// Sends a committed move to the authoritative side
#[async_trait]
pub trait MoveTransport: Send + Sync {
    /// Submits the full post-move payload; resolves to the authoritative
    /// record of the moved card
    async fn submit_move(&self, payload: &MovePayload) -> Result<Card>;
}

/// A dropped move awaiting its commit: payload to send plus the rollback
/// snapshot captured before the optimistic update
#[derive(Debug)]
pub struct PendingMove {
    pub card_id: CardId,
    pub payload: MovePayload,
    snapshot: BoardSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragPhase {
    Idle,
    Dragging {
        card_id: CardId,
        source_column: ColumnId,
    },
}

/// Drag lifecycle driver for one board view
///
/// Translates drag events into ordering changes: a drop applies the new
/// ordering to the board immediately, then `commit` sends it to the server
/// and rolls the board back if the server refuses it. Cancelled drags touch
/// nothing and send nothing.
///
/// Outstanding commits are tracked per card through the board's in-flight
/// locks rather than coordinator state, so moves on different cards can
/// overlap while a second move of the same card is refused until its prior
/// commit resolves.
pub struct DragCoordinator {
    board: Arc<Mutex<BoardState>>,
    transport: Arc<dyn MoveTransport>,
    phase: DragPhase,
}

impl DragCoordinator {
    pub fn new(board: Arc<Mutex<BoardState>>, transport: Arc<dyn MoveTransport>) -> Self {
        Self {
            board,
            transport,
            phase: DragPhase::Idle,
        }
    }

    pub fn board(&self) -> Arc<Mutex<BoardState>> {
        self.board.clone()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    fn lock_board(&self) -> Result<MutexGuard<'_, BoardState>> {
        self.board
            .lock()
            .map_err(|_| KadroError::Other("board state lock poisoned".to_string()))
    }

    /// Begins a drag on a card
    ///
    /// Refused for unknown cards and for cards whose previous move is still
    /// committing.
    pub fn drag_start(&mut self, card_id: CardId) -> Result<()> {
        if let DragPhase::Dragging { card_id: active, .. } = self.phase {
            return Err(KadroError::DragInProgress(active.to_string()));
        }

        let board = self.lock_board()?;
        if board.is_locked(&card_id) {
            return Err(KadroError::MoveInFlight(card_id.to_string()));
        }
        let source_column = board
            .column_of(&card_id)
            .ok_or_else(|| KadroError::CardNotFound(card_id.to_string()))?;
        drop(board);

        tracing::debug!(card = %card_id, column = %source_column, "drag started");
        self.phase = DragPhase::Dragging {
            card_id,
            source_column,
        };
        Ok(())
    }

    /// Aborts the active drag; no board mutation, no network call
    pub fn cancel(&mut self) {
        if let DragPhase::Dragging { card_id, .. } = &self.phase {
            tracing::debug!(card = %card_id, "drag cancelled");
        }
        self.phase = DragPhase::Idle;
    }

    /// Completes the active drag at the given target
    ///
    /// Applies the new ordering optimistically and returns the move to
    /// commit. A drop on the card's own position changes nothing and
    /// returns `None` with no commit to make.
    pub fn drop_card(&mut self, target: DropTarget) -> Result<Option<PendingMove>> {
        let DragPhase::Dragging { card_id, .. } = self.phase else {
            return Err(KadroError::NoActiveDrag);
        };
        self.phase = DragPhase::Idle;

        let mut board = self.lock_board()?;
        let plan = plan_move(
            board.cards_by_column(),
            &card_id,
            &target.column_id,
            target.index,
        )?;

        if plan.is_noop() {
            tracing::debug!(card = %card_id, "drop changed nothing");
            return Ok(None);
        }

        // Snapshot first, then mutate: rollback must see the pre-move state
        let snapshot = board.snapshot_columns(&plan.column_ids());
        board.apply_move(&plan);
        board.lock_card(card_id)?;

        tracing::debug!(
            card = %card_id,
            target = %target.column_id,
            index = target.index,
            "optimistic move applied"
        );
        Ok(Some(PendingMove {
            card_id,
            payload: MovePayload::from_plan(&plan),
            snapshot,
        }))
    }

    /// Commits a dropped move to the server
    ///
    /// Exactly one transport call per completed drop. Success keeps the
    /// optimistic state as truth; any failure restores the pre-move
    /// snapshot and releases the card, surfacing a recoverable error.
    pub async fn commit(&self, pending: PendingMove) -> Result<Card> {
        match self.transport.submit_move(&pending.payload).await {
            Ok(card) => {
                let mut board = self.lock_board()?;
                board.release_card(&pending.card_id);
                tracing::info!(card = %pending.card_id, "move confirmed");
                Ok(card)
            }
            Err(err) => {
                let mut board = self.lock_board()?;
                board.restore(pending.snapshot);
                board.release_card(&pending.card_id);
                tracing::warn!(card = %pending.card_id, error = %err, "move rejected, rolled back");
                Err(err)
            }
        }
    }
}
