//! Board reconciler — turns drag gestures into store mutations.
//!
//! DESIGN
//! ======
//! A drop is classified by its target:
//!
//! - onto a column with the ticket's current status: no-op;
//! - onto a different column: optimistic status change, to be persisted by
//!   the caller (exactly one outbound request per gesture);
//! - onto a card in a different column: no-op (only a column drop changes
//!   status);
//! - onto a card in the same column: array-move reorder, local-only.
//!
//! The reconciler only requests mutations on the store it is handed; it
//! never holds a competing copy of the tickets. The optimistic status change
//! is applied before the persistence request resolves; a failed request is
//! not rolled back here — the next server event or refresh reconciles.

#[cfg(test)]
#[path = "reconciler_test.rs"]
mod reconciler_test;

use crate::model::{TicketId, TicketStatus};
use crate::store::TicketStore;

// =============================================================================
// GESTURE MODEL
// =============================================================================

/// What the drag gesture was released over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropTarget {
    /// A status column.
    Column(TicketStatus),
    /// Another ticket card.
    Card(TicketId),
}

/// Store-side result of a drop, telling the caller what (if anything) must
/// be persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    /// Nothing changed; no persistence call may be issued.
    Ignored,
    /// Same-column reorder applied; local-only.
    Reordered,
    /// Status changed optimistically; the caller owes one
    /// `update_ticket_status` request.
    StatusChanged { ticket_id: TicketId, status: TicketStatus },
}

// =============================================================================
// DECISION TABLE
// =============================================================================

/// Apply a drop of `dragged_id` onto `target` against the store.
///
/// Defensive no-ops everywhere an id fails to resolve: a drag that races a
/// delete event simply dissolves.
pub fn apply_drop(store: &mut TicketStore, dragged_id: TicketId, target: DropTarget) -> DropOutcome {
    let Some(dragged) = store.find(dragged_id) else {
        return DropOutcome::Ignored;
    };
    let current_status = dragged.status;

    match target {
        DropTarget::Column(status) if status == current_status => DropOutcome::Ignored,
        DropTarget::Column(status) => {
            let mut updated = dragged.clone();
            updated.status = status;
            store.apply_update(updated);
            DropOutcome::StatusChanged { ticket_id: dragged_id, status }
        }
        DropTarget::Card(target_id) => {
            let Some(target_ticket) = store.find(target_id) else {
                return DropOutcome::Ignored;
            };
            if target_ticket.status != current_status {
                // Cross-column reordering via card drop is not supported.
                return DropOutcome::Ignored;
            }
            if store.move_within_status(current_status, dragged_id, target_id) {
                DropOutcome::Reordered
            } else {
                DropOutcome::Ignored
            }
        }
    }
}
