//! Shared sync state.
//!
//! DESIGN
//! ======
//! One [`SyncState`] per active project context, owned by a single
//! [`SyncController`](crate::controller::SyncController) and shared behind
//! `Arc<Mutex<_>>` with the components it wires. Mutation is effectively
//! single-threaded: everything goes through this one lock, and the lock is
//! never held across an await.
//!
//! The `epoch` counter is the generation guard: every teardown bumps it, and
//! every asynchronous continuation captures it up front and re-checks it
//! before touching the store, so late callbacks from a superseded connection
//! can never mutate the successor's state.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use time::OffsetDateTime;

use crate::store::{StatusGroups, TicketStore};

// =============================================================================
// CONNECTION STATE
// =============================================================================

/// Live-channel lifecycle as shown to the UI. Presentation metadata only:
/// it never gates reads of the store contents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    #[default]
    Idle,
    Connecting,
    Connected,
    Polling,
    Error,
}

// =============================================================================
// SYNC STATE
// =============================================================================

/// Mutable state for one project's board sync.
#[derive(Debug, Default)]
pub struct SyncState {
    pub store: TicketStore,
    pub connection: ConnectionState,
    /// Most recent successful application of server-originated data.
    /// Advanced by live events and refreshes, never by optimistic edits.
    pub last_synced_at: Option<OffsetDateTime>,
    /// Generation counter; bumped on every teardown.
    pub epoch: u64,
}

impl SyncState {
    /// Record that server-originated data was just applied.
    pub fn mark_synced(&mut self) {
        self.last_synced_at = Some(OffsetDateTime::now_utc());
    }

    /// Invalidate all outstanding asynchronous continuations.
    pub fn invalidate(&mut self) {
        self.epoch += 1;
    }
}

/// Handle shared between the controller, supervisor, and polling task.
pub type SharedState = Arc<Mutex<SyncState>>;

#[must_use]
pub fn new_shared() -> SharedState {
    Arc::new(Mutex::new(SyncState::default()))
}

/// Lock the shared state, recovering the inner value if a previous holder
/// panicked.
pub(crate) fn lock(shared: &SharedState) -> MutexGuard<'_, SyncState> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Read-only view handed to presentation code.
#[derive(Clone, Debug)]
pub struct BoardSnapshot {
    /// Flat ticket list in store order.
    pub tickets: Vec<crate::model::Ticket>,
    /// Status-partitioned view in board column order.
    pub groups: StatusGroups,
    pub realtime_status: ConnectionState,
    pub last_synced_at: Option<OffsetDateTime>,
}
