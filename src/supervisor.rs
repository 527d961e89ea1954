//! Connection supervisor — lifecycle state machine for the live channel.
//!
//! DESIGN
//! ======
//! States: `idle → connecting → connected ⇄ polling`, with `error` reachable
//! from any non-idle state. Transitions are driven purely by transport
//! signals: `on_connected` promotes to connected, `on_disconnected` demotes
//! to polling (the transport owns retry, the supervisor never self-promotes),
//! `on_error` marks degraded. While connected, ticket events are applied to
//! the store synchronously in delivery order and advance `last_synced_at`.
//!
//! Every callback carries the epoch captured at connect time and is dropped
//! if a teardown has happened since, so a superseded connection attempt can
//! never write into the state owned by its successor.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures are non-fatal: they surface as the `error` state and a
//! warn log. The board stays readable from the last known store contents.

#[cfg(test)]
#[path = "supervisor_test.rs"]
mod supervisor_test;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::model::{Ticket, TicketId};
use crate::state::{ConnectionState, SharedState, SyncState, lock};
use crate::transport::{ConnectParams, Transport, TransportEvents, TransportHandle};

// =============================================================================
// SUPERVISOR
// =============================================================================

/// Owns one live-channel connection attempt and its teardown.
pub struct ConnectionSupervisor {
    shared: SharedState,
    handle: Option<Box<dyn TransportHandle>>,
}

impl ConnectionSupervisor {
    /// Enter `connecting` and ask the transport to open a channel scoped to
    /// the project. A connect failure degrades to `error` instead of
    /// propagating; the supervisor is still returned so teardown stays
    /// uniform.
    #[must_use]
    pub fn start(shared: SharedState, transport: &dyn Transport, params: ConnectParams) -> Self {
        let epoch = {
            let mut state = lock(&shared);
            state.connection = ConnectionState::Connecting;
            state.epoch
        };
        debug!(project_id = params.project_id, "opening live channel");

        let events: Arc<dyn TransportEvents> =
            Arc::new(SupervisorEvents { shared: shared.clone(), epoch });
        let handle = match transport.connect(params, events) {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(error = %e, "live channel connect failed; board will serve stale data");
                lock(&shared).connection = ConnectionState::Error;
                None
            }
        };

        Self { shared, handle }
    }

    /// Disconnect the channel and invalidate every outstanding callback.
    /// Events arriving after this point are silently dropped.
    pub fn shutdown(&mut self) {
        {
            let mut state = lock(&self.shared);
            state.invalidate();
            state.connection = ConnectionState::Idle;
        }
        if let Some(mut handle) = self.handle.take() {
            handle.disconnect();
        }
    }
}

impl Drop for ConnectionSupervisor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// =============================================================================
// EVENT APPLICATION
// =============================================================================

/// Transport callback sink bound to one connection attempt's epoch.
struct SupervisorEvents {
    shared: SharedState,
    epoch: u64,
}

impl SupervisorEvents {
    /// Run `apply` against the shared state unless this connection has been
    /// superseded by a teardown.
    fn if_current(&self, apply: impl FnOnce(&mut SyncState)) {
        let mut state = lock(&self.shared);
        if state.epoch != self.epoch {
            debug!(callback_epoch = self.epoch, current_epoch = state.epoch, "dropping stale transport callback");
            return;
        }
        apply(&mut state);
    }
}

impl TransportEvents for SupervisorEvents {
    fn on_connected(&self) {
        self.if_current(|state| {
            debug!("live channel connected");
            state.connection = ConnectionState::Connected;
        });
    }

    fn on_disconnected(&self) {
        self.if_current(|state| {
            debug!("live channel dropped; falling back to polling");
            state.connection = ConnectionState::Polling;
        });
    }

    fn on_error(&self, message: &str) {
        self.if_current(|state| {
            warn!(message, "live channel error; data may be stale");
            state.connection = ConnectionState::Error;
        });
    }

    fn on_ticket_created(&self, ticket: Ticket) {
        self.if_current(|state| {
            state.store.apply_create(ticket);
            state.mark_synced();
        });
    }

    fn on_ticket_updated(&self, ticket: Ticket) {
        self.if_current(|state| {
            state.store.apply_update(ticket);
            state.mark_synced();
        });
    }

    fn on_ticket_deleted(&self, ticket_id: TicketId) {
        self.if_current(|state| {
            state.store.apply_delete(ticket_id);
            state.mark_synced();
        });
    }
}
