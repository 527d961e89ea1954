//! Sync controller — composition root for one project's board sync.
//!
//! DESIGN
//! ======
//! Wires the ticket store, connection supervisor, board reconciler, and
//! polling fallback together for a single project context. Construction
//! takes the credential and project id explicitly in [`SyncConfig`]; nothing
//! is read from ambient global storage.
//!
//! A project switch is a full re-initialization: tear down the supervisor
//! (disconnect + epoch bump), reset the store, then start fresh against the
//! new project. In-flight requests from the old context are not cancelled;
//! the epoch check makes their eventual resolution a no-op.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is contained: fetch and connect problems degrade the
//! realtime indicator and log a warning, a failed status persistence leaves
//! the optimistic store state standing (reconciled by the next server event
//! or refresh), and nothing in this module panics the caller's event loop.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::{ApiError, TicketApi, TicketFilters};
use crate::model::{ProjectId, TicketId, TicketStatus};
use crate::poller::spawn_poll_task;
use crate::reconciler::{self, DropOutcome, DropTarget};
use crate::state::{BoardSnapshot, ConnectionState, SharedState, lock, new_shared};
use crate::supervisor::ConnectionSupervisor;
use crate::transport::{ConnectParams, Transport};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

// =============================================================================
// CONFIG
// =============================================================================

/// Explicit construction-time configuration for a [`SyncController`].
#[derive(Clone, Debug)]
pub struct SyncConfig {
    pub project_id: ProjectId,
    /// Credential forwarded to the fetch and transport collaborators. An
    /// empty credential keeps the controller idle.
    pub credential: String,
    /// Server-side filters applied to every full fetch.
    pub filters: TicketFilters,
    /// Cadence of the polling fallback.
    pub poll_interval: Duration,
}

impl SyncConfig {
    #[must_use]
    pub fn new(project_id: ProjectId, credential: impl Into<String>) -> Self {
        Self {
            project_id,
            credential: credential.into(),
            filters: TicketFilters::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Owner of one project's board sync: store, live channel, polling fallback,
/// and the drag-and-drop mutation entry points.
pub struct SyncController {
    config: SyncConfig,
    shared: SharedState,
    api: Arc<dyn TicketApi>,
    transport: Arc<dyn Transport>,
    supervisor: Option<ConnectionSupervisor>,
    poll_task: Option<JoinHandle<()>>,
}

impl SyncController {
    #[must_use]
    pub fn new(config: SyncConfig, api: Arc<dyn TicketApi>, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            shared: new_shared(),
            api,
            transport,
            supervisor: None,
            poll_task: None,
        }
    }

    #[must_use]
    pub fn project_id(&self) -> ProjectId {
        self.config.project_id
    }

    /// Seed the store with an initial fetch, then open the live channel and
    /// arm the polling fallback. With an empty credential the controller
    /// stays idle and performs no network activity.
    pub async fn start(&mut self) {
        self.shutdown();

        if self.config.credential.is_empty() {
            debug!(project_id = self.config.project_id, "no credential; staying idle");
            return;
        }

        let project_id = self.config.project_id;
        let epoch = lock(&self.shared).epoch;

        match self.api.get_tickets(project_id, &self.config.filters).await {
            Ok(tickets) => {
                let mut state = lock(&self.shared);
                if state.epoch == epoch {
                    state.store.replace_all(tickets);
                    state.mark_synced();
                }
            }
            Err(e) => {
                warn!(error = %e, project_id, "initial ticket fetch failed; board starts from last known state");
                let mut state = lock(&self.shared);
                if state.epoch == epoch {
                    state.connection = ConnectionState::Error;
                }
            }
        }

        let params = ConnectParams {
            project_id,
            credential: self.config.credential.clone(),
        };
        self.supervisor = Some(ConnectionSupervisor::start(
            self.shared.clone(),
            self.transport.as_ref(),
            params,
        ));
        self.poll_task = Some(spawn_poll_task(
            self.shared.clone(),
            self.api.clone(),
            project_id,
            self.config.filters.clone(),
            self.config.poll_interval,
        ));
    }

    /// Re-run initialization against a different project: tear down the old
    /// connection, reset the store, start fresh.
    pub async fn switch_project(&mut self, project_id: ProjectId) {
        debug!(from = self.config.project_id, to = project_id, "switching project context");
        self.shutdown();
        {
            let mut state = lock(&self.shared);
            state.store.replace_all(Vec::new());
            state.last_synced_at = None;
        }
        self.config.project_id = project_id;
        self.start().await;
    }

    /// Disconnect the live channel and invalidate every outstanding
    /// asynchronous continuation. Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(mut supervisor) = self.supervisor.take() {
            supervisor.shutdown();
        } else {
            let mut state = lock(&self.shared);
            state.invalidate();
            state.connection = ConnectionState::Idle;
        }
        if let Some(task) = self.poll_task.take() {
            task.abort();
        }
    }

    // -------------------------------------------------------------------------
    // UI consumption surface
    // -------------------------------------------------------------------------

    /// Read-only snapshot of the board for presentation code.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        let state = lock(&self.shared);
        BoardSnapshot {
            tickets: state.store.tickets().to_vec(),
            groups: state.store.group_by_status(),
            realtime_status: state.connection,
            last_synced_at: state.last_synced_at,
        }
    }

    /// Column-drop entry point: optimistically move the ticket to `status`
    /// and persist the change. A drop onto the ticket's current column is a
    /// no-op and issues no request.
    ///
    /// # Errors
    ///
    /// Returns the persistence failure. The optimistic store state is left
    /// standing either way; the next server event or refresh reconciles.
    pub async fn update_ticket_status(
        &self,
        ticket_id: TicketId,
        status: TicketStatus,
    ) -> Result<(), ApiError> {
        let outcome = {
            let mut state = lock(&self.shared);
            reconciler::apply_drop(&mut state.store, ticket_id, DropTarget::Column(status))
        };

        if let DropOutcome::StatusChanged { ticket_id, status } = outcome {
            if let Err(e) = self.api.update_ticket_status(ticket_id, status).await {
                warn!(error = %e, ticket_id, status = %status, "status update failed; optimistic state stands until next sync");
                return Err(e);
            }
        }
        Ok(())
    }

    /// Card-drop entry point: move `dragged_id` to `target_id`'s position
    /// within their shared column. Local-only; returns whether the order
    /// changed.
    pub fn reorder_within_status(&self, dragged_id: TicketId, target_id: TicketId) -> bool {
        let mut state = lock(&self.shared);
        matches!(
            reconciler::apply_drop(&mut state.store, dragged_id, DropTarget::Card(target_id)),
            DropOutcome::Reordered
        )
    }

    /// Manual full refresh, e.g. from a retry affordance in the UI.
    ///
    /// # Errors
    ///
    /// Returns the fetch failure; the previous store contents are kept.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let project_id = self.config.project_id;
        let epoch = lock(&self.shared).epoch;

        match self.api.get_tickets(project_id, &self.config.filters).await {
            Ok(tickets) => {
                let mut state = lock(&self.shared);
                if state.epoch != epoch {
                    debug!(project_id, "discarding refresh that resolved after teardown");
                    return Ok(());
                }
                state.store.replace_all(tickets);
                state.mark_synced();
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, project_id, "manual refresh failed; keeping last known tickets");
                Err(e)
            }
        }
    }
}

impl Drop for SyncController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
