//! Polling fallback — periodic full refresh while the live channel is down.
//!
//! DESIGN
//! ======
//! A background task ticks at the configured interval and, only while the
//! connection state is `polling`, re-fetches the full ticket list and
//! applies it with `replace_all`. Delayed ticks are skipped, not replayed.
//! The task captures the epoch at spawn time and exits as soon as a
//! teardown bumps it; a fetch that resolves after teardown is discarded.
//!
//! ERROR HANDLING
//! ==============
//! A failed refresh logs a warning and keeps the previous store contents:
//! stale-but-present data beats an empty board.

#[cfg(test)]
#[path = "poller_test.rs"]
mod poller_test;

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::api::{TicketApi, TicketFilters};
use crate::model::ProjectId;
use crate::state::{ConnectionState, SharedState, lock};

/// Spawn the polling-mode refresh task. Returns a handle the owner aborts on
/// teardown (the epoch check makes the abort a formality, not a correctness
/// requirement).
pub(crate) fn spawn_poll_task(
    shared: SharedState,
    api: Arc<dyn TicketApi>,
    project_id: ProjectId,
    filters: TicketFilters,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let epoch = lock(&shared).epoch;
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately; skip it so the initial fetch
        // done at startup is not duplicated.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            {
                let state = lock(&shared);
                if state.epoch != epoch {
                    debug!(project_id, "poll task superseded; exiting");
                    return;
                }
                if state.connection != ConnectionState::Polling {
                    continue;
                }
            }

            match api.get_tickets(project_id, &filters).await {
                Ok(tickets) => {
                    let mut state = lock(&shared);
                    if state.epoch != epoch {
                        debug!(project_id, "discarding poll refresh that resolved after teardown");
                        return;
                    }
                    state.store.replace_all(tickets);
                    state.mark_synced();
                }
                Err(e) => {
                    warn!(error = %e, project_id, "polling refresh failed; keeping last known tickets");
                }
            }
        }
    })
}
