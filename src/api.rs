//! REST collaborator boundary for ticket fetch and persistence.
//!
//! DESIGN
//! ======
//! The sync core never talks HTTP directly; it goes through [`TicketApi`] so
//! the controller can be driven by the real REST client
//! ([`RestTicketApi`](crate::rest::RestTicketApi)) or by a test stub.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns `Result<_, ApiError>`. Callers decide what a failure
//! means: the controller logs and degrades, it never panics or reverts the
//! optimistic store state.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;

use crate::model::{Priority, ProjectId, Ticket, TicketId, TicketStatus};

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("http request failed: {0}")]
    Http(String),
    #[error("unexpected status code: {0}")]
    Status(u16),
    #[error("failed to decode response: {0}")]
    Decode(String),
}

// =============================================================================
// FILTERS
// =============================================================================

/// Server-side filters for the ticket list endpoint. All fields optional;
/// the default filters nothing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TicketFilters {
    pub status: Option<TicketStatus>,
    pub priority: Option<Priority>,
    pub search: Option<String>,
}

impl TicketFilters {
    /// Render the filters as query-string pairs.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_owned()));
        }
        if let Some(priority) = self.priority {
            let literal = serde_json::to_value(priority)
                .ok()
                .and_then(|v| v.as_str().map(ToOwned::to_owned))
                .unwrap_or_default();
            pairs.push(("priority", literal));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        pairs
    }
}

// =============================================================================
// COLLABORATOR TRAIT
// =============================================================================

/// Fetch/persistence collaborator used by the sync core.
#[async_trait]
pub trait TicketApi: Send + Sync {
    /// Full ticket list for a project, used to seed the store and for
    /// polling-mode refresh.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the response cannot be
    /// decoded.
    async fn get_tickets(
        &self,
        project_id: ProjectId,
        filters: &TicketFilters,
    ) -> Result<Vec<Ticket>, ApiError>;

    /// Persist a status change made on the board.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails; the caller's optimistic
    /// store state is left standing either way.
    async fn update_ticket_status(
        &self,
        ticket_id: TicketId,
        status: TicketStatus,
    ) -> Result<(), ApiError>;
}
