//! Live-channel boundary: the transport black box and its event callbacks.
//!
//! DESIGN
//! ======
//! The transport's internal protocol (push socket, long poll, message
//! framing) is not this crate's business. The contract is exactly: open a
//! channel scoped to a project, receive the six named callbacks, and tear
//! down via [`TransportHandle::disconnect`]. Keeping the seam this narrow is
//! what lets a test double stand in for the real channel without touching
//! supervisor logic.
//!
//! ERROR HANDLING
//! ==============
//! Malformed or unknown event payloads are dropped by [`decode_event`]
//! (returns `None`); nothing from the wire ever panics into the event loop.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::sync::Arc;

use crate::model::{ProjectId, Ticket, TicketEvent, TicketId};

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("transport connect failed: {0}")]
    Connect(String),
}

// =============================================================================
// BOUNDARY TRAITS
// =============================================================================

/// Parameters for opening a channel. The credential is passed in explicitly
/// by the owner; transports never read ambient global storage.
#[derive(Clone, Debug)]
pub struct ConnectParams {
    pub project_id: ProjectId,
    pub credential: String,
}

/// Callbacks a transport fires into the sync core. Lifecycle signals first,
/// then the three ticket events, applied in delivery order.
pub trait TransportEvents: Send + Sync {
    fn on_connected(&self);
    fn on_disconnected(&self);
    fn on_error(&self, message: &str);
    fn on_ticket_created(&self, ticket: Ticket);
    fn on_ticket_updated(&self, ticket: Ticket);
    fn on_ticket_deleted(&self, ticket_id: TicketId);
}

/// The live channel itself.
pub trait Transport: Send + Sync {
    /// Open a channel scoped to `params.project_id`, delivering signals and
    /// events to `events` until the returned handle is disconnected.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connect`] if the channel cannot be opened
    /// at all. Later failures are reported through `events.on_error`.
    fn connect(
        &self,
        params: ConnectParams,
        events: Arc<dyn TransportEvents>,
    ) -> Result<Box<dyn TransportHandle>, TransportError>;
}

/// Teardown handle for one open channel.
pub trait TransportHandle: Send {
    fn disconnect(&mut self);
}

// =============================================================================
// EVENT DECODING
// =============================================================================

/// Map a loosely-typed wire event (`kind` + JSON payload) to a
/// [`TicketEvent`]. Transport implementations use this to bridge their frame
/// format to the typed callbacks.
///
/// `"ticket:created"` and `"ticket:updated"` carry a full ticket object;
/// `"ticket:deleted"` carries `{ "id": … }` or a bare id. Anything else, or
/// a payload that does not parse, yields `None`.
#[must_use]
pub fn decode_event(kind: &str, payload: &serde_json::Value) -> Option<TicketEvent> {
    match kind {
        "ticket:created" => serde_json::from_value::<Ticket>(payload.clone())
            .ok()
            .map(TicketEvent::Created),
        "ticket:updated" => serde_json::from_value::<Ticket>(payload.clone())
            .ok()
            .map(TicketEvent::Updated),
        "ticket:deleted" => payload
            .get("id")
            .and_then(serde_json::Value::as_i64)
            .or_else(|| payload.as_i64())
            .map(TicketEvent::Deleted),
        _ => None,
    }
}

/// Fire a decoded event into the matching callback.
pub fn dispatch_event(events: &dyn TransportEvents, event: TicketEvent) {
    match event {
        TicketEvent::Created(ticket) => events.on_ticket_created(ticket),
        TicketEvent::Updated(ticket) => events.on_ticket_updated(ticket),
        TicketEvent::Deleted(id) => events.on_ticket_deleted(id),
    }
}
