//! boardsync — live ticket-board synchronization core.
//!
//! Keeps a Kanban view of one project's tickets consistent across an initial
//! REST fetch, a push-based live channel, a polling fallback when the channel
//! is down, and local optimistic drag-and-drop mutations.
//!
//! DESIGN
//! ======
//! - [`store::TicketStore`] owns the canonical in-memory ticket list and its
//!   status-partitioned view.
//! - [`supervisor::ConnectionSupervisor`] drives the live-channel lifecycle
//!   (`idle → connecting → connected ⇄ polling`, `error` on failures) and
//!   applies incoming events in delivery order.
//! - [`reconciler`] turns drag gestures into store mutations and tells the
//!   caller what to persist.
//! - [`controller::SyncController`] composes the above per project, owns
//!   teardown, and exposes the read-only [`state::BoardSnapshot`].
//!
//! The HTTP API and the live channel are boundary traits
//! ([`api::TicketApi`], [`transport::Transport`]); [`rest::RestTicketApi`]
//! is the default HTTP implementation.

pub mod api;
pub mod controller;
pub mod model;
mod poller;
pub mod reconciler;
pub mod rest;
pub mod state;
pub mod store;
pub mod supervisor;
pub mod transport;

pub use api::{ApiError, TicketApi, TicketFilters};
pub use controller::{SyncConfig, SyncController};
pub use model::{Priority, ProjectId, Ticket, TicketEvent, TicketId, TicketStatus};
pub use reconciler::{DropOutcome, DropTarget};
pub use rest::RestTicketApi;
pub use state::{BoardSnapshot, ConnectionState};
pub use store::{StatusGroups, TicketStore};
pub use supervisor::ConnectionSupervisor;
pub use transport::{
    ConnectParams, Transport, TransportError, TransportEvents, TransportHandle, decode_event,
};
