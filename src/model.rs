//! Ticket domain model shared by the store, the sync machinery, and the
//! REST/transport boundaries.
//!
//! DESIGN
//! ======
//! The seven status literals live in exactly one place: [`TicketStatus::ALL`].
//! Both the store's partitioning and any column rendering derive from it, so
//! the grouping logic and the displayed board cannot drift apart.
//!
//! Serde names follow the admin console's REST JSON: camelCase fields,
//! SCREAMING_SNAKE_CASE status/priority literals.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Server-assigned ticket identifier, stable and unique within a project.
pub type TicketId = i64;

/// Server-assigned project identifier.
pub type ProjectId = i64;

// =============================================================================
// STATUS
// =============================================================================

/// Board column a ticket lives in. The declaration order is the board's
/// column order and the iteration order of every status-partitioned view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    New,
    ToDo,
    InProgress,
    InReview,
    Done,
    Resolved,
    Closed,
}

impl TicketStatus {
    /// Every status, in board column order.
    pub const ALL: [Self; 7] = [
        Self::New,
        Self::ToDo,
        Self::InProgress,
        Self::InReview,
        Self::Done,
        Self::Resolved,
        Self::Closed,
    ];

    /// Position of this status within [`Self::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::New => 0,
            Self::ToDo => 1,
            Self::InProgress => 2,
            Self::InReview => 3,
            Self::Done => 4,
            Self::Resolved => 5,
            Self::Closed => 6,
        }
    }

    /// Wire literal for this status, e.g. `"IN_PROGRESS"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::ToDo => "TO_DO",
            Self::InProgress => "IN_PROGRESS",
            Self::InReview => "IN_REVIEW",
            Self::Done => "DONE",
            Self::Resolved => "RESOLVED",
            Self::Closed => "CLOSED",
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// PRIORITY
// =============================================================================

/// Ticket priority as reported by the server.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

// =============================================================================
// TICKET
// =============================================================================

/// A single unit of work on the board. Mirrors the server's ticket resource.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    pub project_id: ProjectId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TicketStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

// =============================================================================
// EVENTS
// =============================================================================

/// A server-originated ticket mutation delivered over the live channel or
/// synthesized by a transport implementation.
#[derive(Clone, Debug, PartialEq)]
pub enum TicketEvent {
    Created(Ticket),
    Updated(Ticket),
    Deleted(TicketId),
}
