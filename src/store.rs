//! In-memory ticket store for the active project.
//!
//! DESIGN
//! ======
//! Tickets are kept in an ordered `Vec` rather than a map: insertion order
//! within a status bucket drives rendering order on the board and must
//! survive every operation that does not explicitly reorder. The collection
//! holds at most one record per id; `apply_create` upserts in place so a
//! create/update race over the live channel can never produce a duplicate
//! row.
//!
//! The store itself is not synchronized. All mutation is serialized by the
//! owning [`SyncController`](crate::controller::SyncController), which applies
//! events synchronously under one lock.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use crate::model::{Ticket, TicketId, TicketStatus};

// =============================================================================
// TICKET STORE
// =============================================================================

/// Canonical ordered collection of tickets for one project.
#[derive(Clone, Debug, Default)]
pub struct TicketStore {
    tickets: Vec<Ticket>,
}

impl TicketStore {
    #[must_use]
    pub fn new() -> Self {
        Self { tickets: Vec::new() }
    }

    /// Replace the whole collection, e.g. after the initial fetch or a
    /// polling refresh. Keeps whatever order the input provides.
    pub fn replace_all(&mut self, tickets: Vec<Ticket>) {
        self.tickets = tickets;
    }

    /// Apply a create event as an idempotent upsert: an existing id is
    /// overwritten in place, a new id is appended.
    pub fn apply_create(&mut self, ticket: Ticket) {
        match self.position(ticket.id) {
            Some(i) => self.tickets[i] = ticket,
            None => self.tickets.push(ticket),
        }
    }

    /// Apply an update event, replacing the matching record in place.
    /// An unknown id is silently ignored; events can arrive out of order
    /// relative to the snapshot that seeded the store.
    pub fn apply_update(&mut self, ticket: Ticket) {
        if let Some(i) = self.position(ticket.id) {
            self.tickets[i] = ticket;
        }
    }

    /// Apply a delete event. No-op if the id is absent.
    pub fn apply_delete(&mut self, ticket_id: TicketId) {
        self.tickets.retain(|t| t.id != ticket_id);
    }

    /// Lookup by id.
    #[must_use]
    pub fn find(&self, ticket_id: TicketId) -> Option<&Ticket> {
        self.position(ticket_id).map(|i| &self.tickets[i])
    }

    /// All tickets in store order.
    #[must_use]
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Partition the collection into the fixed status buckets with a single
    /// pass, preserving store order within each bucket.
    #[must_use]
    pub fn group_by_status(&self) -> StatusGroups {
        let mut groups = StatusGroups::default();
        for ticket in &self.tickets {
            groups.buckets[ticket.status.index()].push(ticket.clone());
        }
        groups
    }

    /// Move the ticket `dragged_id` to the position of `target_id` within
    /// their shared status bucket (array-move, not a swap). Tickets of other
    /// statuses keep their exact slots in the store.
    ///
    /// Returns `false` without mutating if either id is missing from the
    /// bucket for `status`.
    pub fn move_within_status(
        &mut self,
        status: TicketStatus,
        dragged_id: TicketId,
        target_id: TicketId,
    ) -> bool {
        let slots: Vec<usize> = self
            .tickets
            .iter()
            .enumerate()
            .filter(|(_, t)| t.status == status)
            .map(|(i, _)| i)
            .collect();

        let mut bucket: Vec<Ticket> = slots.iter().map(|&i| self.tickets[i].clone()).collect();
        let Some(old_index) = bucket.iter().position(|t| t.id == dragged_id) else {
            return false;
        };
        let Some(new_index) = bucket.iter().position(|t| t.id == target_id) else {
            return false;
        };

        array_move(&mut bucket, old_index, new_index);
        for (slot, ticket) in slots.into_iter().zip(bucket) {
            self.tickets[slot] = ticket;
        }
        true
    }

    fn position(&self, ticket_id: TicketId) -> Option<usize> {
        self.tickets.iter().position(|t| t.id == ticket_id)
    }
}

// =============================================================================
// STATUS GROUPS
// =============================================================================

/// Derived read-only partition of the store into the fixed status buckets.
#[derive(Clone, Debug, Default)]
pub struct StatusGroups {
    buckets: [Vec<Ticket>; 7],
}

impl StatusGroups {
    /// Tickets in the bucket for `status`, in store order.
    #[must_use]
    pub fn get(&self, status: TicketStatus) -> &[Ticket] {
        &self.buckets[status.index()]
    }

    /// Buckets in board column order.
    pub fn iter(&self) -> impl Iterator<Item = (TicketStatus, &[Ticket])> {
        TicketStatus::ALL
            .into_iter()
            .map(|status| (status, self.get(status)))
    }

    /// Total tickets across all buckets.
    #[must_use]
    pub fn total(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}

/// Remove the element at `old_index` and reinsert it at `new_index`;
/// elements strictly between the two positions shift by one slot toward the
/// vacated position.
pub fn array_move<T>(items: &mut Vec<T>, old_index: usize, new_index: usize) {
    if old_index == new_index || old_index >= items.len() || new_index >= items.len() {
        return;
    }
    let item = items.remove(old_index);
    items.insert(new_index, item);
}
