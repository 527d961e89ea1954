use super::*;
use crate::model::{Priority, Ticket};
use time::OffsetDateTime;

fn ticket(id: TicketId, status: TicketStatus) -> Ticket {
    let ts = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
    Ticket {
        id,
        project_id: 1,
        title: format!("ticket {id}"),
        description: None,
        status,
        priority: Priority::Medium,
        due_date: None,
        created_at: ts,
        updated_at: ts,
    }
}

fn seeded(tickets: Vec<Ticket>) -> TicketStore {
    let mut store = TicketStore::new();
    store.replace_all(tickets);
    store
}

fn ids(tickets: &[Ticket]) -> Vec<TicketId> {
    tickets.iter().map(|t| t.id).collect()
}

// =============================================================
// Column drops
// =============================================================

#[test]
fn drop_on_own_column_is_a_noop() {
    let mut store = seeded(vec![ticket(1, TicketStatus::ToDo)]);
    let before = store.tickets().to_vec();

    let outcome = apply_drop(&mut store, 1, DropTarget::Column(TicketStatus::ToDo));

    assert_eq!(outcome, DropOutcome::Ignored);
    assert_eq!(store.tickets(), before.as_slice());
}

#[test]
fn drop_on_other_column_changes_only_that_tickets_status() {
    let mut store = seeded(vec![
        ticket(1, TicketStatus::ToDo),
        ticket(2, TicketStatus::ToDo),
        ticket(3, TicketStatus::Done),
    ]);

    let outcome = apply_drop(&mut store, 1, DropTarget::Column(TicketStatus::InProgress));

    assert_eq!(
        outcome,
        DropOutcome::StatusChanged { ticket_id: 1, status: TicketStatus::InProgress }
    );
    let moved = store.find(1).unwrap();
    assert_eq!(moved.status, TicketStatus::InProgress);
    assert_eq!(moved.title, "ticket 1");
    // Untouched tickets keep every field.
    assert_eq!(store.find(2).unwrap(), &ticket(2, TicketStatus::ToDo));
    assert_eq!(store.find(3).unwrap(), &ticket(3, TicketStatus::Done));
}

#[test]
fn drop_of_unknown_ticket_is_a_noop() {
    let mut store = seeded(vec![ticket(1, TicketStatus::ToDo)]);
    let outcome = apply_drop(&mut store, 99, DropTarget::Column(TicketStatus::Done));
    assert_eq!(outcome, DropOutcome::Ignored);
    assert_eq!(store.len(), 1);
}

// =============================================================
// Card drops
// =============================================================

#[test]
fn same_column_card_drop_reorders_the_bucket() {
    // TO_DO bucket [1,2,3,4]: drop 1 onto 3 -> [2,3,1,4].
    let mut store = seeded(vec![
        ticket(1, TicketStatus::ToDo),
        ticket(2, TicketStatus::ToDo),
        ticket(3, TicketStatus::ToDo),
        ticket(4, TicketStatus::ToDo),
    ]);

    let outcome = apply_drop(&mut store, 1, DropTarget::Card(3));

    assert_eq!(outcome, DropOutcome::Reordered);
    let groups = store.group_by_status();
    assert_eq!(ids(groups.get(TicketStatus::ToDo)), vec![2, 3, 1, 4]);
}

#[test]
fn card_drop_reorder_leaves_other_columns_untouched() {
    let mut store = seeded(vec![
        ticket(1, TicketStatus::ToDo),
        ticket(10, TicketStatus::InReview),
        ticket(2, TicketStatus::ToDo),
        ticket(11, TicketStatus::InReview),
    ]);

    apply_drop(&mut store, 2, DropTarget::Card(1));

    let groups = store.group_by_status();
    assert_eq!(ids(groups.get(TicketStatus::ToDo)), vec![2, 1]);
    assert_eq!(ids(groups.get(TicketStatus::InReview)), vec![10, 11]);
}

#[test]
fn cross_column_card_drop_is_a_noop() {
    let mut store = seeded(vec![
        ticket(1, TicketStatus::ToDo),
        ticket(2, TicketStatus::Done),
    ]);
    let before = store.tickets().to_vec();

    let outcome = apply_drop(&mut store, 1, DropTarget::Card(2));

    assert_eq!(outcome, DropOutcome::Ignored);
    assert_eq!(store.tickets(), before.as_slice());
}

#[test]
fn card_drop_on_missing_target_is_a_noop() {
    let mut store = seeded(vec![ticket(1, TicketStatus::ToDo)]);
    let outcome = apply_drop(&mut store, 1, DropTarget::Card(99));
    assert_eq!(outcome, DropOutcome::Ignored);
}

#[test]
fn card_drop_onto_itself_is_a_noop() {
    let mut store = seeded(vec![ticket(1, TicketStatus::ToDo), ticket(2, TicketStatus::ToDo)]);
    let before = store.tickets().to_vec();

    let outcome = apply_drop(&mut store, 1, DropTarget::Card(1));

    // Old and new index coincide; array-move leaves the bucket as is.
    assert_eq!(outcome, DropOutcome::Reordered);
    assert_eq!(store.tickets(), before.as_slice());
}
