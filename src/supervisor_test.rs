use super::*;
use crate::model::{Priority, TicketStatus};
use crate::state::new_shared;
use crate::transport::TransportError;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
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

fn params() -> ConnectParams {
    ConnectParams { project_id: 1, credential: "tok".into() }
}

// =============================================================
// Test doubles
// =============================================================

/// Transport that hands the captured callback sink back to the test so it
/// can fire signals at will.
#[derive(Default)]
struct FakeTransport {
    events: Mutex<Option<Arc<dyn TransportEvents>>>,
    disconnects: Arc<AtomicUsize>,
    fail_connect: bool,
}

impl FakeTransport {
    fn captured(&self) -> Arc<dyn TransportEvents> {
        self.events.lock().unwrap().clone().expect("connect not called")
    }
}

impl Transport for FakeTransport {
    fn connect(
        &self,
        _params: ConnectParams,
        events: Arc<dyn TransportEvents>,
    ) -> Result<Box<dyn TransportHandle>, TransportError> {
        if self.fail_connect {
            return Err(TransportError::Connect("refused".into()));
        }
        *self.events.lock().unwrap() = Some(events);
        Ok(Box::new(FakeHandle { disconnects: self.disconnects.clone() }))
    }
}

struct FakeHandle {
    disconnects: Arc<AtomicUsize>,
}

impl TransportHandle for FakeHandle {
    fn disconnect(&mut self) {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
    }
}

// =============================================================
// Lifecycle transitions
// =============================================================

#[test]
fn start_enters_connecting() {
    let shared = new_shared();
    let transport = FakeTransport::default();
    let _supervisor = ConnectionSupervisor::start(shared.clone(), &transport, params());
    assert_eq!(lock(&shared).connection, ConnectionState::Connecting);
}

#[test]
fn connected_signal_promotes_to_connected() {
    let shared = new_shared();
    let transport = FakeTransport::default();
    let _supervisor = ConnectionSupervisor::start(shared.clone(), &transport, params());

    transport.captured().on_connected();
    assert_eq!(lock(&shared).connection, ConnectionState::Connected);
}

#[test]
fn disconnected_signal_demotes_to_polling() {
    let shared = new_shared();
    let transport = FakeTransport::default();
    let _supervisor = ConnectionSupervisor::start(shared.clone(), &transport, params());

    let events = transport.captured();
    events.on_connected();
    events.on_disconnected();
    assert_eq!(lock(&shared).connection, ConnectionState::Polling);

    // Only a fresh connected signal promotes back out of polling.
    events.on_connected();
    assert_eq!(lock(&shared).connection, ConnectionState::Connected);
}

#[test]
fn error_signal_marks_degraded_without_clearing_the_store() {
    let shared = new_shared();
    lock(&shared).store.replace_all(vec![ticket(1, TicketStatus::ToDo)]);
    let transport = FakeTransport::default();
    let _supervisor = ConnectionSupervisor::start(shared.clone(), &transport, params());

    transport.captured().on_error("socket reset");

    let state = lock(&shared);
    assert_eq!(state.connection, ConnectionState::Error);
    assert_eq!(state.store.len(), 1);
}

#[test]
fn connect_failure_degrades_to_error_without_panicking() {
    let shared = new_shared();
    let transport = FakeTransport { fail_connect: true, ..Default::default() };
    let mut supervisor = ConnectionSupervisor::start(shared.clone(), &transport, params());

    assert_eq!(lock(&shared).connection, ConnectionState::Error);
    // Teardown with no handle is still safe.
    supervisor.shutdown();
    assert_eq!(lock(&shared).connection, ConnectionState::Idle);
}

// =============================================================
// Event application
// =============================================================

#[test]
fn ticket_events_apply_in_delivery_order_and_advance_last_synced_at() {
    let shared = new_shared();
    let transport = FakeTransport::default();
    let _supervisor = ConnectionSupervisor::start(shared.clone(), &transport, params());
    let events = transport.captured();
    events.on_connected();

    events.on_ticket_created(ticket(1, TicketStatus::New));
    events.on_ticket_updated(ticket(1, TicketStatus::InProgress));
    events.on_ticket_created(ticket(2, TicketStatus::ToDo));
    events.on_ticket_deleted(2);

    let state = lock(&shared);
    assert_eq!(state.store.len(), 1);
    assert_eq!(state.store.find(1).unwrap().status, TicketStatus::InProgress);
    assert!(state.last_synced_at.is_some());
}

#[test]
fn create_then_update_race_resolved_by_upsert() {
    let shared = new_shared();
    let transport = FakeTransport::default();
    let _supervisor = ConnectionSupervisor::start(shared.clone(), &transport, params());
    let events = transport.captured();

    // A second create for the same id overwrites rather than duplicating.
    events.on_ticket_created(ticket(7, TicketStatus::New));
    events.on_ticket_created(ticket(7, TicketStatus::ToDo));

    let state = lock(&shared);
    assert_eq!(state.store.len(), 1);
    assert_eq!(state.store.find(7).unwrap().status, TicketStatus::ToDo);
}

// =============================================================
// Teardown
// =============================================================

#[test]
fn shutdown_disconnects_exactly_once_and_returns_to_idle() {
    let shared = new_shared();
    let transport = FakeTransport::default();
    let mut supervisor = ConnectionSupervisor::start(shared.clone(), &transport, params());

    supervisor.shutdown();
    supervisor.shutdown();

    assert_eq!(transport.disconnects.load(Ordering::SeqCst), 1);
    assert_eq!(lock(&shared).connection, ConnectionState::Idle);
}

#[test]
fn drop_tears_the_connection_down() {
    let shared = new_shared();
    let transport = FakeTransport::default();
    {
        let _supervisor = ConnectionSupervisor::start(shared.clone(), &transport, params());
    }
    assert_eq!(transport.disconnects.load(Ordering::SeqCst), 1);
}

#[test]
fn events_after_shutdown_are_dropped() {
    let shared = new_shared();
    let transport = FakeTransport::default();
    let mut supervisor = ConnectionSupervisor::start(shared.clone(), &transport, params());
    let stale_events = transport.captured();

    supervisor.shutdown();
    stale_events.on_ticket_created(ticket(1, TicketStatus::New));
    stale_events.on_connected();

    let state = lock(&shared);
    assert!(state.store.is_empty());
    assert_eq!(state.connection, ConnectionState::Idle);
    assert!(state.last_synced_at.is_none());
}
