use super::*;

// =============================================================
// URL construction
// =============================================================

#[test]
fn tickets_url_scopes_to_project() {
    assert_eq!(
        tickets_url("https://console.example.com", 7),
        "https://console.example.com/api/projects/7/tickets"
    );
}

#[test]
fn status_url_scopes_to_ticket() {
    assert_eq!(
        status_url("https://console.example.com", 42),
        "https://console.example.com/api/tickets/42/status"
    );
}

#[test]
fn base_url_trailing_slashes_are_stripped() {
    assert_eq!(normalize_base_url("http://localhost:3000//".into()), "http://localhost:3000");
    assert_eq!(normalize_base_url("http://localhost:3000".into()), "http://localhost:3000");
}

// =============================================================
// Body construction
// =============================================================

#[test]
fn status_body_carries_wire_literal() {
    let body = status_body(crate::model::TicketStatus::InReview);
    assert_eq!(body, serde_json::json!({ "status": "IN_REVIEW" }));
}

// =============================================================
// Client construction
// =============================================================

#[test]
fn client_builds_with_plain_base_url() {
    assert!(RestTicketApi::new("http://localhost:3000", "token").is_ok());
}
