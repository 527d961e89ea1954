//! Default REST implementation of the ticket fetch/persistence collaborator.
//!
//! Thin HTTP wrapper over the admin console's ticket endpoints. URL and body
//! construction are split out as pure functions for testability; the
//! interceptor stack (retry, auth refresh) lives in the embedding
//! application, not here.

#[cfg(test)]
#[path = "rest_test.rs"]
mod rest_test;

use std::time::Duration;

use async_trait::async_trait;

use crate::api::{ApiError, TicketApi, TicketFilters};
use crate::model::{ProjectId, Ticket, TicketId, TicketStatus};

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// CLIENT
// =============================================================================

/// Bearer-authenticated reqwest client for the ticket REST API.
pub struct RestTicketApi {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl RestTicketApi {
    /// Build a client for `base_url` (no trailing slash required) using
    /// `token` as the bearer credential.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying HTTP client fails to
    /// build.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::Http(e.to_string()))?;
        Ok(Self { http, base_url: normalize_base_url(base_url.into()), token: token.into() })
    }
}

#[async_trait]
impl TicketApi for RestTicketApi {
    async fn get_tickets(
        &self,
        project_id: ProjectId,
        filters: &TicketFilters,
    ) -> Result<Vec<Ticket>, ApiError> {
        let response = self
            .http
            .get(tickets_url(&self.base_url, project_id))
            .bearer_auth(&self.token)
            .query(&filters.to_query())
            .send()
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(ApiError::Status(status));
        }

        response
            .json::<Vec<Ticket>>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn update_ticket_status(
        &self,
        ticket_id: TicketId,
        status: TicketStatus,
    ) -> Result<(), ApiError> {
        let response = self
            .http
            .patch(status_url(&self.base_url, ticket_id))
            .bearer_auth(&self.token)
            .json(&status_body(status))
            .send()
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;

        let code = response.status().as_u16();
        if !(200..300).contains(&code) {
            return Err(ApiError::Status(code));
        }
        Ok(())
    }
}

// =============================================================================
// URL / BODY CONSTRUCTION
// =============================================================================

fn normalize_base_url(mut base_url: String) -> String {
    while base_url.ends_with('/') {
        base_url.pop();
    }
    base_url
}

fn tickets_url(base_url: &str, project_id: ProjectId) -> String {
    format!("{base_url}/api/projects/{project_id}/tickets")
}

fn status_url(base_url: &str, ticket_id: TicketId) -> String {
    format!("{base_url}/api/tickets/{ticket_id}/status")
}

fn status_body(status: TicketStatus) -> serde_json::Value {
    serde_json::json!({ "status": status })
}
