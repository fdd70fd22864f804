//! Escalation tickets for answers that failed validation.
//!
//! Ticket creation is best-effort and bounded: [`request_ticket`] wraps any
//! [`Ticketer`] in a hard timeout and degrades to a placeholder id on
//! timeout or failure, so a slow ticketing system can never delay the
//! user-facing fallback response.

pub mod error;


pub use error::TicketError;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

const TICKET_PREFIX: &str = "A2G";

/// Placeholder id returned when ticket creation times out or fails.
pub const PLACEHOLDER_TICKET_ID: &str = "A2G-PENDING";

#[async_trait]
/// Creates one escalation ticket for a rejected answer.
pub trait Ticketer: Send + Sync {
    async fn create(&self, query: &str, reasons: &[String]) -> Result<String, TicketError>;
}

/// Generates ticket ids locally without an external system.
#[derive(Debug, Clone, Default)]
pub struct LocalTicketer;

#[async_trait]
impl Ticketer for LocalTicketer {
    async fn create(&self, _query: &str, reasons: &[String]) -> Result<String, TicketError> {
        let date_part = Utc::now().format("%Y%m%d");
        let unique_part = &Uuid::new_v4().simple().to_string()[..8];
        let ticket_id = format!("{TICKET_PREFIX}-{date_part}-{unique_part}");

        info!(ticket_id = %ticket_id, reasons = reasons.len(), "Created escalation ticket");
        Ok(ticket_id)
    }
}

/// Files tickets with an external system over HTTP.
///
/// Expects `POST {url}` with body `{"query": "...", "reasons": [...]}` and a
/// response of `{"ticket_id": "..."}`.
pub struct WebhookTicketer {
    http: reqwest::Client,
    url: String,
}

#[derive(Deserialize)]
struct TicketResponse {
    ticket_id: String,
}

impl WebhookTicketer {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl Ticketer for WebhookTicketer {
    async fn create(&self, query: &str, reasons: &[String]) -> Result<String, TicketError> {
        let response = self
            .http
            .post(&self.url)
            .json(&serde_json::json!({ "query": query, "reasons": reasons }))
            .send()
            .await
            .map_err(|e| TicketError::RequestFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(TicketError::RequestFailed {
                url: self.url.clone(),
                message: format!("status {}", response.status()),
            });
        }

        let body: TicketResponse =
            response
                .json()
                .await
                .map_err(|e| TicketError::InvalidResponse {
                    message: e.to_string(),
                })?;

        Ok(body.ticket_id)
    }
}

/// Requests a ticket with a hard deadline. Timeout or failure logs and
/// returns [`PLACEHOLDER_TICKET_ID`] instead of blocking the response.
pub async fn request_ticket(
    ticketer: Arc<dyn Ticketer>,
    query: &str,
    reasons: &[String],
    timeout: Duration,
) -> String {
    match tokio::time::timeout(timeout, ticketer.create(query, reasons)).await {
        Ok(Ok(ticket_id)) => ticket_id,
        Ok(Err(e)) => {
            warn!(error = %e, "Ticket creation failed");
            PLACEHOLDER_TICKET_ID.to_string()
        }
        Err(_) => {
            warn!(timeout_ms = timeout.as_millis() as u64, "Ticket creation timed out");
            PLACEHOLDER_TICKET_ID.to_string()
        }
    }
}
