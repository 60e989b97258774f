//! Trouble-ticket endpoints

use crate::http::{ApiClient, ApiError};
use crate::models::{
    ForwardTicketPayload, OpenTicketRequest, ProcessTicketRequest, TicketActionResponse,
    TicketClosePayload,
};

/// Open a ticket; the backend processes it immediately when
/// `process_immediately` is set.
pub async fn open_ticket(
    client: &ApiClient,
    request: &OpenTicketRequest,
) -> Result<TicketActionResponse, ApiError> {
    client.post("/api/v1/ticket/", request).await
}

pub async fn process_ticket(
    client: &ApiClient,
    request: &ProcessTicketRequest,
) -> Result<TicketActionResponse, ApiError> {
    client.post("/api/v1/ticket/proses_ticket", request).await
}

pub async fn forward_ticket(
    client: &ApiClient,
    payload: &ForwardTicketPayload,
) -> Result<TicketActionResponse, ApiError> {
    client.post("/api/v1/ticket/forward_ticket", payload).await
}

pub async fn close_ticket(
    client: &ApiClient,
    payload: &TicketClosePayload,
) -> Result<TicketActionResponse, ApiError> {
    client.post("/api/v1/ticket/close_ticket", payload).await
}
