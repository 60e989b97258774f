//! Customer database and ONU endpoints

use crate::http::{ApiClient, ApiError};
use crate::models::{
    CustomerInDb, CustomerOnuDetail, InvoiceItem, OnuStateResponse, RebootRequest, RebootResponse,
};

/// Search the fiber customer database; no query returns the full list.
pub async fn search_customers(
    client: &ApiClient,
    query: Option<&str>,
) -> Result<Vec<CustomerInDb>, ApiError> {
    let url = match query {
        Some(q) if !q.is_empty() => {
            format!("/api/v1/data_fiber/?q={}", urlencoding::encode(q))
        }
        _ => "/api/v1/data_fiber/".to_string(),
    };

    client.get(&url).await
}

/// Live device readout for a customer's ONU.
pub async fn get_onu_detail(
    client: &ApiClient,
    user_pppoe: &str,
) -> Result<CustomerOnuDetail, ApiError> {
    client
        .get(&format!(
            "/api/v1/onu/{}/detail",
            urlencoding::encode(user_pppoe)
        ))
        .await
}

/// Raw port-state dump for a customer's ONU.
pub async fn get_onu_state(
    client: &ApiClient,
    user_pppoe: &str,
) -> Result<OnuStateResponse, ApiError> {
    client
        .get(&format!(
            "/api/v1/onu/{}/state",
            urlencoding::encode(user_pppoe)
        ))
        .await
}

pub async fn reboot_onu(client: &ApiClient, user_pppoe: i64) -> Result<RebootResponse, ApiError> {
    client
        .post("/api/v1/onu/reboot", &RebootRequest { user_pppoe })
        .await
}

pub async fn get_invoices(
    client: &ApiClient,
    user_pppoe: &str,
) -> Result<Vec<InvoiceItem>, ApiError> {
    client
        .get(&format!(
            "/api/v1/customer/{}/invoices",
            urlencoding::encode(user_pppoe)
        ))
        .await
}
