//! Wire shapes for the CSM backend API
//!
//! Every endpoint gets an explicit request/response struct; payloads are
//! parsed at the boundary rather than passed around as raw JSON.

use serde::{Deserialize, Serialize};

/// Response from POST /api/v1/auth/login
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
}

/// Server-provided option lists for the configuration dialog
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionsResponse {
    pub olt_options: Vec<String>,
    pub modem_options: Vec<String>,
    pub package_options: Vec<String>,
}

/// A detected, not-yet-provisioned ONT on one OLT
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnconfiguredOnt {
    pub sn: String,
    pub pon_slot: u32,
    pub pon_port: u32,
}

/// Canonical customer shape fed into the configuration request,
/// regardless of which lookup path produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub address: String,
    pub pppoe_user: String,
    pub pppoe_pass: String,
}

/// Customer record from the PSB pre-registration source
#[derive(Debug, Clone, Deserialize)]
pub struct DataPsb {
    pub name: String,
    pub address: String,
    pub username: String,
    pub password: String,
    pub paket: String,
}

/// Customer record from the live fiber database
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerInDb {
    pub name: String,
    pub alamat: String,
    pub olt_name: String,
    pub onu_sn: String,
    pub pppoe_password: String,
    pub interface: String,
    pub onu_id: String,
    pub sheet: String,
    pub paket: String,
    pub user_pppoe: String,
    pub updated_at: String,
}

/// A customer selection held by the workflow: the canonical info plus the
/// package string that rides alongside it in the configuration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedCustomer {
    pub info: CustomerInfo,
    pub package: String,
}

impl From<&DataPsb> for SelectedCustomer {
    fn from(psb: &DataPsb) -> Self {
        Self {
            info: CustomerInfo {
                name: psb.name.clone(),
                address: psb.address.clone(),
                pppoe_user: psb.username.clone(),
                pppoe_pass: psb.password.clone(),
            },
            package: psb.paket.clone(),
        }
    }
}

impl From<&CustomerInDb> for SelectedCustomer {
    fn from(db: &CustomerInDb) -> Self {
        Self {
            info: CustomerInfo {
                name: db.name.clone(),
                address: db.alamat.clone(),
                pppoe_user: db.user_pppoe.clone(),
                pppoe_pass: db.pppoe_password.clone(),
            },
            package: db.paket.clone(),
        }
    }
}

/// Payload for POST /api/v1/config/api/olts/{olt}/configure
#[derive(Debug, Clone, Serialize)]
pub struct ConfigurationRequest {
    pub sn: String,
    pub customer: CustomerInfo,
    pub modem_type: String,
    pub package: String,
    pub eth_locks: [bool; 4],
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigurationResponse {
    pub message: String,
    pub summary: ConfigurationSummary,
    pub logs: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigurationSummary {
    pub sn: String,
    pub pon_slot: u32,
    pub pon_port: u32,
    pub onu_id: u32,
    pub vlan: u32,
    pub customer_name: String,
    pub customer_address: String,
    pub modem_type: String,
    pub package: String,
    pub status: String,
}

/// Detail readout for a provisioned ONU. The backend fills in what the
/// device reports; everything is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerOnuDetail {
    #[serde(rename = "type")]
    pub onu_type: Option<String>,
    pub phase_state: Option<String>,
    pub serial_number: Option<String>,
    pub onu_distance: Option<String>,
    pub online_duration: Option<String>,
    pub redaman: Option<String>,
    pub ip_remote: Option<String>,
    #[serde(default)]
    pub eth_port: Vec<EthPort>,
    pub modem_logs: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EthPort {
    pub is_unlocked: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OnuStateResponse {
    pub onu_state_data: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RebootRequest {
    pub user_pppoe: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RebootResponse {
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceItem {
    pub period: String,
    pub amount: i64,
    pub status: String,
    pub paid_at: Option<String>,
}

/// Payload for POST /api/v1/ticket/
#[derive(Debug, Clone, Serialize)]
pub struct OpenTicketRequest {
    pub user_pppoe: String,
    pub issue: String,
    pub description: Option<String>,
    pub process_immediately: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessTicketRequest {
    pub ticket_id: String,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForwardTicketPayload {
    pub ticket_id: String,
    pub destination: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketClosePayload {
    pub ticket_id: String,
    pub resolution: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TicketActionResponse {
    pub status: String,
    pub ticket_id: Option<String>,
    pub message: Option<String>,
}
