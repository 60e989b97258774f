//! ONT provisioning endpoints
//!
//! The configuration workflow talks to the backend only through the
//! `ProvisioningApi` trait, so it can be driven against a mock in tests.
//! `ApiClient` is the production implementation.

use async_trait::async_trait;

use crate::http::{ApiClient, ApiError};
use crate::models::{
    ConfigurationRequest, ConfigurationResponse, DataPsb, OptionsResponse, UnconfiguredOnt,
};

const CONFIG_BASE: &str = "/api/v1/config/api";

/// Backend operations the configuration workflow depends on
#[async_trait]
pub trait ProvisioningApi: Send + Sync {
    /// OLT / modem / package option lists for the dialog
    async fn get_options(&self) -> Result<OptionsResponse, ApiError>;

    /// Detect unconfigured ONTs on one OLT
    async fn detect_unconfigured_onts(
        &self,
        olt_name: &str,
    ) -> Result<Vec<UnconfiguredOnt>, ApiError>;

    /// Submit a configuration request for one ONT
    async fn configure_ont(
        &self,
        olt_name: &str,
        request: &ConfigurationRequest,
    ) -> Result<ConfigurationResponse, ApiError>;

    /// Pre-registration customer list
    async fn get_psb_data(&self) -> Result<Vec<DataPsb>, ApiError>;
}

#[async_trait]
impl ProvisioningApi for ApiClient {
    async fn get_options(&self) -> Result<OptionsResponse, ApiError> {
        self.get(&format!("{}/options", CONFIG_BASE)).await
    }

    async fn detect_unconfigured_onts(
        &self,
        olt_name: &str,
    ) -> Result<Vec<UnconfiguredOnt>, ApiError> {
        self.get(&format!(
            "{}/olts/{}/detect-onts",
            CONFIG_BASE,
            urlencoding::encode(olt_name)
        ))
        .await
    }

    async fn configure_ont(
        &self,
        olt_name: &str,
        request: &ConfigurationRequest,
    ) -> Result<ConfigurationResponse, ApiError> {
        self.post(
            &format!(
                "{}/olts/{}/configure",
                CONFIG_BASE,
                urlencoding::encode(olt_name)
            ),
            request,
        )
        .await
    }

    async fn get_psb_data(&self) -> Result<Vec<DataPsb>, ApiError> {
        self.get("/api/v1/customer/psb").await
    }
}
