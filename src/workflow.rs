//! ONT configuration workflow
//!
//! One `ConfigSession` per open dialog. Selections move through an
//! explicit tagged step; every mutation funnels through the session's
//! methods, and `transition()` is the single place the step changes.
//! Pipeline errors are caught here and stored as the session's error
//! message; they never propagate past this layer.

use crate::api::ProvisioningApi;
use crate::models::{
    ConfigurationRequest, ConfigurationSummary, SelectedCustomer, UnconfiguredOnt,
};

const MSG_NO_ONTS: &str = "No unconfigured ONTs found";
const MSG_MISSING_SELECTION: &str = "Please select an OLT, ONT, and Customer";
const MSG_MISSING_MODEM: &str = "Please select a Modem Type";

/// Where the session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowStep {
    #[default]
    Idle,
    OltSelected,
    OntsDetected,
    OntSelected,
    CustomerSelected,
    Configuring,
    Succeeded,
    Failed,
}

/// State for one configuration dialog session.
#[derive(Default)]
pub struct ConfigSession {
    step: WorkflowStep,
    selected_olt: String,
    unconfigured_onts: Vec<UnconfiguredOnt>,
    selected_ont: Option<UnconfiguredOnt>,
    selected_customer: Option<SelectedCustomer>,
    modem_type: String,
    eth_locks: [bool; 4],
    error: Option<String>,
    success: Option<String>,
    summary: Option<ConfigurationSummary>,
    logs: Vec<String>,
    configuring: bool,
}

impl ConfigSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the OLT the detection scan will target. Detection results are
    /// tied to one OLT, so everything downstream of the choice is dropped.
    pub fn select_olt(&mut self, name: &str) {
        self.selected_olt = name.to_string();
        self.unconfigured_onts.clear();
        self.selected_ont = None;
        self.selected_customer = None;

        if self.selected_olt.is_empty() {
            self.transition(WorkflowStep::Idle);
        } else {
            self.transition(WorkflowStep::OltSelected);
        }
    }

    /// Scan the selected OLT for unconfigured ONTs.
    ///
    /// Without an OLT this is a silent no-op; the gate in `configure()`
    /// is the canonical point of user-facing validation. On failure the
    /// previous ONT set stays untouched.
    pub async fn detect_onts(&mut self, api: &dyn ProvisioningApi) {
        if self.selected_olt.is_empty() {
            return;
        }

        self.error = None;
        self.success = None;

        match api.detect_unconfigured_onts(&self.selected_olt).await {
            Ok(onts) => {
                self.selected_ont = None;
                if onts.is_empty() {
                    self.success = Some(MSG_NO_ONTS.to_string());
                }
                self.unconfigured_onts = onts;
                self.transition(WorkflowStep::OntsDetected);
            }
            Err(err) => {
                self.error = Some(err.to_string());
            }
        }
    }

    /// Choose the ONT to configure. Starting a fresh attempt invalidates
    /// stale messages and provisioning logs.
    pub fn select_ont(&mut self, ont: UnconfiguredOnt) {
        self.selected_ont = Some(ont);
        self.error = None;
        self.success = None;
        self.summary = None;
        self.logs.clear();
        self.transition(WorkflowStep::OntSelected);
    }

    /// Set the customer selection, replacing any previous one wholesale.
    pub fn select_customer(&mut self, customer: SelectedCustomer) {
        self.selected_customer = Some(customer);
        if self.selected_ont.is_some() {
            self.transition(WorkflowStep::CustomerSelected);
        }
    }

    pub fn clear_customer(&mut self) {
        self.selected_customer = None;
    }

    pub fn set_modem_type(&mut self, value: &str) {
        self.modem_type = value.to_string();
    }

    pub fn set_eth_locks(&mut self, locks: [bool; 4]) {
        self.eth_locks = locks;
    }

    /// Validate the selections, build the configuration request and submit
    /// it. On success the configured serial is pruned from the local set
    /// and the per-attempt selections reset for the next ONT; on failure
    /// everything stays so the operator can retry without re-selecting.
    pub async fn configure(&mut self, api: &dyn ProvisioningApi) {
        if self.configuring {
            tracing::debug!("Configuration already in flight, ignoring");
            return;
        }

        let (ont, customer) = match (self.selected_ont.as_ref(), self.selected_customer.as_ref()) {
            (Some(ont), Some(customer)) if !self.selected_olt.is_empty() => {
                (ont.clone(), customer.clone())
            }
            _ => {
                self.error = Some(MSG_MISSING_SELECTION.to_string());
                return;
            }
        };

        if self.modem_type.is_empty() {
            self.error = Some(MSG_MISSING_MODEM.to_string());
            return;
        }

        let request = ConfigurationRequest {
            sn: ont.sn.clone(),
            customer: customer.info,
            modem_type: self.modem_type.clone(),
            package: customer.package,
            eth_locks: self.eth_locks,
        };

        self.error = None;
        self.success = None;
        self.configuring = true;
        self.transition(WorkflowStep::Configuring);

        let result = api.configure_ont(&self.selected_olt, &request).await;
        self.configuring = false;

        match result {
            Ok(response) => {
                self.success = Some(response.message);
                self.summary = Some(response.summary);
                self.logs = response.logs;
                self.unconfigured_onts.retain(|o| o.sn != ont.sn);
                self.selected_ont = None;
                self.selected_customer = None;
                self.modem_type.clear();
                self.eth_locks = [false; 4];
                self.transition(WorkflowStep::Succeeded);
            }
            Err(err) => {
                self.error = Some(err.to_string());
                self.transition(WorkflowStep::Failed);
            }
        }
    }

    /// Back to a pristine session (dialog closed or explicit reset).
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn transition(&mut self, next: WorkflowStep) {
        if self.step != next {
            tracing::debug!(from = ?self.step, to = ?next, "Workflow step");
            self.step = next;
        }
    }

    pub fn step(&self) -> WorkflowStep {
        self.step
    }

    pub fn selected_olt(&self) -> &str {
        &self.selected_olt
    }

    pub fn unconfigured_onts(&self) -> &[UnconfiguredOnt] {
        &self.unconfigured_onts
    }

    pub fn selected_ont(&self) -> Option<&UnconfiguredOnt> {
        self.selected_ont.as_ref()
    }

    pub fn selected_customer(&self) -> Option<&SelectedCustomer> {
        self.selected_customer.as_ref()
    }

    pub fn modem_type(&self) -> &str {
        &self.modem_type
    }

    pub fn eth_locks(&self) -> [bool; 4] {
        self.eth_locks
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn summary(&self) -> Option<&ConfigurationSummary> {
        self.summary.as_ref()
    }

    pub fn logs(&self) -> &[String] {
        &self.logs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ApiError;
    use crate::models::{
        ConfigurationResponse, ConfigurationSummary, CustomerInfo, DataPsb, OptionsResponse,
    };
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockApi {
        detect_calls: AtomicUsize,
        configure_calls: AtomicUsize,
        detect_results: Mutex<VecDeque<Result<Vec<UnconfiguredOnt>, ApiError>>>,
        configure_results: Mutex<VecDeque<Result<ConfigurationResponse, ApiError>>>,
    }

    impl MockApi {
        fn push_detect(&self, result: Result<Vec<UnconfiguredOnt>, ApiError>) {
            self.detect_results.lock().unwrap().push_back(result);
        }

        fn push_configure(&self, result: Result<ConfigurationResponse, ApiError>) {
            self.configure_results.lock().unwrap().push_back(result);
        }
    }

    #[async_trait]
    impl ProvisioningApi for MockApi {
        async fn get_options(&self) -> Result<OptionsResponse, ApiError> {
            Ok(OptionsResponse::default())
        }

        async fn detect_unconfigured_onts(
            &self,
            _olt_name: &str,
        ) -> Result<Vec<UnconfiguredOnt>, ApiError> {
            self.detect_calls.fetch_add(1, Ordering::SeqCst);
            self.detect_results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn configure_ont(
            &self,
            _olt_name: &str,
            _request: &ConfigurationRequest,
        ) -> Result<ConfigurationResponse, ApiError> {
            self.configure_calls.fetch_add(1, Ordering::SeqCst);
            self.configure_results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Transport("no mocked response".to_string())))
        }

        async fn get_psb_data(&self) -> Result<Vec<DataPsb>, ApiError> {
            Ok(Vec::new())
        }
    }

    fn ont(sn: &str) -> UnconfiguredOnt {
        UnconfiguredOnt {
            sn: sn.to_string(),
            pon_slot: 2,
            pon_port: 5,
        }
    }

    fn customer() -> SelectedCustomer {
        SelectedCustomer {
            info: CustomerInfo {
                name: "Budi".to_string(),
                address: "Jl. Melati 4".to_string(),
                pppoe_user: "budi01".to_string(),
                pppoe_pass: "rahasia".to_string(),
            },
            package: "20M".to_string(),
        }
    }

    fn success_response(message: &str) -> ConfigurationResponse {
        ConfigurationResponse {
            message: message.to_string(),
            summary: ConfigurationSummary {
                sn: "ZTEG00000001".to_string(),
                pon_slot: 2,
                pon_port: 5,
                onu_id: 7,
                vlan: 100,
                customer_name: "Budi".to_string(),
                customer_address: "Jl. Melati 4".to_string(),
                modem_type: "F609".to_string(),
                package: "20M".to_string(),
                status: "configured".to_string(),
            },
            logs: vec!["onu added".to_string(), "pppoe bound".to_string()],
        }
    }

    #[tokio::test]
    async fn test_detect_without_olt_is_silent_noop() {
        let api = MockApi::default();
        let mut session = ConfigSession::new();

        session.detect_onts(&api).await;

        assert_eq!(api.detect_calls.load(Ordering::SeqCst), 0);
        assert!(session.unconfigured_onts().is_empty());
        assert_eq!(session.error(), None);
        assert_eq!(session.step(), WorkflowStep::Idle);
    }

    #[tokio::test]
    async fn test_detect_empty_result_sets_message() {
        let api = MockApi::default();
        api.push_detect(Ok(Vec::new()));

        let mut session = ConfigSession::new();
        session.select_olt("OLT-1");
        session.detect_onts(&api).await;

        assert_eq!(session.success(), Some("No unconfigured ONTs found"));
        assert!(session.selected_ont().is_none());
        assert_eq!(session.step(), WorkflowStep::OntsDetected);
    }

    #[tokio::test]
    async fn test_detect_replaces_set_and_clears_selection() {
        let api = MockApi::default();
        api.push_detect(Ok(vec![ont("A"), ont("B")]));
        api.push_detect(Ok(vec![ont("C")]));

        let mut session = ConfigSession::new();
        session.select_olt("OLT-1");
        session.detect_onts(&api).await;
        session.select_ont(ont("A"));

        session.detect_onts(&api).await;

        assert_eq!(session.unconfigured_onts(), &[ont("C")]);
        assert!(session.selected_ont().is_none());
    }

    #[tokio::test]
    async fn test_detect_failure_keeps_previous_set() {
        let api = MockApi::default();
        api.push_detect(Ok(vec![ont("A")]));
        api.push_detect(Err(ApiError::Server("OLT unreachable".to_string())));

        let mut session = ConfigSession::new();
        session.select_olt("OLT-1");
        session.detect_onts(&api).await;

        session.detect_onts(&api).await;

        assert_eq!(session.error(), Some("OLT unreachable"));
        assert_eq!(session.unconfigured_onts(), &[ont("A")]);
    }

    #[tokio::test]
    async fn test_configure_without_selections_sets_error_and_skips_network() {
        let api = MockApi::default();
        let mut session = ConfigSession::new();

        session.configure(&api).await;

        assert_eq!(session.error(), Some("Please select an OLT, ONT, and Customer"));
        assert_eq!(api.configure_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_configure_without_modem_sets_error_and_skips_network() {
        let api = MockApi::default();
        api.push_detect(Ok(vec![ont("A")]));

        let mut session = ConfigSession::new();
        session.select_olt("OLT-1");
        session.detect_onts(&api).await;
        session.select_ont(ont("A"));
        session.select_customer(customer());

        session.configure(&api).await;

        assert_eq!(session.error(), Some("Please select a Modem Type"));
        assert_eq!(api.configure_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_configure_success_prunes_serial_and_resets_selections() {
        let api = MockApi::default();
        api.push_detect(Ok(vec![ont("A"), ont("B")]));
        api.push_configure(Ok(success_response("ONT configured")));

        let mut session = ConfigSession::new();
        session.select_olt("OLT-1");
        session.detect_onts(&api).await;
        session.select_ont(ont("A"));
        session.select_customer(customer());
        session.set_modem_type("F609");
        session.set_eth_locks([true, false, true, false]);

        session.configure(&api).await;

        assert_eq!(api.configure_calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.success(), Some("ONT configured"));
        assert_eq!(session.summary().map(|s| s.status.as_str()), Some("configured"));
        assert_eq!(session.logs(), &["onu added".to_string(), "pppoe bound".to_string()]);
        assert_eq!(session.unconfigured_onts(), &[ont("B")]);
        assert!(session.selected_ont().is_none());
        assert!(session.selected_customer().is_none());
        assert_eq!(session.modem_type(), "");
        assert_eq!(session.eth_locks(), [false; 4]);
        assert_eq!(session.step(), WorkflowStep::Succeeded);
    }

    #[tokio::test]
    async fn test_configure_failure_keeps_selections() {
        let api = MockApi::default();
        api.push_detect(Ok(vec![ont("A")]));
        api.push_configure(Err(ApiError::Server("provisioning failed".to_string())));

        let mut session = ConfigSession::new();
        session.select_olt("OLT-1");
        session.detect_onts(&api).await;
        session.select_ont(ont("A"));
        session.select_customer(customer());
        session.set_modem_type("F609");

        session.configure(&api).await;

        assert_eq!(session.error(), Some("provisioning failed"));
        assert_eq!(session.selected_ont(), Some(&ont("A")));
        assert_eq!(session.selected_customer(), Some(&customer()));
        assert_eq!(session.modem_type(), "F609");
        assert_eq!(session.unconfigured_onts(), &[ont("A")]);
        assert_eq!(session.step(), WorkflowStep::Failed);
    }

    #[tokio::test]
    async fn test_reselecting_olt_clears_downstream_state() {
        let api = MockApi::default();
        api.push_detect(Ok(vec![ont("A")]));

        let mut session = ConfigSession::new();
        session.select_olt("OLT-1");
        session.detect_onts(&api).await;
        session.select_ont(ont("A"));
        session.select_customer(customer());

        session.select_olt("OLT-2");

        assert!(session.unconfigured_onts().is_empty());
        assert!(session.selected_ont().is_none());
        assert!(session.selected_customer().is_none());
        assert_eq!(session.step(), WorkflowStep::OltSelected);
    }

    #[tokio::test]
    async fn test_select_ont_clears_messages_and_logs() {
        let api = MockApi::default();
        api.push_detect(Ok(vec![ont("A"), ont("B")]));
        api.push_configure(Ok(success_response("ONT configured")));

        let mut session = ConfigSession::new();
        session.select_olt("OLT-1");
        session.detect_onts(&api).await;
        session.select_ont(ont("A"));
        session.select_customer(customer());
        session.set_modem_type("F609");
        session.configure(&api).await;
        assert!(!session.logs().is_empty());

        session.select_ont(ont("B"));

        assert_eq!(session.success(), None);
        assert_eq!(session.error(), None);
        assert!(session.logs().is_empty());
    }

    #[tokio::test]
    async fn test_reset_restores_initial_state() {
        let api = MockApi::default();
        api.push_detect(Ok(vec![ont("A")]));

        let mut session = ConfigSession::new();
        session.select_olt("OLT-1");
        session.detect_onts(&api).await;
        session.select_ont(ont("A"));
        session.select_customer(customer());
        session.set_modem_type("F609");
        session.set_eth_locks([true, true, true, true]);

        session.reset();

        assert_eq!(session.step(), WorkflowStep::Idle);
        assert_eq!(session.selected_olt(), "");
        assert!(session.unconfigured_onts().is_empty());
        assert!(session.selected_ont().is_none());
        assert!(session.selected_customer().is_none());
        assert_eq!(session.modem_type(), "");
        assert_eq!(session.eth_locks(), [false; 4]);
        assert_eq!(session.error(), None);
        assert_eq!(session.success(), None);
        assert!(session.summary().is_none());
        assert!(session.logs().is_empty());
    }

    #[tokio::test]
    async fn test_clearing_customer_invalidates_selection() {
        let api = MockApi::default();
        api.push_detect(Ok(vec![ont("A")]));

        let mut session = ConfigSession::new();
        session.select_olt("OLT-1");
        session.detect_onts(&api).await;
        session.select_ont(ont("A"));
        session.select_customer(customer());
        session.set_modem_type("F609");

        session.clear_customer();
        session.configure(&api).await;

        assert_eq!(session.error(), Some("Please select an OLT, ONT, and Customer"));
        assert_eq!(api.configure_calls.load(Ordering::SeqCst), 0);
    }
}
