//! Network configuration panel: view, enable/disable and edit

use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

use crate::client::ChainClient;
use crate::error::PanelError;
use crate::models::{BlockchainConfig, ConfigUpdate};
use crate::panel::form::EditForm;
use crate::panel::options::{self, Field, OptionList};
use crate::panel::{Notice, Tone};

/// Shape of the panel: which fields are shown and edited, and the values
/// shown before the backend has answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PanelLayout {
    /// Channel-based network panel
    Standard,
    /// Consensus-oriented panel without channel selection
    Legacy,
}

const STANDARD_FIELDS: &[(Field, OptionList)] = &[
    (Field::Contract, options::CONTRACT_OPTIONS),
    (Field::Network, options::NETWORK_OPTIONS),
    (Field::Channel, options::CHANNEL_OPTIONS),
    (Field::NodeRole, options::NODE_ROLE_OPTIONS),
];

const LEGACY_FIELDS: &[(Field, OptionList)] = &[
    (Field::Contract, options::CONSENSUS_OPTIONS),
    (Field::Network, options::LEGACY_NETWORK_OPTIONS),
    (Field::NodeRole, options::LEGACY_NODE_OPTIONS),
];

fn some(value: &str) -> Option<String> {
    Some(value.to_string())
}

impl PanelLayout {
    pub fn default_config(&self) -> BlockchainConfig {
        match self {
            PanelLayout::Standard => BlockchainConfig {
                enabled: true,
                name: some("XZHMU"),
                alias: some("Consortium chain"),
                address: some("192.168.1.5"),
                contract: some("xzhmu_contract_v1"),
                network: some("Mainnet"),
                mspid: some("Org1MSP"),
                organization: some("hospital"),
                channel: some("myChannel"),
                node_name: some("peer1"),
                ..Default::default()
            },
            PanelLayout::Legacy => BlockchainConfig {
                enabled: true,
                address: some("192.168.1.1"),
                contract: some("DPoS"),
                network: some("Mainnet"),
                node_name: some("Full Node"),
                ..Default::default()
            },
        }
    }

    pub fn form_fields(&self) -> &'static [(Field, OptionList)] {
        match self {
            PanelLayout::Standard => STANDARD_FIELDS,
            PanelLayout::Legacy => LEGACY_FIELDS,
        }
    }

    fn options_for(&self, field: Field) -> OptionList {
        self.form_fields()
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, opts)| *opts)
            .unwrap_or(&[])
    }

    fn status_label(&self, connected: bool) -> &'static str {
        match (self, connected) {
            (PanelLayout::Standard, true) => "Active",
            (PanelLayout::Standard, false) => "Invalid",
            (PanelLayout::Legacy, true) => "Enabled",
            (PanelLayout::Legacy, false) => "Disabled",
        }
    }

    fn rows(&self, config: &BlockchainConfig) -> Vec<ConfigRow> {
        let raw = |value: &Option<String>| value.clone().unwrap_or_default();
        let coded = |field: Field| {
            let value = field.get(config).unwrap_or_default();
            options::display_name(self.options_for(field), value).to_string()
        };

        match self {
            PanelLayout::Standard => vec![
                ConfigRow::new("Name", raw(&config.alias)),
                ConfigRow::new("Address", raw(&config.address)),
                ConfigRow::new("Organization", raw(&config.organization)),
                ConfigRow::new("Node type", coded(Field::NodeRole)),
                ConfigRow::new("Contract", coded(Field::Contract)),
                ConfigRow::new("Channel", coded(Field::Channel)),
                ConfigRow::new("Network", coded(Field::Network)),
            ],
            PanelLayout::Legacy => vec![
                ConfigRow::new("Address", raw(&config.address)),
                ConfigRow::new("Consensus", coded(Field::Contract)),
                ConfigRow::new("Network type", coded(Field::Network)),
                ConfigRow::new("Node type", coded(Field::NodeRole)),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ConfigRow {
    pub label: String,
    pub value: String,
}

impl ConfigRow {
    fn new(label: &str, value: String) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

/// Rendered state of the panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ConfigView {
    pub layout: PanelLayout,
    pub loading: bool,
    /// False until the backend has answered; the rows are the built-in
    /// default while loading and empty after a failed load
    pub loaded: bool,
    pub connected: bool,
    pub tone: Tone,
    pub status: String,
    /// Empty while the integration is disabled
    pub rows: Vec<ConfigRow>,
    pub editing: bool,
    /// Current selections of the open edit form
    pub form: Vec<ConfigRow>,
    pub can_submit: bool,
}

impl fmt::Display for ConfigView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Network configuration  {} {}", self.tone, self.status)?;
        if self.loading {
            writeln!(f, "  (loading)")?;
        }
        for row in &self.rows {
            writeln!(f, "  {:<13} {}", format!("{}:", row.label), row.value)?;
        }
        if self.editing {
            writeln!(f, "Edit configuration{}", if self.can_submit { "" } else { " (no changes)" })?;
            for row in &self.form {
                writeln!(f, "  {:<13} {}", format!("{}:", row.label), row.value)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum PanelPhase {
    Loading,
    Viewing,
    Editing(EditForm),
}

/// The built-in default and the last server answer. The server copy is
/// shown whenever present; the two are never merged.
#[derive(Debug, Clone)]
struct ConfigSlots {
    default: BlockchainConfig,
    server: Option<BlockchainConfig>,
}

impl ConfigSlots {
    fn current(&self) -> &BlockchainConfig {
        self.server.as_ref().unwrap_or(&self.default)
    }
}

const UNAVAILABLE: &str = "Unavailable";

pub struct ConfigPanel {
    layout: PanelLayout,
    phase: PanelPhase,
    slots: ConfigSlots,
    connected: bool,
}

impl ConfigPanel {
    pub fn new(layout: PanelLayout) -> Self {
        let default = layout.default_config();
        Self {
            layout,
            phase: PanelPhase::Loading,
            connected: default.enabled,
            slots: ConfigSlots {
                default,
                server: None,
            },
        }
    }

    pub fn config(&self) -> &BlockchainConfig {
        self.slots.current()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn phase(&self) -> &PanelPhase {
        &self.phase
    }

    pub fn is_loaded(&self) -> bool {
        self.slots.server.is_some()
    }

    fn is_unavailable(&self) -> bool {
        !self.is_loaded() && !matches!(self.phase, PanelPhase::Loading)
    }

    /// Record a config answer from the backend
    pub fn apply_fetched(&mut self, config: BlockchainConfig) {
        self.connected = config.enabled;
        self.slots.server = Some(config);
        if matches!(self.phase, PanelPhase::Loading) {
            self.phase = PanelPhase::Viewing;
        }
    }

    /// Leave the loading state on the built-in default
    pub fn fetch_failed(&mut self, message: &str) -> Notice {
        tracing::warn!("Failed to load ledger config: {}", message);
        if matches!(self.phase, PanelPhase::Loading) {
            self.phase = PanelPhase::Viewing;
        }
        Notice::error(format!("Failed to load configuration: {}", message))
    }

    /// Re-fetch the config; the backend copy replaces whatever is shown
    pub async fn refresh(&mut self, client: &ChainClient) -> Result<(), Notice> {
        match client.fetch_config().await {
            Ok(config) => {
                self.apply_fetched(config);
                Ok(())
            }
            Err(e) => Err(self.fetch_failed(&e.message)),
        }
    }

    /// Flip the integration on or off. The indicator only changes once the
    /// backend accepts the new status.
    pub async fn set_enabled(&mut self, client: &ChainClient, enabled: bool) -> Notice {
        match client.update_status(enabled).await {
            Ok(_) => {
                self.connected = enabled;
                if let Err(notice) = self.refresh(client).await {
                    tracing::warn!("Status updated but refresh failed: {}", notice.message);
                }
                Notice::success(if enabled {
                    "Ledger integration enabled"
                } else {
                    "Ledger integration disabled"
                })
            }
            Err(e) => {
                tracing::error!("Failed to update ledger status: {}", e);
                Notice::error(format!("Failed to update status: {}", e))
            }
        }
    }

    /// Open or close the edit form
    pub fn toggle_edit(&mut self) -> Result<(), PanelError> {
        match self.phase {
            PanelPhase::Editing(_) => {
                self.phase = PanelPhase::Viewing;
                Ok(())
            }
            _ if !self.is_loaded() => Err(PanelError::NotLoaded),
            _ if !self.connected => Err(PanelError::NotConnected),
            _ => {
                let form = EditForm::open(self.layout.form_fields(), self.slots.current());
                self.phase = PanelPhase::Editing(form);
                Ok(())
            }
        }
    }

    pub fn select(&mut self, field: Field, value: &str) -> Result<(), PanelError> {
        match &mut self.phase {
            PanelPhase::Editing(form) => form.select(field, value),
            _ => Err(PanelError::NotEditing),
        }
    }

    pub fn can_submit(&self) -> bool {
        matches!(&self.phase, PanelPhase::Editing(form) if form.is_dirty())
    }

    /// Save the form. The edited snapshot is shown immediately and replaced
    /// by the backend copy on success; on failure the previous one returns.
    pub async fn submit(&mut self, client: &ChainClient) -> Result<Notice, PanelError> {
        let form = match &self.phase {
            PanelPhase::Editing(form) => form,
            _ => return Err(PanelError::NotEditing),
        };
        let Some(saved) = self.slots.server.as_ref() else {
            return Err(PanelError::NotLoaded);
        };
        if !form.is_dirty() {
            return Ok(Notice::info("No changes to save"));
        }

        let previous = Some(saved.clone());
        let next = form.apply_to(saved);
        self.phase = PanelPhase::Viewing;
        self.slots.server = Some(next.clone());

        match client.update_config(&ConfigUpdate::from(&next)).await {
            Ok(_) => {
                if let Err(notice) = self.refresh(client).await {
                    tracing::warn!("Config saved but refresh failed: {}", notice.message);
                }
                Ok(Notice::success("Configuration updated"))
            }
            Err(e) => {
                tracing::error!("Failed to update ledger config: {}", e);
                self.slots.server = previous;
                Ok(Notice::error(format!("Failed to update configuration: {}", e)))
            }
        }
    }

    pub fn view(&self) -> ConfigView {
        let unavailable = self.is_unavailable();
        let connected = self.connected && !unavailable;
        let rows = if connected {
            self.layout.rows(self.slots.current())
        } else {
            Vec::new()
        };
        let form = match &self.phase {
            PanelPhase::Editing(form) => form
                .fields()
                .iter()
                .map(|(field, opts)| {
                    let value = form.value(*field).unwrap_or_default();
                    ConfigRow::new(field.label(), options::display_name(opts, value).to_string())
                })
                .collect(),
            _ => Vec::new(),
        };
        ConfigView {
            layout: self.layout,
            loading: matches!(self.phase, PanelPhase::Loading),
            loaded: self.is_loaded(),
            connected,
            tone: match (unavailable, connected) {
                (true, _) => Tone::Red,
                (false, true) => Tone::Green,
                (false, false) => Tone::Yellow,
            },
            status: if unavailable {
                UNAVAILABLE.to_string()
            } else {
                self.layout.status_label(connected).to_string()
            },
            rows,
            editing: matches!(self.phase, PanelPhase::Editing(_)),
            form,
            can_submit: self.can_submit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{CONFIG_PATH, STATUS_PATH};
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ChainClient {
        ChainClient::new(&server.uri(), None, Duration::from_secs(5)).unwrap()
    }

    fn server_config(enabled: bool) -> serde_json::Value {
        serde_json::json!({
            "enabled": enabled,
            "name": "XZHMU",
            "alias": "Hospital chain",
            "organization": "hospital",
            "address": "10.0.0.9",
            "contract": "xzhmu_contract_v1",
            "network": "test",
            "channel": "mychannel",
            "node_name": "Org2",
            "node_list": []
        })
    }

    async fn mount_config(server: &MockServer, enabled: bool, times: u64) {
        Mock::given(method("GET"))
            .and(path(CONFIG_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(server_config(enabled)))
            .expect(times)
            .mount(server)
            .await;
    }

    fn row<'a>(view: &'a ConfigView, label: &str) -> &'a str {
        view.rows
            .iter()
            .find(|r| r.label == label)
            .map(|r| r.value.as_str())
            .unwrap()
    }

    #[test]
    fn test_default_shown_before_load() {
        let panel = ConfigPanel::new(PanelLayout::Standard);
        let view = panel.view();
        assert!(view.loading);
        assert!(!view.loaded);
        assert!(view.connected);
        assert_eq!(row(&view, "Address"), "192.168.1.5");
        // not a network option value, echoed as-is
        assert_eq!(row(&view, "Network"), "Mainnet");
        assert_eq!(row(&view, "Contract"), "XZHMU in-house protocol");
    }

    #[test]
    fn test_server_copy_replaces_default_wholesale() {
        let mut panel = ConfigPanel::new(PanelLayout::Standard);
        panel.apply_fetched(BlockchainConfig {
            enabled: true,
            address: Some("10.1.1.1".into()),
            ..Default::default()
        });
        let view = panel.view();
        assert!(!view.loading);
        assert_eq!(row(&view, "Address"), "10.1.1.1");
        // the default organization must not leak through
        assert_eq!(row(&view, "Organization"), "");
    }

    #[test]
    fn test_disabled_config_hides_details() {
        let mut panel = ConfigPanel::new(PanelLayout::Legacy);
        panel.apply_fetched(BlockchainConfig::default());
        let view = panel.view();
        assert!(view.rows.is_empty());
        assert_eq!(view.status, "Disabled");
        assert_eq!(view.tone, Tone::Yellow);
        assert_eq!(panel.toggle_edit(), Err(PanelError::NotConnected));
    }

    #[tokio::test]
    async fn test_load_failure_keeps_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CONFIG_PATH))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut panel = ConfigPanel::new(PanelLayout::Standard);
        let notice = panel.refresh(&client_for(&server)).await.unwrap_err();
        assert!(notice.is_error());
        assert!(matches!(panel.phase(), PanelPhase::Viewing));
        assert_eq!(panel.config(), &PanelLayout::Standard.default_config());

        // the default is never presented as the live configuration
        let view = panel.view();
        assert!(!view.loaded);
        assert!(!view.connected);
        assert!(view.rows.is_empty());
        assert_eq!(view.status, "Unavailable");
        assert_eq!(view.tone, Tone::Red);
    }

    #[tokio::test]
    async fn test_edit_refused_until_loaded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CONFIG_PATH))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(CONFIG_PATH))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let client = client_for(&server);

        let mut panel = ConfigPanel::new(PanelLayout::Standard);
        assert_eq!(panel.toggle_edit(), Err(PanelError::NotLoaded));

        assert!(panel.refresh(&client).await.is_err());
        assert_eq!(panel.toggle_edit(), Err(PanelError::NotLoaded));
        assert_eq!(panel.select(Field::Network, "dev"), Err(PanelError::NotEditing));
        assert_eq!(panel.submit(&client).await.unwrap_err(), PanelError::NotEditing);
        assert!(!panel.view().editing);
    }

    #[tokio::test]
    async fn test_enable_flips_indicator_and_revalidates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(STATUS_PATH))
            .and(body_partial_json(serde_json::json!({ "blockchain_enable": true })))
            .respond_with(ResponseTemplate::new(200).set_body_json(server_config(true)))
            .expect(1)
            .mount(&server)
            .await;
        mount_config(&server, true, 1).await;

        let mut panel = ConfigPanel::new(PanelLayout::Standard);
        panel.apply_fetched(BlockchainConfig::default());
        assert!(!panel.is_connected());

        let notice = panel.set_enabled(&client_for(&server), true).await;
        assert!(!notice.is_error());
        assert!(panel.is_connected());
        assert_eq!(row(&panel.view(), "Network"), "Testnet");
    }

    #[tokio::test]
    async fn test_failed_toggle_leaves_indicator() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(STATUS_PATH))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        mount_config(&server, true, 0).await;

        let mut panel = ConfigPanel::new(PanelLayout::Standard);
        panel.apply_fetched(server_config_struct(true));

        let notice = panel.set_enabled(&client_for(&server), false).await;
        assert!(notice.is_error());
        assert!(panel.is_connected());
    }

    fn server_config_struct(enabled: bool) -> BlockchainConfig {
        serde_json::from_value(server_config(enabled)).unwrap()
    }

    #[tokio::test]
    async fn test_submit_sends_snapshot_and_refreshes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CONFIG_PATH))
            .and(body_partial_json(serde_json::json!({
                "name": "XZHMU",
                "organization": "hospital",
                "address": "10.0.0.9",
                "network": "dev",
                "node_name": "Org2"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(server_config(true)))
            .expect(1)
            .mount(&server)
            .await;
        mount_config(&server, true, 1).await;

        let mut panel = ConfigPanel::new(PanelLayout::Standard);
        panel.apply_fetched(server_config_struct(true));
        panel.toggle_edit().unwrap();
        assert!(!panel.can_submit());

        panel.select(Field::Network, "dev").unwrap();
        assert!(panel.can_submit());

        let notice = panel.submit(&client_for(&server)).await.unwrap();
        assert!(!notice.is_error());
        assert!(matches!(panel.phase(), PanelPhase::Viewing));
        assert!(!panel.can_submit());
    }

    #[tokio::test]
    async fn test_submit_failure_restores_previous() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CONFIG_PATH))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let mut panel = ConfigPanel::new(PanelLayout::Standard);
        panel.apply_fetched(server_config_struct(true));
        panel.toggle_edit().unwrap();
        panel.select(Field::Channel, "mychannel").unwrap();
        panel.select(Field::NodeRole, "Org3").unwrap();

        let notice = panel.submit(&client_for(&server)).await.unwrap();
        assert!(notice.is_error());
        assert_eq!(panel.config().node_name.as_deref(), Some("Org2"));
    }

    #[tokio::test]
    async fn test_pristine_submit_makes_no_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut panel = ConfigPanel::new(PanelLayout::Standard);
        panel.apply_fetched(server_config_struct(true));
        panel.toggle_edit().unwrap();
        panel.select(Field::Network, "test").unwrap();

        let notice = panel.submit(&client_for(&server)).await.unwrap();
        assert_eq!(notice.kind, crate::panel::NoticeKind::Info);
        assert!(matches!(panel.phase(), PanelPhase::Editing(_)));
    }

    #[tokio::test]
    async fn test_submit_requires_open_form() {
        let server = MockServer::start().await;
        let mut panel = ConfigPanel::new(PanelLayout::Legacy);
        let err = panel.submit(&client_for(&server)).await.unwrap_err();
        assert_eq!(err, PanelError::NotEditing);
        assert_eq!(panel.select(Field::Network, "Testnet"), Err(PanelError::NotEditing));
    }

    #[test]
    fn test_legacy_layout_has_no_channel() {
        let mut panel = ConfigPanel::new(PanelLayout::Legacy);
        panel.apply_fetched(PanelLayout::Legacy.default_config());
        panel.toggle_edit().unwrap();
        assert!(panel.select(Field::Channel, "mychannel").is_err());
        panel.select(Field::Contract, "PoW").unwrap();
        assert!(panel.can_submit());

        let view = panel.view();
        assert!(view.editing);
        assert_eq!(row(&view, "Consensus"), "In-house protocol v3");
        assert_eq!(view.form[0], ConfigRow::new("contract", "In-house protocol v1".into()));
        assert_eq!(view.form.len(), 3);
    }
}
