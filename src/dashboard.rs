//! The whole settings page: indicator, config panel, roster and charts

use chrono::{FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

use crate::chart::{self, BlockChart, Period};
use crate::client::ChainClient;
use crate::models::{BlockchainNode, PageRequest};
use crate::panel::config::ConfigView;
use crate::panel::nodes::{self, NodeView};
use crate::panel::{ChainEnvironment, ConfigPanel, Notice, PanelLayout};
use crate::settings::Settings;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Dashboard {
    /// Absent when the config could not be loaded
    pub environment: Option<ChainEnvironment>,
    pub config: ConfigView,
    /// Absent when the roster is empty
    pub nodes: Option<Vec<NodeView>>,
    pub chart: BlockChart,
    pub notices: Vec<Notice>,
}

/// Inputs that do not come from the backend
#[derive(Debug, Clone)]
pub struct DashboardRequest {
    pub layout: PanelLayout,
    pub period: Option<Period>,
    pub page: PageRequest,
    pub today: NaiveDate,
    pub offset: FixedOffset,
}

impl DashboardRequest {
    /// First block page, bucketed and ending on today in the configured offset
    pub fn for_today(settings: &Settings, layout: PanelLayout, period: Option<Period>) -> Self {
        let offset = settings.utc_offset();
        Self {
            layout,
            period,
            page: PageRequest {
                page_size: settings.block_page_size,
                page_num: 1,
            },
            today: Utc::now().with_timezone(&offset).date_naive(),
            offset,
        }
    }
}

/// Fetch config and blocks concurrently and derive every view. A failed
/// block fetch degrades to the placeholder chart.
pub async fn load(client: &ChainClient, request: &DashboardRequest) -> Dashboard {
    let (config, blocks) = futures::join!(client.fetch_config(), client.fetch_block_list(request.page));

    let mut panel = ConfigPanel::new(request.layout);
    let mut notices = Vec::new();
    let environment = match config {
        Ok(config) => {
            let enabled = config.enabled;
            panel.apply_fetched(config);
            ChainEnvironment::from_flag(Some(enabled))
        }
        Err(e) => {
            notices.push(panel.fetch_failed(&e.message));
            ChainEnvironment::from_flag(None)
        }
    };

    let blocks = match blocks {
        Ok(page) => Some(page),
        Err(e) => {
            tracing::warn!("Block list unavailable, showing empty chart: {}", e);
            None
        }
    };

    // Roster comes from the loaded config only; the default has none
    let roster: &[BlockchainNode] = if environment.is_some() {
        panel.config().nodes()
    } else {
        &[]
    };

    Dashboard {
        environment,
        config: panel.view(),
        nodes: nodes::node_list(roster),
        chart: chart::build_block_chart(
            roster,
            blocks.as_ref(),
            request.period.as_ref(),
            request.today,
            request.offset,
        ),
        notices,
    }
}

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(env) = self.environment {
            writeln!(f, "{}", env)?;
        }
        writeln!(f, "{}", self.config)?;
        if let Some(ref nodes) = self.nodes {
            writeln!(f, "{}", nodes::render_node_list(nodes))?;
        }
        write!(f, "{}", self.chart)
    }
}
