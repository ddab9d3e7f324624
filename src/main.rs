use anyhow::{Context, Result};
use axum::{routing::get, Router};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod chart;
mod client;
mod dashboard;
mod error;
mod models;
mod panel;
mod settings;

use chart::Period;
use client::ChainClient;
use dashboard::DashboardRequest;
use models::PageRequest;
use panel::options::Field;
use panel::{nodes, ConfigPanel, PanelLayout};
use settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "chain-console")]
#[command(about = "Administration console for the ledger network integration")]
pub struct Cli {
    /// Backend API root (overrides the settings file)
    #[arg(long, env = "CHAIN_CONSOLE_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Console API bearer token
    #[arg(long, env = "CHAIN_CONSOLE_TOKEN", global = true)]
    pub token: Option<String>,

    /// Settings file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Panel layout
    #[arg(long, value_enum, default_value = "standard", global = true)]
    pub layout: PanelLayout,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the whole settings page
    Show(PeriodArgs),
    /// Enable or disable the integration
    Status {
        #[arg(value_enum)]
        state: Toggle,
    },
    /// Change select fields of the configuration
    Edit(EditArgs),
    /// Print the peer roster
    Nodes {
        /// Read the node network info endpoint instead of the config roster
        #[arg(long)]
        network_info: bool,
    },
    /// Print one page of blocks
    Blocks {
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long, default_value = "1")]
        page_num: u32,
    },
    /// Print the node count and block height charts
    Chart {
        #[command(flatten)]
        period: PeriodArgs,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Serve the console views over HTTP
    Serve,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum Toggle {
    Enable,
    Disable,
}

#[derive(Args, Debug)]
pub struct PeriodArgs {
    /// First day of the period (YYYY-MM-DD)
    #[arg(long, requires = "end")]
    pub start: Option<NaiveDate>,
    /// Last day of the period (YYYY-MM-DD)
    #[arg(long, requires = "start")]
    pub end: Option<NaiveDate>,
}

impl PeriodArgs {
    fn period(&self) -> Result<Option<Period>> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Ok(Some(Period::new(start, end)?)),
            _ => Ok(None),
        }
    }
}

#[derive(Args, Debug)]
pub struct EditArgs {
    #[arg(long)]
    pub contract: Option<String>,
    #[arg(long)]
    pub network: Option<String>,
    #[arg(long)]
    pub channel: Option<String>,
    #[arg(long)]
    pub node_role: Option<String>,
}

impl EditArgs {
    fn selections(&self) -> Vec<(Field, &str)> {
        [
            (Field::Contract, &self.contract),
            (Field::Network, &self.network),
            (Field::Channel, &self.channel),
            (Field::NodeRole, &self.node_role),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

pub struct AppState {
    pub client: ChainClient,
    pub settings: Settings,
    pub layout: PanelLayout,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chain_console=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    if let Some(ref url) = cli.base_url {
        settings.base_url = url.clone();
    }
    if cli.token.is_some() {
        settings.api_token = cli.token.clone();
    }

    tracing::debug!("Backend: {}", settings.base_url);

    let client = ChainClient::new(
        &settings.base_url,
        settings.api_token.clone(),
        Duration::from_secs(settings.timeout_secs),
    )?;

    let state = AppState {
        client,
        settings,
        layout: cli.layout,
    };

    match cli.command {
        Command::Show(ref args) => {
            let request = DashboardRequest::for_today(&state.settings, state.layout, args.period()?);
            let page = dashboard::load(&state.client, &request).await;
            for notice in &page.notices {
                notice.emit();
            }
            println!("{}", page);
        }
        Command::Status { state: toggle } => {
            let mut panel = load_panel(&state).await;
            let notice = panel.set_enabled(&state.client, matches!(toggle, Toggle::Enable)).await;
            notice.emit();
            print!("{}", panel.view());
            if notice.is_error() {
                anyhow::bail!("status change rejected");
            }
        }
        Command::Edit(ref args) => {
            let mut panel = ConfigPanel::new(state.layout);
            if let Err(notice) = panel.refresh(&state.client).await {
                notice.emit();
                anyhow::bail!("configuration not loaded, nothing edited");
            }
            panel.toggle_edit()?;
            for (field, value) in args.selections() {
                panel.select(field, value)?;
            }
            let notice = panel.submit(&state.client).await?;
            notice.emit();
            print!("{}", panel.view());
            if notice.is_error() {
                anyhow::bail!("configuration update rejected");
            }
        }
        Command::Nodes { network_info } => {
            if network_info {
                let info = state.client.fetch_node_list().await?;
                print!("{}", nodes::render_network_info(&info));
            } else {
                let config = state.client.fetch_config().await?;
                match nodes::node_list(config.nodes()) {
                    Some(list) => print!("{}", nodes::render_node_list(&list)),
                    None => println!("No nodes reported"),
                }
            }
        }
        Command::Blocks { page_size, page_num } => {
            let page = PageRequest {
                page_size: page_size.unwrap_or(state.settings.block_page_size),
                page_num,
            };
            let data = state.client.fetch_block_list(page).await?;
            println!("Page {} ({} per page, {} total)", data.page_num, data.page_size, data.total);
            for block in &data.blocks {
                println!(
                    "  #{:<8} {}  txs={:<4} hash={} prev={}",
                    block.block_num, block.save_time, block.tx_count, block.block_hash, block.prev_hash
                );
            }
            if data.has_more {
                println!("  (more: --page-num {})", page_num + 1);
            }
        }
        Command::Chart { ref period, json } => {
            let request = DashboardRequest::for_today(&state.settings, state.layout, period.period()?);
            let chart = dashboard::load(&state.client, &request).await.chart;
            if json {
                println!("{}", serde_json::to_string_pretty(&chart)?);
            } else {
                println!("{}", chart);
            }
        }
        Command::Serve => serve(state).await?,
    }

    Ok(())
}

async fn load_panel(state: &AppState) -> ConfigPanel {
    let mut panel = ConfigPanel::new(state.layout);
    if let Err(notice) = panel.refresh(&state.client).await {
        notice.emit();
    }
    panel
}

async fn serve(state: AppState) -> Result<()> {
    api::status::mark_started();
    let addr = format!("{}:{}", state.settings.host, state.settings.port);
    tracing::info!("Starting chain-console v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Backend: {}", state.settings.base_url);

    let state = Arc::new(state);
    let app = Router::new()
        .nest("/api/v1", api::routes())
        .route("/status", get(api::status::get_status))
        .route("/health", get(|| async { "OK" }))
        .merge(api::swagger::swagger_routes())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
