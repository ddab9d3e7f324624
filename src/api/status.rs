use axum::{extract::State, Json};
use std::sync::Arc;

use crate::panel::{ChainEnvironment, PanelLayout};
use crate::AppState;

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct FullStatus {
    pub backend: BackendStatus,
    pub system: SystemStatus,
}

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct BackendStatus {
    pub url: String,
    pub reachable: bool,
    /// Header badge; absent while the backend cannot be reached
    pub environment: Option<ChainEnvironment>,
    pub error: Option<String>,
}

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct SystemStatus {
    pub version: String,
    pub uptime_seconds: u64,
    pub memory_usage_mb: Option<u64>,
    pub layout: PanelLayout,
}

static START_TIME: std::sync::OnceLock<std::time::Instant> = std::sync::OnceLock::new();

/// Record the process start for uptime reporting
pub fn mark_started() {
    START_TIME.get_or_init(std::time::Instant::now);
}

/// GET /status - Console and backend status
#[utoipa::path(
    get,
    path = "/status",
    tag = "system",
    responses((status = 200, description = "Console status", body = FullStatus))
)]
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<FullStatus> {
    let start = START_TIME.get_or_init(std::time::Instant::now);

    let (enabled, error) = match state.client.fetch_config().await {
        Ok(config) => (Some(config.enabled), None),
        Err(e) => (None, Some(e.message)),
    };

    Json(FullStatus {
        backend: BackendStatus {
            url: state.client.url.clone(),
            reachable: enabled.is_some(),
            environment: ChainEnvironment::from_flag(enabled),
            error,
        },
        system: SystemStatus {
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: start.elapsed().as_secs(),
            memory_usage_mb: get_memory_usage(),
            layout: state.layout,
        },
    })
}

fn get_memory_usage() -> Option<u64> {
    #[cfg(target_os = "linux")]
    {
        if let Ok(status) = std::fs::read_to_string("/proc/self/status") {
            return status
                .lines()
                .find(|line| line.starts_with("VmRSS:"))
                .and_then(|line| line.split_whitespace().nth(1))
                .and_then(|kb| kb.parse::<u64>().ok())
                .map(|kb| kb / 1024);
        }
    }
    None
}
