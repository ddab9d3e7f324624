use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::chart::{BlockChart, Period};
use crate::dashboard::{self, Dashboard, DashboardRequest};
use crate::error::ApiError;
use crate::panel::config::ConfigView;
use crate::panel::{ConfigPanel, Notice};
use crate::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct PeriodQuery {
    /// First day, `YYYY-MM-DD`
    pub start: Option<NaiveDate>,
    /// Last day, `YYYY-MM-DD`
    pub end: Option<NaiveDate>,
}

impl PeriodQuery {
    fn period(&self) -> Result<Option<Period>, (StatusCode, String)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Period::new(start, end)
                .map(Some)
                .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string())),
            (None, None) => Ok(None),
            _ => Err((
                StatusCode::BAD_REQUEST,
                "start and end must be given together".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusRequest {
    pub enabled: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub notice: Notice,
    pub config: ConfigView,
}

fn upstream_error(e: ApiError) -> (StatusCode, String) {
    let status = match e.status {
        Some(s) if s.is_client_error() => {
            StatusCode::from_u16(s.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        _ => StatusCode::BAD_GATEWAY,
    };
    (status, e.message)
}

/// GET /api/v1/dashboard - Status, config panel, roster and charts
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "console",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Assembled settings page", body = Dashboard),
        (status = 400, description = "Invalid period")
    )
)]
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<Dashboard>, (StatusCode, String)> {
    let request = DashboardRequest::for_today(&state.settings, state.layout, query.period()?);
    Ok(Json(dashboard::load(&state.client, &request).await))
}

/// GET /api/v1/charts - Node count and block height charts
#[utoipa::path(
    get,
    path = "/charts",
    tag = "console",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Both chart panes", body = BlockChart),
        (status = 400, description = "Invalid period")
    )
)]
pub async fn get_charts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<BlockChart>, (StatusCode, String)> {
    let request = DashboardRequest::for_today(&state.settings, state.layout, query.period()?);
    Ok(Json(dashboard::load(&state.client, &request).await.chart))
}

/// POST /api/v1/status - Enable or disable the ledger integration
#[utoipa::path(
    post,
    path = "/status",
    tag = "console",
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Status updated", body = StatusResponse),
        (status = 502, description = "Backend rejected the change")
    )
)]
pub async fn post_status(
    State(state): State<Arc<AppState>>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<StatusResponse>, (StatusCode, String)> {
    let current = state.client.fetch_config().await.map_err(upstream_error)?;

    let mut panel = ConfigPanel::new(state.layout);
    panel.apply_fetched(current);
    let notice = panel.set_enabled(&state.client, body.enabled).await;
    if notice.is_error() {
        return Err((StatusCode::BAD_GATEWAY, notice.message));
    }

    Ok(Json(StatusResponse {
        notice,
        config: panel.view(),
    }))
}
