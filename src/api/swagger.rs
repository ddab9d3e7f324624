use axum::Router;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::dashboard::{StatusRequest, StatusResponse};
use crate::api::status::{BackendStatus, FullStatus, SystemStatus};
use crate::chart::{BlockChart, ChartPane, ChartPoint, ChartSeries, TooltipExtra};
use crate::dashboard::Dashboard;
use crate::panel::config::{ConfigRow, ConfigView};
use crate::panel::nodes::NodeStatus;
use crate::panel::{ChainEnvironment, NodeView, Notice, NoticeKind, PanelLayout, Tone};
use crate::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Chain Console API",
        version = "1.0.0",
        description = "Derived views of the ledger network integration.

The console reads configuration, roster and block pages from the backend
and serves the assembled settings page, chart series and status toggle.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    tags(
        (name = "console", description = "Settings page views"),
        (name = "system", description = "Console status")
    ),
    paths(
        crate::api::dashboard::get_dashboard,
        crate::api::dashboard::get_charts,
        crate::api::dashboard::post_status,
        crate::api::status::get_status,
    ),
    components(
        schemas(
            Dashboard,
            ConfigView,
            ConfigRow,
            PanelLayout,
            Tone,
            Notice,
            NoticeKind,
            NodeView,
            NodeStatus,
            ChainEnvironment,
            BlockChart,
            ChartPane,
            ChartSeries,
            ChartPoint,
            TooltipExtra,
            StatusRequest,
            StatusResponse,
            FullStatus,
            BackendStatus,
            SystemStatus,
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
