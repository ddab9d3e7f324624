//! Console panels: config, node roster and the on-chain indicator

pub mod config;
pub mod form;
pub mod nodes;
pub mod options;
pub mod status;

use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

pub use config::{ConfigPanel, PanelLayout};
pub use nodes::NodeView;
pub use status::ChainEnvironment;

/// Indicator color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Green,
    Yellow,
    Gray,
    Red,
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dot = match self {
            Tone::Green => "(+)",
            Tone::Yellow => "(!)",
            Tone::Gray => "(-)",
            Tone::Red => "(x)",
        };
        f.write_str(dot)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Info,
    Error,
}

/// User-facing outcome of a panel action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Success, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Info, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, message: message.into() }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }

    /// Log the notice and echo it to the terminal
    pub fn emit(&self) {
        match self.kind {
            NoticeKind::Error => {
                tracing::error!("{}", self.message);
                eprintln!("error: {}", self.message);
            }
            _ => {
                tracing::info!("{}", self.message);
                println!("{}", self.message);
            }
        }
    }
}
