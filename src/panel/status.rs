use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

use crate::panel::Tone;

/// Header badge showing whether records go on-chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChainEnvironment {
    OnChain,
    OffChain,
}

impl ChainEnvironment {
    /// `None` while the flag is not yet known
    pub fn from_flag(enabled: Option<bool>) -> Option<Self> {
        enabled.map(|on| if on { Self::OnChain } else { Self::OffChain })
    }

    pub fn tone(&self) -> Tone {
        match self {
            Self::OnChain => Tone::Green,
            Self::OffChain => Tone::Gray,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OnChain => "ON-CHAIN",
            Self::OffChain => "OFF-CHAIN",
        }
    }
}

impl fmt::Display for ChainEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}]", self.tone(), self.label())
    }
}
