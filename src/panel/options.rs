//! Fixed select options for the edit form

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::BlockchainConfig;

/// A select field of the edit form and the config key it writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Contract,
    Network,
    Channel,
    NodeRole,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Contract => "contract",
            Field::Network => "network",
            Field::Channel => "channel",
            Field::NodeRole => "node role",
        }
    }

    pub fn get<'a>(&self, config: &'a BlockchainConfig) -> Option<&'a str> {
        match self {
            Field::Contract => config.contract.as_deref(),
            Field::Network => config.network.as_deref(),
            Field::Channel => config.channel.as_deref(),
            Field::NodeRole => config.node_name.as_deref(),
        }
    }

    pub fn set(&self, config: &mut BlockchainConfig, value: String) {
        let slot = match self {
            Field::Contract => &mut config.contract,
            Field::Network => &mut config.network,
            Field::Channel => &mut config.channel,
            Field::NodeRole => &mut config.node_name,
        };
        *slot = Some(value);
    }
}

/// (value, display name)
pub type OptionList = &'static [(&'static str, &'static str)];

pub const CONTRACT_OPTIONS: OptionList = &[("xzhmu_contract_v1", "XZHMU in-house protocol")];

pub const NETWORK_OPTIONS: OptionList = &[
    ("main", "Mainnet"),
    ("test", "Testnet"),
    ("dev", "Devnet"),
];

pub const CHANNEL_OPTIONS: OptionList = &[("mychannel", "Encrypted channel")];

pub const NODE_ROLE_OPTIONS: OptionList = &[
    ("Org1", "Producer Node"),
    ("Org2", "Supervisor Node"),
    ("Org3", "Customer Node"),
];

pub const CONSENSUS_OPTIONS: OptionList = &[
    ("PoW", "In-house protocol v1"),
    ("PoS", "In-house protocol v2"),
    ("DPoS", "In-house protocol v3"),
];

pub const LEGACY_NETWORK_OPTIONS: OptionList = &[
    ("Mainnet", "Mainnet"),
    ("Testnet", "Testnet"),
    ("Devnet", "Devnet"),
];

pub const LEGACY_NODE_OPTIONS: OptionList = &[
    ("Full Node", "Full Node"),
    ("Light Node", "Light Node"),
    ("Archive Node", "Archive Node"),
];

/// Display name for `value`, or `value` itself when it is not a known option
pub fn display_name<'a>(options: OptionList, value: &'a str) -> &'a str {
    options
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, name)| *name)
        .unwrap_or(value)
}

pub fn contains(options: OptionList, value: &str) -> bool {
    options.iter().any(|(v, _)| *v == value)
}
