//! Wire models for the ledger network backend

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Value/display-name pair offered by a select field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SelectOption {
    pub name: String,
    pub value: String,
}

/// Connection parameters for the ledger network integration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BlockchainConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub mspid: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub chain_code: Option<String>,
    #[serde(default)]
    pub chaincode_amount: Option<i64>,
    #[serde(default)]
    pub contract: Option<String>,
    #[serde(default)]
    pub orderer: Option<String>,
    #[serde(default)]
    pub node_name: Option<String>,
    #[serde(default)]
    pub node_url: Option<String>,
    // The backend marshals these two as strings
    #[serde(default)]
    pub node_amount: Option<String>,
    #[serde(default)]
    pub block_height: Option<String>,
    #[serde(default)]
    pub node_list: Option<Vec<BlockchainNode>>,
    #[serde(default)]
    pub chain_list: Option<Vec<String>>,
    #[serde(default)]
    #[schema(value_type = Option<Vec<Object>>)]
    pub contract_list: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub node_options: Option<Vec<SelectOption>>,
    #[serde(default)]
    pub network_options: Option<Vec<SelectOption>>,
    #[serde(default)]
    pub contract_options: Option<Vec<SelectOption>>,
}

impl BlockchainConfig {
    /// Roster of peers, empty when the backend sent none
    pub fn nodes(&self) -> &[BlockchainNode] {
        self.node_list.as_deref().unwrap_or(&[])
    }
}

/// One peer in the network roster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainNode {
    #[serde(default)]
    pub org_name: String,
    #[serde(default)]
    pub peer_name: String,
    #[serde(rename = "mspID", default)]
    pub msp_id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Network info record returned by the node endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainNodeData {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub chaincode: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub nodes_count: u32,
    #[serde(default)]
    pub org_count: u32,
    #[serde(default)]
    pub nodes: Option<Vec<BlockchainNode>>,
}

/// A ledger block as stored by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BlockchainBlock {
    pub block_num: u64,
    #[serde(default)]
    pub block_hash: String,
    #[serde(default)]
    pub data_hash: String,
    #[serde(default)]
    pub prev_hash: String,
    #[serde(default)]
    pub tx_count: u64,
    pub save_time: String,
}

/// One page of blocks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BlockchainBlockData {
    #[serde(default)]
    pub page_num: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub blocks: Vec<BlockchainBlock>,
    #[serde(default)]
    pub has_more: bool,
}

/// Body of the status endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusUpdate {
    pub blockchain_enable: bool,
}

/// Body of the config update endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConfigUpdate {
    pub enabled: bool,
    pub name: String,
    pub organization: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
}

impl From<&BlockchainConfig> for ConfigUpdate {
    fn from(config: &BlockchainConfig) -> Self {
        Self {
            enabled: config.enabled,
            name: config.name.clone().unwrap_or_default(),
            organization: config.organization.clone().unwrap_or_default(),
            address: config.address.clone().unwrap_or_default(),
            alias: config.alias.clone(),
            network: config.network.clone(),
            channel: config.channel.clone(),
            contract: config.contract.clone(),
            node_name: config.node_name.clone(),
        }
    }
}

/// Pagination parameters for the block list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
pub struct PageRequest {
    pub page_size: u32,
    pub page_num: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_size: 10,
            page_num: 1,
        }
    }
}
