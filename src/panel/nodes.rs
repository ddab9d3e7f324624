use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

use crate::models::{BlockchainNode, BlockchainNodeData};
use crate::panel::Tone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Active,
    Inactive,
}

impl NodeStatus {
    /// Only the exact string `Active` counts as active
    pub fn from_raw(status: Option<&str>) -> Self {
        match status {
            Some("Active") => NodeStatus::Active,
            _ => NodeStatus::Inactive,
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            NodeStatus::Active => Tone::Green,
            NodeStatus::Inactive => Tone::Red,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NodeStatus::Active => "Active",
            NodeStatus::Inactive => "Invalid",
        }
    }
}

/// One rendered roster entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct NodeView {
    pub org_name: String,
    pub url: String,
    pub msp_id: String,
    pub peer_name: String,
    pub status: NodeStatus,
}

impl From<&BlockchainNode> for NodeView {
    fn from(node: &BlockchainNode) -> Self {
        Self {
            org_name: node.org_name.clone(),
            url: node.url.clone(),
            msp_id: node.msp_id.clone(),
            peer_name: node.peer_name.clone(),
            status: NodeStatus::from_raw(node.status.as_deref()),
        }
    }
}

/// Roster views; `None` when there is nothing to show
pub fn node_list(roster: &[BlockchainNode]) -> Option<Vec<NodeView>> {
    if roster.is_empty() {
        return None;
    }
    Some(roster.iter().map(NodeView::from).collect())
}

impl fmt::Display for NodeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Organization: {}", self.org_name)?;
        writeln!(f, "  Address:      {}", self.url)?;
        writeln!(f, "  MSP ID:       {}", self.msp_id)?;
        writeln!(f, "  Peer:         {}", self.peer_name)?;
        writeln!(f, "  Status:       {} {}", self.status.tone(), self.status.label())
    }
}

pub fn render_node_list(nodes: &[NodeView]) -> String {
    let mut out = String::from("Nodes\n");
    for node in nodes {
        out.push_str(&node.to_string());
        out.push('\n');
    }
    out
}

pub fn render_network_info(info: &[BlockchainNodeData]) -> String {
    let mut out = String::new();
    for record in info {
        out.push_str(&format!(
            "Channel {} / chaincode {}: {} node(s) across {} org(s)\n",
            record.channel, record.chaincode, record.nodes_count, record.org_count
        ));
        if let Some(nodes) = node_list(record.nodes.as_deref().unwrap_or(&[])) {
            out.push_str(&render_node_list(&nodes));
        }
    }
    out
}
