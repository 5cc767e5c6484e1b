//! Board description
//!
//! The display graph of a board in TOML: the nodes, what they are
//! compatible with, and which port connects to which.
//!
//! ```toml
//! [[node]]
//! id = 1
//! name = "bridge@1"
//! compatible = "lontium,lt7911d-bridge"
//!
//! [node.bridge]
//! regulator_failure = "skip-enable-line"
//!
//! [[node]]
//! id = 2
//! name = "edp-out"
//! compatible = "dp-connector"
//!
//! [[link]]
//! from = { node = 1, port = 1 }
//! to = { node = 2, port = 0 }
//! ```
//!
//! Links are symmetric: following the output port of node 1 gives node
//! 2, following the input port of node 2 gives node 1.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde::Deserialize;

use dpbridge_core::config::BridgeConfig;
use dpbridge_core::device::{Device, NodeId};
use dpbridge_core::topology::TopologyProvider;

/// Board description errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Not valid TOML or not the expected shape
    Parse,
    /// Two nodes share an id
    DuplicateNode(u32),
    /// A link names a node that does not exist
    UnknownNode(u32),
    /// Name or compatible string too long for a device
    InvalidNode(u32),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::Parse => write!(f, "malformed board description"),
            BoardError::DuplicateNode(id) => write!(f, "duplicate node {}", id),
            BoardError::UnknownNode(id) => write!(f, "link to unknown node {}", id),
            BoardError::InvalidNode(id) => write!(f, "node {} has an invalid name", id),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeDesc {
    pub id: u32,
    pub name: String,
    pub compatible: String,
    /// Bridge power configuration, defaults when absent
    #[serde(default)]
    pub bridge: Option<BridgeConfig>,
}

/// One end of a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PortRef {
    pub node: u32,
    pub port: u32,
    #[serde(default)]
    pub endpoint: u32,
}

impl PortRef {
    fn matches(&self, node: NodeId, port: u32, endpoint: Option<u32>) -> bool {
        self.node == node.0 && self.port == port && endpoint.map_or(true, |e| e == self.endpoint)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Link {
    pub from: PortRef,
    pub to: PortRef,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoardDescription {
    #[serde(default, rename = "node")]
    pub nodes: Vec<NodeDesc>,
    #[serde(default, rename = "link")]
    pub links: Vec<Link>,
}

impl BoardDescription {
    /// Parse and validate a TOML board description
    pub fn from_toml(input: &str) -> Result<Self, BoardError> {
        let board: Self = toml::from_str(input).map_err(|_| BoardError::Parse)?;
        board.validate()?;
        Ok(board)
    }

    fn validate(&self) -> Result<(), BoardError> {
        for (i, node) in self.nodes.iter().enumerate() {
            if self.nodes[..i].iter().any(|n| n.id == node.id) {
                return Err(BoardError::DuplicateNode(node.id));
            }
        }
        for link in &self.links {
            for end in [link.from.node, link.to.node] {
                if self.node(NodeId(end)).is_none() {
                    return Err(BoardError::UnknownNode(end));
                }
            }
        }
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeDesc> {
        self.nodes.iter().find(|n| n.id == id.0)
    }

    /// Devices to hand to the driver core, in description order
    pub fn devices(&self) -> Result<Vec<Device>, BoardError> {
        self.nodes
            .iter()
            .map(|n| {
                Device::new(NodeId(n.id), &n.name, &n.compatible)
                    .map_err(|_| BoardError::InvalidNode(n.id))
            })
            .collect()
    }

    /// Bridge configuration of `id`, defaults when not given
    pub fn bridge_config(&self, id: NodeId) -> BridgeConfig {
        self.node(id)
            .and_then(|n| n.bridge.clone())
            .unwrap_or_default()
    }
}

impl TopologyProvider for BoardDescription {
    fn remote_node(&self, node: NodeId, port: u32, endpoint: Option<u32>) -> Option<NodeId> {
        self.links.iter().find_map(|link| {
            if link.from.matches(node, port, endpoint) {
                Some(NodeId(link.to.node))
            } else if link.to.matches(node, port, endpoint) {
                Some(NodeId(link.from.node))
            } else {
                None
            }
        })
    }
}
