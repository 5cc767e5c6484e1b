//! Downstream link resolution
//!
//! Bridges find the next element of the pipeline by following the graph
//! description of the board: port 0 is the input, port 1 the output.
//! The remote node of the output port is looked up in the registry of
//! bridges that have finished probing. If that bridge has not probed
//! yet the caller must defer.

use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::device::NodeId;
use crate::error::{Dependency, Error, FatalError};
use crate::traits::{BridgeRef, WeakBridgeRef};

/// Graph port carrying the bridge output
pub const OUTPUT_PORT: u32 = 1;

/// Board topology
pub trait TopologyProvider {
    /// Node at the remote end of `port` of `node`
    ///
    /// `endpoint` selects one endpoint of the port; `None` accepts any.
    fn remote_node(&self, node: NodeId, port: u32, endpoint: Option<u32>) -> Option<NodeId>;
}

/// Bridges that finished probing, by node
///
/// The registry never owns a bridge. Entries whose bridge was dropped
/// are invisible to lookups.
#[derive(Default)]
pub struct BridgeRegistry {
    entries: Vec<(NodeId, WeakBridgeRef)>,
}

impl BridgeRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Publish a bridge for `node`
    pub fn add(&mut self, node: NodeId, bridge: &BridgeRef) -> Result<(), Error> {
        if self.find(node).is_some() {
            return Err(Error::Fatal(FatalError::AlreadyRegistered));
        }
        // Drop a stale entry left behind by a dropped bridge
        self.entries.retain(|(n, _)| *n != node);
        self.entries.push((node, Rc::downgrade(bridge)));
        Ok(())
    }

    /// Withdraw the bridge for `node`
    pub fn remove(&mut self, node: NodeId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(n, _)| *n != node);
        self.entries.len() != before
    }

    /// Look up the live bridge registered for `node`
    pub fn find(&self, node: NodeId) -> Option<WeakBridgeRef> {
        self.entries
            .iter()
            .find(|(n, bridge)| *n == node && bridge.strong_count() > 0)
            .map(|(_, bridge)| bridge.clone())
    }

    /// Number of live bridges
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, bridge)| bridge.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cached reference to the next bridge
///
/// Resolved once at probe and never re-resolved. The reference is weak:
/// the downstream bridge belongs to its own binding.
#[derive(Clone)]
pub struct DownstreamBridge {
    node: NodeId,
    bridge: WeakBridgeRef,
}

impl DownstreamBridge {
    /// Node of the downstream bridge
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Strong handle, if the downstream bridge is still bound
    pub fn get(&self) -> Option<BridgeRef> {
        self.bridge.upgrade()
    }
}

/// Find the bridge connected to the output port of `node`
///
/// - No remote node: the board description is broken, fatal.
/// - Remote node without a registered bridge: retry later.
pub fn resolve_downstream(
    topology: &dyn TopologyProvider,
    registry: &BridgeRegistry,
    node: NodeId,
) -> Result<DownstreamBridge, Error> {
    let remote = topology
        .remote_node(node, OUTPUT_PORT, None)
        .ok_or(Error::Fatal(FatalError::NoRemoteNode))?;

    let bridge = registry
        .find(remote)
        .ok_or(Error::Retryable(Dependency::DownstreamBridge))?;

    Ok(DownstreamBridge {
        node: remote,
        bridge,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::EncoderId;
    use crate::traits::{AttachFlags, Bridge, BridgeOps};
    use core::cell::RefCell;

    struct Sink;

    impl Bridge for Sink {
        fn ops(&self) -> BridgeOps {
            BridgeOps::empty()
        }

        fn attach(&mut self, _encoder: Option<EncoderId>, _flags: AttachFlags) -> Result<(), Error> {
            Ok(())
        }
    }

    /// Two-node graph: 0 -> 1
    struct Chain;

    impl TopologyProvider for Chain {
        fn remote_node(&self, node: NodeId, port: u32, _endpoint: Option<u32>) -> Option<NodeId> {
            match (node, port) {
                (NodeId(0), OUTPUT_PORT) => Some(NodeId(1)),
                (NodeId(1), 0) => Some(NodeId(0)),
                _ => None,
            }
        }
    }

    fn sink() -> BridgeRef {
        Rc::new(RefCell::new(Sink))
    }

    #[test]
    fn test_resolve_found() {
        let mut registry = BridgeRegistry::new();
        let bridge = sink();
        registry.add(NodeId(1), &bridge).unwrap();

        let downstream = resolve_downstream(&Chain, &registry, NodeId(0)).unwrap();
        assert_eq!(downstream.node(), NodeId(1));
        assert!(downstream.get().is_some());
    }

    #[test]
    fn test_resolve_not_registered_defers() {
        let registry = BridgeRegistry::new();
        let err = resolve_downstream(&Chain, &registry, NodeId(0)).err().unwrap();
        assert_eq!(err, Error::Retryable(Dependency::DownstreamBridge));
    }

    #[test]
    fn test_resolve_no_remote_is_fatal() {
        let registry = BridgeRegistry::new();
        // Node 1 has nothing on its output port
        let err = resolve_downstream(&Chain, &registry, NodeId(1)).err().unwrap();
        assert_eq!(err, Error::Fatal(FatalError::NoRemoteNode));
    }

    #[test]
    fn test_registry_ignores_dropped_bridges() {
        let mut registry = BridgeRegistry::new();
        let bridge = sink();
        registry.add(NodeId(1), &bridge).unwrap();
        assert_eq!(registry.len(), 1);

        drop(bridge);
        assert!(registry.find(NodeId(1)).is_none());
        assert!(registry.is_empty());

        // A new bridge can take the stale slot
        let again = sink();
        registry.add(NodeId(1), &again).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_duplicate() {
        let mut registry = BridgeRegistry::new();
        let first = sink();
        let second = sink();
        registry.add(NodeId(1), &first).unwrap();
        assert_eq!(
            registry.add(NodeId(1), &second),
            Err(Error::Fatal(FatalError::AlreadyRegistered))
        );
        assert!(registry.remove(NodeId(1)));
        assert!(!registry.remove(NodeId(1)));
    }

    #[test]
    fn test_downstream_gone_after_unbind() {
        let mut registry = BridgeRegistry::new();
        let bridge = sink();
        registry.add(NodeId(1), &bridge).unwrap();
        let downstream = resolve_downstream(&Chain, &registry, NodeId(0)).unwrap();

        drop(bridge);
        assert!(downstream.get().is_none());
    }
}
