//! Mode negotiation
//!
//! Fills a connector's mode list from what the downstream bridge can
//! report:
//!
//! 1. If the downstream bridge declares [`BridgeOps::EDID`], read EDID.
//! 2. With EDID, publish it as the connector's EDID property and decode
//!    it. Whatever the decoder yields is the list, even if empty.
//! 3. Without EDID (no capability, empty read, bridge gone), publish a
//!    single 1920x1080@60 mode marked preferred.

use crate::connector::Connector;
use crate::edid::EdidDecoder;
use crate::mode::{DisplayMode, ModeList};
use crate::topology::DownstreamBridge;
use crate::traits::BridgeOps;

/// Fallback mode width
pub const FALLBACK_WIDTH: u16 = 1920;

/// Fallback mode height
pub const FALLBACK_HEIGHT: u16 = 1080;

/// Fallback mode refresh rate
pub const FALLBACK_REFRESH_HZ: u16 = 60;

/// Replace the connector's modes with the fallback set
///
/// Always yields exactly one mode, marked preferred.
pub fn add_fallback_modes(modes: &mut ModeList) -> usize {
    modes.clear();
    // An empty list always has room
    let _ = modes.push(DisplayMode::dmt_1080p60());
    modes.set_preferred(FALLBACK_WIDTH, FALLBACK_HEIGHT, FALLBACK_REFRESH_HZ);
    modes.len()
}

/// Negotiate the connector's modes with the downstream bridge
///
/// Returns the number of modes in the connector's list afterwards.
pub fn negotiate_modes(
    downstream: &DownstreamBridge,
    connector: &mut Connector,
    decoder: &dyn EdidDecoder,
) -> usize {
    let edid = match downstream.get() {
        Some(bridge) => {
            let mut bridge = bridge.borrow_mut();
            if bridge.ops().contains(BridgeOps::EDID) {
                let edid = bridge.read_edid(connector);
                if edid.is_none() {
                    warn!("EDID read failed. Fallback to standard modes");
                }
                edid
            } else {
                None
            }
        }
        None => {
            warn!("Downstream bridge gone. Fallback to standard modes");
            None
        }
    };

    let Some(edid) = edid else {
        connector.update_edid_property(None);
        return add_fallback_modes(connector.modes_mut());
    };

    connector.update_edid_property(Some(&edid));
    let modes = connector.modes_mut();
    modes.clear();
    let count = decoder.decode(&edid, modes);
    debug!("EDID ({} bytes) yielded {} modes", edid.len(), count);
    // The read buffer is released here; the property keeps its own copy
    drop(edid);

    connector.modes().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::{ConnectorType, EncoderId};
    use crate::device::NodeId;
    use crate::edid::Edid;
    use crate::error::Error;
    use crate::mode::MAX_MODES;
    use crate::topology::{resolve_downstream, BridgeRegistry, TopologyProvider};
    use crate::traits::{AttachFlags, Bridge, BridgeRef};
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use proptest::prelude::*;

    /// Downstream bridge with a canned EDID answer
    struct EdidSource {
        ops: BridgeOps,
        edid: Option<Vec<u8>>,
        reads: usize,
    }

    impl Bridge for EdidSource {
        fn ops(&self) -> BridgeOps {
            self.ops
        }

        fn attach(&mut self, _encoder: Option<EncoderId>, _flags: AttachFlags) -> Result<(), Error> {
            Ok(())
        }

        fn read_edid(&mut self, _connector: &Connector) -> Option<Edid> {
            self.reads += 1;
            self.edid.as_deref().and_then(Edid::from_bytes)
        }
    }

    /// Decoder emitting as many modes as the first byte says
    struct CountDecoder;

    impl EdidDecoder for CountDecoder {
        fn decode(&self, edid: &Edid, modes: &mut ModeList) -> usize {
            let count = edid.as_bytes()[0] as usize;
            let mut added = 0;
            for i in 0..count {
                let mode = DisplayMode {
                    hdisplay: 640 + i as u16,
                    vdisplay: 480,
                    refresh_hz: 60,
                    ..DisplayMode::default()
                };
                if modes.push(mode).is_err() {
                    break;
                }
                added += 1;
            }
            added
        }
    }

    struct Direct;

    impl TopologyProvider for Direct {
        fn remote_node(&self, _node: NodeId, _port: u32, _endpoint: Option<u32>) -> Option<NodeId> {
            Some(NodeId(1))
        }
    }

    fn setup(ops: BridgeOps, edid: Option<Vec<u8>>) -> (Rc<RefCell<EdidSource>>, DownstreamBridge) {
        let source = Rc::new(RefCell::new(EdidSource {
            ops,
            edid,
            reads: 0,
        }));
        let bridge: BridgeRef = source.clone();
        let mut registry = BridgeRegistry::new();
        registry.add(NodeId(1), &bridge).unwrap();
        let downstream = resolve_downstream(&Direct, &registry, NodeId(0)).ok().unwrap();
        (source, downstream)
    }

    fn connector() -> Connector {
        Connector::init(NodeId(0), ConnectorType::Edp, None).unwrap()
    }

    fn assert_fallback(conn: &Connector) {
        assert_eq!(conn.modes().len(), 1);
        let mode = conn.modes().preferred().unwrap();
        assert!(mode.has_size(FALLBACK_WIDTH, FALLBACK_HEIGHT));
        assert_eq!(mode.refresh_hz, FALLBACK_REFRESH_HZ);
        assert!(conn.edid().is_none());
    }

    #[test]
    fn test_no_edid_capability_skips_read() {
        let (source, downstream) = setup(BridgeOps::DETECT, Some(vec![3; 128]));
        let mut conn = connector();

        assert_eq!(negotiate_modes(&downstream, &mut conn, &CountDecoder), 1);
        assert_fallback(&conn);
        assert_eq!(source.borrow().reads, 0);
    }

    #[test]
    fn test_empty_read_falls_back() {
        let (source, downstream) = setup(BridgeOps::EDID, None);
        let mut conn = connector();

        assert_eq!(negotiate_modes(&downstream, &mut conn, &CountDecoder), 1);
        assert_fallback(&conn);
        assert_eq!(source.borrow().reads, 1);
    }

    #[test]
    fn test_edid_modes_only() {
        let (_source, downstream) = setup(BridgeOps::EDID, Some(vec![3, 0xAB]));
        let mut conn = connector();

        assert_eq!(negotiate_modes(&downstream, &mut conn, &CountDecoder), 3);
        assert!(conn.modes().iter().all(|m| !m.is_driver_mode()));
        assert_eq!(conn.edid().unwrap().as_bytes(), &[3, 0xAB]);
    }

    #[test]
    fn test_valid_edid_with_zero_modes_is_not_fallback() {
        let (_source, downstream) = setup(BridgeOps::EDID, Some(vec![0, 1, 2]));
        let mut conn = connector();

        assert_eq!(negotiate_modes(&downstream, &mut conn, &CountDecoder), 0);
        assert!(conn.modes().is_empty());
        assert!(conn.edid().is_some());
    }

    #[test]
    fn test_renegotiation_replaces_list() {
        let (source, downstream) = setup(BridgeOps::EDID, Some(vec![2]));
        let mut conn = connector();

        assert_eq!(negotiate_modes(&downstream, &mut conn, &CountDecoder), 2);

        // Sink unplugged its DDC: list shrinks to the fallback
        source.borrow_mut().edid = None;
        assert_eq!(negotiate_modes(&downstream, &mut conn, &CountDecoder), 1);
        assert_fallback(&conn);
    }

    #[test]
    fn test_downstream_gone_falls_back() {
        let (source, downstream) = setup(BridgeOps::EDID, Some(vec![2]));
        drop(source);
        let mut conn = connector();

        assert_eq!(negotiate_modes(&downstream, &mut conn, &CountDecoder), 1);
        assert_fallback(&conn);
    }

    proptest! {
        #[test]
        fn prop_fallback_is_deterministic(calls in 1usize..8, detect in any::<bool>()) {
            let ops = if detect { BridgeOps::DETECT } else { BridgeOps::empty() };
            let (_source, downstream) = setup(ops, Some(vec![5]));
            let mut conn = connector();

            let mut first = None;
            for _ in 0..calls {
                prop_assert_eq!(negotiate_modes(&downstream, &mut conn, &CountDecoder), 1);
                let mode = *conn.modes().preferred().unwrap();
                prop_assert!(mode.has_size(1920, 1080));
                prop_assert_eq!(mode.refresh_hz, 60);
                match first {
                    None => first = Some(mode),
                    Some(prev) => prop_assert_eq!(prev, mode),
                }
            }
        }

        #[test]
        fn prop_edid_round_trip_count(k in 0u8..=(MAX_MODES as u8), tail in proptest::collection::vec(any::<u8>(), 0..64)) {
            let mut bytes = vec![k];
            bytes.extend(tail);
            let (_source, downstream) = setup(BridgeOps::EDID, Some(bytes.clone()));
            let mut conn = connector();

            let count = negotiate_modes(&downstream, &mut conn, &CountDecoder);
            prop_assert_eq!(count, k as usize);
            prop_assert!(conn.modes().iter().all(|m| !m.is_driver_mode()));
            prop_assert_eq!(conn.edid().unwrap().as_bytes(), &bytes[..]);
        }
    }
}
