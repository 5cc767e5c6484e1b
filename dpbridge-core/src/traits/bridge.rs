//! Bridge trait
//!
//! A bridge is one element of the display pipeline between the encoder
//! and the sink. Bridges chain: each one holds a reference to the next
//! and knows nothing about its concrete kind beyond this trait.

use alloc::rc::{Rc, Weak};
use core::cell::RefCell;

use bitflags::bitflags;
use dpbridge_hal::BusId;

use crate::config::BridgeTimings;
use crate::connector::{Connector, ConnectorStatus, EncoderId};
use crate::edid::Edid;
use crate::error::Error;

bitflags! {
    /// Optional operations a bridge implements
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BridgeOps: u8 {
        /// `detect` reports real presence
        const DETECT = 1 << 0;
        /// `read_edid` can return data
        const EDID = 1 << 1;
        /// Hot-plug events are signalled
        const HPD = 1 << 2;
    }
}

bitflags! {
    /// Flags passed down the chain on attach
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct AttachFlags: u8 {
        /// Someone upstream owns the connector; do not create one
        const NO_CONNECTOR = 1 << 0;
    }
}

/// Shared handle to a bridge
///
/// The pipeline is single-threaded and serializes calls, so bridges are
/// shared through `Rc<RefCell<_>>` without locking.
pub type BridgeRef = Rc<RefCell<dyn Bridge>>;

/// Non-owning handle to a bridge
pub type WeakBridgeRef = Weak<RefCell<dyn Bridge>>;

/// One element of the display pipeline
pub trait Bridge {
    /// Operations this bridge implements
    fn ops(&self) -> BridgeOps;

    /// Attach to the pipeline behind `encoder`
    ///
    /// Called once per bridge lifetime. Errors are classified as
    /// retryable or fatal by the bridge itself and propagate unchanged.
    fn attach(&mut self, encoder: Option<EncoderId>, flags: AttachFlags) -> Result<(), Error>;

    /// Report sink presence
    fn detect(&mut self) -> ConnectorStatus {
        ConnectorStatus::Unknown
    }

    /// Read EDID for `connector`
    ///
    /// Only meaningful when [`BridgeOps::EDID`] is set. May block on bus
    /// I/O.
    fn read_edid(&mut self, _connector: &Connector) -> Option<Edid> {
        None
    }

    /// DDC adapter carrying this bridge's EDID
    fn ddc(&self) -> Option<BusId> {
        None
    }

    /// Power up
    fn enable(&mut self) {}

    /// Power down
    fn disable(&mut self) {}

    /// Input timing constraints
    fn timings(&self) -> Option<&'static BridgeTimings> {
        None
    }

    /// Connector owned by this bridge, if it created one
    fn connector(&self) -> Option<&Connector> {
        None
    }

    /// Refresh the owned connector's status and mode list
    ///
    /// Returns the number of modes left after pruning to the limits
    /// (0 means no limit).
    fn fill_modes(&mut self, _max_width: u16, _max_height: u16) -> usize {
        0
    }
}
