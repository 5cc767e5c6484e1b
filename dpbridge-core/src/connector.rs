//! Connector: the user-visible display output
//!
//! A connector is owned by the bridge that created it. It records which
//! node owns it so the pipeline can route mode and detect queries back
//! to that bridge without recovering the owner from a pointer.

use dpbridge_hal::BusId;
use heapless::Vec;

use crate::device::NodeId;
use crate::edid::Edid;
use crate::error::{Error, FatalError};
use crate::mode::ModeList;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum encoders a connector can be attached to
pub const MAX_ENCODERS: usize = 4;

/// Physical connector kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConnectorType {
    #[default]
    Unknown,
    Vga,
    DviD,
    Lvds,
    DisplayPort,
    HdmiA,
    /// Embedded DisplayPort
    Edp,
    Dsi,
    Dpi,
}

/// Presence of a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectorStatus {
    Connected,
    Disconnected,
    /// Hardware cannot tell
    #[default]
    Unknown,
}

/// Display power management state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DpmsState {
    On,
    Standby,
    Suspend,
    #[default]
    Off,
}

/// Encoder handle supplied by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderId(pub u32);

/// Display output descriptor
#[derive(Debug, Clone)]
pub struct Connector {
    owner: NodeId,
    connector_type: ConnectorType,
    ddc: Option<BusId>,
    modes: ModeList,
    edid: Option<Edid>,
    encoders: Vec<EncoderId, MAX_ENCODERS>,
    status: ConnectorStatus,
    dpms: DpmsState,
    mode_hook: bool,
    registered: bool,
}

impl Connector {
    /// Initialize a connector owned by `owner`
    ///
    /// `ddc` names the adapter used for EDID reads, if the downstream
    /// has one. An unknown connector type cannot be exposed to users and
    /// fails with [`FatalError::ConnectorInit`].
    pub fn init(
        owner: NodeId,
        connector_type: ConnectorType,
        ddc: Option<BusId>,
    ) -> Result<Self, Error> {
        if connector_type == ConnectorType::Unknown {
            return Err(Error::Fatal(FatalError::ConnectorInit));
        }

        Ok(Self {
            owner,
            connector_type,
            ddc,
            modes: ModeList::new(),
            edid: None,
            encoders: Vec::new(),
            status: ConnectorStatus::Unknown,
            dpms: DpmsState::Off,
            mode_hook: false,
            registered: false,
        })
    }

    /// Node of the bridge that owns this connector
    pub fn owner(&self) -> NodeId {
        self.owner
    }

    pub fn connector_type(&self) -> ConnectorType {
        self.connector_type
    }

    /// DDC adapter used for EDID reads
    pub fn ddc(&self) -> Option<BusId> {
        self.ddc
    }

    /// Current mode list
    pub fn modes(&self) -> &ModeList {
        &self.modes
    }

    pub(crate) fn modes_mut(&mut self) -> &mut ModeList {
        &mut self.modes
    }

    /// Raw EDID property, if the last negotiation read one
    pub fn edid(&self) -> Option<&Edid> {
        self.edid.as_ref()
    }

    /// Replace the EDID property
    pub fn update_edid_property(&mut self, edid: Option<&Edid>) {
        self.edid = edid.cloned();
    }

    /// Encoders this connector is attached to
    pub fn encoders(&self) -> &[EncoderId] {
        &self.encoders
    }

    /// Attach to an encoder
    ///
    /// Attaching the same encoder twice is a no-op.
    pub fn attach_encoder(&mut self, encoder: EncoderId) -> Result<(), Error> {
        if self.encoders.contains(&encoder) {
            return Ok(());
        }
        self.encoders
            .push(encoder)
            .map_err(|_| Error::Fatal(FatalError::TooManyEncoders))
    }

    /// Last detected status
    pub fn status(&self) -> ConnectorStatus {
        self.status
    }

    pub(crate) fn set_status(&mut self, status: ConnectorStatus) {
        self.status = status;
    }

    /// DPMS property
    pub fn dpms(&self) -> DpmsState {
        self.dpms
    }

    pub fn set_dpms(&mut self, state: DpmsState) {
        self.dpms = state;
    }

    /// Wire the owner's mode negotiation as this connector's mode hook
    pub fn helper_add(&mut self) {
        self.mode_hook = true;
    }

    /// Check if a mode hook is wired
    pub fn has_mode_hook(&self) -> bool {
        self.mode_hook
    }

    /// Make the connector visible to users
    pub fn register(&mut self) {
        self.registered = true;
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_unknown_type_fails() {
        let err = Connector::init(NodeId(1), ConnectorType::Unknown, None).unwrap_err();
        assert_eq!(err, Error::Fatal(FatalError::ConnectorInit));
    }

    #[test]
    fn test_init_defaults() {
        let conn = Connector::init(NodeId(1), ConnectorType::Edp, Some(BusId(2))).unwrap();
        assert_eq!(conn.owner(), NodeId(1));
        assert_eq!(conn.connector_type(), ConnectorType::Edp);
        assert_eq!(conn.ddc(), Some(BusId(2)));
        assert!(conn.modes().is_empty());
        assert!(conn.edid().is_none());
        assert_eq!(conn.dpms(), DpmsState::Off);
        assert!(!conn.is_registered());
        assert!(!conn.has_mode_hook());
    }

    #[test]
    fn test_attach_encoder() {
        let mut conn = Connector::init(NodeId(1), ConnectorType::Edp, None).unwrap();
        conn.attach_encoder(EncoderId(7)).unwrap();
        conn.attach_encoder(EncoderId(7)).unwrap();
        assert_eq!(conn.encoders(), &[EncoderId(7)]);

        for id in 0..(MAX_ENCODERS as u32 - 1) {
            conn.attach_encoder(EncoderId(id)).unwrap();
        }
        assert_eq!(
            conn.attach_encoder(EncoderId(99)),
            Err(Error::Fatal(FatalError::TooManyEncoders))
        );
    }

    #[test]
    fn test_edid_property() {
        let mut conn = Connector::init(NodeId(1), ConnectorType::Edp, None).unwrap();
        let edid = Edid::from_bytes(&[1, 2, 3]).unwrap();

        conn.update_edid_property(Some(&edid));
        assert_eq!(conn.edid(), Some(&edid));

        conn.update_edid_property(None);
        assert!(conn.edid().is_none());
    }
}
