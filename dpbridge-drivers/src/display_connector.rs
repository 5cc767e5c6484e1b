//! Display connector
//!
//! The terminal element of a bridge chain: a physical HDMI, DP or eDP
//! socket. It reports presence from its hot-plug line and reads EDID
//! over the DDC bus. It never creates a connector of its own; the
//! bridge in front of it does.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;

use dpbridge_core::connector::{Connector, ConnectorStatus, ConnectorType, EncoderId};
use dpbridge_core::device::Device;
use dpbridge_core::edid::{Edid, EDID_BLOCK_LEN, EDID_MAX_LEN};
use dpbridge_core::error::{Error, FatalError};
use dpbridge_core::platform::{Driver, ProbeContext};
use dpbridge_core::traits::{AttachFlags, Bridge, BridgeOps, BridgeRef};
use dpbridge_core::{debug, error, warn};
use dpbridge_hal::{BusId, I2cBus, InputPin};

use crate::edid::{block_checksum_ok, extension_count};

/// DDC address of the EDID EEPROM
pub const DDC_ADDR: u8 = 0x50;

/// Compatible strings and the connector type they stand for
pub const CONNECTOR_MATCHES: [(&str, ConnectorType); 4] = [
    ("dvi-connector", ConnectorType::DviD),
    ("hdmi-connector", ConnectorType::HdmiA),
    ("dp-connector", ConnectorType::DisplayPort),
    ("vga-connector", ConnectorType::Vga),
];

/// Connector type for a compatible string
pub fn connector_type(compatible: &str) -> Option<ConnectorType> {
    CONNECTOR_MATCHES
        .iter()
        .find(|(c, _)| *c == compatible)
        .map(|(_, t)| *t)
}

/// Terminal bridge for a physical display socket
pub struct DisplayConnector<B, H> {
    connector_type: ConnectorType,
    ddc: Option<B>,
    hpd: Option<H>,
    attached: bool,
}

impl<B: I2cBus, H: InputPin> DisplayConnector<B, H> {
    pub fn new(connector_type: ConnectorType, ddc: Option<B>, hpd: Option<H>) -> Self {
        Self {
            connector_type,
            ddc,
            hpd,
            attached: false,
        }
    }

    pub fn connector_type(&self) -> ConnectorType {
        self.connector_type
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Read one EDID block at `offset` into `buf`
    fn read_block(ddc: &mut B, offset: u8, buf: &mut [u8]) -> bool {
        ddc.write_read(DDC_ADDR, &[offset], buf).is_ok()
    }
}

impl<B: I2cBus, H: InputPin> Bridge for DisplayConnector<B, H> {
    fn ops(&self) -> BridgeOps {
        let mut ops = BridgeOps::empty();
        if self.hpd.is_some() {
            ops |= BridgeOps::DETECT | BridgeOps::HPD;
        }
        if self.ddc.is_some() {
            ops |= BridgeOps::EDID;
        }
        ops
    }

    fn attach(&mut self, _encoder: Option<EncoderId>, flags: AttachFlags) -> Result<(), Error> {
        if !flags.contains(AttachFlags::NO_CONNECTOR) {
            error!("display-connector: cannot create a connector");
            return Err(Error::Fatal(FatalError::ConnectorUnsupported));
        }
        self.attached = true;
        Ok(())
    }

    fn detect(&mut self) -> ConnectorStatus {
        match self.hpd.as_mut().map(|hpd| hpd.is_high()) {
            Some(true) => ConnectorStatus::Connected,
            Some(false) => ConnectorStatus::Disconnected,
            None => ConnectorStatus::Unknown,
        }
    }

    /// Base block plus as many extensions as fit in [`EDID_MAX_LEN`]
    ///
    /// A failed or corrupt base block means no EDID. A bad extension is
    /// dropped and the base block is still returned.
    fn read_edid(&mut self, _connector: &Connector) -> Option<Edid> {
        let ddc = self.ddc.as_mut()?;
        let mut buf = [0u8; EDID_MAX_LEN];

        if !Self::read_block(ddc, 0, &mut buf[..EDID_BLOCK_LEN]) {
            warn!("display-connector: DDC read failed");
            return None;
        }
        if !block_checksum_ok(&buf[..EDID_BLOCK_LEN]) {
            warn!("display-connector: EDID base block corrupt");
            return None;
        }

        let wanted = extension_count(&buf[..EDID_BLOCK_LEN]);
        let fits = EDID_MAX_LEN / EDID_BLOCK_LEN - 1;
        if wanted > fits {
            debug!("display-connector: keeping {} of {} extensions", fits, wanted);
        }

        let mut len = EDID_BLOCK_LEN;
        for block in 1..=wanted.min(fits) {
            let offset = (block * EDID_BLOCK_LEN) as u8;
            let chunk = &mut buf[len..len + EDID_BLOCK_LEN];
            if !Self::read_block(ddc, offset, chunk) || !block_checksum_ok(chunk) {
                warn!("display-connector: dropping EDID extension {}", block);
                break;
            }
            len += EDID_BLOCK_LEN;
        }

        Edid::from_bytes(&buf[..len])
    }

    fn ddc(&self) -> Option<BusId> {
        self.ddc.as_ref().map(|ddc| ddc.bus_id())
    }
}

/// Board hooks handing a connector its DDC bus and hot-plug line
pub trait ConnectorHardware {
    type Ddc: I2cBus + 'static;
    type Hpd: InputPin + 'static;

    fn ddc(&mut self, device: &Device) -> Option<Self::Ddc>;
    fn hpd(&mut self, device: &Device) -> Option<Self::Hpd>;
}

/// Driver binding the connector compatibles
pub struct DisplayConnectorDriver<W> {
    hardware: RefCell<W>,
}

impl<W: ConnectorHardware> DisplayConnectorDriver<W> {
    pub fn new(hardware: W) -> Self {
        Self {
            hardware: RefCell::new(hardware),
        }
    }

    pub fn boxed(hardware: W) -> Box<Self> {
        Box::new(Self::new(hardware))
    }
}

impl<W: ConnectorHardware> Driver for DisplayConnectorDriver<W> {
    fn name(&self) -> &'static str {
        "display-connector"
    }

    fn compatible(&self) -> &'static [&'static str] {
        &[
            "dvi-connector",
            "hdmi-connector",
            "dp-connector",
            "vga-connector",
        ]
    }

    fn probe(&self, device: &Device, _ctx: &mut ProbeContext<'_>) -> Result<BridgeRef, Error> {
        let connector_type =
            connector_type(device.compatible()).ok_or(Error::Fatal(FatalError::NoMatch))?;

        let mut hardware = self.hardware.borrow_mut();
        let ddc = hardware.ddc(device);
        let hpd = hardware.hpd(device);
        if ddc.is_none() {
            debug!("{}: no DDC bus, EDID unavailable", device.name());
        }

        Ok(Rc::new(RefCell::new(DisplayConnector::new(
            connector_type,
            ddc,
            hpd,
        ))))
    }
}
