//! Device variant table
//!
//! Each supported chip variant maps a compatible string to the connector
//! it exposes and the timing constraints of its input bus. The table is
//! static and looked up once at probe.

use bitflags::bitflags;

use crate::connector::ConnectorType;

bitflags! {
    /// Input bus sampling constraints
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BusFlags: u32 {
        /// Data enable is active high
        const DE_HIGH = 1 << 0;
        /// Data enable is active low
        const DE_LOW = 1 << 1;
        /// Pixel data driven on the rising edge
        const PIXDATA_DRIVE_POSEDGE = 1 << 2;
        /// Pixel data driven on the falling edge
        const PIXDATA_DRIVE_NEGEDGE = 1 << 3;
        /// Sync signals driven on the rising edge
        const SYNC_DRIVE_POSEDGE = 1 << 4;
        /// Sync signals driven on the falling edge
        const SYNC_DRIVE_NEGEDGE = 1 << 5;
    }
}

/// Input timing requirements of a bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BridgeTimings {
    /// Bus flags the upstream encoder must honor
    pub input_bus_flags: BusFlags,
    /// Data setup time before the sampling edge, in picoseconds
    pub setup_time_ps: u32,
    /// Data hold time after the sampling edge, in picoseconds
    pub hold_time_ps: u32,
    /// Input is split over two links
    pub dual_link: bool,
}

impl BridgeTimings {
    /// No constraints
    pub const DEFAULT: Self = Self {
        input_bus_flags: BusFlags::empty(),
        setup_time_ps: 0,
        hold_time_ps: 0,
        dual_link: false,
    };
}

/// Per-variant data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceVariantInfo {
    /// Connector created when this bridge terminates the chain
    pub connector_type: ConnectorType,
    pub timings: &'static BridgeTimings,
}

/// One entry of a driver's match table
#[derive(Debug, Clone, Copy)]
pub struct VariantMatch {
    pub compatible: &'static str,
    pub info: &'static DeviceVariantInfo,
}

/// Find the variant data for a compatible string
pub fn match_variant(
    table: &'static [VariantMatch],
    compatible: &str,
) -> Option<&'static DeviceVariantInfo> {
    table
        .iter()
        .find(|entry| entry.compatible == compatible)
        .map(|entry| entry.info)
}
