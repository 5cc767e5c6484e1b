//! Device identity
//!
//! A device is a node of the board topology plus the strings used to
//! match it against drivers and to name it in logs.

use heapless::String;

use crate::error::{Error, FatalError};

/// Maximum device name length
pub const MAX_NAME_LEN: usize = 32;

/// Maximum compatible string length
pub const MAX_COMPATIBLE_LEN: usize = 48;

/// Topology node handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NodeId(pub u32);

/// A device waiting for, or bound to, a driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    node: NodeId,
    name: String<MAX_NAME_LEN>,
    compatible: String<MAX_COMPATIBLE_LEN>,
}

impl Device {
    /// Create a device description
    ///
    /// Fails with [`FatalError::InvalidDevice`] if either string does
    /// not fit the bounded storage.
    pub fn new(node: NodeId, name: &str, compatible: &str) -> Result<Self, Error> {
        let mut dev_name = String::new();
        dev_name
            .push_str(name)
            .map_err(|_| FatalError::InvalidDevice)?;
        let mut dev_compatible = String::new();
        dev_compatible
            .push_str(compatible)
            .map_err(|_| FatalError::InvalidDevice)?;

        Ok(Self {
            node,
            name: dev_name,
            compatible: dev_compatible,
        })
    }

    /// Topology node of this device
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Name used in logs
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Compatible string used for driver matching
    pub fn compatible(&self) -> &str {
        self.compatible.as_str()
    }
}
