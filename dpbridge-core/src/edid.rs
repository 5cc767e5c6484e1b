//! EDID blobs and the decoder seam
//!
//! The core treats EDID as opaque bytes. Turning them into modes is the
//! job of an [`EdidDecoder`] supplied by the driver.

use heapless::Vec;

use crate::mode::ModeList;

/// Size of one EDID block
pub const EDID_BLOCK_LEN: usize = 128;

/// Largest EDID kept: base block plus one extension
pub const EDID_MAX_LEN: usize = 2 * EDID_BLOCK_LEN;

/// Raw EDID as read from the sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edid {
    bytes: Vec<u8, EDID_MAX_LEN>,
}

impl Edid {
    /// Copy raw bytes into a blob
    ///
    /// Returns `None` for empty input or input longer than
    /// [`EDID_MAX_LEN`]; an empty read means "no EDID".
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.is_empty() {
            return None;
        }
        Vec::from_slice(bytes).ok().map(|bytes| Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Turns EDID into modes
pub trait EdidDecoder {
    /// Append the modes described by `edid` to `modes`
    ///
    /// Returns the number of modes added. Zero is a valid result for an
    /// EDID that declares nothing usable.
    fn decode(&self, edid: &Edid, modes: &mut ModeList) -> usize;
}
