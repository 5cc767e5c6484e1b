//! EDID detailed timing decoder
//!
//! Decodes the detailed timing descriptors (DTD) of an EDID 1.x base
//! block and of CTA-861 extension blocks into display modes.
//!
//! # Base block layout (relevant parts)
//!
//! ```text
//! 0x00..0x08  header 00 FF FF FF FF FF FF 00
//! 0x36..0x7E  four 18-byte descriptors, DTD when the clock is non-zero
//! 0x7E        number of extension blocks
//! 0x7F        checksum, all 128 bytes sum to 0 mod 256
//! ```
//!
//! The first DTD of the base block is the sink's preferred mode. Blocks
//! failing their checksum are skipped; a base block failing header or
//! checksum yields no modes at all.

use dpbridge_core::debug;
use dpbridge_core::edid::{Edid, EdidDecoder, EDID_BLOCK_LEN};
use dpbridge_core::mode::{DisplayMode, ModeList, ModeType};

/// Fixed EDID header
pub const EDID_HEADER: [u8; 8] = [0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];

/// Offset of the first descriptor in the base block
const BASE_DTD_OFFSET: usize = 0x36;

/// Size of one descriptor
const DTD_LEN: usize = 18;

/// Descriptors in the base block
const BASE_DTD_COUNT: usize = 4;

/// Extension count byte
const EXTENSION_COUNT: usize = 0x7E;

/// CTA-861 extension tag
const CTA_EXTENSION_TAG: u8 = 0x02;

/// Check that `block` sums to zero
pub fn block_checksum_ok(block: &[u8]) -> bool {
    block.len() == EDID_BLOCK_LEN && block.iter().fold(0u8, |acc, b| acc.wrapping_add(*b)) == 0
}

/// Number of extension blocks announced by a base block
pub fn extension_count(base: &[u8]) -> usize {
    base.get(EXTENSION_COUNT).copied().unwrap_or(0) as usize
}

/// Decode one 18-byte descriptor
///
/// Returns `None` for display descriptors (zero pixel clock) and for
/// interlaced timings, which the pipeline does not drive.
pub fn decode_dtd(dtd: &[u8]) -> Option<DisplayMode> {
    if dtd.len() < DTD_LEN {
        return None;
    }

    let clock_10khz = u16::from_le_bytes([dtd[0], dtd[1]]);
    if clock_10khz == 0 {
        return None;
    }
    // Interlaced
    if dtd[17] & 0x80 != 0 {
        return None;
    }

    let hactive = u16::from(dtd[2]) | (u16::from(dtd[4] >> 4) << 8);
    let hblank = u16::from(dtd[3]) | (u16::from(dtd[4] & 0x0F) << 8);
    let vactive = u16::from(dtd[5]) | (u16::from(dtd[7] >> 4) << 8);
    let vblank = u16::from(dtd[6]) | (u16::from(dtd[7] & 0x0F) << 8);

    let hfront = u16::from(dtd[8]) | (u16::from(dtd[11] >> 6) << 8);
    let hsync = u16::from(dtd[9]) | (u16::from((dtd[11] >> 4) & 0x03) << 8);
    let vfront = u16::from(dtd[10] >> 4) | (u16::from((dtd[11] >> 2) & 0x03) << 4);
    let vsync = u16::from(dtd[10] & 0x0F) | (u16::from(dtd[11] & 0x03) << 4);

    if hactive == 0 || vactive == 0 {
        return None;
    }

    let clock_khz = u32::from(clock_10khz) * 10;
    let htotal = hactive + hblank;
    let vtotal = vactive + vblank;
    let pixels = u32::from(htotal) * u32::from(vtotal);
    // Round to the nearest Hz
    let refresh_hz = ((clock_khz * 1000 + pixels / 2) / pixels) as u16;

    Some(DisplayMode {
        clock_khz,
        hdisplay: hactive,
        hsync_start: hactive + hfront,
        hsync_end: hactive + hfront + hsync,
        htotal,
        vdisplay: vactive,
        vsync_start: vactive + vfront,
        vsync_end: vactive + vfront + vsync,
        vtotal,
        refresh_hz,
        mode_type: ModeType::empty(),
    })
}

/// [`EdidDecoder`] over detailed timing descriptors
#[derive(Debug, Clone, Copy, Default)]
pub struct DetailedTimingDecoder;

impl DetailedTimingDecoder {
    pub const fn new() -> Self {
        Self
    }

    /// Append `mode` unless the list already holds the same timing
    ///
    /// Only exact repeats are dropped; the preferred flag is not part of
    /// the comparison.
    fn push(modes: &mut ModeList, mode: DisplayMode) -> bool {
        let duplicate = modes.iter().any(|m| {
            DisplayMode {
                mode_type: mode.mode_type,
                ..*m
            } == mode
        });
        !duplicate && modes.push(mode).is_ok()
    }

    fn decode_cta(block: &[u8], modes: &mut ModeList) -> usize {
        // Byte 2 holds the offset of the first DTD; 0 means none
        let start = block[2] as usize;
        if start < 4 || start >= EDID_BLOCK_LEN - 1 {
            return 0;
        }

        block[start..EDID_BLOCK_LEN - 1]
            .chunks_exact(DTD_LEN)
            .filter_map(decode_dtd)
            .filter(|mode| Self::push(modes, *mode))
            .count()
    }
}

impl EdidDecoder for DetailedTimingDecoder {
    fn decode(&self, edid: &Edid, modes: &mut ModeList) -> usize {
        let bytes = edid.as_bytes();
        let Some(base) = bytes.get(..EDID_BLOCK_LEN) else {
            debug!("EDID: short base block ({} bytes)", bytes.len());
            return 0;
        };
        if base[..8] != EDID_HEADER || !block_checksum_ok(base) {
            debug!("EDID: invalid base block");
            return 0;
        }

        let mut added = 0;
        let descriptors = &base[BASE_DTD_OFFSET..BASE_DTD_OFFSET + BASE_DTD_COUNT * DTD_LEN];
        for (index, dtd) in descriptors.chunks_exact(DTD_LEN).enumerate() {
            let Some(mut mode) = decode_dtd(dtd) else {
                continue;
            };
            if index == 0 {
                mode.mode_type |= ModeType::PREFERRED;
            }
            if Self::push(modes, mode) {
                added += 1;
            }
        }

        for block in bytes[EDID_BLOCK_LEN..].chunks_exact(EDID_BLOCK_LEN) {
            if block[0] != CTA_EXTENSION_TAG {
                continue;
            }
            if !block_checksum_ok(block) {
                debug!("EDID: skipping extension with bad checksum");
                continue;
            }
            added += Self::decode_cta(block, modes);
        }

        added
    }
}

#[cfg(test)]
pub(crate) mod fixture {
    //! EDID images for tests

    use super::*;
    use alloc::vec::Vec;

    /// Timing to encode into a descriptor
    #[derive(Clone, Copy)]
    pub struct Timing {
        pub clock_khz: u32,
        pub hactive: u16,
        pub hfront: u16,
        pub hsync: u16,
        pub hblank: u16,
        pub vactive: u16,
        pub vfront: u16,
        pub vsync: u16,
        pub vblank: u16,
    }

    pub const T1080P: Timing = Timing {
        clock_khz: 148_500,
        hactive: 1920,
        hfront: 88,
        hsync: 44,
        hblank: 280,
        vactive: 1080,
        vfront: 4,
        vsync: 5,
        vblank: 45,
    };

    pub const T720P: Timing = Timing {
        clock_khz: 74_250,
        hactive: 1280,
        hfront: 110,
        hsync: 40,
        hblank: 370,
        vactive: 720,
        vfront: 5,
        vsync: 5,
        vblank: 30,
    };

    pub const T1440P: Timing = Timing {
        clock_khz: 241_500,
        hactive: 2560,
        hfront: 48,
        hsync: 32,
        hblank: 160,
        vactive: 1440,
        vfront: 3,
        vsync: 5,
        vblank: 41,
    };

    pub fn encode_dtd(t: &Timing) -> [u8; DTD_LEN] {
        let clock = ((t.clock_khz / 10) as u16).to_le_bytes();
        let mut d = [0u8; DTD_LEN];
        d[0] = clock[0];
        d[1] = clock[1];
        d[2] = (t.hactive & 0xFF) as u8;
        d[3] = (t.hblank & 0xFF) as u8;
        d[4] = (((t.hactive >> 8) as u8) << 4) | ((t.hblank >> 8) as u8 & 0x0F);
        d[5] = (t.vactive & 0xFF) as u8;
        d[6] = (t.vblank & 0xFF) as u8;
        d[7] = (((t.vactive >> 8) as u8) << 4) | ((t.vblank >> 8) as u8 & 0x0F);
        d[8] = (t.hfront & 0xFF) as u8;
        d[9] = (t.hsync & 0xFF) as u8;
        d[10] = (((t.vfront & 0x0F) as u8) << 4) | (t.vsync & 0x0F) as u8;
        d[11] = (((t.hfront >> 8) as u8 & 0x03) << 6)
            | (((t.hsync >> 8) as u8 & 0x03) << 4)
            | (((t.vfront >> 4) as u8 & 0x03) << 2)
            | ((t.vsync >> 4) as u8 & 0x03);
        d[17] = 0x18;
        d
    }

    pub fn fix_checksum(block: &mut [u8]) {
        let sum = block[..EDID_BLOCK_LEN - 1]
            .iter()
            .fold(0u8, |acc, b| acc.wrapping_add(*b));
        block[EDID_BLOCK_LEN - 1] = 0u8.wrapping_sub(sum);
    }

    /// Base block holding `timings` as its first descriptors
    pub fn base_block(timings: &[Timing], extensions: u8) -> Vec<u8> {
        let mut block = vec![0u8; EDID_BLOCK_LEN];
        block[..8].copy_from_slice(&EDID_HEADER);
        // EDID 1.4
        block[0x12] = 1;
        block[0x13] = 4;
        for (i, t) in timings.iter().take(BASE_DTD_COUNT).enumerate() {
            let at = BASE_DTD_OFFSET + i * DTD_LEN;
            block[at..at + DTD_LEN].copy_from_slice(&encode_dtd(t));
        }
        // Unused descriptors become dummy display descriptors
        for i in timings.len().min(BASE_DTD_COUNT)..BASE_DTD_COUNT {
            block[BASE_DTD_OFFSET + i * DTD_LEN + 3] = 0x10;
        }
        block[EXTENSION_COUNT] = extensions;
        fix_checksum(&mut block);
        block
    }

    /// CTA-861 extension carrying `timings`
    pub fn cta_block(timings: &[Timing]) -> Vec<u8> {
        let mut block = vec![0u8; EDID_BLOCK_LEN];
        block[0] = CTA_EXTENSION_TAG;
        block[1] = 3;
        block[2] = 4;
        for (i, t) in timings.iter().enumerate() {
            let at = 4 + i * DTD_LEN;
            block[at..at + DTD_LEN].copy_from_slice(&encode_dtd(t));
        }
        fix_checksum(&mut block);
        block
    }
}
