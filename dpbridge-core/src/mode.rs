//! Display modes and bounded mode lists
//!
//! A [`DisplayMode`] carries the timing values a sink advertises. This
//! crate never derives timings; producers (EDID decoders, the fallback
//! table) fill them in and the list only stores, orders and prunes them.

use bitflags::bitflags;
use heapless::Vec;

/// Maximum modes held by one connector
pub const MAX_MODES: usize = 32;

bitflags! {
    /// Mode origin and preference flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ModeType: u8 {
        /// Sink or driver prefers this mode
        const PREFERRED = 1 << 0;
        /// Synthesized by the driver rather than read from the sink
        const DRIVER = 1 << 1;
    }
}

/// A display timing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayMode {
    /// Pixel clock in kHz
    pub clock_khz: u32,
    pub hdisplay: u16,
    pub hsync_start: u16,
    pub hsync_end: u16,
    pub htotal: u16,
    pub vdisplay: u16,
    pub vsync_start: u16,
    pub vsync_end: u16,
    pub vtotal: u16,
    /// Vertical refresh in Hz
    pub refresh_hz: u16,
    pub mode_type: ModeType,
}

impl DisplayMode {
    /// VESA DMT 1920x1080@60 (same as CEA-861 VIC 16)
    pub const fn dmt_1080p60() -> Self {
        Self {
            clock_khz: 148_500,
            hdisplay: 1920,
            hsync_start: 2008,
            hsync_end: 2052,
            htotal: 2200,
            vdisplay: 1080,
            vsync_start: 1084,
            vsync_end: 1089,
            vtotal: 1125,
            refresh_hz: 60,
            mode_type: ModeType::DRIVER,
        }
    }

    /// Check if the mode is marked preferred
    pub fn is_preferred(&self) -> bool {
        self.mode_type.contains(ModeType::PREFERRED)
    }

    /// Check if the mode was synthesized by the driver
    pub fn is_driver_mode(&self) -> bool {
        self.mode_type.contains(ModeType::DRIVER)
    }

    /// Check if the active area matches the given size
    pub fn has_size(&self, width: u16, height: u16) -> bool {
        self.hdisplay == width && self.vdisplay == height
    }
}

/// Error returned when a mode list is full
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeListFull;

/// Ordered, bounded list of modes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeList {
    modes: Vec<DisplayMode, MAX_MODES>,
}

impl ModeList {
    /// Create an empty list
    pub const fn new() -> Self {
        Self { modes: Vec::new() }
    }

    /// Append a mode
    pub fn push(&mut self, mode: DisplayMode) -> Result<(), ModeListFull> {
        self.modes.push(mode).map_err(|_| ModeListFull)
    }

    /// Remove all modes
    pub fn clear(&mut self) {
        self.modes.clear();
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DisplayMode> {
        self.modes.iter()
    }

    pub fn as_slice(&self) -> &[DisplayMode] {
        &self.modes
    }

    /// First mode marked preferred
    pub fn preferred(&self) -> Option<&DisplayMode> {
        self.modes.iter().find(|m| m.is_preferred())
    }

    /// Mark every mode of the given size and refresh as preferred
    ///
    /// Returns the number of modes marked.
    pub fn set_preferred(&mut self, width: u16, height: u16, refresh_hz: u16) -> usize {
        let mut marked = 0;
        for mode in self.modes.iter_mut() {
            if mode.has_size(width, height) && mode.refresh_hz == refresh_hz {
                mode.mode_type |= ModeType::PREFERRED;
                marked += 1;
            }
        }
        marked
    }

    /// Drop modes larger than the given limits (0 means no limit)
    pub fn prune(&mut self, max_width: u16, max_height: u16) -> usize {
        let before = self.modes.len();
        self.modes.retain(|m| {
            (max_width == 0 || m.hdisplay <= max_width)
                && (max_height == 0 || m.vdisplay <= max_height)
        });
        before - self.modes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode(w: u16, h: u16, hz: u16) -> DisplayMode {
        DisplayMode {
            hdisplay: w,
            vdisplay: h,
            refresh_hz: hz,
            ..DisplayMode::default()
        }
    }

    #[test]
    fn test_dmt_1080p60() {
        let m = DisplayMode::dmt_1080p60();
        assert!(m.has_size(1920, 1080));
        assert_eq!(m.refresh_hz, 60);
        assert!(m.is_driver_mode());
        assert!(!m.is_preferred());
    }

    #[test]
    fn test_set_preferred_matches_size_and_refresh() {
        let mut list = ModeList::new();
        list.push(mode(1920, 1080, 60)).unwrap();
        list.push(mode(1920, 1080, 50)).unwrap();
        list.push(mode(1280, 720, 60)).unwrap();

        assert_eq!(list.set_preferred(1920, 1080, 60), 1);
        let preferred = list.preferred().unwrap();
        assert_eq!(preferred.refresh_hz, 60);
        assert!(preferred.has_size(1920, 1080));
    }

    #[test]
    fn test_list_full() {
        let mut list = ModeList::new();
        for _ in 0..MAX_MODES {
            list.push(mode(640, 480, 60)).unwrap();
        }
        assert_eq!(list.push(mode(640, 480, 60)), Err(ModeListFull));
        assert_eq!(list.len(), MAX_MODES);
    }

    #[test]
    fn test_prune() {
        let mut list = ModeList::new();
        list.push(mode(3840, 2160, 30)).unwrap();
        list.push(mode(1920, 1080, 60)).unwrap();
        list.push(mode(1280, 720, 60)).unwrap();

        // No limits keeps everything
        assert_eq!(list.prune(0, 0), 0);

        assert_eq!(list.prune(1920, 1080), 1);
        assert_eq!(list.len(), 2);
        assert!(list.iter().all(|m| m.hdisplay <= 1920));
    }
}
