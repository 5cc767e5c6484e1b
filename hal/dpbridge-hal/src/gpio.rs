//! GPIO pin abstractions
//!
//! Provides traits for digital input and output lines that can be
//! implemented by board support code. Setting a line may sleep (the
//! line can sit behind an I2C expander), so callers must tolerate
//! blocking.

/// Logical level of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Deasserted (logic 0)
    #[default]
    Low,
    /// Asserted (logic 1)
    High,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Digital output line
///
/// Levels are logical: an active-low line reports `High` when asserted.
/// Implementations handle the inversion.
pub trait OutputPin {
    /// Set the line high (asserted)
    fn set_high(&mut self);

    /// Set the line low (deasserted)
    fn set_low(&mut self);

    /// Drive the line to a specific level
    fn set_level(&mut self, level: Level) {
        match level {
            Level::High => self.set_high(),
            Level::Low => self.set_low(),
        }
    }

    /// Check if the line is currently driven high
    fn is_set_high(&self) -> bool;

    /// Check if the line is currently driven low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Digital input line
///
/// Takes `&mut self` because reading may involve a bus transaction.
pub trait InputPin {
    /// Check if the line reads high
    fn is_high(&mut self) -> bool;

    /// Check if the line reads low
    fn is_low(&mut self) -> bool {
        !self.is_high()
    }
}
