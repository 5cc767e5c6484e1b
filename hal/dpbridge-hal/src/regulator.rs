//! Power supply regulator abstraction
//!
//! A regulator is a switchable supply rail shared between consumers.
//! Enabling and disabling may sleep while the rail ramps.

/// Errors reported by regulator operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegulatorError {
    /// Disable without a matching enable
    Unbalanced,
    /// Control interface failed (bus error, PMIC NAK)
    Io,
    /// Rail did not reach regulation in time
    Timeout,
}

impl core::fmt::Display for RegulatorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RegulatorError::Unbalanced => f.write_str("unbalanced disable"),
            RegulatorError::Io => f.write_str("control interface error"),
            RegulatorError::Timeout => f.write_str("ramp timeout"),
        }
    }
}

/// Switchable supply rail
pub trait Regulator {
    /// Request the rail on
    fn enable(&mut self) -> Result<(), RegulatorError>;

    /// Release a previous enable request
    fn disable(&mut self) -> Result<(), RegulatorError>;

    /// Check if the rail is currently on
    fn is_enabled(&self) -> bool;
}
