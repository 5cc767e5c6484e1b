//! Fixed-voltage regulator
//!
//! A supply switched by a single GPIO line. Consumers share it through a
//! use count: the line is asserted on the first enable and deasserted on
//! the last disable.

use dpbridge_core::debug;
use dpbridge_hal::{OutputPin, Regulator, RegulatorError};

/// GPIO-switched supply with a use count
pub struct FixedRegulator<L> {
    name: &'static str,
    line: L,
    use_count: u32,
    /// Never switched off
    always_on: bool,
}

impl<L: OutputPin> FixedRegulator<L> {
    pub fn new(name: &'static str, line: L) -> Self {
        Self {
            name,
            line,
            use_count: 0,
            always_on: false,
        }
    }

    /// Supply that is asserted at creation and never switched off
    pub fn always_on(name: &'static str, mut line: L) -> Self {
        line.set_high();
        Self {
            name,
            line,
            use_count: 0,
            always_on: true,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn use_count(&self) -> u32 {
        self.use_count
    }
}

impl<L: OutputPin> Regulator for FixedRegulator<L> {
    fn enable(&mut self) -> Result<(), RegulatorError> {
        if self.use_count == 0 && !self.always_on {
            debug!("{}: switching on", self.name);
            self.line.set_high();
        }
        self.use_count += 1;
        Ok(())
    }

    fn disable(&mut self) -> Result<(), RegulatorError> {
        if self.use_count == 0 {
            return Err(RegulatorError::Unbalanced);
        }
        self.use_count -= 1;
        if self.use_count == 0 && !self.always_on {
            debug!("{}: switching off", self.name);
            self.line.set_low();
        }
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.always_on || self.use_count > 0
    }
}
