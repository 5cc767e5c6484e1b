//! GPIO line adapters
//!
//! Wrap `embedded-hal` pins into the logical lines the bridge core
//! expects. Polarity is handled here: an active-low enable line is
//! asserted by driving the pin low.

use dpbridge_core::warn;
use dpbridge_hal::{InputPin, OutputPin};
use embedded_hal::digital;

/// Output line with optional active-low polarity
pub struct GpioLine<P> {
    pin: P,
    /// If true, asserted = pin LOW
    active_low: bool,
    /// Logical state (true = asserted)
    asserted: bool,
}

impl<P: digital::OutputPin> GpioLine<P> {
    /// Take `pin` and drive it deasserted
    pub fn new(pin: P, active_low: bool) -> Self {
        let mut line = Self {
            pin,
            active_low,
            asserted: false,
        };
        line.drive(false);
        line
    }

    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    /// Give the pin back
    pub fn release(self) -> P {
        self.pin
    }

    fn drive(&mut self, asserted: bool) {
        // asserted != active_low: high for active-high, low for active-low
        let result = if asserted != self.active_low {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };

        match result {
            Ok(()) => self.asserted = asserted,
            Err(_) => warn!("gpio: failed to drive line"),
        }
    }
}

impl<P: digital::OutputPin> OutputPin for GpioLine<P> {
    fn set_high(&mut self) {
        self.drive(true);
    }

    fn set_low(&mut self) {
        self.drive(false);
    }

    fn is_set_high(&self) -> bool {
        self.asserted
    }
}

/// Input line with optional active-low polarity
///
/// Read errors report the line as deasserted.
pub struct GpioInput<P> {
    pin: P,
    active_low: bool,
}

impl<P: digital::InputPin> GpioInput<P> {
    pub fn new(pin: P, active_low: bool) -> Self {
        Self { pin, active_low }
    }
}

impl<P: digital::InputPin> InputPin for GpioInput<P> {
    fn is_high(&mut self) -> bool {
        match self.pin.is_high() {
            Ok(high) => high != self.active_low,
            Err(_) => {
                warn!("gpio: failed to read line");
                false
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;

    #[test]
    fn test_active_high_line() {
        let mut line = GpioLine::new_active_high(MockPin::new());

        // Initially deasserted
        assert!(!line.is_set_high());
        assert!(!line.pin.high);

        line.set_high();
        assert!(line.is_set_high());
        assert!(line.pin.high);

        line.set_low();
        assert!(line.is_set_low());
        assert!(!line.pin.high);
    }

    #[test]
    fn test_active_low_line() {
        let mut line = GpioLine::new_active_low(MockPin::new());

        // Deasserted means the pin idles high
        assert!(!line.is_set_high());
        assert!(line.pin.high);

        line.set_high();
        assert!(line.is_set_high());
        assert!(!line.pin.high);
    }

    #[test]
    fn test_set_level() {
        let mut line = GpioLine::new_active_high(MockPin::new());
        line.set_level(dpbridge_hal::Level::High);
        assert!(line.release().high);
    }

    #[test]
    fn test_failed_write_keeps_state() {
        let mut line = GpioLine::new_active_high(BrokenPin);
        line.set_high();
        assert!(!line.is_set_high());
    }

    #[test]
    fn test_input_polarity() {
        let mut pin = MockPin::new();
        pin.high = true;
        let mut input = GpioInput::new(pin, false);
        assert!(input.is_high());

        let mut inverted = GpioInput::new(MockPin::new(), true);
        assert!(inverted.is_high());
        assert!(!GpioInput::new(BrokenPin, false).is_high());
    }
}
