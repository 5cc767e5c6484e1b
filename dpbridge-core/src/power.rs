//! Power sequencing
//!
//! Power-up is "supply on, then enable line high"; power-down is the
//! reverse. There is no notion of "already on": each call drives the
//! hardware again and the pipeline is responsible for alternating them.
//!
//! Supply failures never reach the pipeline. They are logged, and the
//! [`RegulatorFailurePolicy`] decides whether the enable line is still
//! asserted after a failed power-up.

use crate::config::RegulatorFailurePolicy;
use crate::resources::PowerResources;

impl PowerResources {
    /// Supply on, then enable line high
    pub fn power_on(&mut self, policy: RegulatorFailurePolicy) {
        if let Some(vdd) = self.vdd.as_mut() {
            if let Err(err) = vdd.enable() {
                error!("Failed to enable regulator: {}", err);
                if policy == RegulatorFailurePolicy::SkipEnableLine {
                    return;
                }
            }
        }

        self.enable.set_high();
    }

    /// Enable line low, then supply off
    pub fn power_off(&mut self) {
        self.enable.set_low();

        if let Some(vdd) = self.vdd.as_mut() {
            if let Err(err) = vdd.disable() {
                error!("Failed to disable regulator: {}", err);
            }
        }
    }
}
