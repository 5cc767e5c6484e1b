//! Power resource resolution
//!
//! A bridge needs an enable line and may have a supply regulator. Both
//! come from a [`ResourceProvider`] at probe and stay with the bridge
//! until it is unbound. Dropping [`PowerResources`] releases them, which
//! gives a single release point no matter how often the bridge was
//! enabled or disabled in between.

use alloc::boxed::Box;

use dpbridge_hal::{Level, OutputPin, Regulator};

use crate::config::BridgeConfig;
use crate::device::Device;
use crate::error::{Dependency, Error, FatalError};

/// Outcome of a failed resource lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResourceError {
    /// Not configured for this device
    Absent,
    /// Provider exists but is not ready yet
    Deferred,
    /// Lookup failed for another reason
    Failed,
}

/// Source of regulators and GPIO lines
pub trait ResourceProvider {
    /// Get the supply `name` of `device`
    fn regulator(
        &mut self,
        device: &Device,
        name: &str,
    ) -> Result<Box<dyn Regulator>, ResourceError>;

    /// Get the output line `name` of `device`, driven to `initial`
    fn gpio(
        &mut self,
        device: &Device,
        name: &str,
        initial: Level,
    ) -> Result<Box<dyn OutputPin>, ResourceError>;
}

/// Resources held by a bound bridge
pub struct PowerResources {
    pub(crate) vdd: Option<Box<dyn Regulator>>,
    pub(crate) enable: Box<dyn OutputPin>,
}

impl PowerResources {
    /// Bundle already acquired resources
    pub fn new(vdd: Option<Box<dyn Regulator>>, enable: Box<dyn OutputPin>) -> Self {
        Self { vdd, enable }
    }

    /// Check if a supply regulator is held
    pub fn has_regulator(&self) -> bool {
        self.vdd.is_some()
    }

    /// Check if the enable line is asserted
    pub fn is_enabled(&self) -> bool {
        self.enable.is_set_high()
    }
}

/// Acquire the supply and enable line for `device`
///
/// - Supply: absent means no regulator. Deferred is retryable. Any
///   other lookup failure is also treated as no regulator.
/// - Enable line: requested driven low. Deferred is retryable, anything
///   else is fatal. A supply acquired before the failure is released
///   before returning.
pub fn resolve_power_resources(
    provider: &mut dyn ResourceProvider,
    device: &Device,
    config: &BridgeConfig,
) -> Result<PowerResources, Error> {
    let supply = config.supply.as_str();
    let vdd = match provider.regulator(device, supply) {
        Ok(regulator) => Some(regulator),
        Err(ResourceError::Deferred) => {
            debug!("{}: waiting for {}", device.name(), supply);
            return Err(Error::Retryable(Dependency::Regulator));
        }
        Err(ResourceError::Absent) => {
            debug!("{}: no {} regulator found", device.name(), supply);
            None
        }
        Err(ResourceError::Failed) => {
            debug!("{}: {} regulator lookup failed, running without it", device.name(), supply);
            None
        }
    };

    let gpio = config.enable_gpio.as_str();
    let enable = match provider.gpio(device, gpio, Level::Low) {
        Ok(line) => line,
        Err(ResourceError::Deferred) => {
            debug!("{}: waiting for {}", device.name(), gpio);
            return Err(Error::Retryable(Dependency::EnableGpio));
        }
        Err(_) => {
            error!("{}: failed to get {} gpio", device.name(), gpio);
            return Err(Error::Fatal(FatalError::EnableGpio));
        }
    };

    Ok(PowerResources::new(vdd, enable))
}
