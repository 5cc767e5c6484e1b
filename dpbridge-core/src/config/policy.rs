//! Per-instance bridge policy
//!
//! Resource names and the power sequencing policy. The defaults match
//! the LT7911D binding; boards override them through their description.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum resource name length
pub const MAX_RESOURCE_NAME_LEN: usize = 16;

/// What enable does after the supply fails to come up
///
/// The enable line has always been asserted regardless; whether that is
/// a deliberate fail-safe or an oversight is open, so both behaviors are
/// available and the historical one is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum RegulatorFailurePolicy {
    /// Log the failure and assert the enable line anyway
    #[default]
    Continue,
    /// Log the failure and leave the enable line deasserted
    SkipEnableLine,
}

/// Bridge instance configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BridgeConfig {
    /// Supply name looked up for the optional regulator
    pub supply: String<MAX_RESOURCE_NAME_LEN>,
    /// GPIO name looked up for the mandatory enable line
    pub enable_gpio: String<MAX_RESOURCE_NAME_LEN>,
    /// Behavior when the supply fails to enable
    pub regulator_failure: RegulatorFailurePolicy,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            supply: resource_name("vdd"),
            enable_gpio: resource_name("enable"),
            regulator_failure: RegulatorFailurePolicy::Continue,
        }
    }
}

impl BridgeConfig {
    /// Override the power sequencing policy
    pub fn with_regulator_failure(mut self, policy: RegulatorFailurePolicy) -> Self {
        self.regulator_failure = policy;
        self
    }
}

fn resource_name(name: &str) -> String<MAX_RESOURCE_NAME_LEN> {
    let mut s = String::new();
    // Built-in names are shorter than the limit
    let _ = s.push_str(name);
    s
}
