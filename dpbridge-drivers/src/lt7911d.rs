//! Lontium LT7911D bridge
//!
//! Converts the SoC's video output to eDP. The chip needs no register
//! programming from the host: bringing it up is a matter of its supply,
//! its enable line and the downstream sink. Everything else lives in
//! [`BridgeNode`].

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use dpbridge_core::config::{BridgeConfig, BridgeTimings, DeviceVariantInfo, VariantMatch};
use dpbridge_core::connector::ConnectorType;
use dpbridge_core::device::{Device, NodeId};
use dpbridge_core::edid::EdidDecoder;
use dpbridge_core::error::Error;
use dpbridge_core::platform::{Driver, ProbeContext};
use dpbridge_core::traits::BridgeRef;
use dpbridge_core::BridgeNode;

use crate::edid::DetailedTimingDecoder;

pub const LT7911D_COMPATIBLE: &str = "lontium,lt7911d-bridge";

static LT7911D_EDP: DeviceVariantInfo = DeviceVariantInfo {
    connector_type: ConnectorType::Edp,
    timings: &BridgeTimings::DEFAULT,
};

/// Match table
pub static LT7911D_MATCH: [VariantMatch; 1] = [VariantMatch {
    compatible: LT7911D_COMPATIBLE,
    info: &LT7911D_EDP,
}];

pub struct Lt7911dDriver {
    decoder: Rc<dyn EdidDecoder>,
    default_config: BridgeConfig,
    /// Per-node overrides from the board description
    configs: Vec<(NodeId, BridgeConfig)>,
}

impl Lt7911dDriver {
    /// Driver decoding EDID with [`DetailedTimingDecoder`]
    pub fn new() -> Self {
        Self::with_decoder(Rc::new(DetailedTimingDecoder::new()))
    }

    pub fn with_decoder(decoder: Rc<dyn EdidDecoder>) -> Self {
        Self {
            decoder,
            default_config: BridgeConfig::default(),
            configs: Vec::new(),
        }
    }

    /// Use `config` for the bridge on `node`
    pub fn with_config(mut self, node: NodeId, config: BridgeConfig) -> Self {
        self.configs.retain(|(n, _)| *n != node);
        self.configs.push((node, config));
        self
    }

    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    fn config_for(&self, node: NodeId) -> BridgeConfig {
        self.configs
            .iter()
            .find(|(n, _)| *n == node)
            .map(|(_, config)| config.clone())
            .unwrap_or_else(|| self.default_config.clone())
    }
}

impl Default for Lt7911dDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for Lt7911dDriver {
    fn name(&self) -> &'static str {
        "lt7911d"
    }

    fn compatible(&self) -> &'static [&'static str] {
        &[LT7911D_COMPATIBLE]
    }

    fn probe(&self, device: &Device, ctx: &mut ProbeContext<'_>) -> Result<BridgeRef, Error> {
        let node = BridgeNode::probe(
            device,
            &LT7911D_MATCH,
            self.config_for(device.node()),
            self.decoder.clone(),
            ctx,
        )?;
        Ok(Rc::new(RefCell::new(node)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpbridge_core::config::{match_variant, RegulatorFailurePolicy};

    #[test]
    fn test_match_table() {
        let info = match_variant(&LT7911D_MATCH, LT7911D_COMPATIBLE).unwrap();
        assert_eq!(info.connector_type, ConnectorType::Edp);
        assert_eq!(*info.timings, BridgeTimings::DEFAULT);
        assert!(match_variant(&LT7911D_MATCH, "lontium,lt9611").is_none());
    }

    #[test]
    fn test_config_override() {
        let custom = BridgeConfig::default().with_regulator_failure(RegulatorFailurePolicy::SkipEnableLine);
        let driver = Lt7911dDriver::new().with_config(NodeId(3), custom.clone());

        assert_eq!(driver.config_for(NodeId(3)), custom);
        assert_eq!(driver.config_for(NodeId(4)), BridgeConfig::default());
    }
}
