//! Bridge node
//!
//! The bridge instance a driver creates at probe. It owns its power
//! resources, caches the downstream bridge, runs the attach protocol
//! and owns the connector it creates.
//!
//! # Lifecycle
//!
//! ```text
//! probe ──► attach ──► enable / disable / detect / fill_modes ... ──► drop
//! ```
//!
//! Probe either returns a complete node or nothing: no connector exists
//! and nothing is registered until it succeeds. Dropping the node is
//! the single release point for its resources.

use alloc::rc::Rc;

use crate::config::{match_variant, BridgeConfig, BridgeTimings, DeviceVariantInfo, VariantMatch};
use crate::connector::{Connector, ConnectorStatus, DpmsState, EncoderId};
use crate::device::Device;
use crate::edid::EdidDecoder;
use crate::error::{Error, FatalError};
use crate::negotiate::negotiate_modes;
use crate::platform::ProbeContext;
use crate::resources::{resolve_power_resources, PowerResources};
use crate::state::{AttachEvent, AttachState};
use crate::topology::{resolve_downstream, DownstreamBridge};
use crate::traits::{AttachFlags, Bridge, BridgeOps};

/// A bound bridge instance
pub struct BridgeNode {
    device: Device,
    info: &'static DeviceVariantInfo,
    config: BridgeConfig,
    power: PowerResources,
    downstream: DownstreamBridge,
    decoder: Rc<dyn EdidDecoder>,
    state: AttachState,
    connector: Option<Connector>,
}

impl BridgeNode {
    /// Bring up a bridge for `device`
    ///
    /// Steps, in order:
    /// 1. Match the device against `table`
    /// 2. Resolve the downstream bridge (deferred if not registered yet)
    /// 3. Acquire the supply and enable line
    ///
    /// The downstream link is resolved before anything is acquired, so
    /// a deferred probe holds no resources.
    pub fn probe(
        device: &Device,
        table: &'static [VariantMatch],
        config: BridgeConfig,
        decoder: Rc<dyn EdidDecoder>,
        ctx: &mut ProbeContext<'_>,
    ) -> Result<Self, Error> {
        let info = match_variant(table, device.compatible())
            .ok_or(Error::Fatal(FatalError::NoMatch))?;

        let downstream = match resolve_downstream(ctx.topology, ctx.registry, device.node()) {
            Ok(downstream) => downstream,
            Err(err) => {
                if err.is_retryable() {
                    debug!("{}: no bridge found", device.name());
                } else {
                    error!("{}: {}", device.name(), err);
                }
                return Err(err);
            }
        };

        let power = resolve_power_resources(ctx.resources, device, &config)?;

        info!(
            "{}: bound, downstream node {}, regulator {}",
            device.name(),
            downstream.node().0,
            power.has_regulator()
        );

        Ok(Self {
            device: device.clone(),
            info,
            config,
            power,
            downstream,
            decoder,
            state: AttachState::Unattached,
            connector: None,
        })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Variant data matched at probe
    pub fn info(&self) -> &'static DeviceVariantInfo {
        self.info
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn state(&self) -> AttachState {
        self.state
    }

    pub fn power(&self) -> &PowerResources {
        &self.power
    }

    /// Cached downstream bridge
    pub fn downstream(&self) -> &DownstreamBridge {
        &self.downstream
    }

    /// Run the connector's mode hook
    ///
    /// Returns the number of modes in the connector's list, or 0 when
    /// no connector with a mode hook exists.
    pub fn get_modes(&mut self) -> usize {
        match self.connector.as_mut() {
            Some(connector) if connector.has_mode_hook() => {
                negotiate_modes(&self.downstream, connector, &*self.decoder)
            }
            _ => 0,
        }
    }

    fn run_attach(&mut self, encoder: Option<EncoderId>, flags: AttachFlags) -> Result<(), Error> {
        let Some(encoder) = encoder else {
            error!("{}: No encoder found", self.device.name());
            return Err(Error::Fatal(FatalError::NoEncoder));
        };

        let next = self
            .downstream
            .get()
            .ok_or(Error::Fatal(FatalError::DownstreamGone))?;

        // The connector belongs to this bridge, never to the next one
        next.borrow_mut()
            .attach(Some(encoder), AttachFlags::NO_CONNECTOR)?;
        self.state = self.state.transition(AttachEvent::DownstreamAttached);

        if flags.contains(AttachFlags::NO_CONNECTOR) {
            debug!("{}: attached without connector", self.device.name());
            return Ok(());
        }

        let ddc = next.borrow().ddc();
        let mut connector =
            match Connector::init(self.device.node(), self.info.connector_type, ddc) {
                Ok(connector) => connector,
                Err(err) => {
                    error!("{}: Failed to initialize connector", self.device.name());
                    return Err(err);
                }
            };
        connector.helper_add();
        connector.register();
        self.state = self.state.transition(AttachEvent::ConnectorInitialized);

        connector.attach_encoder(encoder)?;
        connector.set_dpms(DpmsState::On);
        self.connector = Some(connector);
        self.state = self.state.transition(AttachEvent::EncoderAttached);

        Ok(())
    }
}

impl Bridge for BridgeNode {
    fn ops(&self) -> BridgeOps {
        BridgeOps::DETECT
    }

    fn attach(&mut self, encoder: Option<EncoderId>, flags: AttachFlags) -> Result<(), Error> {
        if !self.state.can_attach() {
            error!("{}: attach in state {:?}", self.device.name(), self.state);
            return Err(Error::Fatal(FatalError::InvalidState));
        }

        let result = self.run_attach(encoder, flags);
        if let Err(err) = result {
            warn!("{}: attach failed: {}", self.device.name(), err);
            self.state = self.state.transition(AttachEvent::Failed);
        }
        result
    }

    fn detect(&mut self) -> ConnectorStatus {
        match self.downstream.get() {
            Some(next) => next.borrow_mut().detect(),
            None => ConnectorStatus::Unknown,
        }
    }

    fn enable(&mut self) {
        self.power.power_on(self.config.regulator_failure);
    }

    fn disable(&mut self) {
        self.power.power_off();
    }

    fn timings(&self) -> Option<&'static BridgeTimings> {
        Some(self.info.timings)
    }

    fn connector(&self) -> Option<&Connector> {
        self.connector.as_ref()
    }

    fn fill_modes(&mut self, max_width: u16, max_height: u16) -> usize {
        let status = self.detect();
        let Some(connector) = self.connector.as_mut() else {
            return 0;
        };
        connector.set_status(status);

        if status == ConnectorStatus::Disconnected {
            connector.modes_mut().clear();
            return 0;
        }

        self.get_modes();

        match self.connector.as_mut() {
            Some(connector) => {
                let pruned = connector.modes_mut().prune(max_width, max_height);
                if pruned > 0 {
                    debug!("{}: pruned {} modes", self.device.name(), pruned);
                }
                connector.modes().len()
            }
            None => 0,
        }
    }
}
