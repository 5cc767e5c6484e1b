//! Driver core
//!
//! Matches devices to drivers by compatible string, publishes bound
//! bridges in the registry and re-probes deferred devices whenever
//! something new was bound.
//!
//! ```text
//! add_device ──► probe ──┬─ Ok ─────────► bound, registered ──► retry deferred
//!                        ├─ Retryable ──► deferred
//!                        └─ Fatal ──────► dropped
//! ```
//!
//! The platform owns every bound bridge. Bridges only hold weak links to
//! each other, so unbinding drops the bridge and releases its resources.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::device::{Device, NodeId};
use crate::error::{Error, FatalError};
use crate::resources::ResourceProvider;
use crate::topology::{BridgeRegistry, TopologyProvider};
use crate::traits::BridgeRef;

/// What a driver may use while probing
pub struct ProbeContext<'a> {
    pub topology: &'a dyn TopologyProvider,
    pub resources: &'a mut dyn ResourceProvider,
    pub registry: &'a BridgeRegistry,
}

/// Bridge driver
pub trait Driver {
    /// Driver name for logs
    fn name(&self) -> &'static str;

    /// Compatible strings this driver binds to
    fn compatible(&self) -> &'static [&'static str];

    /// Create a bridge for `device`
    ///
    /// A retryable error puts the device on the deferred list.
    fn probe(&self, device: &Device, ctx: &mut ProbeContext<'_>) -> Result<BridgeRef, Error>;
}

struct Binding {
    device: Device,
    bridge: BridgeRef,
}

/// Device/driver matching with deferred probe
pub struct Platform {
    topology: Box<dyn TopologyProvider>,
    resources: Box<dyn ResourceProvider>,
    drivers: Vec<Box<dyn Driver>>,
    registry: BridgeRegistry,
    bound: Vec<Binding>,
    deferred: Vec<Device>,
}

impl Platform {
    pub fn new(topology: Box<dyn TopologyProvider>, resources: Box<dyn ResourceProvider>) -> Self {
        Self {
            topology,
            resources,
            drivers: Vec::new(),
            registry: BridgeRegistry::new(),
            bound: Vec::new(),
            deferred: Vec::new(),
        }
    }

    pub fn register_driver(&mut self, driver: Box<dyn Driver>) {
        debug!("Registered driver '{}'", driver.name());
        self.drivers.push(driver);
    }

    /// Probe a new device
    ///
    /// On success every deferred device is retried. A retryable failure
    /// is not reported as an error: the device waits on the deferred
    /// list instead.
    pub fn add_device(&mut self, device: Device) -> Result<(), Error> {
        match self.try_bind(&device) {
            Ok(()) => {
                self.retry_deferred();
                Ok(())
            }
            Err(err) if err.is_retryable() => {
                debug!("{}: probe deferred ({})", device.name(), err);
                if !self.deferred.iter().any(|d| d.node() == device.node()) {
                    self.deferred.push(device);
                }
                Ok(())
            }
            Err(err) => {
                error!("{}: probe failed: {}", device.name(), err);
                Err(err)
            }
        }
    }

    /// Re-probe deferred devices until no more progress is made
    ///
    /// Returns the number of devices bound.
    pub fn retry_deferred(&mut self) -> usize {
        let mut bound = 0;
        loop {
            let pending = core::mem::take(&mut self.deferred);
            let mut progress = false;
            for device in pending {
                match self.try_bind(&device) {
                    Ok(()) => {
                        progress = true;
                        bound += 1;
                    }
                    Err(err) if err.is_retryable() => self.deferred.push(device),
                    Err(err) => error!("{}: probe failed: {}", device.name(), err),
                }
            }
            if !progress {
                return bound;
            }
        }
    }

    /// Unbind the bridge of `node`
    ///
    /// The bridge is dropped here unless someone else still holds a
    /// strong handle to it.
    pub fn unbind(&mut self, node: NodeId) -> bool {
        let Some(index) = self.bound.iter().position(|b| b.device.node() == node) else {
            return false;
        };
        self.registry.remove(node);
        let binding = self.bound.remove(index);
        info!("{}: unbound", binding.device.name());
        true
    }

    /// Bound bridge of `node`
    pub fn bridge(&self, node: NodeId) -> Option<BridgeRef> {
        self.bound
            .iter()
            .find(|b| b.device.node() == node)
            .map(|b| b.bridge.clone())
    }

    pub fn is_bound(&self, node: NodeId) -> bool {
        self.bound.iter().any(|b| b.device.node() == node)
    }

    /// Devices waiting for a dependency
    pub fn deferred(&self) -> &[Device] {
        &self.deferred
    }

    pub fn registry(&self) -> &BridgeRegistry {
        &self.registry
    }

    fn try_bind(&mut self, device: &Device) -> Result<(), Error> {
        if self.is_bound(device.node()) {
            return Err(Error::Fatal(FatalError::AlreadyRegistered));
        }

        let driver = self
            .drivers
            .iter()
            .find(|d| d.compatible().iter().any(|c| *c == device.compatible()))
            .ok_or(Error::Fatal(FatalError::NoMatch))?;

        let mut ctx = ProbeContext {
            topology: &*self.topology,
            resources: &mut *self.resources,
            registry: &self.registry,
        };
        let bridge = driver.probe(device, &mut ctx)?;

        self.registry.add(device.node(), &bridge)?;
        info!("{}: bound to '{}'", device.name(), driver.name());
        self.bound.push(Binding {
            device: device.clone(),
            bridge,
        });
        Ok(())
    }
}
