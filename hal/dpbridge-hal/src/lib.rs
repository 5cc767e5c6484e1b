//! dpbridge Hardware Abstraction Layer
//!
//! This crate defines the hardware traits a display bridge consumes:
//! enable lines, supply regulators and the DDC data channel. Board or
//! SoC support crates implement them; `dpbridge-core` only ever sees
//! the traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Display pipeline (encoder, CRTC, ...)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  dpbridge-core (bridge node, modes)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  dpbridge-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ GPIO / supply │       │   DDC (I2C)   │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`regulator::Regulator`] - Switchable power supplies
//! - [`i2c::I2cBus`] - I2C bus operations (DDC)

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;
pub mod regulator;

// Re-export key traits at crate root for convenience
pub use gpio::{InputPin, Level, OutputPin};
pub use i2c::{BusId, I2cBus};
pub use regulator::{Regulator, RegulatorError};
