//! Hardware driver implementations
//!
//! This crate provides concrete implementations on top of
//! dpbridge-core for the parts of a display pipeline:
//!
//! - Bridge drivers (LT7911D to eDP)
//! - Display connectors (HDMI, DP, DVI, VGA) with HPD and DDC
//! - EDID detailed timing decoding
//! - Power (fixed GPIO-switched regulators, GPIO lines)
//! - Board description parsing (TOML)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod board;
pub mod display_connector;
pub mod edid;
pub mod gpio;
pub mod i2c;
pub mod lt7911d;
pub mod regulator;

pub use board::BoardDescription;
pub use display_connector::{DisplayConnector, DisplayConnectorDriver};
pub use edid::DetailedTimingDecoder;
pub use lt7911d::Lt7911dDriver;
