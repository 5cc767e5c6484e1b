//! Board-agnostic core logic for display bridge drivers
//!
//! This crate contains everything a bridge driver needs that does not
//! depend on a specific chip:
//!
//! - Bridge trait for chaining to the next element of the pipeline
//! - Resource resolution (supply regulator, enable line)
//! - Downstream link resolution over the graph topology
//! - Attachment state machine and connector ownership
//! - Mode negotiation from EDID with a fixed fallback
//! - Power sequencing and detect forwarding
//! - A driver core with deferred probe
//!
//! All operations are synchronous and expect the caller to serialize
//! access to a bridge. Nothing here spawns work or keeps global state.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod config;
pub mod connector;
pub mod device;
pub mod edid;
pub mod error;
pub mod mode;
pub mod negotiate;
pub mod node;
pub mod platform;
pub mod power;
pub mod resources;
pub mod state;
pub mod topology;
pub mod traits;

#[doc(hidden)]
pub mod __private {
    pub use log;
}

pub use error::{Dependency, Error, FatalError};
pub use node::BridgeNode;
