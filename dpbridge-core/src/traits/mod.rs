//! Hardware-facing traits
//!
//! These traits define the interface between the bridge core and the
//! elements around it in the display pipeline.

pub mod bridge;

pub use bridge::{AttachFlags, Bridge, BridgeOps, BridgeRef, WeakBridgeRef};
