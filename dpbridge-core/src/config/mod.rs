//! Configuration types
//!
//! Static per-variant data matched by compatible string, and the
//! per-instance policy a board can override.

pub mod policy;
pub mod variant;

pub use policy::*;
pub use variant::*;
