//! Attachment state machine
//!
//! Tracks how far a bridge got in wiring itself into the pipeline.

mod events;
mod machine;

pub use events::AttachEvent;
pub use machine::AttachState;
