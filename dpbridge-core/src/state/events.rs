//! Events that trigger attach state transitions

/// Steps of the attach protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AttachEvent {
    /// Downstream bridge accepted the attach
    DownstreamAttached,
    /// Connector initialized, hooked up and registered
    ConnectorInitialized,
    /// Connector attached to the encoder and powered on
    EncoderAttached,
    /// Any step failed
    Failed,
}
