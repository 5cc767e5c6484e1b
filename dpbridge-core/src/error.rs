//! Error taxonomy for probe and attach
//!
//! Failures come in two classes the caller can branch on without
//! inspecting details:
//!
//! - [`Error::Retryable`]: a dependency is not ready yet. The caller
//!   re-runs the whole bring-up later (deferred probe).
//! - [`Error::Fatal`]: the instance cannot be brought up. It is dropped
//!   and never retried.
//!
//! An optional resource that is simply not configured is not an error at
//! all; see [`crate::resources::ResourceError::Absent`].

use core::fmt;

/// Dependency a retryable operation is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dependency {
    /// No bridge registered yet at the remote end of the output port
    DownstreamBridge,
    /// Supply provider not ready
    Regulator,
    /// GPIO controller for the enable line not ready
    EnableGpio,
}

/// Reasons a bring-up or attach is abandoned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FatalError {
    /// No variant in the match table for the device's compatible string
    NoMatch,
    /// Device identity does not fit the bounded name storage
    InvalidDevice,
    /// Output port has no remote endpoint in the topology
    NoRemoteNode,
    /// Enable line missing or its lookup failed for good
    EnableGpio,
    /// Pipeline attached the bridge without an encoder
    NoEncoder,
    /// Connector could not be initialized
    ConnectorInit,
    /// Connector cannot take another encoder
    TooManyEncoders,
    /// Bridge cannot create a connector of its own
    ConnectorUnsupported,
    /// Operation not allowed in the current attach state
    InvalidState,
    /// Cached downstream bridge has been unbound
    DownstreamGone,
    /// A bridge is already registered for this node
    AlreadyRegistered,
}

/// Probe and attach error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Dependency not ready; try the whole bring-up again later
    Retryable(Dependency),
    /// Permanent failure
    Fatal(FatalError),
}

impl Error {
    /// Check if the caller should retry later
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Retryable(_))
    }

    /// Check if the failure is permanent
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Fatal(_))
    }
}

impl From<FatalError> for Error {
    fn from(err: FatalError) -> Self {
        Error::Fatal(err)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dependency::DownstreamBridge => "downstream bridge",
            Dependency::Regulator => "supply regulator",
            Dependency::EnableGpio => "enable gpio",
        };
        f.write_str(name)
    }
}

impl fmt::Display for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            FatalError::NoMatch => "no matching device variant",
            FatalError::InvalidDevice => "invalid device identity",
            FatalError::NoRemoteNode => "no remote node on output port",
            FatalError::EnableGpio => "enable gpio unavailable",
            FatalError::NoEncoder => "no encoder",
            FatalError::ConnectorInit => "failed to initialize connector",
            FatalError::TooManyEncoders => "too many encoders on connector",
            FatalError::ConnectorUnsupported => "bridge cannot create a connector",
            FatalError::InvalidState => "invalid attach state",
            FatalError::DownstreamGone => "downstream bridge gone",
            FatalError::AlreadyRegistered => "bridge already registered",
        };
        f.write_str(msg)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Retryable(dep) => write!(f, "waiting for {}", dep),
            Error::Fatal(err) => write!(f, "{}", err),
        }
    }
}
