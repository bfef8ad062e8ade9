//! Error types for TAP device operations.

use std::fmt;
use std::io;

use thiserror::Error;

/// Construction step that failed during device initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStep {
    /// Opening the virtual-interface control resource.
    ResourceOpen,
    /// Probing for an unused interface name.
    NameAllocation,
    /// Requesting TAP-mode framing.
    TapMode,
    /// Assigning the hardware address.
    HardwareAddress,
    /// Setting the MTU.
    Mtu,
    /// Switching the handle to blocking mode.
    Blocking,
    /// Bringing the interface administratively up.
    InterfaceUp,
}

impl fmt::Display for InitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InitStep::ResourceOpen => "resource-open",
            InitStep::NameAllocation => "name-allocation",
            InitStep::TapMode => "tap-mode-configuration",
            InitStep::HardwareAddress => "hardware-address-set",
            InitStep::Mtu => "mtu-set",
            InitStep::Blocking => "blocking-mode-set",
            InitStep::InterfaceUp => "interface-up",
        };
        f.write_str(name)
    }
}

/// Errors from TAP device operations.
///
/// An empty read (14 header bytes or fewer) is not in this taxonomy: it is
/// the `Ok(None)` result of [`TapDevice::get`](crate::TapDevice::get).
#[derive(Debug, Error)]
pub enum TapError {
    /// Device construction failed. Every resource acquired before the
    /// failing step has already been released; no device value escapes.
    #[error("device init failed at {step}: {source}")]
    Init {
        step: InitStep,
        #[source]
        source: io::Error,
    },

    /// `put` payload exceeds the device MTU; nothing was written.
    #[error("frame payload of {len} bytes exceeds MTU {mtu}")]
    FrameTooLarge { len: usize, mtu: usize },

    /// I/O attempted on a closed device.
    #[error("device is closed")]
    DeviceClosed,

    /// `add_ip` called with the None-family sentinel.
    #[error("not a valid internet address")]
    InvalidAddress,

    /// `remove_ip` called for an address that is not bound.
    #[error("address is not bound to this device")]
    NotBound,

    /// The external address command exited nonzero; the bound set is
    /// exactly as it was before the call.
    #[error("`{program} addr {action}` exited with {code:?}: {stderr}")]
    Command {
        program: String,
        action: &'static str,
        code: Option<i32>,
        stderr: String,
    },

    /// The external command could not be spawned, or frame I/O on the OS
    /// handle failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}
