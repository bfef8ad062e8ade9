//! # vnet-tap
//!
//! TAP-backed virtual Ethernet interfaces: device lifecycle, whole-frame
//! I/O, and reconciliation of the interface's bound IP addresses.
//!
//! Host-side model:
//! - one OS TAP handle per [`TapDevice`], opened in blocking mode
//! - frames are raw Ethernet: a 14-byte header plus an MTU-bounded payload
//! - address changes go through the system `ip` tool behind the injectable
//!   [`CommandRunner`] seam
//! - every OS touchpoint sits behind the [`DeviceBackend`] trait so tests
//!   drive the device against scripted in-memory fakes
//!
//! Single-threaded by design: `put`/`get` block on the handle, and
//! `add_ip`/`remove_ip` block for the full lifetime of the spawned command
//! with no timeout. Callers that need bounded latency impose their own
//! timeout around the call, and callers that share a device across threads
//! must serialize externally.

mod backend;
mod command;
mod device;
mod error;
pub mod frame;

pub use backend::DeviceBackend;
#[cfg(target_os = "linux")]
pub use backend::{LinuxBackend, LinuxTapHandle};
pub use command::{CommandOutput, CommandRunner, SystemRunner};
pub use device::{TapConfig, TapDevice, DEFAULT_MTU, DEFAULT_NAME_PREFIX};
pub use error::{InitStep, TapError};
pub use frame::{EthernetFrame, ETHER_HDR_LEN};

/// Re-export of the address value types used throughout this API.
pub use vnet_addr::{AddrFamily, InetAddress, MacAddress};
