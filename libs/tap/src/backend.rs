//! OS backends for TAP devices.
//!
//! [`DeviceBackend`] is the seam between [`TapDevice`](crate::TapDevice)
//! and the operating system: every resource acquisition and configuration
//! step the device performs goes through it, so tests run the device
//! against a scripted fake instead of `/dev/net/tun`.

use std::io;

use vnet_addr::MacAddress;

/// Operating-system interface behind one TAP device.
///
/// All operations are synchronous and may fail. `Handle` owns the
/// underlying OS resource; it is released through
/// [`DeviceBackend::close`], which consumes it.
pub trait DeviceBackend {
    /// Owned handle to the virtual-interface control resource.
    type Handle;

    /// Opens the control resource.
    fn open(&mut self) -> io::Result<Self::Handle>;

    /// Returns true if `name` already belongs to an OS-visible interface.
    fn name_taken(&self, name: &str) -> bool;

    /// Requests TAP-mode framing (whole Ethernet frames, no extra packet
    /// header) under `name`, returning the name the OS actually assigned.
    fn configure_tap(&mut self, handle: &mut Self::Handle, name: &str) -> io::Result<String>;

    /// Assigns the hardware address to the interface.
    fn set_hardware_address(&mut self, handle: &mut Self::Handle, mac: MacAddress)
        -> io::Result<()>;

    /// Sets the interface MTU.
    fn set_mtu(&mut self, handle: &mut Self::Handle, mtu: usize) -> io::Result<()>;

    /// Switches the handle between blocking and non-blocking I/O.
    fn set_blocking(&mut self, handle: &mut Self::Handle, blocking: bool) -> io::Result<()>;

    /// Brings the interface administratively up.
    fn set_up(&mut self, handle: &mut Self::Handle) -> io::Result<()>;

    /// Writes one whole frame, returning the byte count accepted.
    fn write_frame(&mut self, handle: &mut Self::Handle, frame: &[u8]) -> io::Result<usize>;

    /// Reads one whole frame into `buf`, returning the byte count.
    fn read_frame(&mut self, handle: &mut Self::Handle, buf: &mut [u8]) -> io::Result<usize>;

    /// Releases the handle. Called at most once per handle.
    fn close(&mut self, handle: Self::Handle) -> io::Result<()>;
}

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "linux")]
pub use linux::{LinuxBackend, LinuxTapHandle};
