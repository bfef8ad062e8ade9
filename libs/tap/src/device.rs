//! TAP device lifecycle, frame I/O, and bound-address reconciliation.

use std::fmt;
use std::io;

use tracing::{debug, info, warn};
use vnet_addr::{InetAddress, MacAddress};

use crate::backend::DeviceBackend;
use crate::command::{CommandOutput, CommandRunner};
use crate::error::{InitStep, TapError};
use crate::frame::{self, EthernetFrame, ETHER_HDR_LEN};

/// Default MTU: headroom over a standard 1500-byte payload for any
/// outer-tunnel overhead.
pub const DEFAULT_MTU: usize = 2800;

/// Default interface name prefix; candidates are probed as `vn0`, `vn1`, ...
pub const DEFAULT_NAME_PREFIX: &str = "vn";

/// Default upper bound on name-probe attempts.
const DEFAULT_NAME_PROBE_LIMIT: u32 = 256;

/// Default path of the address-configuration executable.
const DEFAULT_IP_COMMAND: &str = "/sbin/ip";

/// TAP device configuration.
#[derive(Debug, Clone)]
pub struct TapConfig {
    /// Interface name prefix; candidates are `{prefix}{index}`.
    pub name_prefix: String,
    /// Device MTU (payload bytes per frame).
    pub mtu: usize,
    /// Upper bound on name-probe attempts.
    pub name_probe_limit: u32,
    /// Path of the address-configuration executable.
    pub ip_command: String,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            mtu: DEFAULT_MTU,
            name_probe_limit: DEFAULT_NAME_PROBE_LIMIT,
            ip_command: DEFAULT_IP_COMMAND.to_string(),
        }
    }
}

impl TapConfig {
    /// Create a configuration with the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom MTU.
    #[must_use]
    pub fn with_mtu(mut self, mtu: usize) -> Self {
        self.mtu = mtu;
        self
    }

    /// Set a custom interface name prefix.
    #[must_use]
    pub fn with_name_prefix(mut self, prefix: &str) -> Self {
        self.name_prefix = prefix.to_string();
        self
    }

    /// Set the path of the address-configuration executable.
    #[must_use]
    pub fn with_ip_command(mut self, path: &str) -> Self {
        self.ip_command = path.to_string();
        self
    }
}

/// One TAP-backed virtual Ethernet interface.
///
/// Exclusively owns its backend handle and two independently allocated
/// staging buffers (transmit and receive, each MTU + 14 bytes). A single
/// caller drives the device at a time; nothing here is synchronized.
///
/// Construction runs the full configuration sequence and fails
/// atomically: on any step failure the handle is released before the
/// error surfaces, and no device value escapes.
pub struct TapDevice<B: DeviceBackend, C: CommandRunner> {
    backend: B,
    runner: C,
    config: TapConfig,
    handle: Option<B::Handle>,
    mac: MacAddress,
    name: String,
    mtu: usize,
    tx_buf: Vec<u8>,
    rx_buf: Vec<u8>,
    ips: Vec<InetAddress>,
}

fn init_err(step: InitStep) -> impl FnOnce(io::Error) -> TapError {
    move |source| TapError::Init { step, source }
}

/// Probes `{prefix}{index}` against OS-visible interfaces and returns the
/// first unused candidate.
fn allocate_name<B: DeviceBackend>(backend: &B, config: &TapConfig) -> Result<String, TapError> {
    for index in 0..config.name_probe_limit {
        let candidate = format!("{}{}", config.name_prefix, index);
        if !backend.name_taken(&candidate) {
            return Ok(candidate);
        }
    }
    Err(TapError::Init {
        step: InitStep::NameAllocation,
        source: io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!(
                "no unused interface name under prefix {:?} within {} probes",
                config.name_prefix, config.name_probe_limit
            ),
        ),
    })
}

impl<B: DeviceBackend, C: CommandRunner> TapDevice<B, C> {
    /// Creates and fully configures a TAP interface with `mac` assigned.
    pub fn create(
        mac: MacAddress,
        config: TapConfig,
        mut backend: B,
        runner: C,
    ) -> Result<Self, TapError> {
        let mut handle = backend.open().map_err(init_err(InitStep::ResourceOpen))?;

        let name = match Self::configure(&mut backend, &mut handle, mac, &config) {
            Ok(name) => name,
            Err(err) => {
                if let Err(close_err) = backend.close(handle) {
                    warn!(error = %close_err, "failed to release handle after init failure");
                }
                return Err(err);
            }
        };

        let buf_len = config.mtu + ETHER_HDR_LEN;
        let device = Self {
            backend,
            runner,
            handle: Some(handle),
            mac,
            name,
            mtu: config.mtu,
            tx_buf: vec![0; buf_len],
            rx_buf: vec![0; buf_len],
            ips: Vec::new(),
            config,
        };
        info!(name = %device.name, mac = %device.mac, mtu = device.mtu, "tap device created");
        Ok(device)
    }

    /// Steps 2-7 of the construction sequence; the caller releases the
    /// handle if any of them fails.
    fn configure(
        backend: &mut B,
        handle: &mut B::Handle,
        mac: MacAddress,
        config: &TapConfig,
    ) -> Result<String, TapError> {
        let requested = allocate_name(backend, config)?;
        let name = backend
            .configure_tap(handle, &requested)
            .map_err(init_err(InitStep::TapMode))?;
        backend
            .set_hardware_address(handle, mac)
            .map_err(init_err(InitStep::HardwareAddress))?;
        backend
            .set_mtu(handle, config.mtu)
            .map_err(init_err(InitStep::Mtu))?;
        backend
            .set_blocking(handle, true)
            .map_err(init_err(InitStep::Blocking))?;
        backend.set_up(handle).map_err(init_err(InitStep::InterfaceUp))?;
        debug!(requested = %requested, actual = %name, "tap interface configured");
        Ok(name)
    }

    /// The hardware address assigned at construction.
    #[must_use]
    pub fn mac(&self) -> MacAddress {
        self.mac
    }

    /// The interface name allocated at construction.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The device MTU (payload bytes per frame).
    #[must_use]
    pub fn mtu(&self) -> usize {
        self.mtu
    }

    /// The addresses this device believes are bound at the OS level.
    #[must_use]
    pub fn ips(&self) -> &[InetAddress] {
        &self.ips
    }

    /// True while the OS handle is held.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Releases the OS handle. Closing an already-closed device is a
    /// no-op.
    pub fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(err) = self.backend.close(handle) {
                warn!(name = %self.name, error = %err, "failed to close tap handle");
            } else {
                debug!(name = %self.name, "tap device closed");
            }
        }
    }

    /// Stages one Ethernet frame and writes it to the OS handle.
    ///
    /// The header carries `to`, `from` and big-endian `ethertype`;
    /// `payload` must fit the MTU. Oversized payloads and closed devices
    /// are reported errors, never silent drops.
    pub fn put(
        &mut self,
        from: MacAddress,
        to: MacAddress,
        ethertype: u16,
        payload: &[u8],
    ) -> Result<(), TapError> {
        let Some(handle) = self.handle.as_mut() else {
            return Err(TapError::DeviceClosed);
        };
        if payload.len() > self.mtu {
            return Err(TapError::FrameTooLarge {
                len: payload.len(),
                mtu: self.mtu,
            });
        }
        let len = frame::encode(&mut self.tx_buf, from, to, ethertype, payload);
        self.backend.write_frame(handle, &self.tx_buf[..len])?;
        Ok(())
    }

    /// Reads one frame from the OS handle.
    ///
    /// Returns `Ok(None)` when the read carried no payload (14 bytes or
    /// fewer): a valid empty result, not an error.
    pub fn get(&mut self) -> Result<Option<EthernetFrame<'_>>, TapError> {
        let Some(handle) = self.handle.as_mut() else {
            return Err(TapError::DeviceClosed);
        };
        let n = self.backend.read_frame(handle, &mut self.rx_buf)?;
        Ok(frame::decode(&self.rx_buf[..n]))
    }

    /// Binds `ip` to the interface via the external address command.
    ///
    /// Idempotent for an exact (address, port) match. A stale record with
    /// the same address bytes under a different port is removed first;
    /// that removal's outcome is deliberately ignored before the re-add.
    pub fn add_ip(&mut self, ip: InetAddress) -> Result<(), TapError> {
        if !ip.is_some() {
            return Err(TapError::InvalidAddress);
        }
        if self.ips.contains(&ip) {
            debug!(name = %self.name, ip = %ip, "address already bound");
            return Ok(());
        }

        if let Some(pos) = self.ips.iter().position(|bound| bound.same_ip(&ip)) {
            let stale = self.ips[pos];
            match self.run_addr("del", &stale.to_ip_text()) {
                Ok(out) if out.success => {
                    self.ips.remove(pos);
                }
                Ok(out) => {
                    warn!(
                        name = %self.name,
                        ip = %stale,
                        code = ?out.code,
                        "stale address removal failed, re-adding anyway"
                    );
                }
                Err(err) => {
                    warn!(
                        name = %self.name,
                        ip = %stale,
                        error = %err,
                        "stale address removal could not run, re-adding anyway"
                    );
                }
            }
        }

        let out = self.run_addr("add", &ip.to_text())?;
        if !out.success {
            return Err(TapError::Command {
                program: self.config.ip_command.clone(),
                action: "add",
                code: out.code,
                stderr: out.stderr,
            });
        }
        self.ips.push(ip);
        info!(name = %self.name, ip = %ip, "address bound");
        Ok(())
    }

    /// Unbinds `ip`; fails without running any command if it is not a
    /// member of the bound set.
    pub fn remove_ip(&mut self, ip: InetAddress) -> Result<(), TapError> {
        let Some(pos) = self.ips.iter().position(|bound| bound == &ip) else {
            return Err(TapError::NotBound);
        };
        let out = self.run_addr("del", &ip.to_ip_text())?;
        if !out.success {
            return Err(TapError::Command {
                program: self.config.ip_command.clone(),
                action: "del",
                code: out.code,
                stderr: out.stderr,
            });
        }
        self.ips.remove(pos);
        info!(name = %self.name, ip = %ip, "address unbound");
        Ok(())
    }

    fn run_addr(&mut self, action: &'static str, addr_text: &str) -> Result<CommandOutput, TapError> {
        let args = vec![
            "addr".to_string(),
            action.to_string(),
            addr_text.to_string(),
            "dev".to_string(),
            self.name.clone(),
        ];
        debug!(program = %self.config.ip_command, args = ?args, "running address command");
        Ok(self.runner.run(&self.config.ip_command, &args)?)
    }
}

impl<B: DeviceBackend, C: CommandRunner> fmt::Debug for TapDevice<B, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TapDevice")
            .field("name", &self.name)
            .field("mac", &self.mac)
            .field("mtu", &self.mtu)
            .field("open", &self.is_open())
            .field("ips", &self.ips)
            .finish_non_exhaustive()
    }
}

impl<B: DeviceBackend, C: CommandRunner> Drop for TapDevice<B, C> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(target_os = "linux")]
impl TapDevice<crate::backend::LinuxBackend, crate::command::SystemRunner> {
    /// Creates a device on the local host with the default configuration.
    pub fn open(mac: MacAddress) -> Result<Self, TapError> {
        Self::create(
            mac,
            TapConfig::default(),
            crate::backend::LinuxBackend::new(),
            crate::command::SystemRunner::new(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = TapConfig::new();
        assert_eq!(config.mtu, DEFAULT_MTU);
        assert_eq!(config.name_prefix, DEFAULT_NAME_PREFIX);
        assert_eq!(config.ip_command, "/sbin/ip");
    }

    #[test]
    fn config_builder() {
        let config = TapConfig::new()
            .with_mtu(1500)
            .with_name_prefix("vx")
            .with_ip_command("/usr/bin/ip");
        assert_eq!(config.mtu, 1500);
        assert_eq!(config.name_prefix, "vx");
        assert_eq!(config.ip_command, "/usr/bin/ip");
    }
}
