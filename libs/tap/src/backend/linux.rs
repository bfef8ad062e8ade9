//! Linux TAP backend: `/dev/net/tun` plus the classic `ifreq` ioctls.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::fd::AsRawFd;
use std::path::Path;

use vnet_addr::MacAddress;

use super::DeviceBackend;

/// Clone device for TAP/TUN interfaces.
const TUN_PATH: &str = "/dev/net/tun";

/// Handle to one open TAP interface.
///
/// Holds the frame file descriptor and the OS-assigned interface name;
/// dropping it closes the descriptor, which tears the interface down
/// (persistence is cleared at configuration time).
pub struct LinuxTapHandle {
    file: File,
    name: String,
}

/// TAP backend for Linux hosts.
///
/// Interface existence is probed through sysfs; TAP-mode configuration
/// goes through `TUNSETIFF` on the clone device, and the remaining
/// interface settings through `SIOCSIF*` ioctls on a throwaway AF_INET
/// datagram socket.
#[derive(Debug, Default)]
pub struct LinuxBackend;

impl LinuxBackend {
    pub fn new() -> Self {
        Self
    }
}

fn check(ret: libc::c_int) -> io::Result<()> {
    if ret < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

/// Zeroed `ifreq` with the interface name filled in.
fn ifreq_for(name: &str) -> io::Result<libc::ifreq> {
    // leave room for the trailing NUL
    if name.len() >= libc::IFNAMSIZ {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("interface name too long: {name}"),
        ));
    }
    let mut ifr: libc::ifreq = unsafe { std::mem::zeroed() };
    for (dst, src) in ifr.ifr_name.iter_mut().zip(name.as_bytes()) {
        *dst = *src as libc::c_char;
    }
    Ok(ifr)
}

fn ifr_name_to_string(ifr: &libc::ifreq) -> String {
    let bytes: Vec<u8> = ifr
        .ifr_name
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Throwaway AF_INET datagram socket for interface configuration ioctls.
struct CtlSocket(libc::c_int);

impl CtlSocket {
    fn open() -> io::Result<Self> {
        let fd = unsafe { libc::socket(libc::AF_INET, libc::SOCK_DGRAM, 0) };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self(fd))
    }

    fn ioctl(&self, request: libc::c_ulong, ifr: &mut libc::ifreq) -> io::Result<()> {
        check(unsafe { libc::ioctl(self.0, request as _, ifr) })
    }
}

impl Drop for CtlSocket {
    fn drop(&mut self) {
        unsafe { libc::close(self.0) };
    }
}

impl DeviceBackend for LinuxBackend {
    type Handle = LinuxTapHandle;

    fn open(&mut self) -> io::Result<LinuxTapHandle> {
        let file = OpenOptions::new().read(true).write(true).open(TUN_PATH)?;
        Ok(LinuxTapHandle {
            file,
            name: String::new(),
        })
    }

    fn name_taken(&self, name: &str) -> bool {
        Path::new("/sys/class/net").join(name).exists()
    }

    fn configure_tap(&mut self, handle: &mut LinuxTapHandle, name: &str) -> io::Result<String> {
        let fd = handle.file.as_raw_fd();
        let mut ifr = ifreq_for(name)?;
        ifr.ifr_ifru.ifru_flags = (libc::IFF_TAP | libc::IFF_NO_PI) as libc::c_short;
        check(unsafe { libc::ioctl(fd, libc::TUNSETIFF as _, &mut ifr) })?;
        // the interface must die with the descriptor
        check(unsafe { libc::ioctl(fd, libc::TUNSETPERSIST as _, 0) })?;
        handle.name = ifr_name_to_string(&ifr);
        Ok(handle.name.clone())
    }

    fn set_hardware_address(
        &mut self,
        handle: &mut LinuxTapHandle,
        mac: MacAddress,
    ) -> io::Result<()> {
        let sock = CtlSocket::open()?;
        let mut ifr = ifreq_for(&handle.name)?;
        unsafe {
            ifr.ifr_ifru.ifru_hwaddr.sa_family = libc::ARPHRD_ETHER as libc::sa_family_t;
            for (dst, src) in ifr.ifr_ifru.ifru_hwaddr.sa_data.iter_mut().zip(mac.octets()) {
                *dst = src as libc::c_char;
            }
        }
        sock.ioctl(libc::SIOCSIFHWADDR as libc::c_ulong, &mut ifr)
    }

    fn set_mtu(&mut self, handle: &mut LinuxTapHandle, mtu: usize) -> io::Result<()> {
        let sock = CtlSocket::open()?;
        let mut ifr = ifreq_for(&handle.name)?;
        ifr.ifr_ifru.ifru_mtu = mtu as libc::c_int;
        sock.ioctl(libc::SIOCSIFMTU as libc::c_ulong, &mut ifr)
    }

    fn set_blocking(&mut self, handle: &mut LinuxTapHandle, blocking: bool) -> io::Result<()> {
        let fd = handle.file.as_raw_fd();
        let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
        if flags < 0 {
            return Err(io::Error::last_os_error());
        }
        let flags = if blocking {
            flags & !libc::O_NONBLOCK
        } else {
            flags | libc::O_NONBLOCK
        };
        check(unsafe { libc::fcntl(fd, libc::F_SETFL, flags) })
    }

    fn set_up(&mut self, handle: &mut LinuxTapHandle) -> io::Result<()> {
        let sock = CtlSocket::open()?;
        let mut ifr = ifreq_for(&handle.name)?;
        sock.ioctl(libc::SIOCGIFFLAGS as libc::c_ulong, &mut ifr)?;
        unsafe {
            ifr.ifr_ifru.ifru_flags |= libc::IFF_UP as libc::c_short;
        }
        sock.ioctl(libc::SIOCSIFFLAGS as libc::c_ulong, &mut ifr)
    }

    fn write_frame(&mut self, handle: &mut LinuxTapHandle, frame: &[u8]) -> io::Result<usize> {
        handle.file.write(frame)
    }

    fn read_frame(&mut self, handle: &mut LinuxTapHandle, buf: &mut [u8]) -> io::Result<usize> {
        handle.file.read(buf)
    }

    fn close(&mut self, handle: LinuxTapHandle) -> io::Result<()> {
        drop(handle);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ifreq_carries_name() {
        let ifr = ifreq_for("vn0").unwrap();
        assert_eq!(ifr_name_to_string(&ifr), "vn0");
    }

    #[test]
    fn overlong_name_is_rejected() {
        let err = ifreq_for("this-name-is-way-too-long-for-ifnamsiz").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn name_at_limit_is_rejected_for_nul() {
        // IFNAMSIZ includes the terminator, so 16 visible chars do not fit
        assert!(ifreq_for("0123456789abcdef").is_err());
        assert!(ifreq_for("0123456789abcde").is_ok());
    }
}
