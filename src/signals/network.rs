//! Platform network-link readers
//!
//! The core only needs "is any non-loopback interface up". Linux reads
//! `/sys/class/net/*/operstate`; macOS parses `ifconfig -a` for an
//! active status line.

use super::NetworkSource;

/// The network source for the current platform
pub fn default_network_source() -> Box<dyn NetworkSource> {
    #[cfg(target_os = "linux")]
    {
        Box::new(SysfsNetwork)
    }
    #[cfg(target_os = "macos")]
    {
        Box::new(IfconfigNetwork)
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        Box::new(UnsupportedNetwork)
    }
}

/// `/sys/class/net/*/operstate` reader
#[cfg(target_os = "linux")]
struct SysfsNetwork;

#[cfg(target_os = "linux")]
impl NetworkSource for SysfsNetwork {
    fn any_interface_up(&self) -> anyhow::Result<bool> {
        for entry in std::fs::read_dir("/sys/class/net")?.flatten() {
            if entry.file_name() == "lo" {
                continue;
            }
            let operstate =
                std::fs::read_to_string(entry.path().join("operstate")).unwrap_or_default();
            if operstate.trim() == "up" {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// `ifconfig -a` reader
#[cfg(target_os = "macos")]
struct IfconfigNetwork;

#[cfg(target_os = "macos")]
impl NetworkSource for IfconfigNetwork {
    fn any_interface_up(&self) -> anyhow::Result<bool> {
        let output = std::process::Command::new("ifconfig").arg("-a").output()?;
        let text = String::from_utf8_lossy(&output.stdout);
        Ok(text
            .lines()
            .any(|line| line.trim() == "status: active"))
    }
}

/// Stub for platforms without a shipped reader
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
struct UnsupportedNetwork;

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
impl NetworkSource for UnsupportedNetwork {
    fn any_interface_up(&self) -> anyhow::Result<bool> {
        anyhow::bail!("no network link reader for this platform")
    }
}
