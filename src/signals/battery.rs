//! Platform battery readers
//!
//! Linux reads `/sys/class/power_supply`; macOS parses `pmset -g batt`.
//! A machine without a battery reads as unavailable (`Ok(None)`), never
//! as an error.

use super::{BatteryReading, BatterySource};

/// The battery source for the current platform
pub fn default_battery_source() -> Box<dyn BatterySource> {
    #[cfg(target_os = "linux")]
    {
        Box::new(SysfsBattery)
    }
    #[cfg(target_os = "macos")]
    {
        Box::new(PmsetBattery)
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        Box::new(UnavailableBattery)
    }
}

/// `/sys/class/power_supply/BAT*` reader
#[cfg(target_os = "linux")]
struct SysfsBattery;

#[cfg(target_os = "linux")]
impl BatterySource for SysfsBattery {
    fn read(&self) -> anyhow::Result<Option<BatteryReading>> {
        let entries = match std::fs::read_dir("/sys/class/power_supply") {
            Ok(entries) => entries,
            // No power_supply class at all: no battery, not a failure.
            Err(_) => return Ok(None),
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let supply_type = std::fs::read_to_string(path.join("type")).unwrap_or_default();
            if supply_type.trim() != "Battery" {
                continue;
            }

            let capacity = std::fs::read_to_string(path.join("capacity"))?;
            let percent: u8 = capacity.trim().parse()?;
            let status = std::fs::read_to_string(path.join("status")).unwrap_or_default();
            let plugged = status.trim() != "Discharging";

            return Ok(Some(BatteryReading {
                percent: percent.min(100),
                plugged,
            }));
        }
        Ok(None)
    }
}

/// `pmset -g batt` reader
#[cfg(target_os = "macos")]
struct PmsetBattery;

#[cfg(target_os = "macos")]
impl BatterySource for PmsetBattery {
    fn read(&self) -> anyhow::Result<Option<BatteryReading>> {
        let output = std::process::Command::new("pmset")
            .args(["-g", "batt"])
            .output()?;
        let text = String::from_utf8_lossy(&output.stdout);

        let Some(percent) = text
            .split_whitespace()
            .find_map(|word| word.strip_suffix("%;").or_else(|| word.strip_suffix('%')))
            .and_then(|digits| digits.parse::<u8>().ok())
        else {
            // Desktops report no battery line.
            return Ok(None);
        };

        let plugged = text.contains("'AC Power'");
        Ok(Some(BatteryReading {
            percent: percent.min(100),
            plugged,
        }))
    }
}

/// Stub for platforms without a shipped reader
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
struct UnavailableBattery;

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
impl BatterySource for UnavailableBattery {
    fn read(&self) -> anyhow::Result<Option<BatteryReading>> {
        Ok(None)
    }
}
