//! Platform volume/mute readers
//!
//! macOS queries AppleScript volume settings through `osascript`; Linux
//! parses `amixer get Master`. A missing tool surfaces as an unavailable
//! reading, never as a crash. Windows has no shipped mixer backend and
//! reads as unavailable; a COM backend would scope its per-thread setup
//! through `attach`/`detach`.

use super::{VolumeReading, VolumeSource};

/// The volume source for the current platform
pub fn default_volume_source() -> Box<dyn VolumeSource> {
    #[cfg(target_os = "linux")]
    {
        Box::new(AmixerVolume)
    }
    #[cfg(target_os = "macos")]
    {
        Box::new(OsascriptVolume)
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        Box::new(UnavailableVolume)
    }
}

/// `amixer get Master` reader
#[cfg(target_os = "linux")]
struct AmixerVolume;

#[cfg(target_os = "linux")]
impl VolumeSource for AmixerVolume {
    fn read(&self) -> anyhow::Result<VolumeReading> {
        let output = match std::process::Command::new("amixer")
            .args(["get", "Master"])
            .output()
        {
            Ok(output) => output,
            // amixer not installed: unavailable, not a failure.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(VolumeReading::default())
            }
            Err(e) => return Err(e.into()),
        };
        Ok(parse_amixer(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Extract `[NN%]` and `[on]`/`[off]` from amixer's Master output
#[cfg(target_os = "linux")]
fn parse_amixer(text: &str) -> VolumeReading {
    let Some(line) = text.lines().find(|line| line.contains('%')) else {
        return VolumeReading::default();
    };

    let volume = line
        .split('[')
        .nth(1)
        .and_then(|rest| rest.split('%').next())
        .and_then(|digits| digits.parse::<u8>().ok())
        .map(|v| v.min(100));
    let muted = Some(line.to_lowercase().contains("[off]"));

    VolumeReading { volume, muted }
}

/// AppleScript volume settings reader
#[cfg(target_os = "macos")]
struct OsascriptVolume;

#[cfg(target_os = "macos")]
impl VolumeSource for OsascriptVolume {
    fn read(&self) -> anyhow::Result<VolumeReading> {
        let volume = osascript("output volume of (get volume settings)")?
            .and_then(|s| s.parse::<u8>().ok())
            .map(|v| v.min(100));
        let muted = osascript("output muted of (get volume settings)")?
            .map(|s| s.to_lowercase() == "true");
        Ok(VolumeReading { volume, muted })
    }
}

/// Run one AppleScript expression, returning its trimmed stdout
#[cfg(target_os = "macos")]
fn osascript(expr: &str) -> anyhow::Result<Option<String>> {
    let output = match std::process::Command::new("osascript")
        .args(["-e", expr])
        .output()
    {
        Ok(output) => output,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(if text.is_empty() { None } else { Some(text) })
}

/// Stub for platforms without a shipped mixer backend
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
struct UnavailableVolume;

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
impl VolumeSource for UnavailableVolume {
    fn read(&self) -> anyhow::Result<VolumeReading> {
        Ok(VolumeReading::default())
    }
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;

    const AMIXER_OUTPUT: &str = "\
Simple mixer control 'Master',0
  Capabilities: pvolume pswitch
  Playback channels: Front Left - Front Right
  Limits: Playback 0 - 65536
  Front Left: Playback 37683 [57%] [on]
  Front Right: Playback 37683 [57%] [on]";

    #[test]
    fn test_parse_amixer_volume_and_mute() {
        let reading = parse_amixer(AMIXER_OUTPUT);
        assert_eq!(reading.volume, Some(57));
        assert_eq!(reading.muted, Some(false));
    }

    #[test]
    fn test_parse_amixer_muted() {
        let muted = AMIXER_OUTPUT.replace("[on]", "[off]");
        assert_eq!(parse_amixer(&muted).muted, Some(true));
    }

    #[test]
    fn test_parse_amixer_garbage_is_unavailable() {
        assert_eq!(parse_amixer("no such control"), VolumeReading::default());
    }
}
