//! Sensor configuration surface.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Externally supplied configuration for the sensor core.
///
/// Durations are configured in whole seconds for readability in config
/// files; accessors return [`Duration`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SensorConfig {
    /// Ordered device filter patterns, matched against the hex encoding of
    /// every vendor message in an advert. Order is significant: first match
    /// wins. Patterns anchor with an explicit `^` where needed.
    pub feature_patterns: Vec<String>,

    /// Only identities observed within this window are eligible for sharing
    /// with a peer. Zero disables sharing entirely.
    pub payload_sharing_expiry_secs: u64,

    /// Advertisers refresh their broadcast on roughly this interval; a
    /// record created within the window may inherit the identity payload of
    /// its same-pseudo-address predecessors.
    pub advert_refresh_secs: u64,

    /// Hard cap on identity-sharing bundle size in bytes, kept below the
    /// channel's practical transfer limit.
    pub max_transfer_bytes: usize,

    /// Vendor id under which the sensor broadcasts its pseudo address.
    pub sensor_vendor_id: u16,

    /// Records not updated within this window are removed by the
    /// maintenance sweep.
    pub device_expiry_secs: u64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            feature_patterns: default_feature_patterns(),
            // Sharing ships disabled; operators opt in with a window.
            payload_sharing_expiry_secs: 0,
            advert_refresh_secs: 15 * 60,
            max_transfer_bytes: 510,
            sensor_vendor_id: 65530,
            device_expiry_secs: 15 * 60,
        }
    }
}

impl SensorConfig {
    /// Config suitable for testing: sharing enabled, short expiry windows.
    pub fn for_testing() -> Self {
        Self {
            payload_sharing_expiry_secs: 5 * 60,
            device_expiry_secs: 60,
            ..Self::default()
        }
    }

    pub fn payload_sharing_expiry(&self) -> Duration {
        Duration::from_secs(self.payload_sharing_expiry_secs)
    }

    pub fn advert_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.advert_refresh_secs)
    }

    pub fn device_expiry(&self) -> Duration {
        Duration::from_secs(self.device_expiry_secs)
    }
}

/// The shipped device filter pattern list.
///
/// Tuned against real captures; kept byte-compatible with the vendor
/// sub-segment extraction quirks (see the advert-filter crate), including
/// the `^0100…` entry that exists only because of the legacy
/// whole-remainder encoding.
pub fn default_feature_patterns() -> Vec<String> {
    [
        "^10....04",
        "^10....14",
        "^0100000000000000000000000000000000",
        "^05",
        "^07",
        "^09",
        "^00",
        "^08",
        "^03",
        "^06",
        "^0C",
        "^0D",
        "^0F",
        "^0E",
        "^0B",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Errors loading the sensor configuration from a file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
