//! Conversion options
//!
//! The knobs a caller can override when converting, serde-derived with
//! per-field defaults, scoped to what a single buffered conversion needs.
//! There is no persisted settings file for this tool.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

fn default_vendor() -> String {
    "opuscaf".to_string()
}

fn default_repackage_granule() -> bool {
    true
}

/// Options threaded through both conversion directions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Ogg stream serial number. `None` resolves to a wall-clock-derived
    /// value at conversion time (production default); tests should always
    /// inject `Some` for byte-for-byte determinism.
    #[serde(default)]
    pub serial: Option<u32>,

    /// `OpusTags` vendor string written on CAF→Ogg conversion. Tests must
    /// not depend on its exact contents.
    #[serde(default = "default_vendor")]
    pub vendor: String,

    /// Granule-advance mode for CAF→Ogg. `true` advances
    /// by `frame_size` directly; `false` rescales to 48kHz samples.
    #[serde(default = "default_repackage_granule")]
    pub repackage_granule: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            serial: None,
            vendor: default_vendor(),
            repackage_granule: default_repackage_granule(),
        }
    }
}

impl ConvertOptions {
    /// Resolve the Ogg serial to use: the injected value if present,
    /// otherwise a wall-clock-ms-derived value truncated to 32 bits.
    pub fn resolve_serial(&self) -> u32 {
        self.serial.unwrap_or_else(|| {
            let nanos = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos();
            (nanos & 0xFFFF_FFFF) as u32
        })
    }
}
