//! Plugin identification and replacement suggestions.

pub mod catalog;
pub mod matcher;
pub mod scanner;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use catalog::{lookup_au_plugin, PluginInfo};
pub use matcher::{match_plugins, PluginMatch};
pub use scanner::{categorize, scan_vst3_plugins, Vst3Plugin};

/// Broad effect family used to pair source plugins with installed ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginCategory {
    Eq,
    Compressor,
    Limiter,
    DeEsser,
    Gate,
    Reverb,
    Delay,
    Saturation,
    Modulation,
    ChannelStrip,
    MultiFx,
    Synth,
    Utility,
    NoiseReduction,
    Unknown,
}

impl fmt::Display for PluginCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = crate::util::serde_variant_name(self).unwrap_or_default();
        f.write_str(&name)
    }
}
