use serde::{Deserialize, Serialize};

/// Quietest linear fader value the target mixer accepts (-70 dB).
pub const MIN_FADER_LINEAR: f64 = 0.000_316_227_757_1;
/// Loudest linear fader value the target mixer accepts (+6 dB).
pub const MAX_FADER_LINEAR: f64 = 1.995_262_38;

/// Per-track fader, pan and switch state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackMixerState {
    pub volume_db: f64,
    /// -1.0 = hard left, 1.0 = hard right.
    pub pan: f64,
    pub is_muted: bool,
    pub is_soloed: bool,
}

impl TrackMixerState {
    /// Fader position in the target's linear domain: `10^(dB/20)`, clamped.
    #[must_use]
    pub fn volume_linear(&self) -> f64 {
        10f64
            .powf(self.volume_db / 20.0)
            .clamp(MIN_FADER_LINEAR, MAX_FADER_LINEAR)
    }

    #[must_use]
    pub fn clamped_pan(&self) -> f64 {
        self.pan.clamp(-1.0, 1.0)
    }
}
