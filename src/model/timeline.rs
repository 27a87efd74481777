//! Sample-domain timeline math shared by the importer and the session writer.

/// The source workstation starts its project timeline at 01:00:00:00 SMPTE,
/// so embedded recording positions are one hour ahead of bar 1.
pub const SMPTE_OFFSET_SECONDS: u64 = 3600;

/// Project-relative start of a recording, given the absolute timeline
/// position of its first content frame and the file's own sample rate.
///
/// The offset is expressed at the file's native rate because files recorded
/// side by side may differ in rate. Positions before bar 1 clamp to zero.
#[must_use]
pub fn resolve_start_position(timeline_origin: u64, file_sample_rate: u32) -> u64 {
    let offset = SMPTE_OFFSET_SECONDS * u64::from(file_sample_rate);
    timeline_origin.saturating_sub(offset)
}

/// `beats = samples * tempo / (sample_rate * 60)`.
///
/// A zero sample rate yields zero rather than infinity.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn samples_to_beats(samples: u64, tempo_bpm: f64, sample_rate: u32) -> f64 {
    if sample_rate == 0 {
        return 0.0;
    }
    samples as f64 * tempo_bpm / (f64::from(sample_rate) * 60.0)
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn samples_to_seconds(samples: u64, sample_rate: u32) -> f64 {
    if sample_rate == 0 {
        return 0.0;
    }
    samples as f64 / f64::from(sample_rate)
}
