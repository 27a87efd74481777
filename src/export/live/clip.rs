use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;

use super::document::Element;
use super::ids::{IdAllocator, ID_ATTR};
use crate::export::ExportError;
use crate::model::{samples_to_beats, samples_to_seconds, AudioFileRecord};
use crate::paths;

/// Length given to clips whose source has no readable frame count.
const UNKNOWN_LENGTH_BEATS: f64 = 4.0;
const UNKNOWN_LENGTH_SECONDS: f64 = 2.0;

/// Where a clip sits and how long it runs, in beats and seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipTiming {
    pub start_beats: f64,
    pub duration_beats: f64,
    pub duration_seconds: f64,
}

impl ClipTiming {
    /// Positions are measured in the file's own sample rate; the project rate
    /// stands in when the header gave none.
    pub fn for_record(record: &AudioFileRecord, tempo: f64, project_rate: u32) -> Self {
        let rate = if record.sample_rate > 0 {
            record.sample_rate
        } else {
            project_rate
        };
        let start_beats = samples_to_beats(record.start_position_samples, tempo, rate);
        if record.frame_count == 0 || rate == 0 {
            return Self {
                start_beats,
                duration_beats: UNKNOWN_LENGTH_BEATS,
                duration_seconds: UNKNOWN_LENGTH_SECONDS,
            };
        }
        Self {
            start_beats,
            duration_beats: samples_to_beats(record.frame_count, tempo, rate),
            duration_seconds: samples_to_seconds(record.frame_count, rate),
        }
    }

    pub fn end_beats(&self) -> f64 {
        self.start_beats + self.duration_beats
    }
}

/// Where a clip's audio lives once the session is on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleLocation<'a> {
    /// Copied into `Samples/Imported` under this project folder.
    Imported(&'a Path),
    /// Left at the recording's own path.
    Source,
}

/// Build an arrangement `AudioClip` for one surviving recording.
///
/// The relative path is always `Samples/Imported/<file>`; the absolute
/// path follows `location`.
pub fn build_audio_clip(
    record: &AudioFileRecord,
    timing: &ClipTiming,
    ids: &mut IdAllocator,
    location: SampleLocation<'_>,
) -> Result<Element, ExportError> {
    let mut clip = Element::new("AudioClip")
        .attr_builder(ID_ATTR, ids.next()?)
        .attr_builder("Time", timing.start_beats);

    clip.push(Element::with_value("LomId", 0));
    clip.push(Element::with_value("CurrentStart", timing.start_beats));
    clip.push(Element::with_value("CurrentEnd", timing.end_beats()));
    clip.push(
        Element::new("Loop")
            .child_builder(Element::with_value("LoopStart", 0))
            .child_builder(Element::with_value("LoopEnd", timing.duration_beats))
            .child_builder(Element::with_value("StartRelative", 0))
            .child_builder(Element::with_value("LoopOn", false)),
    );
    clip.push(Element::with_value("Name", record.stem()));
    clip.push(Element::with_value("Color", 0));
    clip.push(Element::with_value("Disabled", false));
    clip.push(Element::with_value("IsWarped", true));
    clip.push(
        Element::new("Fades")
            .child_builder(Element::with_value("FadeInLength", 0))
            .child_builder(Element::with_value("FadeOutLength", 0))
            .child_builder(Element::with_value("IsDefaultFadeIn", true))
            .child_builder(Element::with_value("IsDefaultFadeOut", true)),
    );
    clip.push(
        Element::new("TimeSignature").child_builder(
            Element::new("TimeSignatures").child_builder(
                Element::new("RemoteableTimeSignature")
                    .attr_builder(ID_ATTR, ids.next()?)
                    .child_builder(Element::with_value("Numerator", 4))
                    .child_builder(Element::with_value("Denominator", 4))
                    .child_builder(Element::with_value("Time", 0)),
            ),
        ),
    );
    clip.push(warp_markers(timing, ids)?);
    clip.push(Element::with_value("WarpMode", 0));
    clip.push(sample_ref(record, location));
    clip.push(Element::new("Envelopes").child_builder(Element::new("Envelopes")));
    Ok(clip)
}

/// Anchors at content start and content end so the clip plays at its
/// recorded length.
fn warp_markers(timing: &ClipTiming, ids: &mut IdAllocator) -> Result<Element, ExportError> {
    let marker = |id: u64, secs: f64, beats: f64| {
        Element::new("WarpMarker")
            .attr_builder(ID_ATTR, id)
            .attr_builder("SecTime", secs)
            .attr_builder("BeatTime", beats)
    };
    let start = marker(ids.next()?, 0.0, 0.0);
    let end = marker(ids.next()?, timing.duration_seconds, timing.duration_beats);
    Ok(Element::new("WarpMarkers")
        .child_builder(start)
        .child_builder(end))
}

fn sample_ref(record: &AudioFileRecord, location: SampleLocation<'_>) -> Element {
    let relative = paths::imported_sample_relative(&record.filename);
    let absolute = match location {
        SampleLocation::Imported(dir) => {
            slash_path(&paths::imported_samples_dir(dir).join(&record.filename))
        }
        SampleLocation::Source => slash_path(&record.file_path),
    };
    let metadata = fs::metadata(&record.file_path).ok();
    let size = metadata.as_ref().map_or(0, fs::Metadata::len);

    let file_ref = Element::new("FileRef")
        .child_builder(Element::with_value("RelativePathType", 1))
        .child_builder(Element::with_value("RelativePath", relative))
        .child_builder(Element::with_value("Path", absolute))
        .child_builder(Element::with_value("Type", 1))
        .child_builder(Element::with_value("LivePackName", ""))
        .child_builder(Element::with_value("LivePackId", ""))
        .child_builder(Element::with_value("OriginalFileSize", size))
        .child_builder(Element::with_value("OriginalCrc", 0));

    let mut sample_ref = Element::new("SampleRef").child_builder(file_ref);
    let modified = metadata
        .and_then(|m| m.modified().ok())
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok());
    if let Some(since_epoch) = modified {
        sample_ref.push(Element::with_value("LastModDate", since_epoch.as_secs()));
    }
    sample_ref.push(Element::new("SourceContext"));
    sample_ref.push(Element::with_value("SampleUsageHint", 0));
    sample_ref.push(Element::with_value("DefaultDuration", record.frame_count));
    sample_ref.push(Element::with_value("DefaultSampleRate", record.sample_rate));
    sample_ref
}

/// Live stores paths with forward slashes on every platform.
fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::testing::audio_record;

    fn record(start: u64, frames: u64, rate: u32) -> AudioFileRecord {
        let mut r = audio_record("KICK IN#02.wav", PathBuf::from("/nowhere/KICK IN#02.wav"));
        r.start_position_samples = start;
        r.frame_count = frames;
        r.sample_rate = rate;
        r
    }

    #[test]
    fn timing_uses_the_file_rate() {
        let t = ClipTiming::for_record(&record(96_000, 48_000, 48_000), 120.0, 44_100);
        assert!((t.start_beats - 4.0).abs() < 1e-9);
        assert!((t.duration_beats - 2.0).abs() < 1e-9);
        assert!((t.duration_seconds - 1.0).abs() < 1e-9);
        assert!((t.end_beats() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_length_gets_placeholder() {
        let t = ClipTiming::for_record(&record(0, 0, 44_100), 90.0, 44_100);
        assert_eq!(t.start_beats, 0.0);
        assert_eq!(t.duration_beats, UNKNOWN_LENGTH_BEATS);
        assert_eq!(t.duration_seconds, UNKNOWN_LENGTH_SECONDS);
    }

    #[test]
    fn missing_file_rate_falls_back_to_project_rate() {
        let t = ClipTiming::for_record(&record(44_100, 44_100, 0), 60.0, 44_100);
        assert!((t.start_beats - 1.0).abs() < 1e-9);
        assert!((t.duration_seconds - 1.0).abs() < 1e-9);
    }

    #[test]
    fn clip_layout() {
        let r = record(88_200, 44_100, 44_100);
        let timing = ClipTiming::for_record(&r, 120.0, 44_100);
        let mut ids = IdAllocator::starting_at(700);
        let clip = build_audio_clip(
            &r,
            &timing,
            &mut ids,
            SampleLocation::Imported(Path::new("/out/Song Project")),
        )
        .unwrap();

        assert_eq!(clip.attr("Id"), Some("700"));
        assert_eq!(clip.attr("Time"), Some("4"));
        assert_eq!(clip.value_of("CurrentStart"), Some("4"));
        assert_eq!(clip.value_of("CurrentEnd"), Some("6"));
        assert_eq!(clip.value_of("Loop/LoopEnd"), Some("2"));
        assert_eq!(clip.value_of("Loop/LoopOn"), Some("false"));
        assert_eq!(clip.value_of("Name"), Some("KICK IN#02"));
        assert_eq!(clip.value_of("Fades/IsDefaultFadeIn"), Some("true"));

        let markers = &clip.find("WarpMarkers").unwrap().children;
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].attr("SecTime"), Some("0"));
        assert_eq!(markers[1].attr("SecTime"), Some("1"));
        assert_eq!(markers[1].attr("BeatTime"), Some("2"));

        let file_ref = clip.find("SampleRef/FileRef").unwrap();
        assert_eq!(file_ref.value_of("RelativePath"), Some("Samples/Imported/KICK IN#02.wav"));
        assert_eq!(
            file_ref.value_of("Path"),
            Some("/out/Song Project/Samples/Imported/KICK IN#02.wav")
        );
        assert_eq!(file_ref.value_of("OriginalFileSize"), Some("0"));
        assert_eq!(clip.value_of("SampleRef/DefaultDuration"), Some("44100"));
        assert_eq!(clip.value_of("SampleRef/DefaultSampleRate"), Some("44100"));
        assert!(clip.find("SampleRef/LastModDate").is_none());
        assert_eq!(ids.current(), 704);
    }

    #[test]
    fn real_files_report_size_and_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.wav");
        fs::write(&path, [0u8; 64]).unwrap();
        let mut r = audio_record("a.wav", path.clone());
        r.frame_count = 10;
        r.sample_rate = 44_100;
        let timing = ClipTiming::for_record(&r, 120.0, 44_100);
        let clip = build_audio_clip(
            &r,
            &timing,
            &mut IdAllocator::starting_at(1),
            SampleLocation::Source,
        )
        .unwrap();
        assert_eq!(clip.value_of("SampleRef/FileRef/OriginalFileSize"), Some("64"));
        let written = clip.value_of("SampleRef/FileRef/Path").unwrap();
        assert_eq!(written, slash_path(&path));
        assert!(Path::new(written).is_file());
        assert_eq!(
            clip.value_of("SampleRef/FileRef/RelativePath"),
            Some("Samples/Imported/a.wav")
        );
        assert!(clip.find("SampleRef/LastModDate").is_some());
    }
}
