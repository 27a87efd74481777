//! Fixture builders shared by the unit tests: synthetic audio headers,
//! `.logicx` bundles, embedded plugin plists and a small session template.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::fs;
use std::path::{Path, PathBuf};

use plist::{Dictionary, Integer, Value};

use crate::export::live::LiveDocument;
use crate::import::logic::filename::classify;
use crate::model::{collect_track_names, AudioFileRecord, PluginInstance, ProjectModel};
use crate::paths;

/// Payload of the odd-sized chunk placed before the format chunk.
const ODD_PAYLOAD: &[u8] = b"odd";

fn push_chunk_le(out: &mut Vec<u8>, id: &[u8; 4], payload: &[u8], pad: bool) {
    out.extend_from_slice(id);
    out.extend_from_slice(&u32::try_from(payload.len()).unwrap().to_le_bytes());
    out.extend_from_slice(payload);
    if pad && payload.len() % 2 == 1 {
        out.push(0);
    }
}

fn push_chunk_be(out: &mut Vec<u8>, id: &[u8; 4], payload: &[u8], pad: bool) {
    out.extend_from_slice(id);
    out.extend_from_slice(&u32::try_from(payload.len()).unwrap().to_be_bytes());
    out.extend_from_slice(payload);
    if pad && payload.len() % 2 == 1 {
        out.push(0);
    }
}

// ── WAV ─────────────────────────────────────────────────────────────

/// 16-bit PCM RIFF/WAVE bytes with silent sample data.
pub(crate) struct WavSpec {
    sample_rate: u32,
    frames: u64,
    channels: u16,
    time_reference: Option<u64>,
    raw_bext: Option<Vec<u8>>,
    leading_odd_chunk: Option<bool>,
}

impl WavSpec {
    pub fn new(sample_rate: u32, frames: u64) -> Self {
        Self {
            sample_rate,
            frames,
            channels: 1,
            time_reference: None,
            raw_bext: None,
            leading_odd_chunk: None,
        }
    }

    pub fn channels(mut self, channels: u16) -> Self {
        self.channels = channels;
        self
    }

    /// Add a broadcast-wave `bext` chunk carrying this time reference.
    pub fn time_reference(mut self, samples: u64) -> Self {
        self.time_reference = Some(samples);
        self
    }

    /// Add a `bext` chunk with exactly this payload.
    pub fn raw_bext(mut self, payload: Vec<u8>) -> Self {
        self.raw_bext = Some(payload);
        self
    }

    /// Put an odd-sized chunk before `fmt `, with or without its pad byte.
    pub fn leading_odd_chunk(mut self, padded: bool) -> Self {
        self.leading_odd_chunk = Some(padded);
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let block_align = self.channels * 2;
        let mut body = b"WAVE".to_vec();

        if let Some(padded) = self.leading_odd_chunk {
            push_chunk_le(&mut body, b"LIST", ODD_PAYLOAD, padded);
        }

        let mut fmt = Vec::with_capacity(16);
        fmt.extend_from_slice(&1u16.to_le_bytes());
        fmt.extend_from_slice(&self.channels.to_le_bytes());
        fmt.extend_from_slice(&self.sample_rate.to_le_bytes());
        fmt.extend_from_slice(&(self.sample_rate * u32::from(block_align)).to_le_bytes());
        fmt.extend_from_slice(&block_align.to_le_bytes());
        fmt.extend_from_slice(&16u16.to_le_bytes());
        push_chunk_le(&mut body, b"fmt ", &fmt, true);

        if let Some(reference) = self.time_reference {
            let mut bext = vec![0u8; 602];
            bext[338..346].copy_from_slice(&reference.to_le_bytes());
            bext[346..348].copy_from_slice(&1u16.to_le_bytes());
            push_chunk_le(&mut body, b"bext", &bext, true);
        } else if let Some(raw) = &self.raw_bext {
            push_chunk_le(&mut body, b"bext", raw, true);
        }

        let data_len = usize::try_from(self.frames * u64::from(block_align)).unwrap();
        push_chunk_le(&mut body, b"data", &vec![0u8; data_len], true);

        let mut out = b"RIFF".to_vec();
        out.extend_from_slice(&u32::try_from(body.len()).unwrap().to_le_bytes());
        out.extend_from_slice(&body);
        out
    }
}

// ── AIFF ────────────────────────────────────────────────────────────

/// Encode an integer sample rate as an 80-bit extended float.
pub(crate) fn encode_extended_rate(rate: u32) -> [u8; 10] {
    let mut out = [0u8; 10];
    if rate == 0 {
        return out;
    }
    let value = u64::from(rate);
    let msb = 63 - value.leading_zeros();
    let exponent = u16::try_from(16_383 + msb).unwrap();
    let mantissa = value << (63 - msb);
    out[..2].copy_from_slice(&exponent.to_be_bytes());
    out[2..].copy_from_slice(&mantissa.to_be_bytes());
    out
}

/// 16-bit mono FORM/AIFF (or AIFC) bytes with optional markers.
pub(crate) struct AiffSpec {
    sample_rate: u32,
    frames: u32,
    aifc: bool,
    markers: Vec<(u16, u32, String)>,
    leading_odd_chunk: Option<bool>,
}

impl AiffSpec {
    pub fn new(sample_rate: u32, frames: u32) -> Self {
        Self {
            sample_rate,
            frames,
            aifc: false,
            markers: Vec::new(),
            leading_odd_chunk: None,
        }
    }

    pub fn marker(mut self, id: u16, position: u32, name: &str) -> Self {
        self.markers.push((id, position, name.to_string()));
        self
    }

    pub fn aifc(mut self) -> Self {
        self.aifc = true;
        self
    }

    /// Put an odd-sized chunk before `COMM`, with or without its pad byte.
    pub fn leading_odd_chunk(mut self, padded: bool) -> Self {
        self.leading_odd_chunk = Some(padded);
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut body = if self.aifc { b"AIFC".to_vec() } else { b"AIFF".to_vec() };

        if let Some(padded) = self.leading_odd_chunk {
            push_chunk_be(&mut body, b"ANNO", ODD_PAYLOAD, padded);
        }

        let mut comm = Vec::new();
        comm.extend_from_slice(&1u16.to_be_bytes());
        comm.extend_from_slice(&self.frames.to_be_bytes());
        comm.extend_from_slice(&16u16.to_be_bytes());
        comm.extend_from_slice(&encode_extended_rate(self.sample_rate));
        if self.aifc {
            comm.extend_from_slice(b"NONE");
            push_pstring(&mut comm, "not compressed");
        }
        push_chunk_be(&mut body, b"COMM", &comm, true);

        if !self.markers.is_empty() {
            let mut mark = Vec::new();
            mark.extend_from_slice(&u16::try_from(self.markers.len()).unwrap().to_be_bytes());
            for (id, position, name) in &self.markers {
                mark.extend_from_slice(&id.to_be_bytes());
                mark.extend_from_slice(&position.to_be_bytes());
                push_pstring(&mut mark, name);
            }
            push_chunk_be(&mut body, b"MARK", &mark, true);
        }

        let mut ssnd = vec![0u8; 8];
        ssnd.resize(8 + usize::try_from(self.frames).unwrap() * 2, 0);
        push_chunk_be(&mut body, b"SSND", &ssnd, true);

        let mut out = b"FORM".to_vec();
        out.extend_from_slice(&u32::try_from(body.len()).unwrap().to_be_bytes());
        out.extend_from_slice(&body);
        out
    }
}

/// Length byte plus text, padded so the pair has even length.
fn push_pstring(out: &mut Vec<u8>, text: &str) {
    out.push(u8::try_from(text.len()).unwrap());
    out.extend_from_slice(text.as_bytes());
    if text.len() % 2 == 0 {
        out.push(0);
    }
}

// ── Plugins ─────────────────────────────────────────────────────────

fn fourcc(code: &[u8; 4]) -> u32 {
    u32::from_be_bytes(*code)
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// An XML plugin property list as the host embeds it in `ProjectData`.
pub(crate) fn plugin_plist(
    name: &str,
    au_type: &[u8; 4],
    subtype: &[u8; 4],
    manufacturer: &[u8; 4],
    waves: bool,
) -> Vec<u8> {
    let waves_key = if waves {
        "\t<key>Waves_XPst</key>\n\t<data>AAECAw==</data>\n"
    } else {
        ""
    };
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n\
<plist version=\"1.0\">\n<dict>\n\
\t<key>manufacturer</key>\n\t<integer>{}</integer>\n\
\t<key>name</key>\n\t<string>{}</string>\n\
\t<key>subtype</key>\n\t<integer>{}</integer>\n\
\t<key>type</key>\n\t<integer>{}</integer>\n\
\t<key>version</key>\n\t<integer>65536</integer>\n\
{waves_key}</dict>\n</plist>\n",
        fourcc(manufacturer),
        xml_escape(name),
        fourcc(subtype),
        fourcc(au_type),
    )
    .into_bytes()
}

pub(crate) fn plugin_instance(name: &str, manufacturer: &str, subtype: &str) -> PluginInstance {
    PluginInstance {
        name: name.to_string(),
        au_type: "aufx".to_string(),
        au_subtype: subtype.to_string(),
        au_manufacturer: manufacturer.to_string(),
        is_waves: manufacturer == "ksWV",
        raw: Dictionary::new(),
    }
}

// ── Projects ────────────────────────────────────────────────────────

/// A record classified the way discovery classifies it.
pub(crate) fn audio_record(filename: &str, file_path: PathBuf) -> AudioFileRecord {
    AudioFileRecord::new(filename, classify(filename), file_path)
}

fn empty_project() -> ProjectModel {
    ProjectModel {
        name: "Song".to_string(),
        tempo: 120.0,
        time_sig_numerator: 4,
        time_sig_denominator: 4,
        sample_rate: 44_100,
        audio_files: Vec::new(),
        plugins: Vec::new(),
        track_names: Vec::new(),
        alternative: 0,
        mixer_state: None,
    }
}

/// A 120 BPM 4/4 project at 44.1 kHz with these tracks and no recordings.
pub(crate) fn project_with_tracks(names: &[&str]) -> ProjectModel {
    ProjectModel {
        track_names: names.iter().map(|n| (*n).to_string()).collect(),
        ..empty_project()
    }
}

/// A 120 BPM 4/4 project at 44.1 kHz whose recordings point at paths that
/// do not exist, all starting at 0.
pub(crate) fn project_with_files(filenames: &[&str]) -> ProjectModel {
    let audio_files: Vec<AudioFileRecord> = filenames
        .iter()
        .map(|f| audio_record(f, Path::new("/missing/audio").join(f)))
        .collect();
    ProjectModel {
        track_names: collect_track_names(&audio_files),
        audio_files,
        ..empty_project()
    }
}

// ── Bundles ─────────────────────────────────────────────────────────

/// Writes a minimal `<name>.logicx` directory.
pub(crate) struct BundleBuilder {
    dir: PathBuf,
    name: String,
    variant_name: Option<String>,
    tempo: f64,
    time_signature: (u32, u32),
    sample_rate: u32,
    referenced_audio: Vec<String>,
    bare_metadata: bool,
    audio: Vec<(String, Vec<u8>)>,
    plugins: Vec<Vec<u8>>,
}

impl BundleBuilder {
    pub fn new(dir: &Path, name: &str) -> Self {
        Self {
            dir: dir.to_path_buf(),
            name: name.to_string(),
            variant_name: None,
            tempo: 120.0,
            time_signature: (4, 4),
            sample_rate: 44_100,
            referenced_audio: Vec::new(),
            bare_metadata: false,
            audio: Vec::new(),
            plugins: Vec::new(),
        }
    }

    pub fn variant_name(mut self, name: &str) -> Self {
        self.variant_name = Some(name.to_string());
        self
    }

    pub fn tempo(mut self, bpm: f64) -> Self {
        self.tempo = bpm;
        self
    }

    pub fn time_signature(mut self, numerator: u32, denominator: u32) -> Self {
        self.time_signature = (numerator, denominator);
        self
    }

    pub fn sample_rate(mut self, rate: u32) -> Self {
        self.sample_rate = rate;
        self
    }

    /// Entries for the metadata's `AudioFiles` list, written verbatim.
    pub fn referenced_audio(mut self, files: &[&str]) -> Self {
        self.referenced_audio = files.iter().map(|f| (*f).to_string()).collect();
        self
    }

    /// Write an empty metadata dictionary.
    pub fn bare_metadata(mut self) -> Self {
        self.bare_metadata = true;
        self
    }

    pub fn audio(mut self, filename: &str, bytes: Vec<u8>) -> Self {
        self.audio.push((filename.to_string(), bytes));
        self
    }

    pub fn plugin(
        mut self,
        name: &str,
        au_type: &[u8; 4],
        subtype: &[u8; 4],
        manufacturer: &[u8; 4],
        waves: bool,
    ) -> Self {
        self.plugins
            .push(plugin_plist(name, au_type, subtype, manufacturer, waves));
        self
    }

    pub fn build(self) -> PathBuf {
        let bundle = self.dir.join(format!("{}.logicx", self.name));

        let info_path = paths::project_info_path(&bundle);
        fs::create_dir_all(info_path.parent().unwrap()).unwrap();
        let mut info = Dictionary::new();
        info.insert("LastSavedFrom".into(), Value::String("Logic Pro 11.1".into()));
        info.insert("ActiveVariant".into(), Value::Integer(Integer::from(0i64)));
        info.insert("BundleVersion".into(), Value::String("1872".into()));
        if let Some(variant) = &self.variant_name {
            let mut names = Dictionary::new();
            names.insert("0".into(), Value::String(variant.clone()));
            info.insert("VariantNames".into(), Value::Dictionary(names));
        }
        Value::Dictionary(info).to_file_xml(&info_path).unwrap();

        let meta_path = paths::metadata_path(&bundle, 0);
        fs::create_dir_all(meta_path.parent().unwrap()).unwrap();
        let mut meta = Dictionary::new();
        if !self.bare_metadata {
            let referenced: Vec<Value> = if self.referenced_audio.is_empty() {
                self.audio
                    .iter()
                    .map(|(f, _)| Value::String(format!("{}{f}", paths::AUDIO_FILES_PREFIX)))
                    .collect()
            } else {
                self.referenced_audio.iter().cloned().map(Value::String).collect()
            };
            let (numerator, denominator) = self.time_signature;
            meta.insert("BeatsPerMinute".into(), Value::Real(self.tempo));
            meta.insert(
                "SongSignatureNumerator".into(),
                Value::Integer(Integer::from(i64::from(numerator))),
            );
            meta.insert(
                "SongSignatureDenominator".into(),
                Value::Integer(Integer::from(i64::from(denominator))),
            );
            meta.insert(
                "SampleRate".into(),
                Value::Integer(Integer::from(i64::from(self.sample_rate))),
            );
            meta.insert("AudioFiles".into(), Value::Array(referenced));
        }
        Value::Dictionary(meta).to_file_xml(&meta_path).unwrap();

        if !self.plugins.is_empty() {
            let mut blob = vec![0x00, 0x17, 0x11, 0xFF, 0x80];
            for plist in &self.plugins {
                blob.extend_from_slice(plist);
                blob.extend_from_slice(&[0xDE, 0xAD, 0x00, 0x01]);
            }
            fs::write(paths::project_data_path(&bundle, 0), blob).unwrap();
        }

        if !self.audio.is_empty() {
            let audio_dir = paths::audio_files_dir(&bundle);
            fs::create_dir_all(&audio_dir).unwrap();
            for (filename, bytes) in &self.audio {
                fs::write(audio_dir.join(filename), bytes).unwrap();
            }
        }

        bundle
    }
}

// ── Session template ────────────────────────────────────────────────

/// One audio track holding a stale clip and an envelope pointing at its
/// volume target, a MIDI track, two returns, the main track and transport.
const TEMPLATE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Ableton MajorVersion="5" MinorVersion="12.0_12049" SchemaChangeCount="7" Creator="Ableton Live 12.0" Revision="">
	<LiveSet>
		<NextPointeeId Value="60" />
		<OverwriteProtectionNumber Value="2816" />
		<LomId Value="0" />
		<Tracks>
			<AudioTrack Id="8">
				<LomId Value="0" />
				<Name>
					<EffectiveName Value="1-Audio" />
					<UserName Value="" />
					<Annotation Value="" />
				</Name>
				<Color Value="5" />
				<AutomationEnvelopes>
					<Envelopes>
						<AutomationEnvelope Id="9">
							<EnvelopeTarget>
								<PointeeId Value="21" />
							</EnvelopeTarget>
						</AutomationEnvelope>
					</Envelopes>
				</AutomationEnvelopes>
				<DeviceChain>
					<Mixer>
						<Volume>
							<LomId Value="0" />
							<Manual Value="0.5" />
							<AutomationTarget Id="21">
								<LockEnvelope Value="0" />
							</AutomationTarget>
						</Volume>
						<Pan>
							<Manual Value="0" />
							<AutomationTarget Id="22" />
						</Pan>
						<Speaker>
							<Manual Value="true" />
							<AutomationTarget Id="23" />
						</Speaker>
						<SoloSink Value="false" />
					</Mixer>
					<MainSequencer>
						<Sample>
							<ArrangerAutomation>
								<Events>
									<AudioClip Id="24" Time="0">
										<Name Value="Old Clip" />
									</AudioClip>
								</Events>
							</ArrangerAutomation>
						</Sample>
					</MainSequencer>
				</DeviceChain>
			</AudioTrack>
			<MidiTrack Id="10">
				<Name>
					<EffectiveName Value="2-MIDI" />
					<UserName Value="" />
				</Name>
				<Color Value="6" />
			</MidiTrack>
			<ReturnTrack Id="11">
				<Name>
					<EffectiveName Value="A-Reverb" />
					<UserName Value="" />
				</Name>
				<Color Value="7" />
				<DeviceChain>
					<Mixer>
						<Volume>
							<Manual Value="1" />
							<AutomationTarget Id="30" />
						</Volume>
					</Mixer>
				</DeviceChain>
			</ReturnTrack>
			<ReturnTrack Id="12">
				<Name>
					<EffectiveName Value="B-Delay" />
					<UserName Value="" />
				</Name>
				<Color Value="8" />
				<DeviceChain>
					<Mixer>
						<Volume>
							<Manual Value="1" />
							<AutomationTarget Id="31" />
						</Volume>
					</Mixer>
				</DeviceChain>
			</ReturnTrack>
		</Tracks>
		<MainTrack>
			<Name>
				<EffectiveName Value="Main" />
			</Name>
			<DeviceChain>
				<Mixer>
					<Tempo>
						<Manual Value="120" />
						<AutomationTarget Id="40" />
					</Tempo>
					<TimeSignatures>
						<RemoteableTimeSignature>
							<Numerator Value="4" />
							<Denominator Value="4" />
							<Time Value="0" />
						</RemoteableTimeSignature>
					</TimeSignatures>
				</Mixer>
			</DeviceChain>
		</MainTrack>
		<Transport>
			<PhaseNudgeTempo Value="10" />
			<LoopOn Value="false" />
			<Tempo>
				<Manual Value="120" />
			</Tempo>
			<TimeSignatures>
				<RemoteableTimeSignature>
					<Numerator Value="4" />
					<Denominator Value="4" />
				</RemoteableTimeSignature>
			</TimeSignatures>
		</Transport>
	</LiveSet>
</Ableton>
"#;

pub(crate) fn template_document() -> LiveDocument {
    LiveDocument::from_bytes(TEMPLATE_XML.as_bytes()).unwrap()
}

/// Write the template gzipped as `<dir>/DefaultLiveSet.als`.
pub(crate) fn write_template(dir: &Path) -> PathBuf {
    let path = dir.join("DefaultLiveSet.als");
    template_document().save(&path).unwrap();
    path
}
