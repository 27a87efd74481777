use std::fs;
use std::path::{Path, PathBuf};

use super::PluginCategory as Cat;
use super::PluginCategory;

/// An installed VST3 bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vst3Plugin {
    pub name: String,
    pub path: PathBuf,
    pub category: PluginCategory,
}

/// Exact product names whose category the keyword rules would get wrong.
static KNOWN_PLUGINS: &[(&str, PluginCategory)] = &[
    ("Pianoteq 8", Cat::Synth),
    ("Pianoteq 9", Cat::Synth),
    ("Serum2", Cat::Synth),
    ("ShaperBox 3", Cat::MultiFx),
    ("Turnado", Cat::MultiFx),
    ("Smooth Operator", Cat::Eq),
    ("TAIP", Cat::Saturation),
    ("Parallel Aggressor", Cat::Compressor),
    ("Sun Bear Bus Compressor", Cat::Compressor),
    ("Retro Sta-Level", Cat::Compressor),
    ("Lion Master", Cat::Limiter),
    ("Level-Or", Cat::Limiter),
    ("Crystalline", Cat::Reverb),
    ("Dirty Dog Reverb", Cat::Reverb),
    ("Hippie Elephant Reverb", Cat::Reverb),
    ("LadyBug Reverb", Cat::Reverb),
    ("Rhino Reverb", Cat::Reverb),
    ("Flamingo Verb", Cat::Reverb),
    ("Yak Delay", Cat::Delay),
    ("Fox Echo Chorus", Cat::Delay),
    ("Comeback Kid", Cat::Delay),
    ("TimeMachine", Cat::Delay),
    ("Hawk Phaser", Cat::Modulation),
    ("Pixel Cat", Cat::Modulation),
    ("Transit 2", Cat::Modulation),
    ("Dragon EQ", Cat::Eq),
    ("Falcon Air EQ", Cat::Eq),
];

/// Vendors whose product names would otherwise hit the compressor rule.
static NOISE_REDUCTION_PREFIXES: &[&str] = &["CrumplePop"];

/// Case-insensitive substring rules, most specific first.
static CATEGORY_PATTERNS: &[(&str, PluginCategory)] = &[
    ("Pro-Q", Cat::Eq),
    ("Pro-C", Cat::Compressor),
    ("Pro-L", Cat::Limiter),
    ("Pro-DS", Cat::DeEsser),
    ("Pro-MB", Cat::Compressor),
    ("Pro-R", Cat::Reverb),
    // Leading space or dash keeps "Pianoteq" out.
    (" EQ", Cat::Eq),
    ("-EQ", Cat::Eq),
    ("Equaliz", Cat::Eq),
    ("Compressor", Cat::Compressor),
    ("Comp FET", Cat::Compressor),
    ("Bus Comp", Cat::Compressor),
    ("Sta-Level", Cat::Compressor),
    ("Limiter", Cat::Limiter),
    ("Maximizer", Cat::Limiter),
    ("De-Ess", Cat::DeEsser),
    ("DeEss", Cat::DeEsser),
    ("Sibilance", Cat::DeEsser),
    ("Reverb", Cat::Reverb),
    ("Verb", Cat::Reverb),
    ("ValhallaDSP", Cat::Reverb),
    ("Valhalla DSP", Cat::Reverb),
    ("Delay", Cat::Delay),
    ("Echo", Cat::Delay),
    ("Drive", Cat::Saturation),
    ("Tape", Cat::Saturation),
    ("Fuzz", Cat::Saturation),
    ("Distort", Cat::Saturation),
    ("Overdrive", Cat::Saturation),
    ("Chorus", Cat::Modulation),
    ("Flanger", Cat::Modulation),
    ("Phaser", Cat::Modulation),
    ("Channel", Cat::ChannelStrip),
    ("Strip", Cat::ChannelStrip),
    ("Synth", Cat::Synth),
    ("Piano", Cat::Synth),
    ("Serum", Cat::Synth),
    ("Organ", Cat::Synth),
    ("Korg", Cat::Synth),
    ("Meter", Cat::Utility),
    ("Analyzer", Cat::Utility),
    ("Gain", Cat::Utility),
    ("VocAlign", Cat::Utility),
    ("Denoise", Cat::NoiseReduction),
    ("AudioDenoise", Cat::NoiseReduction),
    ("Remover", Cat::NoiseReduction),
    ("Noise", Cat::NoiseReduction),
];

/// Categorize an installed plugin by its product name.
pub fn categorize(name: &str) -> PluginCategory {
    if let Some((_, category)) = KNOWN_PLUGINS.iter().find(|(known, _)| *known == name) {
        return *category;
    }
    if NOISE_REDUCTION_PREFIXES.iter().any(|p| name.starts_with(p)) {
        return Cat::NoiseReduction;
    }
    let lower = name.to_lowercase();
    CATEGORY_PATTERNS
        .iter()
        .find(|(pattern, _)| lower.contains(&pattern.to_lowercase()))
        .map_or(Cat::Unknown, |(_, category)| *category)
}

/// List the entries of a VST3 folder, sorted by path. A missing folder
/// means nothing is installed.
pub fn scan_vst3_plugins(dir: &Path) -> Vec<Vst3Plugin> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("cannot scan {}: {e}", dir.display());
            }
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
    paths.sort();

    paths
        .into_iter()
        .filter_map(|path| {
            let name = path.file_stem()?.to_string_lossy().into_owned();
            let category = categorize(&name);
            Some(Vst3Plugin {
                name,
                path,
                category,
            })
        })
        .collect()
}
