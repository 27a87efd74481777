use super::PluginCategory as Cat;
use super::PluginCategory;

/// Human-facing facts about a known source plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginInfo {
    pub name: &'static str,
    pub category: PluginCategory,
    pub character: &'static str,
}

const fn info(name: &'static str, category: PluginCategory, character: &'static str) -> PluginInfo {
    PluginInfo {
        name,
        category,
        character,
    }
}

/// Audio Unit plugins keyed by (manufacturer, subtype) four-character codes.
static AU_PLUGINS: &[((&str, &str), PluginInfo)] = &[
    // Waves
    (("ksWV", "76CM"), info("Waves CLA-76", Cat::Compressor, "FET compressor")),
    (("ksWV", "76CS"), info("Waves CLA-76", Cat::Compressor, "FET compressor stereo")),
    (("ksWV", "TG5M"), info("Waves Abbey Road TG Mastering Chain", Cat::ChannelStrip, "vintage console")),
    (("ksWV", "TG5S"), info("Waves Abbey Road TG Mastering Chain", Cat::ChannelStrip, "vintage console stereo")),
    (("ksWV", "DSAM"), info("Waves De-Esser", Cat::DeEsser, "sibilance de-esser")),
    (("ksWV", "DSAS"), info("Waves De-Esser", Cat::DeEsser, "sibilance de-esser stereo")),
    (("ksWV", "LA2M"), info("Waves CLA-2A", Cat::Compressor, "opto compressor")),
    (("ksWV", "LA2S"), info("Waves CLA-2A", Cat::Compressor, "opto compressor stereo")),
    (("ksWV", "LA3M"), info("Waves CLA-3A", Cat::Compressor, "opto compressor")),
    (("ksWV", "LA3S"), info("Waves CLA-3A", Cat::Compressor, "opto compressor stereo")),
    (("ksWV", "L1CM"), info("Waves L1 Limiter", Cat::Limiter, "brickwall peak limiter")),
    (("ksWV", "L1CS"), info("Waves L1 Limiter", Cat::Limiter, "brickwall peak limiter stereo")),
    (("ksWV", "BSLM"), info("Waves Bass Rider", Cat::Utility, "bass level rider")),
    (("ksWV", "BSLS"), info("Waves Bass Rider", Cat::Utility, "bass level rider stereo")),
    (("ksWV", "T37M"), info("Waves J37 Tape", Cat::Saturation, "tape saturation")),
    (("ksWV", "T37S"), info("Waves J37 Tape", Cat::Saturation, "tape saturation stereo")),
    (("ksWV", "NIDM"), info("Waves Renaissance De-Esser", Cat::DeEsser, "renaissance de-esser")),
    (("ksWV", "NIDS"), info("Waves Renaissance De-Esser", Cat::DeEsser, "renaissance de-esser stereo")),
    (("ksWV", "APCM"), info("Waves API 2500", Cat::Compressor, "bus compressor")),
    (("ksWV", "APCS"), info("Waves API 2500", Cat::Compressor, "bus compressor stereo")),
    (("ksWV", "TAPM"), info("Waves J37 Tape", Cat::Saturation, "tape emulation")),
    (("ksWV", "TAPS"), info("Waves J37 Tape", Cat::Saturation, "tape emulation stereo")),
    (("ksWV", "PLTM"), info("Waves PuigTec EQ", Cat::Eq, "tube equalizer")),
    (("ksWV", "PLTS"), info("Waves PuigTec EQ", Cat::Eq, "tube equalizer stereo")),
    (("ksWV", "RDRM"), info("Waves Renaissance De-Esser", Cat::DeEsser, "de-esser")),
    (("ksWV", "RDRS"), info("Waves Renaissance De-Esser", Cat::DeEsser, "de-esser stereo")),
    // Apple built-ins
    (("appl", "bceq"), info("Channel EQ", Cat::Eq, "parametric EQ")),
    (("appl", "chor"), info("Chorus", Cat::Modulation, "chorus effect")),
    (("appl", "pdlb"), info("Pedalboard", Cat::MultiFx, "guitar effect pedalboard")),
    (("appl", "lmtr"), info("Limiter", Cat::Limiter, "brickwall limiter")),
    (("appl", "mcmp"), info("Multipressor", Cat::Compressor, "multiband compressor")),
    (("appl", "cmpr"), info("Compressor", Cat::Compressor, "general compressor")),
    (("appl", "spdz"), info("Space Designer", Cat::Reverb, "convolution reverb")),
    (("appl", "chrm"), info("ChromaVerb", Cat::Reverb, "algorithmic reverb")),
    (("appl", "tdly"), info("Tape Delay", Cat::Delay, "tape delay")),
    (("appl", "ngat"), info("Noise Gate", Cat::Gate, "noise gate")),
    (("appl", "dees"), info("DeEsser 2", Cat::DeEsser, "de-esser")),
];

/// Look up a source plugin by its manufacturer and subtype codes.
pub fn lookup_au_plugin(manufacturer: &str, subtype: &str) -> Option<PluginInfo> {
    AU_PLUGINS
        .iter()
        .find(|((m, s), _)| *m == manufacturer && *s == subtype)
        .map(|(_, info)| *info)
}
