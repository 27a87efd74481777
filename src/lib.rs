//! Logic Pro → Ableton Live project converter.
//!
//! Reads a `.logicx` bundle (metadata, recorded audio, plugin instances),
//! places every take on the timeline from the position embedded in its
//! audio header, and writes a Live set built from a template, plus a
//! plain-text report of what was and was not carried over.

pub mod arrange;
pub mod audio;
pub mod convert;
pub mod error;
pub mod export;
pub mod import;
pub mod model;
pub mod paths;
pub mod plugins;
pub mod progress;
pub mod report;
pub mod settings;
pub mod util;

#[cfg(test)]
mod testing;
