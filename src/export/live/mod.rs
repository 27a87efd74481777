//! Ableton Live session (`.als`) writer.

pub mod assembler;
pub mod clip;
pub mod document;
pub mod ids;
pub mod template;

pub use assembler::{
    assemble, copy_audio_files, generate_session, read_session_timing, write_session, AssemblyStats,
    CopyOutcome, GeneratedSession, SessionTiming, TimingBlock,
};
pub use clip::SampleLocation;
pub use document::{Element, LiveDocument};
pub use ids::{reassign_ids, IdAllocator};
pub use template::{load_template, resolve_template};
