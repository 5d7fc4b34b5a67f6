pub mod config;
pub mod dsp; // Pitch synthesis and buffer memoization
pub mod io; // Output device boundary
pub mod runtime; // Real-time playback
pub mod sequencing; // Pitches, durations and song parsing

pub use config::PlayerConfig;

/// Source sample rate: 48 * 1024 Hz
pub const SAMPLE_RATE: u32 = 48 * 1024;
/// One measure; every note length is a fraction of it
pub const MEASURE_LENGTH_SECS: u32 = 1;
/// Silence written between notes
pub const GAP_SAMPLES: usize = 50;
