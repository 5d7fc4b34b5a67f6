//! Pitch synthesis.
//!
//! Buffers are computed once per pitch and shared read-only afterwards; the
//! player slices them at playback time instead of synthesizing per note.

/// Sine synthesis of one measure of 8-bit PCM.
pub mod oscillator;
/// Per-session cache of synthesized buffers.
pub mod pitch_table;

pub use oscillator::{synthesize, SampleBuffer};
pub use pitch_table::PitchTable;
