use std::sync::Arc;

use super::oscillator::{synthesize, SampleBuffer};
use crate::sequencing::Pitch;

/// Lazily synthesized buffers, one per pitch.
///
/// A table belongs to a single playback session. Asking for the same pitch
/// twice returns the same `Arc`, so a pitch is synthesized at most once no
/// matter how often it recurs.
pub struct PitchTable {
    sample_rate: u32,
    measure_length_secs: u32,
    buffers: [Option<Arc<SampleBuffer>>; Pitch::COUNT],
    synthesized: usize,
}

impl PitchTable {
    pub fn new(sample_rate: u32, measure_length_secs: u32) -> Self {
        Self {
            sample_rate,
            measure_length_secs,
            buffers: Default::default(),
            synthesized: 0,
        }
    }

    /// Buffer for `pitch`, synthesizing it on first use
    pub fn sample_of(&mut self, pitch: Pitch) -> Arc<SampleBuffer> {
        let slot = &mut self.buffers[pitch.ordinal()];
        if let Some(buffer) = slot {
            return Arc::clone(buffer);
        }

        tracing::debug!(%pitch, "synthesizing pitch buffer");
        let buffer = Arc::new(synthesize(pitch, self.sample_rate, self.measure_length_secs));
        *slot = Some(Arc::clone(&buffer));
        self.synthesized += 1;
        buffer
    }

    /// The rest buffer, used for inter-note gaps
    pub fn silence(&mut self) -> Arc<SampleBuffer> {
        self.sample_of(Pitch::Rest)
    }

    /// How many buffers this table has synthesized so far
    pub fn synthesized(&self) -> usize {
        self.synthesized
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn measure_length_secs(&self) -> u32 {
        self.measure_length_secs
    }
}
