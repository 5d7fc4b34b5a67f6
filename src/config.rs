#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{GAP_SAMPLES, MEASURE_LENGTH_SECS, SAMPLE_RATE};

/// Playback settings shared by the player, the pitch table and the sink
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerConfig {
    /// Source sample rate in Hz
    pub sample_rate: u32,
    /// Length of one measure in seconds; note durations are fractions of it
    pub measure_length_secs: u32,
    /// Silence written after every note
    pub gap_samples: usize,
    /// Capacity of the device ring, in measures
    pub ring_measures: u32,
}

impl PlayerConfig {
    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn measure_length_secs(mut self, secs: u32) -> Self {
        self.measure_length_secs = secs;
        self
    }

    pub fn gap_samples(mut self, samples: usize) -> Self {
        self.gap_samples = samples;
        self
    }

    pub fn ring_measures(mut self, measures: u32) -> Self {
        self.ring_measures = measures;
        self
    }

    /// Longest stretch of a single note that is actually written, in ms
    pub fn max_play_ms(&self) -> u64 {
        self.measure_length_secs as u64 * 1000
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            measure_length_secs: MEASURE_LENGTH_SECS,
            gap_samples: GAP_SAMPLES,
            ring_measures: 2,
        }
    }
}
