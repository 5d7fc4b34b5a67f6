use std::f64::consts::TAU;

use crate::sequencing::Pitch;

/*
Sine Synthesis
==============

Every pitch gets one measure of 8-bit PCM, computed once and then sliced at
playback time. A half note and a whole note of the same pitch read from the
same buffer; only the number of samples written differs.

  step      = frequency * 2π / sample_rate     (radians per sample)
  sample[i] = round(sin(i * step) * 127)

127 is full scale for signed 8-bit, so the wave never clips. A rest is the
same length of zeros, which doubles as the inter-note gap.

Buffer length is sample_rate * measure_length_secs regardless of the note's
duration. At the default 49152 Hz and a one-second measure that is 48 KiB per
pitch, so a full table of fourteen pitches stays under 700 KiB.
*/

/// Peak amplitude of a synthesized tone.
pub const MAX_VOLUME: f64 = 127.0;

/// One measure of signed 8-bit mono PCM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleBuffer {
    samples: Box<[i8]>,
}

impl SampleBuffer {
    pub fn silence(len: usize) -> Self {
        Self {
            samples: vec![0; len].into_boxed_slice(),
        }
    }

    pub fn samples(&self) -> &[i8] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl AsRef<[i8]> for SampleBuffer {
    fn as_ref(&self) -> &[i8] {
        &self.samples
    }
}

/// Number of samples in one measure
pub fn measure_samples(sample_rate: u32, measure_length_secs: u32) -> usize {
    sample_rate as usize * measure_length_secs as usize
}

/// Synthesize one measure of `pitch`. Pure: same inputs, same buffer.
pub fn synthesize(pitch: Pitch, sample_rate: u32, measure_length_secs: u32) -> SampleBuffer {
    let len = measure_samples(sample_rate, measure_length_secs);
    let Some(frequency) = pitch.frequency() else {
        return SampleBuffer::silence(len);
    };

    let step = frequency * TAU / sample_rate as f64;
    let samples = (0..len)
        .map(|i| ((i as f64 * step).sin() * MAX_VOLUME).round() as i8)
        .collect();

    SampleBuffer { samples }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: u32 = 1_000;

    #[test]
    fn rest_is_all_zero() {
        let buf = synthesize(Pitch::Rest, SAMPLE_RATE, 1);
        assert_eq!(buf.len(), 1_000);
        assert!(buf.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn length_is_one_measure() {
        for pitch in Pitch::ALL {
            assert_eq!(synthesize(pitch, SAMPLE_RATE, 1).len(), 1_000);
            assert_eq!(synthesize(pitch, SAMPLE_RATE, 2).len(), 2_000);
        }
    }

    #[test]
    fn tone_starts_at_zero_and_reaches_full_scale() {
        let buf = synthesize(Pitch::A4, 48_000, 1);
        assert_eq!(buf.samples()[0], 0);
        let peak = buf.samples().iter().map(|&s| (s as i16).abs()).max().unwrap();
        assert_eq!(peak, 127);
        assert!(buf.samples().iter().all(|&s| s >= -127));
    }

    #[test]
    fn samples_are_rounded() {
        let buf = synthesize(Pitch::A4, 48_000, 1);
        let step = 440.0 * TAU / 48_000.0;
        for i in [1usize, 7, 31, 250] {
            let expected = ((i as f64 * step).sin() * MAX_VOLUME).round() as i8;
            assert_eq!(buf.samples()[i], expected);
        }
    }

    #[test]
    fn a4_period_matches_frequency() {
        // 440 Hz at 44 kHz repeats every 100 samples
        let buf = synthesize(Pitch::A4, 44_000, 1);
        for i in 0..200 {
            assert!((buf.samples()[i] as i16 - buf.samples()[i + 100] as i16).abs() <= 1);
        }
    }

    #[test]
    fn synthesis_is_deterministic() {
        assert_eq!(
            synthesize(Pitch::F4S, SAMPLE_RATE, 1),
            synthesize(Pitch::F4S, SAMPLE_RATE, 1)
        );
    }
}
