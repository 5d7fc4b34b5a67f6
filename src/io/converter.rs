/// Signed 8-bit PCM to the `[-1.0, 1.0)` float range used by output streams.
pub fn pcm8_to_f32(sample: i8) -> f32 {
    sample as f32 / 128.0
}

/// Sample-and-hold rate conversion from the song's fixed rate to whatever
/// rate the device runs at.
///
/// Each device frame advances the source position by
/// `source_rate / device_rate`; whenever that crosses a whole sample the next
/// source sample is pulled and held.
#[derive(Debug, Clone)]
pub struct SampleHold {
    step: f64,
    pending: f64,
    current: f32,
}

impl SampleHold {
    pub fn new(source_rate: u32, device_rate: u32) -> Self {
        let step = source_rate as f64 / device_rate.max(1) as f64;
        Self {
            step,
            // first frame pulls immediately
            pending: (1.0 - step).max(0.0),
            current: 0.0,
        }
    }

    /// Next device-rate sample. `pull` yields `None` on underrun, which
    /// plays as silence.
    pub fn next_sample(&mut self, mut pull: impl FnMut() -> Option<i8>) -> f32 {
        self.pending += self.step;
        while self.pending >= 1.0 {
            self.pending -= 1.0;
            self.current = pull().map(pcm8_to_f32).unwrap_or(0.0);
        }
        self.current
    }
}
