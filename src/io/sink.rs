/// Errors raised by a [`PcmSink`]
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("audio device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("audio stream error: {0}")]
    Stream(String),
    #[error("write of {length} samples at offset {offset} exceeds buffer of {buffer_len}")]
    OutOfBounds {
        offset: usize,
        length: usize,
        buffer_len: usize,
    },
    #[error("sink is not open")]
    NotOpen,
    #[error("interrupted while waiting on the audio device")]
    Interrupted,
    #[error("audio device stopped consuming samples for {0:?}")]
    Stalled(std::time::Duration),
}

/// Mono signed 8-bit PCM output device.
///
/// Lifecycle: `open` once, any number of `write`s, `drain`, then `close`.
/// `close` must be safe to call more than once.
pub trait PcmSink {
    /// Acquire the device. Fails with [`SinkError::DeviceUnavailable`].
    fn open(&mut self) -> Result<(), SinkError>;

    /// Queue `buffer[offset..offset + length]` for playback and return the
    /// number of samples queued. May return before the samples are audible.
    fn write(&mut self, buffer: &[i8], offset: usize, length: usize) -> Result<usize, SinkError>;

    /// Block until every queued sample has been emitted.
    fn drain(&mut self) -> Result<(), SinkError>;

    /// Release the device.
    fn close(&mut self);
}

/// Bounds-checked `buffer[offset..offset + length]`
pub fn window(buffer: &[i8], offset: usize, length: usize) -> Result<&[i8], SinkError> {
    offset
        .checked_add(length)
        .and_then(|end| buffer.get(offset..end))
        .ok_or(SinkError::OutOfBounds {
            offset,
            length,
            buffer_len: buffer.len(),
        })
}
