use std::thread;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use super::player::PlaybackError;

/// Holds playback for a note's nominal length.
///
/// Writing samples to the sink returns as soon as they are queued; the pacer
/// is what keeps the song in real time.
pub trait Pacer {
    /// Block for `duration`, failing with [`PlaybackError::Interrupted`] as
    /// soon as `cancel` fires.
    fn pause(&mut self, duration: Duration, cancel: &CancellationToken) -> Result<(), PlaybackError>;
}

/// Wall-clock pacer. Sleeps in short slices so cancellation is noticed
/// promptly.
#[derive(Debug, Clone, Copy)]
pub struct RealTimePacer {
    slice: Duration,
}

impl RealTimePacer {
    pub fn new(slice: Duration) -> Self {
        Self { slice }
    }
}

impl Default for RealTimePacer {
    fn default() -> Self {
        Self::new(Duration::from_millis(10))
    }
}

impl Pacer for RealTimePacer {
    fn pause(&mut self, duration: Duration, cancel: &CancellationToken) -> Result<(), PlaybackError> {
        let deadline = Instant::now() + duration;
        loop {
            if cancel.is_cancelled() {
                return Err(PlaybackError::Interrupted);
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            thread::sleep((deadline - now).min(self.slice));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waits_at_least_the_duration() {
        let mut pacer = RealTimePacer::default();
        let start = Instant::now();
        pacer
            .pause(Duration::from_millis(30), &CancellationToken::new())
            .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn cancelled_token_interrupts_immediately() {
        let mut pacer = RealTimePacer::default();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let start = Instant::now();
        let result = pacer.pause(Duration::from_secs(5), &cancel);
        assert!(matches!(result, Err(PlaybackError::Interrupted)));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn cancellation_from_another_thread() {
        let mut pacer = RealTimePacer::default();
        let cancel = CancellationToken::new();
        let remote = cancel.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            remote.cancel();
        });

        let start = Instant::now();
        let result = pacer.pause(Duration::from_secs(5), &cancel);
        handle.join().unwrap();
        assert!(matches!(result, Err(PlaybackError::Interrupted)));
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
