//! Player - note-by-note playback
//!
//! The player runs on the caller's thread. For each note it writes the
//! pitch's samples (cut to the note's length) and a short silence gap to the
//! sink, then waits out the note's nominal duration before moving on.

use std::ops::{Deref, DerefMut};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::pacer::{Pacer, RealTimePacer};
use crate::config::PlayerConfig;
use crate::dsp::PitchTable;
use crate::io::{PcmSink, SinkError};
use crate::sequencing::{NoteEvent, Song};

/// Where a player is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    NotStarted,
    DeviceOpening,
    Playing,
    Draining,
    Closed,
    Failed,
}

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("couldn't access audio device: {0}")]
    DeviceUnavailable(String),
    #[error("playback interrupted")]
    Interrupted,
    #[error(transparent)]
    Sink(SinkError),
}

impl From<SinkError> for PlaybackError {
    fn from(err: SinkError) -> Self {
        match err {
            SinkError::DeviceUnavailable(reason) => PlaybackError::DeviceUnavailable(reason),
            SinkError::Interrupted => PlaybackError::Interrupted,
            other => PlaybackError::Sink(other),
        }
    }
}

/// Summary of a finished playback session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackReport {
    pub notes_played: usize,
    /// Distinct buffers synthesized, including the silence used for gaps
    pub pitches_synthesized: usize,
    /// Samples handed to the sink, gaps included
    pub samples_written: usize,
}

type NoteCallback = Box<dyn FnMut(&NoteEvent)>;

pub struct Player<P = RealTimePacer> {
    config: PlayerConfig,
    pacer: P,
    cancel: CancellationToken,
    on_note: Option<NoteCallback>,
    state: PlaybackState,
}

impl Player<RealTimePacer> {
    pub fn new(config: PlayerConfig) -> Self {
        Self {
            config,
            pacer: RealTimePacer::default(),
            cancel: CancellationToken::new(),
            on_note: None,
            state: PlaybackState::NotStarted,
        }
    }
}

impl<P: Pacer> Player<P> {
    /// Replace the pacer
    pub fn with_pacer<Q: Pacer>(self, pacer: Q) -> Player<Q> {
        Player {
            config: self.config,
            pacer,
            cancel: self.cancel,
            on_note: self.on_note,
            state: self.state,
        }
    }

    /// Use an externally owned cancellation token (e.g. one fired on Ctrl+C)
    pub fn cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Called with each note just before its samples are written
    pub fn on_note(mut self, callback: impl FnMut(&NoteEvent) + 'static) -> Self {
        self.on_note = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    /// A handle that cancels this player's current or next playback
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Play `song` once, front to back.
    ///
    /// The sink is closed on every path after a successful `open`, including
    /// errors and interruption. A sink that fails to open is never written
    /// to or closed.
    pub fn play<S: PcmSink + ?Sized>(
        &mut self,
        song: &Song,
        sink: &mut S,
    ) -> Result<PlaybackReport, PlaybackError> {
        let result = self.run(song, sink);
        match &result {
            Ok(report) => {
                self.state = PlaybackState::Closed;
                tracing::debug!(
                    notes = report.notes_played,
                    synthesized = report.pitches_synthesized,
                    samples = report.samples_written,
                    "playback finished"
                );
            }
            Err(err) => {
                self.state = PlaybackState::Failed;
                tracing::warn!(%err, "playback failed");
            }
        }
        result
    }

    fn run<S: PcmSink + ?Sized>(&mut self, song: &Song, sink: &mut S) -> Result<PlaybackReport, PlaybackError> {
        self.state = PlaybackState::DeviceOpening;
        if self.cancel.is_cancelled() {
            return Err(PlaybackError::Interrupted);
        }
        sink.open().map_err(|err| match err {
            SinkError::DeviceUnavailable(reason) => PlaybackError::DeviceUnavailable(reason),
            SinkError::Interrupted => PlaybackError::Interrupted,
            other => PlaybackError::DeviceUnavailable(other.to_string()),
        })?;
        let mut device = OpenSink { sink };

        self.state = PlaybackState::Playing;
        let PlayerConfig {
            sample_rate,
            measure_length_secs,
            gap_samples,
            ..
        } = self.config;

        // One table per session: buffers never outlive the song
        let mut table = PitchTable::new(sample_rate, measure_length_secs);
        let silence = table.silence();
        let gap = gap_samples.min(silence.len());
        let mut report = PlaybackReport::default();

        for event in song {
            if self.cancel.is_cancelled() {
                return Err(PlaybackError::Interrupted);
            }
            self.notify(event);

            let buffer = table.sample_of(event.pitch);
            let time_ms = event.duration.time_ms(measure_length_secs);
            let play_ms = time_ms.min(self.config.max_play_ms());
            let len = (sample_rate as u64 * play_ms / 1000) as usize;

            report.samples_written += device.write(buffer.samples(), 0, len)?;
            report.samples_written += device.write(silence.samples(), 0, gap)?;

            self.pacer.pause(Duration::from_millis(time_ms), &self.cancel)?;
            report.notes_played += 1;
        }

        self.state = PlaybackState::Draining;
        device.drain()?;

        report.pitches_synthesized = table.synthesized();
        Ok(report)
    }

    fn notify(&mut self, event: &NoteEvent) {
        tracing::debug!(note = %event.pitch, length = %event.duration, "playing note");
        if let Some(callback) = self.on_note.as_mut() {
            callback(event);
        }
    }
}

/// Closes the sink when dropped
struct OpenSink<'a, S: PcmSink + ?Sized> {
    sink: &'a mut S,
}

impl<S: PcmSink + ?Sized> Deref for OpenSink<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.sink
    }
}

impl<S: PcmSink + ?Sized> DerefMut for OpenSink<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.sink
    }
}

impl<S: PcmSink + ?Sized> Drop for OpenSink<'_, S> {
    fn drop(&mut self) {
        self.sink.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencing::{Duration as NoteLength, Pitch};

    #[derive(Default)]
    struct CountingSink {
        opened: bool,
        closes: usize,
        writes: Vec<usize>,
    }

    impl PcmSink for CountingSink {
        fn open(&mut self) -> Result<(), SinkError> {
            self.opened = true;
            Ok(())
        }

        fn write(&mut self, buffer: &[i8], offset: usize, length: usize) -> Result<usize, SinkError> {
            crate::io::sink::window(buffer, offset, length)?;
            self.writes.push(length);
            Ok(length)
        }

        fn drain(&mut self) -> Result<(), SinkError> {
            Ok(())
        }

        fn close(&mut self) {
            self.closes += 1;
        }
    }

    #[derive(Default)]
    struct NoWait(Vec<Duration>);

    impl Pacer for NoWait {
        fn pause(&mut self, duration: Duration, _: &CancellationToken) -> Result<(), PlaybackError> {
            self.0.push(duration);
            Ok(())
        }
    }

    fn small_config() -> PlayerConfig {
        PlayerConfig::default().sample_rate(1_000)
    }

    #[test]
    fn starts_not_started() {
        let player = Player::new(small_config());
        assert_eq!(player.state(), PlaybackState::NotStarted);
    }

    #[test]
    fn whole_note_is_cut_to_one_measure() {
        let song = Song::new(vec![NoteEvent::new(Pitch::A4, NoteLength::Whole)]);
        let mut sink = CountingSink::default();
        let mut player = Player::new(small_config()).with_pacer(NoWait::default());

        player.play(&song, &mut sink).unwrap();

        // 1500 ms nominal, capped at the 1000 ms measure; then the gap
        assert_eq!(sink.writes, vec![1_000, 50]);
        assert_eq!(player.pacer().0, vec![Duration::from_millis(1_500)]);
    }

    #[test]
    fn eighth_note_sample_count() {
        let song = Song::new(vec![NoteEvent::new(Pitch::E4, NoteLength::Eighth)]);
        let mut sink = CountingSink::default();
        let mut player = Player::new(small_config()).with_pacer(NoWait::default());

        let report = player.play(&song, &mut sink).unwrap();

        assert_eq!(sink.writes, vec![187, 50]);
        assert_eq!(report.samples_written, 237);
        assert_eq!(report.notes_played, 1);
    }

    #[test]
    fn gap_is_clamped_to_the_silence_buffer() {
        let song = Song::new(vec![NoteEvent::new(Pitch::A4, NoteLength::Quarter)]);
        let mut sink = CountingSink::default();
        let config = small_config().gap_samples(5_000);
        let mut player = Player::new(config).with_pacer(NoWait::default());

        player.play(&song, &mut sink).unwrap();
        assert_eq!(sink.writes, vec![375, 1_000]);
    }

    #[test]
    fn closes_once_and_ends_closed() {
        let song = Song::new(vec![NoteEvent::new(Pitch::B4, NoteLength::Half)]);
        let mut sink = CountingSink::default();
        let mut player = Player::new(small_config()).with_pacer(NoWait::default());

        player.play(&song, &mut sink).unwrap();
        assert!(sink.opened);
        assert_eq!(sink.closes, 1);
        assert_eq!(player.state(), PlaybackState::Closed);
    }

    #[test]
    fn cancelled_before_start_never_opens() {
        let song = Song::new(vec![NoteEvent::new(Pitch::B4, NoteLength::Half)]);
        let mut sink = CountingSink::default();
        let mut player = Player::new(small_config()).with_pacer(NoWait::default());
        player.cancellation_token().cancel();

        let err = player.play(&song, &mut sink).unwrap_err();
        assert!(matches!(err, PlaybackError::Interrupted));
        assert!(!sink.opened);
        assert_eq!(sink.closes, 0);
        assert_eq!(player.state(), PlaybackState::Failed);
    }

    #[test]
    fn sink_errors_map_to_playback_errors() {
        assert!(matches!(
            PlaybackError::from(SinkError::DeviceUnavailable("gone".into())),
            PlaybackError::DeviceUnavailable(_)
        ));
        assert!(matches!(
            PlaybackError::from(SinkError::Interrupted),
            PlaybackError::Interrupted
        ));
        assert!(matches!(
            PlaybackError::from(SinkError::NotOpen),
            PlaybackError::Sink(SinkError::NotOpen)
        ));
    }
}
