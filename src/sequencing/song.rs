use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::duration::Duration;
use super::notes::Pitch;

/// One note of a song: what to play and for how long
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteEvent {
    pub pitch: Pitch,
    pub duration: Duration,
}

impl NoteEvent {
    pub const fn new(pitch: Pitch, duration: Duration) -> Self {
        Self { pitch, duration }
    }
}

/// A validated song, in source line order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Song {
    events: Vec<NoteEvent>,
}

impl Song {
    pub fn new(events: Vec<NoteEvent>) -> Self {
        Self { events }
    }

    /// Parse song text, one `<PITCH> <LENGTH>` pair per line
    pub fn parse(text: &str) -> Result<Song, SongError> {
        parse_lines(text.lines())
    }

    /// Read and parse a song file
    pub fn load(path: impl AsRef<Path>) -> Result<Song, SongError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SongError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Song::parse(&text)
    }

    pub fn events(&self) -> &[NoteEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NoteEvent> {
        self.events.iter()
    }

    /// Sum of every note's nominal play time
    pub fn nominal_time_ms(&self, measure_length_secs: u32) -> u64 {
        self.events
            .iter()
            .map(|e| e.duration.time_ms(measure_length_secs))
            .sum()
    }
}

impl<'a> IntoIterator for &'a Song {
    type Item = &'a NoteEvent;
    type IntoIter = std::slice::Iter<'a, NoteEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Parse song lines, collecting every invalid line before giving up.
///
/// Line numbers in errors are 1-based. A song is only returned when no line
/// failed.
pub fn parse_lines<I, S>(lines: I) -> Result<Song, SongError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut events = Vec::new();
    let mut errors = Vec::new();

    for (idx, line) in lines.into_iter().enumerate() {
        let line_number = idx + 1;
        match parse_line(line.as_ref()) {
            Ok(event) => events.push(event),
            Err(kind) => errors.push(LineError {
                line: line_number,
                kind,
            }),
        }
    }

    if errors.is_empty() {
        Ok(Song::new(events))
    } else {
        Err(SongError::Invalid(errors))
    }
}

fn parse_line(line: &str) -> Result<NoteEvent, LineErrorKind> {
    let mut parts: Vec<&str> = line.split(' ').collect();
    // Trailing separators are tolerated: "C4 4 " reads as "C4 4"
    while parts.last() == Some(&"") {
        parts.pop();
    }

    let [note, length] = parts[..] else {
        return Err(LineErrorKind::Separator);
    };

    let pitch: Pitch = note
        .parse()
        .map_err(|_| LineErrorKind::UnknownNote(note.to_string()))?;
    let duration =
        Duration::from_code(length).ok_or_else(|| LineErrorKind::UnknownLength(length.to_string()))?;

    Ok(NoteEvent::new(pitch, duration))
}

/// Why a single line was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineErrorKind {
    #[error("note and length must be separated by a single space")]
    Separator,
    #[error("'{0}' is not a valid note (valid notes are: {names})", names = Pitch::valid_names())]
    UnknownNote(String),
    #[error("unknown length '{0}' (valid lengths are: {codes})", codes = Duration::valid_codes())]
    UnknownLength(String),
}

/// An invalid line of a song file
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line #{line} is invalid: {kind}")]
pub struct LineError {
    pub line: usize,
    pub kind: LineErrorKind,
}

#[derive(Debug, thiserror::Error)]
pub enum SongError {
    #[error("error loading song {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("song has {} invalid line(s)", .0.len())]
    Invalid(Vec<LineError>),
}

impl SongError {
    /// Line errors, if this is a validation failure
    pub fn line_errors(&self) -> &[LineError] {
        match self {
            SongError::Invalid(errors) => errors,
            SongError::SourceUnavailable { .. } => &[],
        }
    }
}
