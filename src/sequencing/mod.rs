pub mod duration;
pub mod notes;
pub mod song;

pub use duration::Duration;
pub use notes::Pitch;
pub use song::{parse_lines, LineError, LineErrorKind, NoteEvent, Song, SongError};
