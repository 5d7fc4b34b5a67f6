//! Real-time playback of a parsed song.
//!
//! This module provides the `Player`, which walks a `Song` note by note,
//! writes each pitch's samples to a `PcmSink` and paces itself so the song
//! plays at its nominal tempo.
//!
//! # Example
//!
//! ```ignore
//! use handbell::{io::CpalSink, runtime::Player, sequencing::Song, PlayerConfig};
//!
//! fn main() -> color_eyre::Result<()> {
//!     let config = PlayerConfig::default();
//!     let song = Song::parse("C4 4\nD4 4\nE4 2")?;
//!     let mut sink = CpalSink::new(&config);
//!     Player::new(config).play(&song, &mut sink)?;
//!     Ok(())
//! }
//! ```

mod pacer;
mod player;

pub use pacer::{Pacer, RealTimePacer};
pub use player::{PlaybackError, PlaybackReport, PlaybackState, Player};
