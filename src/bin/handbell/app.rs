//! Load, validate and play one song

use std::path::Path;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use color_eyre::{Section, SectionExt};
use tokio_util::sync::CancellationToken;

use handbell::{
    io::CpalSink,
    runtime::Player,
    sequencing::{Song, SongError},
};

use super::signal;
use super::Args;

pub fn run(args: &Args) -> EyreResult<()> {
    let config = args.player_config();
    let song = load(&args.song)?;

    let nominal_ms = song.nominal_time_ms(config.measure_length_secs);
    tracing::info!(
        notes = song.len(),
        seconds = nominal_ms as f64 / 1000.0,
        "loaded {}",
        args.song.display()
    );

    if args.check {
        println!("{}: {} notes, ok", args.song.display(), song.len());
        return Ok(());
    }

    let cancel = CancellationToken::new();
    signal::cancel_on_interrupt(cancel.clone())?;

    let mut player = Player::new(config).cancel_token(cancel.clone());
    if !args.quiet {
        player = player.on_note(|event| println!("Playing note: {}", event.pitch));
    }

    let mut sink = CpalSink::new(&config).cancel_token(cancel);
    player
        .play(&song, &mut sink)
        .wrap_err("error playing song")?;

    Ok(())
}

fn load(path: &Path) -> EyreResult<Song> {
    match Song::load(path) {
        Ok(song) => Ok(song),
        Err(err @ SongError::Invalid(_)) => {
            let lines: Vec<String> = err.line_errors().iter().map(|e| e.to_string()).collect();
            Err(eyre!("{}: {err}", path.display()))
                .with_section(move || lines.join("\n").header("Invalid lines:"))
        }
        Err(err) => Err(err).wrap_err("couldn't read song"),
    }
}
