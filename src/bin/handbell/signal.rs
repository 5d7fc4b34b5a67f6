//! Ctrl+C handling for the blocking player

use std::thread;

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tokio_util::sync::CancellationToken;

/// Cancel `cancel` when the process receives an interrupt.
///
/// The player itself is synchronous, so the signal is awaited on a small
/// current-thread runtime in its own thread.
pub fn cancel_on_interrupt(cancel: CancellationToken) -> EyreResult<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to start interrupt runtime")?;

    thread::Builder::new()
        .name("interrupt".into())
        .spawn(move || {
            runtime.block_on(async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        tracing::warn!("interrupt received, stopping playback");
                        cancel.cancel();
                    }
                    Err(err) => tracing::warn!(%err, "unable to listen for interrupt"),
                }
            })
        })
        .wrap_err("failed to spawn interrupt watcher")?;

    Ok(())
}
