//! Termination signal cleanup
//!
//! SIGINT and SIGABRT remove the coordination socket before the process
//! goes away. SIGKILL and SIGSTOP cannot be caught; a socket left behind by
//! them is reclaimed by the next invocation instead.

use super::AddressRelease;
use crate::error::{LauncherError, Result};
use nix::sys::signal::Signal;
use tokio::signal::unix::{signal, SignalKind};
use tokio::task::JoinHandle;
use tracing::info;

/// Register SIGINT/SIGABRT handlers and spawn the task waiting on them.
///
/// Handlers are registered before this returns. On the first signal the
/// task releases the socket and then runs `on_released` (the process exit,
/// outside of tests).
pub fn spawn_release_on_signal<F>(release: AddressRelease, on_released: F) -> Result<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    let mut interrupt = signal(SignalKind::interrupt()).map_err(LauncherError::Signal)?;
    let mut abort =
        signal(SignalKind::from_raw(Signal::SIGABRT as i32)).map_err(LauncherError::Signal)?;

    Ok(tokio::spawn(async move {
        let received = tokio::select! {
            _ = interrupt.recv() => Signal::SIGINT,
            _ = abort.recv() => Signal::SIGABRT,
        };

        info!("got signal {}", received.as_str());
        release.release();
        on_released();
    }))
}
