//! Startup routine
//!
//! Claims the instance, reads the clipboard and points the shell at the
//! translator. The coordination socket is released whichever way this
//! returns, because the [`InstanceGuard`](crate::instance::InstanceGuard)
//! lives on this function's stack.

use crate::clipboard::ClipboardSource;
use crate::config::LaunchConfig;
use crate::encoding::encode_query;
use crate::error::Result;
use crate::instance::{acquire, Acquisition};
use crate::shell::{Shell, SizeHint};
use tracing::{debug, info, warn};

/// How a launch ended, when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The shell showed `url` and was closed
    Navigated { url: String },
    /// Another live instance owns the coordination socket
    AlreadyRunning,
    /// Clipboard was unreadable, empty, or only whitespace
    EmptyClipboard,
}

/// Run one launcher invocation.
///
/// Fatal coordination and shell errors are returned; ceding to a running
/// instance and an empty clipboard are ordinary outcomes.
pub async fn launch(
    config: &LaunchConfig,
    clipboard: &dyn ClipboardSource,
    shell: &mut dyn Shell,
) -> Result<LaunchOutcome> {
    config.validate()?;

    let address = config.address();
    info!("socket file: <{}>", address);

    let guard = match acquire(&address).await? {
        Acquisition::Claimed(guard) => guard,
        Acquisition::ClaimedByOther => {
            info!("Translator already running, exiting");
            return Ok(LaunchOutcome::AlreadyRunning);
        }
    };

    if config.handle_signals {
        guard.release_on_signal()?;
    }

    shell.set_title(&config.title);
    shell.set_size(config.width, config.height, SizeHint::None);

    let text = match clipboard.read_all() {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            warn!("Clipboard is empty, nothing to translate");
            return Ok(LaunchOutcome::EmptyClipboard);
        }
        Err(e) => {
            warn!("Clipboard read failed: {}", e);
            return Ok(LaunchOutcome::EmptyClipboard);
        }
    };
    debug!("got clipboard text: [{}]", text);

    let url = format!("{}{}", config.base_url(), encode_query(&text));
    shell.navigate(&url)?;
    info!("navigate to: {}", url);

    shell.run().await?;
    debug!("Shell closed, releasing {}", guard.address());

    Ok(LaunchOutcome::Navigated { url })
}
