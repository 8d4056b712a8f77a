//! Papago clipboard launcher
//!
//! Opens the Papago translator on whatever text is in the clipboard, with at
//! most one instance running per user session.
//!
//! # Architecture
//!
//! - **Instance**: Unix socket lock with stale-owner reclaim and signal cleanup
//! - **Encoding**: Script-aware percent-encoding of the clipboard text
//! - **Clipboard / Shell**: Collaborators behind traits (system clipboard, browser)
//! - **Launcher**: Startup routine tying them together
//!
//! # Example
//!
//! ```no_run
//! use papago_core::{launch, BrowserShell, LaunchConfig, SystemClipboard};
//!
//! #[tokio::main]
//! async fn main() -> papago_core::Result<()> {
//!     let config = LaunchConfig::default();
//!     let mut shell = BrowserShell::new();
//!     let outcome = launch(&config, &SystemClipboard::new(), &mut shell).await?;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```

pub mod clipboard;
pub mod config;
pub mod encoding;
pub mod error;
pub mod instance;
pub mod launcher;
pub mod shell;

// Re-export commonly used types
pub use clipboard::{ClipboardSource, SystemClipboard};
pub use config::LaunchConfig;
pub use encoding::encode_query;
pub use error::{LauncherError, Result};
pub use instance::{acquire, Acquisition, CoordinationAddress, InstanceGuard, OwnershipState};
pub use launcher::{launch, LaunchOutcome};
pub use shell::{BrowserShell, Shell, SizeHint};
