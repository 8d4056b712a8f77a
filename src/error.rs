//! Error types for the Papago clipboard launcher
//!
//! Coordination failures carry the socket path they concern so the fatal log
//! line in `main` is self-explanatory. Contention with a live instance is not
//! an error and never shows up here.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for launcher operations
#[derive(Error, Debug)]
pub enum LauncherError {
    /// Binding the coordination socket failed for a reason other than contention
    #[error("Failed to bind coordination socket {}: {source}", .path.display())]
    Bind {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Connecting to an occupied coordination socket failed with something other than a refusal
    #[error("Failed to connect to coordination socket {}: {source}", .path.display())]
    Connect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The sidecar lock serialising claims could not be taken
    #[error("Failed to lock {}: {source}", .path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The socket stayed stale after the permitted number of reclaims
    #[error("Tried too many times to reclaim stale coordination socket {} ({attempts} attempts)", .path.display())]
    ReclaimExhausted { path: PathBuf, attempts: u32 },

    /// Signal handler registration failed
    #[error("Signal registration error: {0}")]
    Signal(std::io::Error),

    /// Clipboard could not be read
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// UI shell failed to navigate or run
    #[error("Shell error: {0}")]
    Shell(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for launcher operations
pub type Result<T> = std::result::Result<T, LauncherError>;
