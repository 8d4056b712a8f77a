//! Clipboard access
//!
//! The launcher only ever reads the clipboard once, at startup.

use crate::error::{LauncherError, Result};

/// Source of the text to translate
pub trait ClipboardSource {
    /// Read the whole clipboard as text
    fn read_all(&self) -> Result<String>;
}

/// System clipboard backed by `arboard`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl ClipboardSource for SystemClipboard {
    fn read_all(&self) -> Result<String> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| LauncherError::Clipboard(format!("clipboard init: {}", e)))?;
        clipboard
            .get_text()
            .map_err(|e| LauncherError::Clipboard(format!("clipboard read: {}", e)))
    }
}
