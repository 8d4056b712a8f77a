//! Launch configuration
//!
//! Values parsed from the command line are collected into [`LaunchConfig`]
//! and handed to [`crate::launcher::launch`]; nothing is kept in globals.

use crate::error::{LauncherError, Result};
use crate::instance::CoordinationAddress;
use std::path::PathBuf;

/// Name the coordination socket is derived from
pub const APP_NAME: &str = "papago-translator-linux";

/// Window title requested from the shell
pub const WINDOW_TITLE: &str = "Papago-linux";

const TRANSLATOR_URL: &str = "https://papago.naver.com/";

/// Launch configuration
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// Window width in pixels
    pub width: u32,

    /// Window height in pixels
    pub height: u32,

    /// Window title
    pub title: String,

    /// Application name, used for the socket file name
    pub app_name: String,

    /// Directory holding the coordination socket
    pub runtime_dir: PathBuf,

    /// Translator source language (`sk`)
    pub source_lang: String,

    /// Translator target language (`tk`)
    pub target_lang: String,

    /// Install SIGINT/SIGABRT cleanup once the socket is claimed
    pub handle_signals: bool,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: WINDOW_TITLE.to_string(),
            app_name: APP_NAME.to_string(),
            runtime_dir: std::env::temp_dir(),
            source_lang: "auto".to_string(),
            target_lang: "vi".to_string(),
            handle_signals: true,
        }
    }
}

impl LaunchConfig {
    /// Coordination socket for this configuration
    pub fn address(&self) -> CoordinationAddress {
        CoordinationAddress::in_dir(&self.runtime_dir, &self.app_name)
    }

    /// Translator URL prefix; the encoded clipboard text is appended verbatim
    pub fn base_url(&self) -> String {
        format!(
            "{}?sk={}&tk={}&st=",
            TRANSLATOR_URL, self.source_lang, self.target_lang
        )
    }

    /// Reject values the shell or the socket path cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(LauncherError::Config(format!(
                "window size must be positive, got {}x{}",
                self.width, self.height
            )));
        }

        if self.app_name.is_empty() || self.app_name.contains('/') {
            return Err(LauncherError::Config(format!(
                "invalid application name: {:?}",
                self.app_name
            )));
        }

        for (name, lang) in [("source", &self.source_lang), ("target", &self.target_lang)] {
            if lang.is_empty() || !lang.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err(LauncherError::Config(format!(
                    "invalid {} language: {:?}",
                    name, lang
                )));
            }
        }

        Ok(())
    }
}
