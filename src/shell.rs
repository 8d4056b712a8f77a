//! UI shell the translator page is shown in
//!
//! The launcher drives the shell through [`Shell`]: title and size first,
//! then a single navigation, then `run` until the UI goes away. Dropping the
//! shell destroys it.

use crate::error::{LauncherError, Result};
use async_trait::async_trait;
use tracing::{debug, info};

/// Window sizing hint, as understood by webview-style shells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeHint {
    /// Width and height are the default size
    #[default]
    None,
    /// Width and height are the minimum bounds
    Min,
    /// Width and height are the maximum bounds
    Max,
    /// Window cannot be resized
    Fixed,
}

/// A window (or stand-in) that can show one page
#[async_trait]
pub trait Shell: Send {
    fn set_title(&mut self, title: &str);

    fn set_size(&mut self, width: u32, height: u32, hint: SizeHint);

    /// Load `url`
    fn navigate(&mut self, url: &str) -> Result<()>;

    /// Resolve once the UI is closed
    async fn run(&mut self) -> Result<()>;
}

/// Shows the page in the system web browser.
///
/// The browser owns the window, so title and size are only recorded. `run`
/// never resolves on its own: the instance stays claimed until a
/// termination signal ends the process.
#[derive(Debug, Default)]
pub struct BrowserShell {
    title: String,
    size: Option<(u32, u32, SizeHint)>,
    current_url: Option<String>,
}

impl BrowserShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }
}

#[async_trait]
impl Shell for BrowserShell {
    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_size(&mut self, width: u32, height: u32, hint: SizeHint) {
        debug!("Browser shell ignores window size {}x{} ({:?})", width, height, hint);
        self.size = Some((width, height, hint));
    }

    fn navigate(&mut self, url: &str) -> Result<()> {
        webbrowser::open(url)
            .map_err(|e| LauncherError::Shell(format!("Failed to open browser: {}", e)))?;
        self.current_url = Some(url.to_string());
        Ok(())
    }

    async fn run(&mut self) -> Result<()> {
        if self.current_url.is_none() {
            return Err(LauncherError::Shell(
                "run called before navigate".to_string(),
            ));
        }

        info!("{} opened in browser, press Ctrl+C to release the instance", self.title);
        std::future::pending::<()>().await;
        Ok(())
    }
}
