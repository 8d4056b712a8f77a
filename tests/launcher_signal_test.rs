//! Startup with termination signal handling enabled
//!
//! Kept in its own test binary: the SIGINT/SIGABRT listener installed by the
//! launch stays registered for the rest of the process.

use async_trait::async_trait;
use papago_core::{
    launch, ClipboardSource, LaunchConfig, LaunchOutcome, OwnershipState, Result, Shell, SizeHint,
};
use std::path::PathBuf;
use tempfile::TempDir;

struct TextClipboard(&'static str);

impl ClipboardSource for TextClipboard {
    fn read_all(&self) -> Result<String> {
        Ok(self.0.to_string())
    }
}

/// Reports whether the socket was in place while the UI ran
struct CheckingShell {
    socket: PathBuf,
    socket_existed_during_run: bool,
}

#[async_trait]
impl Shell for CheckingShell {
    fn set_title(&mut self, _title: &str) {}

    fn set_size(&mut self, _width: u32, _height: u32, _hint: SizeHint) {}

    fn navigate(&mut self, _url: &str) -> Result<()> {
        Ok(())
    }

    async fn run(&mut self) -> Result<()> {
        self.socket_existed_during_run = self.socket.exists();
        Ok(())
    }
}

#[tokio::test]
async fn test_launch_with_signal_handling_releases_on_close() {
    let temp_dir = TempDir::new().unwrap();
    let config = LaunchConfig {
        runtime_dir: temp_dir.path().to_path_buf(),
        app_name: "papago-signal-launch-test".to_string(),
        handle_signals: true,
        ..LaunchConfig::default()
    };
    let mut shell = CheckingShell {
        socket: config.address().path().to_path_buf(),
        socket_existed_during_run: false,
    };

    let outcome = launch(&config, &TextClipboard("hola"), &mut shell)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        LaunchOutcome::Navigated {
            url: "https://papago.naver.com/?sk=auto&tk=vi&st=hola".to_string()
        }
    );
    assert!(shell.socket_existed_during_run);
    assert!(!config.address().path().exists());

    // The detached listener does not keep the address claimed
    let next = papago_core::acquire(&config.address()).await.unwrap();
    assert_eq!(next.state(), OwnershipState::ClaimedByThisProcess);
}
