//! Sidecar lock serialising claims and releases of a coordination socket
//!
//! The lock file sits next to the socket as `<app>.sock.lock` and is never
//! removed; only the advisory `flock` on it matters. It is held for the
//! bind/connect/unlink sequence only, never across an `.await`.

use crate::error::{LauncherError, Result};
use nix::fcntl::{Flock, FlockArg};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Exclusive lock on the socket's sidecar file, released on drop
pub(crate) struct CoordinationLock {
    _lock: Flock<File>,
}

pub(crate) fn lock_path(socket_path: &Path) -> PathBuf {
    let mut name = socket_path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

impl CoordinationLock {
    /// Block until the lock for `socket_path` is held
    pub(crate) fn acquire(socket_path: &Path) -> Result<Self> {
        let path = lock_path(socket_path);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|source| LauncherError::Lock {
                path: path.clone(),
                source,
            })?;

        let lock = Flock::lock(file, FlockArg::LockExclusive).map_err(|(_, errno)| {
            LauncherError::Lock {
                path,
                source: io::Error::from(errno),
            }
        })?;

        Ok(Self { _lock: lock })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lock_path_appends_suffix() {
        assert_eq!(
            lock_path(Path::new("/tmp/papago-translator-linux.sock")),
            Path::new("/tmp/papago-translator-linux.sock.lock")
        );
    }

    #[test]
    fn test_lock_is_reacquirable_after_drop() {
        let temp = TempDir::new().unwrap();
        let socket = temp.path().join("app.sock");

        let first = CoordinationLock::acquire(&socket).unwrap();
        drop(first);
        let _second = CoordinationLock::acquire(&socket).unwrap();

        assert!(lock_path(&socket).exists());
    }

    #[test]
    fn test_missing_directory_is_lock_error() {
        let temp = TempDir::new().unwrap();
        let socket = temp.path().join("missing").join("app.sock");

        assert!(matches!(
            CoordinationLock::acquire(&socket),
            Err(LauncherError::Lock { .. })
        ));
    }
}
