//! Single-instance coordination over a Unix domain socket
//!
//! The socket file at [`CoordinationAddress`] doubles as the instance lock:
//! whoever holds a listener bound to it is the running instance.
//!
//! # Protocol
//! - bind succeeds: this process owns the address until its
//!   [`InstanceGuard`] is dropped or a termination signal arrives
//! - bind reports the address in use: connect to it as a client
//!   - connected: a live instance exists, cede to it
//!   - refused: the owner died without cleanup (SIGKILL, SIGSTOP), remove
//!     the file and bind again, at most [`MAX_RECLAIMS`] times
//! - anything else is fatal
//!
//! All of the above, and the unlink on release, happen under a `flock` on
//! the sidecar `<app>.sock.lock`.

use crate::error::{LauncherError, Result};
use lock::CoordinationLock;
use nix::errno::Errno;
use std::fmt;
use std::io;
use std::os::unix::fs::MetadataExt;
use std::os::unix::net::{UnixListener as StdUnixListener, UnixStream as StdUnixStream};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::UnixListener;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

mod lock;
pub mod signals;

/// How many stale sockets one `acquire` call may remove before giving up
pub const MAX_RECLAIMS: u32 = 1;

const ACCEPT_BACKOFF: std::time::Duration = std::time::Duration::from_millis(100);

/// Filesystem path of the coordination socket
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CoordinationAddress {
    path: PathBuf,
}

impl CoordinationAddress {
    /// `<temp dir>/<app_name>.sock`
    pub fn for_app(app_name: &str) -> Self {
        Self::in_dir(std::env::temp_dir(), app_name)
    }

    /// `<dir>/<app_name>.sock`
    pub fn in_dir(dir: impl AsRef<Path>, app_name: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.sock", app_name)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for CoordinationAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Who holds the coordination address, from this process' point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipState {
    /// Nobody, or this process already released it
    Unclaimed,
    /// This process holds the bound listener
    ClaimedByThisProcess,
    /// A live peer holds the bound listener
    ClaimedByOther,
}

/// Outcome of [`acquire`]
#[derive(Debug)]
pub enum Acquisition {
    /// Address claimed; keep the guard alive for as long as the instance runs
    Claimed(InstanceGuard),
    /// A live instance already owns the address
    ClaimedByOther,
}

impl Acquisition {
    pub fn state(&self) -> OwnershipState {
        match self {
            Acquisition::Claimed(guard) => guard.state(),
            Acquisition::ClaimedByOther => OwnershipState::ClaimedByOther,
        }
    }

    pub fn into_guard(self) -> Option<InstanceGuard> {
        match self {
            Acquisition::Claimed(guard) => Some(guard),
            Acquisition::ClaimedByOther => None,
        }
    }
}

/// Result of connecting to an occupied address
#[derive(Debug)]
enum Liveness {
    Alive,
    Stale,
    Failed(io::Error),
}

fn classify_connect<T>(result: io::Result<T>) -> Liveness {
    match result {
        // Connection is closed right away, the peer only sees an empty accept
        Ok(_) => Liveness::Alive,
        Err(e) if has_errno(&e, Errno::ECONNREFUSED) => Liveness::Stale,
        Err(e) => Liveness::Failed(e),
    }
}

fn has_errno(err: &io::Error, errno: Errno) -> bool {
    err.raw_os_error() == Some(errno as i32)
}

/// Filesystem steps the claim sequence is made of
trait Endpoint {
    type Listener;

    fn bind(&mut self) -> io::Result<Self::Listener>;

    fn check_liveness(&mut self) -> Liveness;

    fn remove(&mut self) -> Result<()>;
}

#[derive(Debug)]
enum Claim<L> {
    Bound(L),
    Alive,
}

/// Bind, or connect to the holder and reclaim a stale socket at most
/// [`MAX_RECLAIMS`] times. Runs with the sidecar lock held.
fn reconcile<E: Endpoint>(endpoint: &mut E, path: &Path) -> Result<Claim<E::Listener>> {
    let mut reclaims = 0;

    loop {
        let bind_err = match endpoint.bind() {
            Ok(listener) => return Ok(Claim::Bound(listener)),
            Err(e) => e,
        };

        if !has_errno(&bind_err, Errno::EADDRINUSE) {
            return Err(LauncherError::Bind {
                path: path.to_path_buf(),
                source: bind_err,
            });
        }

        match endpoint.check_liveness() {
            Liveness::Alive => return Ok(Claim::Alive),
            Liveness::Stale => {
                if reclaims >= MAX_RECLAIMS {
                    return Err(LauncherError::ReclaimExhausted {
                        path: path.to_path_buf(),
                        attempts: reclaims + 1,
                    });
                }
                warn!("Found stale coordination socket {}, removing", path.display());
                endpoint.remove()?;
                reclaims += 1;
            }
            Liveness::Failed(source) => {
                return Err(LauncherError::Connect {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }
    }
}

/// The real socket file
struct SocketEndpoint<'a> {
    path: &'a Path,
}

impl Endpoint for SocketEndpoint<'_> {
    type Listener = StdUnixListener;

    fn bind(&mut self) -> io::Result<StdUnixListener> {
        StdUnixListener::bind(self.path)
    }

    fn check_liveness(&mut self) -> Liveness {
        classify_connect(StdUnixStream::connect(self.path))
    }

    fn remove(&mut self) -> Result<()> {
        remove_address(self.path)
    }
}

/// Device and inode of the socket file this process bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SocketIdentity {
    dev: u64,
    ino: u64,
}

impl SocketIdentity {
    fn of(path: &Path) -> io::Result<Self> {
        let meta = std::fs::symlink_metadata(path)?;
        Ok(Self {
            dev: meta.dev(),
            ino: meta.ino(),
        })
    }
}

/// Claim the coordination address or find out who holds it.
///
/// The bind/connect/unlink sequence runs under an exclusive lock on
/// `<socket>.lock`, so two invocations finding the same stale socket cannot
/// both reclaim it. Must be called from within a Tokio runtime; a successful
/// claim spawns the task answering liveness checks from later invocations.
pub async fn acquire(address: &CoordinationAddress) -> Result<Acquisition> {
    let path = address.path();

    let (listener, release) = {
        let _lock = CoordinationLock::acquire(path)?;
        let listener = match reconcile(&mut SocketEndpoint { path }, path)? {
            Claim::Bound(listener) => listener,
            Claim::Alive => {
                info!("Another instance is running on {}", address);
                return Ok(Acquisition::ClaimedByOther);
            }
        };

        let identity = match SocketIdentity::of(path) {
            Ok(identity) => identity,
            Err(e) => {
                drop(listener);
                remove_address(path)?;
                return Err(e.into());
            }
        };
        (listener, AddressRelease::new(path.to_path_buf(), identity))
    };

    let listener = match listener
        .set_nonblocking(true)
        .and_then(|()| UnixListener::from_std(listener))
    {
        Ok(listener) => listener,
        Err(e) => {
            release.release();
            return Err(e.into());
        }
    };

    info!("Claimed coordination socket {}", address);
    Ok(Acquisition::Claimed(InstanceGuard::new(
        listener,
        address.clone(),
        release,
    )))
}

/// Remove a coordination socket file. A missing file is not an error.
pub fn remove_address(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed coordination socket {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[derive(Debug)]
struct ReleaseState {
    path: PathBuf,
    identity: SocketIdentity,
    released: AtomicBool,
}

/// Single-use handle removing the coordination socket.
///
/// Shared by the guard's drop and the signal listener; whichever runs first
/// removes the file, the other one does nothing. The file is only removed if
/// it is still the socket this process bound.
#[derive(Debug, Clone)]
pub struct AddressRelease {
    state: Arc<ReleaseState>,
}

impl AddressRelease {
    fn new(path: PathBuf, identity: SocketIdentity) -> Self {
        Self {
            state: Arc::new(ReleaseState {
                path,
                identity,
                released: AtomicBool::new(false),
            }),
        }
    }

    /// Remove the socket file. Returns `false` if it was already released.
    pub fn release(&self) -> bool {
        if self.state.released.swap(true, Ordering::SeqCst) {
            return false;
        }

        let path = &self.state.path;
        let _lock = CoordinationLock::acquire(path)
            .map_err(|e| warn!("Releasing {} without lock: {}", path.display(), e))
            .ok();

        match SocketIdentity::of(path) {
            Ok(current) if current == self.state.identity => {
                if let Err(e) = remove_address(path) {
                    warn!("Failed to remove coordination socket {}: {}", path.display(), e);
                }
            }
            Ok(_) => warn!(
                "Coordination socket {} was replaced by another instance, leaving it",
                path.display()
            ),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to inspect coordination socket {}: {}", path.display(), e),
        }
        true
    }

    pub fn is_released(&self) -> bool {
        self.state.released.load(Ordering::SeqCst)
    }

    pub fn path(&self) -> &Path {
        &self.state.path
    }
}

/// Ownership of the coordination address for this process.
///
/// Dropping the guard removes the socket file and stops answering liveness checks.
#[derive(Debug)]
pub struct InstanceGuard {
    address: CoordinationAddress,
    release: AddressRelease,
    accept_task: JoinHandle<()>,
}

impl InstanceGuard {
    fn new(listener: UnixListener, address: CoordinationAddress, release: AddressRelease) -> Self {
        let accept_task = tokio::spawn(answer_liveness_checks(listener, address.clone()));

        Self {
            address,
            release,
            accept_task,
        }
    }

    pub fn address(&self) -> &CoordinationAddress {
        &self.address
    }

    pub fn state(&self) -> OwnershipState {
        if self.release.is_released() {
            OwnershipState::Unclaimed
        } else {
            OwnershipState::ClaimedByThisProcess
        }
    }

    /// Handle that removes the socket file, usable after the guard moves
    pub fn release_handle(&self) -> AddressRelease {
        self.release.clone()
    }

    /// Remove the socket file and exit with status 0 on SIGINT or SIGABRT.
    ///
    /// The listener task is detached and keeps running after the guard is
    /// dropped, so a late signal still terminates the process.
    pub fn release_on_signal(&self) -> Result<()> {
        signals::spawn_release_on_signal(self.release.clone(), || std::process::exit(0))?;
        Ok(())
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        // Unlink before the listener stops answering
        if self.release.release() {
            info!("Released coordination socket {}", self.address);
        }
        self.accept_task.abort();
    }
}

/// Accept and immediately drop connections so peers see a live owner
async fn answer_liveness_checks(listener: UnixListener, address: CoordinationAddress) {
    loop {
        match listener.accept().await {
            Ok((stream, _addr)) => {
                debug!("Answered liveness check on {}", address);
                drop(stream);
            }
            Err(e) => {
                warn!("Failed to accept on coordination socket {}: {}", address, e);
                tokio::time::sleep(ACCEPT_BACKOFF).await;
            }
        }
    }
}
