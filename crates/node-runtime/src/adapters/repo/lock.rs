//! # Repository Lock
//!
//! Uses `fs2` for cross-platform file locking (flock on Unix, LockFile on Windows).
//! Only one node may hold a repository at a time.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;
use tracing::debug;

use crate::ports::errors::RepoError;

/// Upper bound on the backoff between lock attempts.
const MAX_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Exclusive lock on a repository directory.
///
/// Acquired when the repository is opened, released on drop (RAII). The lock
/// file itself stays behind; deleting it would let a waiter holding the old
/// inode and a newcomer creating a fresh one both succeed.
#[derive(Debug)]
pub struct RepoLock {
    /// The lock file handle (kept open to maintain lock)
    file: File,
    /// Path to the lock file
    path: PathBuf,
}

impl RepoLock {
    /// Lock file name
    pub const LOCK_FILE: &'static str = "repo.lock";

    /// Acquire an exclusive lock on `repo_dir`.
    ///
    /// Retries with exponential backoff until `timeout` expires. A lock file
    /// left behind by a crashed process is not a problem: the OS dropped its
    /// flock with the process.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::Locked` if another holder keeps the lock past the
    /// timeout.
    pub fn acquire(repo_dir: &Path, timeout: Duration) -> Result<Self, RepoError> {
        let deadline = Instant::now() + timeout;
        let lock_path = repo_dir.join(Self::LOCK_FILE);
        let mut retry_delay = Duration::from_millis(50);

        loop {
            // Do not truncate: the current holder's pid lives in this file.
            let mut file = OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .truncate(false)
                .open(&lock_path)?;

            match file.try_lock_exclusive() {
                Ok(()) => {
                    file.set_len(0)?;
                    writeln!(file, "{}", std::process::id())?;
                    file.sync_all()?;
                    debug!("acquired repository lock {}", lock_path.display());
                    return Ok(Self {
                        file,
                        path: lock_path,
                    });
                }
                Err(e) if is_contended(&e) => {
                    if Instant::now() >= deadline {
                        return Err(RepoError::Locked {
                            pid: Self::read_existing_pid(&lock_path),
                            path: lock_path,
                        });
                    }

                    drop(file);
                    std::thread::sleep(retry_delay);
                    retry_delay = (retry_delay * 2).min(MAX_RETRY_DELAY);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Get the path to the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read PID from existing lock file (for error messages)
    fn read_existing_pid(path: &Path) -> Option<u32> {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }
}

/// Whether a failed `try_lock_exclusive` means someone else holds the lock,
/// as opposed to the lock call itself failing.
fn is_contended(e: &io::Error) -> bool {
    let contended = fs2::lock_contended_error();
    match (e.raw_os_error(), contended.raw_os_error()) {
        (Some(code), Some(expected)) => code == expected,
        _ => e.kind() == contended.kind(),
    }
}

impl Drop for RepoLock {
    fn drop(&mut self) {
        #[allow(clippy::incompatible_msrv)]
        let _ = FileExt::unlock(&self.file);
        debug!("released repository lock {}", self.path.display());
    }
}
