//! Lock files and atomic replacement for files in the data directory.
//!
//! A save takes `<file>.lock` exclusively (fs2/flock), writes a temporary
//! sibling and renames it over the target. Readers never take the lock; the
//! rename guarantees they see either the old or the new file.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;

use crate::error::{Error, Result};

/// How long a save waits for another writer before giving up
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5000;

const RETRY_EVERY: Duration = Duration::from_millis(50);

/// Held exclusive lock; released on drop.
pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    /// Wait up to `timeout_ms` for the lock at `path`, creating the lock file
    /// if needed. Fails with `Error::LockFailed` on timeout.
    pub fn acquire(path: impl AsRef<Path>, timeout_ms: u64) -> Result<Self> {
        let path = path.as_ref();
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        let mut file = open_lock_file(path)?;

        loop {
            match Self::attempt(file, path)? {
                Ok(lock) => return Ok(lock),
                Err(unlocked) if Instant::now() < deadline => {
                    tracing::debug!(path = %path.display(), "lock busy, retrying");
                    std::thread::sleep(RETRY_EVERY);
                    file = unlocked;
                }
                Err(_) => return Err(Error::LockFailed(path.to_path_buf())),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// One non-blocking attempt. The inner `Err` hands the file back when
    /// another holder has the lock.
    fn attempt(file: File, path: &Path) -> Result<std::result::Result<Self, File>> {
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Ok(FileLock {
                file,
                path: path.to_path_buf(),
            })),
            Err(err) if is_contended(&err) => Ok(Err(file)),
            Err(err) => Err(Error::Io(err)),
        }
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

fn is_contended(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::WouldBlock {
        return true;
    }
    // ERROR_SHARING_VIOLATION / ERROR_LOCK_VIOLATION
    cfg!(windows) && matches!(err.raw_os_error(), Some(32) | Some(33))
}

fn open_lock_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?)
}

/// Lock file that guards `path`: `<path>.lock`
pub fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

/// Replace `path` with `data` via a temporary sibling and a rename.
/// Creates missing parent directories. Takes no lock.
pub fn write_atomic(path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(format!(".tmp.{}", std::process::id()));
    let temp_path = PathBuf::from(temp_name);

    let mut temp = File::create(&temp_path)?;
    temp.write_all(data)?;
    temp.sync_all()?;
    drop(temp);

    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }
    Ok(())
}

/// [`write_atomic`] under `<path>.lock`
pub fn write_atomic_locked(path: impl AsRef<Path>, data: &[u8], timeout_ms: u64) -> Result<()> {
    let path = path.as_ref();
    let _guard = FileLock::acquire(lock_path_for(path), timeout_ms)?;
    write_atomic(path, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn lock_is_exclusive_until_dropped() {
        let temp_dir = TempDir::new().unwrap();
        let lock_path = lock_path_for(&temp_dir.path().join("video-prod-tracker-v1.json"));
        assert!(lock_path.ends_with("video-prod-tracker-v1.json.lock"));

        let held = FileLock::acquire(&lock_path, 1000).unwrap();
        assert_eq!(held.path(), lock_path.as_path());
        assert!(matches!(
            FileLock::acquire(&lock_path, 60),
            Err(Error::LockFailed(_))
        ));

        drop(held);
        assert!(FileLock::acquire(&lock_path, 0).is_ok());
    }

    #[test]
    fn atomic_write_replaces_and_leaves_no_temp() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("set.json");

        write_atomic(&path, b"{\"projects\":[]}").unwrap();
        write_atomic(&path, b"{}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");

        let entries = fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn concurrent_locked_writes_never_tear() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("set.json");
        let writers = 6;
        let barrier = Arc::new(Barrier::new(writers));

        let payloads: Vec<String> = (0..writers)
            .map(|idx| format!("{{\"writer\":{idx},\"tasks\":\"{}\"}}", "t".repeat(64)))
            .collect();
        let handles: Vec<_> = payloads
            .iter()
            .cloned()
            .map(|payload| {
                let barrier = Arc::clone(&barrier);
                let path = path.clone();
                thread::spawn(move || {
                    barrier.wait();
                    write_atomic_locked(&path, payload.as_bytes(), 2000).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let contents = fs::read_to_string(&path).unwrap();
        assert!(payloads.contains(&contents));
    }
}
