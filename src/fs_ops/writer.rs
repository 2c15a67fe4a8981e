//! Atomic durable write.
//!
//! Protocol, in strict order:
//!  1. temp path = `<target name><10 random letters>.tmp` in the target's directory
//!  2. exclusive create (0600)
//!  3. write payload
//!  4. fsync
//!  5. close
//!  6. chmod to the requested mode
//!  7. rename onto the target (the only step that touches it)
//!
//! Any failure in 2-7 deletes the temp file before returning, so a reported
//! failure always leaves the target exactly as it was.

use std::path::Path;
use std::time::Instant;
use tracing::debug;

use super::atomic::RetryPolicy;
use super::primitives::{FileSystem, StdFs};
use super::temp::TempFile;
use super::util::temp_path_for;
use crate::config::Config;
use crate::errors::AtomicWriteError;
use crate::shutdown;

/// One write: destination, bytes and final permission bits.
#[derive(Debug, Clone, Copy)]
pub struct WriteRequest<'a> {
    pub target: &'a Path,
    pub payload: &'a [u8],
    pub mode: u32,
}

impl<'a> WriteRequest<'a> {
    pub fn new(target: &'a Path, payload: &'a [u8], mode: u32) -> Self {
        Self {
            target,
            payload,
            mode,
        }
    }
}

/// Stateless between calls; holds only the filesystem backend and retry policy.
#[derive(Debug, Clone, Default)]
pub struct AtomicWriter<F = StdFs> {
    fs: F,
    retry: RetryPolicy,
}

impl AtomicWriter<StdFs> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writer using the retry settings from `cfg`.
    pub fn from_config(cfg: &Config) -> Self {
        Self::new().with_retry(cfg.retry_policy())
    }
}

impl<F: FileSystem> AtomicWriter<F> {
    pub fn with_fs(fs: F) -> Self {
        Self {
            fs,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn write_atomically(
        &self,
        target: impl AsRef<Path>,
        payload: impl AsRef<[u8]>,
        mode: u32,
    ) -> Result<(), AtomicWriteError> {
        self.write(&WriteRequest::new(target.as_ref(), payload.as_ref(), mode))
    }

    pub fn write(&self, req: &WriteRequest<'_>) -> Result<(), AtomicWriteError> {
        let tmp_path = temp_path_for(req.target)?;

        // Last point where stopping is allowed; past here the call runs to commit or cleanup.
        if shutdown::is_requested() {
            return Err(AtomicWriteError::Interrupted(req.target.to_path_buf()));
        }

        let start = Instant::now();
        debug!(
            path = %req.target.display(),
            tmp = %tmp_path.display(),
            bytes = req.payload.len(),
            mode = %format!("{:o}", req.mode),
            "atomic write start"
        );

        let mut tmp = TempFile::create(&self.fs, tmp_path)?;
        tmp.write_all(req.payload)?;
        tmp.sync()?;
        tmp.close()?;
        tmp.set_mode(req.mode)?;
        let attempts = tmp.commit(req.target, self.retry)?;

        debug!(
            path = %req.target.display(),
            attempts,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "atomic write committed"
        );
        Ok(())
    }
}

/// Atomically replace (or create) `target` with `payload` using the real filesystem
/// and the default retry policy.
pub fn write_atomically(
    target: impl AsRef<Path>,
    payload: impl AsRef<[u8]>,
    mode: u32,
) -> Result<(), AtomicWriteError> {
    AtomicWriter::new().write_atomically(target, payload, mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Step;
    use std::fs::{self, File};
    use std::io;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use tempfile::tempdir;

    fn tmp_leftovers(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .flatten()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".tmp"))
            .collect()
    }

    struct FailingSync;

    impl FileSystem for FailingSync {
        fn sync(&self, _file: &File) -> io::Result<()> {
            Err(io::Error::other("simulated fsync failure"))
        }
    }

    struct FailingWrite;

    impl FileSystem for FailingWrite {
        fn write_all(&self, file: &mut File, data: &[u8]) -> io::Result<()> {
            use std::io::Write;
            // leave a partial payload behind before failing
            file.write_all(&data[..data.len() / 2])?;
            Err(io::Error::from_raw_os_error(28))
        }
    }

    struct FailingChmod;

    impl FileSystem for FailingChmod {
        fn set_mode(&self, _path: &Path, _mode: u32) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::PermissionDenied))
        }
    }

    #[derive(Default)]
    struct LockedRename {
        calls: AtomicU32,
    }

    impl FileSystem for LockedRename {
        fn rename(&self, _from: &Path, _to: &Path) -> io::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "Access is denied."))
        }
    }

    #[test]
    fn writes_new_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("greeting.txt");
        write_atomically(&target, b"hello", 0o644).unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"hello");
        assert!(tmp_leftovers(dir.path()).is_empty());
    }

    #[test]
    fn replaces_existing_file_and_is_idempotent() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("state.json");
        fs::write(&target, b"old contents that are longer").unwrap();

        write_atomically(&target, b"{}", 0o600).unwrap();
        write_atomically(&target, b"{}", 0o600).unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"{}");
        assert!(tmp_leftovers(dir.path()).is_empty());
    }

    #[test]
    fn empty_payload_creates_empty_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("empty");
        write_atomically(&target, b"", 0o644).unwrap();
        assert_eq!(fs::metadata(&target).unwrap().len(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn final_mode_matches_request() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir().unwrap();
        for mode in [0o600, 0o640, 0o644, 0o755] {
            let target = dir.path().join(format!("f{mode:o}"));
            write_atomically(&target, b"x", mode).unwrap();
            let got = fs::metadata(&target).unwrap().permissions().mode() & 0o7777;
            assert_eq!(got, mode, "mode {mode:o}");
        }
    }

    #[test]
    fn sync_failure_leaves_no_target_and_no_temp() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("never.txt");
        let err = AtomicWriter::with_fs(FailingSync)
            .write_atomically(&target, b"hello", 0o644)
            .unwrap_err();
        assert_eq!(err.step(), Some(Step::Sync));
        assert!(!target.exists());
        assert!(tmp_leftovers(dir.path()).is_empty());
    }

    #[test]
    fn write_failure_keeps_old_content() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("keep.txt");
        fs::write(&target, b"original").unwrap();
        let err = AtomicWriter::with_fs(FailingWrite)
            .write_atomically(&target, b"replacement", 0o644)
            .unwrap_err();
        assert_eq!(err.step(), Some(Step::Write));
        assert_eq!(fs::read(&target).unwrap(), b"original");
        assert!(tmp_leftovers(dir.path()).is_empty());
    }

    #[test]
    fn chmod_failure_is_reported_with_path() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("mode.txt");
        let err = AtomicWriter::with_fs(FailingChmod)
            .write_atomically(&target, b"x", 0o644)
            .unwrap_err();
        match &err {
            AtomicWriteError::Resource { step, path, .. } => {
                assert_eq!(*step, Step::SetPermissions);
                assert_eq!(path.parent(), Some(dir.path()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!target.exists());
        assert!(tmp_leftovers(dir.path()).is_empty());
    }

    #[test]
    fn locked_rename_is_attempted_three_times() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("locked.txt");
        fs::write(&target, b"before").unwrap();

        let fs_double = LockedRename::default();
        let writer = AtomicWriter::with_fs(&fs_double)
            .with_retry(RetryPolicy::new(3, Duration::from_millis(5)));
        let err = writer.write_atomically(&target, b"after", 0o644).unwrap_err();

        assert_eq!(fs_double.calls.load(Ordering::SeqCst), 3);
        assert!(matches!(err, AtomicWriteError::TransientLock { attempts: 3, .. }));
        assert_eq!(fs::read(&target).unwrap(), b"before");
        assert!(tmp_leftovers(dir.path()).is_empty());
    }

    #[test]
    fn missing_directory_fails_at_create() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("no").join("such").join("file");
        let err = write_atomically(&target, b"x", 0o644).unwrap_err();
        assert_eq!(err.step(), Some(Step::CreateTemp));
    }

    #[test]
    fn writer_from_config_uses_configured_retry() {
        let mut cfg = Config::default();
        cfg.retry_attempts = 5;
        cfg.retry_delay = Duration::from_millis(10);
        let writer = AtomicWriter::from_config(&cfg);
        assert_eq!(writer.retry_policy(), RetryPolicy::new(5, Duration::from_millis(10)));
    }
}
