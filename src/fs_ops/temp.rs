//! Temp-file handle for a single write attempt.
//!
//! Lifecycle: created -> active -> closed -> consumed (renamed) or discarded
//! (deleted). `commit` takes the handle by value, and a handle dropped without a
//! successful commit deletes its file, so neither outcome can happen twice.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::atomic::{rename_with_retry, RetryPolicy};
use super::primitives::FileSystem;
use crate::errors::{AtomicWriteError, Step};

pub(crate) struct TempFile<'a, F: FileSystem> {
    fs: &'a F,
    path: PathBuf,
    file: Option<File>,
    armed: bool,
}

impl<'a, F: FileSystem> TempFile<'a, F> {
    pub(crate) fn create(fs: &'a F, path: PathBuf) -> Result<Self, AtomicWriteError> {
        let file = fs
            .create_exclusive(&path)
            .map_err(|e| AtomicWriteError::resource(Step::CreateTemp, &path, e))?;
        Ok(Self {
            fs,
            path,
            file: Some(file),
            armed: true,
        })
    }

    fn open_file(&mut self) -> io::Result<&mut File> {
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::other("temporary file already closed"))
    }

    pub(crate) fn write_all(&mut self, data: &[u8]) -> Result<(), AtomicWriteError> {
        let fs = self.fs;
        self.open_file()
            .and_then(|f| fs.write_all(f, data))
            .map_err(|e| AtomicWriteError::resource(Step::Write, &self.path, e))
    }

    pub(crate) fn sync(&mut self) -> Result<(), AtomicWriteError> {
        let fs = self.fs;
        self.open_file()
            .and_then(|f| fs.sync(f))
            .map_err(|e| AtomicWriteError::resource(Step::Sync, &self.path, e))
    }

    pub(crate) fn close(&mut self) -> Result<(), AtomicWriteError> {
        match self.file.take() {
            Some(file) => self
                .fs
                .close(file)
                .map_err(|e| AtomicWriteError::resource(Step::Close, &self.path, e)),
            None => Ok(()),
        }
    }

    pub(crate) fn set_mode(&self, mode: u32) -> Result<(), AtomicWriteError> {
        self.fs
            .set_mode(&self.path, mode)
            .map_err(|e| AtomicWriteError::resource(Step::SetPermissions, &self.path, e))
    }

    /// Rename onto `target`. On success the handle is consumed and nothing is
    /// left to clean up; on failure the drop below removes the temp file.
    pub(crate) fn commit(mut self, target: &Path, policy: RetryPolicy) -> Result<u32, AtomicWriteError> {
        let attempts = rename_with_retry(self.fs, &self.path, target, policy)?;
        self.armed = false;
        Ok(attempts)
    }
}

impl<F: FileSystem> Drop for TempFile<'_, F> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        // Close before deleting; Windows refuses to remove open files.
        if let Some(file) = self.file.take() {
            let _ = self.fs.close(file);
        }
        match self.fs.remove(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "discarded temporary file"),
            Err(e) => debug!(path = %self.path.display(), error = %e, "could not remove temporary file"),
        }
    }
}
