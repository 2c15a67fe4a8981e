//! Filesystem primitives used by the writer.
//!
//! Every method has a std-backed default, so `StdFs` is an empty impl and test
//! doubles override only the primitive they want to break.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use crate::platform;

pub trait FileSystem {
    /// Create `path`, failing if it already exists. Mode 0600 on Unix.
    fn create_exclusive(&self, path: &Path) -> io::Result<File> {
        platform::create_temp_exclusive(path)
    }

    fn write_all(&self, file: &mut File, data: &[u8]) -> io::Result<()> {
        file.write_all(data)
    }

    /// Force file data and metadata to stable storage.
    fn sync(&self, file: &File) -> io::Result<()> {
        file.sync_all()
    }

    /// std surfaces no error from close(2); durability was already settled by `sync`.
    fn close(&self, file: File) -> io::Result<()> {
        drop(file);
        Ok(())
    }

    fn set_mode(&self, path: &Path, mode: u32) -> io::Result<()> {
        platform::apply_mode(path, mode)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFs;

impl FileSystem for StdFs {}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn create_exclusive(&self, path: &Path) -> io::Result<File> {
        (**self).create_exclusive(path)
    }

    fn write_all(&self, file: &mut File, data: &[u8]) -> io::Result<()> {
        (**self).write_all(file, data)
    }

    fn sync(&self, file: &File) -> io::Result<()> {
        (**self).sync(file)
    }

    fn close(&self, file: File) -> io::Result<()> {
        (**self).close(file)
    }

    fn set_mode(&self, path: &Path, mode: u32) -> io::Result<()> {
        (**self).set_mode(path, mode)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        (**self).rename(from, to)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        (**self).remove(path)
    }
}
