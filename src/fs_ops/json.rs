//! JSON documents written through the atomic writer.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use super::helpers::io_error_with_help;
use super::primitives::FileSystem;
use super::writer::AtomicWriter;
use crate::errors::AtomicWriteError;

impl<F: FileSystem> AtomicWriter<F> {
    /// Pretty-print `value` (with a trailing newline) and write it atomically.
    pub fn write_json<T: Serialize + ?Sized>(
        &self,
        target: impl AsRef<Path>,
        value: &T,
        mode: u32,
    ) -> Result<(), AtomicWriteError> {
        let target = target.as_ref();
        let mut bytes =
            serde_json::to_vec_pretty(value).map_err(|source| AtomicWriteError::Serialize {
                path: target.to_path_buf(),
                source,
            })?;
        bytes.push(b'\n');
        self.write_atomically(target, &bytes, mode)
    }
}

pub fn write_json_atomically<T: Serialize + ?Sized>(
    target: impl AsRef<Path>,
    value: &T,
    mode: u32,
) -> Result<(), AtomicWriteError> {
    AtomicWriter::new().write_json(target, value, mode)
}

pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(io_error_with_help("read json", path))?;
    serde_json::from_slice(&bytes).with_context(|| format!("decode json '{}'", path.display()))
}
