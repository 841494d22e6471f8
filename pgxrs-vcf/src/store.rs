//! Upload store: turns an opaque handle into a readable variant stream.

use std::collections::HashMap;
use std::fmt::{self, Display};
use std::io::{BufRead, BufReader, Cursor};
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use pgxrs_core::utils::get_dynamic_reader;

use crate::error::StoreError;

/// Opaque reference to an uploaded variant file.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UploadHandle(String);

impl UploadHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        UploadHandle(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UploadHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UploadHandle {
    fn from(value: &str) -> Self {
        UploadHandle::new(value)
    }
}

pub type VariantStream = Box<dyn BufRead + Send>;

pub trait UploadStore: Send + Sync {
    fn open(&self, handle: &UploadHandle) -> Result<VariantStream, StoreError>;
}

///
/// Resolves handles as relative file names under a root directory.
/// Compressed uploads (`.gz`, `.bgz`) are decompressed transparently.
///
#[derive(Clone, Debug)]
pub struct FsUploadStore {
    root: PathBuf,
}

impl FsUploadStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        FsUploadStore {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, handle: &UploadHandle) -> Result<PathBuf, StoreError> {
        let relative = Path::new(handle.as_str());
        let escapes = handle.as_str().trim().is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(StoreError::InvalidHandle(handle.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl UploadStore for FsUploadStore {
    fn open(&self, handle: &UploadHandle) -> Result<VariantStream, StoreError> {
        let path = self.resolve(handle)?;
        if !path.is_file() {
            return Err(StoreError::NotFound(handle.to_string()));
        }
        debug!(path = %path.display(), "opening upload");
        Ok(Box::new(get_dynamic_reader(&path)?))
    }
}

/// In-memory store, uploads are kept as plain bytes.
#[derive(Clone, Debug, Default)]
pub struct MemoryUploadStore {
    uploads: HashMap<UploadHandle, Vec<u8>>,
}

impl MemoryUploadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, handle: impl Into<String>, contents: impl Into<Vec<u8>>) -> UploadHandle {
        let handle = UploadHandle::new(handle);
        self.uploads.insert(handle.clone(), contents.into());
        handle
    }
}

impl UploadStore for MemoryUploadStore {
    fn open(&self, handle: &UploadHandle) -> Result<VariantStream, StoreError> {
        let contents = self
            .uploads
            .get(handle)
            .ok_or_else(|| StoreError::NotFound(handle.to_string()))?;
        Ok(Box::new(BufReader::new(Cursor::new(contents.clone()))))
    }
}
