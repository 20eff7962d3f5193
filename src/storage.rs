//! Storage collaborators for resolving manifest references to bytes.
//!
//! A reference is an opaque locator string; the pipeline never parses its
//! internal structure. Implementations map it to bytes however they like:
//! [`LocalStorage`] resolves `file://` URIs and plain filesystem paths, and
//! [`MemoryStorage`] is an in-memory fake with scriptable failures for
//! testing retry behavior without external dependencies.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Error raised by a [`StorageClient`] when a reference cannot be opened.
#[derive(Debug, Clone, Error)]
#[error("{kind:?}: {message}")]
pub struct StorageError {
    pub kind: StorageErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    NotFound,
    PermissionDenied,
    Network,
    Timeout,
    Unavailable,
    RateLimited,
    Other,
}

impl StorageError {
    pub fn new(kind: StorageErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Whether a retry has any chance of succeeding.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind,
            StorageErrorKind::Network
                | StorageErrorKind::Timeout
                | StorageErrorKind::Unavailable
                | StorageErrorKind::RateLimited
        )
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for fetching the bytes behind an opaque reference.
///
/// One fetch per invocation; nothing is cached across calls, so a retried
/// row re-fetches its object.
pub trait StorageClient: Send + Sync {
    /// Open `reference` and return its full contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the object doesn't exist, permissions are not
    /// enough, or the fetch fails.
    fn open(&self, reference: &str) -> StorageResult<Vec<u8>>;
}

/// Filesystem-backed storage, used by the `recordforge` binary.
///
/// References may be plain paths or `file://` URIs. With a root configured,
/// references resolve relative to it.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    root: Option<PathBuf>,
}

impl LocalStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }
}

impl StorageClient for LocalStorage {
    fn open(&self, reference: &str) -> StorageResult<Vec<u8>> {
        let rel = reference.strip_prefix("file://").unwrap_or(reference);
        let path = match &self.root {
            Some(root) => root.join(rel.trim_start_matches('/')),
            None => PathBuf::from(rel),
        };
        std::fs::read(&path).map_err(|err| {
            let kind = match err.kind() {
                io::ErrorKind::NotFound => StorageErrorKind::NotFound,
                io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
                io::ErrorKind::TimedOut => StorageErrorKind::Timeout,
                io::ErrorKind::ConnectionRefused
                | io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted => StorageErrorKind::Network,
                _ => StorageErrorKind::Other,
            };
            StorageError::new(kind, format!("read {}: {err}", path.display()))
        })
    }
}

type ObjectMap = HashMap<String, Vec<u8>>;

#[derive(Default)]
struct MemoryInner {
    objects: ObjectMap,
    // Scripted failures are consumed front-to-back before the object is served.
    failures: HashMap<String, Vec<StorageError>>,
}

/// In-memory fake storage for tests.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` under `reference`.
    ///
    /// # Panics
    ///
    /// Panics if the storage mutex is poisoned.
    pub fn insert(&self, reference: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.inner
            .lock()
            .expect("memory storage mutex poisoned")
            .objects
            .insert(reference.into(), bytes.into());
    }

    /// Make the next `times` opens of `reference` fail with `error` before
    /// falling back to the stored object (if any).
    ///
    /// # Panics
    ///
    /// Panics if the storage mutex is poisoned.
    pub fn fail_with(&self, reference: impl Into<String>, error: StorageError, times: usize) {
        self.inner
            .lock()
            .expect("memory storage mutex poisoned")
            .failures
            .entry(reference.into())
            .or_default()
            .extend(std::iter::repeat_n(error, times));
    }
}

impl StorageClient for MemoryStorage {
    fn open(&self, reference: &str) -> StorageResult<Vec<u8>> {
        let mut inner = self.inner.lock().expect("memory storage mutex poisoned");
        if let Some(queue) = inner.failures.get_mut(reference)
            && !queue.is_empty()
        {
            return Err(queue.remove(0));
        }
        inner.objects.get(reference).cloned().ok_or_else(|| {
            StorageError::new(
                StorageErrorKind::NotFound,
                format!("no object stored at {reference:?}"),
            )
        })
    }
}
