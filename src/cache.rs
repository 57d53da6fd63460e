//! Render cache for animation artifacts.
//!
//! Animations are keyed by a deterministic filename built from the body
//! names and dimensionality. A key maps to an "already generated" flag; once
//! the flag is set the artifact is served from the store instead of being
//! rendered again. Entries are never evicted.
//!
//! The flow is check, generate, then mark. Two concurrent requests for the
//! same uncached key may both render; each writer fills its own temporary
//! file and renames it into place, so readers only ever see whole artifacts.

use std::collections::HashMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use parking_lot::Mutex;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::error::{OrreryError, OrreryResult};
use crate::orbit::body::file_key;

/// Backing store for cache flags and the artifacts they guard.
pub trait CacheStore: Send + Sync {
    /// Prepare the store. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns error if the underlying storage cannot be created.
    fn register(&self) -> OrreryResult<()>;

    /// Flag for `key`, or `None` if never set.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be read.
    fn get(&self, key: &str) -> OrreryResult<Option<bool>>;

    /// Set the flag for `key`.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be written.
    fn set(&self, key: &str, value: bool) -> OrreryResult<()>;

    /// Store the artifact for `key`.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be written.
    fn write_artifact(&self, key: &str, bytes: &[u8]) -> OrreryResult<()>;

    /// Read the artifact for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`OrreryError::Io`] with [`ErrorKind::NotFound`] if absent.
    fn read_artifact(&self, key: &str) -> OrreryResult<Vec<u8>>;
}

/// Flags as small files in a directory, artifacts alongside under their
/// own filename.
#[derive(Debug, Clone)]
pub struct FlagFileStore {
    dir: PathBuf,
}

impl FlagFileStore {
    /// Store rooted at `dir`. Nothing is created until [`CacheStore::register`].
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path where the artifact for `key` lives.
    #[must_use]
    pub fn artifact_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    fn flag_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.flag"))
    }
}

impl CacheStore for FlagFileStore {
    fn register(&self) -> OrreryResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    fn get(&self, key: &str) -> OrreryResult<Option<bool>> {
        match std::fs::read_to_string(self.flag_path(key)) {
            Ok(content) => Ok(Some(content.trim() == "true")),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: bool) -> OrreryResult<()> {
        std::fs::write(self.flag_path(key), if value { "true" } else { "false" })?;
        Ok(())
    }

    fn write_artifact(&self, key: &str, bytes: &[u8]) -> OrreryResult<()> {
        let mut partial = NamedTempFile::new_in(&self.dir)?;
        partial.write_all(bytes)?;
        partial.persist(self.artifact_path(key)).map_err(|e| e.error)?;
        Ok(())
    }

    fn read_artifact(&self, key: &str) -> OrreryResult<Vec<u8>> {
        Ok(std::fs::read(self.artifact_path(key))?)
    }
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    flags: Mutex<HashMap<String, bool>>,
    artifacts: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryStore {
    fn register(&self) -> OrreryResult<()> {
        Ok(())
    }

    fn get(&self, key: &str) -> OrreryResult<Option<bool>> {
        Ok(self.flags.lock().get(key).copied())
    }

    fn set(&self, key: &str, value: bool) -> OrreryResult<()> {
        self.flags.lock().insert(key.to_string(), value);
        Ok(())
    }

    fn write_artifact(&self, key: &str, bytes: &[u8]) -> OrreryResult<()> {
        self.artifacts.lock().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn read_artifact(&self, key: &str) -> OrreryResult<Vec<u8>> {
        self.artifacts.lock().get(key).cloned().ok_or_else(|| {
            OrreryError::Io(std::io::Error::new(
                ErrorKind::NotFound,
                format!("no artifact for '{key}'"),
            ))
        })
    }
}

/// Cache filename for an animation: `2D-`/`3D-` followed by the lowercase
/// body names joined by `_`, with a `.gif` extension.
///
/// Each name passes through [`file_key`], so a key never leaves the cache
/// directory and `_` only ever separates names.
#[must_use]
pub fn animation_filename<S: AsRef<str>>(names: &[S], three_d: bool) -> String {
    let joined = names
        .iter()
        .map(|n| file_key(n.as_ref()))
        .collect::<Vec<_>>()
        .join("_");
    let prefix = if three_d { "3D" } else { "2D" };
    format!("{prefix}-{joined}.gif")
}

/// Base64 text for an artifact.
#[must_use]
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Explicitly constructed cache held by the task layer.
pub struct RenderCache {
    store: Box<dyn CacheStore>,
}

impl std::fmt::Debug for RenderCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderCache").finish_non_exhaustive()
    }
}

impl RenderCache {
    /// Wrap a store.
    #[must_use]
    pub fn new(store: impl CacheStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Flag-file cache in `dir`.
    #[must_use]
    pub fn on_disk(dir: impl Into<PathBuf>) -> Self {
        Self::new(FlagFileStore::new(dir))
    }

    /// In-memory cache.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Prepare the backing store. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be created.
    pub fn register(&self) -> OrreryResult<()> {
        self.store.register()
    }

    /// Flag for `key`.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be read.
    pub fn get(&self, key: &str) -> OrreryResult<Option<bool>> {
        self.store.get(key)
    }

    /// Mark `key` as generated.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be written.
    pub fn set(&self, key: &str, value: bool) -> OrreryResult<()> {
        self.store.set(key, value)
    }

    /// Serve the artifact for `key`, rendering and storing it on a miss.
    ///
    /// The artifact is written before the flag, so a set flag always has
    /// an artifact behind it. A flag whose artifact has gone missing is
    /// treated as a miss.
    ///
    /// # Errors
    ///
    /// Propagates store errors and errors from `render`.
    pub fn get_or_render<F>(&self, key: &str, render: F) -> OrreryResult<Vec<u8>>
    where
        F: FnOnce() -> OrreryResult<Vec<u8>>,
    {
        if self.store.get(key)? == Some(true) {
            match self.store.read_artifact(key) {
                Ok(bytes) => {
                    info!(key, "Cache hit");
                    return Ok(bytes);
                }
                Err(OrreryError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                    warn!(key, "Cache flag set but artifact missing, regenerating");
                }
                Err(e) => return Err(e),
            }
        } else {
            info!(key, "Cache miss");
        }

        let bytes = render()?;
        self.store.write_artifact(key, &bytes)?;
        self.store.set(key, true)?;
        Ok(bytes)
    }
}
