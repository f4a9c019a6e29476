use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::source::{ResolveError, SourceId};

/// Finds and reads the source units named by `include` statements.
///
/// Resolution is split in two steps so the compiler can reject include
/// cycles on the unit's identity before any of its text is read.
pub trait SourceResolver {
    /// Turn a reference into the identity of the unit it names.
    /// `origin` is the unit containing the reference, if any.
    /// # Errors
    /// `NotFound` if no unit matches the reference.
    fn locate(&self, reference: &Path, origin: Option<&SourceId>) -> Result<SourceId, ResolveError>;

    /// Read the text of a located unit.
    /// # Errors
    /// `NotFound` or `Unreadable` if the text cannot be produced.
    fn load(&self, id: &SourceId) -> Result<String, ResolveError>;
}

/// Resolves units on the local filesystem.
///
/// Relative references are looked up next to the including unit first and
/// then in each library directory, in order.
#[derive(Debug, Clone, Default)]
pub struct FsSources {
    library_dirs: Vec<PathBuf>,
}

impl FsSources {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_library_dirs(mut self, dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        self.library_dirs.extend(dirs);
        self
    }

    fn candidates(&self, reference: &Path, origin: Option<&SourceId>) -> Vec<PathBuf> {
        if reference.is_absolute() {
            return vec![reference.to_path_buf()];
        }

        let first = match origin {
            Some(origin) => origin.directory().join(reference),
            None => reference.to_path_buf(),
        };

        std::iter::once(first)
            .chain(self.library_dirs.iter().map(|dir| dir.join(reference)))
            .collect()
    }
}

impl SourceResolver for FsSources {
    fn locate(&self, reference: &Path, origin: Option<&SourceId>) -> Result<SourceId, ResolveError> {
        self.candidates(reference, origin)
            .into_iter()
            .find(|candidate| candidate.is_file())
            .map(|found| SourceId::new(fs::canonicalize(&found).unwrap_or(found)))
            .ok_or(ResolveError::NotFound)
    }

    fn load(&self, id: &SourceId) -> Result<String, ResolveError> {
        fs::read_to_string(id.path()).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ResolveError::NotFound,
            _ => ResolveError::Unreadable(e.to_string()),
        })
    }
}

/// Units held in memory, keyed by path. Used to embed the compiler and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySources {
    units: HashMap<PathBuf, String>,
}

impl MemorySources {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_unit(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.units.insert(path.into(), text.into());
    }
}

impl SourceResolver for MemorySources {
    fn locate(&self, reference: &Path, origin: Option<&SourceId>) -> Result<SourceId, ResolveError> {
        let relative = origin
            .filter(|_| reference.is_relative())
            .and_then(|origin| origin.path().parent())
            .map(|dir| dir.join(reference));

        relative
            .into_iter()
            .chain(std::iter::once(reference.to_path_buf()))
            .find(|candidate| self.units.contains_key(candidate))
            .map(SourceId::new)
            .ok_or(ResolveError::NotFound)
    }

    fn load(&self, id: &SourceId) -> Result<String, ResolveError> {
        self.units
            .get(id.path())
            .cloned()
            .ok_or(ResolveError::NotFound)
    }
}
