use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::source::ResourceError;

/// Extension every compilable unit must carry.
pub const SOURCE_EXTENSION: &str = "pf";

/// Identity of a source unit, usually its canonical path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceId(Arc<Path>);

impl SourceId {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(Arc::from(path.into()))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Directory that relative references inside this unit are resolved against.
    #[must_use]
    pub fn directory(&self) -> &Path {
        match self.0.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// `reference` taken relative to this unit, without touching any resolver.
    #[must_use]
    pub fn sibling(&self, reference: &Path) -> PathBuf {
        match self.0.parent() {
            Some(parent) => parent.join(reference),
            None => reference.to_path_buf(),
        }
    }

    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.0.file_name().and_then(|name| name.to_str())
    }

    /// # Errors
    /// `UnsupportedExtension` unless the path ends in `.pf` (any case).
    pub fn check_extension(&self) -> Result<(), ResourceError> {
        let extension = self
            .0
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        if extension.eq_ignore_ascii_case(SOURCE_EXTENSION) {
            Ok(())
        } else {
            Err(ResourceError::UnsupportedExtension {
                path: self.0.to_path_buf(),
                extension: extension.to_string(),
            })
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// One unit of source text, already split into lines.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub id: SourceId,
    pub lines: Vec<String>,
}

impl SourceUnit {
    /// # Errors
    /// If the id does not carry the `.pf` extension.
    pub fn new(id: SourceId, text: &str) -> Result<Self, ResourceError> {
        id.check_extension()?;

        Ok(Self {
            id,
            lines: text.lines().map(str::to_string).collect(),
        })
    }
}
