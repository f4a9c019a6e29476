use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::source::{ImageSizeError, SourceId};

/// Intrinsic or declared pixel dimensions of an ingredient image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    #[must_use]
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Answers how large the image behind an ingredient reference is.
/// Implementations never hand pixel data to the compiler.
pub trait ImageSizeResolver {
    /// # Errors
    /// `NotFound` if the reference names nothing, `Unreadable` if it names
    /// something that is not a readable image.
    fn image_size(&self, reference: &str, origin: &SourceId) -> Result<ImageSize, ImageSizeError>;
}

/// Reads image headers from disk.
#[derive(Debug, Clone, Default)]
pub struct FsImageSizes {
    asset_dirs: Vec<PathBuf>,
}

impl FsImageSizes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_asset_dirs(mut self, dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        self.asset_dirs.extend(dirs);
        self
    }

    fn find(&self, reference: &Path, origin: &SourceId) -> Option<PathBuf> {
        if reference.is_absolute() {
            return reference.is_file().then(|| reference.to_path_buf());
        }

        std::iter::once(origin.directory().join(reference))
            .chain(self.asset_dirs.iter().map(|dir| dir.join(reference)))
            .find(|candidate| candidate.is_file())
    }
}

fn is_remote(reference: &str) -> bool {
    let lower = reference.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("ftp://")
}

impl ImageSizeResolver for FsImageSizes {
    fn image_size(&self, reference: &str, origin: &SourceId) -> Result<ImageSize, ImageSizeError> {
        if is_remote(reference) {
            return Err(ImageSizeError::Unreadable(
                "remote images are not fetched by the filesystem resolver".to_string(),
            ));
        }

        let path = self
            .find(Path::new(reference), origin)
            .ok_or(ImageSizeError::NotFound)?;

        let size = imagesize::size(&path).map_err(|e| ImageSizeError::Unreadable(e.to_string()))?;

        let width = u32::try_from(size.width)
            .map_err(|_| ImageSizeError::Unreadable(format!("width {} is too large", size.width)))?;
        let height = u32::try_from(size.height)
            .map_err(|_| ImageSizeError::Unreadable(format!("height {} is too large", size.height)))?;

        log::trace!("image '{}' is {}x{}", path.display(), width, height);
        Ok(ImageSize::new(width, height))
    }
}

/// Fixed table of reference → size, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticImageSizes {
    sizes: HashMap<String, Result<ImageSize, ImageSizeError>>,
}

impl StaticImageSizes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, reference: impl Into<String>, width: u32, height: u32) -> Self {
        self.sizes
            .insert(reference.into(), Ok(ImageSize::new(width, height)));
        self
    }

    /// Register a reference that exists but cannot be read.
    #[must_use]
    pub fn with_unreadable(mut self, reference: impl Into<String>, reason: impl Into<String>) -> Self {
        self.sizes
            .insert(reference.into(), Err(ImageSizeError::Unreadable(reason.into())));
        self
    }
}

impl ImageSizeResolver for StaticImageSizes {
    fn image_size(&self, reference: &str, _origin: &SourceId) -> Result<ImageSize, ImageSizeError> {
        self.sizes
            .get(reference)
            .cloned()
            .unwrap_or(Err(ImageSizeError::NotFound))
    }
}
