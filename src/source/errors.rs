use std::path::PathBuf;
use thiserror::Error;

use crate::lexer::Position;

/// Failure reported by a [`SourceResolver`](crate::source::SourceResolver).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("not found")]
    NotFound,

    #[error("not readable: {0}")]
    Unreadable(String),
}

/// Failure reported by an [`ImageSizeResolver`](crate::source::ImageSizeResolver).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageSizeError {
    #[error("not found")]
    NotFound,

    #[error("not readable: {0}")]
    Unreadable(String),
}

/// Errors raised while resolving units and resources referenced by them
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error(
        "The PATH, URL or URI '{reference}' provided by {owner} located at {position} is incorrect or not valid"
    )]
    Invalid {
        reference: String,
        owner: String,
        position: Position,
    },

    #[error(
        "The PATH, URL or URI '{reference}' provided by {owner} located at {position} is not accessible: {reason}"
    )]
    Unreachable {
        reference: String,
        owner: String,
        reason: String,
        position: Position,
    },

    #[error(
        "The PATH '{reference}' provided by include located at {position} leads back to '{unit}', which is already being compiled"
    )]
    RecursiveInclude {
        reference: String,
        unit: String,
        position: Position,
    },

    #[error("The source extension '{extension}' of '{}' is not available. Use the 'pf' extension instead", .path.display())]
    UnsupportedExtension { path: PathBuf, extension: String },

    #[error("Pizza source '{}' could not be found", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Pizza source '{}' could not be read: {}", .0.display(), .1)]
    SourceUnreadable(PathBuf, String),
}
