use log::debug;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::lexer::{tokenize, LexerError, Token};
use crate::parser::{Ast, Parser, ParserError};
use crate::semantic::{Intermediate, SemanticAnalyzer, SemanticError};
use crate::source::{
    FsImageSizes, FsSources, ImageSizeResolver, ResolveError, ResourceError, SourceId,
    SourceResolver, SourceUnit,
};

/// Any error that aborts a compilation
#[derive(Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexerError),

    #[error(transparent)]
    Parse(#[from] ParserError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// Runs lex, parse and analysis for a unit and every unit it includes.
///
/// The compiler holds no per-compilation state; the chain of units being
/// compiled is threaded through each call instead.
pub struct Compiler {
    sources: Box<dyn SourceResolver>,
    images: Box<dyn ImageSizeResolver>,
}

impl Compiler {
    pub fn new(
        sources: impl SourceResolver + 'static,
        images: impl ImageSizeResolver + 'static,
    ) -> Self {
        Self {
            sources: Box::new(sources),
            images: Box::new(images),
        }
    }

    /// A compiler reading units and images from disk, searching the given
    /// directories after the directory of the referencing unit.
    pub fn filesystem(library_dirs: Vec<PathBuf>, asset_dirs: Vec<PathBuf>) -> Self {
        Self::new(
            FsSources::new().with_library_dirs(library_dirs),
            FsImageSizes::new().with_asset_dirs(asset_dirs),
        )
    }

    pub fn sources(&self) -> &dyn SourceResolver {
        self.sources.as_ref()
    }

    pub fn images(&self) -> &dyn ImageSizeResolver {
        self.images.as_ref()
    }

    /// Compile the unit at `path` through the source resolver
    /// # Errors
    /// If the unit cannot be found or read, or on the first error in it or
    /// any unit it includes.
    pub fn compile_file(&self, path: &Path) -> Result<Intermediate, CompileError> {
        let (id, text) = self.read(path)?;
        self.compile_source(id, &text)
    }

    /// Compile `text` as if it were the unit `id`
    /// # Errors
    /// On the first error in the unit or any unit it includes.
    pub fn compile_source(&self, id: SourceId, text: &str) -> Result<Intermediate, CompileError> {
        let mut chain = Vec::new();
        self.compile_nested(id, text, &mut chain)
    }

    /// Locate and read a top-level unit
    /// # Errors
    /// `UnsupportedExtension`, `SourceNotFound` or `SourceUnreadable`.
    pub fn read(&self, path: &Path) -> Result<(SourceId, String), ResourceError> {
        SourceId::new(path).check_extension()?;

        let id = self
            .sources
            .locate(path, None)
            .map_err(|_| ResourceError::SourceNotFound(path.to_path_buf()))?;

        let text = self.sources.load(&id).map_err(|e| match e {
            ResolveError::NotFound => ResourceError::SourceNotFound(path.to_path_buf()),
            ResolveError::Unreadable(reason) => {
                ResourceError::SourceUnreadable(path.to_path_buf(), reason)
            }
        })?;

        Ok((id, text))
    }

    /// Tokens of a single unit; includes are not followed
    /// # Errors
    /// If the unit has the wrong extension or does not lex.
    pub fn tokens(&self, id: SourceId, text: &str) -> Result<Vec<Token>, CompileError> {
        let unit = SourceUnit::new(id, text)?;
        Ok(tokenize(&unit)?)
    }

    /// Syntax tree of a single unit; includes are not followed
    /// # Errors
    /// If the unit has the wrong extension, does not lex or does not parse.
    pub fn syntax_tree(&self, id: SourceId, text: &str) -> Result<Ast, CompileError> {
        let tokens = self.tokens(id.clone(), text)?;
        Ok(Parser::new(tokens, id).parse_program()?)
    }

    /// Compile one unit while the units in `chain` are being compiled
    pub(crate) fn compile_nested(
        &self,
        id: SourceId,
        text: &str,
        chain: &mut Vec<SourceId>,
    ) -> Result<Intermediate, CompileError> {
        let tokens = self.tokens(id.clone(), text)?;
        debug!("lexed {}: {} tokens", id, tokens.len());

        let ast = Parser::new(tokens, id.clone()).parse_program()?;
        debug!("parsed {}: {} nodes", id, ast.len());

        chain.push(id.clone());
        let result = SemanticAnalyzer::new(self, &ast, id, chain).analyze();
        chain.pop();
        result
    }
}
