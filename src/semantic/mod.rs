pub mod analyzer;
pub mod errors;
pub mod types;

pub use analyzer::SemanticAnalyzer;
pub use errors::*;
pub use types::*;
