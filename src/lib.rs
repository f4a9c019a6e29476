//! Pizza Language Compiler
//!
//! Front end for a small recipe language: ingredients are declared from
//! square images, specialties bundle ingredients, and `make` statements
//! describe pizzas. Units can include other units. The result is an
//! [`Intermediate`] ready to be handed to a renderer.

pub mod compiler;
pub mod lexer;
pub mod parser;
pub mod semantic;
pub mod source;
pub mod symbol;

pub use compiler::*;
pub use lexer::*;
pub use parser::*;
pub use semantic::*;
pub use source::*;
pub use symbol::*;
