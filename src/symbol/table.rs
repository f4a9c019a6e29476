use crate::lexer::Position;
use crate::semantic::{Assignment, Ingredient, Specialty};
use indexmap::IndexMap;
use std::sync::Arc;

/// A name that was already bound when something tried to bind it again
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateSymbol {
    pub name: String,
    /// Where the rejected declaration was made
    pub duplicate: Position,
    /// Where the name was first declared
    pub original: Position,
}

/// Symbol table mapping declared names to their declarations.
///
/// Names are unique: a second binding is rejected, never overwritten.
/// Iteration follows declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SymbolTable {
    symbols: IndexMap<String, Assignment>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `assignment` under its own name if the name is free.
    /// # Errors
    /// If the name is already bound; the table is left unchanged.
    pub fn insert(&mut self, assignment: Assignment) -> Result<(), DuplicateSymbol> {
        if let Some(existing) = self.symbols.get(assignment.name()) {
            return Err(DuplicateSymbol {
                name: assignment.name().to_string(),
                duplicate: assignment.declared_at().clone(),
                original: existing.declared_at().clone(),
            });
        }

        self.symbols.insert(assignment.name().to_string(), assignment);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Assignment> {
        self.symbols.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Move every symbol of `other` into this table.
    /// # Errors
    /// On the first name bound in both tables. Symbols of `other` merged
    /// before the clash stay merged; callers abort compilation on error.
    pub fn merge(&mut self, other: SymbolTable) -> Result<(), DuplicateSymbol> {
        for (_, assignment) in other.symbols {
            self.insert(assignment)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn ingredient(&self, name: &str) -> Option<&Arc<Ingredient>> {
        match self.symbols.get(name) {
            Some(Assignment::Ingredient(ingredient)) => Some(ingredient),
            _ => None,
        }
    }

    #[must_use]
    pub fn specialty(&self, name: &str) -> Option<&Arc<Specialty>> {
        match self.symbols.get(name) {
            Some(Assignment::Specialty(specialty)) => Some(specialty),
            _ => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Declarations in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.symbols.values()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.symbols.keys().map(String::as_str).collect()
    }
}
