use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::lexer::Position;
use crate::source::{ImageSize, SourceId};
use crate::symbol::SymbolTable;

/// A named, square image usable as a topping.
#[derive(Debug, Clone, PartialEq)]
pub struct Ingredient {
    pub name: String,
    /// Path or URL exactly as written in the source.
    pub reference: String,
    /// Size reported by the image resolver.
    pub intrinsic: ImageSize,
    /// Size toppings are drawn at: `resize N` if given, else `intrinsic`.
    pub size: ImageSize,
    pub declared_at: Position,
}

/// One ingredient together with how many of it go on a pizza.
#[derive(Debug, Clone, PartialEq)]
pub struct Portion {
    pub ingredient: Arc<Ingredient>,
    pub quantity: i64,
}

/// A named bundle of portions, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Specialty {
    pub name: String,
    pub portions: IndexMap<String, Portion>,
    pub declared_at: Position,
}

/// Kinds of declarations a name can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentKind {
    Ingredient,
    Specialty,
}

impl fmt::Display for AssignmentKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AssignmentKind::Ingredient => write!(f, "Ingredient"),
            AssignmentKind::Specialty => write!(f, "Specialty"),
        }
    }
}

/// A declaration stored in the symbol table
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    Ingredient(Arc<Ingredient>),
    Specialty(Arc<Specialty>),
}

impl Assignment {
    pub fn name(&self) -> &str {
        match self {
            Assignment::Ingredient(ingredient) => &ingredient.name,
            Assignment::Specialty(specialty) => &specialty.name,
        }
    }

    pub fn declared_at(&self) -> &Position {
        match self {
            Assignment::Ingredient(ingredient) => &ingredient.declared_at,
            Assignment::Specialty(specialty) => &specialty.declared_at,
        }
    }

    pub fn kind(&self) -> AssignmentKind {
        match self {
            Assignment::Ingredient(_) => AssignmentKind::Ingredient,
            Assignment::Specialty(_) => AssignmentKind::Specialty,
        }
    }
}

/// Sizes a pizza can be made in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PizzaSize {
    Big,
    Medium,
    Personal,
}

impl PizzaSize {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "big" => Some(PizzaSize::Big),
            "medium" => Some(PizzaSize::Medium),
            "personal" => Some(PizzaSize::Personal),
            _ => None,
        }
    }
}

impl fmt::Display for PizzaSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            PizzaSize::Big => "big",
            PizzaSize::Medium => "medium",
            PizzaSize::Personal => "personal",
        };
        write!(f, "{}", s)
    }
}

/// Everything a renderer needs to draw one pizza.
#[derive(Debug, Clone, PartialEq)]
pub struct Pizza {
    pub size: PizzaSize,
    /// Portions added directly with `add`.
    pub portions: IndexMap<String, Portion>,
    /// Specialties applied with `of`.
    pub specialties: IndexMap<String, Arc<Specialty>>,
    /// Name given with `save as`.
    pub output_name: Option<String>,
}

impl Pizza {
    pub fn new(size: PizzaSize) -> Self {
        Self {
            size,
            portions: IndexMap::new(),
            specialties: IndexMap::new(),
            output_name: None,
        }
    }

    /// The `save as` name, or `pizza{index}` from a counter the caller owns.
    pub fn output_name_or(&self, index: usize) -> Cow<'_, str> {
        match &self.output_name {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(format!("pizza{}", index)),
        }
    }
}

impl fmt::Display for Pizza {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} pizza", self.size)?;

        if !self.specialties.is_empty() {
            let names: Vec<&str> = self.specialties.keys().map(String::as_str).collect();
            write!(f, " of {}", names.join(", "))?;
        }

        if !self.portions.is_empty() {
            let portions: Vec<String> = self
                .portions
                .iter()
                .map(|(name, portion)| format!("{}({})", name, portion.quantity))
                .collect();
            write!(f, " with {}", portions.join(", "))?;
        }

        if let Some(name) = &self.output_name {
            write!(f, " saved as '{}'", name)?;
        }

        Ok(())
    }
}

/// A `make` statement after analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Make {
    pub declared_at: Position,
    pub pizza: Pizza,
}

/// Unit of the intermediate representation
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Make(Make),
}

impl Instruction {
    pub fn declared_at(&self) -> &Position {
        match self {
            Instruction::Make(make) => &make.declared_at,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Instruction::Make(make) => {
                write!(f, "Instruction declared at {} make {}", make.declared_at, make.pizza)
            }
        }
    }
}

/// Output of analyzing one unit: its instructions, those of every unit it
/// includes (first), and the merged symbols.
#[derive(Debug, Clone, PartialEq)]
pub struct Intermediate {
    pub unit: SourceId,
    pub instructions: Vec<Instruction>,
    pub symbols: SymbolTable,
}

impl Intermediate {
    /// Pizzas in instruction order.
    pub fn pizzas(&self) -> impl Iterator<Item = &Pizza> {
        self.instructions.iter().map(|instruction| match instruction {
            Instruction::Make(make) => &make.pizza,
        })
    }
}
