use indexmap::IndexMap;
use log::{debug, trace};
use std::path::Path;
use std::sync::Arc;

use crate::compiler::{CompileError, Compiler};
use crate::lexer::Position;
use crate::parser::{Ast, AstNode, NodeId, NodeKind};
use crate::semantic::{
    Assignment, AssignmentKind, Ingredient, Instruction, Intermediate, Make, Pizza, PizzaSize,
    Portion, SemanticError, Specialty,
};
use crate::source::{ImageSize, ImageSizeError, ResolveError, ResourceError, SourceId, SOURCE_EXTENSION};
use crate::symbol::SymbolTable;

/// Walks the syntax tree of one unit and lowers it to an [`Intermediate`].
///
/// Includes are compiled through the owning [`Compiler`], sharing the chain
/// of units currently being compiled so that cycles are rejected.
pub struct SemanticAnalyzer<'a> {
    compiler: &'a Compiler,
    ast: &'a Ast,
    unit: SourceId,
    chain: &'a mut Vec<SourceId>,
    symbols: SymbolTable,
    instructions: Vec<Instruction>,
}

impl<'a> SemanticAnalyzer<'a> {
    pub fn new(
        compiler: &'a Compiler,
        ast: &'a Ast,
        unit: SourceId,
        chain: &'a mut Vec<SourceId>,
    ) -> Self {
        Self {
            compiler,
            ast,
            unit,
            chain,
            symbols: SymbolTable::new(),
            instructions: Vec::new(),
        }
    }

    /// Analyze every statement of the program in order
    /// # Errors
    /// The first semantic, resource or nested compilation error.
    pub fn analyze(mut self) -> Result<Intermediate, CompileError> {
        let ast = self.ast;
        let root = ast.root().ok_or_else(|| SemanticError::Internal {
            kind: NodeKind::Program,
            position: Position::start(self.unit.clone()),
            detail: "the tree has no root".to_string(),
        })?;

        for &statement in ast.children(root) {
            let node = ast.node(statement);
            match node.kind {
                NodeKind::Include => self.analyze_include(statement)?,
                NodeKind::Define => {
                    let definition = self.child(statement, 0)?;
                    self.analyze_definition(definition)?;
                }
                NodeKind::Make => self.analyze_make(statement)?,
                kind => {
                    return Err(SemanticError::Internal {
                        kind,
                        position: node.pos.clone(),
                        detail: "not a statement".to_string(),
                    }
                    .into())
                }
            }
        }

        debug!(
            "analyzed {}: {} instructions, {} symbols",
            self.unit,
            self.instructions.len(),
            self.symbols.len()
        );

        Ok(Intermediate {
            unit: self.unit,
            instructions: self.instructions,
            symbols: self.symbols,
        })
    }

    fn analyze_include(&mut self, include: NodeId) -> Result<(), CompileError> {
        let position = self.ast.node(include).pos.clone();
        let path = self.ast.node(self.child(include, 0)?);
        let reference = format!("{}.{}", path.value, SOURCE_EXTENSION);
        let sources = self.compiler.sources();

        // A unit naming itself is rejected even if no resolver knows it
        if self.unit.sibling(Path::new(&reference)) == self.unit.path() {
            return Err(ResourceError::RecursiveInclude {
                reference,
                unit: self.unit.to_string(),
                position,
            }
            .into());
        }

        let id = sources
            .locate(Path::new(&reference), Some(&self.unit))
            .map_err(|e| unresolved(&reference, "include", e, &position))?;

        if id == self.unit || self.chain.contains(&id) {
            return Err(ResourceError::RecursiveInclude {
                reference,
                unit: id.to_string(),
                position,
            }
            .into());
        }

        let text = sources.load(&id).map_err(|e| ResourceError::Unreachable {
            reference: reference.clone(),
            owner: "include".to_string(),
            reason: e.to_string(),
            position: position.clone(),
        })?;

        trace!("including {} from {}", id, position);
        let included = self.compiler.compile_nested(id, &text, self.chain)?;

        self.instructions.extend(included.instructions);
        self.symbols
            .merge(included.symbols)
            .map_err(SemanticError::from)?;
        Ok(())
    }

    fn analyze_definition(&mut self, definition: NodeId) -> Result<(), CompileError> {
        let node = self.ast.node(definition);
        let assignment = match node.kind {
            NodeKind::IngredientVar => Assignment::Ingredient(Arc::new(self.ingredient(definition)?)),
            NodeKind::SpecialtyVar => Assignment::Specialty(Arc::new(self.specialty(definition)?)),
            kind => {
                return Err(SemanticError::Internal {
                    kind,
                    position: node.pos.clone(),
                    detail: "not a definition".to_string(),
                }
                .into())
            }
        };

        trace!(
            "{} '{}' declared at {}",
            assignment.kind(),
            assignment.name(),
            assignment.declared_at()
        );
        self.symbols.insert(assignment).map_err(SemanticError::from)?;
        Ok(())
    }

    /// `INGREDIENT_VAR ─ LITERAL(name) ─ PATH` with an optional `RESIZE ─ NUMBER`
    fn ingredient(&self, definition: NodeId) -> Result<Ingredient, CompileError> {
        let name_id = self.child(definition, 0)?;
        let name = self.ast.node(name_id);
        let path = self.ast.node(self.child(name_id, 0)?);
        let owner = format!("ingredient '{}'", name.value);

        let intrinsic = self
            .compiler
            .images()
            .image_size(&path.value, &self.unit)
            .map_err(|e| match e {
                ImageSizeError::NotFound => ResourceError::Invalid {
                    reference: path.value.clone(),
                    owner: owner.clone(),
                    position: path.pos.clone(),
                },
                ImageSizeError::Unreadable(reason) => ResourceError::Unreachable {
                    reference: path.value.clone(),
                    owner: owner.clone(),
                    reason,
                    position: path.pos.clone(),
                },
            })?;

        let size = match self.ast.child(definition, 1) {
            Some(resize) => {
                let number = self.ast.node(self.child(resize, 0)?);
                let side = number
                    .value
                    .parse::<u32>()
                    .map_err(|_| SemanticError::ArithmeticOverflow {
                        position: number.pos.clone(),
                    })?;
                ImageSize::square(side)
            }
            None => intrinsic,
        };

        if size.is_empty() {
            return Err(SemanticError::ImageZeroSize {
                name: name.value.clone(),
                position: name.pos.clone(),
            }
            .into());
        }
        if !size.is_square() {
            return Err(SemanticError::ImageNotSquare {
                name: name.value.clone(),
                size,
                position: name.pos.clone(),
            }
            .into());
        }

        Ok(Ingredient {
            name: name.value.clone(),
            reference: path.value.clone(),
            intrinsic,
            size,
            declared_at: name.pos.clone(),
        })
    }

    /// `SPECIALTY_VAR ─ LITERAL(name) ─ INGREDIENT_VAR(name)+ ─ expr`
    fn specialty(&self, definition: NodeId) -> Result<Specialty, SemanticError> {
        let name_id = self.child(definition, 0)?;
        let name = self.ast.node(name_id);

        let mut portions = IndexMap::new();
        for &use_id in self.ast.children(name_id) {
            let portion = self.portion(use_id)?;
            // A later use replaces the quantity but keeps the first slot.
            portions.insert(portion.ingredient.name.clone(), portion);
        }

        Ok(Specialty {
            name: name.value.clone(),
            portions,
            declared_at: name.pos.clone(),
        })
    }

    /// `MAKE ─ SIZE ─ PIZZA ─ (OF | ADD | SAVE_AS)*`
    fn analyze_make(&mut self, make: NodeId) -> Result<(), CompileError> {
        let size_id = self.child(make, 0)?;
        let size_node = self.ast.node(size_id);
        let size = PizzaSize::from_str(&size_node.value).ok_or_else(|| SemanticError::Internal {
            kind: size_node.kind,
            position: size_node.pos.clone(),
            detail: format!("unknown pizza size '{}'", size_node.value),
        })?;

        let body = self.child(size_id, 0)?;
        let mut pizza = Pizza::new(size);

        for &clause in self.ast.children(body) {
            let node = self.ast.node(clause);
            match node.kind {
                NodeKind::Add => {
                    for &use_id in self.ast.children(clause) {
                        let portion = self.portion(use_id)?;
                        pizza
                            .portions
                            .entry(portion.ingredient.name.clone())
                            .or_insert(portion);
                    }
                }
                NodeKind::Of => {
                    for &name_id in self.ast.children(clause) {
                        let specialty = self.lookup_specialty(self.ast.node(name_id))?;
                        pizza
                            .specialties
                            .entry(specialty.name.clone())
                            .or_insert(specialty);
                    }
                }
                NodeKind::SaveAs => {
                    let path = self.ast.node(self.child(clause, 0)?);
                    pizza.output_name = Some(path.value.clone());
                }
                kind => {
                    return Err(SemanticError::Internal {
                        kind,
                        position: node.pos.clone(),
                        detail: "not a pizza clause".to_string(),
                    }
                    .into())
                }
            }
        }

        let declared_at = self.ast.node(make).pos.clone();
        trace!("make {} at {}", pizza, declared_at);
        self.instructions
            .push(Instruction::Make(Make { declared_at, pizza }));
        Ok(())
    }

    /// `INGREDIENT_VAR(name) ─ expr`, the quantity must be positive
    fn portion(&self, use_id: NodeId) -> Result<Portion, SemanticError> {
        let node = self.ast.node(use_id);
        let ingredient = self.lookup_ingredient(node)?;

        let quantity = self.evaluate(self.child(use_id, 0)?)?;
        if quantity <= 0 {
            return Err(SemanticError::InvalidQuantity {
                name: node.value.clone(),
                quantity,
                position: node.pos.clone(),
            });
        }

        Ok(Portion {
            ingredient,
            quantity,
        })
    }

    fn lookup(&self, node: &AstNode, expected: AssignmentKind) -> Result<&Assignment, SemanticError> {
        let assignment = self
            .symbols
            .get(&node.value)
            .ok_or_else(|| SemanticError::UndefinedName {
                kind: node.kind,
                name: node.value.clone(),
                position: node.pos.clone(),
            })?;

        if assignment.kind() != expected {
            return Err(SemanticError::KindMismatch {
                name: node.value.clone(),
                expected,
                found: assignment.kind(),
                position: node.pos.clone(),
            });
        }
        Ok(assignment)
    }

    fn lookup_ingredient(&self, node: &AstNode) -> Result<Arc<Ingredient>, SemanticError> {
        match self.lookup(node, AssignmentKind::Ingredient)? {
            Assignment::Ingredient(ingredient) => Ok(Arc::clone(ingredient)),
            Assignment::Specialty(_) => Err(self.mismatch(node)),
        }
    }

    fn lookup_specialty(&self, node: &AstNode) -> Result<Arc<Specialty>, SemanticError> {
        match self.lookup(node, AssignmentKind::Specialty)? {
            Assignment::Specialty(specialty) => Ok(Arc::clone(specialty)),
            Assignment::Ingredient(_) => Err(self.mismatch(node)),
        }
    }

    fn mismatch(&self, node: &AstNode) -> SemanticError {
        SemanticError::Internal {
            kind: node.kind,
            position: node.pos.clone(),
            detail: format!("'{}' changed kind during lookup", node.value),
        }
    }

    /// Evaluate a constant quantity expression with checked arithmetic
    fn evaluate(&self, id: NodeId) -> Result<i64, SemanticError> {
        let node = self.ast.node(id);
        let overflow = || SemanticError::ArithmeticOverflow {
            position: node.pos.clone(),
        };

        let result = match node.kind {
            NodeKind::Number => return node.value.parse::<i64>().map_err(|_| overflow()),
            NodeKind::Plus => {
                let (left, right) = self.operands(id)?;
                left.checked_add(right)
            }
            NodeKind::Minus => {
                let (left, right) = self.operands(id)?;
                left.checked_sub(right)
            }
            NodeKind::Multiply => {
                let (left, right) = self.operands(id)?;
                left.checked_mul(right)
            }
            NodeKind::Divide => {
                let (left, right) = self.operands(id)?;
                if right == 0 {
                    return Err(SemanticError::DivisionByZero {
                        position: node.pos.clone(),
                    });
                }
                left.checked_div(right)
            }
            kind => {
                return Err(SemanticError::Internal {
                    kind,
                    position: node.pos.clone(),
                    detail: "not an expression".to_string(),
                })
            }
        };

        result.ok_or_else(overflow)
    }

    fn operands(&self, id: NodeId) -> Result<(i64, i64), SemanticError> {
        let left = self.evaluate(self.child(id, 0)?)?;
        let right = self.evaluate(self.child(id, 1)?)?;
        Ok((left, right))
    }

    /// Child `index` of `id`; the parser always produces it, so a miss is internal
    fn child(&self, id: NodeId, index: usize) -> Result<NodeId, SemanticError> {
        self.ast.child(id, index).ok_or_else(|| {
            let node = self.ast.node(id);
            SemanticError::Internal {
                kind: node.kind,
                position: node.pos.clone(),
                detail: format!("missing child {}", index),
            }
        })
    }
}

fn unresolved(reference: &str, owner: &str, error: ResolveError, position: &Position) -> ResourceError {
    match error {
        ResolveError::NotFound => ResourceError::Invalid {
            reference: reference.to_string(),
            owner: owner.to_string(),
            position: position.clone(),
        },
        ResolveError::Unreadable(reason) => ResourceError::Unreachable {
            reference: reference.to_string(),
            owner: owner.to_string(),
            reason,
            position: position.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{MemorySources, StaticImageSizes};
    use pretty_assertions::assert_eq;

    fn images() -> StaticImageSizes {
        StaticImageSizes::new()
            .with("sq.png", 100, 100)
            .with("olive.png", 40, 40)
            .with("wide.png", 30, 20)
            .with("flat.png", 0, 0)
            .with_unreadable("broken.png", "truncated header")
    }

    fn compile_with(sources: MemorySources, text: &str) -> Result<Intermediate, CompileError> {
        Compiler::new(sources, images()).compile_source(SourceId::new("main.pf"), text)
    }

    fn compile(text: &str) -> Result<Intermediate, CompileError> {
        compile_with(MemorySources::new(), text)
    }

    fn semantic(text: &str) -> SemanticError {
        match compile(text) {
            Err(CompileError::Semantic(e)) => e,
            other => panic!("expected a semantic error, got {other:?}"),
        }
    }

    fn resource(sources: MemorySources, text: &str) -> ResourceError {
        match compile_with(sources, text) {
            Err(CompileError::Resource(e)) => e,
            other => panic!("expected a resource error, got {other:?}"),
        }
    }

    fn only_pizza(ir: &Intermediate) -> &Pizza {
        let pizzas: Vec<&Pizza> = ir.pizzas().collect();
        assert_eq!(pizzas.len(), 1);
        pizzas[0]
    }

    fn quantities(portions: &IndexMap<String, Portion>) -> Vec<(&str, i64)> {
        portions
            .iter()
            .map(|(name, portion)| (name.as_str(), portion.quantity))
            .collect()
    }

    #[test]
    fn test_declarations_fill_the_symbol_table() {
        let ir = compile(
            "define ingredient olive('olive.png');\n\
             define ingredient ham('sq.png');\n\
             define specialty classic { olive(2); ham(1); }",
        )
        .unwrap();

        assert_eq!(ir.symbols.names(), vec!["olive", "ham", "classic"]);
        assert_eq!(ir.symbols.get("olive").map(Assignment::kind), Some(AssignmentKind::Ingredient));
        assert_eq!(ir.symbols.get("classic").map(Assignment::kind), Some(AssignmentKind::Specialty));
        assert!(ir.instructions.is_empty());
    }

    #[test]
    fn test_names_are_case_insensitive() {
        let ir = compile("define ingredient Olive('olive.png'); make big pizza add OLIVE(1);").unwrap();
        assert_eq!(quantities(&only_pizza(&ir).portions), vec![("olive", 1)]);
    }

    #[test]
    fn test_duplicate_definition_points_at_original() {
        let err = semantic(
            "define ingredient olive('olive.png');\n\
             define specialty olive { olive(1); }",
        );
        match err {
            SemanticError::DuplicateDefinition { name, position, original } => {
                assert_eq!(name, "olive");
                assert_eq!(position.line, 2);
                assert_eq!(original.line, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resize_makes_any_image_square() {
        let ir = compile("define ingredient a('wide.png') resize 100; make big pizza add a(5);").unwrap();

        let ingredient = ir.symbols.ingredient("a").unwrap();
        assert_eq!(ingredient.intrinsic, ImageSize::new(30, 20));
        assert_eq!(ingredient.size, ImageSize::square(100));

        let pizza = only_pizza(&ir);
        assert_eq!(pizza.size, PizzaSize::Big);
        assert_eq!(quantities(&pizza.portions), vec![("a", 5)]);
        assert!(pizza.specialties.is_empty());
        assert_eq!(pizza.output_name, None);
    }

    #[test]
    fn test_image_shape_is_validated() {
        assert!(matches!(
            semantic("define ingredient a('wide.png');"),
            SemanticError::ImageNotSquare { size, .. } if size == ImageSize::new(30, 20)
        ));
        assert!(matches!(
            semantic("define ingredient a('flat.png');"),
            SemanticError::ImageZeroSize { .. }
        ));
        assert!(matches!(
            semantic("define ingredient a('sq.png') resize 0;"),
            SemanticError::ImageZeroSize { .. }
        ));
    }

    #[test]
    fn test_image_resolution_failures() {
        assert!(matches!(
            resource(MemorySources::new(), "define ingredient a('nope.png');"),
            ResourceError::Invalid { ref owner, .. } if owner == "ingredient 'a'"
        ));
        assert!(matches!(
            resource(MemorySources::new(), "define ingredient a('broken.png');"),
            ResourceError::Unreachable { ref reason, .. } if reason == "truncated header"
        ));
    }

    #[test]
    fn test_undefined_names() {
        assert!(matches!(
            semantic("make big pizza add ghost(1);"),
            SemanticError::UndefinedName { kind: NodeKind::IngredientVar, ref name, .. } if name == "ghost"
        ));
        assert!(matches!(
            semantic("make big pizza of ghost;"),
            SemanticError::UndefinedName { kind: NodeKind::SpecialtyVar, .. }
        ));
        assert!(matches!(
            semantic("define specialty s { ghost(1); }"),
            SemanticError::UndefinedName { .. }
        ));
    }

    #[test]
    fn test_kind_mismatches() {
        let prelude = "define ingredient a('sq.png'); define specialty s { a(1); }\n";

        assert!(matches!(
            semantic(&format!("{prelude}make big pizza add s(1);")),
            SemanticError::KindMismatch {
                expected: AssignmentKind::Ingredient,
                found: AssignmentKind::Specialty,
                ..
            }
        ));
        assert!(matches!(
            semantic(&format!("{prelude}define specialty t {{ s(1); }}")),
            SemanticError::KindMismatch {
                expected: AssignmentKind::Ingredient,
                found: AssignmentKind::Specialty,
                ..
            }
        ));
        assert!(matches!(
            semantic(&format!("{prelude}make big pizza of a;")),
            SemanticError::KindMismatch {
                expected: AssignmentKind::Specialty,
                found: AssignmentKind::Ingredient,
                ..
            }
        ));
    }

    #[test]
    fn test_quantities_must_be_positive() {
        let prelude = "define ingredient a('sq.png');\n";

        match semantic(&format!("{prelude}make big pizza add a(0);")) {
            SemanticError::InvalidQuantity { name, quantity, position } => {
                assert_eq!(name, "a");
                assert_eq!(quantity, 0);
                assert_eq!((position.line, position.column), (2, 20));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(
            semantic(&format!("{prelude}make big pizza add a(2 - 5);")),
            SemanticError::InvalidQuantity { quantity: -3, .. }
        ));
        assert!(matches!(
            semantic(&format!("{prelude}define specialty s {{ a(1 - 1); }}")),
            SemanticError::InvalidQuantity { quantity: 0, .. }
        ));
    }

    #[test]
    fn test_expressions_evaluate_right_associatively() {
        let ir = compile(
            "define ingredient a('sq.png'); define ingredient b('sq.png'); define ingredient c('sq.png');\n\
             make big pizza add a(10 - 3 - 2) and b(2 + 3 * 4) and c(7 / 2);",
        )
        .unwrap();
        assert_eq!(
            quantities(&only_pizza(&ir).portions),
            vec![("a", 9), ("b", 14), ("c", 3)]
        );
    }

    #[test]
    fn test_arithmetic_is_checked() {
        let prelude = "define ingredient a('sq.png');\n";

        assert!(matches!(
            semantic(&format!("{prelude}make big pizza add a(4 / 0);")),
            SemanticError::DivisionByZero { .. }
        ));
        assert!(matches!(
            semantic(&format!("{prelude}make big pizza add a(9223372036854775807 + 1);")),
            SemanticError::ArithmeticOverflow { .. }
        ));
        assert!(matches!(
            semantic(&format!("{prelude}make big pizza add a(99999999999999999999);")),
            SemanticError::ArithmeticOverflow { .. }
        ));
    }

    #[test]
    fn test_repeated_uses() {
        let ir = compile(
            "define ingredient a('sq.png'); define ingredient b('sq.png');\n\
             define specialty s { a(1); b(2); a(3); }\n\
             make medium pizza of s and s add b(4) and a(5) and b(6) save as 'Lunch';",
        )
        .unwrap();

        let specialty = ir.symbols.specialty("s").unwrap();
        assert_eq!(quantities(&specialty.portions), vec![("a", 3), ("b", 2)]);

        let pizza = only_pizza(&ir);
        assert_eq!(pizza.size, PizzaSize::Medium);
        assert_eq!(pizza.specialties.keys().collect::<Vec<_>>(), vec!["s"]);
        assert_eq!(quantities(&pizza.portions), vec![("b", 4), ("a", 5)]);
        assert_eq!(pizza.output_name.as_deref(), Some("Lunch"));
    }

    #[test]
    fn test_every_make_is_an_instruction() {
        let ir = compile(
            "define ingredient a('sq.png');\n\
             make big pizza add a(1);\n\
             make personal pizza add a(2) save as 'small';",
        )
        .unwrap();

        let lines: Vec<usize> = ir.instructions.iter().map(|i| i.declared_at().line).collect();
        assert_eq!(lines, vec![2, 3]);

        let names: Vec<String> = ir
            .pizzas()
            .enumerate()
            .map(|(index, pizza)| pizza.output_name_or(index).into_owned())
            .collect();
        assert_eq!(names, vec!["pizza0", "small"]);
    }

    #[test]
    fn test_included_instructions_come_first() {
        let sources = MemorySources::new().with_unit(
            "base.pf",
            "define ingredient olive('olive.png'); make personal pizza add olive(1);",
        );
        let ir = compile_with(
            sources,
            "include 'base';\n\
             define ingredient ham('sq.png');\n\
             make big pizza add olive(2) and ham(3);",
        )
        .unwrap();

        let sizes: Vec<PizzaSize> = ir.pizzas().map(|pizza| pizza.size).collect();
        assert_eq!(sizes, vec![PizzaSize::Personal, PizzaSize::Big]);
        assert_eq!(ir.symbols.names(), vec!["olive", "ham"]);
        assert_eq!(
            ir.instructions[0].declared_at().unit,
            SourceId::new("base.pf")
        );
    }

    #[test]
    fn test_includes_resolve_relative_to_the_including_unit() {
        let sources = MemorySources::new()
            .with_unit("lib/menus.pf", "include 'toppings';")
            .with_unit("lib/toppings.pf", "define ingredient olive('olive.png');");

        let ir = compile_with(sources, "include 'lib/menus';").unwrap();
        assert!(ir.symbols.contains("olive"));
    }

    #[test]
    fn test_self_include_is_rejected() {
        let sources = MemorySources::new().with_unit("main.pf", "include 'main';");
        match resource(sources, "include 'main';") {
            ResourceError::RecursiveInclude { reference, unit, .. } => {
                assert_eq!(reference, "main.pf");
                assert_eq!(unit, "main.pf");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_self_include_of_an_unregistered_unit() {
        match resource(MemorySources::new(), "define ingredient a('sq.png');\ninclude 'main';") {
            ResourceError::RecursiveInclude { reference, unit, position } => {
                assert_eq!(reference, "main.pf");
                assert_eq!(unit, "main.pf");
                assert_eq!(position.line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_transitive_cycle_is_rejected() {
        let sources = MemorySources::new()
            .with_unit("a.pf", "include 'b';")
            .with_unit("b.pf", "include 'a';");
        assert!(matches!(
            resource(sources, "include 'a';"),
            ResourceError::RecursiveInclude { ref unit, .. } if unit == "a.pf"
        ));
    }

    #[test]
    fn test_missing_include() {
        assert!(matches!(
            resource(MemorySources::new(), "include 'nowhere';"),
            ResourceError::Invalid { ref reference, ref owner, .. }
                if reference == "nowhere.pf" && owner == "include"
        ));
    }

    #[test]
    fn test_included_clash_is_a_duplicate() {
        let sources = MemorySources::new().with_unit("base.pf", "define ingredient olive('olive.png');");
        let err = match compile_with(
            sources,
            "define ingredient olive('sq.png');\ninclude 'base';",
        ) {
            Err(CompileError::Semantic(e)) => e,
            other => panic!("expected a semantic error, got {other:?}"),
        };

        match err {
            SemanticError::DuplicateDefinition { position, original, .. } => {
                assert_eq!(position.unit, SourceId::new("base.pf"));
                assert_eq!(original.unit, SourceId::new("main.pf"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_including_twice_redeclares() {
        let sources = MemorySources::new().with_unit("base.pf", "define ingredient olive('olive.png');");
        assert!(matches!(
            compile_with(sources, "include 'base'; include 'base';"),
            Err(CompileError::Semantic(SemanticError::DuplicateDefinition { .. }))
        ));
    }

    #[test]
    fn test_errors_inside_includes_abort() {
        let sources = MemorySources::new().with_unit("base.pf", "define ingredient a('sq.png');\n  $");
        match compile_with(sources, "include 'base';") {
            Err(CompileError::Lex(e)) => {
                assert_eq!(e.position().unit, SourceId::new("base.pf"));
                assert_eq!((e.position().line, e.position().column), (2, 3));
            }
            other => panic!("expected a lexer error, got {other:?}"),
        }
    }
}
