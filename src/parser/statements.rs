use crate::lexer::{Lexeme, Position, Token};
use crate::parser::expressions::Parser;
use crate::parser::{Ast, NodeId, NodeKind, ParserError};

const STATEMENT_STARTS: [Lexeme; 3] = [Lexeme::Include, Lexeme::Define, Lexeme::Make];

impl Parser {
    /// Parse a complete program
    /// # Errors
    /// If parsing fails at any point.
    pub fn parse_program(&mut self) -> Result<Ast, ParserError> {
        let root = self.ast.alloc(
            NodeKind::Program,
            self.unit.to_string(),
            Position::start(self.unit.clone()),
        );

        if self.peek().is_none() {
            return Err(ParserError::UnexpectedEnd {
                expected: STATEMENT_STARTS.to_vec(),
                position: self.last_position(),
            });
        }

        while let Some(token) = self.advance() {
            let statement = self.parse_statement(&token)?;
            self.ast.attach(root, statement);
        }

        self.ast.set_root(root);
        Ok(std::mem::take(&mut self.ast))
    }

    /// Parse the statement introduced by `token`
    fn parse_statement(&mut self, token: &Token) -> Result<NodeId, ParserError> {
        match token.lexeme {
            Lexeme::Include => self.parse_include(token),
            Lexeme::Define => self.parse_define(token),
            Lexeme::Make => self.parse_make(token),
            _ => Err(ParserError::UnrecognizedStatement {
                found: token.lexeme,
                text: token.text.clone(),
                position: token.pos.clone(),
            }),
        }
    }

    /// `include 'path';`
    fn parse_include(&mut self, keyword: &Token) -> Result<NodeId, ParserError> {
        let include = self.ast.alloc(NodeKind::Include, "include", keyword.pos.clone());

        let path = self.parse_text()?;
        self.ast.attach(include, path);

        self.expect(&[Lexeme::Semicolon])?;
        Ok(include)
    }

    fn parse_define(&mut self, keyword: &Token) -> Result<NodeId, ParserError> {
        let define = self.ast.alloc_structural(NodeKind::Define, keyword.pos.clone());

        let kind = self.expect(&[Lexeme::Ingredient, Lexeme::Specialty])?;
        let definition = match kind.lexeme {
            Lexeme::Ingredient => self.parse_ingredient(&kind)?,
            _ => self.parse_specialty(&kind)?,
        };
        self.ast.attach(define, definition);

        Ok(define)
    }

    /// `ingredient NAME('path') [resize N];`
    fn parse_ingredient(&mut self, keyword: &Token) -> Result<NodeId, ParserError> {
        let ingredient = self
            .ast
            .alloc_structural(NodeKind::IngredientVar, keyword.pos.clone());

        let name = self.literal(NodeKind::Literal)?;
        self.ast.attach(ingredient, name);

        self.expect(&[Lexeme::OpenParen])?;
        let path = self.parse_text()?;
        self.ast.attach(name, path);
        self.expect(&[Lexeme::CloseParen])?;

        if let Some(resize) = self.ask(&[Lexeme::Resize]) {
            let resize_node = self.ast.alloc(NodeKind::Resize, "resize", resize.pos);
            let number = self.expect(&[Lexeme::Number])?;
            let number_node = self.ast.alloc(NodeKind::Number, number.text, number.pos);
            self.ast.attach(resize_node, number_node);
            self.ast.attach(ingredient, resize_node);
        }

        self.expect(&[Lexeme::Semicolon])?;
        Ok(ingredient)
    }

    /// `specialty NAME { USE; USE; ... }`
    fn parse_specialty(&mut self, keyword: &Token) -> Result<NodeId, ParserError> {
        let specialty = self
            .ast
            .alloc_structural(NodeKind::SpecialtyVar, keyword.pos.clone());

        let name = self.literal(NodeKind::Literal)?;
        self.ast.attach(specialty, name);

        self.expect(&[Lexeme::OpenBrace])?;
        loop {
            let portion = self.parse_ingredient_use()?;
            self.ast.attach(name, portion);
            self.expect(&[Lexeme::Semicolon])?;

            if self.check(&[Lexeme::CloseBrace]) {
                break;
            }
        }
        self.expect(&[Lexeme::CloseBrace])?;

        Ok(specialty)
    }

    /// `make SIZE pizza BODY;`
    fn parse_make(&mut self, keyword: &Token) -> Result<NodeId, ParserError> {
        let make = self.ast.alloc_structural(NodeKind::Make, keyword.pos.clone());

        let size = self.expect(&[Lexeme::Big, Lexeme::Medium, Lexeme::Personal])?;
        let size_node = self
            .ast
            .alloc(NodeKind::Size, size.text.to_lowercase(), size.pos);
        self.ast.attach(make, size_node);

        let pizza = self.expect(&[Lexeme::Pizza])?;
        let body = self.parse_pizza(&pizza)?;
        self.ast.attach(size_node, body);

        self.expect(&[Lexeme::Semicolon])?;
        Ok(make)
    }

    /// `(add USES | of NAMES [add USES]) [save as 'name']`
    fn parse_pizza(&mut self, keyword: &Token) -> Result<NodeId, ParserError> {
        let pizza = self.ast.alloc_structural(NodeKind::Pizza, keyword.pos.clone());

        let first = self.expect(&[Lexeme::Add, Lexeme::Of])?;
        let clause = match first.lexeme {
            Lexeme::Add => self.parse_add(&first)?,
            _ => self.parse_of(&first)?,
        };
        self.ast.attach(pizza, clause);

        if first.is(Lexeme::Of) {
            if let Some(add) = self.ask(&[Lexeme::Add]) {
                let clause = self.parse_add(&add)?;
                self.ast.attach(pizza, clause);
            }
        }

        if let Some(save) = self.ask(&[Lexeme::Save]) {
            let clause = self.parse_save(&save)?;
            self.ast.attach(pizza, clause);
        }

        Ok(pizza)
    }

    fn parse_add(&mut self, keyword: &Token) -> Result<NodeId, ParserError> {
        let add = self.ast.alloc_structural(NodeKind::Add, keyword.pos.clone());

        loop {
            let portion = self.parse_ingredient_use()?;
            self.ast.attach(add, portion);

            if self.ask(&[Lexeme::And]).is_none() {
                break;
            }
        }

        Ok(add)
    }

    fn parse_of(&mut self, keyword: &Token) -> Result<NodeId, ParserError> {
        let of = self.ast.alloc_structural(NodeKind::Of, keyword.pos.clone());

        loop {
            let specialty = self.literal(NodeKind::SpecialtyVar)?;
            self.ast.attach(of, specialty);

            if self.ask(&[Lexeme::And]).is_none() {
                break;
            }
        }

        Ok(of)
    }

    /// `NAME(expr)`
    fn parse_ingredient_use(&mut self) -> Result<NodeId, ParserError> {
        let ingredient = self.literal(NodeKind::IngredientVar)?;

        self.expect(&[Lexeme::OpenParen])?;
        let quantity = self.parse_expression()?;
        self.ast.attach(ingredient, quantity);
        self.expect(&[Lexeme::CloseParen])?;

        Ok(ingredient)
    }

    fn parse_save(&mut self, keyword: &Token) -> Result<NodeId, ParserError> {
        let save = self.ast.alloc(NodeKind::SaveAs, "save", keyword.pos.clone());

        self.expect(&[Lexeme::As])?;
        let name = self.parse_text()?;
        self.ast.attach(save, name);

        Ok(save)
    }

    /// Consume an identifier into a node of `kind` named after it.
    /// Names are case-insensitive, so the value is lower-cased.
    fn literal(&mut self, kind: NodeKind) -> Result<NodeId, ParserError> {
        let token = self.expect(&[Lexeme::Literal])?;
        Ok(self.ast.alloc(kind, token.text.to_lowercase(), token.pos))
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::{tokenize, Lexeme};
    use crate::parser::{Ast, NodeId, NodeKind, Parser, ParserError};
    use crate::source::{SourceId, SourceUnit};
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> Result<Ast, ParserError> {
        let unit = SourceUnit::new(SourceId::new("menu.pf"), text).unwrap();
        Parser::new(tokenize(&unit).unwrap(), unit.id).parse_program()
    }

    /// `KIND:value` lines, indented by depth, for comparing tree shapes.
    fn outline(ast: &Ast) -> Vec<String> {
        fn walk(ast: &Ast, id: NodeId, depth: usize, out: &mut Vec<String>) {
            let node = ast.node(id);
            out.push(format!("{}{}:{}", "  ".repeat(depth), node.kind, node.value));
            for &child in node.children() {
                walk(ast, child, depth + 1, out);
            }
        }

        let mut out = Vec::new();
        walk(ast, ast.root().unwrap(), 0, &mut out);
        out
    }

    #[test]
    fn test_include() {
        let ast = parse("include 'menus/''basic';").unwrap();
        assert_eq!(
            outline(&ast),
            vec![
                "PROGRAM:menu.pf",
                "  INCLUDE:include",
                "    PATH:menus/basic",
            ]
        );
    }

    #[test]
    fn test_ingredient_definition() {
        let ast = parse("define ingredient Olive('Olive.PNG') resize 40;").unwrap();
        assert_eq!(
            outline(&ast),
            vec![
                "PROGRAM:menu.pf",
                "  DEFINE:DEFINE",
                "    INGREDIENT_VAR:INGREDIENT_VAR",
                "      LITERAL:olive",
                "        PATH:Olive.PNG",
                "      RESIZE:resize",
                "        NUMBER:40",
            ]
        );
    }

    #[test]
    fn test_specialty_definition() {
        let ast = parse("define specialty Hawaiana { ham(3); pineapple(2 * 2); }").unwrap();
        assert_eq!(
            outline(&ast),
            vec![
                "PROGRAM:menu.pf",
                "  DEFINE:DEFINE",
                "    SPECIALTY_VAR:SPECIALTY_VAR",
                "      LITERAL:hawaiana",
                "        INGREDIENT_VAR:ham",
                "          NUMBER:3",
                "        INGREDIENT_VAR:pineapple",
                "          MULTIPLY:MULTIPLY",
                "            NUMBER:2",
                "            NUMBER:2",
            ]
        );
    }

    #[test]
    fn test_make_with_every_clause() {
        let ast = parse(
            "make medium pizza of hawaiana and mexicana add olive(5) and ham(1 + 1) save as 'Dinner';",
        )
        .unwrap();
        assert_eq!(
            outline(&ast),
            vec![
                "PROGRAM:menu.pf",
                "  MAKE:MAKE",
                "    SIZE:medium",
                "      PIZZA:PIZZA",
                "        OF:OF",
                "          SPECIALTY_VAR:hawaiana",
                "          SPECIALTY_VAR:mexicana",
                "        ADD:ADD",
                "          INGREDIENT_VAR:olive",
                "            NUMBER:5",
                "          INGREDIENT_VAR:ham",
                "            PLUS:PLUS",
                "              NUMBER:1",
                "              NUMBER:1",
                "        SAVE_AS:save",
                "          PATH:Dinner",
            ]
        );
    }

    #[test]
    fn test_parent_links_reach_program() {
        let ast = parse("make big pizza add olive(5);").unwrap();
        let root = ast.root().unwrap();
        let number = ast.find(root, NodeKind::Number)[0];
        assert_eq!(ast.ancestor_root(number), root);
        assert_eq!(ast.node(ast.parent(number).unwrap()).value, "olive");
    }

    #[test]
    fn test_add_cannot_precede_of() {
        let err = parse("make big pizza add olive(1) of hawaiana;").unwrap_err();
        assert!(matches!(
            err,
            ParserError::ExpectedLexeme { found: Lexeme::Of, .. }
        ));
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse("include 'basicmenu'").unwrap_err();
        match err {
            ParserError::UnexpectedEnd { expected, position } => {
                assert_eq!(expected, vec![Lexeme::Semicolon]);
                assert_eq!((position.line, position.column), (1, 19));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_include_needs_quoted_text() {
        let err = parse("include make;").unwrap_err();
        assert!(matches!(
            err,
            ParserError::ExpectedLexeme { found: Lexeme::Make, ref expected, .. }
                if expected == &vec![Lexeme::SingleQuote]
        ));
    }

    #[test]
    fn test_unrecognized_statement() {
        let err = parse("bake big pizza of mexicana;").unwrap_err();
        match err {
            ParserError::UnrecognizedStatement { found, text, position } => {
                assert_eq!(found, Lexeme::Literal);
                assert_eq!(text, "bake");
                assert_eq!((position.line, position.column), (1, 1));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_empty_specialty_is_rejected() {
        let err = parse("define specialty empty { }").unwrap_err();
        assert!(matches!(
            err,
            ParserError::ExpectedLexeme { found: Lexeme::CloseBrace, .. }
        ));
    }

    #[test]
    fn test_empty_program() {
        let err = parse("// nothing but a comment").unwrap_err();
        assert!(matches!(err, ParserError::UnexpectedEnd { .. }));
    }

    #[test]
    fn test_error_message_names_expected_and_position() {
        let err = parse("make big pizza add olive(1)").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Syntax Error: expected ';' after [row=1; column=27] in menu.pf but the tokens ran out"
        );
    }
}
