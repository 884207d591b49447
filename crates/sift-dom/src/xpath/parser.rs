//! Recursive-descent parser for the
//! [§ 3 Expressions](https://www.w3.org/TR/1999/REC-xpath-19991116/#section-Expressions)
//! grammar.

use super::XPathError;
use super::ast::{Axis, BinaryOp, Expr, LocationPath, NodeTest, Step};
use super::lexer::{Spanned, Token};

pub(super) struct Parser {
    tokens: Vec<Spanned>,
    position: usize,
}

impl Parser {
    pub(super) const fn new(tokens: Vec<Spanned>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    pub(super) fn parse(mut self) -> Result<Expr, XPathError> {
        let expr = self.parse_or()?;
        if self.position < self.tokens.len() {
            return Err(self.error("unexpected trailing input"));
        }
        Ok(expr)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position).map(|s| &s.token)
    }

    fn peek_at(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n).map(|s| &s.token)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).map(|s| s.token.clone());
        self.position += 1;
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token, what: &str) -> Result<(), XPathError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(&format!("expected {what}")))
        }
    }

    fn eat_operator_name(&mut self, name: &str) -> bool {
        if matches!(self.peek(), Some(Token::Name(n)) if n == name) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn error(&self, message: &str) -> XPathError {
        let offset = self
            .tokens
            .get(self.position)
            .or_else(|| self.tokens.last())
            .map_or(0, |s| s.offset);
        XPathError::Syntax {
            offset,
            message: message.to_string(),
        }
    }

    // [21] OrExpr ::= AndExpr | OrExpr 'or' AndExpr
    fn parse_or(&mut self) -> Result<Expr, XPathError> {
        let mut left = self.parse_and()?;
        while self.eat_operator_name("or") {
            let right = self.parse_and()?;
            left = Expr::Binary(BinaryOp::Or, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    // [22] AndExpr ::= EqualityExpr | AndExpr 'and' EqualityExpr
    fn parse_and(&mut self) -> Result<Expr, XPathError> {
        let mut left = self.parse_equality()?;
        while self.eat_operator_name("and") {
            let right = self.parse_equality()?;
            left = Expr::Binary(BinaryOp::And, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    // [23] EqualityExpr
    fn parse_equality(&mut self) -> Result<Expr, XPathError> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.peek() {
                Some(Token::Equals) => BinaryOp::Eq,
                Some(Token::NotEquals) => BinaryOp::Ne,
                _ => return Ok(left),
            };
            self.position += 1;
            let right = self.parse_relational()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
    }

    // [24] RelationalExpr
    fn parse_relational(&mut self) -> Result<Expr, XPathError> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek() {
                Some(Token::Less) => BinaryOp::Lt,
                Some(Token::LessEq) => BinaryOp::Le,
                Some(Token::Greater) => BinaryOp::Gt,
                Some(Token::GreaterEq) => BinaryOp::Ge,
                _ => return Ok(left),
            };
            self.position += 1;
            let right = self.parse_additive()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
    }

    // [25] AdditiveExpr
    fn parse_additive(&mut self) -> Result<Expr, XPathError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.position += 1;
            let right = self.parse_multiplicative()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
    }

    // [26] MultiplicativeExpr
    fn parse_multiplicative(&mut self) -> Result<Expr, XPathError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = if self.eat(&Token::Star) {
                BinaryOp::Mul
            } else if self.eat_operator_name("div") {
                BinaryOp::Div
            } else if self.eat_operator_name("mod") {
                BinaryOp::Mod
            } else {
                return Ok(left);
            };
            let right = self.parse_unary()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
    }

    // [27] UnaryExpr
    fn parse_unary(&mut self) -> Result<Expr, XPathError> {
        if self.eat(&Token::Minus) {
            return Ok(Expr::Negate(Box::new(self.parse_unary()?)));
        }
        self.parse_union()
    }

    // [18] UnionExpr
    fn parse_union(&mut self) -> Result<Expr, XPathError> {
        let mut left = self.parse_path()?;
        while self.eat(&Token::Pipe) {
            let right = self.parse_path()?;
            left = Expr::Binary(BinaryOp::Union, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    // [19] PathExpr
    fn parse_path(&mut self) -> Result<Expr, XPathError> {
        if self.starts_primary() {
            let primary = self.parse_primary()?;
            let predicates = self.parse_predicates()?;
            let steps = match self.peek() {
                Some(Token::Slash | Token::DoubleSlash) => self.parse_relative_steps(false)?,
                _ => Vec::new(),
            };
            if predicates.is_empty() && steps.is_empty() {
                return Ok(primary);
            }
            return Ok(Expr::Filter {
                primary: Box::new(primary),
                predicates,
                steps,
            });
        }
        Ok(Expr::Path(self.parse_location_path()?))
    }

    fn starts_primary(&self) -> bool {
        match self.peek() {
            Some(Token::LeftParen | Token::Literal(_) | Token::Number(_)) => true,
            Some(Token::Name(name)) => {
                self.peek_at(1) == Some(&Token::LeftParen) && !is_node_type(name)
            }
            _ => false,
        }
    }

    // [15] PrimaryExpr
    fn parse_primary(&mut self) -> Result<Expr, XPathError> {
        match self.advance() {
            Some(Token::LeftParen) => {
                let inner = self.parse_or()?;
                self.expect(&Token::RightParen, "')'")?;
                Ok(inner)
            }
            Some(Token::Literal(value)) => Ok(Expr::Literal(value)),
            Some(Token::Number(value)) => Ok(Expr::Number(value)),
            Some(Token::Name(name)) => {
                self.expect(&Token::LeftParen, "'('")?;
                let mut args = Vec::new();
                if !self.eat(&Token::RightParen) {
                    loop {
                        args.push(self.parse_or()?);
                        if self.eat(&Token::RightParen) {
                            break;
                        }
                        self.expect(&Token::Comma, "',' or ')'")?;
                    }
                }
                Ok(Expr::Call(name, args))
            }
            _ => {
                self.position -= 1;
                Err(self.error("expected a primary expression"))
            }
        }
    }

    // [1] LocationPath
    fn parse_location_path(&mut self) -> Result<LocationPath, XPathError> {
        match self.peek() {
            Some(Token::Slash) => {
                self.position += 1;
                let steps = if self.starts_step() {
                    self.parse_relative_steps(true)?
                } else {
                    Vec::new()
                };
                Ok(LocationPath {
                    absolute: true,
                    steps,
                })
            }
            Some(Token::DoubleSlash) => Ok(LocationPath {
                absolute: true,
                steps: self.parse_relative_steps(false)?,
            }),
            _ => Ok(LocationPath {
                absolute: false,
                steps: self.parse_relative_steps(true)?,
            }),
        }
    }

    /// Parse `Step (('/' | '//') Step)*`. When `leading_step` is false the
    /// sequence starts with a separator.
    fn parse_relative_steps(&mut self, leading_step: bool) -> Result<Vec<Step>, XPathError> {
        let mut steps = Vec::new();
        if leading_step {
            steps.push(self.parse_step()?);
        }
        loop {
            if self.eat(&Token::Slash) {
                steps.push(self.parse_step()?);
            } else if self.eat(&Token::DoubleSlash) {
                steps.push(descendant_or_self_step());
                steps.push(self.parse_step()?);
            } else {
                return Ok(steps);
            }
        }
    }

    fn starts_step(&self) -> bool {
        matches!(
            self.peek(),
            Some(Token::Name(_) | Token::Star | Token::At | Token::Dot | Token::DoubleDot)
        )
    }

    // [4] Step
    fn parse_step(&mut self) -> Result<Step, XPathError> {
        if self.eat(&Token::Dot) {
            return Ok(Step {
                axis: Axis::SelfAxis,
                test: NodeTest::Node,
                predicates: Vec::new(),
            });
        }
        if self.eat(&Token::DoubleDot) {
            return Ok(Step {
                axis: Axis::Parent,
                test: NodeTest::Node,
                predicates: Vec::new(),
            });
        }

        let axis = if self.eat(&Token::At) {
            Axis::Attribute
        } else if let (Some(Token::Name(name)), Some(Token::DoubleColon)) =
            (self.peek(), self.peek_at(1))
        {
            let axis = Axis::from_name(name)
                .ok_or_else(|| self.error(&format!("unknown axis {name}")))?;
            self.position += 2;
            axis
        } else {
            Axis::Child
        };

        let test = match self.advance() {
            Some(Token::Star) => NodeTest::Any,
            Some(Token::Name(name)) if is_node_type(&name) => {
                self.expect(&Token::LeftParen, "'('")?;
                self.expect(&Token::RightParen, "')'")?;
                match name.as_str() {
                    "text" => NodeTest::Text,
                    _ => NodeTest::Node,
                }
            }
            Some(Token::Name(name)) => NodeTest::Name(name.to_ascii_lowercase()),
            _ => {
                self.position -= 1;
                return Err(self.error("expected a node test"));
            }
        };

        Ok(Step {
            axis,
            test,
            predicates: self.parse_predicates()?,
        })
    }

    // [8] Predicate
    fn parse_predicates(&mut self) -> Result<Vec<Expr>, XPathError> {
        let mut predicates = Vec::new();
        while self.eat(&Token::LeftBracket) {
            predicates.push(self.parse_or()?);
            self.expect(&Token::RightBracket, "']'")?;
        }
        Ok(predicates)
    }
}

fn descendant_or_self_step() -> Step {
    Step {
        axis: Axis::DescendantOrSelf,
        test: NodeTest::Node,
        predicates: Vec::new(),
    }
}

fn is_node_type(name: &str) -> bool {
    matches!(name, "text" | "node")
}
