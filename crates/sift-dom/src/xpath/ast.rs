//! Expression tree for compiled XPath.

/// [§ 2.2 Axes](https://www.w3.org/TR/1999/REC-xpath-19991116/#axes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// `child::`
    Child,
    /// `descendant::`
    Descendant,
    /// `descendant-or-self::`
    DescendantOrSelf,
    /// `parent::`
    Parent,
    /// `ancestor::`
    Ancestor,
    /// `ancestor-or-self::`
    AncestorOrSelf,
    /// `following-sibling::`
    FollowingSibling,
    /// `preceding-sibling::`
    PrecedingSibling,
    /// `self::`
    SelfAxis,
    /// `attribute::` or `@`
    Attribute,
}

impl Axis {
    /// Look up an axis by its name in the grammar.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "child" => Self::Child,
            "descendant" => Self::Descendant,
            "descendant-or-self" => Self::DescendantOrSelf,
            "parent" => Self::Parent,
            "ancestor" => Self::Ancestor,
            "ancestor-or-self" => Self::AncestorOrSelf,
            "following-sibling" => Self::FollowingSibling,
            "preceding-sibling" => Self::PrecedingSibling,
            "self" => Self::SelfAxis,
            "attribute" => Self::Attribute,
            _ => return None,
        })
    }

    /// Reverse axes number their proximity positions backwards.
    #[must_use]
    pub const fn is_reverse(self) -> bool {
        matches!(
            self,
            Self::Parent | Self::Ancestor | Self::AncestorOrSelf | Self::PrecedingSibling
        )
    }
}

/// [§ 2.3 Node Tests](https://www.w3.org/TR/1999/REC-xpath-19991116/#node-tests)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTest {
    /// `*`
    Any,
    /// A (lower-cased) name test.
    Name(String),
    /// `text()`
    Text,
    /// `node()`
    Node,
}

/// [§ 2.1 Location Steps](https://www.w3.org/TR/1999/REC-xpath-19991116/#section-Location-Steps)
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// The axis the step walks.
    pub axis: Axis,
    /// Which nodes on the axis are kept.
    pub test: NodeTest,
    /// Predicates applied in order.
    pub predicates: Vec<Expr>,
}

/// [§ 2 Location Paths](https://www.w3.org/TR/1999/REC-xpath-19991116/#location-paths)
#[derive(Debug, Clone, PartialEq)]
pub struct LocationPath {
    /// Absolute paths start at the document node.
    pub absolute: bool,
    /// Steps from left to right.
    pub steps: Vec<Step>,
}

/// Binary operators in precedence-independent form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `or`
    Or,
    /// `and`
    And,
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `div`
    Div,
    /// `mod`
    Mod,
    /// `|`
    Union,
}

/// A compiled XPath expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A location path.
    Path(LocationPath),
    /// A primary expression filtered by predicates and optionally
    /// continued by a relative path, e.g. `(//p)[1]/a`.
    Filter {
        /// The filtered expression.
        primary: Box<Expr>,
        /// Predicates applied to the primary's node-set.
        predicates: Vec<Expr>,
        /// Steps continuing from the filtered nodes.
        steps: Vec<Step>,
    },
    /// A binary operation.
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    /// Unary minus.
    Negate(Box<Expr>),
    /// A string literal.
    Literal(String),
    /// A number literal.
    Number(f64),
    /// A function call.
    Call(String, Vec<Expr>),
}
