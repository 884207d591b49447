//! Evaluation of compiled expressions per
//! [§ 1 Introduction](https://www.w3.org/TR/1999/REC-xpath-19991116/#section-Introduction):
//! "Expression evaluation occurs with respect to a context."

use super::XPathError;
use super::ast::{Axis, BinaryOp, Expr, NodeTest, Step};
use crate::{DomTree, NodeId, NodeType};

/// An XPath node: either a tree node or an attribute of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
enum XNode {
    Tree(NodeId),
    Attribute(NodeId, String),
}

impl XNode {
    const fn owner(&self) -> NodeId {
        match self {
            Self::Tree(id) | Self::Attribute(id, _) => *id,
        }
    }
}

/// [§ 1](https://www.w3.org/TR/1999/REC-xpath-19991116/#section-Introduction)
/// "An expression is evaluated to yield an object, which has one of the
/// following four basic types: node-set, boolean, number, string."
#[derive(Debug, Clone)]
enum Value {
    Nodes(Vec<XNode>),
    Boolean(bool),
    Number(f64),
    String(String),
}

/// "the context node, a pair of non-zero positive integers (the context
/// position and the context size)"
#[derive(Debug, Clone)]
struct Context {
    node: XNode,
    position: usize,
    size: usize,
}

pub(super) struct Evaluator<'a> {
    tree: &'a DomTree,
    order: Vec<usize>,
}

impl<'a> Evaluator<'a> {
    pub(super) fn new(tree: &'a DomTree) -> Self {
        Self {
            tree,
            order: tree.document_order(),
        }
    }

    /// Evaluate an expression from the document node and keep the elements.
    pub(super) fn select_elements(&self, expr: &Expr) -> Result<Vec<NodeId>, XPathError> {
        let root = Context {
            node: XNode::Tree(NodeId::ROOT),
            position: 1,
            size: 1,
        };
        match self.eval(expr, &root)? {
            Value::Nodes(nodes) => Ok(nodes
                .into_iter()
                .filter_map(|n| match n {
                    XNode::Tree(id) if self.tree.as_element(id).is_some() => Some(id),
                    _ => None,
                })
                .collect()),
            _ => Err(XPathError::NotANodeSet),
        }
    }

    fn eval(&self, expr: &Expr, ctx: &Context) -> Result<Value, XPathError> {
        match expr {
            Expr::Path(path) => {
                let start = if path.absolute {
                    vec![XNode::Tree(NodeId::ROOT)]
                } else {
                    vec![ctx.node.clone()]
                };
                Ok(Value::Nodes(self.eval_steps(start, &path.steps)?))
            }
            Expr::Filter {
                primary,
                predicates,
                steps,
            } => {
                let Value::Nodes(mut nodes) = self.eval(primary, ctx)? else {
                    return Err(XPathError::NotANodeSet);
                };
                for predicate in predicates {
                    nodes = self.filter(nodes, predicate)?;
                }
                Ok(Value::Nodes(self.eval_steps(nodes, steps)?))
            }
            Expr::Binary(op, left, right) => self.eval_binary(*op, left, right, ctx),
            Expr::Negate(inner) => Ok(Value::Number(-self.number(&self.eval(inner, ctx)?))),
            Expr::Literal(value) => Ok(Value::String(value.clone())),
            Expr::Number(value) => Ok(Value::Number(*value)),
            Expr::Call(name, args) => self.call(name, args, ctx),
        }
    }

    fn eval_steps(&self, mut nodes: Vec<XNode>, steps: &[Step]) -> Result<Vec<XNode>, XPathError> {
        for step in steps {
            let mut next = Vec::new();
            for node in &nodes {
                let mut selected: Vec<XNode> = self
                    .axis(node, step.axis)
                    .into_iter()
                    .filter(|candidate| self.node_test(candidate, step.axis, &step.test))
                    .collect();
                for predicate in &step.predicates {
                    selected = self.filter(selected, predicate)?;
                }
                next.extend(selected);
            }
            nodes = self.document_sorted(next);
        }
        Ok(nodes)
    }

    /// [§ 2.4 Predicates](https://www.w3.org/TR/1999/REC-xpath-19991116/#predicates)
    ///
    /// "If the result is a number, the result will be converted to true if the
    /// number is equal to the context position."
    fn filter(&self, nodes: Vec<XNode>, predicate: &Expr) -> Result<Vec<XNode>, XPathError> {
        let size = nodes.len();
        let mut kept = Vec::new();
        for (index, node) in nodes.into_iter().enumerate() {
            let ctx = Context {
                node: node.clone(),
                position: index + 1,
                size,
            };
            let keep = match self.eval(predicate, &ctx)? {
                #[allow(clippy::cast_precision_loss)]
                Value::Number(n) => (n - ctx.position as f64).abs() < f64::EPSILON,
                other => self.boolean(&other),
            };
            if keep {
                kept.push(node);
            }
        }
        Ok(kept)
    }

    /// Nodes on `axis` from `node`, in proximity order.
    fn axis(&self, node: &XNode, axis: Axis) -> Vec<XNode> {
        let tree = self.tree;
        let id = match node {
            XNode::Tree(id) => *id,
            XNode::Attribute(owner, _) => {
                return match axis {
                    Axis::SelfAxis => vec![node.clone()],
                    Axis::Parent => vec![XNode::Tree(*owner)],
                    Axis::Ancestor | Axis::AncestorOrSelf => std::iter::once(*owner)
                        .chain(tree.ancestors(*owner))
                        .map(XNode::Tree)
                        .collect(),
                    _ => Vec::new(),
                };
            }
        };

        let ids: Vec<NodeId> = match axis {
            Axis::Child => tree.children(id).to_vec(),
            Axis::Descendant => tree.descendants(id),
            Axis::DescendantOrSelf => std::iter::once(id).chain(tree.descendants(id)).collect(),
            Axis::Parent => tree.parent(id).into_iter().collect(),
            Axis::Ancestor => tree.ancestors(id).collect(),
            Axis::AncestorOrSelf => std::iter::once(id).chain(tree.ancestors(id)).collect(),
            Axis::FollowingSibling => tree.following_siblings(id).to_vec(),
            Axis::PrecedingSibling => tree.preceding_siblings(id).collect(),
            Axis::SelfAxis => vec![id],
            Axis::Attribute => {
                return tree.as_element(id).map_or_else(Vec::new, |element| {
                    element
                        .attrs
                        .keys()
                        .map(|name| XNode::Attribute(id, name.clone()))
                        .collect()
                });
            }
        };
        ids.into_iter().map(XNode::Tree).collect()
    }

    /// [§ 2.3 Node Tests](https://www.w3.org/TR/1999/REC-xpath-19991116/#node-tests)
    ///
    /// "Every axis has a principal node type": attribute for the attribute
    /// axis, element otherwise.
    fn node_test(&self, node: &XNode, axis: Axis, test: &NodeTest) -> bool {
        match (node, test) {
            (_, NodeTest::Node) => true,
            (XNode::Attribute(..), NodeTest::Any) => axis == Axis::Attribute,
            (XNode::Attribute(_, name), NodeTest::Name(wanted)) => {
                axis == Axis::Attribute && name == wanted
            }
            (XNode::Attribute(..), NodeTest::Text) => false,
            (XNode::Tree(id), NodeTest::Any) => self.tree.as_element(*id).is_some(),
            (XNode::Tree(id), NodeTest::Name(wanted)) => self
                .tree
                .as_element(*id)
                .is_some_and(|e| e.tag_name.eq_ignore_ascii_case(wanted)),
            (XNode::Tree(id), NodeTest::Text) => self.tree.as_text(*id).is_some(),
        }
    }

    fn document_sorted(&self, mut nodes: Vec<XNode>) -> Vec<XNode> {
        nodes.sort_by(|a, b| self.order_key(a).cmp(&self.order_key(b)));
        nodes.dedup();
        nodes
    }

    fn order_key<'n>(&self, node: &'n XNode) -> (usize, Option<&'n str>) {
        let position = self.order.get(node.owner().0).copied().unwrap_or(usize::MAX);
        match node {
            XNode::Tree(_) => (position, None),
            XNode::Attribute(_, name) => (position, Some(name.as_str())),
        }
    }

    fn eval_binary(
        &self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        ctx: &Context,
    ) -> Result<Value, XPathError> {
        // [§ 3.4] "The right operand is not evaluated if the left operand
        // evaluates to true" (and the mirror rule for `and`).
        match op {
            BinaryOp::Or => {
                let l = self.boolean(&self.eval(left, ctx)?);
                return Ok(Value::Boolean(l || self.boolean(&self.eval(right, ctx)?)));
            }
            BinaryOp::And => {
                let l = self.boolean(&self.eval(left, ctx)?);
                return Ok(Value::Boolean(l && self.boolean(&self.eval(right, ctx)?)));
            }
            _ => {}
        }

        let l = self.eval(left, ctx)?;
        let r = self.eval(right, ctx)?;
        Ok(match op {
            BinaryOp::Union => match (l, r) {
                (Value::Nodes(mut a), Value::Nodes(b)) => {
                    a.extend(b);
                    Value::Nodes(self.document_sorted(a))
                }
                _ => return Err(XPathError::NotANodeSet),
            },
            BinaryOp::Add => Value::Number(self.number(&l) + self.number(&r)),
            BinaryOp::Sub => Value::Number(self.number(&l) - self.number(&r)),
            BinaryOp::Mul => Value::Number(self.number(&l) * self.number(&r)),
            BinaryOp::Div => Value::Number(self.number(&l) / self.number(&r)),
            BinaryOp::Mod => Value::Number(self.number(&l) % self.number(&r)),
            _ => Value::Boolean(self.compare(op, &l, &r)),
        })
    }

    /// [§ 3.4 Booleans](https://www.w3.org/TR/1999/REC-xpath-19991116/#booleans)
    fn compare(&self, op: BinaryOp, left: &Value, right: &Value) -> bool {
        match (left, right) {
            (Value::Nodes(a), Value::Nodes(b)) => a.iter().any(|x| {
                let sx = self.string_value(x);
                b.iter()
                    .any(|y| self.compare_atoms(op, &Value::String(sx.clone()), &Value::String(self.string_value(y))))
            }),
            (Value::Nodes(nodes), Value::Boolean(_)) => {
                self.compare_atoms(op, &Value::Boolean(!nodes.is_empty()), right)
            }
            (Value::Boolean(_), Value::Nodes(nodes)) => {
                self.compare_atoms(op, left, &Value::Boolean(!nodes.is_empty()))
            }
            (Value::Nodes(nodes), atom) => nodes
                .iter()
                .any(|n| self.compare_atoms(op, &Value::String(self.string_value(n)), atom)),
            (atom, Value::Nodes(nodes)) => nodes
                .iter()
                .any(|n| self.compare_atoms(op, atom, &Value::String(self.string_value(n)))),
            _ => self.compare_atoms(op, left, right),
        }
    }

    fn compare_atoms(&self, op: BinaryOp, left: &Value, right: &Value) -> bool {
        match op {
            BinaryOp::Eq | BinaryOp::Ne => {
                let equal = match (left, right) {
                    (Value::Boolean(_), _) | (_, Value::Boolean(_)) => {
                        self.boolean(left) == self.boolean(right)
                    }
                    (Value::Number(_), _) | (_, Value::Number(_)) => {
                        (self.number(left) - self.number(right)).abs() < f64::EPSILON
                    }
                    _ => self.string(left) == self.string(right),
                };
                equal == (op == BinaryOp::Eq)
            }
            _ => {
                let (a, b) = (self.number(left), self.number(right));
                match op {
                    BinaryOp::Lt => a < b,
                    BinaryOp::Le => a <= b,
                    BinaryOp::Gt => a > b,
                    _ => a >= b,
                }
            }
        }
    }

    /// [§ 4 Core Function Library](https://www.w3.org/TR/1999/REC-xpath-19991116/#corelib)
    fn call(&self, name: &str, args: &[Expr], ctx: &Context) -> Result<Value, XPathError> {
        let arity = |ok: bool| {
            if ok {
                Ok(())
            } else {
                Err(XPathError::Arity(name.to_string()))
            }
        };
        let values = args
            .iter()
            .map(|arg| self.eval(arg, ctx))
            .collect::<Result<Vec<_>, _>>()?;
        let context_string = || self.string_value(&ctx.node);

        #[allow(clippy::cast_precision_loss)]
        let value = match name {
            "last" => {
                arity(values.is_empty())?;
                Value::Number(ctx.size as f64)
            }
            "position" => {
                arity(values.is_empty())?;
                Value::Number(ctx.position as f64)
            }
            "count" => {
                arity(values.len() == 1)?;
                match &values[0] {
                    Value::Nodes(nodes) => Value::Number(nodes.len() as f64),
                    _ => return Err(XPathError::NotANodeSet),
                }
            }
            "not" => {
                arity(values.len() == 1)?;
                Value::Boolean(!self.boolean(&values[0]))
            }
            "true" => Value::Boolean(true),
            "false" => Value::Boolean(false),
            "boolean" => {
                arity(values.len() == 1)?;
                Value::Boolean(self.boolean(&values[0]))
            }
            "number" => Value::Number(
                values
                    .first()
                    .map_or_else(|| parse_number(&context_string()), |v| self.number(v)),
            ),
            "string" => Value::String(
                values
                    .first()
                    .map_or_else(context_string, |v| self.string(v)),
            ),
            "concat" => {
                arity(values.len() >= 2)?;
                Value::String(values.iter().map(|v| self.string(v)).collect())
            }
            "contains" => {
                arity(values.len() == 2)?;
                Value::Boolean(self.string(&values[0]).contains(&self.string(&values[1])))
            }
            "starts-with" => {
                arity(values.len() == 2)?;
                Value::Boolean(self.string(&values[0]).starts_with(&self.string(&values[1])))
            }
            "string-length" => {
                let s = values
                    .first()
                    .map_or_else(context_string, |v| self.string(v));
                Value::Number(s.chars().count() as f64)
            }
            "normalize-space" => {
                let s = values
                    .first()
                    .map_or_else(context_string, |v| self.string(v));
                Value::String(s.split_whitespace().collect::<Vec<_>>().join(" "))
            }
            "substring" => {
                arity(values.len() == 2 || values.len() == 3)?;
                let s = self.string(&values[0]);
                let start = self.number(&values[1]);
                let length = values.get(2).map(|v| self.number(v));
                Value::String(substring(&s, start, length))
            }
            "translate" => {
                arity(values.len() == 3)?;
                let from: Vec<char> = self.string(&values[1]).chars().collect();
                let to: Vec<char> = self.string(&values[2]).chars().collect();
                Value::String(
                    self.string(&values[0])
                        .chars()
                        .filter_map(|c| match from.iter().position(|&f| f == c) {
                            Some(index) => to.get(index).copied(),
                            None => Some(c),
                        })
                        .collect(),
                )
            }
            "name" | "local-name" => {
                let node = match values.first() {
                    Some(Value::Nodes(nodes)) => nodes.first().cloned(),
                    Some(_) => return Err(XPathError::NotANodeSet),
                    None => Some(ctx.node.clone()),
                };
                Value::String(node.map_or_else(String::new, |n| self.node_name(&n)))
            }
            other => return Err(XPathError::UnsupportedFunction(other.to_string())),
        };
        Ok(value)
    }

    fn node_name(&self, node: &XNode) -> String {
        match node {
            XNode::Attribute(_, name) => name.clone(),
            XNode::Tree(id) => self
                .tree
                .as_element(*id)
                .map_or_else(String::new, |e| e.tag_name.clone()),
        }
    }

    /// [§ 5 Data Model](https://www.w3.org/TR/1999/REC-xpath-19991116/#data-model)
    /// string-value of a node.
    fn string_value(&self, node: &XNode) -> String {
        match node {
            XNode::Attribute(owner, name) => self
                .tree
                .as_element(*owner)
                .and_then(|e| e.attr(name))
                .unwrap_or_default()
                .to_string(),
            XNode::Tree(id) => match self.tree.get(*id).map(|n| &n.node_type) {
                Some(NodeType::Comment(text)) => text.clone(),
                _ => self.tree.text_content(*id),
            },
        }
    }

    // [§ 4.3] boolean()
    fn boolean(&self, value: &Value) -> bool {
        match value {
            Value::Nodes(nodes) => !nodes.is_empty(),
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
        }
    }

    // [§ 4.4] number()
    fn number(&self, value: &Value) -> f64 {
        match value {
            Value::Boolean(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            _ => parse_number(&self.string(value)),
        }
    }

    // [§ 4.2] string()
    fn string(&self, value: &Value) -> String {
        match value {
            Value::Nodes(nodes) => nodes
                .first()
                .map_or_else(String::new, |n| self.string_value(n)),
            Value::Boolean(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
        }
    }
}

fn parse_number(s: &str) -> f64 {
    s.trim().parse().unwrap_or(f64::NAN)
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.fract() == 0.0 && n.is_finite() {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

/// [§ 4.2] substring(): positions are 1-based and rounded.
fn substring(s: &str, start: f64, length: Option<f64>) -> String {
    let start = start.round();
    let end = length.map_or(f64::INFINITY, |l| start + l.round());
    s.chars()
        .enumerate()
        .filter(|&(index, _)| {
            #[allow(clippy::cast_precision_loss)]
            let position = (index + 1) as f64;
            position >= start && position < end
        })
        .map(|(_, c)| c)
        .collect()
}
