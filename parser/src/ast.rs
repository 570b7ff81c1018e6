//! Abstract syntax tree for denial constraints.

use std::cmp::Ordering;
use std::fmt;

/// Source location of a token or construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

/// One of the two tuple variables a constraint quantifies over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TupleVar {
    T1,
    T2,
}

impl TupleVar {
    pub fn name(&self) -> &'static str {
        match self {
            TupleVar::T1 => "t1",
            TupleVar::T2 => "t2",
        }
    }
}

impl fmt::Display for TupleVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Comparison operator of a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Ge => ">=",
        }
    }

    /// The operator with its operands swapped: `a < b` iff `b > a`.
    pub fn flip(&self) -> Operator {
        match self {
            Operator::Eq => Operator::Eq,
            Operator::Ne => Operator::Ne,
            Operator::Lt => Operator::Gt,
            Operator::Gt => Operator::Lt,
            Operator::Le => Operator::Ge,
            Operator::Ge => Operator::Le,
        }
    }

    /// Whether a comparison outcome satisfies the operator. An undefined
    /// outcome (null or incomparable operands) satisfies nothing.
    pub fn holds(&self, ordering: Option<Ordering>) -> bool {
        let Some(ordering) = ordering else {
            return false;
        };
        match self {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Ne => ordering != Ordering::Equal,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Le => ordering != Ordering::Greater,
            Operator::Ge => ordering != Ordering::Less,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A tuple-qualified attribute such as `t1.Zip_Code`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Operand {
    pub var: TupleVar,
    pub attr: String,
}

impl Operand {
    pub fn new(var: TupleVar, attr: impl Into<String>) -> Self {
        Self {
            var,
            attr: attr.into(),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.var, self.attr)
    }
}

/// A binary comparison between two operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub left: Operand,
    pub op: Operator,
    pub right: Operand,
    pub span: Span,
}

impl Predicate {
    pub fn new(left: Operand, op: Operator, right: Operand) -> Self {
        Self {
            left,
            op,
            right,
            span: Span::default(),
        }
    }

    pub fn operands(&self) -> [&Operand; 2] {
        [&self.left, &self.right]
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.left, self.op, self.right)
    }
}

/// `not(p1 & p2 & ...)`: no assignment of tuples may satisfy every predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct DenialConstraint {
    pub predicates: Vec<Predicate>,
    /// 1-based line in the constraint file.
    pub line: usize,
}

impl DenialConstraint {
    pub fn new(predicates: Vec<Predicate>) -> Self {
        Self {
            predicates,
            line: 0,
        }
    }

    /// Returns true if any predicate mentions the tuple variable.
    pub fn references(&self, var: TupleVar) -> bool {
        self.predicates
            .iter()
            .flat_map(|p| p.operands())
            .any(|o| o.var == var)
    }

    /// A single-tuple constraint mentions only one tuple variable; both
    /// variables then denote the same tuple.
    pub fn is_single_tuple(&self) -> bool {
        !(self.references(TupleVar::T1) && self.references(TupleVar::T2))
    }
}

impl fmt::Display for DenialConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not(")?;
        for (i, predicate) in self.predicates.iter().enumerate() {
            if i > 0 {
                write!(f, "&")?;
            }
            write!(f, "{}", predicate)?;
        }
        write!(f, ")")
    }
}

/// Ordered, immutable set of parsed constraints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintSet {
    constraints: Vec<DenialConstraint>,
}

impl ConstraintSet {
    pub fn new(constraints: Vec<DenialConstraint>) -> Self {
        Self { constraints }
    }

    pub fn get(&self, index: usize) -> Option<&DenialConstraint> {
        self.constraints.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DenialConstraint> {
        self.constraints.iter()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

impl<'a> IntoIterator for &'a ConstraintSet {
    type Item = &'a DenialConstraint;
    type IntoIter = std::slice::Iter<'a, DenialConstraint>;

    fn into_iter(self) -> Self::IntoIter {
        self.constraints.iter()
    }
}
