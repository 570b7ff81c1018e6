//! Constraints bound to a schema.
//!
//! Binding resolves every attribute name to its column once, so evaluation
//! is a direct index into the row and a per-operator dispatch.

use dcim_core::{AttrId, Dataset, Schema, Tuple, TupleId, Value};
use dcim_parser::{ConstraintSet, DenialConstraint, Operand, Operator, TupleVar};

use crate::error::{ConstraintError, ConstraintResult};

/// An operand resolved to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundOperand {
    pub var: TupleVar,
    pub attr: AttrId,
}

/// A predicate over resolved operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundPredicate {
    pub left: BoundOperand,
    pub op: Operator,
    pub right: BoundOperand,
}

impl BoundPredicate {
    /// True when the predicate compares one tuple against the other.
    pub fn is_cross_tuple(&self) -> bool {
        self.left.var != self.right.var
    }
}

/// A denial constraint ready for evaluation.
#[derive(Debug, Clone)]
pub struct BoundConstraint {
    /// Position in the parsed constraint set.
    pub index: usize,
    pub source: DenialConstraint,
    pub predicates: Vec<BoundPredicate>,
    single_tuple: bool,
    referenced: Vec<BoundOperand>,
}

impl BoundConstraint {
    /// Resolve a parsed constraint against a schema.
    pub fn bind(index: usize, source: &DenialConstraint, schema: &Schema) -> ConstraintResult<Self> {
        let resolve = |operand: &Operand| -> ConstraintResult<BoundOperand> {
            let attr = schema
                .attr_id(&operand.attr)
                .ok_or_else(|| ConstraintError::schema(source.line, &operand.attr))?;
            Ok(BoundOperand {
                var: operand.var,
                attr,
            })
        };

        let mut predicates = Vec::with_capacity(source.predicates.len());
        let mut referenced: Vec<BoundOperand> = Vec::new();
        for predicate in &source.predicates {
            let left = resolve(&predicate.left)?;
            let right = resolve(&predicate.right)?;
            for operand in [left, right] {
                if !referenced.contains(&operand) {
                    referenced.push(operand);
                }
            }
            predicates.push(BoundPredicate {
                left,
                op: predicate.op,
                right,
            });
        }

        Ok(Self {
            index,
            source: source.clone(),
            predicates,
            single_tuple: source.is_single_tuple(),
            referenced,
        })
    }

    pub fn is_single_tuple(&self) -> bool {
        self.single_tuple
    }

    /// Every distinct (tuple variable, attribute) the constraint mentions.
    pub fn referenced(&self) -> &[BoundOperand] {
        &self.referenced
    }

    /// The tuple a variable denotes under the assignment (t1, t2). For a
    /// single-tuple constraint both variables denote `t1`.
    pub fn resolve_var(&self, var: TupleVar, t1: TupleId, t2: TupleId) -> TupleId {
        match (self.single_tuple, var) {
            (true, _) | (false, TupleVar::T1) => t1,
            (false, TupleVar::T2) => t2,
        }
    }

    /// Whether the assignment (t1, t2) satisfies the forbidden conjunction,
    /// i.e. violates the constraint. Any null among the referenced cells
    /// rules the assignment out.
    pub fn is_violated_by(&self, dataset: &Dataset, t1: TupleId, t2: TupleId) -> bool {
        let (Some(first), Some(second)) = (dataset.tuple(t1), dataset.tuple(t2)) else {
            return false;
        };
        let rows = if self.single_tuple {
            (first, first)
        } else {
            (first, second)
        };
        self.holds_on(rows)
    }

    fn holds_on(&self, rows: (&Tuple, &Tuple)) -> bool {
        let cell = |operand: &BoundOperand| -> Option<&Value> {
            match operand.var {
                TupleVar::T1 => rows.0.get(operand.attr),
                TupleVar::T2 => rows.1.get(operand.attr),
            }
        };

        let all_present = self
            .referenced
            .iter()
            .all(|operand| cell(operand).is_some_and(|v| !v.is_null()));
        if !all_present {
            return false;
        }

        self.predicates.iter().all(|p| match (cell(&p.left), cell(&p.right)) {
            (Some(l), Some(r)) => p.op.holds(l.compare(r)),
            _ => false,
        })
    }
}

/// Outcome of binding a whole constraint set: usable constraints plus one
/// schema error per rejected constraint.
#[derive(Debug, Default)]
pub struct BoundConstraints {
    pub constraints: Vec<BoundConstraint>,
    pub errors: Vec<ConstraintError>,
}

/// Bind every constraint; a constraint with an unknown attribute is dropped
/// and reported, the rest are kept.
pub fn bind_constraints(set: &ConstraintSet, schema: &Schema) -> BoundConstraints {
    let mut bound = BoundConstraints::default();
    for (index, constraint) in set.iter().enumerate() {
        match BoundConstraint::bind(index, constraint, schema) {
            Ok(c) => bound.constraints.push(c),
            Err(e) => bound.errors.push(e),
        }
    }
    bound
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcim_core::{row, AttrDef, AttrType};
    use dcim_parser::{parse_constraint, parse_constraints};

    fn test_dataset() -> Dataset {
        let schema = Schema::new(vec![
            AttrDef::new("A", AttrType::Int),
            AttrDef::new("B", AttrType::Int),
        ])
        .unwrap();
        Dataset::from_rows(
            schema,
            vec![row![1i64, 1i64], row![1i64, 2i64], row![Value::Null, 3i64]],
        )
        .unwrap()
    }

    #[test]
    fn test_bind_reports_unknown_attribute() {
        // GIVEN
        let dataset = test_dataset();
        let set = parse_constraints("not(t1.A=t2.A)\nnot(t1.C=t2.C)\n").into_result().unwrap();

        // WHEN
        let bound = bind_constraints(&set, dataset.schema());

        // THEN
        assert_eq!(bound.constraints.len(), 1);
        assert_eq!(bound.errors.len(), 1);
        assert!(matches!(&bound.errors[0], ConstraintError::Schema { line: 2, attr } if attr == "C"));
    }

    #[test]
    fn test_is_violated_by() {
        let dataset = test_dataset();
        let c = parse_constraint("not(t1.A=t2.A&t1.B!=t2.B)").unwrap();
        let bound = BoundConstraint::bind(0, &c, dataset.schema()).unwrap();

        assert!(bound.is_violated_by(&dataset, TupleId::new(0), TupleId::new(1)));
        assert!(bound.is_violated_by(&dataset, TupleId::new(1), TupleId::new(0)));
        assert!(!bound.is_violated_by(&dataset, TupleId::new(0), TupleId::new(2)));
    }

    #[test]
    fn test_null_cells_never_violate() {
        let dataset = test_dataset();
        // t1.B != t2.B alone would hold for (2, 0); the null in t2.A must still exclude it
        let c = parse_constraint("not(t1.B!=t2.B&t1.A!=t2.A)").unwrap();
        let bound = BoundConstraint::bind(0, &c, dataset.schema()).unwrap();
        assert!(!bound.is_violated_by(&dataset, TupleId::new(2), TupleId::new(0)));
    }

    #[test]
    fn test_single_tuple_uses_one_row() {
        let dataset = test_dataset();
        let c = parse_constraint("not(t1.B>t1.A)").unwrap();
        let bound = BoundConstraint::bind(0, &c, dataset.schema()).unwrap();
        assert!(bound.is_single_tuple());
        assert!(bound.is_violated_by(&dataset, TupleId::new(1), TupleId::new(0)));
        assert!(!bound.is_violated_by(&dataset, TupleId::new(0), TupleId::new(1)));
    }
}
