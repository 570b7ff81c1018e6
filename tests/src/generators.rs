//! Proptest strategies for property-based tests.
//!
//! Values are drawn from a deliberately small domain so random constraints
//! actually fire on random rows.

use dcim_core::{AttrDef, AttrType, Dataset, Schema, Value};
use dcim_graph::ConflictGraph;
use proptest::prelude::*;

/// Column names of every generated dataset.
pub const COLUMNS: [&str; 3] = ["A", "B", "C"];

/// Columns of the null-free datasets used with [`arb_disjoint_constraint_source`].
pub const WIDE_COLUMNS: [&str; 4] = ["A", "B", "C", "D"];

const OPERATORS: [&str; 6] = ["=", "!=", "<", ">", "<=", ">="];
const VARS: [&str; 2] = ["t1", "t2"];

fn schema(columns: &[&str]) -> Schema {
    let attrs = columns.iter().map(|name| AttrDef::new(name, AttrType::Int)).collect();
    match Schema::new(attrs) {
        Ok(schema) => schema,
        Err(e) => unreachable!("fixed columns are distinct: {}", e),
    }
}

/// An integer cell in `0..4`, null one time in eight.
pub fn arb_cell() -> impl Strategy<Value = Value> {
    prop_oneof![
        7 => (0i64..4).prop_map(Value::Int),
        1 => Just(Value::Null),
    ]
}

/// A dataset over [`COLUMNS`] with `rows` tuples.
pub fn arb_dataset(rows: std::ops::RangeInclusive<usize>) -> impl Strategy<Value = Dataset> {
    prop::collection::vec(prop::collection::vec(arb_cell(), COLUMNS.len()), rows).prop_map(|rows| {
        match Dataset::from_rows(schema(&COLUMNS), rows) {
            Ok(dataset) => dataset,
            Err(e) => unreachable!("rows match the schema width: {}", e),
        }
    })
}

/// A dataset over [`WIDE_COLUMNS`] with no null cells.
pub fn arb_complete_dataset(rows: std::ops::RangeInclusive<usize>) -> impl Strategy<Value = Dataset> {
    prop::collection::vec(prop::collection::vec((0i64..4).prop_map(Value::Int), WIDE_COLUMNS.len()), rows)
        .prop_map(|rows| match Dataset::from_rows(schema(&WIDE_COLUMNS), rows) {
            Ok(dataset) => dataset,
            Err(e) => unreachable!("rows match the schema width: {}", e),
        })
}

/// One predicate over two random tuple variables and columns.
pub fn arb_predicate() -> impl Strategy<Value = String> {
    (
        prop::sample::select(VARS.to_vec()),
        prop::sample::select(COLUMNS.to_vec()),
        prop::sample::select(OPERATORS.to_vec()),
        prop::sample::select(VARS.to_vec()),
        prop::sample::select(COLUMNS.to_vec()),
    )
        .prop_map(|(lv, la, op, rv, ra)| format!("{}.{}{}{}.{}", lv, la, op, rv, ra))
}

/// A denial constraint of one to three predicates, in file syntax.
pub fn arb_constraint_source() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_predicate(), 1..=3).prop_map(|predicates| format!("not({})", predicates.join("&")))
}

/// A constraint of one or two predicates where predicate `i` compares
/// columns `WIDE_COLUMNS[2i]` and `WIDE_COLUMNS[2i + 1]`. No cell is shared
/// between predicates, so some assignment of two tuples always violates it.
pub fn arb_disjoint_constraint_source() -> impl Strategy<Value = String> {
    let predicate = (
        prop::sample::select(VARS.to_vec()),
        prop::sample::select(OPERATORS.to_vec()),
        prop::sample::select(VARS.to_vec()),
    );
    prop::collection::vec(predicate, 1..=2).prop_map(|predicates| {
        let body: Vec<String> = predicates
            .into_iter()
            .enumerate()
            .map(|(i, (lv, op, rv))| format!("{}.{}{}{}.{}", lv, WIDE_COLUMNS[2 * i], op, rv, WIDE_COLUMNS[2 * i + 1]))
            .collect();
        format!("not({})", body.join("&"))
    })
}

/// A constraint file of one to three constraints.
pub fn arb_constraint_file() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_constraint_source(), 1..=3).prop_map(|lines| lines.join("\n"))
}

/// A conflict graph on up to `max_nodes` nodes. Edge lists may repeat and
/// contain self-loops, which become self-conflicting nodes.
pub fn arb_graph(max_nodes: usize) -> impl Strategy<Value = ConflictGraph> {
    (1..=max_nodes.max(1))
        .prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n), 0..=2 * n)))
        .prop_map(|(n, edges)| match ConflictGraph::from_edges(n, edges) {
            Ok(graph) => graph,
            Err(e) => unreachable!("endpoints are below the node count: {}", e),
        })
}
