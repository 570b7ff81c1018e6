//! Property tests over random datasets, constraints and conflict graphs.

use dcim_constraint::{bind_constraints, BoundConstraint, ViolationDetector};
use dcim_core::{Dataset, TupleId};
use dcim_graph::{ConflictGraph, ConflictGraphBuilder};
use dcim_measure::{
    BronKerboschAnalyzer, CombinatorialCoverSolver, CoverSolver, Deadline, GraphAnalyzer, Measure, MeasureComputer,
    MeasureSelection,
};
use dcim_mutation::ViolationInjector;
use dcim_parser::parse_constraints;
use dcim_tests::generators::{
    arb_complete_dataset, arb_constraint_file, arb_constraint_source, arb_dataset, arb_disjoint_constraint_source,
    arb_graph,
};
use proptest::prelude::*;
use proptest::sample::Index;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bind(dataset: &Dataset, source: &str) -> Vec<BoundConstraint> {
    let set = parse_constraints(source).into_result().unwrap();
    let bound = bind_constraints(&set, dataset.schema());
    assert!(bound.errors.is_empty());
    bound.constraints
}

fn brute_force_cover(graph: &ConflictGraph) -> usize {
    let n = graph.node_count();
    (0u32..1 << n)
        .filter(|mask| graph.self_conflicting().iter().all(|v| mask & (1 << v) != 0))
        .filter(|mask| graph.edges().iter().all(|&(u, v)| mask & (1 << u) != 0 || mask & (1 << v) != 0))
        .map(|mask| mask.count_ones() as usize)
        .min()
        .unwrap()
}

fn brute_force_maximal_sets(graph: &ConflictGraph) -> u64 {
    let eligible: Vec<usize> = (0..graph.node_count())
        .filter(|&v| !graph.is_self_conflicting(v))
        .collect();
    let mut count = 0;
    for mask in 0u32..1 << eligible.len() {
        let chosen: Vec<usize> = eligible
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, &v)| v)
            .collect();
        let independent = chosen
            .iter()
            .all(|&u| chosen.iter().all(|&v| !graph.has_edge(u, v)));
        let maximal = eligible
            .iter()
            .filter(|&&v| !chosen.contains(&v))
            .all(|&v| chosen.iter().any(|&u| graph.has_edge(u, v)));
        if independent && maximal {
            count += 1;
        }
    }
    count
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn test_measure_relations(dataset in arb_dataset(0..=8), source in arb_constraint_file()) {
        let constraints = bind(&dataset, &source);
        let detection = ViolationDetector::new().detect(&dataset, &constraints);
        let measurements = MeasureComputer::new(MeasureSelection::all()).compute(&detection).unwrap();
        let value = |m: Measure| measurements.value(m).unwrap().as_f64();

        let (d, mi, p) = (value(Measure::Drastic), value(Measure::MinimalInconsistent), value(Measure::Problematic));
        let (r, lin, mc) = (value(Measure::Repair), value(Measure::LinearRepair), value(Measure::MaximalConsistent));

        prop_assert_eq!(d == 1.0, mi > 0.0);
        prop_assert!(p <= 2.0 * mi);
        prop_assert!(mi == 0.0 || p >= 1.0);
        prop_assert!(lin <= r + 1e-9);
        prop_assert!(r <= p);
        prop_assert!(r <= 2.0 * lin + 1e-9);
        prop_assert!(mc >= 1.0);
        prop_assert_eq!(mi == 0.0, r == 0.0);
    }

    #[test]
    fn test_detection_pairs_are_canonical(dataset in arb_dataset(0..=8), source in arb_constraint_file()) {
        let constraints = bind(&dataset, &source);
        let detector = ViolationDetector::new();
        let detection = detector.detect(&dataset, &constraints);

        for pair in detection.iter() {
            prop_assert!(pair.first() <= pair.second());
            prop_assert!(constraints
                .iter()
                .any(|c| detector.pair_violates(&dataset, c, pair.first(), pair.second())));
            prop_assert!(detection.participating().contains(&pair.first()));
            prop_assert!(detection.participating().contains(&pair.second()));
        }
    }

    #[test]
    fn test_index_matches_full_join(dataset in arb_dataset(0..=8), source in arb_constraint_file()) {
        let constraints = bind(&dataset, &source);
        let indexed = ViolationDetector::new().detect(&dataset, &constraints);
        let full = ViolationDetector::new().without_index().detect(&dataset, &constraints);
        prop_assert_eq!(indexed, full);
    }

    #[test]
    fn test_detection_is_idempotent(dataset in arb_dataset(0..=8), source in arb_constraint_file()) {
        let constraints = bind(&dataset, &source);
        let detector = ViolationDetector::new();
        prop_assert_eq!(detector.detect(&dataset, &constraints), detector.detect(&dataset, &constraints));
    }

    #[test]
    fn test_graph_mirrors_detection(dataset in arb_dataset(0..=8), source in arb_constraint_file()) {
        let constraints = bind(&dataset, &source);
        let detection = ViolationDetector::new().detect(&dataset, &constraints);
        let graph = ConflictGraphBuilder::new().build(&detection).unwrap();

        prop_assert_eq!(graph.node_count(), dataset.len());
        let self_pairs = detection.self_conflicting().count();
        prop_assert_eq!(graph.edge_count() + self_pairs, detection.len());
        for &(u, v) in graph.edges() {
            prop_assert!(detection.contains(TupleId::new(u), TupleId::new(v)));
        }
    }

    #[test]
    fn test_integer_cover_is_minimum(graph in arb_graph(10)) {
        let cover = CombinatorialCoverSolver::new().solve_integer(&graph, &Deadline::none()).unwrap();

        for &(u, v) in graph.edges() {
            prop_assert!(cover.cover.contains(u) || cover.cover.contains(v));
        }
        prop_assert!(graph.self_conflicting().iter().all(|v| cover.cover.contains(v)));
        prop_assert_eq!(cover.size(), brute_force_cover(&graph));
    }

    #[test]
    fn test_relaxed_cover_is_half_integral(graph in arb_graph(10)) {
        let solver = CombinatorialCoverSolver::new();
        let relaxed = solver.solve_relaxed(&graph, &Deadline::none()).unwrap();
        let integer = solver.solve_integer(&graph, &Deadline::none()).unwrap();

        prop_assert_eq!(relaxed.assignment.len(), graph.node_count());
        prop_assert!(relaxed.assignment.iter().all(|&x| x == 0.0 || x == 0.5 || x == 1.0));
        for &(u, v) in graph.edges() {
            prop_assert!(relaxed.assignment[u] + relaxed.assignment[v] >= 1.0);
        }
        prop_assert!(graph.self_conflicting().iter().all(|v| relaxed.assignment[v] >= 0.5));
        let total: f64 = relaxed.assignment.iter().sum();
        prop_assert!((total - relaxed.value).abs() < 1e-9);
        prop_assert!(relaxed.value <= integer.size() as f64 + 1e-9);
        prop_assert!(integer.size() as f64 <= 2.0 * relaxed.value + 1e-9);
    }

    #[test]
    fn test_maximal_set_count_matches_enumeration(graph in arb_graph(10)) {
        let count = BronKerboschAnalyzer::new()
            .count_maximal_independent_sets(&graph, &Deadline::none())
            .unwrap();
        prop_assert_eq!(count, brute_force_maximal_sets(&graph));
    }

    #[test]
    fn test_injection_violates_or_restores(
        dataset in arb_dataset(2..=6),
        source in arb_constraint_source(),
        first in any::<Index>(),
        second in any::<Index>(),
        seed in any::<u64>(),
    ) {
        let constraints = bind(&dataset, &source);
        let constraint = &constraints[0];
        let n = dataset.len();
        let i = first.index(n);
        let j = second.index(n - 1);
        let (t1, t2) = (TupleId::new(i), TupleId::new(if j >= i { j + 1 } else { j }));

        let mut mutated = dataset.clone();
        let mut rng = StdRng::seed_from_u64(seed);
        let result = ViolationInjector::new().inject(&mut mutated, constraint, t1, t2, &mut rng);

        let target = if constraint.is_single_tuple() { t1 } else { t2 };
        let touched = [t1, target];
        for id in dataset.ids().filter(|id| !touched.contains(id)) {
            prop_assert_eq!(dataset.tuple(id), mutated.tuple(id));
        }
        match result {
            Ok(outcome) => {
                prop_assert!(ViolationDetector::new().pair_violates(&mutated, constraint, t1, target));
                prop_assert!(outcome.changes.iter().all(|c| touched.contains(&c.tuple)));
            }
            Err(_) => prop_assert_eq!(dataset.tuples(), mutated.tuples()),
        }
    }

    #[test]
    fn test_injection_succeeds_on_satisfiable_constraints(
        dataset in arb_complete_dataset(2..=6),
        source in arb_disjoint_constraint_source(),
        first in any::<Index>(),
        second in any::<Index>(),
        seed in any::<u64>(),
    ) {
        let constraints = bind(&dataset, &source);
        let constraint = &constraints[0];
        let n = dataset.len();
        let i = first.index(n);
        let j = second.index(n - 1);
        let (t1, t2) = (TupleId::new(i), TupleId::new(if j >= i { j + 1 } else { j }));

        let mut mutated = dataset.clone();
        let mut rng = StdRng::seed_from_u64(seed);
        let result = ViolationInjector::new().inject(&mut mutated, constraint, t1, t2, &mut rng);

        prop_assert!(result.is_ok(), "{}: {:?}", source, result);
        let target = if constraint.is_single_tuple() { t1 } else { t2 };
        prop_assert!(ViolationDetector::new().pair_violates(&mutated, constraint, t1, target));
    }
}
