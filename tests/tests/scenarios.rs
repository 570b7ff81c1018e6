//! End-to-end scenarios: dataset text and constraint text in, detection and
//! all six measures checked after each step.

use dcim_tests::prelude::*;

mod functional_dependency {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("functional_dependency")
            .dataset("A,B\n1,1\n1,2\n2,5\n")
            .constraints("not(t1.A=t2.A&t1.B!=t2.B)")
            .step("input", |a| {
                a.violations(1)
                    .pairs([(0, 1)])
                    .count(Measure::Drastic, 1)
                    .count(Measure::MinimalInconsistent, 1)
                    .count(Measure::Problematic, 2)
                    .count(Measure::Repair, 1)
                    .real(Measure::LinearRepair, 1.0)
                    .count(Measure::MaximalConsistent, 2)
            })
            .edit("repair_second_row", 1, "B", 1i64, |a| a.consistent())
            // moving row 2 into the same group against two agreeing rows
            .edit("break_third_row", 2, "A", 1i64, |a| {
                a.pairs([(0, 2), (1, 2)])
                    .participating(3)
                    .count(Measure::Repair, 1)
                    .real(Measure::LinearRepair, 1.0)
                    .count(Measure::MaximalConsistent, 2)
            })
    }

    #[test]
    fn test_functional_dependency_steps() {
        scenario().run().unwrap();
    }

    #[test]
    fn test_functional_dependency_without_index() {
        scenario().without_index().run().unwrap();
    }
}

mod conflict_shapes {
    use super::*;

    pub fn triangle() -> Scenario {
        Scenario::new("triangle")
            .dataset("A,B\n1,1\n1,2\n1,3\n")
            .constraints("not(t1.A=t2.A&t1.B!=t2.B)")
            .step("triangle", |a| {
                a.violations(3)
                    .participating(3)
                    .count(Measure::Repair, 2)
                    .real(Measure::LinearRepair, 1.5)
                    .count(Measure::MaximalConsistent, 3)
            })
            .edit("path", 2, "B", 1i64, |a| {
                a.pairs([(0, 1), (1, 2)])
                    .count(Measure::Repair, 1)
                    .real(Measure::LinearRepair, 1.0)
                    .count(Measure::MaximalConsistent, 2)
            })
    }

    pub fn ordering() -> Scenario {
        Scenario::new("ordering")
            .dataset("Salary,Tax\n100,10\n200,5\n300,30\n400,20\n")
            .constraints("not(t1.Salary>t2.Salary&t1.Tax<t2.Tax)")
            .step("two_disjoint_edges", |a| {
                a.pairs([(0, 1), (2, 3)])
                    .count(Measure::MinimalInconsistent, 2)
                    .count(Measure::Problematic, 4)
                    .count(Measure::Repair, 2)
                    .real(Measure::LinearRepair, 2.0)
                    .count(Measure::MaximalConsistent, 4)
            })
    }

    #[test]
    fn test_triangle_then_path() {
        triangle().run().unwrap();
    }

    #[test]
    fn test_ordering_constraint() {
        ordering().run().unwrap();
    }
}

mod self_conflicts {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("self_conflicts")
            .dataset("A,B\n2,1\n2,4\n0,5\n3,3\n")
            .constraints("# single-tuple check\nnot(t1.A>t1.B)\nnot(t1.A=t2.A&t1.B!=t2.B)\n")
            .step("input", |a| {
                a.pairs([(0, 0), (0, 1)])
                    .count(Measure::Drastic, 1)
                    .count(Measure::MinimalInconsistent, 2)
                    .count(Measure::Problematic, 2)
                    .count(Measure::Repair, 1)
                    .real(Measure::LinearRepair, 1.0)
                    .count(Measure::MaximalConsistent, 1)
            })
            .edit("second_self_conflict", 3, "A", 9i64, |a| {
                a.pairs([(0, 0), (0, 1), (3, 3)])
                    .count(Measure::Repair, 2)
                    .real(Measure::LinearRepair, 1.5)
                    .count(Measure::MaximalConsistent, 1)
            })
    }

    pub fn lone_self_conflict() -> Scenario {
        Scenario::new("lone_self_conflict")
            .dataset("A,B\n5,1\n1,2\n")
            .constraints("not(t1.A>t1.B)")
            .step("input", |a| {
                a.pairs([(0, 0)])
                    .count(Measure::MinimalInconsistent, 1)
                    .count(Measure::Problematic, 1)
                    .count(Measure::Repair, 1)
                    .real(Measure::LinearRepair, 0.5)
                    .count(Measure::MaximalConsistent, 1)
            })
            .edit("fixed", 0, "B", 6i64, |a| a.consistent())
    }

    #[test]
    fn test_self_conflicting_tuples() {
        scenario().run().unwrap();
    }

    #[test]
    fn test_relaxed_repair_takes_half_a_self_conflict() {
        lone_self_conflict().run().unwrap();
    }
}

mod missing_values {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("missing_values")
            .dataset("A,B\n1,1\n1,NULL\n1,2\n")
            .constraints("not(t1.A=t2.A&t1.B!=t2.B)")
            .step("null_rows_never_violate", |a| a.pairs([(0, 2)]).participating(2))
            .edit("null_out_remaining_conflict", 2, "B", Value::Null, |a| a.consistent())
    }

    pub fn typed_columns() -> Scenario {
        Scenario::new("typed_columns")
            .dataset("Name,Born,Score\nAnn,1990-01-02,1.5\nBob,1985-05-06,2.5\nCid,n/a,0.5\n")
            .constraints("not(t1.Name=t2.Name&t1.Born!=t2.Born)\nnot(t1.Born<t2.Born&t1.Score<t2.Score)")
            .step("input", |a| a.consistent())
            .edit("duplicate_name", 1, "Name", "Ann", |a| {
                a.pairs([(0, 1)]).count(Measure::Repair, 1)
            })
    }

    #[test]
    fn test_nulls_are_excluded() {
        scenario().run().unwrap();
    }

    #[test]
    fn test_dates_and_strings() {
        typed_columns().run().unwrap();
    }
}

mod selections {
    use super::*;

    #[test]
    fn test_subset_of_measures() {
        Scenario::new("cheap_measures")
            .dataset("A,B\n1,1\n1,2\n")
            .constraints("not(t1.A=t2.A&t1.B!=t2.B)")
            .measures(MeasureSelection::only([Measure::Drastic, Measure::MinimalInconsistent]))
            .step("input", |a| {
                a.count(Measure::Drastic, 1)
                    .count(Measure::MinimalInconsistent, 1)
                    .custom(|_, measurements| measurements.len() == 2)
            })
            .run()
            .unwrap();
    }

    #[test]
    fn test_asserting_unselected_measure_fails() {
        let err = Scenario::new("unselected")
            .dataset("A,B\n1,1\n")
            .constraints("not(t1.A=t2.A&t1.B!=t2.B)")
            .measures(MeasureSelection::only([Measure::Drastic]))
            .step("input", |a| a.count(Measure::Repair, 0))
            .run()
            .unwrap_err();
        assert!(matches!(err, ScenarioError::AssertionFailed { .. }));
    }
}

mod failures {
    use super::*;

    #[test]
    fn test_missing_dataset() {
        let err = Scenario::new("empty").run().unwrap_err();
        assert!(matches!(err, ScenarioError::MissingDataset { .. }));
    }

    #[test]
    fn test_unknown_constraint_attribute() {
        let err = Scenario::new("unknown")
            .dataset("A,B\n1,1\n")
            .constraints("not(t1.C=t2.C)")
            .run()
            .unwrap_err();
        assert!(matches!(err, ScenarioError::Binding { .. }));
    }

    #[test]
    fn test_malformed_constraint() {
        let err = Scenario::new("malformed")
            .dataset("A,B\n1,1\n")
            .constraints("t1.A=t2.A")
            .run()
            .unwrap_err();
        assert!(matches!(err, ScenarioError::Parse(_)));
    }

    #[test]
    fn test_wrong_expectation_reports_step() {
        let err = Scenario::new("wrong")
            .dataset("A,B\n1,1\n1,2\n")
            .constraints("not(t1.A=t2.A&t1.B!=t2.B)")
            .step("input", |a| a.real(Measure::LinearRepair, 0.5))
            .run()
            .unwrap_err();
        match err {
            ScenarioError::AssertionFailed { step, message } => {
                assert_eq!(step, "input");
                assert!(message.contains("I_lin_R"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
