//! Whole runs through the simulation driver.

use dcim_measure::{Measure, MeasureSelection, MeasureValue};
use dcim_session::{NoiseConfig, SimulationConfig, SimulationMode, Simulation};
use pretty_assertions::assert_eq;

const DATASET: &str = "\
Zip,City,Rent,Rooms
10,Haifa,900,2
10,Haifa,1200,3
20,Akko,700,2
20,Akko,800,2
30,Lod,650,1
30,Lod,1300,4
";

const CONSTRAINTS: &str = "\
not(t1.Zip=t2.Zip&t1.City!=t2.City)
not(t1.Rooms>t2.Rooms&t1.Rent<t2.Rent)
";

fn check_point_relations(sim_series: &dcim_session::MeasurementSeries) {
    for point in sim_series.points() {
        let value = |m: Measure| point.measurements.value(m).map(|v| v.as_f64()).unwrap();
        let mi = value(Measure::MinimalInconsistent);
        assert_eq!(mi as usize, point.violations);
        assert_eq!(value(Measure::Drastic) == 1.0, mi > 0.0);
        assert!(value(Measure::LinearRepair) <= value(Measure::Repair) + 1e-9);
        assert!(value(Measure::Repair) <= value(Measure::Problematic));
        assert!(value(Measure::MaximalConsistent) >= 1.0);
    }
}

#[test]
fn test_injection_run_keeps_measure_relations() {
    // GIVEN
    let config = SimulationConfig::default()
        .with_seed(21)
        .with_iterations(25)
        .with_measures(MeasureSelection::all());
    let mut sim = Simulation::from_sources(DATASET, CONSTRAINTS, config).unwrap();

    // WHEN
    let series = sim.run().unwrap();

    // THEN
    assert_eq!(series.len() + series.failed_injections, 26);
    assert_eq!(series.points()[0].violations, 0);
    assert!(series.points().windows(2).all(|w| w[0].step < w[1].step));
    check_point_relations(&series);
    assert!(series.points()[1..]
        .iter()
        .all(|p| p.measurements.value(Measure::Drastic) == Some(MeasureValue::Count(1))));
}

#[test]
fn test_noise_run_keeps_measure_relations() {
    // GIVEN: 24 cells at rate 0.5 is 12 changes, measured every 3
    let config = SimulationConfig::default()
        .with_seed(8)
        .with_measures(MeasureSelection::all())
        .with_mode(SimulationMode::RandomNoise(NoiseConfig {
            error_rate: 0.5,
            skew: 1.2,
            typo_prob: 0.3,
            measure_every: 3,
        }));
    let mut sim = Simulation::from_sources(DATASET, CONSTRAINTS, config).unwrap();

    // WHEN
    let series = sim.run().unwrap();

    // THEN
    assert_eq!(series.steps(), vec![0, 3, 6, 9, 12]);
    check_point_relations(&series);
}

#[test]
fn test_results_directory_is_written() {
    // GIVEN
    let root = std::env::temp_dir().join(format!("dcim-sim-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&root);
    let config = SimulationConfig::default()
        .with_seed(4)
        .with_iterations(3)
        .with_results_dir(&root);
    let mut sim = Simulation::from_sources(DATASET, CONSTRAINTS, config).unwrap();

    // WHEN
    sim.run().unwrap();

    // THEN
    let runs: Vec<_> = std::fs::read_dir(&root).unwrap().collect();
    assert_eq!(runs.len(), 1);
    let dir = runs[0].as_ref().unwrap().path();
    for file in [
        dcim_session::RUNNING_TIME_FILE,
        dcim_session::ALL_RESULTS_FILE,
        dcim_session::SERIES_FILE,
    ] {
        assert!(dir.join(file).is_file(), "{} missing", file);
    }

    std::fs::remove_dir_all(&root).unwrap();
}
