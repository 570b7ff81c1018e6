//! Output formatting utilities.

use dcim_measure::{MeasureSelection, Measurements};
use dcim_session::{format_all_results, MeasurementSeries};

/// One line per measure: name, value and compute time.
pub fn format_measurements(measurements: &Measurements) -> String {
    let mut out = String::new();
    for m in measurements {
        out.push_str(&format!(
            "{:<8} {:>12}   ({:.3} ms)\n",
            m.measure.name(),
            m.value.to_string(),
            m.elapsed.as_secs_f64() * 1000.0
        ));
    }
    out
}

/// Run summary: snapshot count, skipped iterations, then each measure's
/// series.
pub fn format_summary(series: &MeasurementSeries, selection: &MeasureSelection) -> String {
    let mut out = format!(
        "snapshots: {}, skipped iterations: {}\n",
        series.len(),
        series.failed_injections
    );
    out.push_str(&format_all_results(series, selection));
    out
}
