use itertools::Itertools;
use itertools::MinMaxResult;

/// Axis bounds for the score progression chart: x spans the answered
/// questions, y always includes zero so a negative run stays visible
pub fn score_chart_bounds(points: &[(f64, f64)]) -> ((f64, f64), (f64, f64)) {
    let x_max = points.last().map_or(1.0, |p| p.0).max(1.0);

    let (y_min, y_max) = match points
        .iter()
        .map(|p| p.1)
        .minmax_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    {
        MinMaxResult::NoElements => (0.0, 1.0),
        MinMaxResult::OneElement(v) => (v.min(0.0), v.max(1.0)),
        MinMaxResult::MinMax(lo, hi) => (lo.min(0.0), hi.max(1.0)),
    };

    ((0.0, x_max), (y_min, y_max))
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.1}")
    }
}
