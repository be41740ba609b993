//! Formatting sampled points for the terminal or as JSON

use sapling::{Axis, PlotAxis, Point};
use serde::Serialize;

/// Everything `sapling plot --json` prints.
#[derive(Debug, Serialize)]
pub struct PlotReport<'a> {
    pub expression: String,
    pub axis: Axis,
    pub plot_axis: PlotAxis,
    pub points: &'a [Point],
}

/// Format a number the way the REPL echoes it.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "inf" } else { "-inf" }.to_string()
    } else {
        value.to_string()
    }
}

/// Two-column table of inputs and outputs. Gaps print as `-`.
pub fn points_table(axis: Axis, points: &[Point]) -> String {
    let rows: Vec<(String, String)> = points
        .iter()
        .map(|p| {
            let output = p.output.map(format_value).unwrap_or_else(|| "-".to_string());
            (format_value(p.input), output)
        })
        .collect();

    let width = rows
        .iter()
        .map(|(input, _)| input.len())
        .max()
        .unwrap_or(0)
        .max(axis.name().len());

    let mut out = format!("{:>width$}  value\n", axis.name(), width = width);
    for (input, output) in rows {
        out.push_str(&format!("{:>width$}  {}\n", input, output, width = width));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(2.5), "2.5");
        assert_eq!(format_value(3.0), "3");
        assert_eq!(format_value(f64::NAN), "NaN");
        assert_eq!(format_value(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_points_table_marks_gaps() {
        let points = [
            Point {
                input: -1.0,
                output: Some(-1.0),
            },
            Point {
                input: 0.0,
                output: None,
            },
        ];
        let table = points_table(Axis::X, &points);
        assert_eq!(table, " x  value\n-1  -1\n 0  -\n");
    }

    #[test]
    fn test_report_json_shape() {
        let points = [Point {
            input: 1.0,
            output: Some(2.0),
        }];
        let report = PlotReport {
            expression: "2 * x".to_string(),
            axis: Axis::X,
            plot_axis: PlotAxis::X,
            points: &points,
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["axis"], "x");
        assert_eq!(value["plot_axis"], "x");
        assert_eq!(value["points"][0]["output"], 2.0);
    }
}
