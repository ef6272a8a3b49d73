use colored::{ColoredString, Colorize};

use crate::models::{CountryTimeSeries, DataType};

const BAR_WIDTH: usize = 50;

fn paint(bar: String, data_type: DataType) -> ColoredString {
    match data_type {
        DataType::Real => bar.green(),
        DataType::Interpolated => bar.yellow(),
        DataType::Prediction => bar.cyan(),
    }
}

/// Format a text bar chart of forest cover by year as a string.
///
/// Bars are scaled to 100% cover and colored by data type.
pub fn format_series_chart(series: &CountryTimeSeries) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "\n{}\n",
        format!("Forest Cover Trend: {}", series.country).bold().green()
    ));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    if series.is_empty() {
        output.push_str("  No data available.\n");
        return output;
    }

    output.push_str(&format!(
        "  {:>4}  {:>7}  {:<13}  Cover\n",
        "Year", "Cover %", "Type"
    ));
    output.push_str(&format!("  {}\n", "-".repeat(70)));

    for entry in &series.entries {
        let bar_len = ((entry.forest_cover_percent / 100.0) * BAR_WIDTH as f64).round() as usize;
        let bar = "\u{2588}".repeat(bar_len.min(BAR_WIDTH));
        output.push_str(&format!(
            "  {:>4}  {:>7.2}  {:<13}  {}\n",
            entry.year,
            entry.forest_cover_percent,
            entry.data_type.to_string(),
            paint(bar, entry.data_type)
        ));
    }

    output.push_str(&format!(
        "\n  {} real  {} interpolated  {} prediction\n",
        paint("\u{2588}".to_string(), DataType::Real),
        paint("\u{2588}".to_string(), DataType::Interpolated),
        paint("\u{2588}".to_string(), DataType::Prediction),
    ));
    output
}

/// Print a text bar chart of forest cover by year.
pub fn print_series_chart(series: &CountryTimeSeries) {
    print!("{}", format_series_chart(series));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClassifiedYearEntry;

    fn series(entries: Vec<(i32, f64, DataType)>) -> CountryTimeSeries {
        CountryTimeSeries {
            country: "Brazil".to_string(),
            area_km2: 8_515_767.0,
            baseline_2000: 50.0,
            baseline_2010: 40.0,
            entries: entries
                .into_iter()
                .map(|(year, pct, data_type)| ClassifiedYearEntry {
                    year,
                    forest_cover_percent: pct,
                    data_type,
                    forest_area_km2: 8_515_767.0 * pct / 100.0,
                })
                .collect(),
        }
    }

    #[test]
    fn test_format_chart_empty() {
        let output = format_series_chart(&series(vec![]));
        assert!(output.contains("No data available."));
        assert!(output.contains("Forest Cover Trend: Brazil"));
    }

    #[test]
    fn test_format_chart_rows() {
        let output = format_series_chart(&series(vec![
            (2010, 40.0, DataType::Real),
            (2020, 31.5, DataType::Interpolated),
            (2050, 25.0, DataType::Prediction),
        ]));
        assert!(output.contains("2010"));
        assert!(output.contains("31.50"));
        assert!(output.contains("interpolated"));
        assert!(output.contains("prediction"));
    }

    #[test]
    fn test_bar_length_scales_with_cover() {
        let output = format_series_chart(&series(vec![(2000, 100.0, DataType::Real)]));
        let row = output.lines().find(|l| l.contains("2000")).unwrap();
        assert_eq!(row.matches('\u{2588}').count(), BAR_WIDTH);
    }
}
