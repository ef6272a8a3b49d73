use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, ContentArrangement, Table};

use crate::analysis::{ModelMetrics, TopDirection};
use crate::models::{CountrySnapshot, CountryTimeSeries};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Format one country's 2000/2010 snapshot as a string.
pub fn format_snapshot_table(snapshot: &CountrySnapshot) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "\n{}\n",
        format!("Forest Cover: {}", snapshot.country).bold().green()
    ));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    let mut table = new_table(vec!["Metric", "Value", "Unit"]);
    table.add_row(vec![
        Cell::new("Land Area"),
        Cell::new(format!("{:.1}", snapshot.area_km2)),
        Cell::new("km²"),
    ]);
    table.add_row(vec![
        Cell::new("Forest Cover 2000"),
        Cell::new(format!("{:.2}", snapshot.forest_percent_2000)),
        Cell::new("%"),
    ]);
    table.add_row(vec![
        Cell::new("Forest Cover 2010"),
        Cell::new(format!("{:.2}", snapshot.forest_percent_2010)),
        Cell::new("%"),
    ]);
    table.add_row(vec![
        Cell::new("Forest Area 2000"),
        Cell::new(format!("{:.1}", snapshot.forest_area_2000_km2())),
        Cell::new("km²"),
    ]);
    table.add_row(vec![
        Cell::new("Forest Area 2010"),
        Cell::new(format!("{:.1}", snapshot.forest_area_2010_km2())),
        Cell::new("km²"),
    ]);
    table.add_row(vec![
        Cell::new("Change (2000 - 2010)"),
        Cell::new(format!("{:+.2}", snapshot.delta_percent)),
        Cell::new("points"),
    ]);
    table.add_row(vec![
        Cell::new("Area Change"),
        Cell::new(format!("{:+.1}", snapshot.delta_area_km2)),
        Cell::new("km²"),
    ]);

    output.push_str(&format!("{table}"));
    output
}

/// Print one country's snapshot.
pub fn print_snapshot_table(snapshot: &CountrySnapshot) {
    print!("{}", format_snapshot_table(snapshot));
}

/// Format a ranking of countries by cover change.
pub fn format_top_table(snapshots: &[CountrySnapshot], direction: TopDirection) -> String {
    let title = match direction {
        TopDirection::Loss => "Largest Forest Loss 2000-2010",
        TopDirection::Gain => "Largest Forest Gain 2000-2010",
    };
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", title.bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    let mut table = new_table(vec![
        "Rank",
        "Country",
        "2000 %",
        "2010 %",
        "Change",
        "Area Change (km²)",
    ]);
    for (rank, s) in snapshots.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&s.country),
            Cell::new(format!("{:.2}", s.forest_percent_2000)),
            Cell::new(format!("{:.2}", s.forest_percent_2010)),
            Cell::new(format!("{:+.2}", s.delta_percent)),
            Cell::new(format!("{:+.1}", s.delta_area_km2)),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

pub fn print_top_table(snapshots: &[CountrySnapshot], direction: TopDirection) {
    print!("{}", format_top_table(snapshots, direction));
}

/// Format a classified series, one row per year.
pub fn format_series_table(series: &CountryTimeSeries) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "\n{}\n",
        format!("Forest Cover Series: {}", series.country).bold().green()
    ));
    output.push_str(&format!(
        "{}\n",
        format!(
            "Land area: {:.1} km² | Baselines: {:.2}% (2000), {:.2}% (2010)",
            series.area_km2, series.baseline_2000, series.baseline_2010
        )
        .dimmed()
    ));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    let mut table = new_table(vec!["Year", "Forest Cover %", "Forest Area (km²)", "Type"]);
    for entry in &series.entries {
        table.add_row(vec![
            Cell::new(entry.year),
            Cell::new(format!("{:.2}", entry.forest_cover_percent)),
            Cell::new(format!("{:.1}", entry.forest_area_km2)),
            Cell::new(entry.data_type),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

pub fn print_series_table(series: &CountryTimeSeries) {
    print!("{}", format_series_table(series));
}

/// Format predictor goodness-of-fit metrics.
pub fn format_metrics_table(metrics: &[ModelMetrics]) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Model Performance".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    let mut table = new_table(vec!["Model", "R²", "RMSE", "MAE", "Samples"]);
    for m in metrics {
        table.add_row(vec![
            Cell::new(m.model),
            Cell::new(format!("{:.4}", m.r_squared)),
            Cell::new(format!("{:.3}", m.rmse)),
            Cell::new(format!("{:.3}", m.mae)),
            Cell::new(m.n_samples),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

pub fn print_metrics_table(metrics: &[ModelMetrics]) {
    print!("{}", format_metrics_table(metrics));
}
