mod charts;
mod tables;

pub use charts::{format_series_chart, print_series_chart};
pub use tables::{
    format_metrics_table, format_series_table, format_snapshot_table, format_top_table,
    print_metrics_table, print_series_table, print_snapshot_table, print_top_table,
};
