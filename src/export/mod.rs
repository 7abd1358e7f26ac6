pub mod formatter;
pub mod rows;

pub use formatter::{
    format_breakdown_table, format_json, format_summary, format_tsv, should_use_colors,
};
pub use rows::{export_rows, resolve_export_path, to_csv, write_csv, DEFAULT_FILENAME};
