pub mod formatter;

pub use formatter::{
    format_average, format_catalog, format_json, format_qualification, format_report,
    format_subject_line, format_tsv, should_use_colors,
};
