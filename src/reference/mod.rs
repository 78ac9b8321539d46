pub mod matcher;
pub mod parse;
pub mod percentile;
pub mod row;
pub mod table;

pub use matcher::{
    default_matchers, normalize_header, parse_percent, AnyCellMatcher, ColumnMatcher,
    GradeHeaderMatcher, MarkerHeaderMatcher,
};
pub use parse::parse_reference_csv;
pub use percentile::{
    estimate_average_percentile, estimate_percentile, estimate_percentile_with, subject_status,
    PercentileStatus,
};
pub use row::{RowPriority, SubjectReferenceRow};
pub use table::{build_reference_table, ReferenceTable};
