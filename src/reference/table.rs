use std::collections::HashMap;

use super::row::{RowPriority, SubjectReferenceRow};

/// Canonical reference row per subject. Built once, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    rows: HashMap<String, SubjectReferenceRow>,
}

impl ReferenceTable {
    pub fn get(&self, subject: &str) -> Option<&SubjectReferenceRow> {
        self.rows.get(subject)
    }

    pub fn contains(&self, subject: &str) -> bool {
        self.rows.contains_key(subject)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Reduce raw rows to one row per subject.
///
/// Rows are folded in order. A total-percentage row is final once seen; a
/// percentage row replaces anything below that; any other row is kept only
/// when the subject has nothing yet. Feed the general table first and the
/// second table after it, so the second can upgrade but never downgrade.
pub fn build_reference_table<I>(rows: I) -> ReferenceTable
where
    I: IntoIterator<Item = SubjectReferenceRow>,
{
    let mut table: HashMap<String, SubjectReferenceRow> = HashMap::new();

    for row in rows {
        let incoming = row.priority();
        let replace = match table.get(&row.subject).map(|r| r.priority()) {
            None => true,
            Some(RowPriority::TotalPercentage) => false,
            Some(_) => incoming >= RowPriority::Percentage,
        };
        if replace {
            table.insert(row.subject.clone(), row);
        }
    }

    ReferenceTable { rows: table }
}
