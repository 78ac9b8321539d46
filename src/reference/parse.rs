use anyhow::{Context, Result};

use super::row::SubjectReferenceRow;

/// Parse a reference CSV into rows. Short records are padded with empty
/// cells; records that fail to decode or carry no subject are skipped.
pub fn parse_reference_csv(text: &str) -> Result<Vec<SubjectReferenceRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV header row")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(line = line + 2, error = %e, "skipping unreadable CSV record");
                continue;
            }
        };
        let cells = headers
            .iter()
            .enumerate()
            .map(|(j, h)| (h.clone(), record.get(j).unwrap_or("").to_string()))
            .collect();
        if let Some(row) = SubjectReferenceRow::from_cells(cells) {
            rows.push(row);
        }
    }

    Ok(rows)
}
