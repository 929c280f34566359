use std::io::Read;

use csv::StringRecord;

use super::{DatasetColumns, DatasetError};
use crate::classification::JobPosting;

/// Parsed dataset: raw rows kept for write-back, postings derived from the
/// configured columns.
#[derive(Debug, Clone)]
pub struct PostingTable {
    headers: StringRecord,
    rows: Vec<StringRecord>,
    pub(super) postings: Vec<JobPosting>,
}

impl PostingTable {
    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub(super) fn parse_table<R: Read>(
    reader: R,
    columns: &DatasetColumns,
) -> Result<PostingTable, DatasetError> {
    // Cells are echoed back untouched; only extracted values are trimmed.
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let title_index = column_index(&headers, &columns.title)?;
    let skills_index = column_index(&headers, &columns.skills)?;
    let id_index = columns
        .id
        .as_deref()
        .map(|column| column_index(&headers, column))
        .transpose()?;

    let mut rows = Vec::new();
    let mut postings = Vec::new();

    let width = headers.len();
    for (position, record) in csv_reader.records().enumerate() {
        let mut row = record?;
        if row.len() > width {
            return Err(DatasetError::RowTooLong {
                row: position + 1,
                expected: width,
                actual: row.len(),
            });
        }
        // Short rows are padded so write-back stays rectangular.
        while row.len() < width {
            row.push_field("");
        }
        let id = id_index
            .and_then(|index| non_empty(&row, index))
            .map(str::to_string)
            .unwrap_or_else(|| position.to_string());

        postings.push(JobPosting {
            id,
            title: non_empty(&row, title_index).map(str::to_string),
            skills: non_empty(&row, skills_index).map(str::to_string),
        });
        rows.push(row);
    }

    Ok(PostingTable {
        headers,
        rows,
        postings,
    })
}

fn column_index(headers: &StringRecord, column: &str) -> Result<usize, DatasetError> {
    let wanted = column.trim_start_matches('\u{feff}').trim();
    headers
        .iter()
        .position(|header| header.trim_start_matches('\u{feff}').trim() == wanted)
        .ok_or_else(|| DatasetError::MissingColumn {
            column: column.to_string(),
            available: headers.iter().map(str::to_string).collect(),
        })
}

// Blank and whitespace-only cells count as absent.
fn non_empty(row: &StringRecord, index: usize) -> Option<&str> {
    row.get(index)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
