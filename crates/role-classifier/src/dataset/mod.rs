//! CSV import/export around the classifier: caller-named columns in, one
//! label column out.

mod parser;

use std::io::{Read, Write};
use std::path::Path;

use crate::classification::{JobPosting, RoleLabel};

pub use parser::PostingTable;

pub const DEFAULT_TITLE_COLUMN: &str = "job_title";
pub const DEFAULT_SKILLS_COLUMN: &str = "skills_list";
pub const DEFAULT_LABEL_COLUMN: &str = "role_category";

/// Column names used to pull title/skills (and optionally an id) from a
/// dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetColumns {
    pub title: String,
    pub skills: String,
    pub id: Option<String>,
}

impl Default for DatasetColumns {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE_COLUMN.to_string(),
            skills: DEFAULT_SKILLS_COLUMN.to_string(),
            id: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("column '{column}' not found (available: {})", .available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },
    #[error("data row {row} has {actual} fields, header has {expected}")]
    RowTooLong {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("expected {expected} labels for the dataset, got {actual}")]
    LabelCountMismatch { expected: usize, actual: usize },
}

pub struct PostingImporter;

impl PostingImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        columns: &DatasetColumns,
    ) -> Result<PostingTable, DatasetError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, columns)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        columns: &DatasetColumns,
    ) -> Result<PostingTable, DatasetError> {
        parser::parse_table(reader, columns)
    }
}

/// How labelled rows are written back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelOutput {
    /// Every input column followed by the label column.
    AppendColumn,
    /// Only the label column.
    LabelsOnly,
}

pub fn write_labels<W: Write>(
    writer: W,
    table: &PostingTable,
    labels: &[RoleLabel],
    label_column: &str,
    output: LabelOutput,
) -> Result<(), DatasetError> {
    if labels.len() != table.len() {
        return Err(DatasetError::LabelCountMismatch {
            expected: table.len(),
            actual: labels.len(),
        });
    }

    let mut csv_writer = csv::Writer::from_writer(writer);
    match output {
        LabelOutput::AppendColumn => {
            let mut header: Vec<&str> = table.headers().iter().collect();
            header.push(label_column);
            csv_writer.write_record(&header)?;
            for (row, label) in table.rows().iter().zip(labels) {
                let mut fields: Vec<&str> = row.iter().collect();
                fields.push(label.as_str());
                csv_writer.write_record(&fields)?;
            }
        }
        LabelOutput::LabelsOnly => {
            csv_writer.write_record([label_column])?;
            for label in labels {
                csv_writer.write_record([label.as_str()])?;
            }
        }
    }
    csv_writer.flush()?;
    Ok(())
}

impl PostingTable {
    pub fn postings(&self) -> &[JobPosting] {
        &self.postings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::CategoryId;
    use std::io::Cursor;

    const SAMPLE: &str = "job_id,job_title,skills_list,country\n\
j-1,Senior Data Scientist,\"pytorch, sql\",FR\n\
j-2,Consultant,\"dbt, data modeling\",DE\n\
j-3,Random Title,,ES\n";

    #[test]
    fn reads_default_columns_and_treats_empty_cells_as_absent() {
        let table = PostingImporter::from_reader(Cursor::new(SAMPLE), &DatasetColumns::default())
            .expect("dataset parses");

        assert_eq!(table.len(), 3);
        let postings = table.postings();
        assert_eq!(postings[0].title.as_deref(), Some("Senior Data Scientist"));
        assert_eq!(postings[1].skills.as_deref(), Some("dbt, data modeling"));
        assert_eq!(postings[2].skills, None);
        assert_eq!(postings[2].id, "2");
    }

    #[test]
    fn id_column_is_used_when_configured() {
        let columns = DatasetColumns {
            id: Some("job_id".to_string()),
            ..DatasetColumns::default()
        };
        let table = PostingImporter::from_reader(Cursor::new(SAMPLE), &columns).expect("parses");
        let ids: Vec<_> = table.postings().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["j-1", "j-2", "j-3"]);
    }

    #[test]
    fn missing_column_is_reported_before_rows_are_read() {
        let columns = DatasetColumns {
            skills: "skills".to_string(),
            ..DatasetColumns::default()
        };
        let err = PostingImporter::from_reader(Cursor::new(SAMPLE), &columns)
            .expect_err("schema mismatch");

        match &err {
            DatasetError::MissingColumn { column, available } => {
                assert_eq!(column, "skills");
                assert!(available.contains(&"skills_list".to_string()));
            }
            other => panic!("expected missing column, got {other:?}"),
        }
        assert!(err.to_string().contains("job_title"));
    }

    #[test]
    fn appends_label_column_to_input_rows() {
        let table = PostingImporter::from_reader(Cursor::new(SAMPLE), &DatasetColumns::default())
            .expect("parses");
        let labels = vec![
            RoleLabel::Category(CategoryId::from("data_scientist")),
            RoleLabel::Category(CategoryId::from("analytics_engineer")),
            RoleLabel::Undefined,
        ];

        let mut out = Vec::new();
        write_labels(
            &mut out,
            &table,
            &labels,
            DEFAULT_LABEL_COLUMN,
            LabelOutput::AppendColumn,
        )
        .expect("write succeeds");

        let written = String::from_utf8(out).expect("utf8");
        let lines: Vec<_> = written.lines().collect();
        assert_eq!(lines[0], "job_id,job_title,skills_list,country,role_category");
        assert_eq!(lines[2], "j-2,Consultant,\"dbt, data modeling\",DE,analytics_engineer");
        assert_eq!(lines[3], "j-3,Random Title,,ES,undefined");
    }

    #[test]
    fn labels_only_output_has_a_single_column() {
        let table = PostingImporter::from_reader(Cursor::new(SAMPLE), &DatasetColumns::default())
            .expect("parses");
        let labels = vec![RoleLabel::Undefined; 3];

        let mut out = Vec::new();
        write_labels(&mut out, &table, &labels, "role", LabelOutput::LabelsOnly)
            .expect("write succeeds");

        let written = String::from_utf8(out).expect("utf8");
        assert_eq!(written, "role\nundefined\nundefined\nundefined\n");
    }

    #[test]
    fn short_rows_are_padded_and_written_back_whole() {
        let data = "job_id,job_title,skills_list,country\n\
1,Data Engineer,spark,FR\n\
2,Data Analyst\n";
        let table = PostingImporter::from_reader(Cursor::new(data), &DatasetColumns::default())
            .expect("parses");
        assert_eq!(table.rows()[1].len(), 4);
        assert_eq!(table.postings()[1].skills, None);

        let labels = vec![
            RoleLabel::Category(CategoryId::from("data_engineer")),
            RoleLabel::Category(CategoryId::from("data_analyst")),
        ];
        let mut out = Vec::new();
        write_labels(
            &mut out,
            &table,
            &labels,
            DEFAULT_LABEL_COLUMN,
            LabelOutput::AppendColumn,
        )
        .expect("write succeeds");

        let written = String::from_utf8(out).expect("utf8");
        assert_eq!(
            written,
            "job_id,job_title,skills_list,country,role_category\n\
1,Data Engineer,spark,FR,data_engineer\n\
2,Data Analyst,,,data_analyst\n"
        );
    }

    #[test]
    fn rows_longer_than_the_header_are_rejected() {
        let data = "job_id,job_title,skills_list\n1,Data Engineer,spark,extra\n";
        let err = PostingImporter::from_reader(Cursor::new(data), &DatasetColumns::default())
            .expect_err("ragged row");
        assert!(matches!(
            err,
            DatasetError::RowTooLong {
                row: 1,
                expected: 3,
                actual: 4
            }
        ));
    }

    #[test]
    fn passthrough_cells_keep_their_whitespace() {
        let data = "job_title,skills_list,note\n  Data Engineer  , spark ,  keep me  \n";
        let table = PostingImporter::from_reader(Cursor::new(data), &DatasetColumns::default())
            .expect("parses");
        assert_eq!(table.postings()[0].title.as_deref(), Some("Data Engineer"));
        assert_eq!(table.postings()[0].skills.as_deref(), Some("spark"));

        let mut out = Vec::new();
        write_labels(
            &mut out,
            &table,
            &[RoleLabel::Undefined],
            DEFAULT_LABEL_COLUMN,
            LabelOutput::AppendColumn,
        )
        .expect("write succeeds");
        let written = String::from_utf8(out).expect("utf8");
        assert!(written.contains("  keep me  ,undefined"));
    }

    #[test]
    fn label_count_must_match_rows() {
        let table = PostingImporter::from_reader(Cursor::new(SAMPLE), &DatasetColumns::default())
            .expect("parses");
        let err = write_labels(
            Vec::new(),
            &table,
            &[RoleLabel::Undefined],
            DEFAULT_LABEL_COLUMN,
            LabelOutput::LabelsOnly,
        )
        .expect_err("mismatch");
        assert!(matches!(
            err,
            DatasetError::LabelCountMismatch {
                expected: 3,
                actual: 1
            }
        ));
    }
}
