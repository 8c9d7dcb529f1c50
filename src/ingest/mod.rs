//! Bulk CSV ingest for the admin upload tab.
//!
//! Validation happens entirely before any insert: a file that is empty or
//! missing required columns is rejected with a descriptive error, and the
//! resulting batch is inserted in one statement with no per-row retry.

use serde::Deserialize;
use thiserror::Error;

use crate::database::models::base::{BaseType, HallType, NewBase};

const REQUIRED_COLUMNS: [&str; 3] = ["name", "image_path", "layout_link"];

/// One parsed upload row. `image_path` mirrors the upload template heading;
/// it lands in the base's `image_url` column.
#[derive(Debug, Clone, Deserialize)]
pub struct CsvRow {
    pub name: String,
    pub image_path: String,
    pub layout_link: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stats: Option<String>,
    #[serde(default)]
    pub tips: Option<String>,
}

/// Admin-selected tags applied to every row of the batch.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ImportTags {
    pub hall_type: HallType,
    pub hall_level: i32,
    pub base_type: BaseType,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("CSV file is empty")]
    Empty,

    #[error("CSV must have columns: {}", REQUIRED_COLUMNS.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Row {row} is missing a value for '{column}'")]
    MissingValue { row: usize, column: &'static str },

    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),
}

/// Parse and validate an uploaded CSV. Returns the rows only if the whole
/// file is well-formed; nothing is inserted from here.
pub fn parse_rows(input: &[u8]) -> Result<Vec<CsvRow>, IngestError> {
    if input.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(IngestError::Empty);
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == **required))
        .map(|s| s.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns(missing));
    }

    let mut rows = Vec::new();
    for (index, record) in reader.deserialize::<CsvRow>().enumerate() {
        let row = record?;
        // 1-based, counting the header line
        let line = index + 2;
        if row.name.is_empty() {
            return Err(IngestError::MissingValue { row: line, column: "name" });
        }
        if row.image_path.is_empty() {
            return Err(IngestError::MissingValue { row: line, column: "image_path" });
        }
        if row.layout_link.is_empty() {
            return Err(IngestError::MissingValue { row: line, column: "layout_link" });
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(IngestError::Empty);
    }

    Ok(rows)
}

/// Map validated rows to insertable bases tagged with the admin's selection.
/// Counters start at zero via column defaults.
pub fn build_bases(rows: Vec<CsvRow>, tags: ImportTags) -> Vec<NewBase> {
    rows.into_iter()
        .map(|row| NewBase {
            name: row.name,
            image_url: row.image_path,
            layout_link: row.layout_link,
            description: row.description.filter(|s| !s.is_empty()),
            stats: row.stats.filter(|s| !s.is_empty()),
            tips: row.tips.filter(|s| !s.is_empty()),
            hall_type: tags.hall_type,
            hall_level: tags.hall_level,
            base_type: tags.base_type,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags() -> ImportTags {
        ImportTags {
            hall_type: HallType::Th,
            hall_level: 17,
            base_type: BaseType::War,
        }
    }

    #[test]
    fn parses_a_valid_file() {
        let csv = b"name,image_path,layout_link,description,stats,tips\n\
                    Ring Base,https://img/1.png,https://link/1,Anti 3-star,,\n\
                    Crows,https://img/2.png,https://link/2,,,Keep CC centered\n";
        let rows = parse_rows(csv).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Ring Base");
        assert_eq!(rows[1].tips.as_deref(), Some("Keep CC centered"));

        let bases = build_bases(rows, tags());
        assert_eq!(bases[0].hall_level, 17);
        assert_eq!(bases[0].base_type, BaseType::War);
        // Empty optional cells become NULL, not empty strings
        assert!(bases[0].stats.is_none());
    }

    #[test]
    fn optional_columns_may_be_absent_entirely() {
        let csv = b"name,image_path,layout_link\nA,https://img,https://link\n";
        let rows = parse_rows(csv).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].description.is_none());
    }

    #[test]
    fn empty_file_is_rejected() {
        assert!(matches!(parse_rows(b""), Err(IngestError::Empty)));
        assert!(matches!(parse_rows(b"  \n"), Err(IngestError::Empty)));
    }

    #[test]
    fn header_only_file_is_rejected() {
        let csv = b"name,image_path,layout_link\n";
        assert!(matches!(parse_rows(csv), Err(IngestError::Empty)));
    }

    #[test]
    fn missing_required_column_fails_before_any_row_is_accepted() {
        let csv = b"name,image_path\nA,https://img\n";
        match parse_rows(csv) {
            Err(IngestError::MissingColumns(missing)) => {
                assert_eq!(missing, vec!["layout_link".to_string()]);
            }
            other => panic!("expected MissingColumns, got {:?}", other.map(|r| r.len())),
        }
    }

    #[test]
    fn blank_required_value_names_the_row() {
        let csv = b"name,image_path,layout_link\nA,https://img,https://link\nB,,https://link\n";
        match parse_rows(csv) {
            Err(IngestError::MissingValue { row, column }) => {
                assert_eq!(row, 3);
                assert_eq!(column, "image_path");
            }
            other => panic!("expected MissingValue, got {:?}", other.map(|r| r.len())),
        }
    }
}
