//! Tabular comment dataset
//!
//! A dataset is an ordered list of rows, each row a map from column name to
//! cell value. Rows are value records: a classification never edits a row
//! field by field, it builds a new row and swaps it in with
//! [`Dataset::replace_row`], so the five result fields of a row are always
//! written together or not at all.

use crate::error::{Error, Result};
use crate::types::Verdict;
use serde_json::{Map, Value};

/// A single dataset row
pub type Row = Map<String, Value>;

/// Identifier column
pub const COMMENT_ID: &str = "comment_id";
/// Author column
pub const USERNAME: &str = "username";
/// Default text column
pub const COMMENT_TEXT: &str = "comment_text";

/// Verdict columns
pub const IS_OFFENSIVE: &str = "is_offensive";
pub const OFFENSE_TYPE: &str = "offense_type";
pub const EXPLANATION: &str = "explanation";
pub const PRE_FILTERED: &str = "pre_filtered";
pub const MOCK_MODE: &str = "mock_mode";

/// Columns every input file must carry
pub const REQUIRED_COLUMNS: [&str; 3] = [COMMENT_ID, USERNAME, COMMENT_TEXT];

/// The five result columns with the defaults used for unclassified rows
pub fn result_column_defaults() -> [(&'static str, Value); 5] {
    [
        (IS_OFFENSIVE, Value::Bool(false)),
        (OFFENSE_TYPE, Value::Null),
        (EXPLANATION, Value::Null),
        (PRE_FILTERED, Value::Bool(false)),
        (MOCK_MODE, Value::Bool(false)),
    ]
}

/// Ordered collection of comment rows with a known column set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Create a dataset from an explicit column order and rows
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Create a dataset whose columns are the union of the row keys, in
    /// first-seen order
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        Self { columns, rows }
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Row at `index`
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Whether a column with this name exists
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Error unless all named columns exist
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        match names.iter().find(|name| !self.has_column(name)) {
            Some(missing) => Err(Error::dataset(format!(
                "Required column '{missing}' not found in the data"
            ))),
            None => Ok(()),
        }
    }

    /// Add a column filled with `default` unless it already exists.
    ///
    /// Returns true if the column was added.
    pub fn ensure_column(&mut self, name: &str, default: Value) -> bool {
        if self.has_column(name) {
            return false;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.entry(name.to_string()).or_insert_with(|| default.clone());
        }
        true
    }

    /// Cell value, `None` when the row does not exist. A missing key in an
    /// existing row reads as null.
    pub fn get(&self, index: usize, field: &str) -> Option<&Value> {
        self.rows
            .get(index)
            .map(|row| row.get(field).unwrap_or(&Value::Null))
    }

    /// Swap in a replacement for the row at `index`, returning the old row
    pub fn replace_row(&mut self, index: usize, row: Row) -> Result<Row> {
        let len = self.rows.len();
        let slot = self
            .rows
            .get_mut(index)
            .ok_or_else(|| Error::dataset(format!("row {index} out of range ({len} rows)")))?;
        for key in row.keys() {
            if !self.columns.iter().any(|c| c == key) {
                self.columns.push(key.clone());
            }
        }
        Ok(std::mem::replace(slot, row))
    }
}

/// A row counts as classified once its explanation is non-null
pub fn is_classified(row: &Row) -> bool {
    !matches!(row.get(EXPLANATION), None | Some(Value::Null))
}

/// Copy of `row` with the verdict's five result fields written into it
pub fn with_verdict(row: &Row, verdict: &Verdict) -> Row {
    let mut updated = row.clone();
    updated.insert(IS_OFFENSIVE.to_string(), Value::Bool(verdict.is_offensive));
    updated.insert(
        OFFENSE_TYPE.to_string(),
        verdict
            .offense_type
            .map(|t| Value::String(t.as_str().to_string()))
            .unwrap_or(Value::Null),
    );
    updated.insert(
        EXPLANATION.to_string(),
        Value::String(verdict.explanation.clone()),
    );
    updated.insert(PRE_FILTERED.to_string(), Value::Bool(verdict.pre_filtered));
    updated.insert(MOCK_MODE.to_string(), Value::Bool(verdict.mock_mode));
    updated
}

/// Cell rendered as text. Null reads as `None`.
pub fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Truthiness of a cell as written by this tool or by spreadsheet exports
pub fn flag_of(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(s.trim(), "True" | "true" | "TRUE" | "1"),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OffenseType;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_ensure_column_adds_once() {
        let mut dataset = Dataset::from_rows(vec![row(json!({"comment_id": 1}))]);

        assert!(dataset.ensure_column(EXPLANATION, Value::Null));
        assert!(!dataset.ensure_column(EXPLANATION, json!("ignored")));
        assert_eq!(dataset.get(0, EXPLANATION), Some(&Value::Null));
        assert_eq!(dataset.columns(), &["comment_id", "explanation"]);
    }

    #[test]
    fn test_missing_key_reads_as_null() {
        let dataset = Dataset::new(
            vec!["comment_id".into(), "username".into()],
            vec![row(json!({"comment_id": 1}))],
        );
        assert_eq!(dataset.get(0, USERNAME), Some(&Value::Null));
        assert_eq!(dataset.get(1, USERNAME), None);
    }

    #[test]
    fn test_with_verdict_writes_all_fields() {
        let original = row(json!({"comment_id": 7, "comment_text": "hi"}));
        let verdict = Verdict::offensive(OffenseType::Threat, "bad").mocked();

        let updated = with_verdict(&original, &verdict);

        assert_eq!(updated["comment_id"], json!(7));
        assert_eq!(updated[IS_OFFENSIVE], json!(true));
        assert_eq!(updated[OFFENSE_TYPE], json!("threat"));
        assert_eq!(updated[EXPLANATION], json!("bad"));
        assert_eq!(updated[PRE_FILTERED], json!(false));
        assert_eq!(updated[MOCK_MODE], json!(true));
        assert!(is_classified(&updated));
        assert!(!is_classified(&original));
    }

    #[test]
    fn test_replace_row_out_of_range() {
        let mut dataset = Dataset::default();
        assert!(dataset.replace_row(0, Row::new()).is_err());
    }

    #[test]
    fn test_require_columns_names_missing() {
        let dataset = Dataset::new(vec!["comment_id".into()], vec![]);
        let err = dataset.require_columns(&REQUIRED_COLUMNS).unwrap_err();
        assert!(err.to_string().contains("username"));
    }

    #[test]
    fn test_flag_of_accepts_exports() {
        assert!(flag_of(&json!(true)));
        assert!(flag_of(&json!("True")));
        assert!(!flag_of(&json!("False")));
        assert!(!flag_of(&Value::Null));
    }
}
