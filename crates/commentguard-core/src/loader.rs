//! Comment file loading and saving (CSV or JSON records)

use crate::dataset::{
    self, Dataset, Row, COMMENT_TEXT, IS_OFFENSIVE, MOCK_MODE, PRE_FILTERED, REQUIRED_COLUMNS,
    USERNAME,
};
use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Boolean verdict columns, typed when read back from CSV
const FLAG_COLUMNS: [&str; 3] = [IS_OFFENSIVE, PRE_FILTERED, MOCK_MODE];

/// On-disk format of a comment file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Json,
}

impl FileFormat {
    /// Detect the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(Error::UnsupportedFormat(format!(".{ext}"))),
        }
    }
}

/// Loads a comment file and writes moderated results back in the same format
#[derive(Debug, Clone)]
pub struct CommentLoader {
    path: PathBuf,
    format: FileFormat,
}

impl CommentLoader {
    /// Create a loader for `path`. Fails on unsupported extensions.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let format = FileFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    /// Load the dataset and check the required columns are present
    pub fn load(&self) -> Result<Dataset> {
        let dataset = match self.format {
            FileFormat::Csv => read_csv(&self.path)?,
            FileFormat::Json => read_json(&self.path)?,
        };
        dataset.require_columns(&REQUIRED_COLUMNS)?;

        debug!(
            path = %self.path.display(),
            rows = dataset.len(),
            columns = dataset.columns().len(),
            "Loaded comment file"
        );
        Ok(dataset)
    }

    /// Save the dataset to `output` using the input file's format
    pub fn save(&self, dataset: &Dataset, output: &Path) -> Result<PathBuf> {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        match self.format {
            FileFormat::Csv => write_csv(dataset, output)?,
            FileFormat::Json => write_json(dataset, output)?,
        }

        debug!(path = %output.display(), rows = dataset.len(), "Saved dataset");
        Ok(output.to_path_buf())
    }
}

/// `<dir>/<stem>_moderated.<ext>` next to the input file
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{stem}_moderated.{}", ext.to_string_lossy()),
        None => format!("{stem}_moderated"),
    };
    input.with_file_name(name)
}

/// Quick statistics about a loaded comment file
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub total_comments: usize,
    pub unique_users: usize,
    pub avg_comment_length: usize,
}

impl DatasetSummary {
    /// Summarise a dataset
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let users: HashSet<String> = dataset
            .rows()
            .iter()
            .filter_map(|row| row.get(USERNAME).and_then(dataset::text_of))
            .collect();

        let lengths: Vec<usize> = dataset
            .rows()
            .iter()
            .filter_map(|row| row.get(COMMENT_TEXT).and_then(dataset::text_of))
            .map(|text| text.chars().count())
            .collect();
        let avg_comment_length = if lengths.is_empty() {
            0
        } else {
            lengths.iter().sum::<usize>() / lengths.len()
        };

        Self {
            total_comments: dataset.len(),
            unique_users: users.len(),
            avg_comment_length,
        }
    }
}

fn read_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record?;
        let mut row = Row::new();
        for (index, column) in columns.iter().enumerate() {
            let cell = record.get(index).unwrap_or("");
            row.insert(column.clone(), parse_cell(column, cell));
        }
        rows.push(row);
    }

    Ok(Dataset::new(columns, rows))
}

/// Typed value of a CSV cell. Empty is null everywhere; only the verdict
/// flag columns read `True`/`False` as booleans, every other cell stays text
/// exactly as written.
fn parse_cell(column: &str, cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if FLAG_COLUMNS.contains(&column) {
        match cell {
            "True" | "true" => return Value::Bool(true),
            "False" | "false" => return Value::Bool(false),
            _ => {}
        }
    }
    Value::String(cell.to_string())
}

fn read_json(path: &Path) -> Result<Dataset> {
    let reader = BufReader::new(File::open(path)?);
    let value: Value = serde_json::from_reader(reader)?;

    let Value::Array(items) = value else {
        return Err(Error::dataset("JSON input must be an array of comment records"));
    };

    let rows = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map),
            _ => Err(Error::dataset(format!("record {index} is not a JSON object"))),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Dataset::from_rows(rows))
}

fn write_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(dataset.columns())?;

    for row in dataset.rows() {
        let record: Vec<String> = dataset
            .columns()
            .iter()
            .map(|column| format_cell(row.get(column).unwrap_or(&Value::Null)))
            .collect();
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn write_json(dataset: &Dataset, path: &Path) -> Result<()> {
    let records: Vec<Value> = dataset
        .rows()
        .iter()
        .map(|row| {
            let ordered: Map<String, Value> = dataset
                .columns()
                .iter()
                .map(|column| {
                    let value = row.get(column).cloned().unwrap_or(Value::Null);
                    (column.clone(), value)
                })
                .collect();
            Value::Object(ordered)
        })
        .collect();

    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &records)?;
    Ok(())
}
