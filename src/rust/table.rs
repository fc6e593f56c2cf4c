use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use calamine::{open_workbook_auto, Data, Reader};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use log::info;

use crate::batch::{Batch, BatchError, Value};
use crate::prediction::PredictionResult;

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("Workbook has no worksheets: {0}")]
    NoWorksheet(String),
    #[error("Malformed table: {0}")]
    Malformed(#[from] BatchError),
}

/// Spreadsheet extensions routed to [`read_xlsx`] by [`read_table`].
const SPREADSHEET_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

/// Reads a table from disk, choosing the format by file extension.
///
/// Spreadsheets go through [`read_xlsx`]; anything else is read as CSV.
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<Batch, TableError> {
    let path = path.as_ref();
    let is_spreadsheet = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SPREADSHEET_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)));

    if is_spreadsheet {
        read_xlsx(path)
    } else {
        read_csv(path)
    }
}

/// Reads the first worksheet of a workbook into a [`Batch`].
///
/// The first row holds the column names. Numeric cells become numbers,
/// booleans become `1`/`0` and text goes through [`Value::parse`].
pub fn read_xlsx<P: AsRef<Path>>(path: P) -> Result<Batch, TableError> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TableError::NoWorksheet(path.display().to_string()))??;

    let mut rows = range.rows();
    let columns: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|cell| cell.to_string().trim().to_string()).collect(),
        None => Vec::new(),
    };
    let rows: Vec<Vec<Value>> = rows.map(|cells| cells.iter().map(spreadsheet_value).collect()).collect();

    let batch = Batch::new(columns, rows)?;
    info!("Read {} rows x {} columns from {}", batch.len(), batch.columns().len(), path.display());
    Ok(batch)
}

fn spreadsheet_value(cell: &Data) -> Value {
    match cell {
        Data::Int(i) => Value::Number(*i as f64),
        Data::Float(f) => Value::Number(*f),
        Data::Bool(b) => Value::Number(if *b { 1.0 } else { 0.0 }),
        Data::DateTime(dt) => Value::Number(dt.as_f64()),
        Data::String(s) => Value::parse(s),
        Data::Empty => Value::Empty,
        other => Value::Text(other.to_string()),
    }
}

/// Reads a CSV file with a header row into a [`Batch`].
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Batch, TableError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let batch = read_csv_from(file)?;
    info!("Read {} rows x {} columns from {}", batch.len(), batch.columns().len(), path.display());
    Ok(batch)
}

/// Reads CSV data with a header row from any reader.
///
/// Header names are trimmed. Cells are interpreted with [`Value::parse`].
pub fn read_csv_from<R: Read>(reader: R) -> Result<Batch, TableError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Value::parse).collect());
    }

    Ok(Batch::new(columns, rows)?)
}

/// Writes every result column, plus the prediction column, as CSV.
pub fn write_csv<W: Write>(result: &PredictionResult, writer: W) -> Result<(), TableError> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    writer.write_record(result.columns())?;
    for (cells, label) in result.iter() {
        let mut record: Vec<String> = cells.iter().map(Value::to_string).collect();
        record.push(label.to_string());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
