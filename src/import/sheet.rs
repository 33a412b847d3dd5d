//! In-memory sheet - the grid of cell text an import works on

use std::fs::File;
use std::io::Read;
use std::path::Path;
use calamine::{open_workbook_auto, Data, DataType, Reader};
use csv::{ByteRecord, ReaderBuilder, Trim};
use crate::{Error, Result};
use crate::record;

/// Extensions read as workbooks rather than delimited text
const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// One row of a sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    /// 1-based row number in the source document
    pub number: usize,
    /// Trimmed cell text, or why the row could not be read
    pub cells: std::result::Result<Vec<String>, String>,
}

/// Non-blank rows of trimmed cell text. Rows may have different lengths;
/// a missing cell reads as blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    rows: Vec<SheetRow>,
}

impl Sheet {
    /// Rows numbered from 1 in the order given
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| SheetRow {
                number: i + 1,
                cells: Ok(row.into_iter().map(|cell| cell.into().trim().to_string()).collect()),
            })
            .collect();
        Self { rows }
    }

    /// Read delimited text. Every line is data; header detection happens later.
    ///
    /// A record that cannot be decoded becomes a failed row. Only an I/O
    /// error stops the read.
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> std::result::Result<Self, csv::Error> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut rows: Vec<SheetRow> = Vec::new();
        let mut record = ByteRecord::new();
        loop {
            let next_line = rows.last().map_or(1, |r| r.number + 1);
            match reader.read_byte_record(&mut record) {
                Ok(false) => break,
                Ok(true) => rows.push(SheetRow {
                    number: record.position().map_or(next_line, |p| p.line() as usize),
                    cells: decode(&record),
                }),
                Err(e) if e.is_io_error() => return Err(e),
                Err(e) => rows.push(SheetRow {
                    number: e.position().map_or(next_line, |p| p.line() as usize),
                    cells: Err(e.to_string()),
                }),
            }
        }
        Ok(Self { rows })
    }

    /// First worksheet of a workbook. Cells keep their absolute column so
    /// a table that does not start at column A still lines up.
    pub fn from_workbook(path: &Path) -> Result<Self> {
        let unreadable = |reason: String| Error::Unreadable {
            path: path.display().to_string(),
            reason,
        };

        let mut workbook = open_workbook_auto(path).map_err(|e| unreadable(e.to_string()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| unreadable("workbook has no worksheets".to_string()))?
            .map_err(|e| unreadable(e.to_string()))?;

        let (first_row, first_col) = range
            .start()
            .map_or((0, 0), |(row, col)| (row as usize, col as usize));

        let rows = range
            .rows()
            .enumerate()
            .map(|(i, cells)| {
                let mut text = vec![String::new(); first_col];
                text.extend(cells.iter().map(cell_text));
                SheetRow {
                    number: first_row + i + 1,
                    cells: Ok(text),
                }
            })
            .filter(|row| matches!(&row.cells, Ok(cells) if cells.iter().any(|c| !c.is_empty())))
            .collect();
        Ok(Self { rows })
    }

    /// Load a workbook or a delimited file. For delimited files the
    /// delimiter is inferred from the extension unless given.
    pub fn open(path: &Path, delimiter: Option<u8>) -> Result<Self> {
        if is_workbook(path) {
            return Self::from_workbook(path);
        }

        let unreadable = |reason: String| Error::Unreadable {
            path: path.display().to_string(),
            reason,
        };

        let file = File::open(path).map_err(|e| unreadable(e.to_string()))?;
        let delimiter = delimiter.unwrap_or_else(|| delimiter_for(path));
        Self::from_reader(file, delimiter).map_err(|e| unreadable(e.to_string()))
    }

    /// Cell text at zero-based `row`/`col`, blank when out of range or the
    /// row failed to read
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.row(row).get(col).map(String::as_str).unwrap_or("")
    }

    pub fn row(&self, row: usize) -> &[String] {
        match self.rows.get(row).map(|r| &r.cells) {
            Some(Ok(cells)) => cells,
            _ => &[],
        }
    }

    /// Source row number of the zero-based `row`
    pub fn row_number(&self, row: usize) -> usize {
        self.rows.get(row).map_or(row + 1, |r| r.number)
    }

    /// Why `row` could not be read, if it failed
    pub fn row_error(&self, row: usize) -> Option<&str> {
        match self.rows.get(row).map(|r| &r.cells) {
            Some(Err(reason)) => Some(reason),
            _ => None,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows
            .iter()
            .all(|row| matches!(&row.cells, Ok(cells) if cells.iter().all(String::is_empty)))
    }
}

fn decode(record: &ByteRecord) -> std::result::Result<Vec<String>, String> {
    record
        .iter()
        .enumerate()
        .map(|(i, field)| {
            std::str::from_utf8(field)
                .map(|text| text.trim().to_string())
                .map_err(|_| format!("Column {} is not valid UTF-8", i + 1))
        })
        .collect()
}

/// Date cells come out in the storage timestamp format; everything else as displayed
fn cell_text(cell: &Data) -> String {
    let text = match cell {
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_datetime()
            .map(|dt| record::format_timestamp(&dt))
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string(),
    };
    text.trim().to_string()
}

fn extension(path: &Path) -> Option<String> {
    path.extension().and_then(|e| e.to_str()).map(str::to_lowercase)
}

pub fn is_workbook(path: &Path) -> bool {
    extension(path).is_some_and(|ext| WORKBOOK_EXTENSIONS.contains(&ext.as_str()))
}

/// `.tsv`/`.tab` are tab separated, `.ssv` semicolon separated, anything else comma
pub fn delimiter_for(path: &Path) -> u8 {
    match extension(path).as_deref() {
        Some("tsv") | Some("tab") => b'\t',
        Some("ssv") => b';',
        _ => b',',
    }
}
