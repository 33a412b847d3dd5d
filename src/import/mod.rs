//! Import pipeline - bulk match import from spreadsheet exports
//!
//! Rows are validated and stored one at a time. A bad row is recorded in the
//! report and skipped; only an unreadable document or a header that lacks a
//! mandatory column aborts the whole import.

pub mod layout;
pub mod parse;
pub mod sheet;

use std::path::Path;
use crate::{Error, Result};
use crate::record::{self, NewMatch};
use crate::storage::MatchStore;
use layout::ColumnMap;

pub use layout::Layout;
pub use sheet::Sheet;

/// Default cap on the number of error messages kept in a report
pub const MAX_REPORTED_ERRORS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Error messages kept in the report; failures beyond this are only counted
    pub max_errors: usize,
    /// Field delimiter; inferred from the file extension when `None`
    pub delimiter: Option<u8>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            max_errors: MAX_REPORTED_ERRORS,
            delimiter: None,
        }
    }
}

/// Outcome of an import run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub failed: usize,
    /// One message per failed row, capped at [`ImportOptions::max_errors`]
    pub errors: Vec<String>,
}

impl ImportReport {
    fn record_failure(&mut self, row_number: usize, reason: &str, max_errors: usize) {
        self.failed += 1;
        if self.errors.len() < max_errors {
            self.errors.push(format!("Row {}: {}", row_number, reason));
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    /// Human-readable summary listing at most `limit` errors
    pub fn summary(&self, limit: usize) -> String {
        let mut out = format!(
            "Successfully imported: {} matches\nFailed: {} matches",
            self.imported, self.failed
        );
        if !self.errors.is_empty() {
            out.push_str("\n\nErrors:");
            for error in self.errors.iter().take(limit) {
                out.push('\n');
                out.push_str(error);
            }
            let hidden = self.failed.saturating_sub(limit.min(self.errors.len()));
            if hidden > 0 {
                out.push_str(&format!("\n... and {} more errors", hidden));
            }
        }
        out
    }
}

/// Imports sheets into a [`MatchStore`]
pub struct Importer<'a> {
    store: &'a MatchStore,
    options: ImportOptions,
}

impl<'a> Importer<'a> {
    pub fn new(store: &'a MatchStore) -> Self {
        Self::with_options(store, ImportOptions::default())
    }

    pub fn with_options(store: &'a MatchStore, options: ImportOptions) -> Self {
        Self { store, options }
    }

    /// Read a workbook's first worksheet or a delimited file and import
    /// every data row
    pub fn import_file(&self, path: &Path) -> Result<ImportReport> {
        tracing::info!("Importing matches from {}", path.display());
        let sheet = Sheet::open(path, self.options.delimiter)?;
        if sheet.is_empty() {
            return Err(Error::Unreadable {
                path: path.display().to_string(),
                reason: "sheet is empty".to_string(),
            });
        }
        self.import_sheet(&sheet)
    }

    /// Import every data row of an already loaded sheet
    pub fn import_sheet(&self, sheet: &Sheet) -> Result<ImportReport> {
        let layout = layout::detect(sheet)?;
        let mut report = ImportReport::default();

        for row in layout.first_data_row()..sheet.row_count() {
            let row_number = sheet.row_number(row);
            let outcome = match sheet.row_error(row) {
                Some(reason) => Err(reason.to_string()),
                None => build_match(sheet, row, &layout.columns)
                    .and_then(|m| self.store.insert(&m).map_err(|e| e.to_string())),
            };

            match outcome {
                Ok(id) => {
                    tracing::trace!("row {} stored as match {}", row_number, id);
                    report.imported += 1;
                }
                Err(reason) => {
                    tracing::debug!("row {} skipped: {}", row_number, reason);
                    report.record_failure(row_number, &reason, self.options.max_errors);
                }
            }
        }

        tracing::info!("Import finished: {} imported, {} failed", report.imported, report.failed);
        Ok(report)
    }
}

/// Validate one data row. Blank or absent player/category fall back to
/// the sentinels; an unparseable date becomes now.
fn build_match(sheet: &Sheet, row: usize, columns: &ColumnMap) -> std::result::Result<NewMatch, String> {
    let champion = sheet.cell(row, columns.champion);
    if champion.is_empty() {
        return Err("Champion name is required".to_string());
    }

    let optional = |col: Option<usize>| {
        col.map(|c| sheet.cell(row, c))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    let date_cell = sheet.cell(row, columns.date);

    Ok(NewMatch {
        player: optional(columns.player),
        champion: champion.to_string(),
        is_win: parse::parse_outcome(sheet.cell(row, columns.outcome)),
        played_at: parse::parse_date(date_cell).unwrap_or_else(record::now),
        category: optional(columns.category),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DEFAULT_CATEGORY, UNKNOWN_PLAYER};
    use chrono::NaiveDate;
    use std::io::Write;

    #[test]
    fn test_header_import_with_reordered_columns_and_bad_row() {
        let store = MatchStore::open_in_memory().unwrap();
        let sheet = Sheet::from_rows([
            vec!["Date", "Champion", "Result", "Player", "Mode"],
            vec!["2024-01-01 10:00:00", "Ahri", "win", "Faker", "Ranked"],
            vec!["2024-01-02", "Zed", "loss", "Faker", "ARAM"],
            vec!["01/03/2024", "", "win", "Chovy", "Ranked"],
            vec!["25/01/2024", "Lux", "1", "", ""],
            vec!["garbage", "Jinx", "Victory", "Chovy", "Ranked"],
        ]);

        let report = Importer::new(&store).import_sheet(&sheet).unwrap();
        assert_eq!(report.imported, 4);
        assert_eq!(report.failed, 1);
        assert_eq!(report.errors, vec!["Row 4: Champion name is required"]);

        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 4);

        let lux = all.iter().find(|m| m.champion == "Lux").unwrap();
        assert!(lux.is_win);
        assert_eq!(lux.player, UNKNOWN_PLAYER);
        assert_eq!(lux.category, DEFAULT_CATEGORY);
        assert_eq!(lux.played_at.date(), NaiveDate::from_ymd_opt(2024, 1, 25).unwrap());

        let zed = all.iter().find(|m| m.champion == "Zed").unwrap();
        assert!(!zed.is_win);
        assert_eq!(zed.category, "ARAM");

        let jinx = all.iter().find(|m| m.champion == "Jinx").unwrap();
        assert!(jinx.is_win);
        // unparseable date falls back to now
        assert!(jinx.played_at > NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_headerless_import_uses_fixed_order() {
        let store = MatchStore::open_in_memory().unwrap();
        let sheet = Sheet::from_rows([
            vec!["Faker", "Ahri", "true", "2024-02-01 12:00:00", "Ranked"],
            vec!["Chovy", "Azir", "no", "2024-02-02 12:00:00", "Normal"],
            vec!["Faker", "Orianna", "yes", "2024-02-03 12:00:00", "ARAM"],
        ]);

        let report = Importer::new(&store).import_sheet(&sheet).unwrap();
        assert_eq!(report, ImportReport { imported: 3, failed: 0, errors: vec![] });

        let all = store.list_all().unwrap();
        assert_eq!(all[0].champion, "Orianna");
        assert_eq!(all[0].player, "Faker");
        assert_eq!(all[0].category, "ARAM");
        assert!(!all[1].is_win);
        assert_eq!(all[2].played_at, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap().and_hms_opt(12, 0, 0).unwrap());
    }

    #[test]
    fn test_missing_mandatory_column_aborts_import() {
        let store = MatchStore::open_in_memory().unwrap();
        let sheet = Sheet::from_rows([
            vec!["Player", "Champion", "Date"],
            vec!["Faker", "Ahri", "2024-01-01"],
        ]);

        let err = Importer::new(&store).import_sheet(&sheet).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Win/Loss column not found. Expected column header: 'Iswin', 'Win', 'Victory', or 'Result'"
        );
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_error_list_is_capped() {
        let store = MatchStore::open_in_memory().unwrap();
        let mut rows = vec![vec!["Champion".to_string(), "Win".to_string(), "Date".to_string()]];
        for _ in 0..5 {
            rows.push(vec![String::new(), "win".to_string(), String::new()]);
        }
        rows.push(vec!["Ahri".to_string(), "win".to_string(), String::new()]);
        let sheet = Sheet::from_rows(rows);

        let options = ImportOptions { max_errors: 2, ..Default::default() };
        let report = Importer::with_options(&store, options).import_sheet(&sheet).unwrap();

        assert_eq!(report.imported, 1);
        assert_eq!(report.failed, 5);
        assert_eq!(report.errors, vec!["Row 2: Champion name is required", "Row 3: Champion name is required"]);
        assert!(report.summary(10).ends_with("... and 3 more errors"));
    }

    #[test]
    fn test_import_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "PlayerName,Champion,IsWin,Date,GameMode").unwrap();
        writeln!(file, "Faker,Ahri,True,2024-01-01 10:00:00,Ranked").unwrap();
        writeln!(file, "Faker,\"Nunu & Willump\",False,01/02/2024,Normal").unwrap();

        let store = MatchStore::open_in_memory().unwrap();
        let report = Importer::new(&store).import_file(&path).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.imported, 2);
        assert!(store.list_all().unwrap().iter().any(|m| m.champion == "Nunu & Willump"));
    }

    #[test]
    fn test_undecodable_row_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        std::fs::write(
            &path,
            b"Champion,Win,Date\nAhri,win,2024-01-01\nKai\xe9Sa,win,2024-01-02\nZed,loss,2024-01-03\n",
        )
        .unwrap();

        let store = MatchStore::open_in_memory().unwrap();
        let report = Importer::new(&store).import_file(&path).unwrap();

        assert_eq!(report.imported, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.errors, vec!["Row 3: Column 1 is not valid UTF-8"]);
        let champions: Vec<String> = store.list_all().unwrap().into_iter().map(|m| m.champion).collect();
        assert_eq!(champions, vec!["Zed", "Ahri"]);
    }

    #[test]
    fn test_errors_name_the_source_line_after_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        std::fs::write(&path, "Champion,Win,Date\n\nAhri,win,2024-01-01\n,win,2024-01-01\n").unwrap();

        let store = MatchStore::open_in_memory().unwrap();
        let report = Importer::new(&store).import_file(&path).unwrap();

        assert_eq!(report.imported, 1);
        assert_eq!(report.errors, vec!["Row 4: Champion name is required"]);
    }

    #[test]
    fn test_import_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, header) in ["PlayerName", "Champion", "IsWin", "Date", "GameMode"].iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        sheet.write_string(1, 0, "Faker").unwrap();
        sheet.write_string(1, 1, "Ahri").unwrap();
        sheet.write_boolean(1, 2, true).unwrap();
        sheet.write_string(1, 3, "2024-01-01 10:00:00").unwrap();
        sheet.write_string(1, 4, "Ranked").unwrap();
        sheet.write_string(2, 0, "Chovy").unwrap();
        sheet.write_boolean(2, 2, false).unwrap();
        sheet.write_string(3, 1, "Azir").unwrap();
        sheet.write_number(3, 2, 0.0).unwrap();
        sheet.write_string(3, 3, "01/02/2024").unwrap();
        workbook.save(&path).unwrap();

        let store = MatchStore::open_in_memory().unwrap();
        let report = Importer::new(&store).import_file(&path).unwrap();

        assert_eq!(report.imported, 2);
        assert_eq!(report.errors, vec!["Row 3: Champion name is required"]);

        let all = store.list_all().unwrap();
        let ahri = all.iter().find(|m| m.champion == "Ahri").unwrap();
        assert!(ahri.is_win);
        assert_eq!(ahri.player, "Faker");
        assert_eq!(ahri.category, "Ranked");
        assert_eq!(ahri.played_at, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(10, 0, 0).unwrap());

        let azir = all.iter().find(|m| m.champion == "Azir").unwrap();
        assert!(!azir.is_win);
        assert_eq!(azir.player, UNKNOWN_PLAYER);
        assert_eq!(azir.category, DEFAULT_CATEGORY);
        assert_eq!(azir.played_at.date(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn test_empty_or_missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let store = MatchStore::open_in_memory().unwrap();
        let importer = Importer::new(&store);

        let empty = dir.path().join("empty.csv");
        std::fs::File::create(&empty).unwrap();
        assert!(matches!(importer.import_file(&empty), Err(Error::Unreadable { .. })));
        assert!(matches!(
            importer.import_file(&dir.path().join("missing.csv")),
            Err(Error::Unreadable { .. })
        ));
    }

    #[test]
    fn test_summary_wording() {
        let report = ImportReport {
            imported: 3,
            failed: 1,
            errors: vec!["Row 2: Champion name is required".to_string()],
        };
        assert_eq!(
            report.summary(10),
            "Successfully imported: 3 matches\nFailed: 1 matches\n\nErrors:\nRow 2: Champion name is required"
        );
    }
}
