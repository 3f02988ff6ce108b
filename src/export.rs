use anyhow::{Context, Result};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

use crate::models::PatentRecord;

pub const SHEET_NAME: &str = "Patents";

/// Header text and display width (in characters) of each column, in order.
pub const COLUMNS: [(&str, f64); 8] = [
    ("S.No", 6.0),
    ("Patent Number", 16.0),
    ("Title", 60.0),
    ("Domain", 22.0),
    ("Technology Area", 28.0),
    ("Sub-Technology", 35.0),
    ("Abstract", 90.0),
    ("Keywords", 50.0),
];

/// Longest text Excel accepts in one cell, in characters.
pub const EXCEL_CELL_LIMIT: usize = 32_767;

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9]").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub seq: usize,
    pub number: String,
    pub title: String,
    pub domain: String,
    pub technology: String,
    pub sub_technology: String,
    pub abstract_text: String,
    pub keywords: String,
}

impl ExportRow {
    pub fn cells(&self) -> [&str; 7] {
        [
            &self.number,
            &self.title,
            &self.domain,
            &self.technology,
            &self.sub_technology,
            &self.abstract_text,
            &self.keywords,
        ]
    }
}

/// Cut `text` to at most `EXCEL_CELL_LIMIT` characters.
pub fn clip_cell(text: &str) -> String {
    match text.char_indices().nth(EXCEL_CELL_LIMIT) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}

/// One row per record, numbered from 1. Over-long cells are clipped so a
/// single record never blocks the workbook.
pub fn to_rows(records: &[PatentRecord]) -> Vec<ExportRow> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| ExportRow {
            seq: i + 1,
            number: clip_cell(r.number_or_empty()),
            title: clip_cell(r.title_or_empty()),
            domain: clip_cell(r.domain_or_empty()),
            technology: clip_cell(r.technology_or_empty()),
            sub_technology: clip_cell(r.sub_technology_or_empty()),
            abstract_text: clip_cell(r.abstract_or_empty()),
            keywords: clip_cell(&r.keywords.join(", ")),
        })
        .collect()
}

pub fn sanitize_query(query: &str) -> String {
    NON_ALNUM.replace_all(query, "_").into_owned()
}

/// `<sanitized query>_patents.xlsx`, or `patent_results_<date>.xlsx` when
/// there is no query.
pub fn export_file_name(query: Option<&str>, today: NaiveDate) -> String {
    match query.filter(|q| !q.is_empty()) {
        Some(q) => format!("{}_patents.xlsx", sanitize_query(q)),
        None => format!("patent_results_{}.xlsx", today.format("%Y-%m-%d")),
    }
}

/// Write a single-sheet workbook: header row, then `rows`.
pub fn write_xlsx(path: &Path, rows: &[ExportRow]) -> Result<()> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, (title, width)) in COLUMNS.iter().enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, *title, &header)?;
        sheet.set_column_width(col, *width)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_number(r, 0, row.seq as f64)?;
        for (j, cell) in row.cells().iter().enumerate() {
            sheet.write_string(r, (j + 1) as u16, *cell)?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("saving workbook {}", path.display()))?;
    debug!("Wrote workbook - path={}, rows={}", path.display(), rows.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: &str, kws: &[&str]) -> PatentRecord {
        PatentRecord {
            id: Some(n.to_string()),
            number: Some(n.to_string()),
            title: Some(format!("Title {n}")),
            abstract_text: None,
            domain: Some("Energy".into()),
            technology: None,
            sub_technology: Some("PV; Storage".into()),
            keywords: kws.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn rows_are_numbered_from_one() {
        let records = vec![record("US1", &["a", "b"]), record("US2", &[]), record("US3", &["c"])];
        let rows = to_rows(&records);
        assert_eq!(rows.iter().map(|r| r.seq).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(rows[0].keywords, "a, b");
        assert_eq!(rows[1].keywords, "");
        assert_eq!(rows[0].technology, "");
        assert_eq!(rows[0].sub_technology, "PV; Storage");
    }

    #[test]
    fn file_name_from_query() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(sanitize_query("3D imaging!"), "3D_imaging_");
        assert_eq!(export_file_name(Some("3D imaging!"), day), "3D_imaging__patents.xlsx");
        assert_eq!(export_file_name(None, day), "patent_results_2026-03-09.xlsx");
        assert_eq!(export_file_name(Some(""), day), "patent_results_2026-03-09.xlsx");
    }

    #[test]
    fn column_order_is_fixed() {
        let titles: Vec<_> = COLUMNS.iter().map(|(t, _)| *t).collect();
        assert_eq!(
            titles,
            vec!["S.No", "Patent Number", "Title", "Domain", "Technology Area", "Sub-Technology", "Abstract", "Keywords"]
        );
    }

    fn zip_entry(path: &Path, name: &str) -> String {
        use std::io::Read;
        let file = std::fs::File::open(path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let mut out = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn workbook_has_header_and_one_row_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let records = vec![record("US1", &["x"]), record("US2", &[]), record("US3", &["y", "z"])];
        write_xlsx(&path, &to_rows(&records)).unwrap();

        let sheet = zip_entry(&path, "xl/worksheets/sheet1.xml");
        assert_eq!(sheet.matches("<row ").count(), 4);

        let workbook = zip_entry(&path, "xl/workbook.xml");
        assert!(workbook.contains(&format!("name=\"{SHEET_NAME}\"")));

        let strings = zip_entry(&path, "xl/sharedStrings.xml");
        for (title, _) in COLUMNS {
            assert!(strings.contains(title), "missing header {title}");
        }
        assert!(strings.contains("US3"));
    }

    #[test]
    fn long_cells_are_clipped_not_rejected() {
        let mut long = record("US1", &["x"]);
        long.abstract_text = Some("x".repeat(40_000));
        let rows = to_rows(&[long, record("US2", &[])]);
        assert_eq!(rows[0].abstract_text.chars().count(), EXCEL_CELL_LIMIT);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("long.xlsx");
        write_xlsx(&path, &rows).unwrap();
        assert_eq!(zip_entry(&path, "xl/worksheets/sheet1.xml").matches("<row ").count(), 3);

        assert_eq!(clip_cell(&"é".repeat(EXCEL_CELL_LIMIT + 5)).chars().count(), EXCEL_CELL_LIMIT);
        assert_eq!(clip_cell("short"), "short");
    }
}
