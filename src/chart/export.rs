// Writes the scores to an Excel file.

use chrono::{Local, NaiveDate};
use log::info;
use rust_xlsxwriter::{Workbook, XlsxError};
use seating_chart::{ExportRow, StudentId, EXPORT_HEADERS};
use snafu::prelude::*;

use std::path::{Path, PathBuf};

use crate::chart::*;

/// Name of the worksheet holding the scores.
pub const SHEET_NAME: &str = "學生總成績";

/// `<class name>_學生總成績_<YYYY-MM-DD>.xlsx`
pub fn export_file_name(class_name: &str, date: NaiveDate) -> String {
    format!(
        "{}_{}_{}.xlsx",
        class_name,
        SHEET_NAME,
        date.format("%Y-%m-%d")
    )
}

fn build_workbook(rows: &[ExportRow]) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, title) in EXPORT_HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *title)?;
    }
    for (idx, r) in rows.iter().enumerate() {
        let row = (idx + 1) as u32;
        worksheet.write_string(row, 0, r.class_name.as_str())?;
        worksheet.write_number(row, 1, r.group as f64)?;
        match &r.id {
            StudentId::Number(n) => worksheet.write_number(row, 2, *n)?,
            StudentId::Text(s) => worksheet.write_string(row, 2, s.as_str())?,
        };
        worksheet.write_string(row, 3, r.name.as_str())?;
        worksheet.write_number(row, 4, r.plus_score as f64)?;
        worksheet.write_string(row, 5, r.project_grade.as_str())?;
        worksheet.write_number(row, 6, r.total_score as f64)?;
    }
    Ok(workbook)
}

/// Writes the scores in the directory, under a name dated with today's local date.
/// Returns the path of the file.
pub fn write_scores(dir: &str, class_name: &str, rows: &[ExportRow]) -> ChartResult<PathBuf> {
    let file_name = export_file_name(class_name, Local::now().date_naive());
    let path = Path::new(dir).join(file_name);
    let path_s = path.display().to_string();

    let mut workbook = build_workbook(rows).context(WritingExcelSnafu { path: &path_s })?;
    workbook
        .save(&path)
        .context(WritingExcelSnafu { path: &path_s })?;
    info!("Exported {} students to {:?}", rows.len(), path_s);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook, DataType, Reader, Xlsx};

    #[test]
    fn file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(
            export_file_name("7年班", date),
            "7年班_學生總成績_2024-03-07.xlsx"
        );
    }

    #[test]
    fn written_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![
            ExportRow {
                class_name: "701".to_string(),
                group: 2,
                id: StudentId::Number(5.0),
                name: "王小明".to_string(),
                plus_score: -1,
                project_grade: "B+".to_string(),
                total_score: 94,
            },
            ExportRow {
                class_name: "701".to_string(),
                group: 4,
                id: StudentId::Text("A3".to_string()),
                name: "林小華".to_string(),
                plus_score: 0,
                project_grade: "作品".to_string(),
                total_score: 0,
            },
        ];
        let path = write_scores(&dir.path().display().to_string(), "701", &rows).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        let range = workbook.worksheet_range(SHEET_NAME).unwrap().unwrap();
        let all: Vec<&[DataType]> = range.rows().collect();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0][6], DataType::String("總分".to_string()));
        assert_eq!(all[1][2], DataType::Float(5.0));
        assert_eq!(all[1][5], DataType::String("B+".to_string()));
        assert_eq!(all[1][6], DataType::Float(94.0));
        assert_eq!(all[2][2], DataType::String("A3".to_string()));
    }
}
