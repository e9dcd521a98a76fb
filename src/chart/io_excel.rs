// Primitives for reading Excel files (.xlsx and .xls).

use calamine::{open_workbook_auto, DataType, Reader};
use log::debug;
use seating_chart::Cell;
use snafu::prelude::*;

use crate::chart::*;

fn read_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::String(s) => Cell::Text(s.clone()),
        DataType::Float(f) => Cell::Number(*f),
        DataType::Int(i) => Cell::Number(*i as f64),
        DataType::DateTime(f) => Cell::Number(*f),
        DataType::Bool(b) => Cell::Bool(*b),
        DataType::Empty => Cell::Empty,
        _ => {
            debug!("read_cell: could not understand cell {:?}", cell);
            Cell::Empty
        }
    }
}

/// Reads all the rows of a worksheet. By default, the first worksheet of the workbook.
pub fn read_excel_rows(path: &str, worksheet_name: Option<&str>) -> ChartResult<Vec<Vec<Cell>>> {
    debug!(
        "read_excel_rows: path: {:?} worksheet: {:?}",
        path, worksheet_name
    );
    let mut workbook = open_workbook_auto(path).context(OpeningExcelSnafu { path })?;

    let wrange = match worksheet_name {
        // A worksheet name was provided, use it.
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu {
                path,
                worksheet: name,
            })?
            .context(OpeningExcelSnafu { path })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?,
    };

    let res: Vec<Vec<Cell>> = wrange
        .rows()
        .map(|row| row.iter().map(read_cell).collect())
        .collect();
    debug!("read_excel_rows: {} rows", res.len());
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
    use seating_chart::{parse_roster, StudentId};

    fn write_roster(worksheet: &mut Worksheet) -> Result<(), XlsxError> {
        for (col, title) in ["座號", "姓名", "組別", "座位"].iter().enumerate() {
            worksheet.write_string(0, col as u16, *title)?;
        }
        worksheet.write_number(1, 0, 5.0)?;
        worksheet.write_string(1, 1, "王小明")?;
        worksheet.write_number(1, 2, 2.0)?;
        worksheet.write_string(1, 3, "2-3")?;
        Ok(())
    }

    // The roster is on the first sheet, or on a second sheet after a cover page.
    fn write_workbook(dir: &tempfile::TempDir, roster_first: bool) -> String {
        let p = dir.path().join("roster.xlsx");
        let mut workbook = Workbook::new();
        if roster_first {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name("名單").unwrap();
            write_roster(worksheet).unwrap();
        } else {
            let cover = workbook.add_worksheet();
            cover.set_name("封面").unwrap();
            cover.write_string(0, 0, "七年二班").unwrap();
            let worksheet = workbook.add_worksheet();
            worksheet.set_name("名單").unwrap();
            write_roster(worksheet).unwrap();
        }
        workbook.save(&p).unwrap();
        p.display().to_string()
    }

    #[test]
    fn cells() {
        assert_eq!(read_cell(&DataType::Int(5)), Cell::Number(5.0));
        assert_eq!(
            read_cell(&DataType::String("2-3".to_string())),
            Cell::Text("2-3".to_string())
        );
        assert_eq!(read_cell(&DataType::Empty), Cell::Empty);
    }

    #[test]
    fn not_an_excel_file() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("roster.xlsx");
        std::fs::write(&p, "座號,姓名,組別,座位\n").unwrap();
        let res = read_excel_rows(&p.display().to_string(), None);
        assert!(matches!(res, Err(ChartError::OpeningExcel { .. })));
    }

    #[test]
    fn first_worksheet_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_workbook(&dir, true);
        let rows = read_excel_rows(&path, None).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], Cell::Number(5.0));
        assert_eq!(rows[1][2], Cell::Number(2.0));

        let parsed = parse_roster(&rows).unwrap();
        assert_eq!(parsed.valid_rows, 1);
        let s = parsed.roster.get("2-3").unwrap();
        assert_eq!(s.id, StudentId::Number(5.0));
        assert_eq!(s.id.to_string(), "5");
        assert_eq!(s.group, 2);
        assert_eq!(s.name, "王小明");
    }

    #[test]
    fn worksheet_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_workbook(&dir, false);

        // The first sheet is the cover page: no roster there.
        let cover = read_excel_rows(&path, None).unwrap();
        assert_eq!(cover, vec![vec![Cell::Text("七年二班".to_string())]]);

        let rows = read_excel_rows(&path, Some("名單")).unwrap();
        let parsed = parse_roster(&rows).unwrap();
        assert_eq!(parsed.roster.get("2-3").unwrap().group, 2);
    }

    #[test]
    fn missing_worksheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_workbook(&dir, true);
        match read_excel_rows(&path, Some("成績")) {
            Err(ChartError::MissingWorksheet { worksheet, .. }) => assert_eq!(worksheet, "成績"),
            x => panic!("unexpected result {:?}", x),
        }
    }
}
