// Primitives for reading CSV files.

use log::debug;
use seating_chart::Cell;
use snafu::prelude::*;

use crate::chart::*;

/// Reads all the lines of a CSV file. Every value is kept as text.
pub fn read_csv_rows(path: &str) -> ChartResult<Vec<Vec<Cell>>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let mut res: Vec<Vec<Cell>> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        let lineno = idx + 1;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        debug!("read_csv_rows: lineno: {:?} row: {:?}", lineno, &line);
        let row: Vec<Cell> = line
            .iter()
            .enumerate()
            .map(|(col, s)| {
                // Spreadsheet programs often save CSV files with a byte order mark.
                let s = if lineno == 1 && col == 0 {
                    s.trim_start_matches('\u{feff}')
                } else {
                    s
                };
                Cell::Text(s.to_string())
            })
            .collect();
        res.push(row);
    }
    Ok(res)
}
