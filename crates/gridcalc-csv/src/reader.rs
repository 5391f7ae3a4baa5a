//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::CsvReadOptions;
use gridcalc_core::{CellAddress, CellTable, COLS, ROWS};
use log::{debug, warn};

/// Grid file reader
pub struct CsvReader;

impl CsvReader {
    /// Read a grid file into a cell table
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<CellTable> {
        let path = path.as_ref();
        debug!("reading grid from {}", path.display());
        let file = File::open(path)?;
        Self::read(file, options)
    }

    /// Read a grid from a reader into a cell table
    ///
    /// Rows are placed by their line number, so blank lines keep the rows below
    /// them in place. Content beyond the grid bounds is dropped with a warning.
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<CellTable> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut table = CellTable::new();

        for (index, result) in csv_reader.records().enumerate() {
            let record = result?;
            let row = record
                .position()
                .map(|p| p.line().saturating_sub(1) as usize)
                .unwrap_or(index);

            if row >= ROWS {
                warn!("ignoring line {}: the grid has only {} rows", row + 1, ROWS);
                continue;
            }

            for (col, field) in record.iter().enumerate() {
                let field = if options.trim { field.trim() } else { field };
                if field.is_empty() {
                    continue;
                }
                if col >= COLS {
                    warn!(
                        "ignoring cell {} of line {}: the grid has only {} columns",
                        col + 1,
                        row + 1,
                        COLS
                    );
                    continue;
                }

                table.set(CellAddress::new(row, col)?, field);
            }
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn read(text: &str) -> CellTable {
        CsvReader::read(text.as_bytes(), &CsvReadOptions::default()).unwrap()
    }

    fn cell(table: &CellTable, addr: &str) -> Option<String> {
        table
            .get(CellAddress::parse(addr).unwrap())
            .map(str::to_string)
    }

    #[test]
    fn test_read_cells() {
        let table = read("1;=A1+1;\n;;=MAX(A1,B1)\n");
        assert_eq!(cell(&table, "A1").as_deref(), Some("1"));
        assert_eq!(cell(&table, "B1").as_deref(), Some("=A1+1"));
        assert_eq!(cell(&table, "C1"), None);
        assert_eq!(cell(&table, "C2").as_deref(), Some("=MAX(A1,B1)"));
        assert_eq!(table.iter().count(), 3);
    }

    #[test]
    fn test_blank_lines_keep_row_positions() {
        let table = read("1\n\n3\n");
        assert_eq!(cell(&table, "A1").as_deref(), Some("1"));
        assert_eq!(cell(&table, "A2"), None);
        assert_eq!(cell(&table, "A3").as_deref(), Some("3"));
    }

    #[test]
    fn test_fields_are_trimmed() {
        let table = read(" 4 ; =A1 \n");
        assert_eq!(cell(&table, "A1").as_deref(), Some("4"));
        assert_eq!(cell(&table, "B1").as_deref(), Some("=A1"));
    }

    #[test]
    fn test_out_of_bounds_content_is_dropped() {
        let mut text = String::new();
        for row in 0..20 {
            let fields: Vec<String> = (0..20).map(|col| (row * 100 + col).to_string()).collect();
            text.push_str(&fields.join(";"));
            text.push('\n');
        }

        let table = read(&text);
        assert_eq!(table.iter().count(), ROWS * COLS);
        assert_eq!(cell(&table, "P16").as_deref(), Some("1515"));
    }
}
