//! CSV writer

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::{CsvWriteOptions, LineTerminator};
use gridcalc_core::CellTable;
use log::debug;

/// Grid file writer
pub struct CsvWriter;

impl CsvWriter {
    /// Write a cell table to a file
    pub fn write_file<P: AsRef<Path>>(
        table: &CellTable,
        path: P,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let path = path.as_ref();
        debug!("writing grid to {}", path.display());
        let file = File::create(path)?;
        Self::write(table, file, options)
    }

    /// Write a cell table to a writer
    ///
    /// Every row is written with all of its fields, empty cells included, so each
    /// cell keeps its position when the file is read back.
    pub fn write<W: Write>(table: &CellTable, writer: W, options: &CsvWriteOptions) -> CsvResult<()> {
        let terminator = match options.line_terminator {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
        };

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .terminator(terminator)
            .from_writer(writer);

        for row in table.rows() {
            let record: Vec<&str> = row.iter().map(|c| c.as_deref().unwrap_or("")).collect();
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CsvReadOptions, CsvReader};
    use gridcalc_core::{CellAddress, COLS, ROWS};
    use pretty_assertions::assert_eq;

    fn addr(s: &str) -> CellAddress {
        CellAddress::parse(s).unwrap()
    }

    #[test]
    fn test_write_layout() {
        let mut table = CellTable::new();
        table.set(addr("A1"), "1");
        table.set(addr("C1"), "=(A1+1)");

        let mut out = Vec::new();
        CsvWriter::write(&table, &mut out, &CsvWriteOptions::default()).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), ROWS);
        assert_eq!(lines[0], format!("1;;=(A1+1){}", ";".repeat(COLS - 3)));
        assert_eq!(lines[1], ";".repeat(COLS - 1));
    }

    #[test]
    fn test_round_trip_through_file() {
        let mut table = CellTable::new();
        table.set(addr("B2"), "=MAX(A1,7)");
        table.set(addr("P16"), "-3");
        table.set(addr("A9"), "12");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.csv");
        CsvWriter::write_file(&table, &path, &CsvWriteOptions::default()).unwrap();
        let back = CsvReader::read_file(&path, &CsvReadOptions::default()).unwrap();

        assert_eq!(back, table);
    }

    #[test]
    fn test_crlf_terminator() {
        let mut out = Vec::new();
        let options = CsvWriteOptions {
            line_terminator: LineTerminator::CRLF,
            ..Default::default()
        };
        CsvWriter::write(&CellTable::new(), &mut out, &options).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("\r\n").count(), ROWS);
    }
}
