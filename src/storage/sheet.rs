use csv::{ReaderBuilder, Writer};
use std::io;
use tracing::warn;

use crate::error::ScrapeResult;

/// One spreadsheet row, with one cell per sheet header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    cells: Vec<String>,
}

impl Record {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    pub fn get(&self, column: usize) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or_default()
    }

    pub fn set(&mut self, column: usize, value: impl Into<String>) {
        if column >= self.cells.len() {
            self.cells.resize(column + 1, String::new());
        }
        self.cells[column] = value.into();
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

/// The whole input table, held in memory for the run and written back once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    headers: Vec<String>,
    records: Vec<Record>,
}

impl Sheet {
    pub fn new(headers: Vec<String>, records: Vec<Record>) -> Self {
        let mut sheet = Self { headers, records };
        sheet.fit_records_to_headers();
        sheet
    }

    pub fn from_reader<R: io::Read>(reader: R) -> ScrapeResult<Self> {
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect::<Vec<_>>();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            records.push(Record::new(row.iter().map(str::to_string).collect()));
        }

        Ok(Self::new(headers, records))
    }

    pub fn to_writer<W: io::Write>(&self, writer: W) -> ScrapeResult<()> {
        let mut writer = Writer::from_writer(writer);
        writer.write_record(&self.headers)?;
        for record in &self.records {
            writer.write_record(&record.cells)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index of the first header equal to `name`, ignoring surrounding whitespace.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name.trim())
    }

    /// Index of `name`, appending an empty column when the sheet lacks it.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(index) = self.column(name) {
            return index;
        }
        self.headers.push(name.to_string());
        self.pad_records();
        self.headers.len() - 1
    }

    /// Make every record exactly as wide as the header row. Empty cells past
    /// the last header are dropped; rows that still overhang get unnamed
    /// header columns so their cells are written back out.
    fn fit_records_to_headers(&mut self) {
        let width = self.headers.len();
        for record in &mut self.records {
            while record.cells.len() > width && record.cells.last().is_some_and(|c| c.trim().is_empty()) {
                record.cells.pop();
            }
        }

        let widest = self.records.iter().map(|r| r.cells.len()).max().unwrap_or(0);
        if widest > width {
            warn!(
                "Rows carry {} cell(s) past the last header; adding unnamed columns",
                widest - width
            );
            self.headers.resize(widest, String::new());
        }

        self.pad_records();
    }

    fn pad_records(&mut self) {
        let width = self.headers.len();
        for record in &mut self.records {
            if record.cells.len() < width {
                record.cells.resize(width, String::new());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CSV: &str = "mfr number,model name,width\nA-100,Stool,\nB-200,Chair\n";

    #[test]
    fn short_rows_are_padded_to_header_width() {
        let sheet = Sheet::from_reader(CSV.as_bytes()).unwrap();

        assert_eq!(sheet.headers(), &["mfr number", "model name", "width"]);
        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet.records()[1].cells(), &["B-200", "Chair", ""]);
    }

    #[test]
    fn ensure_column_appends_once() {
        let mut sheet = Sheet::from_reader(CSV.as_bytes()).unwrap();

        let depth = sheet.ensure_column("depth");
        assert_eq!(depth, 3);
        assert_eq!(sheet.ensure_column("depth"), 3);
        assert_eq!(sheet.ensure_column("width"), 2);
        assert_eq!(sheet.records()[0].get(depth), "");
    }

    #[test]
    fn trailing_empty_cells_past_the_header_are_dropped() {
        let mut sheet = Sheet::from_reader("mfr number,model name\nA-1,Stool,,\nB-2,Chair\n".as_bytes()).unwrap();

        assert_eq!(sheet.headers(), &["mfr number", "model name"]);
        assert_eq!(sheet.records()[0].cells(), &["A-1", "Stool"]);

        let depth = sheet.ensure_column("depth");
        assert_eq!(sheet.records()[0].get(depth), "");

        let mut out = Vec::new();
        sheet.to_writer(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "mfr number,model name,depth\nA-1,Stool,\nB-2,Chair,\n"
        );
    }

    #[test]
    fn overhanging_cells_get_unnamed_columns_and_are_written_back() {
        let mut sheet = Sheet::from_reader("mfr number,model name\nA-1,Stool,extra\nB-2,Chair\n".as_bytes()).unwrap();

        assert_eq!(sheet.headers(), &["mfr number", "model name", ""]);
        assert_eq!(sheet.records()[1].cells(), &["B-2", "Chair", ""]);

        let depth = sheet.ensure_column("depth");
        assert_eq!(depth, 3);
        assert_eq!(sheet.records()[0].get(depth), "");
        assert_eq!(sheet.records()[0].get(2), "extra");

        let mut out = Vec::new();
        sheet.to_writer(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "mfr number,model name,,depth\nA-1,Stool,extra,\nB-2,Chair,,\n"
        );
    }

    #[test]
    fn written_sheet_keeps_row_order_and_quoting() {
        let mut sheet = Sheet::from_reader(CSV.as_bytes()).unwrap();
        sheet.records_mut()[0].set(2, "24, nominal");

        let mut out = Vec::new();
        sheet.to_writer(&mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "mfr number,model name,width\nA-100,Stool,\"24, nominal\"\nB-200,Chair,\n"
        );
    }
}
