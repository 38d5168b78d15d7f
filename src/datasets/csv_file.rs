use std::fs::File;
use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

use crate::core::{DatasetHeader, Row};
use crate::datasets::RowSource;
use crate::utils::file_parsing::parse_field;

/// Reads rows from a comma-separated file whose first record names the columns.
///
/// Quoting follows RFC 4180: quoted fields may hold commas, newlines and
/// doubled `""` quotes. Records with the wrong number of fields are skipped
/// with a warning.
pub struct CsvFileDataset {
    path: PathBuf,
    header: Arc<DatasetHeader>,
    reader: Reader<File>,
    record: StringRecord,
    pending: Option<Row>,
    skipped: usize,
}

impl CsvFileDataset {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let (header, reader) = Self::open(&path)?;
        let mut ds = Self {
            path,
            header,
            reader,
            record: StringRecord::new(),
            pending: None,
            skipped: 0,
        };
        ds.advance();
        Ok(ds)
    }

    fn open(path: &Path) -> Result<(Arc<DatasetHeader>, Reader<File>), Error> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_path(path)
            .map_err(into_io)?;

        let columns: Vec<String> = reader
            .headers()
            .map_err(into_io)?
            .iter()
            .map(|c| c.trim_start_matches('\u{feff}').to_string())
            .collect();
        if columns.is_empty() {
            return Err(Error::new(ErrorKind::InvalidData, "CSV file has no header line"));
        }
        if columns.iter().any(String::is_empty) {
            return Err(Error::new(
                ErrorKind::InvalidData,
                "CSV header has an empty column name",
            ));
        }

        let relation = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "csv".to_string());
        debug!(path = %path.display(), columns = columns.len(), "opened CSV dataset");
        Ok((Arc::new(DatasetHeader::new(relation, columns)), reader))
    }

    /// Reads ahead to the next well-formed record.
    fn advance(&mut self) {
        self.pending = None;
        let width = self.header.number_of_columns();
        loop {
            match self.reader.read_record(&mut self.record) {
                Ok(true) => {}
                Ok(false) => return,
                Err(e) if e.is_io_error() => {
                    warn!(error = %e, "stopping CSV read");
                    return;
                }
                Err(e) => {
                    self.skipped += 1;
                    warn!(error = %e, "skipping unreadable CSV record");
                    continue;
                }
            }

            if self.record.len() != width {
                self.skipped += 1;
                warn!(
                    line = self.record.position().map(|p| p.line()),
                    expected = width,
                    found = self.record.len(),
                    "skipping malformed CSV record"
                );
                continue;
            }
            self.pending = Some(Row::new(self.record.iter().map(parse_field).collect()));
            return;
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Malformed records dropped so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Keeps the underlying `io::Error` (and its kind) when there is one.
fn into_io(e: csv::Error) -> Error {
    if !e.is_io_error() {
        return Error::new(ErrorKind::InvalidData, e);
    }
    match e.into_kind() {
        csv::ErrorKind::Io(io) => io,
        other => Error::new(ErrorKind::InvalidData, format!("{other:?}")),
    }
}

impl RowSource for CsvFileDataset {
    fn header(&self) -> &Arc<DatasetHeader> {
        &self.header
    }

    fn has_more_rows(&self) -> bool {
        self.pending.is_some()
    }

    fn next_row(&mut self) -> Option<Row> {
        let row = self.pending.take()?;
        self.advance();
        Some(row)
    }

    fn restart(&mut self) -> Result<(), Error> {
        let (header, reader) = Self::open(&self.path)?;
        self.header = header;
        self.reader = reader;
        self.skipped = 0;
        self.advance();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Value;
    use crate::datasets::collect_dataset;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(body: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(body.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn reads_header_and_typed_rows() {
        let f = write_csv("shop_id,city,item_price\n1,\"Oslo\",10.5\n2,Bergen,\n");
        let mut ds = CsvFileDataset::new(f.path()).unwrap();
        assert_eq!(ds.header().index_of_column("city"), Some(1));

        let data = collect_dataset(&mut ds);
        assert_eq!(data.len(), 2);
        assert_eq!(
            data.row(0).unwrap().values,
            vec![Value::from(1.0), Value::from("Oslo"), Value::from(10.5)]
        );
        assert_eq!(data.row(1).unwrap().values[2], Value::Null);
    }

    #[test]
    fn apostrophes_and_doubled_quotes_survive() {
        let f = write_csv("id,name,price\n1,Children's book,10\n2,plain,20\n3,\"say \"\"hi\"\"\",30\n");
        let mut ds = CsvFileDataset::new(f.path()).unwrap();
        let data = collect_dataset(&mut ds);
        assert_eq!(ds.skipped(), 0);
        assert_eq!(data.len(), 3);
        assert_eq!(data.row(0).unwrap().values[1], Value::from("Children's book"));
        assert_eq!(data.row(2).unwrap().values[1], Value::from("say \"hi\""));
        assert_eq!(data.row(2).unwrap().values[2], Value::from(30.0));
    }

    #[test]
    fn quoted_newline_stays_in_one_field() {
        let f = write_csv("id,note\n1,\"two\nlines\"\n2,one line\n");
        let mut ds = CsvFileDataset::new(f.path()).unwrap();
        let data = collect_dataset(&mut ds);
        assert_eq!(data.len(), 2);
        assert_eq!(data.row(0).unwrap().values[1], Value::from("two\nlines"));
        assert_eq!(data.row(1).unwrap().values[0], Value::from(2.0));
    }

    #[test]
    fn malformed_and_blank_lines_are_skipped() {
        let f = write_csv("a,b\n1,2\n3\n\n4,5,6\n7,8\n");
        let mut ds = CsvFileDataset::new(f.path()).unwrap();
        let data = collect_dataset(&mut ds);
        assert_eq!(data.len(), 2);
        assert_eq!(ds.skipped(), 2);
        assert_eq!(data.row(1).unwrap().values[0], Value::from(7.0));
    }

    #[test]
    fn restart_rereads_from_first_row() {
        let f = write_csv("a\n1\n2\n");
        let mut ds = CsvFileDataset::new(f.path()).unwrap();
        assert_eq!(ds.next_row().unwrap().values[0], Value::from(1.0));
        ds.restart().unwrap();
        assert_eq!(collect_dataset(&mut ds).len(), 2);
    }

    #[test]
    fn empty_file_is_rejected() {
        let f = write_csv("");
        let err = CsvFileDataset::new(f.path()).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = CsvFileDataset::new("/definitely/not/here.csv").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
