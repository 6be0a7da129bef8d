//! Reference corpus: the registered names candidates must stay away from
//!
//! The corpus lives in a CSV file or a spreadsheet with a header row; one
//! named column holds the names. In memory it is an immutable snapshot with phonetic codes
//! precomputed, cheap to clone and safe to share between sampling workers.

use std::path::Path;
use std::sync::Arc;

use calamine::{open_workbook_auto, Reader};
use parking_lot::RwLock;

use crate::error::{NameForgeError, Result};
use crate::similarity::{NameProfile, PhoneticEncoder};
use crate::types::Name;

/// Immutable, shareable corpus snapshot
#[derive(Debug, Clone, Default)]
pub struct ReferenceCorpus {
    entries: Arc<[NameProfile]>,
}

impl ReferenceCorpus {
    pub fn new(names: Vec<Name>) -> Self {
        let encoder = PhoneticEncoder::new();
        let entries: Vec<NameProfile> = names
            .into_iter()
            .map(|name| NameProfile::new(name, &encoder))
            .collect();
        Self {
            entries: entries.into(),
        }
    }

    /// Load the `column` of a CSV or spreadsheet file
    pub fn load(path: &Path, column: &str) -> Result<Self> {
        Ok(Self::new(load_names(path, column)?))
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn profiles(&self) -> &[NameProfile] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &Name> {
        self.entries.iter().map(|entry| &entry.name)
    }

    /// New snapshot with `name` appended; `self` is left untouched
    pub fn with_name(&self, name: Name) -> Self {
        let encoder = PhoneticEncoder::new();
        let mut entries = self.entries.to_vec();
        entries.push(NameProfile::new(name, &encoder));
        Self {
            entries: entries.into(),
        }
    }
}

impl FromIterator<Name> for ReferenceCorpus {
    fn from_iter<T: IntoIterator<Item = Name>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Corpus shared by concurrent workers.
///
/// Readers take a snapshot and never hold the lock while scoring; accepted
/// names are published as a new snapshot.
#[derive(Debug, Clone, Default)]
pub struct SharedCorpus {
    inner: Arc<RwLock<ReferenceCorpus>>,
}

impl SharedCorpus {
    pub fn new(corpus: ReferenceCorpus) -> Self {
        Self {
            inner: Arc::new(RwLock::new(corpus)),
        }
    }

    pub fn snapshot(&self) -> ReferenceCorpus {
        self.inner.read().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Publish `name` if `accept` still holds against the current corpus.
    ///
    /// `accept` runs under the write lock so two workers can never both
    /// publish names that were only checked against an older snapshot.
    pub fn publish_if<F>(&self, name: Name, accept: F) -> bool
    where
        F: FnOnce(&ReferenceCorpus) -> bool,
    {
        let mut guard = self.inner.write();
        if !accept(&guard) {
            return false;
        }
        *guard = guard.with_name(name);
        true
    }
}

/// Extensions read as spreadsheets; anything else is CSV
const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SPREADSHEET_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(ext)))
}

/// Read the names in `column` of the corpus file at `path`.
///
/// CSV files need a header row. Spreadsheets are read from their first sheet,
/// whose first row holds the headers. Blank cells are skipped. A missing
/// file, unreadable row or unknown column is reported as
/// [`NameForgeError::CorpusLoad`].
pub fn load_names(path: &Path, column: &str) -> Result<Vec<Name>> {
    let path_str = || Some(path.to_string_lossy().to_string());
    let load_err = |e: &dyn std::fmt::Display| NameForgeError::corpus_load(e.to_string(), path_str());

    let (headers, rows) = if is_spreadsheet(path) {
        read_sheet(path).map_err(|e| load_err(&e))?
    } else {
        read_table(path, csv::Trim::All).map_err(|e| load_err(&e))?
    };

    let index = column_index(&headers, column).ok_or_else(|| {
        NameForgeError::corpus_load(
            format!("column '{}' not found (available: {})", column, headers.join(", ")),
            path_str(),
        )
    })?;

    let names: Vec<Name> = rows
        .iter()
        .filter_map(|row| row.get(index))
        .filter_map(|cell| Name::new(cell.trim()).ok())
        .collect();

    tracing::info!(path = %path.display(), column = %column, names = names.len(), "Reference corpus loaded");
    Ok(names)
}

/// Append `name` as a new row in `column` and rewrite the CSV file.
///
/// Existing rows and columns are kept as they are; other cells of the new
/// row are left blank. A missing or empty file gets a single-column header.
/// The file is replaced atomically through a sibling temporary file.
/// Spreadsheet corpora are read-only.
pub fn append_name(path: &Path, column: &str, name: &Name) -> Result<()> {
    let path_str = || Some(path.to_string_lossy().to_string());
    let write_err = |e: &dyn std::fmt::Display| NameForgeError::corpus_write(e.to_string(), path_str());

    if is_spreadsheet(path) {
        return Err(NameForgeError::corpus_write(
            "spreadsheet corpora are read-only; export the sheet as CSV to save names",
            path_str(),
        ));
    }

    let is_new = match std::fs::metadata(path) {
        Ok(meta) => meta.len() == 0,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
        Err(e) => return Err(write_err(&e)),
    };
    let (headers, mut rows) = if is_new {
        (vec![column.to_string()], Vec::new())
    } else {
        read_table(path, csv::Trim::None).map_err(|e| write_err(&e))?
    };

    let index = column_index(&headers, column).ok_or_else(|| {
        NameForgeError::corpus_write(format!("column '{}' not found", column), path_str())
    })?;

    let mut row = vec![String::new(); headers.len()];
    row[index] = name.as_str().to_string();
    rows.push(row);

    replace_table(path, &headers, &rows).map_err(|e| write_err(&e))?;

    tracing::info!(path = %path.display(), name = %name, rows = rows.len(), "Name appended to corpus");
    Ok(())
}

type Table = (Vec<String>, Vec<Vec<String>>);

fn read_table(path: &Path, trim: csv::Trim) -> std::result::Result<Table, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(trim)
        .from_path(path)?;
    let headers = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(str::to_string).collect());
    }
    Ok((headers, rows))
}

fn read_sheet(path: &Path) -> std::result::Result<Table, calamine::Error> {
    let mut workbook = open_workbook_auto(path)?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Err(calamine::Error::Msg("workbook has no sheets")),
    };

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<String>>());
    let headers = rows.next().unwrap_or_default();
    Ok((headers, rows.collect()))
}

/// Write the table next to `path`, then rename it over `path`
fn replace_table(path: &Path, headers: &[String], rows: &[Vec<String>]) -> std::result::Result<(), csv::Error> {
    let tmp_path = path.with_extension("csv.tmp");
    let written = write_table(&tmp_path, headers, rows)
        .and_then(|()| std::fs::rename(&tmp_path, path).map_err(csv::Error::from));
    if written.is_err() {
        let _ = std::fs::remove_file(&tmp_path);
    }
    written
}

fn write_table(path: &Path, headers: &[String], rows: &[Vec<String>]) -> std::result::Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_path(path)?;
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn column_index(headers: &[String], column: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim() == column)
        .or_else(|| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(column)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn csv_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_load_names() {
        let file = csv_file("Codigo,Nombre\n1,Aspirina\n2,\n3, Ibuprofeno \n");
        let names = load_names(file.path(), "Nombre").unwrap();
        let names: Vec<&str> = names.iter().map(Name::as_str).collect();
        assert_eq!(names, vec!["Aspirina", "Ibuprofeno"]);
    }

    #[test]
    fn test_column_lookup_ignores_case() {
        let file = csv_file("nombre\nKeto\n");
        assert_eq!(load_names(file.path(), "Nombre").unwrap().len(), 1);
    }

    #[test]
    fn test_missing_column() {
        let file = csv_file("Name\nAspirina\n");
        let err = load_names(file.path(), "Nombre").unwrap_err();
        assert!(matches!(err, NameForgeError::CorpusLoad { .. }));
        assert!(err.to_string().contains("Nombre"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_names(Path::new("/no/such/corpus.csv"), "Nombre").unwrap_err();
        assert!(matches!(err, NameForgeError::CorpusLoad { .. }));
    }

    #[test]
    fn test_append_keeps_rows() {
        let file = csv_file("Codigo,Nombre\n1,Aspirina\n2,Ibuprofeno\n");
        append_name(file.path(), "Nombre", &Name::new("Zyxqklm").unwrap()).unwrap();

        let names = load_names(file.path(), "Nombre").unwrap();
        let names: Vec<&str> = names.iter().map(Name::as_str).collect();
        assert_eq!(names, vec!["Aspirina", "Ibuprofeno", "Zyxqklm"]);

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert!(content.contains("1,Aspirina"));
        assert!(content.ends_with(",Zyxqklm\n"));
    }

    #[test]
    fn test_append_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.csv");
        append_name(&path, "Nombre", &Name::new("Dexbifen").unwrap()).unwrap();
        assert_eq!(load_names(&path, "Nombre").unwrap().len(), 1);
    }

    #[test]
    fn test_append_unknown_column() {
        let file = csv_file("Name\nAspirina\n");
        let err = append_name(file.path(), "Nombre", &Name::new("Keto").unwrap()).unwrap_err();
        assert!(matches!(err, NameForgeError::CorpusWrite { .. }));
    }

    #[test]
    fn test_append_to_empty_file_writes_header() {
        let file = csv_file("");
        append_name(file.path(), "Nombre", &Name::new("Zyxqklm").unwrap()).unwrap();
        let content = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(content, "Nombre\nZyxqklm\n");
    }

    #[test]
    fn test_failed_replace_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("corpus");
        std::fs::create_dir(&target).unwrap();

        let headers = vec!["Nombre".to_string()];
        let rows = vec![vec!["Keto".to_string()]];
        assert!(replace_table(&target, &headers, &rows).is_err());
        assert!(target.is_dir());
        assert!(!dir.path().join("corpus.csv.tmp").exists());
    }

    #[test]
    fn test_undecodable_row_is_load_error() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"Nombre\nAspirina\n\xff\xfe\n").unwrap();
        let err = load_names(file.path(), "Nombre").unwrap_err();
        assert!(matches!(err, NameForgeError::CorpusLoad { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_load_spreadsheet() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/registered.xlsx");
        let names = load_names(&path, "nombre").unwrap();
        let names: Vec<&str> = names.iter().map(Name::as_str).collect();
        assert_eq!(names, vec!["Aspirina", "Ibuprofeno", "Paracetamol"]);

        let err = load_names(&path, "Marca").unwrap_err();
        assert!(err.to_string().contains("Codigo, Nombre"));
    }

    #[test]
    fn test_missing_spreadsheet() {
        let err = load_names(Path::new("/no/such/corpus.xlsx"), "Nombre").unwrap_err();
        assert!(matches!(err, NameForgeError::CorpusLoad { .. }));
    }

    #[test]
    fn test_append_to_spreadsheet_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registered.XLSX");
        let err = append_name(&path, "Nombre", &Name::new("Keto").unwrap()).unwrap_err();
        assert!(matches!(err, NameForgeError::CorpusWrite { .. }));
        assert!(err.to_string().contains("CSV"));
        assert!(!path.exists());
    }

    #[test]
    fn test_snapshot_is_immutable() {
        let corpus: ReferenceCorpus = ["Aspirina", "Ibuprofeno"]
            .iter()
            .map(|s| Name::new(*s).unwrap())
            .collect();
        let grown = corpus.with_name(Name::new("Keto").unwrap());
        assert_eq!(corpus.len(), 2);
        assert_eq!(grown.len(), 3);
    }

    #[test]
    fn test_shared_publish_if() {
        let shared = SharedCorpus::new(ReferenceCorpus::empty());
        assert!(shared.publish_if(Name::new("Keto").unwrap(), |c| c.is_empty()));
        assert!(!shared.publish_if(Name::new("Dex").unwrap(), |c| c.is_empty()));
        assert_eq!(shared.len(), 1);
    }
}
