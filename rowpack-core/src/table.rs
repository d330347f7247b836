//! Tabular storage over a Hamming-encoded line store
//!
//! A [`Table`] persists a named field list and its data rows to one file,
//! bracketed by control markers:
//!
//! ```text
//! ##TNH<TAB><table-name>
//! ##BFL<TAB><field-count>
//! -><field-name>                 repeated field-count times
//! ##EFL
//! ##BDL<TAB><row-count>
//! -><cell><TAB><cell>...         repeated row-count times
//! ##EDL
//! ```
//!
//! Loading is strict and positional: every marker must appear on its own
//! line in this order, the declared counts must match the lines that
//! follow, and the file must end immediately after the closing marker.

use crate::constants::{
    BEGIN_DATA_LIST, BEGIN_FIELD_LIST, END_DATA_LIST, END_FIELD_LIST, FIELD_DELIMITER,
    MARKER_PREFIX, MAX_FIELDS, ROW_PREFIX, TABLE_NAME_HEADER,
};
use crate::error::StoreError;
use crate::row::Row;
use crate::store::{FileMode, FileState, LineStore};
use std::path::{Path, PathBuf};

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// A named table persisted to one Hamming-encoded file
///
/// Construction opens or creates the backing file: an empty file adopts
/// the expected field names and writes the full grammar once; a non-empty
/// file is parsed and its schema cross-checked against the expected names.
/// Rows accumulate in memory until [`Table::save`] rewrites the file.
#[derive(Debug)]
pub struct Table {
    name: String,
    directory: PathBuf,
    file_name: String,
    fields: Vec<String>,
    records: Vec<Vec<String>>,
    store: LineStore,
}

/// Field list and records recovered from one full parse
struct ParsedTable {
    fields: Vec<String>,
    records: Vec<Vec<String>>,
}

impl Table {
    /// Open or create the table at `directory`/`file_name`
    ///
    /// `expected_fields` is the schema the caller relies on: it seeds a
    /// brand-new table, and an existing file must store exactly this set
    /// of field names (order may differ; the stored order wins).
    pub fn open<S: AsRef<str>>(
        name: &str,
        directory: impl AsRef<Path>,
        file_name: &str,
        expected_fields: &[S],
    ) -> Result<Self, StoreError> {
        validate_table_name(name)?;
        let fields: Vec<String> = expected_fields
            .iter()
            .map(|field| field.as_ref().to_string())
            .collect();
        validate_field_list(name, &fields)?;

        let mut table = Self {
            name: name.to_string(),
            directory: directory.as_ref().to_path_buf(),
            file_name: file_name.to_string(),
            fields: Vec::new(),
            records: Vec::new(),
            store: LineStore::hamming(),
        };

        table
            .store
            .create_if_missing(&table.directory, &table.file_name)?;
        table
            .store
            .open_for_read(&table.directory, &table.file_name)?;
        if table.store.count() == 0 {
            #[cfg(feature = "logging")]
            debug!(
                "initializing empty table '{}' in {}",
                table.name, table.file_name
            );
            table.initialize(fields)?;
        } else {
            table.reload(&fields)?;
        }
        Ok(table)
    }

    /// Table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of fields in the schema
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Number of rows currently held
    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    /// Directory holding the backing file
    pub fn directory_path(&self) -> &Path {
        &self.directory
    }

    /// Name of the backing file
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Full path of the backing file
    pub fn full_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    /// Field names in storage order
    pub fn field_names(&self) -> &[String] {
        &self.fields
    }

    /// Iterate over the rows as cell slices, in storage order
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.records.iter().map(Vec::as_slice)
    }

    /// Value of `field` in the row at `row` index
    pub fn value(&self, row: usize, field: &str) -> Option<&str> {
        let index = self.field_index(field)?;
        self.records.get(row).map(|record| record[index].as_str())
    }

    /// Insert a row, enforcing schema and key uniqueness
    ///
    /// The row's field-name set must equal the schema exactly. When the
    /// row declares key fields and an existing row matches every key
    /// value, nothing is inserted and `Ok(false)` is returned; otherwise
    /// the cells are mapped into storage order, appended, and `Ok(true)`
    /// is returned. The row stays in memory until [`Table::save`].
    pub fn add_row(&mut self, row: &Row) -> Result<bool, StoreError> {
        if row.is_empty() {
            return Err(StoreError::EmptyRow {
                table: self.name.clone(),
            });
        }

        let mut missing: Vec<&str> = self
            .fields
            .iter()
            .filter(|field| row.get(field.as_str()).is_none())
            .map(|field| field.as_str())
            .collect();
        let mut extra: Vec<&str> = row
            .field_names()
            .into_iter()
            .filter(|name| !self.fields.iter().any(|field| field.as_str() == *name))
            .collect();
        if !missing.is_empty() || !extra.is_empty() {
            missing.sort_unstable();
            extra.sort_unstable();
            let mut parts = Vec::new();
            if !missing.is_empty() {
                parts.push(format!("missing {missing:?}"));
            }
            if !extra.is_empty() {
                parts.push(format!("extra {extra:?}"));
            }
            return Err(StoreError::RowFieldMismatch {
                table: self.name.clone(),
                detail: parts.join(", "),
            });
        }

        for field in &self.fields {
            let value = row.get(field.as_str()).unwrap_or_default();
            if let Some(reason) = forbidden_cell_character(value) {
                return Err(StoreError::InvalidCellValue {
                    table: self.name.clone(),
                    field: field.clone(),
                    detail: reason,
                });
            }
        }

        if row.key_count() > 0 && self.find_by_keys(row).is_some() {
            #[cfg(feature = "logging")]
            warn!(
                "table '{}': a row with this key already exists, skipping insert",
                self.name
            );
            return Ok(false);
        }

        let record: Vec<String> = self
            .fields
            .iter()
            .map(|field| row.get(field.as_str()).unwrap_or_default().to_string())
            .collect();
        self.records.push(record);
        Ok(true)
    }

    /// Rewrite the backing file with the full grammar
    ///
    /// Any open handle is closed first; the store then opens for write,
    /// receives every line, and closes, which flushes to disk.
    pub fn save(&mut self) -> Result<(), StoreError> {
        self.store.close()?;
        self.store
            .open_for_write(&self.directory, &self.file_name)?;
        self.write_grammar()?;
        self.store.close()?;

        #[cfg(feature = "logging")]
        debug!(
            "saved table '{}': {} fields, {} rows",
            self.name,
            self.fields.len(),
            self.records.len()
        );

        Ok(())
    }

    /// Re-read the table from disk, replacing the in-memory rows
    ///
    /// The stored schema must still match this table's field set.
    pub fn load(&mut self) -> Result<(), StoreError> {
        let expected = self.fields.clone();
        self.reload(&expected)
    }

    /// Adopt the schema of a brand-new table and write it out
    fn initialize(&mut self, fields: Vec<String>) -> Result<(), StoreError> {
        self.fields = fields;
        self.records.clear();
        self.save()
    }

    /// Parse the backing file and adopt its contents when the stored
    /// field set equals `expected`
    fn reload(&mut self, expected: &[String]) -> Result<(), StoreError> {
        let parsed = self.parse_file()?;
        self.check_schema(&parsed.fields, expected)?;

        #[cfg(feature = "logging")]
        debug!(
            "loaded table '{}': {} fields, {} rows",
            self.name,
            parsed.fields.len(),
            parsed.records.len()
        );

        self.fields = parsed.fields;
        self.records = parsed.records;
        Ok(())
    }

    /// Bring the store to OPEN/READ, pull every decoded line, and parse
    fn parse_file(&mut self) -> Result<ParsedTable, StoreError> {
        if self.store.state() == FileState::Open && self.store.mode() == FileMode::Write {
            self.store.close()?;
        }
        if self.store.state() != FileState::Open {
            self.store.open_for_read(&self.directory, &self.file_name)?;
        }
        if self.store.state() != FileState::Open || self.store.mode() != FileMode::Read {
            return Err(StoreError::UnexpectedState {
                expected: "OPEN/READ",
                actual: format!("{}/{}", self.store.state(), self.store.mode()),
            });
        }
        self.store.reset()?;

        let mut lines = Vec::with_capacity(self.store.count());
        while let Some(line) = self.store.read_line() {
            lines.push(line.to_string());
        }
        self.store.close()?;

        parse_table(&self.name, &self.directory, &self.file_name, &lines)
    }

    /// Emit the full grammar into the write-opened store
    fn write_grammar(&mut self) -> Result<(), StoreError> {
        self.store.write_line(format!(
            "{}{}{}",
            TABLE_NAME_HEADER, FIELD_DELIMITER, self.name
        ))?;

        self.store.write_line(format!(
            "{}{}{}",
            BEGIN_FIELD_LIST,
            FIELD_DELIMITER,
            self.fields.len()
        ))?;
        for field in &self.fields {
            self.store.write_line(format!("{ROW_PREFIX}{field}"))?;
        }
        self.store.write_line(END_FIELD_LIST)?;

        self.store.write_line(format!(
            "{}{}{}",
            BEGIN_DATA_LIST,
            FIELD_DELIMITER,
            self.records.len()
        ))?;
        for record in &self.records {
            let mut line = String::from(ROW_PREFIX);
            for (index, cell) in record.iter().enumerate() {
                if index > 0 {
                    line.push(FIELD_DELIMITER);
                }
                line.push_str(cell);
            }
            self.store.write_line(line)?;
        }
        self.store.write_line(END_DATA_LIST)?;
        Ok(())
    }

    /// Compare a stored field set against the expected one, both directions
    fn check_schema(&self, stored: &[String], expected: &[String]) -> Result<(), StoreError> {
        let mut missing: Vec<&str> = expected
            .iter()
            .filter(|field| !stored.contains(field))
            .map(|field| field.as_str())
            .collect();
        let mut extra: Vec<&str> = stored
            .iter()
            .filter(|field| !expected.contains(field))
            .map(|field| field.as_str())
            .collect();
        if missing.is_empty() && extra.is_empty() {
            return Ok(());
        }
        missing.sort_unstable();
        extra.sort_unstable();
        let mut parts = Vec::new();
        if !missing.is_empty() {
            parts.push(format!("missing {missing:?}"));
        }
        if !extra.is_empty() {
            parts.push(format!("unexpected {extra:?}"));
        }
        Err(StoreError::SchemaMismatch {
            table: self.name.clone(),
            directory: self.directory.display().to_string(),
            file_name: self.file_name.clone(),
            detail: parts.join(", "),
        })
    }

    /// Index of a row whose every key-field value matches `row`, if any
    fn find_by_keys(&self, row: &Row) -> Option<usize> {
        self.records.iter().position(|record| {
            row.key_fields().iter().all(|key| {
                match (self.field_index(key), row.get(key)) {
                    (Some(index), Some(value)) => record[index] == value,
                    _ => false,
                }
            })
        })
    }

    fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field == name)
    }
}

/// Strict positional parse of a table file's decoded lines
fn parse_table(
    table: &str,
    directory: &Path,
    file_name: &str,
    lines: &[String],
) -> Result<ParsedTable, StoreError> {
    let malformed = |detail: String| StoreError::MalformedRecord {
        table: table.to_string(),
        directory: directory.display().to_string(),
        file_name: file_name.to_string(),
        detail,
    };
    let mut cursor = lines.iter();

    // ##TNH<TAB><table-name>
    let line = cursor
        .next()
        .ok_or_else(|| malformed("file ends before the table name header".to_string()))?;
    let stored_name = split_marker(line, TABLE_NAME_HEADER)
        .ok_or_else(|| malformed(format!("expected table name header, found {line:?}")))?;
    if stored_name != table {
        return Err(StoreError::SchemaMismatch {
            table: table.to_string(),
            directory: directory.display().to_string(),
            file_name: file_name.to_string(),
            detail: format!("file stores table {stored_name:?}, expected {table:?}"),
        });
    }

    // ##BFL<TAB><field-count>
    let line = cursor
        .next()
        .ok_or_else(|| malformed("file ends before the field list".to_string()))?;
    let count_param = split_marker(line, BEGIN_FIELD_LIST)
        .ok_or_else(|| malformed(format!("expected begin-field-list marker, found {line:?}")))?;
    let field_count: usize = parse_count(count_param).ok_or_else(|| {
        malformed(format!(
            "field count {count_param:?} is not a plain decimal number"
        ))
    })?;
    if field_count == 0 || field_count > MAX_FIELDS {
        return Err(malformed(format!(
            "field count {field_count} is outside 1..={MAX_FIELDS}"
        )));
    }

    let mut fields: Vec<String> = Vec::with_capacity(field_count);
    for _ in 0..field_count {
        let line = cursor.next().ok_or_else(|| {
            malformed(format!(
                "file ends inside the field list after {} of {field_count} names",
                fields.len()
            ))
        })?;
        if line.starts_with(MARKER_PREFIX) {
            return Err(malformed(format!(
                "control marker {line:?} inside the field list after {} of {field_count} names",
                fields.len()
            )));
        }
        let name = line.strip_prefix(ROW_PREFIX).ok_or_else(|| {
            malformed(format!(
                "field name line without the {ROW_PREFIX:?} prefix: {line:?}"
            ))
        })?;
        if name.is_empty() {
            return Err(malformed("empty field name in the field list".to_string()));
        }
        if name.contains(FIELD_DELIMITER) {
            return Err(malformed(format!(
                "field name {name:?} contains the delimiter"
            )));
        }
        if fields.iter().any(|field| field == name) {
            return Err(malformed(format!(
                "duplicate field name {name:?} in the field list"
            )));
        }
        fields.push(name.to_string());
    }

    // ##EFL
    let line = cursor
        .next()
        .ok_or_else(|| malformed("file ends before the end-field-list marker".to_string()))?;
    if line.as_str() != END_FIELD_LIST {
        return Err(malformed(format!(
            "expected end-field-list marker, found {line:?}"
        )));
    }

    // ##BDL<TAB><row-count>
    let line = cursor
        .next()
        .ok_or_else(|| malformed("file ends before the data list".to_string()))?;
    let count_param = split_marker(line, BEGIN_DATA_LIST)
        .ok_or_else(|| malformed(format!("expected begin-data-list marker, found {line:?}")))?;
    let row_count: usize = parse_count(count_param).ok_or_else(|| {
        malformed(format!(
            "row count {count_param:?} is not a plain decimal number"
        ))
    })?;

    // The declared count comes straight from the file; cap the
    // pre-allocation at the lines actually present.
    let mut records: Vec<Vec<String>> = Vec::with_capacity(row_count.min(lines.len()));
    for _ in 0..row_count {
        let line = cursor.next().ok_or_else(|| {
            malformed(format!(
                "file ends inside the data list after {} of {row_count} rows",
                records.len()
            ))
        })?;
        if line.starts_with(MARKER_PREFIX) {
            return Err(malformed(format!(
                "control marker {line:?} inside the data list after {} of {row_count} rows",
                records.len()
            )));
        }
        let payload = line.strip_prefix(ROW_PREFIX).ok_or_else(|| {
            malformed(format!(
                "data line without the {ROW_PREFIX:?} prefix: {line:?}"
            ))
        })?;
        let cells: Vec<String> = payload
            .split(FIELD_DELIMITER)
            .map(str::to_string)
            .collect();
        if cells.len() != fields.len() {
            return Err(malformed(format!(
                "row {} has {} cells, expected {}: {line:?}",
                records.len() + 1,
                cells.len(),
                fields.len()
            )));
        }
        records.push(cells);
    }

    // ##EDL, then nothing
    let line = cursor
        .next()
        .ok_or_else(|| malformed("file ends before the end-data-list marker".to_string()))?;
    if line.as_str() != END_DATA_LIST {
        return Err(malformed(format!(
            "expected end-data-list marker, found {line:?}"
        )));
    }
    if let Some(line) = cursor.next() {
        return Err(malformed(format!(
            "trailing content after the end-data-list marker: {line:?}"
        )));
    }

    Ok(ParsedTable { fields, records })
}

/// Split `"<marker><TAB><param>"` into its parameter
fn split_marker<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    line.strip_prefix(marker)?.strip_prefix(FIELD_DELIMITER)
}

/// Parse a marker's count parameter as a bare run of decimal digits
///
/// Anything other than ASCII digits fails the parse, as does a value too
/// large for `usize`.
fn parse_count(param: &str) -> Option<usize> {
    if !param.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    param.parse().ok()
}

fn forbidden_cell_character(value: &str) -> Option<&'static str> {
    if value.contains(FIELD_DELIMITER) {
        Some("value contains the field delimiter")
    } else if value.contains('\n') || value.contains('\r') {
        Some("value contains a line break")
    } else {
        None
    }
}

fn validate_table_name(name: &str) -> Result<(), StoreError> {
    if name.is_empty() {
        return Err(StoreError::InvalidTableName {
            name: name.to_string(),
            detail: "name is empty",
        });
    }
    if name.contains(FIELD_DELIMITER) || name.contains('\n') || name.contains('\r') {
        return Err(StoreError::InvalidTableName {
            name: name.to_string(),
            detail: "name contains a delimiter or line break",
        });
    }
    Ok(())
}

fn validate_field_list(table: &str, fields: &[String]) -> Result<(), StoreError> {
    if fields.is_empty() || fields.len() > MAX_FIELDS {
        return Err(StoreError::InvalidFieldList {
            table: table.to_string(),
            detail: format!("{} fields given, expected 1..={MAX_FIELDS}", fields.len()),
        });
    }
    for (index, field) in fields.iter().enumerate() {
        if field.is_empty() {
            return Err(StoreError::InvalidFieldList {
                table: table.to_string(),
                detail: format!("field {} is empty", index + 1),
            });
        }
        if field.contains(FIELD_DELIMITER) || field.contains('\n') || field.contains('\r') {
            return Err(StoreError::InvalidFieldList {
                table: table.to_string(),
                detail: format!("field {field:?} contains a delimiter or line break"),
            });
        }
        if fields[..index].contains(field) {
            return Err(StoreError::InvalidFieldList {
                table: table.to_string(),
                detail: format!("field {field:?} appears more than once"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn owned(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    fn parse(lines: &[&str]) -> Result<ParsedTable, StoreError> {
        parse_table("People", Path::new("/tmp"), "people.dat", &owned(lines))
    }

    #[test]
    fn test_parse_minimal_file() {
        let parsed = parse(&[
            "##TNH\tPeople",
            "##BFL\t2",
            "->Name",
            "->Age",
            "##EFL",
            "##BDL\t1",
            "->Alice\t30",
            "##EDL",
        ])
        .unwrap();
        assert_eq!(parsed.fields, ["Name", "Age"]);
        assert_eq!(parsed.records, [["Alice", "30"]]);
    }

    #[test]
    fn test_parse_zero_rows() {
        let parsed = parse(&[
            "##TNH\tPeople",
            "##BFL\t1",
            "->Id",
            "##EFL",
            "##BDL\t0",
            "##EDL",
        ])
        .unwrap();
        assert_eq!(parsed.fields, ["Id"]);
        assert!(parsed.records.is_empty());
    }

    #[test]
    fn test_parse_empty_cells_survive() {
        let parsed = parse(&[
            "##TNH\tPeople",
            "##BFL\t3",
            "->A",
            "->B",
            "->C",
            "##EFL",
            "##BDL\t1",
            "->\t\t",
            "##EDL",
        ])
        .unwrap();
        assert_eq!(parsed.records, [["", "", ""]]);
    }

    #[test]
    fn test_parse_rejects_wrong_first_marker() {
        let result = parse(&["##BFL\t1", "->Id", "##EFL", "##BDL\t0", "##EDL"]);
        assert!(matches!(result, Err(StoreError::MalformedRecord { .. })));
    }

    #[test]
    fn test_parse_rejects_wrong_table_name() {
        let result = parse(&[
            "##TNH\tAnimals",
            "##BFL\t1",
            "->Id",
            "##EFL",
            "##BDL\t0",
            "##EDL",
        ]);
        assert!(matches!(result, Err(StoreError::SchemaMismatch { .. })));
    }

    #[test]
    fn test_parse_rejects_bad_field_count() {
        for count in ["0", "101", "two", ""] {
            let result = parse(&[
                "##TNH\tPeople",
                &format!("##BFL\t{count}"),
                "##EFL",
                "##BDL\t0",
                "##EDL",
            ]);
            assert!(
                matches!(result, Err(StoreError::MalformedRecord { .. })),
                "count {count:?} was accepted"
            );
        }
    }

    #[test]
    fn test_parse_rejects_marker_inside_field_list() {
        let result = parse(&[
            "##TNH\tPeople",
            "##BFL\t2",
            "->Name",
            "##EFL",
            "##BDL\t0",
            "##EDL",
        ]);
        assert!(matches!(result, Err(StoreError::MalformedRecord { .. })));
    }

    #[test]
    fn test_parse_rejects_unprefixed_field_name() {
        let result = parse(&[
            "##TNH\tPeople",
            "##BFL\t1",
            "Name",
            "##EFL",
            "##BDL\t0",
            "##EDL",
        ]);
        assert!(matches!(result, Err(StoreError::MalformedRecord { .. })));
    }

    #[test]
    fn test_parse_rejects_duplicate_field_name() {
        let result = parse(&[
            "##TNH\tPeople",
            "##BFL\t2",
            "->Name",
            "->Name",
            "##EFL",
            "##BDL\t0",
            "##EDL",
        ]);
        assert!(matches!(result, Err(StoreError::MalformedRecord { .. })));
    }

    #[test]
    fn test_parse_rejects_wrong_cell_count() {
        let result = parse(&[
            "##TNH\tPeople",
            "##BFL\t2",
            "->Name",
            "->Age",
            "##EFL",
            "##BDL\t1",
            "->Alice",
            "##EDL",
        ]);
        assert!(matches!(result, Err(StoreError::MalformedRecord { .. })));
    }

    #[test]
    fn test_parse_rejects_truncated_file() {
        let result = parse(&["##TNH\tPeople", "##BFL\t1", "->Id", "##EFL", "##BDL\t2"]);
        assert!(matches!(result, Err(StoreError::MalformedRecord { .. })));
    }

    #[test]
    fn test_parse_rejects_overstated_row_count() {
        // A declared count the file cannot possibly hold must come back as
        // a malformed record, not reserve row storage for it
        let result = parse(&[
            "##TNH\tPeople",
            "##BFL\t1",
            "->Name",
            "##EFL",
            "##BDL\t18446744073709551615",
        ]);
        assert!(matches!(result, Err(StoreError::MalformedRecord { .. })));
    }

    #[test]
    fn test_parse_rejects_decorated_counts() {
        // The writer emits bare digit runs; signed and padded forms must
        // not slip through on the way back in
        for count in ["+1", " 1", "1 ", "1\t"] {
            let result = parse(&[
                "##TNH\tPeople",
                &format!("##BFL\t{count}"),
                "->Id",
                "##EFL",
                "##BDL\t0",
                "##EDL",
            ]);
            assert!(
                matches!(result, Err(StoreError::MalformedRecord { .. })),
                "field count {count:?} was accepted"
            );

            let result = parse(&[
                "##TNH\tPeople",
                "##BFL\t1",
                "->Id",
                "##EFL",
                &format!("##BDL\t{count}"),
                "->alice",
                "##EDL",
            ]);
            assert!(
                matches!(result, Err(StoreError::MalformedRecord { .. })),
                "row count {count:?} was accepted"
            );
        }
    }

    #[test]
    fn test_parse_rejects_trailing_content() {
        let result = parse(&[
            "##TNH\tPeople",
            "##BFL\t1",
            "->Id",
            "##EFL",
            "##BDL\t0",
            "##EDL",
            "->stray",
        ]);
        assert!(matches!(result, Err(StoreError::MalformedRecord { .. })));
    }

    #[test]
    fn test_new_table_initializes_file() {
        let dir = tempdir().unwrap();
        let table = Table::open("People", dir.path(), "people.dat", &["Name", "Age"]).unwrap();
        assert_eq!(table.field_count(), 2);
        assert_eq!(table.row_count(), 0);
        assert!(table.full_path().is_file());

        // A second open against the freshly written file must agree
        let again = Table::open("People", dir.path(), "people.dat", &["Name", "Age"]).unwrap();
        assert_eq!(again.field_names(), ["Name", "Age"]);
        assert_eq!(again.row_count(), 0);
    }

    #[test]
    fn test_open_rejects_invalid_identity() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            Table::open("", dir.path(), "t.dat", &["A"]),
            Err(StoreError::InvalidTableName { .. })
        ));
        assert!(matches!(
            Table::open("T\tB", dir.path(), "t.dat", &["A"]),
            Err(StoreError::InvalidTableName { .. })
        ));
        let none: [&str; 0] = [];
        assert!(matches!(
            Table::open("T", dir.path(), "t.dat", &none),
            Err(StoreError::InvalidFieldList { .. })
        ));
        assert!(matches!(
            Table::open("T", dir.path(), "t.dat", &["A", "A"]),
            Err(StoreError::InvalidFieldList { .. })
        ));
        assert!(matches!(
            Table::open("T", dir.path(), "t.dat", &["A", "B\tC"]),
            Err(StoreError::InvalidFieldList { .. })
        ));
    }

    #[test]
    fn test_add_row_maps_fields_positionally() {
        let dir = tempdir().unwrap();
        let mut table = Table::open("People", dir.path(), "people.dat", &["Name", "Age"]).unwrap();

        let mut row = Row::new();
        // Insertion order deliberately reversed from the schema order
        row.add_field("Age", "30", false).unwrap();
        row.add_field("Name", "Alice", false).unwrap();
        assert!(table.add_row(&row).unwrap());

        assert_eq!(table.row_count(), 1);
        assert_eq!(table.value(0, "Name"), Some("Alice"));
        assert_eq!(table.value(0, "Age"), Some("30"));
    }

    #[test]
    fn test_add_row_rejects_schema_drift() {
        let dir = tempdir().unwrap();
        let mut table = Table::open("People", dir.path(), "people.dat", &["Name", "Age"]).unwrap();

        let empty = Row::new();
        assert!(matches!(
            table.add_row(&empty),
            Err(StoreError::EmptyRow { .. })
        ));

        let mut short = Row::new();
        short.add_field("Name", "Bob", false).unwrap();
        assert!(matches!(
            table.add_row(&short),
            Err(StoreError::RowFieldMismatch { .. })
        ));

        let mut drifted = Row::new();
        drifted.add_field("Name", "Bob", false).unwrap();
        drifted.add_field("Height", "180", false).unwrap();
        assert!(matches!(
            table.add_row(&drifted),
            Err(StoreError::RowFieldMismatch { .. })
        ));
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_add_row_rejects_delimiter_in_cell() {
        let dir = tempdir().unwrap();
        let mut table = Table::open("People", dir.path(), "people.dat", &["Name", "Age"]).unwrap();

        let mut row = Row::new();
        row.add_field("Name", "Ali\tce", false).unwrap();
        row.add_field("Age", "30", false).unwrap();
        assert!(matches!(
            table.add_row(&row),
            Err(StoreError::InvalidCellValue { .. })
        ));

        let mut row = Row::new();
        row.add_field("Name", "Ali\nce", false).unwrap();
        row.add_field("Age", "30", false).unwrap();
        assert!(matches!(
            table.add_row(&row),
            Err(StoreError::InvalidCellValue { .. })
        ));
    }

    #[test]
    fn test_duplicate_key_skips_insert() {
        let dir = tempdir().unwrap();
        let mut table = Table::open("People", dir.path(), "people.dat", &["Name", "Age"]).unwrap();

        let mut first = Row::new();
        first.add_field("Name", "Alice", true).unwrap();
        first.add_field("Age", "30", false).unwrap();
        assert!(table.add_row(&first).unwrap());

        let mut same_key = Row::new();
        same_key.add_field("Name", "Alice", true).unwrap();
        same_key.add_field("Age", "31", false).unwrap();
        assert!(!table.add_row(&same_key).unwrap());
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.value(0, "Age"), Some("30"));

        // Without key fields the same values insert freely
        let mut keyless = Row::new();
        keyless.add_field("Name", "Alice", false).unwrap();
        keyless.add_field("Age", "30", false).unwrap();
        assert!(table.add_row(&keyless).unwrap());
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_schema_mismatch_on_reopen() {
        let dir = tempdir().unwrap();
        Table::open("People", dir.path(), "people.dat", &["a", "c"]).unwrap();
        let result = Table::open("People", dir.path(), "people.dat", &["a", "b"]);
        assert!(matches!(result, Err(StoreError::SchemaMismatch { .. })));
    }

    #[test]
    fn test_stored_field_order_wins() {
        let dir = tempdir().unwrap();
        {
            let mut table =
                Table::open("People", dir.path(), "people.dat", &["Name", "Age"]).unwrap();
            let mut row = Row::new();
            row.add_field("Name", "Alice", false).unwrap();
            row.add_field("Age", "30", false).unwrap();
            table.add_row(&row).unwrap();
            table.save().unwrap();
        }

        // Same field set, different order: the file's order is adopted
        let table = Table::open("People", dir.path(), "people.dat", &["Age", "Name"]).unwrap();
        assert_eq!(table.field_names(), ["Name", "Age"]);
        assert_eq!(table.value(0, "Name"), Some("Alice"));
    }
}
