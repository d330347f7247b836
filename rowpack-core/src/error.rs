//! Error types for Rowpack operations

/// Errors that can occur during codec, line-store, and table operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// Character cannot be Hamming-encoded (wider than one byte)
    #[error("Character {ch:?} (U+{code:04X}) is outside the 8-bit encodable range")]
    InvalidCharacter {
        /// The offending character.
        ch: char,
        /// Its Unicode scalar value.
        code: u32,
    },

    /// Code word failed parity checks beyond single-bit repair
    #[error("Unrecoverable code word {code:#06x}: {detail}")]
    CorruptedData {
        /// The code word as read.
        code: u32,
        /// Which parity check combination ruled out correction.
        detail: &'static str,
    },

    /// A stored line could not be decoded back to plain text
    #[error("Corrupted line {line} in {directory}/{file_name}: {detail}")]
    CorruptedFile {
        /// Directory holding the file.
        directory: String,
        /// Name of the file.
        file_name: String,
        /// One-based line number of the undecodable line.
        line: usize,
        /// Underlying decode failure.
        detail: String,
    },

    /// Operating system I/O failure, or an encode failure while flushing
    #[error("I/O error on {directory}/{file_name}: {detail}")]
    Io {
        /// Directory holding the file.
        directory: String,
        /// Name of the file.
        file_name: String,
        /// Underlying failure description.
        detail: String,
    },

    /// Open was requested while a file is already open
    #[error("File {directory}/{file_name} is already open")]
    AlreadyOpen {
        /// Directory of the currently open file.
        directory: String,
        /// Name of the currently open file.
        file_name: String,
    },

    /// The named file does not exist
    #[error("File not found: {path}")]
    FileMissing {
        /// Full path that was probed.
        path: String,
    },

    /// Create was requested but the file already exists
    #[error("File already exists: {path}")]
    FileExists {
        /// Full path that was probed.
        path: String,
    },

    /// Operation is not valid for the store's current state or mode
    #[error("Expected file state {expected}, found {actual}")]
    UnexpectedState {
        /// The state/mode the operation requires.
        expected: &'static str,
        /// The state/mode actually observed.
        actual: String,
    },

    /// A structural rule of the table file grammar was violated
    #[error("Malformed record in table '{table}' ({directory}/{file_name}): {detail}")]
    MalformedRecord {
        /// Name of the table being loaded.
        table: String,
        /// Directory holding the file.
        directory: String,
        /// Name of the file.
        file_name: String,
        /// Which rule failed and the literal line found.
        detail: String,
    },

    /// Stored table identity or field list differs from the expected schema
    #[error("Schema mismatch in table '{table}' ({directory}/{file_name}): {detail}")]
    SchemaMismatch {
        /// Name of the table being loaded.
        table: String,
        /// Directory holding the file.
        directory: String,
        /// Name of the file.
        file_name: String,
        /// Expected-versus-found description.
        detail: String,
    },

    /// Inserted row's field names do not match the table schema
    #[error("Row does not match schema of table '{table}': {detail}")]
    RowFieldMismatch {
        /// Name of the target table.
        table: String,
        /// The missing and/or extra field names.
        detail: String,
    },

    /// Inserted row carries no fields at all
    #[error("Cannot insert an empty row into table '{table}'")]
    EmptyRow {
        /// Name of the target table.
        table: String,
    },

    /// Cell value cannot survive the line-oriented grammar
    #[error("Invalid value for field '{field}' in table '{table}': {detail}")]
    InvalidCellValue {
        /// Name of the target table.
        table: String,
        /// Field the value was destined for.
        field: String,
        /// Which forbidden character class was found.
        detail: &'static str,
    },

    /// Expected field list is unusable as a schema
    #[error("Invalid field list for table '{table}': {detail}")]
    InvalidFieldList {
        /// Name of the table being constructed.
        table: String,
        /// Which rule the list violates.
        detail: String,
    },

    /// Table name is unusable in the file grammar
    #[error("Invalid table name {name:?}: {detail}")]
    InvalidTableName {
        /// The rejected name.
        name: String,
        /// Which rule the name violates.
        detail: &'static str,
    },

    /// Same field added twice to one row
    #[error("Field '{field}' was already added to this row")]
    DuplicateField {
        /// The repeated field name.
        field: String,
    },
}
