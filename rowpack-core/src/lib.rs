//! # Rowpack Core
//!
//! Bit-flip-tolerant line and table storage over a Hamming(12,8) SEC-DED code.
//!
//! Every stored character is an 8-bit Latin-1 value widened into a 12-bit
//! code word carrying five parity bits. On read, a single flipped bit per
//! character is corrected transparently; a detected double flip aborts the
//! load with a hard error instead of handing back silently wrong data.
//!
//! ## Modules
//!
//! - `constants`: File markers, field limits, and the parity code table
//! - `error`: The `StoreError` type shared by every operation
//! - `encoder`: Character and line widening into code words
//! - `decoder`: Code word narrowing with single-bit correction
//! - `store`: `LineStore`, the stateful line-oriented file handle
//! - `row`: `Row`, a field/value set staged for table insertion
//! - `table`: `Table`, the marker-delimited tabular file format

#![warn(missing_docs)]

pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod row;
pub mod store;
pub mod table;

// Re-export commonly used types
pub use error::StoreError;
pub use row::Row;
pub use store::{FileMode, FileState, LineStore, LineTransform};
pub use table::Table;

/// Result type alias for Rowpack operations
pub type Result<T> = std::result::Result<T, StoreError>;
