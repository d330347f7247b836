//! Line-oriented file store
//!
//! [`LineStore`] buffers an ordered list of text lines in memory, backed by
//! a file on disk. A [`LineTransform`] chosen at construction runs over
//! every line crossing the disk boundary: [`LineTransform::Identity`]
//! stores lines verbatim, [`LineTransform::Hamming`] stores each line
//! Hamming-encoded so single-bit damage on disk heals on the next read.
//!
//! The store moves through [`FileState::Initial`] → [`FileState::Open`] →
//! [`FileState::Closed`], with an orthogonal [`FileMode`] tag. Reads load
//! and decode the whole file up front; writes buffer lines until `save`
//! or `close` flushes them.

use crate::decoder::decode_line;
use crate::encoder::encode_line;
use crate::error::StoreError;
use memchr::memchr_iter;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// Lifecycle state of the backing file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    /// The store has never been opened
    Initial,
    /// The store is open for reading or writing
    Open,
    /// The store was open once and has been closed
    Closed,
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileState::Initial => "INITIAL",
            FileState::Open => "OPEN",
            FileState::Closed => "CLOSED",
        };
        f.write_str(name)
    }
}

/// Access mode of the backing file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    /// No mode yet; the store is not open
    Initial,
    /// Lines are read from the file
    Read,
    /// Lines are buffered and flushed to the file
    Write,
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileMode::Initial => "INITIAL",
            FileMode::Read => "READ",
            FileMode::Write => "WRITE",
        };
        f.write_str(name)
    }
}

/// Per-line transform applied at the disk boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineTransform {
    /// Lines are stored exactly as written
    #[default]
    Identity,
    /// Lines are stored Hamming-encoded, one code word per character
    Hamming,
}

impl LineTransform {
    fn encode(self, line: &str) -> Result<String, StoreError> {
        match self {
            LineTransform::Identity => Ok(line.to_string()),
            LineTransform::Hamming => encode_line(line),
        }
    }

    fn decode(self, line: &str) -> Result<String, StoreError> {
        match self {
            LineTransform::Identity => Ok(line.to_string()),
            LineTransform::Hamming => decode_line(line),
        }
    }
}

/// An ordered, file-backed buffer of text lines
#[derive(Debug)]
pub struct LineStore {
    transform: LineTransform,
    lines: Vec<String>,
    /// Index of the next line to read or write; `None` while the buffer is
    /// empty or the store is not open
    position: Option<usize>,
    directory: Option<PathBuf>,
    file_name: Option<String>,
    state: FileState,
    mode: FileMode,
}

impl LineStore {
    /// Create a store that applies the given transform at the disk boundary
    pub fn new(transform: LineTransform) -> Self {
        Self {
            transform,
            lines: Vec::new(),
            position: None,
            directory: None,
            file_name: None,
            state: FileState::Initial,
            mode: FileMode::Initial,
        }
    }

    /// Create a store for plain text files
    pub fn plain() -> Self {
        Self::new(LineTransform::Identity)
    }

    /// Create a store for Hamming-encoded files
    pub fn hamming() -> Self {
        Self::new(LineTransform::Hamming)
    }

    /// The transform this store applies at the disk boundary
    pub fn transform(&self) -> LineTransform {
        self.transform
    }

    /// Current lifecycle state
    pub fn state(&self) -> FileState {
        self.state
    }

    /// Current access mode
    pub fn mode(&self) -> FileMode {
        self.mode
    }

    /// Directory of the open file, if any
    pub fn directory_path(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Name of the open file, if any
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Full path of the open file, if any
    pub fn full_path(&self) -> Option<PathBuf> {
        match (&self.directory, &self.file_name) {
            (Some(directory), Some(file_name)) => Some(directory.join(file_name)),
            _ => None,
        }
    }

    /// Number of buffered lines
    pub fn count(&self) -> usize {
        self.lines.len()
    }

    /// Zero-based index of the next line to read or write
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// True when there is no line left to read
    pub fn at_eof(&self) -> bool {
        match self.position {
            Some(position) => position >= self.lines.len(),
            None => true,
        }
    }

    /// Open an existing file and decode its contents into the buffer
    ///
    /// The whole file is read and decoded before any state changes; a
    /// decode failure surfaces as [`StoreError::CorruptedFile`] naming the
    /// offending line, and the store stays exactly as it was.
    pub fn open_for_read(
        &mut self,
        directory: impl AsRef<Path>,
        file_name: &str,
    ) -> Result<(), StoreError> {
        self.ensure_not_open()?;
        let directory = directory.as_ref().to_path_buf();
        let path = directory.join(file_name);
        if !path.is_file() {
            return Err(StoreError::FileMissing {
                path: path.display().to_string(),
            });
        }
        let raw = fs::read(&path).map_err(|e| io_error(&directory, file_name, &e))?;

        // Stage into a local buffer; state commits only once every line
        // has decoded.
        let mut lines = Vec::new();
        for (index, raw_line) in split_lines(&raw).into_iter().enumerate() {
            let stored = std::str::from_utf8(raw_line).map_err(|_| StoreError::CorruptedFile {
                directory: directory.display().to_string(),
                file_name: file_name.to_string(),
                line: index + 1,
                detail: "stored line is not valid UTF-8".to_string(),
            })?;
            let decoded = self.transform.decode(stored).map_err(|source| {
                #[cfg(feature = "logging")]
                warn!(
                    "undecodable line {} in {}: {}",
                    index + 1,
                    path.display(),
                    source
                );
                StoreError::CorruptedFile {
                    directory: directory.display().to_string(),
                    file_name: file_name.to_string(),
                    line: index + 1,
                    detail: source.to_string(),
                }
            })?;
            lines.push(decoded);
        }

        #[cfg(feature = "logging")]
        debug!("opened {} for read: {} lines", path.display(), lines.len());

        self.position = if lines.is_empty() { None } else { Some(0) };
        self.lines = lines;
        self.directory = Some(directory);
        self.file_name = Some(file_name.to_string());
        self.state = FileState::Open;
        self.mode = FileMode::Read;
        Ok(())
    }

    /// Open an existing file for writing
    ///
    /// The buffer starts empty; whatever the file held is replaced on the
    /// next flush. The file must already exist.
    pub fn open_for_write(
        &mut self,
        directory: impl AsRef<Path>,
        file_name: &str,
    ) -> Result<(), StoreError> {
        self.ensure_not_open()?;
        let directory = directory.as_ref().to_path_buf();
        let path = directory.join(file_name);
        if !path.is_file() {
            return Err(StoreError::FileMissing {
                path: path.display().to_string(),
            });
        }

        #[cfg(feature = "logging")]
        debug!("opened {} for write", path.display());

        self.lines.clear();
        self.position = Some(0);
        self.directory = Some(directory);
        self.file_name = Some(file_name.to_string());
        self.state = FileState::Open;
        self.mode = FileMode::Write;
        Ok(())
    }

    /// Create a new file and open it for writing
    ///
    /// Fails with [`StoreError::FileExists`] when the file is already
    /// there.
    pub fn create_for_write(
        &mut self,
        directory: impl AsRef<Path>,
        file_name: &str,
    ) -> Result<(), StoreError> {
        self.ensure_not_open()?;
        let directory = directory.as_ref().to_path_buf();
        let path = directory.join(file_name);
        if path.exists() {
            return Err(StoreError::FileExists {
                path: path.display().to_string(),
            });
        }
        fs::File::create(&path).map_err(|e| io_error(&directory, file_name, &e))?;

        #[cfg(feature = "logging")]
        debug!("created {} for write", path.display());

        self.lines.clear();
        self.position = Some(0);
        self.directory = Some(directory);
        self.file_name = Some(file_name.to_string());
        self.state = FileState::Open;
        self.mode = FileMode::Write;
        Ok(())
    }

    /// Create the file as an empty file when it does not exist
    ///
    /// Parent directories are created as needed. This is a plain
    /// filesystem operation; the store's own state does not change.
    pub fn create_if_missing(
        &self,
        directory: impl AsRef<Path>,
        file_name: &str,
    ) -> Result<(), StoreError> {
        let directory = directory.as_ref();
        let path = directory.join(file_name);
        if path.exists() {
            return Ok(());
        }
        fs::create_dir_all(directory).map_err(|e| io_error(directory, file_name, &e))?;
        fs::File::create(&path).map_err(|e| io_error(directory, file_name, &e))?;

        #[cfg(feature = "logging")]
        debug!("created empty file {}", path.display());

        Ok(())
    }

    /// Return the next buffered line, advancing the position
    ///
    /// Returns `None` once every line has been read.
    pub fn read_line(&mut self) -> Option<&str> {
        let position = self.position?;
        if position >= self.lines.len() {
            return None;
        }
        self.position = Some(position + 1);
        Some(&self.lines[position])
    }

    /// Append a line to the buffer
    ///
    /// Valid only while the store is open for writing; the line reaches
    /// disk on the next flush.
    pub fn write_line(&mut self, line: impl Into<String>) -> Result<(), StoreError> {
        if self.state != FileState::Open || self.mode != FileMode::Write {
            return Err(self.unexpected_state("OPEN/WRITE"));
        }
        self.lines.push(line.into());
        self.position = Some(self.lines.len());
        Ok(())
    }

    /// Rewind to the first buffered line
    ///
    /// Valid only while the store is open for reading.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        if self.state != FileState::Open || self.mode != FileMode::Read {
            return Err(self.unexpected_state("OPEN/READ"));
        }
        self.position = if self.lines.is_empty() { None } else { Some(0) };
        Ok(())
    }

    /// Encode every buffered line and write the file to disk
    ///
    /// Valid only while the store is open for writing. An encode failure
    /// surfaces as [`StoreError::Io`] carrying the file identity and the
    /// underlying reason.
    pub fn save(&self) -> Result<(), StoreError> {
        if self.state != FileState::Open || self.mode != FileMode::Write {
            return Err(self.unexpected_state("OPEN/WRITE"));
        }
        let (Some(directory), Some(file_name)) = (&self.directory, &self.file_name) else {
            return Err(self.unexpected_state("OPEN/WRITE"));
        };
        let path = directory.join(file_name);

        let mut output = String::new();
        for line in &self.lines {
            let encoded = self.transform.encode(line).map_err(|source| StoreError::Io {
                directory: directory.display().to_string(),
                file_name: file_name.clone(),
                detail: format!("unable to encode line for storage: {source}"),
            })?;
            output.push_str(&encoded);
            output.push('\n');
        }
        fs::write(&path, output.as_bytes()).map_err(|e| io_error(directory, file_name, &e))?;

        #[cfg(feature = "logging")]
        debug!("saved {} lines to {}", self.lines.len(), path.display());

        Ok(())
    }

    /// Close the store
    ///
    /// A store open for writing flushes its buffered lines to disk first,
    /// when there are any. Closing a store that is not open does nothing.
    pub fn close(&mut self) -> Result<(), StoreError> {
        if self.state != FileState::Open {
            return Ok(());
        }
        if self.mode == FileMode::Write && !self.lines.is_empty() {
            self.save()?;
        }
        self.lines.clear();
        self.position = None;
        self.directory = None;
        self.file_name = None;
        self.mode = FileMode::Initial;
        self.state = FileState::Closed;
        Ok(())
    }

    fn ensure_not_open(&self) -> Result<(), StoreError> {
        if self.state == FileState::Open {
            return Err(StoreError::AlreadyOpen {
                directory: self
                    .directory
                    .as_ref()
                    .map(|d| d.display().to_string())
                    .unwrap_or_default(),
                file_name: self.file_name.clone().unwrap_or_default(),
            });
        }
        Ok(())
    }

    fn unexpected_state(&self, expected: &'static str) -> StoreError {
        StoreError::UnexpectedState {
            expected,
            actual: format!("{}/{}", self.state, self.mode),
        }
    }
}

fn io_error(directory: &Path, file_name: &str, source: &std::io::Error) -> StoreError {
    StoreError::Io {
        directory: directory.display().to_string(),
        file_name: file_name.to_string(),
        detail: source.to_string(),
    }
}

/// Split raw file bytes into lines
///
/// Terminators are `\n` or `\r\n`; a final unterminated line is kept, and
/// the empty tail after a trailing terminator is not a line.
fn split_lines(data: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::new();
    let mut start = 0;
    for newline in memchr_iter(b'\n', data) {
        lines.push(strip_carriage_return(&data[start..newline]));
        start = newline + 1;
    }
    if start < data.len() {
        lines.push(strip_carriage_return(&data[start..]));
    }
    lines
}

fn strip_carriage_return(line: &[u8]) -> &[u8] {
    match line.split_last() {
        Some((&b'\r', rest)) => rest,
        _ => line,
    }
}
