//! Error types for convert-annotation.
//!
//! Lookup failures (not found, ambiguous) are not errors: they are encoded as
//! sentinel ranges in the result. Everything here aborts either the whole run
//! or the item being processed.

use thiserror::Error;

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Broad category of a [`ConvertError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad block table or unknown version. Fatal at startup.
    Configuration,
    /// Malformed query string, block-table row or query list.
    Parse,
    /// A coordinate outside the interval it was looked up in.
    OutOfRange,
    /// A query given in zero or several forms.
    InvalidQuery,
    /// A translated offset outside the target block. Signals corrupt block data.
    Translation,
    /// Underlying I/O failure.
    Io,
}

/// Errors that can occur while loading tables or converting coordinates.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The block table lacks one or more required columns.
    #[error("Block table is missing required columns: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    /// A block spans a different number of bases in each version.
    ///
    /// `index` is the zero-based position of the block in the table, not a
    /// file line number.
    #[error("Block #{index} has unequal lengths: {version_a} spans {len_a} bp, {version_b} spans {len_b} bp")]
    BlockLengthMismatch {
        index: usize,
        version_a: String,
        len_a: i64,
        version_b: String,
        len_b: i64,
    },

    /// A block with a coordinate below 1.
    #[error("Block #{index} is invalid: {range} does not use 1-based coordinates")]
    InvalidBlock { index: usize, range: String },

    /// Both sides of a block table were given the same version identifier.
    #[error("Block table versions must differ, got '{version}' twice")]
    DuplicateVersion { version: String },

    /// A version identifier that the block table does not cover.
    #[error("Unknown version '{version}': table covers '{version_a}' and '{version_b}'")]
    UnknownVersion {
        version: String,
        version_a: String,
        version_b: String,
    },

    /// A pair-only operation was applied to a range set of another size.
    #[error("Expected exactly two versions in the pair, found {count}")]
    NotAPair { count: usize },

    /// A query string not of the form `{sequence}:{start}..{end}`.
    #[error("Invalid query '{input}': {msg}")]
    InvalidQueryString { input: String, msg: String },

    /// A block-table row or query-list line that could not be parsed.
    #[error("Invalid input at line {line}: {msg}")]
    InvalidRow { line: usize, msg: String },

    /// An interval whose start lies after its end.
    #[error("Invalid range {sequence}:{start}..{end}: start is greater than end")]
    InvalidRange {
        sequence: String,
        start: i64,
        end: i64,
    },

    /// The query list declared a different number of items than it holds.
    #[error("Wrong item number: {observed} observed instead of {expected}")]
    ItemCountMismatch { expected: usize, observed: usize },

    /// The query list was expected to declare its item count but did not.
    #[error("Expected item count (line starting with '{prefix}') was not found")]
    MissingItemCount { prefix: String },

    /// A coordinate outside `[start, end]`, or negative.
    #[error("Coordinate {coordinate} is out of range {start}..{end}")]
    OutOfRange { coordinate: i64, start: i64, end: i64 },

    /// A query that was supplied in zero or more than one form.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A computed offset does not fit the target block.
    #[error("Offset {offset} does not fit target block {target} of length {length}")]
    Translation {
        offset: i64,
        length: i64,
        target: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::MissingColumns { .. }
            | ConvertError::BlockLengthMismatch { .. }
            | ConvertError::InvalidBlock { .. }
            | ConvertError::DuplicateVersion { .. }
            | ConvertError::NotAPair { .. }
            | ConvertError::UnknownVersion { .. } => ErrorKind::Configuration,
            ConvertError::InvalidQueryString { .. }
            | ConvertError::InvalidRow { .. }
            | ConvertError::InvalidRange { .. }
            | ConvertError::ItemCountMismatch { .. }
            | ConvertError::MissingItemCount { .. } => ErrorKind::Parse,
            ConvertError::OutOfRange { .. } => ErrorKind::OutOfRange,
            ConvertError::InvalidQuery(_) => ErrorKind::InvalidQuery,
            ConvertError::Translation { .. } => ErrorKind::Translation,
            ConvertError::Io(_) => ErrorKind::Io,
        }
    }

    /// Whether this error must abort a whole batch rather than a single item.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Configuration | ErrorKind::Translation | ErrorKind::Io
        )
    }
}
