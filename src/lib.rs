//! convert-annotation - Genomic coordinate conversion between annotation versions.
//!
//! This library converts ranges between two versions of a genome annotation
//! using a table of aligned blocks. Each block maps a contiguous interval in
//! one version onto an equally long interval in the other, possibly inverted.
//!
//! # Features
//!
//! - Load block tables from CSV/TSV files (with gzip support)
//! - Typed filter predicates over block-table columns
//! - Offset-preserving translation with inversion support
//! - Sentinel results for queries with no or several containing blocks
//! - Order-preserving parallel batch conversion
//!
//! # Example
//!
//! ```ignore
//! use convert_annotation::config::Config;
//! use convert_annotation::convert::CoordinateConverter;
//! use convert_annotation::parser::parse_block_table;
//! use std::path::Path;
//!
//! let config = Config::default();
//! let table = parse_block_table(Path::new("r5_to_r6.csv"), "5", "6", &config)?;
//! let converter = CoordinateConverter::new(table);
//!
//! let pair = converter.convert("5", "2L:23..27")?;
//! println!("{}", pair.get("6").unwrap());
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod table;
pub mod types;

pub use config::Config;
pub use convert::{CoordinateConverter, LookupOutcome, PairedRange, Query};
pub use error::{ConvertError, ErrorKind};
pub use table::{AlignmentBlock, AlignmentBlockTable};
pub use types::{GenomicRange, Strand};
