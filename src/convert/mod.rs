//! Coordinate conversion between the two versions of a block table.

pub mod converter;
pub mod paired;

pub use converter::{CoordinateConverter, Query};
pub use paired::{LookupOutcome, PairedRange};
