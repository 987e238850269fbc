//! Core data structures for convert-annotation.
//!
//! Coordinates are **1-based, inclusive** on both ends, so a range
//! `2L:1..10` covers ten bases.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::{ConvertError, Result};

/// Sentinel value marking a query with no containing block.
pub const NOT_FOUND: i64 = -9;

/// Sentinel value marking a query contained in more than one block.
pub const AMBIGUOUS: i64 = -8;

/// Relative orientation of the two sides of an alignment block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Positive,
    Negative,
}

/// Error type for parsing strand from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStrandError;

impl fmt::Display for ParseStrandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid strand: expected '+' or '-'")
    }
}

impl std::error::Error for ParseStrandError {}

impl FromStr for Strand {
    type Err = ParseStrandError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Positive),
            "-" => Ok(Strand::Negative),
            _ => Err(ParseStrandError),
        }
    }
}

impl Strand {
    /// Convert strand to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strand::Positive => "+",
            Strand::Negative => "-",
        }
    }

    /// Whether this strand marks an inversion block.
    pub fn is_inversion(&self) -> bool {
        matches!(self, Strand::Negative)
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable interval on a named sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenomicRange {
    sequence_id: String,
    start: i64,
    end: i64,
}

impl GenomicRange {
    /// Create a new range, rejecting `start > end`.
    pub fn new(sequence_id: impl Into<String>, start: i64, end: i64) -> Result<Self> {
        let sequence_id = sequence_id.into();
        if start > end {
            return Err(ConvertError::InvalidRange {
                sequence: sequence_id,
                start,
                end,
            });
        }
        Ok(GenomicRange {
            sequence_id,
            start,
            end,
        })
    }

    /// Range reported when no block contains the query.
    pub fn not_found() -> Self {
        Self::sentinel(NOT_FOUND)
    }

    /// Range reported when several blocks contain the query.
    pub fn ambiguous() -> Self {
        Self::sentinel(AMBIGUOUS)
    }

    fn sentinel(value: i64) -> Self {
        GenomicRange {
            sequence_id: value.to_string(),
            start: value,
            end: value,
        }
    }

    /// Parse `"{sequence}:{start}..{end}"`.
    pub fn from_string(s: &str) -> Result<Self> {
        let invalid = |msg: &str| ConvertError::InvalidQueryString {
            input: s.to_string(),
            msg: msg.to_string(),
        };

        let (sequence_id, span) = s
            .split_once(':')
            .ok_or_else(|| invalid("expected '{sequence}:{start}..{end}'"))?;
        if sequence_id.is_empty() {
            return Err(invalid("empty sequence name"));
        }
        let (start, end) = span
            .split_once("..")
            .ok_or_else(|| invalid("expected '..' between start and end"))?;
        let start: i64 = start
            .trim()
            .parse()
            .map_err(|_| invalid("start is not an integer"))?;
        let end: i64 = end
            .trim()
            .parse()
            .map_err(|_| invalid("end is not an integer"))?;

        GenomicRange::new(sequence_id, start, end)
    }

    pub fn sequence_id(&self) -> &str {
        &self.sequence_id
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    /// Number of bases covered (end - start + 1).
    pub fn length(&self) -> i64 {
        self.end - self.start + 1
    }

    /// Whether this is one of the not-found/ambiguous sentinel ranges.
    pub fn is_sentinel(&self) -> bool {
        *self == Self::not_found() || *self == Self::ambiguous()
    }

    /// Zero-based offset of `coordinate` within this range.
    pub fn get_index(&self, coordinate: i64) -> Result<i64> {
        if coordinate < 0 || coordinate < self.start || coordinate > self.end {
            return Err(ConvertError::OutOfRange {
                coordinate,
                start: self.start,
                end: self.end,
            });
        }
        Ok(coordinate - self.start)
    }

    /// Whether `other` lies entirely within this range on the same sequence.
    pub fn contains(&self, other: &GenomicRange) -> bool {
        self.sequence_id == other.sequence_id
            && self.start <= other.start
            && self.end >= other.end
    }

    /// Iterate over every coordinate in the range.
    pub fn positions(&self) -> RangeInclusive<i64> {
        self.start..=self.end
    }
}

impl FromStr for GenomicRange {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        GenomicRange::from_string(s)
    }
}

impl fmt::Display for GenomicRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}..{}", self.sequence_id, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_strand_parsing() {
        assert_eq!("+".parse::<Strand>(), Ok(Strand::Positive));
        assert_eq!("-".parse::<Strand>(), Ok(Strand::Negative));
        assert!(".".parse::<Strand>().is_err());
        assert!(Strand::Negative.is_inversion());
        assert!(!Strand::Positive.is_inversion());
    }

    #[test]
    fn test_from_string() {
        let range = GenomicRange::from_string("2L:1..10").unwrap();
        assert_eq!(range.sequence_id(), "2L");
        assert_eq!(range.start(), 1);
        assert_eq!(range.end(), 10);
        assert_eq!(range.length(), 10);
        assert_eq!(range.to_string(), "2L:1..10");
    }

    #[test]
    fn test_from_string_malformed() {
        for input in ["2L", "2L:1-10", "2L:a..10", "2L:1..b", ":1..10", "2L:10..1"] {
            let err = GenomicRange::from_string(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Parse, "input {input}");
        }
    }

    #[test]
    fn test_get_index() {
        let range = GenomicRange::new("2L", 20, 30).unwrap();
        assert_eq!(range.get_index(20).unwrap(), 0);
        assert_eq!(range.get_index(25).unwrap(), 5);
        assert_eq!(range.get_index(30).unwrap(), 10);
        assert_eq!(range.get_index(19).unwrap_err().kind(), ErrorKind::OutOfRange);
        assert_eq!(range.get_index(31).unwrap_err().kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn test_get_index_negative() {
        let range = GenomicRange::new("2L", -5, 5).unwrap();
        assert_eq!(range.get_index(0).unwrap(), 5);
        assert!(matches!(
            range.get_index(-1),
            Err(ConvertError::OutOfRange { coordinate: -1, .. })
        ));
    }

    #[test]
    fn test_sentinels() {
        let nf = GenomicRange::not_found();
        assert_eq!(nf.sequence_id(), "-9");
        assert_eq!((nf.start(), nf.end()), (-9, -9));
        assert!(nf.is_sentinel());

        let amb = GenomicRange::ambiguous();
        assert_eq!(amb.sequence_id(), "-8");
        assert_eq!((amb.start(), amb.end()), (-8, -8));
        assert!(amb.is_sentinel());

        assert!(!GenomicRange::new("2L", 1, 10).unwrap().is_sentinel());
    }

    #[test]
    fn test_positions_and_contains() {
        let outer = GenomicRange::new("2L", 20, 30).unwrap();
        let inner = GenomicRange::new("2L", 23, 27).unwrap();
        assert_eq!(inner.positions().collect::<Vec<_>>(), vec![23, 24, 25, 26, 27]);
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(!outer.contains(&GenomicRange::new("2R", 23, 27).unwrap()));
    }
}
