//! Ranges paired across annotation versions.
//!
//! A [`PairedRange`] built from a block holds the block's interval in each
//! version. Translating a query through it yields another `PairedRange` that
//! holds the query and its image in the other version.

use indexmap::IndexMap;

use crate::error::{ConvertError, Result};
use crate::table::{AlignmentBlock, AlignmentBlockTable, Side};
use crate::types::GenomicRange;

/// How a lookup resolved, as read back from a [`PairedRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupOutcome {
    Resolved,
    NotFound,
    Ambiguous,
}

/// Ranges keyed by version, in a fixed order, plus an inversion flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairedRange {
    ranges: IndexMap<String, GenomicRange>,
    /// `None` when the pair did not come from a block (lookup failed).
    is_inversion: Option<bool>,
    name: Option<String>,
}

impl PairedRange {
    /// Build from `(version, range)` entries; order is kept.
    pub fn new<I, K>(ranges: I, is_inversion: Option<bool>) -> Self
    where
        I: IntoIterator<Item = (K, GenomicRange)>,
        K: Into<String>,
    {
        PairedRange {
            ranges: ranges.into_iter().map(|(k, r)| (k.into(), r)).collect(),
            is_inversion,
            name: None,
        }
    }

    /// Both intervals of a block, keyed by the table's version names.
    pub fn from_block(table: &AlignmentBlockTable, block: &AlignmentBlock) -> Self {
        Self::new(
            [Side::A, Side::B]
                .into_iter()
                .map(|side| (table.version(side), block.range(side).clone())),
            Some(block.is_inversion()),
        )
    }

    /// Query paired with the not-found sentinel.
    pub fn not_found(source: &str, query: GenomicRange, target: &str) -> Self {
        Self::new([(source, query), (target, GenomicRange::not_found())], None)
    }

    /// Query paired with the ambiguous sentinel.
    pub fn ambiguous(source: &str, query: GenomicRange, target: &str) -> Self {
        Self::new([(source, query), (target, GenomicRange::ambiguous())], None)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_inversion(&self) -> Option<bool> {
        self.is_inversion
    }

    /// Version keys in order.
    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.ranges.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn get(&self, version: &str) -> Option<&GenomicRange> {
        self.ranges.get(version)
    }

    /// Range for `version`, failing if the pair does not hold it.
    pub fn range(&self, version: &str) -> Result<&GenomicRange> {
        self.ranges.get(version).ok_or_else(|| self.unknown(version))
    }

    fn unknown(&self, version: &str) -> ConvertError {
        let mut keys = self.ranges.keys().cloned();
        ConvertError::UnknownVersion {
            version: version.to_string(),
            version_a: keys.next().unwrap_or_default(),
            version_b: keys.next().unwrap_or_default(),
        }
    }

    /// The other key of a two-version pair.
    ///
    /// Only defined for pairs: fails when the range set holds any other
    /// number of versions.
    pub fn get_paired_version(&self, version: &str) -> Result<&str> {
        if self.ranges.len() != 2 {
            return Err(ConvertError::NotAPair {
                count: self.ranges.len(),
            });
        }
        if !self.ranges.contains_key(version) {
            return Err(self.unknown(version));
        }
        self.versions()
            .find(|&k| k != version)
            .ok_or_else(|| self.unknown(version))
    }

    /// Classify this pair by the sentinels it carries.
    pub fn outcome(&self) -> LookupOutcome {
        if self.ranges.values().any(|r| *r == GenomicRange::not_found()) {
            LookupOutcome::NotFound
        } else if self.ranges.values().any(|r| *r == GenomicRange::ambiguous()) {
            LookupOutcome::Ambiguous
        } else {
            LookupOutcome::Resolved
        }
    }

    /// Translate `source_range` through this block-derived pair.
    ///
    /// Offsets of the query ends within the source block are applied to the
    /// target block. On an inverted block an offset `i` is taken from the far
    /// end instead, so the result is reported with `start <= end`.
    pub fn translate(&self, source: &str, source_range: &GenomicRange) -> Result<PairedRange> {
        let target = self.get_paired_version(source)?;
        let source_block = self.range(source)?;
        let target_block = self.range(target)?;

        if source_range.sequence_id() != source_block.sequence_id() {
            return Err(ConvertError::InvalidQuery(format!(
                "{} does not lie on block {}",
                source_range, source_block
            )));
        }

        let first = source_block.get_index(source_range.start())?;
        let last = source_block.get_index(source_range.end())?;
        let inversion = self.is_inversion.unwrap_or(false);

        let a = locate(target_block, first, inversion)?;
        let b = locate(target_block, last, inversion)?;
        let translated = GenomicRange::new(target_block.sequence_id(), a.min(b), a.max(b))?;

        let mut pair = PairedRange::new(
            [(source, source_range.clone()), (target, translated)],
            self.is_inversion,
        );
        pair.name = self.name.clone();
        Ok(pair)
    }

    /// Flat record: `{version}_chromosome/start/end` per version, then `strand`.
    pub fn to_record(&self) -> IndexMap<String, String> {
        let mut record = IndexMap::with_capacity(self.ranges.len() * 3 + 1);
        for (version, range) in &self.ranges {
            record.insert(
                format!("{version}_chromosome"),
                range.sequence_id().to_string(),
            );
            record.insert(format!("{version}_start"), range.start().to_string());
            record.insert(format!("{version}_end"), range.end().to_string());
        }
        record.insert("strand".to_string(), self.strand_str().to_string());
        record
    }

    /// `+`, `-`, or `.` when the lookup did not resolve to a block.
    pub fn strand_str(&self) -> &'static str {
        match self.is_inversion {
            Some(false) => "+",
            Some(true) => "-",
            None => ".",
        }
    }
}

/// Coordinate at `offset` within `target`; inverted offsets count from the end.
fn locate(target: &GenomicRange, offset: i64, inversion: bool) -> Result<i64> {
    let length = target.length();
    let index = if inversion { length - (offset + 1) } else { offset };

    if index < 0 || index >= length {
        return Err(ConvertError::Translation {
            offset,
            length,
            target: target.to_string(),
        });
    }
    Ok(target.start() + index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn range(s: &str) -> GenomicRange {
        GenomicRange::from_string(s).unwrap()
    }

    fn block_pair(a: &str, b: &str, inversion: bool) -> PairedRange {
        PairedRange::new([("5", range(a)), ("6", range(b))], Some(inversion))
    }

    #[test]
    fn test_get_paired_version() {
        let pair = block_pair("2L:1..10", "2L:11..20", false);
        assert_eq!(pair.get_paired_version("5").unwrap(), "6");
        assert_eq!(pair.get_paired_version("6").unwrap(), "5");
        assert_eq!(
            pair.get_paired_version("7").unwrap_err().kind(),
            ErrorKind::Configuration
        );
    }

    #[test]
    fn test_get_paired_version_requires_two() {
        let triple = PairedRange::new(
            [
                ("5", range("2L:1..10")),
                ("6", range("2L:11..20")),
                ("7", range("2L:21..30")),
            ],
            Some(false),
        );
        assert!(matches!(
            triple.get_paired_version("5"),
            Err(ConvertError::NotAPair { count: 3 })
        ));
    }

    #[test]
    fn test_translate_forward() {
        let pair = block_pair("2L:20..30", "2R:21..31", false);
        let result = pair.translate("5", &range("2L:23..27")).unwrap();
        assert_eq!(result.get("5"), Some(&range("2L:23..27")));
        assert_eq!(result.get("6"), Some(&range("2R:24..28")));
        assert_eq!(result.is_inversion(), Some(false));
        assert_eq!(result.outcome(), LookupOutcome::Resolved);
    }

    #[test]
    fn test_translate_inverted() {
        let pair = block_pair("2L:11..100", "2L:61..150", true);
        let result = pair.translate("5", &range("2L:20..50")).unwrap();
        assert_eq!(result.get("6"), Some(&range("2L:111..141")));
        assert_eq!(result.is_inversion(), Some(true));

        // Block ends swap
        let result = pair.translate("5", &range("2L:11..11")).unwrap();
        assert_eq!(result.get("6"), Some(&range("2L:150..150")));
        let result = pair.translate("6", &range("2L:61..61")).unwrap();
        assert_eq!(result.get("5"), Some(&range("2L:100..100")));
    }

    #[test]
    fn test_translate_keeps_name() {
        let pair = block_pair("2L:1..10", "2L:11..20", false).with_name("gene-x");
        let result = pair.translate("5", &range("2L:2..3")).unwrap();
        assert_eq!(result.name(), Some("gene-x"));
    }

    #[test]
    fn test_translate_query_outside_block() {
        let pair = block_pair("2L:20..30", "2R:21..31", false);
        let err = pair.translate("5", &range("2L:25..35")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);

        let err = pair.translate("5", &range("3L:21..22")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidQuery);
    }

    #[test]
    fn test_translate_unequal_block_is_fatal() {
        // Only reachable when bypassing table validation.
        let pair = block_pair("2L:1..20", "2L:11..15", false);
        let err = pair.translate("5", &range("2L:3..12")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Translation);
        assert!(err.is_fatal());
    }

    #[test]
    fn test_sentinel_pairs() {
        let nf = PairedRange::not_found("5", range("3L:100..200"), "6");
        assert_eq!(nf.outcome(), LookupOutcome::NotFound);
        assert_eq!(nf.is_inversion(), None);
        assert_eq!(nf.strand_str(), ".");

        let amb = PairedRange::ambiguous("6", range("2R:25..30"), "5");
        assert_eq!(amb.outcome(), LookupOutcome::Ambiguous);
        assert_eq!(amb.get("5"), Some(&GenomicRange::ambiguous()));
    }

    #[test]
    fn test_to_record() {
        let pair = block_pair("2L:1..10", "2L:11..20", true);
        let record = pair.to_record();
        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "5_chromosome",
                "5_start",
                "5_end",
                "6_chromosome",
                "6_start",
                "6_end",
                "strand"
            ]
        );
        assert_eq!(record["6_start"], "11");
        assert_eq!(record["strand"], "-");
    }
}
