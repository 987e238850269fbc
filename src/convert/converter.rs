//! Query normalisation and block lookup.

use log::debug;

use crate::convert::paired::PairedRange;
use crate::error::{ConvertError, Result};
use crate::table::AlignmentBlockTable;
use crate::types::GenomicRange;

/// A query in any of its accepted forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// `"{sequence}:{start}..{end}"`
    Text(String),
    Range(GenomicRange),
    Fields {
        sequence: String,
        start: i64,
        end: i64,
    },
}

impl Query {
    /// Build a query from optional forms, exactly one of which must be set.
    pub fn from_parts(
        text: Option<String>,
        range: Option<GenomicRange>,
        fields: Option<(String, i64, i64)>,
    ) -> Result<Self> {
        match (text, range, fields) {
            (Some(text), None, None) => Ok(Query::Text(text)),
            (None, Some(range), None) => Ok(Query::Range(range)),
            (None, None, Some((sequence, start, end))) => Ok(Query::Fields {
                sequence,
                start,
                end,
            }),
            (None, None, None) => Err(ConvertError::InvalidQuery(
                "no query given: supply a string, a range or sequence/start/end".to_string(),
            )),
            _ => Err(ConvertError::InvalidQuery(
                "more than one query form given".to_string(),
            )),
        }
    }

    /// Normalise to a range.
    pub fn to_range(&self) -> Result<GenomicRange> {
        match self {
            Query::Text(text) => GenomicRange::from_string(text),
            Query::Range(range) => Ok(range.clone()),
            Query::Fields {
                sequence,
                start,
                end,
            } => GenomicRange::new(sequence.as_str(), *start, *end),
        }
    }
}

impl From<&str> for Query {
    fn from(s: &str) -> Self {
        Query::Text(s.to_string())
    }
}

impl From<String> for Query {
    fn from(s: String) -> Self {
        Query::Text(s)
    }
}

impl From<&String> for Query {
    fn from(s: &String) -> Self {
        Query::Text(s.clone())
    }
}

impl From<GenomicRange> for Query {
    fn from(range: GenomicRange) -> Self {
        Query::Range(range)
    }
}

impl From<&GenomicRange> for Query {
    fn from(range: &GenomicRange) -> Self {
        Query::Range(range.clone())
    }
}

impl From<(&str, i64, i64)> for Query {
    fn from((sequence, start, end): (&str, i64, i64)) -> Self {
        Query::Fields {
            sequence: sequence.to_string(),
            start,
            end,
        }
    }
}

/// Converts ranges between the two versions of a block table.
#[derive(Debug, Clone)]
pub struct CoordinateConverter {
    table: AlignmentBlockTable,
}

impl CoordinateConverter {
    pub fn new(table: AlignmentBlockTable) -> Self {
        CoordinateConverter { table }
    }

    pub fn table(&self) -> &AlignmentBlockTable {
        &self.table
    }

    /// Version a query in `source_version` converts into.
    pub fn target_version(&self, source_version: &str) -> Result<&str> {
        self.table.paired_version(source_version)
    }

    /// Convert one query from `source_version` into the other version.
    ///
    /// A query that no block contains pairs with the not-found sentinel; one
    /// contained in several blocks pairs with the ambiguous sentinel.
    pub fn convert(&self, source_version: &str, query: impl Into<Query>) -> Result<PairedRange> {
        let query = query.into().to_range()?;
        let target_version = self.target_version(source_version)?;

        let blocks = self.table.find_containing_blocks(
            source_version,
            query.sequence_id(),
            query.start(),
            query.end(),
        )?;

        match blocks.as_slice() {
            [] => {
                debug!("{} ({}): no containing block", query, source_version);
                Ok(PairedRange::not_found(source_version, query, target_version))
            }
            [block] => PairedRange::from_block(&self.table, block).translate(source_version, &query),
            _ => {
                debug!(
                    "{} ({}): contained in {} blocks",
                    query,
                    source_version,
                    blocks.len()
                );
                Ok(PairedRange::ambiguous(source_version, query, target_version))
            }
        }
    }

    /// Lazily convert queries in input order.
    ///
    /// Callers collecting into `Result<Vec<_>>` stop at the first error.
    pub fn convert_many<'a, I>(
        &'a self,
        source_version: &'a str,
        queries: I,
    ) -> impl Iterator<Item = Result<PairedRange>> + 'a
    where
        I: IntoIterator,
        I::IntoIter: 'a,
        I::Item: Into<Query>,
    {
        queries
            .into_iter()
            .map(move |query| self.convert(source_version, query))
    }
}
