//! Alignment blocks and the read-only block table.
//!
//! A block declares that an interval in version A corresponds base-for-base
//! to an equally long interval in version B, possibly running antiparallel.
//! The table is built once and never mutated, so it can be shared freely
//! between threads.

use std::fmt;

use crate::error::{ConvertError, Result};
use crate::table::predicate::{Cell, Column, Field, Filter, Predicate, Side, SortKey};
use crate::types::{GenomicRange, Strand};

/// One row of the block table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentBlock {
    a: GenomicRange,
    b: GenomicRange,
    strand: Strand,
}

impl AlignmentBlock {
    pub fn new(a: GenomicRange, b: GenomicRange, strand: Strand) -> Self {
        AlignmentBlock { a, b, strand }
    }

    /// Interval of this block in the given version.
    pub fn range(&self, side: Side) -> &GenomicRange {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn is_inversion(&self) -> bool {
        self.strand.is_inversion()
    }

    /// Read a single cell.
    pub fn cell(&self, column: Column) -> Cell<'_> {
        match column {
            Column::Version(side, Field::Chr) => Cell::Text(self.range(side).sequence_id()),
            Column::Version(side, Field::Start) => Cell::Int(self.range(side).start()),
            Column::Version(side, Field::End) => Cell::Int(self.range(side).end()),
            Column::Strand => Cell::Text(self.strand.as_str()),
        }
    }
}

/// Ordered, immutable collection of blocks between exactly two versions.
#[derive(Debug, Clone)]
pub struct AlignmentBlockTable {
    version_a: String,
    version_b: String,
    column_prefix: String,
    description: String,
    blocks: Vec<AlignmentBlock>,
}

impl AlignmentBlockTable {
    /// Build a table, checking that every block has equal lengths on both sides.
    pub fn new(
        version_a: impl Into<String>,
        version_b: impl Into<String>,
        blocks: Vec<AlignmentBlock>,
    ) -> Result<Self> {
        let version_a = version_a.into();
        let version_b = version_b.into();

        if version_a == version_b {
            return Err(ConvertError::DuplicateVersion { version: version_a });
        }

        for (index, block) in blocks.iter().enumerate() {
            // Positive starts keep `end - start + 1` within i64.
            for range in [&block.a, &block.b] {
                if range.start() < 1 {
                    return Err(ConvertError::InvalidBlock {
                        index,
                        range: range.to_string(),
                    });
                }
            }
            let len_a = block.a.length();
            let len_b = block.b.length();
            if len_a != len_b {
                return Err(ConvertError::BlockLengthMismatch {
                    index,
                    version_a,
                    len_a,
                    version_b,
                    len_b,
                });
            }
        }

        Ok(AlignmentBlockTable {
            version_a,
            version_b,
            column_prefix: "v".to_string(),
            description: String::new(),
            blocks,
        })
    }

    /// Attach a free-text label.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the prefix used by [`column_by_name`](Self::column_by_name).
    pub fn with_column_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.column_prefix = prefix.into();
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The two version identifiers, in table order.
    pub fn versions(&self) -> (&str, &str) {
        (&self.version_a, &self.version_b)
    }

    /// Version identifier for a side.
    pub fn version(&self, side: Side) -> &str {
        match side {
            Side::A => &self.version_a,
            Side::B => &self.version_b,
        }
    }

    /// Resolve a version identifier to its side of the table.
    pub fn side(&self, version: &str) -> Result<Side> {
        if version == self.version_a {
            Ok(Side::A)
        } else if version == self.version_b {
            Ok(Side::B)
        } else {
            Err(ConvertError::UnknownVersion {
                version: version.to_string(),
                version_a: self.version_a.clone(),
                version_b: self.version_b.clone(),
            })
        }
    }

    /// The other version of the pair.
    pub fn paired_version(&self, version: &str) -> Result<&str> {
        let side = self.side(version)?;
        Ok(self.version(side.other()))
    }

    /// Column for a version's field.
    pub fn column(&self, version: &str, field: Field) -> Result<Column> {
        Ok(Column::Version(self.side(version)?, field))
    }

    /// Header name of a column (e.g. `v5_start`).
    pub fn column_name(&self, column: Column) -> String {
        match column {
            Column::Version(side, field) => {
                format!("{}{}_{}", self.column_prefix, self.version(side), field)
            }
            Column::Strand => "strand".to_string(),
        }
    }

    /// Look up a column by its header name.
    pub fn column_by_name(&self, name: &str) -> Option<Column> {
        if name == "strand" {
            return Some(Column::Strand);
        }
        [Side::A, Side::B]
            .into_iter()
            .flat_map(|side| Field::ALL.into_iter().map(move |f| Column::Version(side, f)))
            .find(|&column| self.column_name(column) == name)
    }

    /// Rows matching every filter, in table order unless a sort key is given.
    ///
    /// Filters on the same column intersect. An empty filter list returns
    /// the whole table.
    pub fn filter(&self, filters: &[Filter], sort: Option<SortKey>) -> Vec<&AlignmentBlock> {
        let mut hits: Vec<&AlignmentBlock> = self
            .blocks
            .iter()
            .filter(|block| {
                filters
                    .iter()
                    .all(|f| f.predicate.matches(block.cell(f.column)))
            })
            .collect();

        if let Some(key) = sort {
            hits.sort_by(|x, y| {
                let ord = x.cell(key.column).sort_cmp(&y.cell(key.column));
                if key.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            });
        }

        hits
    }

    /// Blocks whose interval in `version` fully contains `[start, end]` on `sequence_id`.
    pub fn find_containing_blocks(
        &self,
        version: &str,
        sequence_id: &str,
        start: i64,
        end: i64,
    ) -> Result<Vec<&AlignmentBlock>> {
        let filters = [
            Filter::new(
                self.column(version, Field::Chr)?,
                Predicate::Eq(sequence_id.into()),
            ),
            Filter::new(self.column(version, Field::Start)?, Predicate::Lte(start.into())),
            Filter::new(self.column(version, Field::End)?, Predicate::Gte(end.into())),
        ];
        Ok(self.filter(&filters, None))
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AlignmentBlock> {
        self.blocks.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AlignmentBlock> {
        self.blocks.iter()
    }

    /// First `n` blocks.
    pub fn head(&self, n: usize) -> &[AlignmentBlock] {
        &self.blocks[..n.min(self.blocks.len())]
    }

    /// Last `n` blocks.
    pub fn tail(&self, n: usize) -> &[AlignmentBlock] {
        &self.blocks[self.blocks.len().saturating_sub(n)..]
    }
}

impl<'a> IntoIterator for &'a AlignmentBlockTable {
    type Item = &'a AlignmentBlock;
    type IntoIter = std::slice::Iter<'a, AlignmentBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

impl fmt::Display for AlignmentBlockTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<AlignmentBlockTable: {} ({} records)>",
            self.description,
            self.len()
        )
    }
}
