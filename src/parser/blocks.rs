//! Delimited block-table loader with gzip support.
//!
//! The table needs a header row naming `{prefix}{version}_chr/start/end` for
//! both versions. A `strand` column is optional; without it every block is
//! read as `+`. Other columns (such as an unnamed index) are ignored.

use ahash::AHashMap;
use anyhow::{Context, Result};
use log::{info, warn};
use std::io::BufRead;
use std::path::Path;

use crate::config::Config;
use crate::error::ConvertError;
use crate::parser::util::{open_input, split_fields};
use crate::table::{AlignmentBlock, AlignmentBlockTable, Field};
use crate::types::{GenomicRange, Strand};

/// Column positions of one version's fields.
struct VersionColumns {
    chr: usize,
    start: usize,
    end: usize,
}

/// Parse a block table file covering `version_a` and `version_b`.
pub fn parse_block_table(
    path: &Path,
    version_a: &str,
    version_b: &str,
    config: &Config,
) -> Result<AlignmentBlockTable> {
    let reader = open_input(path, "block table")?;
    let delimiter = config.delimiter_for(&path.to_string_lossy());

    let table = parse_block_table_reader(reader, version_a, version_b, config, delimiter)
        .with_context(|| format!("Failed to load block table: {}", path.display()))?;

    info!(
        "Loaded {} blocks between versions {} and {} from {}",
        table.len(),
        version_a,
        version_b,
        path.display()
    );
    Ok(table)
}

/// Parse a block table from a reader.
pub fn parse_block_table_reader<R: BufRead>(
    reader: R,
    version_a: &str,
    version_b: &str,
    config: &Config,
    delimiter: char,
) -> crate::error::Result<AlignmentBlockTable> {
    let mut lines = reader.lines().enumerate().filter_map(|(i, line)| match line {
        Ok(l) if l.trim().is_empty() || l.starts_with('#') => None,
        Ok(l) => Some(Ok((i + 1, l))),
        Err(e) => Some(Err(e)),
    });

    let header = match lines.next() {
        Some(line) => line?.1,
        None => String::new(),
    };
    let positions: AHashMap<&str, usize> = split_fields(&header, delimiter)
        .into_iter()
        .enumerate()
        .map(|(i, name)| (name, i))
        .collect();

    let mut missing = Vec::new();
    let mut lookup = |version: &str, field: Field| -> usize {
        let name = config.column_name(version, field.as_str());
        match positions.get(name.as_str()) {
            Some(&i) => i,
            None => {
                missing.push(name);
                usize::MAX
            }
        }
    };
    let mut columns_for = |version: &str| VersionColumns {
        chr: lookup(version, Field::Chr),
        start: lookup(version, Field::Start),
        end: lookup(version, Field::End),
    };
    let cols_a = columns_for(version_a);
    let cols_b = columns_for(version_b);
    if !missing.is_empty() {
        return Err(ConvertError::MissingColumns { columns: missing });
    }

    let strand_col = positions.get("strand").copied();
    if strand_col.is_none() {
        warn!("Block table has no 'strand' column; treating every block as '+'");
    }

    let mut blocks = Vec::new();
    for line in lines {
        let (line_num, line) = line?;
        let fields = split_fields(&line, delimiter);
        let invalid = |msg: String| ConvertError::InvalidRow {
            line: line_num,
            msg,
        };

        let field = |i: usize| {
            fields
                .get(i)
                .copied()
                .ok_or_else(|| invalid(format!("expected at least {} fields", i + 1)))
        };
        let int = |i: usize| -> crate::error::Result<i64> {
            let raw = field(i)?;
            raw.parse()
                .map_err(|_| invalid(format!("'{}' is not an integer", raw)))
        };
        let range = |cols: &VersionColumns| -> crate::error::Result<GenomicRange> {
            let start = int(cols.start)?;
            if start < 1 {
                return Err(invalid(format!(
                    "start {} is not a 1-based coordinate",
                    start
                )));
            }
            GenomicRange::new(field(cols.chr)?, start, int(cols.end)?)
                .map_err(|e| invalid(e.to_string()))
        };

        let a = range(&cols_a)?;
        let b = range(&cols_b)?;
        let strand = match strand_col {
            Some(i) => {
                let raw = field(i)?;
                raw.parse::<Strand>()
                    .map_err(|e| invalid(format!("{} (got '{}')", e, raw)))?
            }
            None => Strand::Positive,
        };

        blocks.push(AlignmentBlock::new(a, b, strand));
    }

    Ok(AlignmentBlockTable::new(version_a, version_b, blocks)?
        .with_column_prefix(config.column_prefix.as_str())
        .with_description(config.description.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::table::Side;
    use std::io::BufReader;

    const BLOCKS: &str = "\
v5_chr,v5_start,v5_end,v6_chr,v6_start,v6_end,strand
2L,1,10,2L,11,20,+
2L,20,30,2R,21,31,+
2L,35,45,2R,25,35,-
";

    fn parse(content: &str) -> crate::error::Result<AlignmentBlockTable> {
        let reader = BufReader::new(content.as_bytes());
        parse_block_table_reader(reader, "5", "6", &Config::new(), ',')
    }

    #[test]
    fn test_parse_basic() {
        let table = parse(BLOCKS).unwrap();
        assert_eq!(table.len(), 3);
        let block = table.get(1).unwrap();
        assert_eq!(block.range(Side::A).to_string(), "2L:20..30");
        assert_eq!(block.range(Side::B).to_string(), "2R:21..31");
        assert!(!block.is_inversion());
        assert!(table.get(2).unwrap().is_inversion());
    }

    #[test]
    fn test_parse_reordered_and_extra_columns() {
        let content = "\
,strand,v6_chr,v6_start,v6_end,v5_chr,v5_start,v5_end,note
0,+,2L,11,20,2L,1,10,first
";
        let table = parse(content).unwrap();
        let block = table.get(0).unwrap();
        assert_eq!(block.range(Side::A).to_string(), "2L:1..10");
        assert_eq!(block.range(Side::B).to_string(), "2L:11..20");
    }

    #[test]
    fn test_parse_swapped_versions() {
        let reader = BufReader::new(BLOCKS.as_bytes());
        let table = parse_block_table_reader(reader, "6", "5", &Config::new(), ',').unwrap();
        assert_eq!(table.versions(), ("6", "5"));
        assert_eq!(table.get(0).unwrap().range(Side::A).to_string(), "2L:11..20");
    }

    #[test]
    fn test_missing_columns() {
        let content = "v5_chr,v5_start,v6_chr,v6_start,v6_end\n2L,1,2L,11,20\n";
        let err = parse(content).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        match err {
            ConvertError::MissingColumns { columns } => assert_eq!(columns, vec!["v5_end"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_input_reports_all_columns() {
        match parse("").unwrap_err() {
            ConvertError::MissingColumns { columns } => assert_eq!(columns.len(), 6),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_length_mismatch() {
        let content = "\
v5_chr,v5_start,v5_end,v6_chr,v6_start,v6_end,strand
2L,1,10,2L,11,20,+
2L,20,30,2R,21,35,+
";
        let err = parse(content).unwrap_err();
        assert!(matches!(err, ConvertError::BlockLengthMismatch { index: 1, .. }));
        assert!(err.to_string().starts_with("Block #1 has unequal lengths"));
    }

    #[test]
    fn test_non_positive_coordinates() {
        let header = "v5_chr,v5_start,v5_end,v6_chr,v6_start,v6_end,strand\n";
        for row in [
            "2L,-9223372036854775808,9223372036854775807,2L,-9223372036854775808,9223372036854775807,+",
            "2L,-5,5,2L,11,21,+",
            "2L,0,9,2L,11,20,+",
            "2L,1,10,2L,0,9,-",
        ] {
            let err = parse(&format!("{header}2L,1,10,2L,11,20,+\n{row}\n")).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Parse);
            assert!(
                matches!(err, ConvertError::InvalidRow { line: 3, .. }),
                "row {row}: {err}"
            );
        }
    }

    #[test]
    fn test_invalid_rows() {
        let header = "v5_chr,v5_start,v5_end,v6_chr,v6_start,v6_end,strand\n";
        for row in ["2L,one,10,2L,11,20,+", "2L,1,10,2L,11,20,?", "2L,1,10"] {
            let err = parse(&format!("{header}{row}\n")).unwrap_err();
            assert!(
                matches!(err, ConvertError::InvalidRow { line: 2, .. }),
                "row {row}: {err}"
            );
        }
    }

    #[test]
    fn test_missing_strand_defaults_positive() {
        let content = "v5_chr,v5_start,v5_end,v6_chr,v6_start,v6_end\n2L,1,10,2L,11,20\n";
        let table = parse(content).unwrap();
        assert!(!table.get(0).unwrap().is_inversion());
    }

    #[test]
    fn test_tab_delimited_with_comments() {
        let content = "# dmel r5 -> r6\nv5_chr\tv5_start\tv5_end\tv6_chr\tv6_start\tv6_end\tstrand\n\n2L\t1\t10\t2L\t11\t20\t+\n";
        let reader = BufReader::new(content.as_bytes());
        let table = parse_block_table_reader(reader, "5", "6", &Config::new(), '\t').unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_description_and_prefix_from_config() {
        let content = "\
r5_chr,r5_start,r5_end,r6_chr,r6_start,r6_end,strand
2L,1,10,2L,11,20,+
";
        let mut config = Config::new();
        config.column_prefix = "r".to_string();
        config.description = "release 5 to 6".to_string();
        let reader = BufReader::new(content.as_bytes());
        let table = parse_block_table_reader(reader, "5", "6", &config, ',').unwrap();
        assert_eq!(table.description(), "release 5 to 6");
        assert!(table.column_by_name("r6_end").is_some());
    }

    #[test]
    fn test_txt_file_read_as_comma_separated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blocks.txt");
        std::fs::write(&path, BLOCKS).unwrap();

        let table = parse_block_table(&path, "5", "6", &Config::new()).unwrap();
        assert_eq!(table.len(), 3);
    }
}
