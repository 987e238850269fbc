//! Output formatting for conversion results.
//!
//! One CSV row per query: a running pair id starting at 1, the source and
//! target chromosome/start/end, and the strand of the block used (`.` when
//! the lookup did not resolve).

use anyhow::Result;
use log::info;
use std::io::Write;

use crate::convert::{LookupOutcome, PairedRange};

/// Counts of written rows by lookup outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub rows: usize,
    pub resolved: usize,
    pub not_found: usize,
    pub ambiguous: usize,
}

impl ConversionSummary {
    /// Count one written pair.
    pub fn record(&mut self, pair: &PairedRange) {
        self.rows += 1;
        match pair.outcome() {
            LookupOutcome::Resolved => self.resolved += 1,
            LookupOutcome::NotFound => self.not_found += 1,
            LookupOutcome::Ambiguous => self.ambiguous += 1,
        }
    }

    pub fn log(&self) {
        info!(
            "Converted {} queries: {} resolved, {} not found, {} ambiguous",
            self.rows, self.resolved, self.not_found, self.ambiguous
        );
    }
}

/// Column names for a `source` to `target` export.
pub fn header_columns(source: &str, target: &str) -> Vec<String> {
    let mut columns = vec!["pair_id".to_string()];
    for version in [source, target] {
        for field in ["chromosome", "start", "end"] {
            columns.push(format!("{version}_{field}"));
        }
    }
    columns.push("strand".to_string());
    columns
}

/// Write the output header.
pub fn write_header<W: Write>(writer: &mut W, source: &str, target: &str) -> Result<()> {
    writeln!(writer, "{}", header_columns(source, target).join(","))?;
    Ok(())
}

/// Format a single output row.
pub fn format_output_line(
    pair_id: usize,
    pair: &PairedRange,
    source: &str,
    target: &str,
) -> crate::error::Result<String> {
    let from = pair.range(source)?;
    let to = pair.range(target)?;

    Ok(format!(
        "{},{},{},{},{},{},{},{}",
        pair_id,
        from.sequence_id(),
        from.start(),
        from.end(),
        to.sequence_id(),
        to.start(),
        to.end(),
        pair.strand_str()
    ))
}

/// Write a header and one row per pair, numbering pairs from 1.
pub fn write_results<'a, W, I>(
    writer: &mut W,
    pairs: I,
    source: &str,
    target: &str,
) -> Result<ConversionSummary>
where
    W: Write,
    I: IntoIterator<Item = &'a PairedRange>,
{
    write_header(writer, source, target)?;

    let mut summary = ConversionSummary::default();
    for pair in pairs {
        let line = format_output_line(summary.rows + 1, pair, source, target)?;
        writeln!(writer, "{}", line)?;
        summary.record(pair);
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GenomicRange;

    fn range(s: &str) -> GenomicRange {
        GenomicRange::from_string(s).unwrap()
    }

    #[test]
    fn test_header() {
        let mut output = Vec::new();
        write_header(&mut output, "5", "6").unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "pair_id,5_chromosome,5_start,5_end,6_chromosome,6_start,6_end,strand\n"
        );
    }

    #[test]
    fn test_format_output_line() {
        let pair = PairedRange::new([("5", range("2L:23..27")), ("6", range("2R:24..28"))], Some(false));
        let line = format_output_line(3, &pair, "5", "6").unwrap();
        assert_eq!(line, "3,2L,23,27,2R,24,28,+");

        // Columns follow the requested order, not the pair's
        let line = format_output_line(1, &pair, "6", "5").unwrap();
        assert_eq!(line, "1,2R,24,28,2L,23,27,+");
    }

    #[test]
    fn test_format_sentinel_line() {
        let pair = PairedRange::not_found("5", range("3L:100..200"), "6");
        let line = format_output_line(1, &pair, "5", "6").unwrap();
        assert_eq!(line, "1,3L,100,200,-9,-9,-9,.");
    }

    #[test]
    fn test_format_missing_version() {
        let pair = PairedRange::not_found("5", range("3L:100..200"), "6");
        assert!(format_output_line(1, &pair, "5", "7").is_err());
    }

    #[test]
    fn test_write_results() {
        let pairs = vec![
            PairedRange::new([("5", range("2L:1..10")), ("6", range("2L:11..20"))], Some(false)),
            PairedRange::ambiguous("5", range("2L:22..24"), "6"),
            PairedRange::not_found("5", range("4:1..2"), "6"),
        ];
        let mut output = Vec::new();
        let summary = write_results(&mut output, &pairs, "5", "6").unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "1,2L,1,10,2L,11,20,+");
        assert_eq!(lines[2], "2,2L,22,24,-8,-8,-8,.");
        assert_eq!(lines[3], "3,4,1,2,-9,-9,-9,.");
        assert_eq!(
            summary,
            ConversionSummary {
                rows: 3,
                resolved: 1,
                not_found: 1,
                ambiguous: 1
            }
        );
    }
}
