//! Query-list loader.
//!
//! One `{sequence}:{start}..{end}` query per line. Lines starting with a
//! configured ignore prefix are skipped, as are blank lines. A line starting
//! with the count prefix (`itemnum: 3`) declares how many queries follow.

use anyhow::{Context, Result};
use log::info;
use std::io::BufRead;
use std::path::Path;

use crate::config::Config;
use crate::error::ConvertError;
use crate::parser::util::open_input;
use crate::types::GenomicRange;

/// Parse a query-list file (supports .gz).
pub fn parse_query_list(path: &Path, config: &Config) -> Result<Vec<GenomicRange>> {
    let reader = open_input(path, "query list")?;
    let queries = parse_query_list_reader(reader, config)
        .with_context(|| format!("Failed to load query list: {}", path.display()))?;

    info!("Read {} queries from {}", queries.len(), path.display());
    Ok(queries)
}

/// Parse a query list from a reader.
///
/// Any malformed query aborts the whole list.
pub fn parse_query_list_reader<R: BufRead>(
    reader: R,
    config: &Config,
) -> crate::error::Result<Vec<GenomicRange>> {
    let mut queries = Vec::new();
    let mut expected: Option<usize> = None;

    for (i, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        let line = line.trim_end();
        let line_num = i + 1;

        if let Some(prefix) = config.count_prefix.as_deref() {
            if let Some(count) = line.strip_prefix(prefix) {
                let count = count.trim().parse().map_err(|_| ConvertError::InvalidRow {
                    line: line_num,
                    msg: format!("item count '{}' is not a number", count.trim()),
                })?;
                expected = Some(count);
                continue;
            }
        }

        if line.trim().is_empty()
            || config
                .ignore_prefixes
                .iter()
                .any(|p| line.starts_with(p.as_str()))
        {
            continue;
        }

        let query = GenomicRange::from_string(line.trim()).map_err(|e| ConvertError::InvalidRow {
            line: line_num,
            msg: e.to_string(),
        })?;
        queries.push(query);
    }

    match (expected, config.count_prefix.as_deref()) {
        (Some(expected), _) if expected != queries.len() => Err(ConvertError::ItemCountMismatch {
            expected,
            observed: queries.len(),
        }),
        (None, Some(prefix)) if config.require_count => Err(ConvertError::MissingItemCount {
            prefix: prefix.to_string(),
        }),
        _ => Ok(queries),
    }
}
