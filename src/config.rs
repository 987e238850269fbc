//! Configuration and defaults for convert-annotation.
//!
//! This module contains the configuration structure that controls how the
//! block table and query list are read and how batches are processed.

/// Default prefix of the header line declaring the number of queries.
pub const DEFAULT_COUNT_PREFIX: &str = "itemnum: ";

/// Default prefixes of query-list lines that are skipped.
pub const DEFAULT_IGNORE_PREFIXES: [&str; 2] = ["itemnum", "/*"];

/// Configuration for loading inputs and running conversions.
#[derive(Debug, Clone)]
pub struct Config {
    /// Prefix placed before a version id in block-table column names (`v5_chr`).
    pub column_prefix: String,
    /// Block-table field delimiter. `None` infers it from the file name.
    pub delimiter: Option<char>,
    /// Prefix of the optional item-count header line in query lists.
    pub count_prefix: Option<String>,
    /// Fail when a query list lacks the item-count line.
    pub require_count: bool,
    /// Query-list lines starting with any of these are skipped.
    pub ignore_prefixes: Vec<String>,
    /// Worker threads for batch conversion (0 = all cores).
    pub threads: usize,
    /// Queries per work item in parallel mode.
    pub batch_size: usize,
    /// Free-text label attached to the block table.
    pub description: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            column_prefix: "v".to_string(),
            delimiter: None,
            count_prefix: Some(DEFAULT_COUNT_PREFIX.to_string()),
            require_count: false,
            ignore_prefixes: DEFAULT_IGNORE_PREFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            threads: 1,
            batch_size: 5000,
            description: String::new(),
        }
    }
}

impl Config {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse comma-separated ignore prefixes.
    ///
    /// Returns false and leaves the config unchanged if no prefix was given.
    pub fn parse_ignore_prefixes(&mut self, prefixes: &str) -> bool {
        let parsed: Vec<String> = prefixes
            .split(',')
            .filter(|p| !p.is_empty())
            .map(|p| p.to_string())
            .collect();

        if parsed.is_empty() {
            false
        } else {
            self.ignore_prefixes = parsed;
            true
        }
    }

    /// Name of a block-table column for `version` and `field` (e.g. `v5_start`).
    pub fn column_name(&self, version: &str, field: &str) -> String {
        format!("{}{}_{}", self.column_prefix, version, field)
    }

    /// Delimiter to use for the block table at `path`.
    pub fn delimiter_for(&self, path: &str) -> char {
        if let Some(delimiter) = self.delimiter {
            return delimiter;
        }
        let lower = path.to_lowercase();
        let lower = lower.strip_suffix(".gz").unwrap_or(&lower);
        if lower.ends_with(".tsv") {
            '\t'
        } else {
            ','
        }
    }

    /// Number of worker threads after resolving 0 to the core count.
    pub fn resolved_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }
}
