//! CLI entry point for convert-annotation.

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use convert_annotation::config::{Config, DEFAULT_COUNT_PREFIX};
use convert_annotation::convert::{CoordinateConverter, Query};
use convert_annotation::output::write_results;
use convert_annotation::parser::{parse_block_table, parse_query_list};
use convert_annotation::pipeline;

/// Genomic coordinate conversion between annotation versions.
///
/// Converts ranges from one annotation version to another using a table of
/// aligned blocks.
#[derive(Parser, Debug)]
#[command(name = "convert-annotation")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Block table (CSV or TSV, optionally gzipped)
    #[arg(short = 'm', long = "map")]
    map: PathBuf,

    /// Version the queries are given in
    #[arg(short = 'a', long = "from")]
    from: String,

    /// Version to convert into
    #[arg(short = 'b', long = "to")]
    to: String,

    /// Query list, one `{sequence}:{start}..{end}` per line
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// Single query `{sequence}:{start}..{end}`
    #[arg(short = 'r', long = "region")]
    region: Option<String>,

    /// Single query sequence name (with --start and --end)
    #[arg(long = "chrom")]
    chrom: Option<String>,

    /// Single query start (1-based, inclusive)
    #[arg(long = "start", allow_negative_numbers = true)]
    start: Option<i64>,

    /// Single query end (1-based, inclusive)
    #[arg(long = "end", allow_negative_numbers = true)]
    end: Option<i64>,

    /// Output CSV file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Label describing the block table
    #[arg(short = 'd', long = "description", default_value = "")]
    description: String,

    /// Query-list line prefixes to skip (comma-separated)
    #[arg(long = "ignore", default_value = "itemnum,/*")]
    ignore: String,

    /// Prefix of the query-list line declaring the item count
    #[arg(long = "count-prefix", default_value = DEFAULT_COUNT_PREFIX)]
    count_prefix: String,

    /// Do not look for an item-count line
    #[arg(long = "no-count", conflicts_with = "require_count")]
    no_count: bool,

    /// Fail if the query list has no item-count line
    #[arg(long = "require-count")]
    require_count: bool,

    /// Block-table delimiter (inferred from the file name by default)
    #[arg(long = "delimiter")]
    delimiter: Option<char>,

    /// Prefix before version ids in block-table column names
    #[arg(long = "column-prefix", default_value = "v")]
    column_prefix: String,

    /// Number of worker threads (0 = auto-detect, 1 = sequential)
    #[arg(long = "threads", short = 'j', default_value = "1")]
    threads: usize,

    /// Queries per work item in parallel mode
    #[arg(long = "batch-size", default_value = "5000")]
    batch_size: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    // Validate inputs
    if !args.map.exists() {
        bail!("Block table not found: {}", args.map.display());
    }
    if let Some(input) = &args.input {
        if !input.exists() {
            bail!("Query list not found: {}", input.display());
        }
    }
    if args.batch_size == 0 {
        bail!("Batch size must be greater than 0");
    }

    let fields = match (&args.chrom, args.start, args.end) {
        (None, None, None) => None,
        (Some(chrom), Some(start), Some(end)) => Some((chrom.clone(), start, end)),
        _ => bail!("--chrom, --start and --end must be given together"),
    };
    if args.input.is_some() && (args.region.is_some() || fields.is_some()) {
        bail!("Give either --input or a single query, not both");
    }

    // Build configuration
    let mut config = Config::new();
    config.column_prefix = args.column_prefix.clone();
    config.delimiter = args.delimiter;
    config.count_prefix = if args.no_count {
        None
    } else {
        Some(args.count_prefix.clone())
    };
    config.require_count = args.require_count;
    if !config.parse_ignore_prefixes(&args.ignore) {
        config.ignore_prefixes.clear();
    }
    config.threads = args.threads;
    config.batch_size = args.batch_size;
    config.description = args.description.clone();

    // Parse block table
    info!("Parsing block table: {}", args.map.display());
    let table = parse_block_table(&args.map, &args.from, &args.to, &config)?;
    info!("{}", table);
    let converter = CoordinateConverter::new(table);

    let mut writer: Box<dyn Write + Send> = match &args.output {
        Some(path) => {
            info!("Writing output to: {}", path.display());
            let file = File::create(path).context("Failed to create output file")?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout())),
    };

    match &args.input {
        Some(input) => {
            info!("Processing query list: {}", input.display());
            let queries = parse_query_list(input, &config)?;
            pipeline::run(&converter, &args.from, &queries, &mut writer, &config)?;
        }
        None => {
            let query = Query::from_parts(args.region.clone(), None, fields)?;
            let pair = converter.convert(&args.from, query)?;
            write_results(&mut writer, [&pair], &args.from, &args.to)?;
            writer.flush()?;
        }
    }

    info!("Done!");
    Ok(())
}
