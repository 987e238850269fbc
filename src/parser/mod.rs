//! Loaders for block tables and query lists.

pub mod blocks;
pub mod queries;
pub mod util;

pub use blocks::{parse_block_table, parse_block_table_reader};
pub use queries::{parse_query_list, parse_query_list_reader};
