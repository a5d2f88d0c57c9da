//! Filters and reshapes line-delimited JSON records of a locale-tagged NLU
//! dataset: per-file spreadsheet exports for one language (`excel_export`)
//! and per-language/per-partition JSONL shards (`split_shards`).

pub mod export;
pub mod jsonl;
pub mod logging;
pub mod record;
pub mod shard;

pub use record::{LocaleMatch, Record};
