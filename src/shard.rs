use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::jsonl;
use crate::record::{LocaleMatch, Record};

pub const DEFAULT_LANGUAGES: [&str; 3] = ["en", "sw", "de"];
pub const DEFAULT_PARTITIONS: [&str; 3] = ["test", "train", "dev"];

/// One (language, partition) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShardKey {
    pub language: String,
    pub partition: String,
}

impl ShardKey {
    pub fn new(language: impl Into<String>, partition: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            partition: partition.into(),
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}-{}.jsonl", self.language, self.partition)
    }

    pub fn accepts(&self, record: &Record, policy: LocaleMatch) -> bool {
        record.matches_language(&self.language, policy) && record.partition() == self.partition
    }
}

/// A shard written to disk
#[derive(Debug, Clone)]
pub struct WrittenShard {
    pub key: ShardKey,
    pub path: PathBuf,
    pub records: usize,
}

/// Records bucketed by shard key, filled in one pass over the inputs.
///
/// Keys follow the cross-product order: languages outer, partitions inner.
/// Each bucket keeps encounter order. A record goes into every bucket whose
/// key accepts it, which under `LocaleMatch::Prefix` can be more than one.
#[derive(Debug)]
pub struct ShardSet {
    policy: LocaleMatch,
    keys: Vec<ShardKey>,
    buckets: Vec<Vec<Record>>,
}

impl ShardSet {
    pub fn new<L, P>(languages: &[L], partitions: &[P], policy: LocaleMatch) -> Self
    where
        L: AsRef<str>,
        P: AsRef<str>,
    {
        let keys: Vec<ShardKey> = languages
            .iter()
            .flat_map(|lang| {
                partitions
                    .iter()
                    .map(move |part| ShardKey::new(lang.as_ref(), part.as_ref()))
            })
            .collect();
        let buckets = vec![Vec::new(); keys.len()];
        Self {
            policy,
            keys,
            buckets,
        }
    }

    pub fn keys(&self) -> &[ShardKey] {
        &self.keys
    }

    pub fn bucket(&self, key: &ShardKey) -> Option<&[Record]> {
        self.keys
            .iter()
            .position(|k| k == key)
            .map(|idx| self.buckets[idx].as_slice())
    }

    /// Bucket one record; returns how many shards took it.
    pub fn insert(&mut self, record: &Record) -> usize {
        let mut taken = 0;
        for (key, bucket) in self.keys.iter().zip(self.buckets.iter_mut()) {
            if key.accepts(record, self.policy) {
                bucket.push(record.clone());
                taken += 1;
            }
        }
        taken
    }

    /// Read one JSONL file and bucket all of its records.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<usize> {
        let records = jsonl::read_records(path)?;
        let taken: usize = records.iter().map(|r| self.insert(r)).sum();
        debug!(
            "{}: {} records, {} bucketed",
            path.display(),
            records.len(),
            taken
        );
        Ok(records.len())
    }

    /// Write every shard to `output_dir` in key order. `on_written` runs after each file.
    pub fn write_all<F>(&self, output_dir: &Path, mut on_written: F) -> Result<Vec<WrittenShard>>
    where
        F: FnMut(&WrittenShard),
    {
        let mut written = Vec::with_capacity(self.keys.len());
        for (key, bucket) in self.keys.iter().zip(&self.buckets) {
            let path = output_dir.join(key.file_name());
            let records = jsonl::write_records(&path, bucket)?;
            info!("Wrote {records} records to {}", path.display());

            let shard = WrittenShard {
                key: key.clone(),
                path,
                records,
            };
            on_written(&shard);
            written.push(shard);
        }
        Ok(written)
    }
}

/// Split every `.jsonl` file of `input_dir` into per-language/per-partition
/// shards under `output_dir`. All inputs are read before any shard is written.
/// Takes `shards` by value, so each set of buckets is flushed once.
pub fn split_dir<F>(
    input_dir: &Path,
    output_dir: &Path,
    mut shards: ShardSet,
    on_written: F,
) -> Result<Vec<WrittenShard>>
where
    F: FnMut(&WrittenShard),
{
    create_dir_all(output_dir)
        .with_context(|| format!("Creating {}", output_dir.display()))?;

    let inputs = jsonl::list_jsonl_files(input_dir)?;
    if inputs.is_empty() {
        warn!("No .jsonl files in {}", input_dir.display());
    }
    for input in &inputs {
        shards.extend_from_file(input)?;
    }

    shards.write_all(output_dir, on_written)
}
