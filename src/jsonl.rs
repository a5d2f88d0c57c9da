use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::record::Record;

pub const JSONL_EXT: &str = ".jsonl";

/// Regular files in `dir` whose name ends in `.jsonl`, sorted by name.
pub fn list_jsonl_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("Reading directory {}", dir.display()))?
    {
        let entry = entry.with_context(|| format!("Reading directory {}", dir.display()))?;
        let is_jsonl = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(JSONL_EXT));
        if is_jsonl && entry.path().is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Parse every non-blank line of `path` as a JSON object.
/// The first malformed line aborts with the file name and 1-based line number.
pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;

    let mut records = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: Record = serde_json::from_str(line)
            .with_context(|| format!("Parsing {} line {}", path.display(), idx + 1))?;
        records.push(record);
    }
    Ok(records)
}

/// Write one compact JSON object per line, overwriting `path`.
pub fn write_records<'a, I>(path: &Path, records: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a Record>,
{
    let file = File::create(path).with_context(|| format!("Creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    let mut written = 0usize;
    for record in records {
        serde_json::to_writer(&mut writer, record)
            .with_context(|| format!("Writing {}", path.display()))?;
        writer.write_all(b"\n")?;
        written += 1;
    }
    writer
        .flush()
        .with_context(|| format!("Writing {}", path.display()))?;
    Ok(written)
}
