/*
cargo run --bin split_shards

cargo run --bin split_shards -- \
    -i dataset/data \
    -o output_jsonl \
    -l en,sw,de \
    -p test,train,dev
*/

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use massive_prep::shard::{self, ShardSet, DEFAULT_LANGUAGES, DEFAULT_PARTITIONS};
use massive_prep::{logging, LocaleMatch};
use std::path::PathBuf;

// Split JSONL files into one file per language and partition.
#[derive(Parser, Debug)]
#[command(version, about = "Separate JSONL records per language and partition")]
struct Cli {
    // Directory containing the original JSONL files
    #[arg(short, long, default_value = "dataset/data")]
    input_dir: PathBuf,

    // Directory the <language>-<partition>.jsonl files are written to
    #[arg(short, long, default_value = "output_jsonl")]
    output_dir: PathBuf,

    // Language codes, comma separated
    #[arg(short, long, value_delimiter = ',', default_values = DEFAULT_LANGUAGES)]
    languages: Vec<String>,

    // Partitions, comma separated
    #[arg(short, long, value_delimiter = ',', default_values = DEFAULT_PARTITIONS)]
    partitions: Vec<String>,

    // How the locale is compared with each language code
    #[arg(long, value_enum, default_value_t = LocaleMatch::Subtag)]
    locale_match: LocaleMatch,

    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_dir, "split_shards", false)?;
    info!("Starting shard split");
    info!("Input dir: {:?}", cli.input_dir);
    info!("Output dir: {:?}", cli.output_dir);
    info!(
        "Languages: {:?}, partitions: {:?} ({:?} match)",
        cli.languages, cli.partitions, cli.locale_match
    );

    let shards = ShardSet::new(
        cli.languages.as_slice(),
        cli.partitions.as_slice(),
        cli.locale_match,
    );

    let bar = ProgressBar::new(shards.keys().len() as u64);
    bar.set_style(ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} shards",
    )?);

    let written = shard::split_dir(&cli.input_dir, &cli.output_dir, shards, |done| {
        bar.inc(1);
        bar.suspend(|| println!("Generated {}", done.key.file_name()));
    })?;
    bar.finish_and_clear();

    let total: usize = written.iter().map(|s| s.records).sum();
    info!("Wrote {} shard(s), {} record(s) in total", written.len(), total);

    println!("Separate JSONL files generated for each language and partition.");
    Ok(())
}
