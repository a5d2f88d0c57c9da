/*
cargo run --bin excel_export -- \
    -i data/dataset \
    -o outputs \
    -l en \
    -v

cargo run --bin excel_export -- -l sw --locale-match prefix
*/

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use massive_prep::{export, logging, LocaleMatch};
use std::path::PathBuf;

// Process JSONL files and save the records of one language to Excel files.
#[derive(Parser, Debug)]
#[command(version, about = "Process JSONL files and save relevant data to Excel files")]
struct Cli {
    // Directory containing JSONL files
    #[arg(short, long, default_value = "./data/dataset")]
    input_dir: PathBuf,

    // Output directory for Excel files (created if missing)
    #[arg(short, long, default_value = "./outputs")]
    output_dir: PathBuf,

    // Language code to filter JSONL records
    #[arg(short, long, default_value = "en")]
    language: String,

    // Print one line per processed file
    #[arg(short, long)]
    verbose: bool,

    // How the locale is compared with the language code
    #[arg(long, value_enum, default_value_t = LocaleMatch::Subtag)]
    locale_match: LocaleMatch,

    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = logging::init(&cli.log_dir, "excel_export", cli.verbose)?;
    info!("Starting excel export");
    info!("Input dir: {:?}", cli.input_dir);
    info!("Output dir: {:?}", cli.output_dir);
    info!("Language: {} ({:?} match)", cli.language, cli.locale_match);

    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] {pos} file(s) {msg}",
    )?);

    let exported = export::export_dir(
        &cli.input_dir,
        &cli.output_dir,
        &cli.language,
        cli.locale_match,
        |done| {
            bar.inc(1);
            bar.set_message(done.input.display().to_string());
            if cli.verbose {
                bar.suspend(|| {
                    println!(
                        "Processed {} and saved as {}",
                        file_name(&done.input),
                        file_name(&done.output)
                    )
                });
            }
        },
    )?;
    bar.finish_and_clear();

    let rows: usize = exported.iter().map(|f| f.rows).sum();
    info!("Exported {} file(s), {} row(s) in total", exported.len(), rows);

    println!(
        "Excel files generated for each JSONL file and stored in '{}'",
        cli.output_dir.display()
    );
    if cli.verbose {
        println!("Log file: {:?}", log_path);
    }
    Ok(())
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
