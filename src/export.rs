use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Workbook};

use crate::jsonl::{self, JSONL_EXT};
use crate::record::{LocaleMatch, Record};

/// Spreadsheet header, also the order of the projected fields.
pub const COLUMNS: [&str; 3] = ["id", "utt", "annot_utt"];

/// One spreadsheet row projected from a kept record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: String,
    pub utt: String,
    pub annot_utt: String,
}

impl Row {
    pub fn from_record(record: &Record) -> Self {
        Self {
            id: record.field("id").into_owned(),
            utt: record.field("utt").into_owned(),
            annot_utt: record.field("annot_utt").into_owned(),
        }
    }

    fn cells(&self) -> [&str; 3] {
        [self.id.as_str(), self.utt.as_str(), self.annot_utt.as_str()]
    }
}

/// Result of exporting one input file
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows: usize,
}

/// Keep the records of `language` and project them, in encounter order.
pub fn select_rows(records: &[Record], language: &str, policy: LocaleMatch) -> Vec<Row> {
    records
        .iter()
        .filter(|r| r.matches_language(language, policy))
        .map(Row::from_record)
        .collect()
}

/// `<language><file name without .jsonl>.xlsx`, e.g. `en` + `a.jsonl` -> `ena.xlsx`.
pub fn output_name(language: &str, file_name: &str) -> String {
    let stem = file_name.strip_suffix(JSONL_EXT).unwrap_or(file_name);
    format!("{language}{stem}.xlsx")
}

/// Write `rows` under a bold header row on `Sheet1`, overwriting `path`.
/// The same rows always give the same bytes.
pub fn write_workbook(path: &Path, rows: &[Row]) -> Result<()> {
    let mut workbook = Workbook::new();
    // otherwise core.xml carries the wall-clock time of the save
    let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();

    for (col, name) in COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, u16::try_from(col)?, *name, &header)?;
    }

    for (idx, row) in rows.iter().enumerate() {
        let sheet_row = u32::try_from(idx + 1)?;
        for (col, value) in row.cells().into_iter().enumerate() {
            // leave blank rather than storing empty strings
            if !value.is_empty() {
                sheet.write_string(sheet_row, u16::try_from(col)?, value)?;
            }
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Writing {}", path.display()))?;
    Ok(())
}

/// Export one JSONL file to `output_dir`.
pub fn export_file(
    input: &Path,
    output_dir: &Path,
    language: &str,
    policy: LocaleMatch,
) -> Result<ExportedFile> {
    let file_name = input
        .file_name()
        .and_then(|s| s.to_str())
        .with_context(|| format!("Unusable file name {}", input.display()))?;

    let records = jsonl::read_records(input)?;
    debug!("{}: {} records", input.display(), records.len());

    let rows = select_rows(&records, language, policy);
    if rows.is_empty() {
        warn!("No '{language}' records in {}", input.display());
    }

    let output = output_dir.join(output_name(language, file_name));
    write_workbook(&output, &rows)?;
    info!(
        "Exported {} rows from {} -> {}",
        rows.len(),
        input.display(),
        output.display()
    );

    Ok(ExportedFile {
        input: input.to_path_buf(),
        output,
        rows: rows.len(),
    })
}

/// Export every `.jsonl` file of `input_dir`. `on_file` runs after each
/// spreadsheet is written. The first error aborts the run.
pub fn export_dir<F>(
    input_dir: &Path,
    output_dir: &Path,
    language: &str,
    policy: LocaleMatch,
    mut on_file: F,
) -> Result<Vec<ExportedFile>>
where
    F: FnMut(&ExportedFile),
{
    create_dir_all(output_dir)
        .with_context(|| format!("Creating {}", output_dir.display()))?;

    let inputs = jsonl::list_jsonl_files(input_dir)?;
    if inputs.is_empty() {
        warn!("No .jsonl files in {}", input_dir.display());
    }

    let mut exported = Vec::with_capacity(inputs.len());
    for input in &inputs {
        let done = export_file(input, output_dir, language, policy)?;
        on_file(&done);
        exported.push(done);
    }
    Ok(exported)
}
