//! Command handlers

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lab_core::calculations::compression::{derive_set, CompressionSetResult};
use lab_core::calculations::{AREA_PLACES, DENSITY_PLACES, STRENGTH_PLACES};
use lab_core::file_io::{load_record, JsonDirectorySource, ObservationSource};
use lab_core::layout::{ReportDocument, NOT_AVAILABLE};
use lab_core::pdf::{render_pdf, to_typst_source};
use lab_core::profile::LabProfile;
use lab_core::report::{
    compose_cube_report, compose_sheet_report, report_filename, ReportContext, SheetRecord, SheetReport, TestRecord,
};
use tracing::{debug, info};

use crate::cli::{Cli, Commands, OutputFormat, RecordArgs};

/// A record file as given on the command line.
enum LoadedRecord {
    Cube(TestRecord),
    Sheet(SheetRecord),
}

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let profile = LabProfile::load_or_default(cli.profile.as_deref()).context("loading lab profile")?;
    let context = cli.date.map(ReportContext::new).unwrap_or_else(ReportContext::today);

    match &cli.command {
        Commands::Derive { input } => cmd_derive(&load(input)?, cli.format),
        Commands::Layout { input } => {
            let document = compose(&load(input)?, &profile, &context)?;
            println!("{}", serde_json::to_string_pretty(&document)?);
            Ok(())
        }
        Commands::Typst { input } => {
            let document = compose(&load(input)?, &profile, &context)?;
            print!("{}", to_typst_source(&document));
            Ok(())
        }
        Commands::Render { input, output } => {
            let record = load(input)?;
            let document = compose(&record, &profile, &context)?;
            let path = output.clone().unwrap_or_else(|| default_output(&record));
            write_pdf(&document, &path)
        }
        Commands::Fetch { store, id, output } => {
            let record = JsonDirectorySource::new(store)
                .fetch(*id)
                .with_context(|| format!("fetching test request {} from {}", id, store.display()))?;
            let document = compose_cube_report(&record, &profile, &context);
            let path = output.clone().unwrap_or_else(|| PathBuf::from(report_filename(&record)));
            write_pdf(&document, &path)
        }
    }
}

fn load(input: &RecordArgs) -> Result<LoadedRecord> {
    let path = input.record.as_path();
    if input.sheet {
        let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let sheet: SheetRecord =
            serde_json::from_str(&text).with_context(|| format!("parsing sheet record {}", path.display()))?;
        Ok(LoadedRecord::Sheet(sheet))
    } else {
        let record = load_record(path).with_context(|| format!("loading record {}", path.display()))?;
        Ok(LoadedRecord::Cube(record))
    }
}

fn compose(record: &LoadedRecord, profile: &LabProfile, context: &ReportContext) -> Result<ReportDocument> {
    match record {
        LoadedRecord::Cube(record) => Ok(compose_cube_report(record, profile, context)),
        LoadedRecord::Sheet(sheet) => {
            let report = SheetReport::from_record(sheet).context("choosing sheet layout")?;
            Ok(compose_sheet_report(&report, profile, context))
        }
    }
}

fn default_output(record: &LoadedRecord) -> PathBuf {
    match record {
        LoadedRecord::Cube(record) => PathBuf::from(report_filename(record)),
        LoadedRecord::Sheet(sheet) => PathBuf::from(format!("{}.pdf", sheet.sheet.test_name().replace(' ', "_"))),
    }
}

fn write_pdf(document: &ReportDocument, path: &Path) -> Result<()> {
    let bytes = render_pdf(document).context("rendering PDF")?;
    fs::write(path, &bytes).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), pages = document.page_count(), bytes = bytes.len(), "wrote report");
    println!("{}", path.display());
    Ok(())
}

fn cmd_derive(record: &LoadedRecord, format: OutputFormat) -> Result<()> {
    print!("{}", derive_text(record, format)?);
    Ok(())
}

fn derive_text(record: &LoadedRecord, format: OutputFormat) -> Result<String> {
    let text = match (record, format) {
        (LoadedRecord::Cube(record), OutputFormat::Json) => {
            format!("{}\n", serde_json::to_string_pretty(&derive_set(&record.specimens()))?)
        }
        (LoadedRecord::Cube(record), OutputFormat::Table) => compression_table(&derive_set(&record.specimens())),
        (LoadedRecord::Sheet(sheet), OutputFormat::Json) => {
            format!("{}\n", serde_json::to_string_pretty(&sheet.sheet.derive())?)
        }
        (LoadedRecord::Sheet(sheet), OutputFormat::Table) => match SheetReport::from_record(sheet) {
            Ok(report) => {
                let mut out = format!("{}\n", report.title);
                for field in &report.results {
                    out.push_str(&format!("  {:<32} {}\n", field.label, field.value));
                }
                out
            }
            // Sheets without a printed layout still show their derived values
            Err(e) => {
                debug!(error = %e, "no result table for sheet, printing derived values");
                format!(
                    "{}\n{}\n",
                    sheet.sheet.test_name(),
                    serde_json::to_string_pretty(&sheet.sheet.derive())?
                )
            }
        },
    };
    Ok(text)
}

fn compression_table(derived: &CompressionSetResult) -> String {
    let mut out = format!(
        "{:<10} {:>12} {:>14} {:>16}\n",
        "ID", "Area (mm2)", "Density", "Strength (MPa)"
    );
    for row in &derived.rows {
        out.push_str(&format!(
            "{:<10} {:>12} {:>14} {:>16}\n",
            row.id_mark,
            row.area.display_or(AREA_PLACES, NOT_AVAILABLE),
            row.density.display_or(DENSITY_PLACES, NOT_AVAILABLE),
            row.strength.display_or(STRENGTH_PLACES, NOT_AVAILABLE),
        ));
    }
    out.push_str(&format!(
        "Average compressive strength: {} MPa\n",
        derived.average_strength.display_or(STRENGTH_PLACES, NOT_AVAILABLE)
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use lab_core::file_io::save_record;
    use tempfile::tempdir;

    const CUBE_RECORD: &str = r#"{
        "customer": { "name": "Ramesh Constructions", "address": "Solapur" },
        "test_request": { "job_number": 1042, "receipt_date": "2025-09-04", "test_type": "CC" },
        "main_test": { "casting_date": "2025-08-07", "testing_date": "2025-09-04", "grade": "M25" },
        "specimens": [
            { "id_mark": "C1", "length": 150, "width": 150, "height": 150, "weight": 8.5, "max_load": 562.5 }
        ]
    }"#;

    const FREE_SWELL_SHEET: &str = r#"{
        "sheet": {
            "type": "FreeSwell",
            "replicates": [
                { "water_volume": 15, "kerosene_volume": 10 },
                { "water_volume": "", "kerosene_volume": 10 }
            ]
        }
    }"#;

    fn run(args: &[&str]) -> Result<()> {
        execute(Cli::try_parse_from(args.iter().copied())?)
    }

    fn assert_pdf(path: &Path) {
        let bytes = fs::read(path).unwrap();
        assert!(bytes.starts_with(b"%PDF"), "{} is not a PDF", path.display());
    }

    #[test]
    fn test_derive_table_for_sheet_without_layout() {
        let sheet: SheetRecord = serde_json::from_str(FREE_SWELL_SHEET).unwrap();
        assert!(SheetReport::from_record(&sheet).is_err());

        let text = derive_text(&LoadedRecord::Sheet(sheet), OutputFormat::Table).unwrap();
        assert!(text.starts_with("Free Swell Index"), "unexpected heading: {}", text);
        assert!(text.contains("\"type\": \"FreeSwell\""));
        assert!(text.contains("50.0"));
    }

    #[test]
    fn test_derive_command_accepts_free_swell_sheet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("free_swell.json");
        fs::write(&path, FREE_SWELL_SHEET).unwrap();
        let path = path.to_string_lossy().into_owned();

        run(&["lab", "derive", &path, "--sheet"]).unwrap();
        run(&["lab", "derive", &path, "--sheet", "--format", "json"]).unwrap();
    }

    #[test]
    fn test_derive_table_for_cube_record() {
        let record: TestRecord = serde_json::from_str(CUBE_RECORD).unwrap();
        let text = derive_text(&LoadedRecord::Cube(record), OutputFormat::Table).unwrap();
        assert!(text.contains("22500.0"));
        assert!(text.contains("Average compressive strength: 25.0 MPa"));
    }

    #[test]
    fn test_render_writes_pdf() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("record.json");
        fs::write(&input, CUBE_RECORD).unwrap();
        let output = dir.path().join("report.pdf");

        run(&[
            "lab",
            "render",
            &input.to_string_lossy(),
            "-o",
            &output.to_string_lossy(),
            "--date",
            "2025-09-05",
        ])
        .unwrap();
        assert_pdf(&output);
    }

    #[test]
    fn test_fetch_renders_stored_record() {
        let dir = tempdir().unwrap();
        let store = JsonDirectorySource::new(dir.path());
        let record: TestRecord = serde_json::from_str(CUBE_RECORD).unwrap();
        save_record(&record, &store.path_for(1042)).unwrap();
        let output = dir.path().join(report_filename(&record));

        run(&[
            "lab",
            "fetch",
            "--store",
            &dir.path().to_string_lossy(),
            "--id",
            "1042",
            "-o",
            &output.to_string_lossy(),
            "--date",
            "2025-09-05",
        ])
        .unwrap();
        assert_pdf(&output);
    }

    #[test]
    fn test_fetch_missing_record_fails() {
        let dir = tempdir().unwrap();
        let err = run(&["lab", "fetch", "--store", &dir.path().to_string_lossy(), "--id", "7"]).unwrap_err();
        assert!(format!("{:#}", err).contains("Test record not found: 7"));
    }
}
