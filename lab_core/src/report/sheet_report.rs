//! # Observation Sheet Reports
//!
//! Single-table reports for tests other than concrete cubes. A
//! [`SheetReport`] is a title, a handful of identification fields, one
//! [`DataTable`] of observations and the highlighted final results. Builders
//! exist for the Atterberg limits and liquid admixture sheets; other sheet
//! kinds are derived (see [`crate::calculations`]) but have no printed layout.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::record::display_date;
use super::ReportContext;
use crate::calculations::admixture::RelativeDensityInput;
use crate::calculations::soil::{AtterbergInput, MoistureTrial};
use crate::calculations::{ObservationSheet, MOISTURE_PLACES, RELATIVE_DENSITY_PLACES};
use crate::errors::{LabError, LabResult};
use crate::layout::{
    or_na, Column, DataTable, Field, KeyValueRow, ReportBuilder, ReportDocument, RowPair, SignatureBlock,
    TermsBlock, NOT_AVAILABLE,
};
use crate::profile::LabProfile;
use crate::readings::Reading;

/// Identification block printed above the observation table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetInfo {
    pub sample_description: Option<String>,
    pub sample_code: Option<String>,
    pub receipt_date: Option<String>,
    pub testing_date: Option<String>,
    pub test_method: Option<String>,
    pub environment: Option<String>,
}

/// A stored observation sheet with its identification fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetRecord {
    #[serde(default)]
    pub info: SheetInfo,
    pub sheet: ObservationSheet,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetReport {
    pub title: String,
    pub info: Vec<Field>,
    pub table: DataTable,
    pub results: Vec<Field>,
}

const ATTERBERG_METHOD: &str = "IS 2720 (Part 5):1985";
const ADMIXTURE_METHOD: &str = "IS 9103:1999";
const ADMIXTURE_ENVIRONMENT: &str = "Laboratory Conditions";

impl SheetReport {
    /// Pick the layout for a stored sheet.
    pub fn from_record(record: &SheetRecord) -> LabResult<Self> {
        match &record.sheet {
            ObservationSheet::AtterbergLimits(input) => Ok(atterberg_sheet(input, &record.info)),
            ObservationSheet::AdmixtureDensity(input) => Ok(admixture_sheet(input, &record.info)),
            other => Err(LabError::invalid_input(
                "sheet",
                other.test_name(),
                "no printed layout for this test",
            )),
        }
    }
}

fn info_fields(info: &SheetInfo, default_method: &str, default_environment: &str) -> Vec<Field> {
    let or_default = |value: &Option<String>, default: &str| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
            .to_string()
    };
    vec![
        Field::new("Sample Description", or_na(info.sample_description.as_deref())),
        Field::new("Sample Test Code", or_na(info.sample_code.as_deref())),
        Field::new("Date of Receipt", display_date(info.receipt_date.as_deref())),
        Field::new("Date of Testing", display_date(info.testing_date.as_deref())),
        Field::new("Test Method", or_default(&info.test_method, default_method)),
        Field::new("Environment", or_default(&info.environment, default_environment)),
    ]
}

fn weighing_cells(trial: &MoistureTrial, moisture: Reading) -> [String; 4] {
    [
        trial.container_weight.raw_or(""),
        trial.wet_weight.raw_or(""),
        trial.dry_weight.raw_or(""),
        moisture.display(MOISTURE_PLACES),
    ]
}

/// Liquid limit and plastic limit determinations on one table.
pub fn atterberg_sheet(input: &AtterbergInput, info: &SheetInfo) -> SheetReport {
    let derived = input.derive();

    let columns = vec![
        Column::new("Determination", 22.0),
        Column::new("Container No.", 22.0),
        Column::new("No. of Blows", 18.0),
        Column::new("Wt. of Container (W1) g", 30.0),
        Column::new("Wt. of Container + Wet Soil (W2) g", 34.0),
        Column::new("Wt. of Container + Dry Soil (W3) g", 34.0),
        Column::new("Moisture Content (%)", 30.0),
    ];

    let liquid = input
        .liquid_limit_trials
        .iter()
        .zip(&derived.liquid_trial_moisture)
        .enumerate()
        .map(|(i, (trial, moisture))| {
            let mut row = vec![
                format!("LL {}", i + 1),
                trial.weighing.container_no.clone().unwrap_or_default(),
                trial.blows.raw_or(""),
            ];
            row.extend(weighing_cells(&trial.weighing, *moisture));
            row
        });
    let plastic = input
        .plastic_limit_trials
        .iter()
        .zip(&derived.plastic_trial_moisture)
        .enumerate()
        .map(|(i, (trial, moisture))| {
            let mut row = vec![
                format!("PL {}", i + 1),
                trial.container_no.clone().unwrap_or_default(),
                String::new(),
            ];
            row.extend(weighing_cells(trial, *moisture));
            row
        });

    let plasticity_index = if derived.non_plastic {
        "NP".to_string()
    } else {
        derived.plasticity_index.display_or(MOISTURE_PLACES, NOT_AVAILABLE)
    };

    SheetReport {
        title: "LIQUID LIMIT AND PLASTIC LIMIT".to_string(),
        info: info_fields(info, ATTERBERG_METHOD, NOT_AVAILABLE),
        table: DataTable {
            title: Some("Observations".to_string()),
            columns,
            rows: liquid.chain(plastic).collect(),
        },
        results: vec![
            Field::new(
                "Liquid Limit (%)",
                derived.liquid_limit.display_or(MOISTURE_PLACES, NOT_AVAILABLE),
            )
            .highlighted(),
            Field::new(
                "Plastic Limit (%)",
                derived.plastic_limit.display_or(MOISTURE_PLACES, NOT_AVAILABLE),
            )
            .highlighted(),
            Field::new("Plasticity Index (%)", plasticity_index).highlighted(),
        ],
    }
}

/// Relative density of a liquid admixture by hydrometer.
pub fn admixture_sheet(input: &RelativeDensityInput, info: &SheetInfo) -> SheetReport {
    let derived = input.derive();
    let rows = input
        .readings
        .iter()
        .enumerate()
        .map(|(i, reading)| {
            let temperature = input.temperatures.get(i).copied().unwrap_or_default();
            vec![
                (i + 1).to_string(),
                temperature.raw_or(""),
                reading.display(RELATIVE_DENSITY_PLACES),
            ]
        })
        .collect();

    SheetReport {
        title: "RELATIVE DENSITY OF LIQUID ADMIXTURE".to_string(),
        info: info_fields(info, ADMIXTURE_METHOD, ADMIXTURE_ENVIRONMENT),
        table: DataTable {
            title: Some("TEST RESULT".to_string()),
            columns: vec![
                Column::new("Sr. No.", 20.0),
                Column::new("Temperature of Liquid (°C)", 50.0),
                Column::new("Relative Density (Hydrometer)", 50.0),
            ],
            rows,
        },
        results: vec![Field::new(
            "Average Relative Density",
            derived.average.display_or(RELATIVE_DENSITY_PLACES, NOT_AVAILABLE),
        )
        .highlighted()],
    }
}

/// Lay out an observation sheet report.
pub fn compose_sheet_report(sheet: &SheetReport, profile: &LabProfile, context: &ReportContext) -> ReportDocument {
    let mut builder = ReportBuilder::new(profile.frame(), Some(sheet.title.as_str()));

    let mut fields = vec![Field::new("Date of Report", context.report_date_text())];
    fields.extend(sheet.info.iter().cloned());
    for pair in fields.chunks(2) {
        match pair {
            [left, right] => builder.push(&RowPair::new(left.clone(), right.clone())),
            [single] => builder.push(&KeyValueRow::split(single.clone())),
            _ => continue,
        };
    }

    builder.push(&sheet.table);
    for result in &sheet.results {
        builder.push(&KeyValueRow::full(result.clone()));
    }
    builder.push(&TermsBlock {
        heading: profile.terms_heading.clone(),
        terms: profile.terms.clone(),
    });
    builder.push(&SignatureBlock {
        reviewer: profile.reviewer.clone(),
        authorizer: profile.authorizer.clone(),
    });

    let document = builder.finish();
    info!(title = %sheet.title, rows = sheet.table.rows.len(), pages = document.page_count(), "composed sheet report");
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::soil::LiquidLimitTrial;
    use crate::layout::Section;
    use crate::layout::TimesMetrics;
    use chrono::NaiveDate;

    fn ll_trial(blows: f64, container: f64, wet: f64, dry: f64) -> LiquidLimitTrial {
        LiquidLimitTrial {
            blows: Reading::new(blows),
            weighing: MoistureTrial::new(container, wet, dry),
        }
    }

    fn atterberg() -> AtterbergInput {
        AtterbergInput {
            liquid_limit_trials: vec![ll_trial(25.0, 20.0, 50.0, 40.0)],
            plastic_limit_trials: vec![MoistureTrial::new(20.0, 32.0, 30.0), MoistureTrial::new(20.0, 32.0, 30.0)],
        }
    }

    #[test]
    fn test_atterberg_sheet_results() {
        let sheet = atterberg_sheet(&atterberg(), &SheetInfo::default());
        // LL: 10 / 20 = 50%, PL: 2 / 10 = 20%
        assert_eq!(sheet.results[0].value, "50.00");
        assert_eq!(sheet.results[1].value, "20.00");
        assert_eq!(sheet.results[2].value, "30.00");
        assert_eq!(sheet.table.rows.len(), 3);
        assert_eq!(sheet.table.rows[0][0], "LL 1");
        assert_eq!(sheet.table.rows[2][0], "PL 2");
        assert_eq!(sheet.table.rows[2][2], "");
    }

    #[test]
    fn test_non_plastic_prints_np() {
        let mut input = atterberg();
        input.plastic_limit_trials = vec![MoistureTrial::new(20.0, 40.0, 30.0)];
        let sheet = atterberg_sheet(&input, &SheetInfo::default());
        assert_eq!(sheet.results[2].value, "NP");
    }

    #[test]
    fn test_admixture_sheet() {
        let input = RelativeDensityInput {
            temperatures: vec![Reading::new(27.0)],
            readings: vec![Reading::new(1.15), Reading::new(1.17)],
        };
        let sheet = admixture_sheet(&input, &SheetInfo::default());
        assert_eq!(sheet.results[0].value, "1.1600");
        assert_eq!(sheet.table.rows[0], vec!["1", "27", "1.1500"]);
        assert_eq!(sheet.table.rows[1][1], "");
        assert!(sheet.info.iter().any(|f| f.value == "IS 9103:1999"));
    }

    #[test]
    fn test_table_fits_content_width() {
        let sheet = atterberg_sheet(&atterberg(), &SheetInfo::default());
        assert!(sheet.table.width() <= 190.0);
        assert!(sheet.table.height(&TimesMetrics) > 0.0);
    }

    #[test]
    fn test_unsupported_sheet_is_invalid_input() {
        let record: SheetRecord = serde_json::from_str(r#"{"sheet": {"type": "FreeSwell", "replicates": []}}"#).unwrap();
        let err = SheetReport::from_record(&record).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_compose_sheet_report() {
        let record: SheetRecord = serde_json::from_str(
            r#"{"info": {"sample_code": "LA-7"},
                "sheet": {"type": "AdmixtureDensity", "readings": ["1.150", "1.170"]}}"#,
        )
        .unwrap();
        let sheet = SheetReport::from_record(&record).unwrap();
        let context = ReportContext::new(NaiveDate::from_ymd_opt(2025, 9, 5).unwrap());
        let doc = compose_sheet_report(&sheet, &LabProfile::default(), &context);
        assert_eq!(doc.page_count(), 1);
        let texts: Vec<_> = doc.pages[0].texts().collect();
        assert!(texts.contains(&"RELATIVE DENSITY OF LIQUID ADMIXTURE"));
        assert!(texts.contains(&"LA-7"));
        assert!(texts.contains(&"1.1600"));
        assert!(texts.contains(&"Page 1 of 1"));
    }
}
