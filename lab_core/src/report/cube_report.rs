//! Concrete cube compressive strength report.

use tracing::info;

use super::record::{display_date, TestRecord};
use super::ReportContext;
use crate::calculations::compression::{derive_set, CompressionSetResult};
use crate::calculations::{AREA_PLACES, DENSITY_PLACES, STRENGTH_PLACES};
use crate::layout::{
    or_na, CustomerBlock, Field, KeyValueRow, ReportBuilder, ReportDocument, ResultRow, ResultsTable, RowPair,
    Signatory, SignatureBlock, SpecimenRow, SpecimenTable, TermsBlock, NOT_AVAILABLE,
};
use crate::profile::LabProfile;

pub const RESULTS_TITLE: &str = "Test Result for Density and Compressive Strength of Concrete Cubes";

/// Lay out the cube test report for `record`.
///
/// Derived values (area, density, strength, average) are always recomputed
/// from the specimen measurements; any stored results are ignored.
pub fn compose_cube_report(record: &TestRecord, profile: &LabProfile, context: &ReportContext) -> ReportDocument {
    let specimens = record.specimens();
    let derived = derive_set(&specimens);
    let main = &record.main_test;
    let request = &record.test_request;
    let equipment = &profile.equipment;

    let mut builder = ReportBuilder::new(profile.frame(), Some(profile.report_title.as_str()));

    builder.push(&CustomerBlock {
        customer: format!("{}, {}", record.customer_name(), record.customer_address()),
        report_date: context.report_date_text(),
        ulr_number: or_na(request.ulr_number.as_deref()),
    });

    builder.push(&RowPair::new(
        Field::new("Reference Number", or_na(main.sample_code_number.as_deref())),
        Field::new("Job Code Number", or_na(request.job_number.as_deref())),
    ));
    builder.push(&KeyValueRow::full(Field::new(
        "Location/Structure Type",
        or_na(main.location_nature.as_deref()),
    )));

    let age = record
        .age_in_days()
        .value()
        .map(|days| format!("{:.0} Days", days))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    builder.push(&RowPair::new(
        Field::new("Date of Receipt", display_date(request.receipt_date.as_deref())),
        Field::new("Age of Specimen", age).highlighted(),
    ));
    builder.push(&RowPair::new(
        Field::new("Date of Casting", display_date(main.casting_date.as_deref())).highlighted(),
        Field::new("Date of Testing", display_date(main.testing_date.as_deref())),
    ));

    let specimen_type = record
        .specimen_type()
        .map(|t| t.label().to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    builder.push(&RowPair::new(
        Field::new("Type of Specimen", specimen_type),
        Field::new("Grade of Specimen", or_na(main.grade.as_deref())).highlighted(),
    ));
    builder.push(&RowPair::new(
        Field::new(
            "Condition of Specimen",
            main.cube_condition
                .clone()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| equipment.specimen_condition.clone()),
        ),
        Field::new("Curing Condition", or_na(main.curing_condition.as_deref())),
    ));
    builder.push(&KeyValueRow::full(Field::new(
        "Machine used for Testing",
        main.machine_used
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| equipment.machine.clone()),
    )));
    builder.push(&RowPair::new(
        Field::new("Capacity Range", equipment.capacity_range.clone()),
        Field::new("Calibration Due Date", equipment.calibration_due.clone()),
    ));
    builder.push(&RowPair::new(
        Field::new(
            "Test Method",
            main.test_method
                .clone()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| equipment.test_method.clone()),
        ),
        Field::new("Environmental condition", equipment.environment.clone()),
    ));

    builder.push(&specimen_table(record, &specimens, &derived));
    builder.push(&results_table(&derived));
    builder.push(&TermsBlock {
        heading: profile.terms_heading.clone(),
        terms: profile.terms.clone(),
    });
    builder.push(&SignatureBlock {
        reviewer: reviewer(record, profile),
        authorizer: profile.authorizer.clone(),
    });

    let document = builder.finish();
    info!(
        job = request.job_number.as_deref().unwrap_or(NOT_AVAILABLE),
        specimens = specimens.len(),
        average = %derived.average_strength.display_or(STRENGTH_PLACES, NOT_AVAILABLE),
        pages = document.page_count(),
        "composed cube report"
    );
    document
}

fn specimen_table(
    record: &TestRecord,
    specimens: &[crate::calculations::SpecimenMeasurement],
    derived: &CompressionSetResult,
) -> SpecimenTable {
    let rows = specimens
        .iter()
        .zip(&derived.rows)
        .map(|(specimen, result)| SpecimenRow {
            id_mark: or_na(Some(specimen.id_mark.as_str())),
            length: specimen.length.raw_or(NOT_AVAILABLE),
            width: specimen.width.raw_or(NOT_AVAILABLE),
            height: specimen.height.raw_or(NOT_AVAILABLE),
            area: result.area.display_or(AREA_PLACES, NOT_AVAILABLE),
            weight: specimen.weight.raw_or(NOT_AVAILABLE),
            max_load: specimen.max_load.raw_or(NOT_AVAILABLE),
        })
        .collect();

    SpecimenTable {
        grade: or_na(record.main_test.grade.as_deref()),
        rows,
    }
}

fn results_table(derived: &CompressionSetResult) -> ResultsTable {
    ResultsTable {
        title: RESULTS_TITLE.to_string(),
        rows: derived
            .rows
            .iter()
            .map(|row| ResultRow {
                id_mark: or_na(Some(row.id_mark.as_str())),
                density: row.density.display_or(DENSITY_PLACES, NOT_AVAILABLE),
                strength: row.strength.display_or(STRENGTH_PLACES, NOT_AVAILABLE),
            })
            .collect(),
        average: derived.average_strength.display_or(STRENGTH_PLACES, NOT_AVAILABLE),
    }
}

/// Record reviewer, field by field over the profile default.
fn reviewer(record: &TestRecord, profile: &LabProfile) -> Signatory {
    let fallback = &profile.reviewer;
    let Some(info) = &record.reviewer else {
        return fallback.clone();
    };
    let pick = |value: &Option<String>, default: &str| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
            .to_string()
    };
    Signatory {
        name: pick(&info.name, &fallback.name),
        designation: pick(&info.designation, &fallback.designation),
        qualifications: match info.graduation.as_deref().map(str::trim) {
            Some(g) if !g.is_empty() => vec![g.to_string()],
            _ => fallback.qualifications.clone(),
        },
    }
}
