//! # Report Sections
//!
//! Every block on a report body is a [`Section`]: it declares its height up
//! front and then draws itself inside that band. The builder stacks sections
//! vertically, so two sections can never overlap.
//!
//! Values arrive pre-formatted as strings. Missing upstream data is replaced
//! with [`NOT_AVAILABLE`] by [`or_na`] before it reaches a section.

use serde::{Deserialize, Serialize};

use super::metrics::{wrap_text, FontFace, TextMeasure};
use super::primitives::{Anchor, Canvas, Color, Stroke, TextStyle};

/// Placeholder for missing data
pub const NOT_AVAILABLE: &str = "N/A";

/// Standard row height (mm)
pub const ROW_HEIGHT: f64 = 4.0;

const LEFT: f64 = 10.0;
const CONTENT_WIDTH: f64 = 190.0;
/// 24% of the content width
const LABEL_WIDTH: f64 = 45.6;
/// 26% of the content width
const VALUE_WIDTH: f64 = 49.4;
const RIGHT_LABEL_X: f64 = LEFT + LABEL_WIDTH + VALUE_WIDTH;
const TEXT_INSET: f64 = 1.0;
const TEXT_DROP: f64 = 2.5;

/// A vertically stacked block of report content.
pub trait Section {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Height of the band this section occupies, in mm.
    fn height(&self, metrics: &dyn TextMeasure) -> f64;

    /// Draw inside the band starting at `top`.
    fn draw(&self, top: f64, canvas: &mut Canvas<'_>);
}

/// Missing or blank values become `"N/A"`.
pub fn or_na(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

// ============================================================================
// Key/value rows
// ============================================================================

/// A labelled value, optionally highlighted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub highlight: bool,
}

impl Field {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Field {
            label: label.into(),
            value: value.into(),
            highlight: false,
        }
    }

    pub fn highlighted(mut self) -> Self {
        self.highlight = true;
        self
    }

    fn draw(&self, x: f64, y: f64, value_width: f64, canvas: &mut Canvas<'_>) {
        let style = TextStyle::regular(11.0);
        canvas.cell(x, y, LABEL_WIDTH, ROW_HEIGHT, Some(Color::LABEL_FILL));
        canvas.text(x + TEXT_INSET, y + TEXT_DROP, &self.label, style, Anchor::Left);

        let value_x = x + LABEL_WIDTH;
        canvas.cell(value_x, y, value_width, ROW_HEIGHT, None);
        if self.highlight {
            let width = canvas.text_width(&self.value, style);
            canvas.highlight(value_x + TEXT_INSET, y + 0.5, width + 2.0, 3.0);
        }
        canvas.text(value_x + TEXT_INSET, y + TEXT_DROP, &self.value, style, Anchor::Left);
    }
}

/// One field on the left half, or spanning the full width.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValueRow {
    pub field: Field,
    pub full_width: bool,
}

impl KeyValueRow {
    pub fn split(field: Field) -> Self {
        KeyValueRow {
            field,
            full_width: false,
        }
    }

    pub fn full(field: Field) -> Self {
        KeyValueRow {
            field,
            full_width: true,
        }
    }
}

impl Section for KeyValueRow {
    fn name(&self) -> &'static str {
        "key_value_row"
    }

    fn height(&self, _metrics: &dyn TextMeasure) -> f64 {
        ROW_HEIGHT
    }

    fn draw(&self, top: f64, canvas: &mut Canvas<'_>) {
        let value_width = if self.full_width {
            CONTENT_WIDTH - LABEL_WIDTH
        } else {
            VALUE_WIDTH
        };
        self.field.draw(LEFT, top, value_width, canvas);
    }
}

/// Two fields side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct RowPair {
    pub left: Field,
    pub right: Field,
}

impl RowPair {
    pub fn new(left: Field, right: Field) -> Self {
        RowPair { left, right }
    }
}

impl Section for RowPair {
    fn name(&self) -> &'static str {
        "row_pair"
    }

    fn height(&self, _metrics: &dyn TextMeasure) -> f64 {
        ROW_HEIGHT
    }

    fn draw(&self, top: f64, canvas: &mut Canvas<'_>) {
        self.left.draw(LEFT, top, VALUE_WIDTH, canvas);
        self.right.draw(RIGHT_LABEL_X, top, VALUE_WIDTH, canvas);
    }
}

// ============================================================================
// Customer block
// ============================================================================

/// Merged customer/address cell beside the report date and ULR number.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerBlock {
    /// "name, address"
    pub customer: String,
    pub report_date: String,
    pub ulr_number: String,
}

const CUSTOMER_BLOCK_HEIGHT: f64 = 15.0;
const CUSTOMER_WRAP_WIDTH: f64 = 48.0;
const CUSTOMER_SIZE: f64 = 9.0;

impl CustomerBlock {
    fn lines(&self, metrics: &dyn TextMeasure) -> Vec<String> {
        wrap_text(metrics, &self.customer, FontFace::Regular, CUSTOMER_SIZE, CUSTOMER_WRAP_WIDTH)
    }
}

impl Section for CustomerBlock {
    fn name(&self) -> &'static str {
        "customer_block"
    }

    fn height(&self, metrics: &dyn TextMeasure) -> f64 {
        // Three lines fill the standard block; longer text grows it a row at a time
        let lines = self.lines(metrics).len() as f64;
        CUSTOMER_BLOCK_HEIGHT.max(ROW_HEIGHT * lines + 3.0)
    }

    fn draw(&self, top: f64, canvas: &mut Canvas<'_>) {
        let small = TextStyle::regular(CUSTOMER_SIZE);
        let normal = TextStyle::regular(11.0);
        let value_x = LEFT + LABEL_WIDTH;
        let height = self.height(canvas.metrics());

        canvas.cell(LEFT, top, LABEL_WIDTH, height, Some(Color::LABEL_FILL));
        canvas.text(LEFT + TEXT_INSET, top + 3.0, "Customer/Site Name &", small, Anchor::Left);
        canvas.text(LEFT + TEXT_INSET, top + 7.0, "Address", small, Anchor::Left);

        canvas.cell(value_x, top, VALUE_WIDTH, height, None);
        for (i, line) in self.lines(canvas.metrics()).iter().enumerate() {
            canvas.text(value_x + TEXT_INSET, top + 3.0 + ROW_HEIGHT * i as f64, line, small, Anchor::Left);
        }

        let date_value_x = RIGHT_LABEL_X + LABEL_WIDTH;
        canvas.cell(RIGHT_LABEL_X, top, LABEL_WIDTH, ROW_HEIGHT, Some(Color::LABEL_FILL));
        canvas.text(RIGHT_LABEL_X + TEXT_INSET, top + TEXT_DROP, "Date of Report", normal, Anchor::Left);
        canvas.cell(date_value_x, top, VALUE_WIDTH, ROW_HEIGHT, None);
        canvas.text(date_value_x + TEXT_INSET, top + TEXT_DROP, &self.report_date, normal, Anchor::Left);

        let ulr_height = height - ROW_HEIGHT;
        canvas.cell(RIGHT_LABEL_X, top + ROW_HEIGHT, LABEL_WIDTH, ulr_height, Some(Color::LABEL_FILL));
        canvas.text(RIGHT_LABEL_X + TEXT_INSET, top + 9.5, "ULR Number", normal, Anchor::Left);
        canvas.cell(date_value_x, top + ROW_HEIGHT, VALUE_WIDTH, ulr_height, None);
        canvas.text(date_value_x + TEXT_INSET, top + 9.5, &self.ulr_number, normal, Anchor::Left);
    }
}

// ============================================================================
// Specimen description table
// ============================================================================

/// One specimen as printed in the description table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpecimenRow {
    pub id_mark: String,
    pub length: String,
    pub width: String,
    pub height: String,
    pub area: String,
    pub weight: String,
    pub max_load: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpecimenTable {
    pub grade: String,
    pub rows: Vec<SpecimenRow>,
}

const SR_WIDTH: f64 = 12.0;
const ID_WIDTH: f64 = 36.2;
const DIMENSIONS_WIDTH: f64 = 54.3;
const AREA_WIDTH: f64 = 22.8;
const WEIGHT_WIDTH: f64 = 22.8;
const LOAD_WIDTH: f64 = 41.8;
const BANNER_HEIGHT: f64 = 12.0;

/// Centre a text run in a bordered cell.
fn centered_cell(canvas: &mut Canvas<'_>, x: f64, y: f64, width: f64, height: f64, text: &str, baseline: f64, style: TextStyle) {
    canvas.cell(x, y, width, height, None);
    canvas.text(x + width / 2.0, y + baseline, text, style, Anchor::Center);
}

impl Section for SpecimenTable {
    fn name(&self) -> &'static str {
        "specimen_table"
    }

    fn height(&self, _metrics: &dyn TextMeasure) -> f64 {
        ROW_HEIGHT + BANNER_HEIGHT + ROW_HEIGHT + ROW_HEIGHT * self.rows.len() as f64 + ROW_HEIGHT
    }

    fn draw(&self, top: f64, canvas: &mut Canvas<'_>) {
        let mut y = top + ROW_HEIGHT;

        let banner = TextStyle::bold(9.0);
        let grade_width = SR_WIDTH + ID_WIDTH;
        let grade_text = format!("GRADE OF CONCRETE: {}", self.grade);
        let grade_center = LEFT + grade_width / 2.0;
        let text_width = canvas.text_width(&grade_text, banner);
        canvas.highlight(grade_center - text_width / 2.0 - 1.0, y + 3.0, text_width + 2.0, 6.0);
        centered_cell(canvas, LEFT, y, grade_width, BANNER_HEIGHT, &grade_text, 8.0, banner);
        centered_cell(
            canvas,
            LEFT + grade_width,
            y,
            CONTENT_WIDTH - grade_width,
            BANNER_HEIGHT,
            "DESCRIPTION OF TEST SAMPLE",
            8.0,
            banner,
        );
        y += BANNER_HEIGHT;

        let widths = [SR_WIDTH, ID_WIDTH, DIMENSIONS_WIDTH, AREA_WIDTH, WEIGHT_WIDTH, LOAD_WIDTH];
        let headers = [
            "Sr. No.",
            "ID Mark",
            "Dimensions (mm) (L x B x H)",
            "Area (mm²)",
            "Weight (kg)",
            "Max Load (kN)",
        ];
        let mut x = LEFT;
        for (width, header) in widths.iter().zip(headers) {
            centered_cell(canvas, x, y, *width, ROW_HEIGHT, header, TEXT_DROP, TextStyle::bold(10.0));
            x += width;
        }
        y += ROW_HEIGHT;

        let style = TextStyle::regular(10.0);
        let dimension_width = DIMENSIONS_WIDTH / 3.0;
        for (index, row) in self.rows.iter().enumerate() {
            let serial = (index + 1).to_string();
            let cells: [(&str, f64); 8] = [
                (serial.as_str(), SR_WIDTH),
                (row.id_mark.as_str(), ID_WIDTH),
                (row.length.as_str(), dimension_width),
                (row.width.as_str(), dimension_width),
                (row.height.as_str(), dimension_width),
                (row.area.as_str(), AREA_WIDTH),
                (row.weight.as_str(), WEIGHT_WIDTH),
                (row.max_load.as_str(), LOAD_WIDTH),
            ];
            let mut x = LEFT;
            for (text, width) in cells {
                centered_cell(canvas, x, y, width, ROW_HEIGHT, text, TEXT_DROP, style);
                x += width;
            }
            y += ROW_HEIGHT;
        }
    }
}

// ============================================================================
// Results table
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultRow {
    pub id_mark: String,
    pub density: String,
    pub strength: String,
}

/// Per-specimen results with one merged, highlighted average cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsTable {
    pub title: String,
    pub rows: Vec<ResultRow>,
    pub average: String,
}

pub const RESULTS_TABLE_WIDTH: f64 = 140.0;
const RESULTS_HEADER_HEIGHT: f64 = 12.0;
const RESULTS_TITLE_SPACE: f64 = 8.0;
const RESULT_WIDTHS: [f64; 5] = [18.0, 22.0, 25.0, 40.0, 35.0];

impl ResultsTable {
    /// Left edge of the centred table
    pub fn left(page_width: f64) -> f64 {
        (page_width - RESULTS_TABLE_WIDTH) / 2.0
    }

    /// Height of the merged average cell
    pub fn average_cell_height(&self) -> f64 {
        ROW_HEIGHT * self.rows.len() as f64
    }
}

impl Section for ResultsTable {
    fn name(&self) -> &'static str {
        "results_table"
    }

    fn height(&self, _metrics: &dyn TextMeasure) -> f64 {
        ROW_HEIGHT + RESULTS_TITLE_SPACE + RESULTS_HEADER_HEIGHT + self.average_cell_height() + ROW_HEIGHT
    }

    fn draw(&self, top: f64, canvas: &mut Canvas<'_>) {
        let left = Self::left(LEFT * 2.0 + CONTENT_WIDTH);
        let mut y = top + ROW_HEIGHT;

        let title_width = canvas.text(
            left + RESULTS_TABLE_WIDTH / 2.0,
            y,
            &self.title,
            TextStyle::bold(10.0),
            Anchor::Center,
        );
        let title_start = left + (RESULTS_TABLE_WIDTH - title_width) / 2.0;
        canvas.line(title_start, y + 1.0, title_start + title_width, y + 1.0, Stroke::CELL);
        y += RESULTS_TITLE_SPACE;

        let header = TextStyle::regular(10.0);
        let headers: [&[&str]; 5] = [
            &["Sr. No."],
            &["ID Mark"],
            &["Density (kg/m³)"],
            &["Compressive", "Strength (N/mm²)"],
            &["Average Compressive", "Strength (N/mm²)"],
        ];
        let mut x = left;
        for (width, lines) in RESULT_WIDTHS.iter().zip(headers) {
            canvas.cell(x, y, *width, RESULTS_HEADER_HEIGHT, None);
            let baselines: &[f64] = if lines.len() == 1 { &[7.0] } else { &[5.0, 9.5] };
            for (line, baseline) in lines.iter().zip(baselines) {
                canvas.text(x + width / 2.0, y + baseline, line, header, Anchor::Center);
            }
            x += width;
        }
        y += RESULTS_HEADER_HEIGHT;

        let body = TextStyle::regular(11.0);
        let rows_top = y;
        for (index, row) in self.rows.iter().enumerate() {
            let serial = (index + 1).to_string();
            let cells = [serial.as_str(), row.id_mark.as_str(), row.density.as_str(), row.strength.as_str()];
            let mut x = left;
            for (text, width) in cells.into_iter().zip(RESULT_WIDTHS) {
                centered_cell(canvas, x, y, width, ROW_HEIGHT, text, TEXT_DROP, body);
                x += width;
            }
            y += ROW_HEIGHT;
        }

        if self.rows.is_empty() {
            return;
        }

        let merged = self.average_cell_height();
        let avg_width = RESULT_WIDTHS[4];
        let avg_x = left + RESULTS_TABLE_WIDTH - avg_width;
        let center = avg_x + avg_width / 2.0;
        let style = TextStyle::bold(12.0);
        let text_width = canvas.text_width(&self.average, style);

        canvas.cell(avg_x, rows_top, avg_width, merged, None);
        canvas.highlight(center - text_width / 2.0 - 3.0, rows_top + (merged - 6.0) / 2.0, text_width + 6.0, 6.0);
        // Baseline sits below the midpoint so the digits look centred
        canvas.text(center, rows_top + merged / 2.0 + 1.5, &self.average, style, Anchor::Center);
    }
}

// ============================================================================
// Generic data table
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub header: String,
    pub width: f64,
}

impl Column {
    pub fn new(header: impl Into<String>, width: f64) -> Self {
        Column {
            header: header.into(),
            width,
        }
    }
}

/// Bordered grid used by observation sheets. Centred on the page, headers
/// wrapped to their column width.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    pub title: Option<String>,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

const DATA_HEADER_SIZE: f64 = 9.0;
const DATA_BODY_SIZE: f64 = 10.0;

impl DataTable {
    pub fn width(&self) -> f64 {
        self.columns.iter().map(|c| c.width).sum()
    }

    fn header_lines(&self, metrics: &dyn TextMeasure) -> Vec<Vec<String>> {
        self.columns
            .iter()
            .map(|c| wrap_text(metrics, &c.header, FontFace::Bold, DATA_HEADER_SIZE, c.width - 1.0))
            .collect()
    }

    fn header_height(&self, metrics: &dyn TextMeasure) -> f64 {
        let lines = self.header_lines(metrics).iter().map(Vec::len).max().unwrap_or(1).max(1);
        ROW_HEIGHT * lines as f64 + 2.0
    }

    fn title_space(&self) -> f64 {
        if self.title.is_some() {
            RESULTS_TITLE_SPACE
        } else {
            0.0
        }
    }
}

impl Section for DataTable {
    fn name(&self) -> &'static str {
        "data_table"
    }

    fn height(&self, metrics: &dyn TextMeasure) -> f64 {
        ROW_HEIGHT + self.title_space() + self.header_height(metrics) + ROW_HEIGHT * self.rows.len() as f64
    }

    fn draw(&self, top: f64, canvas: &mut Canvas<'_>) {
        let width = self.width();
        let left = LEFT + (CONTENT_WIDTH - width).max(0.0) / 2.0;
        let mut y = top + ROW_HEIGHT;

        if let Some(title) = &self.title {
            let title_width = canvas.text(left + width / 2.0, y, title, TextStyle::bold(10.0), Anchor::Center);
            let start = left + (width - title_width) / 2.0;
            canvas.line(start, y + 1.0, start + title_width, y + 1.0, Stroke::CELL);
            y += RESULTS_TITLE_SPACE;
        }

        let header_height = self.header_height(canvas.metrics());
        let header_lines = self.header_lines(canvas.metrics());
        let header = TextStyle::bold(DATA_HEADER_SIZE);
        let mut x = left;
        for (column, lines) in self.columns.iter().zip(&header_lines) {
            canvas.cell(x, y, column.width, header_height, Some(Color::LABEL_FILL));
            for (i, line) in lines.iter().enumerate() {
                canvas.text(x + column.width / 2.0, y + 3.5 + 4.0 * i as f64, line, header, Anchor::Center);
            }
            x += column.width;
        }
        y += header_height;

        let body = TextStyle::regular(DATA_BODY_SIZE);
        for row in &self.rows {
            let mut x = left;
            for (index, column) in self.columns.iter().enumerate() {
                let text = row.get(index).map(String::as_str).unwrap_or("");
                centered_cell(canvas, x, y, column.width, ROW_HEIGHT, text, TEXT_DROP + 0.5, body);
                x += column.width;
            }
            y += ROW_HEIGHT;
        }
    }
}

// ============================================================================
// Terms, signatures, spacing
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TermsBlock {
    pub heading: String,
    pub terms: Vec<String>,
}

const TERMS_LEAD: f64 = 8.0;
const TERMS_HEADING_SPACE: f64 = 6.0;
const TERM_GAP: f64 = 0.5;
const TERM_SIZE: f64 = 10.0;

impl TermsBlock {
    fn wrapped(&self, metrics: &dyn TextMeasure) -> Vec<Vec<String>> {
        self.terms
            .iter()
            .map(|t| wrap_text(metrics, t, FontFace::Regular, TERM_SIZE, CONTENT_WIDTH))
            .collect()
    }
}

impl Section for TermsBlock {
    fn name(&self) -> &'static str {
        "terms"
    }

    fn height(&self, metrics: &dyn TextMeasure) -> f64 {
        let body: f64 = self
            .wrapped(metrics)
            .iter()
            .map(|lines| ROW_HEIGHT * lines.len() as f64 + TERM_GAP)
            .sum();
        TERMS_LEAD + TERMS_HEADING_SPACE + body
    }

    fn draw(&self, top: f64, canvas: &mut Canvas<'_>) {
        let mut y = top + TERMS_LEAD;
        canvas.text(LEFT, y, &self.heading, TextStyle::bold(11.0), Anchor::Left);
        y += TERMS_HEADING_SPACE;

        let style = TextStyle::regular(TERM_SIZE);
        for lines in self.wrapped(canvas.metrics()) {
            for line in &lines {
                canvas.text(LEFT, y, line, style, Anchor::Left);
                y += ROW_HEIGHT;
            }
            y += TERM_GAP;
        }
    }
}

/// A person signing the report.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Signatory {
    pub name: String,
    pub designation: String,
    #[serde(default)]
    pub qualifications: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignatureBlock {
    pub reviewer: Signatory,
    pub authorizer: Signatory,
}

const SIGNATURE_LEAD: f64 = 12.0;
const STAMP_SIZE: f64 = 30.0;
const STAMP_X: f64 = 90.0;
const QUALIFICATION_TOP: f64 = 36.0;
/// Room below the last baseline for descenders
const SIGNATURE_TAIL: f64 = 2.0;

impl SignatureBlock {
    fn draw_signatory(signatory: &Signatory, x: f64, top: f64, canvas: &mut Canvas<'_>) {
        let blue = Color::BLUE;
        canvas.text(x, top + 20.0, &signatory.name, TextStyle::bold(10.0).colored(blue), Anchor::Left);
        let detail = TextStyle::regular(9.0).colored(blue);
        canvas.text(x, top + 28.0, &format!("({})", signatory.designation), detail, Anchor::Left);
        for (i, line) in signatory.qualifications.iter().enumerate() {
            canvas.text(x, top + QUALIFICATION_TOP + ROW_HEIGHT * i as f64, line, detail, Anchor::Left);
        }
    }
}

impl Section for SignatureBlock {
    fn name(&self) -> &'static str {
        "signatures"
    }

    fn height(&self, _metrics: &dyn TextMeasure) -> f64 {
        let lines = self
            .reviewer
            .qualifications
            .len()
            .max(self.authorizer.qualifications.len());
        let below_text = match lines {
            0 => 0.0,
            n => QUALIFICATION_TOP + ROW_HEIGHT * (n - 1) as f64 + SIGNATURE_TAIL,
        };
        (SIGNATURE_LEAD + STAMP_SIZE).max(below_text)
    }

    fn draw(&self, top: f64, canvas: &mut Canvas<'_>) {
        let y = top + SIGNATURE_LEAD;
        let label = TextStyle::bold(10.0).colored(Color::BLUE);
        canvas.text(28.0, y, "Reviewed by -", label, Anchor::Left);
        canvas.text(122.0, y, "Authorized by -", label, Anchor::Left);

        canvas.rect(STAMP_X, y, STAMP_SIZE, STAMP_SIZE, Some(Color::PLACEHOLDER_FILL), None);
        canvas.text(
            STAMP_X + STAMP_SIZE / 2.0,
            y + STAMP_SIZE / 2.0,
            "STAMP",
            TextStyle::regular(8.0).colored(Color::PLACEHOLDER_TEXT),
            Anchor::Center,
        );

        Self::draw_signatory(&self.reviewer, 45.0, top, canvas);
        Self::draw_signatory(&self.authorizer, 135.0, top, canvas);
    }
}

/// Blank vertical space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacer(pub f64);

impl Section for Spacer {
    fn name(&self) -> &'static str {
        "spacer"
    }

    fn height(&self, _metrics: &dyn TextMeasure) -> f64 {
        self.0.max(0.0)
    }

    fn draw(&self, _top: f64, _canvas: &mut Canvas<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::metrics::TimesMetrics;
    use crate::layout::primitives::{DrawOp, Page};

    fn draw(section: &dyn Section, top: f64) -> Page {
        let mut page = Page::new(1);
        section.draw(top, &mut Canvas::new(&mut page, &TimesMetrics));
        page
    }

    fn rects(page: &Page) -> Vec<(f64, f64, f64, f64, Option<Color>)> {
        page.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect { x, y, width, height, fill, .. } => Some((*x, *y, *width, *height, *fill)),
                _ => None,
            })
            .collect()
    }

    fn three_rows() -> ResultsTable {
        ResultsTable {
            title: "Test Result".to_string(),
            rows: vec![
                ResultRow { id_mark: "C1".into(), density: "2518.5".into(), strength: "25.0".into() },
                ResultRow { id_mark: "C2".into(), density: "2488.9".into(), strength: "24.7".into() },
                ResultRow { id_mark: "C3".into(), density: "2548.1".into(), strength: "25.3".into() },
            ],
            average: "25.0".to_string(),
        }
    }

    #[test]
    fn test_or_na() {
        assert_eq!(or_na(None), "N/A");
        assert_eq!(or_na(Some("  ")), "N/A");
        assert_eq!(or_na(Some(" M25 ")), "M25");
    }

    #[test]
    fn test_highlight_sized_from_text_width() {
        let row = KeyValueRow::split(Field::new("Age of Specimen", "28 Days").highlighted());
        let page = draw(&row, 60.0);
        let expected = TimesMetrics.text_width("28 Days", FontFace::Regular, 11.0) + 2.0;
        let highlight = rects(&page)
            .into_iter()
            .find(|r| r.4 == Some(Color::HIGHLIGHT))
            .unwrap();
        assert!((highlight.2 - expected).abs() < 1e-9);
        assert_eq!(highlight.0, LEFT + LABEL_WIDTH + 1.0);
        assert_eq!(highlight.1, 60.5);
    }

    #[test]
    fn test_unhighlighted_row_has_no_highlight() {
        let page = draw(&RowPair::new(Field::new("A", "1"), Field::new("B", "2")), 44.0);
        assert!(rects(&page).iter().all(|r| r.4 != Some(Color::HIGHLIGHT)));
        assert_eq!(rects(&page).len(), 4);
    }

    #[test]
    fn test_full_width_value_cell() {
        let page = draw(&KeyValueRow::full(Field::new("Location", "Slab")), 44.0);
        let cells = rects(&page);
        assert!((cells[1].2 - 144.4).abs() < 1e-9);
    }

    #[test]
    fn test_merged_average_cell_spans_rows() {
        let table = three_rows();
        let page = draw(&table, 100.0);
        let rows_top = 100.0 + 4.0 + 8.0 + 12.0;
        let avg_x = 35.0 + 140.0 - 35.0;
        let merged: Vec<_> = rects(&page)
            .into_iter()
            .filter(|r| r.0 == avg_x && r.1 == rows_top && r.4.is_none())
            .collect();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].3, 12.0);

        let texts: Vec<_> = page.texts().filter(|t| *t == "25.0").collect();
        // one per-row strength plus the single average
        assert_eq!(texts.len(), 2);
    }

    #[test]
    fn test_average_centered_and_highlighted() {
        let page = draw(&three_rows(), 100.0);
        let center = 140.0 + 17.5;
        let avg = page
            .ops
            .iter()
            .find(|op| matches!(op, DrawOp::Text { style, .. } if style.size_pt == 12.0))
            .unwrap();
        if let DrawOp::Text { x, anchor, width, .. } = avg {
            assert_eq!(*x, center);
            assert_eq!(*anchor, Anchor::Center);
            let highlight = rects(&page).into_iter().find(|r| r.4 == Some(Color::HIGHLIGHT)).unwrap();
            assert!((highlight.2 - (width + 6.0)).abs() < 1e-9);
            assert!((highlight.0 - (center - width / 2.0 - 3.0)).abs() < 1e-9);
            assert_eq!(highlight.3, 6.0);
        }
    }

    #[test]
    fn test_results_table_height() {
        let table = three_rows();
        assert_eq!(table.height(&TimesMetrics), 28.0 + 12.0);
        assert_eq!(table.average_cell_height(), 12.0);
    }

    #[test]
    fn test_empty_results_table_has_no_average_cell() {
        let table = ResultsTable {
            title: "Test Result".to_string(),
            rows: Vec::new(),
            average: String::new(),
        };
        let page = draw(&table, 100.0);
        assert!(rects(&page).iter().all(|r| r.4 != Some(Color::HIGHLIGHT)));
        assert_eq!(table.height(&TimesMetrics), 28.0);
    }

    #[test]
    fn test_specimen_table_placeholders() {
        let table = SpecimenTable {
            grade: "M25".to_string(),
            rows: vec![SpecimenRow {
                id_mark: "C1".into(),
                length: "150".into(),
                width: "150".into(),
                height: "150".into(),
                area: "22500.0".into(),
                weight: NOT_AVAILABLE.into(),
                max_load: NOT_AVAILABLE.into(),
            }],
        };
        assert_eq!(table.height(&TimesMetrics), 28.0);
        let page = draw(&table, 100.0);
        assert_eq!(page.texts().filter(|t| *t == "N/A").count(), 2);
        assert!(page.texts().any(|t| t == "GRADE OF CONCRETE: M25"));
    }

    #[test]
    fn test_terms_height_tracks_wrapping() {
        let short = TermsBlock {
            heading: "Terms & Conditions :-".to_string(),
            terms: vec!["1) Samples were not drawn by the lab.".to_string()],
        };
        assert_eq!(short.height(&TimesMetrics), 8.0 + 6.0 + 4.5);

        let long = TermsBlock {
            heading: "Terms & Conditions :-".to_string(),
            terms: vec!["word ".repeat(120)],
        };
        let lines = wrap_text(&TimesMetrics, &long.terms[0], FontFace::Regular, 10.0, 190.0).len();
        assert!(lines > 1);
        assert_eq!(long.height(&TimesMetrics), 14.0 + 4.0 * lines as f64 + 0.5);
    }

    #[test]
    fn test_signature_text_stays_inside_block() {
        let block = SignatureBlock {
            reviewer: Signatory {
                name: "Reviewer".into(),
                designation: "Quality Manager".into(),
                qualifications: vec!["B.Tech.(Civil)".into()],
            },
            authorizer: Signatory {
                name: "Authorizer".into(),
                designation: "Chief Executive Officer".into(),
                qualifications: vec!["M.E".into(), "MTech".into()],
            },
        };
        let height = block.height(&TimesMetrics);
        let page = draw(&block, 0.0);
        for op in &page.ops {
            if let DrawOp::Text { y, .. } = op {
                assert!(*y <= height);
            }
        }
        assert!(page.texts().any(|t| t == "(Chief Executive Officer)"));
    }

    #[test]
    fn test_signature_block_grows_with_qualifications() {
        let signatory = |qualifications: Vec<&str>| Signatory {
            name: "Authorizer".into(),
            designation: "Chief Executive Officer".into(),
            qualifications: qualifications.into_iter().map(String::from).collect(),
        };
        let block = SignatureBlock {
            reviewer: signatory(vec!["B.Tech.(Civil)"]),
            authorizer: signatory(vec!["M.E", "MTech", "Ph.D"]),
        };
        let height = block.height(&TimesMetrics);
        assert_eq!(height, 46.0);

        let page = draw(&block, 0.0);
        let lowest = page
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { y, .. } => Some(*y),
                _ => None,
            })
            .fold(0.0, f64::max);
        assert_eq!(lowest, 44.0);
        assert!(lowest < height);
        assert!(page.texts().any(|t| t == "Ph.D"));

        let short = SignatureBlock {
            reviewer: signatory(vec![]),
            authorizer: signatory(vec!["M.E"]),
        };
        assert_eq!(short.height(&TimesMetrics), SIGNATURE_LEAD + STAMP_SIZE);
    }

    #[test]
    fn test_customer_block_keeps_every_wrapped_line() {
        let short = CustomerBlock {
            customer: "Ramesh Constructions, Solapur".into(),
            report_date: "05/09/2025".into(),
            ulr_number: "TC1575625000001042F".into(),
        };
        assert_eq!(short.height(&TimesMetrics), CUSTOMER_BLOCK_HEIGHT);

        let long = CustomerBlock {
            customer: "Shree Ganesh Infrastructure Private Limited, Plot 14, Survey 221/3, \
                       Near Old Octroi Naka, Hotgi Road, MIDC Industrial Area, Solapur 413003"
                .into(),
            ..short
        };
        let wrapped = long.lines(&TimesMetrics);
        assert!(wrapped.len() > 3);
        let height = long.height(&TimesMetrics);
        assert!(height > CUSTOMER_BLOCK_HEIGHT);

        let page = draw(&long, 0.0);
        for line in &wrapped {
            assert!(page.texts().any(|t| t == line), "line dropped: {}", line);
        }
        for op in &page.ops {
            if let DrawOp::Text { y, .. } = op {
                assert!(*y < height);
            }
        }
        // Every cell spans the grown block
        assert!(rects(&page).iter().all(|r| r.1 + r.3 <= height + 1e-9));
        assert!(rects(&page).iter().any(|r| (r.3 - height).abs() < 1e-9));
    }

    #[test]
    fn test_data_table_fills_missing_cells_blank() {
        let table = DataTable {
            title: None,
            columns: vec![Column::new("Trial", 20.0), Column::new("Moisture (%)", 30.0)],
            rows: vec![vec!["1".to_string()]],
        };
        let page = draw(&table, 50.0);
        assert!(page.texts().any(|t| t.is_empty()));
        assert_eq!(table.width(), 50.0);
    }
}
