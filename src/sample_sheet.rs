use std::fs;
use std::io::Read;

use camino::Utf8Path;
use csv::ReaderBuilder;

use crate::diagnostics::{Diagnostics, PrepWarning};
use crate::error::PrepError;

/// Filler for required columns the sample sheet does not provide.
pub const MISSING_COLUMN_PLACEHOLDER: &str = "MISSING_FROM_THE_SAMPLE_SHEET";

/// Columns that identify and group a row; these cannot be synthesized.
pub const KEY_COLUMNS: [&str; 4] = ["sample_id", "sample_name", "lane", "sample_project"];

/// Columns filled in with a warning when absent.
pub const FILLABLE_COLUMNS: [&str; 7] = [
    "well_description",
    "sample_plate",
    "sample_well",
    "i7_index_id",
    "index",
    "i5_index_id",
    "index2",
];

/// One sample sequenced in one lane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleSheetRow {
    pub sample_id: String,
    pub sample_name: String,
    pub sample_plate: String,
    pub sample_well: String,
    pub i7_index_id: String,
    pub index: String,
    pub i5_index_id: String,
    pub index2: String,
    pub lane: String,
    pub sample_project: String,
    pub well_description: String,
}

/// The `[Data]` section of a sample sheet with lower-cased column names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleSheet {
    columns: Vec<String>,
    records: Vec<Vec<String>>,
}

impl SampleSheet {
    pub fn new(columns: Vec<String>, records: Vec<Vec<String>>) -> Result<Self, PrepError> {
        let columns = columns
            .into_iter()
            .map(|column| column.trim().to_lowercase())
            .collect::<Vec<_>>();
        for (line, record) in records.iter().enumerate() {
            if record.len() != columns.len() {
                return Err(PrepError::SampleSheetParse(format!(
                    "row {} has {} fields, expected {}",
                    line + 1,
                    record.len(),
                    columns.len()
                )));
            }
        }
        Ok(Self { columns, records })
    }

    pub fn from_path(path: &Utf8Path) -> Result<Self, PrepError> {
        let file = fs::File::open(path.as_std_path())
            .map_err(|err| PrepError::SampleSheetRead(format!("{path}: {err}")))?;
        Self::from_reader(file)
    }

    /// Parses the `[Data]` section if present, otherwise the whole input as CSV.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, PrepError> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|err| PrepError::SampleSheetRead(err.to_string()))?;

        let data = data_section(&text);
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(data.as_bytes());

        let columns = rdr
            .headers()
            .map_err(|err| PrepError::SampleSheetParse(err.to_string()))?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        // Illumina editors pad section lines with trailing commas.
        let width = columns
            .iter()
            .rposition(|column| !column.is_empty())
            .map_or(0, |last| last + 1);

        let mut records = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|err| PrepError::SampleSheetParse(err.to_string()))?;
            if record.iter().all(str::is_empty) {
                continue;
            }
            let mut fields = record.iter().take(width).map(str::to_string).collect::<Vec<_>>();
            fields.resize(width, String::new());
            records.push(fields);
        }

        Self::new(columns.into_iter().take(width).collect(), records)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }

    /// Validates the sheet and converts every record into a typed row.
    ///
    /// Missing key columns are errors. Missing fillable columns produce a
    /// warning each and are filled: `well_description` from `description`
    /// when that column exists, everything else with
    /// [`MISSING_COLUMN_PLACEHOLDER`].
    pub fn rows(&self, diagnostics: &mut Diagnostics) -> Result<Vec<SampleSheetRow>, PrepError> {
        let key = KEY_COLUMNS
            .iter()
            .map(|column| {
                self.column_index(column)
                    .ok_or_else(|| PrepError::MissingSheetColumn(column.to_string()))
            })
            .collect::<Result<Vec<_>, PrepError>>()?;

        let mut fillable = Vec::with_capacity(FILLABLE_COLUMNS.len());
        for column in FILLABLE_COLUMNS {
            let source = match self.column_index(column) {
                Some(index) => Some(index),
                None => {
                    diagnostics.warn(PrepWarning::MissingColumn {
                        column: column.to_string(),
                    });
                    let description = self.column_index("description");
                    if column == "well_description" && description.is_some() {
                        diagnostics.warn(PrepWarning::DescriptionSubstituted);
                    }
                    description.filter(|_| column == "well_description")
                }
            };
            fillable.push(source);
        }

        Ok(self
            .records
            .iter()
            .map(|record| SampleSheetRow {
                sample_id: record[key[0]].clone(),
                sample_name: record[key[1]].clone(),
                lane: record[key[2]].clone(),
                sample_project: record[key[3]].clone(),
                well_description: field(record, fillable[0]),
                sample_plate: field(record, fillable[1]),
                sample_well: field(record, fillable[2]),
                i7_index_id: field(record, fillable[3]),
                index: field(record, fillable[4]),
                i5_index_id: field(record, fillable[5]),
                index2: field(record, fillable[6]),
            })
            .collect())
    }
}

fn data_section(text: &str) -> String {
    let mut lines = text.lines();
    let found = lines
        .by_ref()
        .any(|line| line.trim_start().to_ascii_lowercase().starts_with("[data]"));
    if !found {
        return text.to_string();
    }
    lines
        .take_while(|line| !line.trim_start().starts_with('['))
        .collect::<Vec<_>>()
        .join("\n")
}

fn field(record: &[String], index: Option<usize>) -> String {
    match index {
        Some(index) => record[index].clone(),
        None => MISSING_COLUMN_PLACEHOLDER.to_string(),
    }
}
