use std::collections::BTreeMap;

use camino::Utf8Path;
use serde::Serialize;

use crate::diagnostics::{Diagnostics, PrepWarning};
use crate::domain::{Pipeline, ProjectName, RunId};
use crate::error::PrepError;
use crate::instrument::{Instrument, resolve_instrument};
use crate::locator::locate_prefix;
use crate::sample_sheet::{SampleSheet, SampleSheetRow};

/// Column order of every preparation table.
pub const PREP_COLUMNS: [&str; 21] = [
    "sample_name",
    "experiment_design_description",
    "library_construction_protocol",
    "platform",
    "run_center",
    "run_date",
    "run_prefix",
    "sequencing_meth",
    "center_name",
    "center_project_name",
    "instrument_model",
    "runid",
    "sample_plate",
    "sample_well",
    "i7_index_id",
    "index",
    "i5_index_id",
    "index2",
    "lane",
    "sample_project",
    "well_description",
];

pub const PLATFORM: &str = "Illumina";
pub const SEQUENCING_METHOD: &str = "sequencing by synthesis";
pub const EXPERIMENT_DESCRIPTION_PLACEHOLDER: &str = "EXPERIMENT_DESC";
pub const LIBRARY_PROTOCOL_PLACEHOLDER: &str = "LIBRARY_PROTOCOL";
pub const CENTER_NAME_PLACEHOLDER: &str = "CENTER_NAME";

/// Fixed values filled in for every preparation of one registered study.
#[derive(Debug, Clone, Copy)]
pub struct StudyDefaults {
    pub registry_id: &'static str,
    pub center_name: &'static str,
    pub library_construction_protocol: &'static str,
    pub experiment_design_description: &'static str,
}

/// The American Gut Project keeps growing run after run.
pub const AMERICAN_GUT_PROJECT: StudyDefaults = StudyDefaults {
    registry_id: "10317",
    center_name: "UCSDMI",
    library_construction_protocol: "Knight Lab KHP",
    experiment_design_description: "samples of skin, saliva and feces and other samples from the AGP",
};

const STUDY_DEFAULTS: &[StudyDefaults] = &[AMERICAN_GUT_PROJECT];

/// One row of a preparation table; field order matches [`PREP_COLUMNS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrepRow {
    pub sample_name: String,
    pub experiment_design_description: String,
    pub library_construction_protocol: String,
    pub platform: String,
    pub run_center: String,
    pub run_date: String,
    pub run_prefix: String,
    pub sequencing_meth: String,
    pub center_name: String,
    pub center_project_name: String,
    pub instrument_model: String,
    pub runid: String,
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

impl PrepRow {
    /// Values in [`PREP_COLUMNS`] order.
    pub fn values(&self) -> [&str; 21] {
        [
            self.sample_name.as_str(),
            self.experiment_design_description.as_str(),
            self.library_construction_protocol.as_str(),
            self.platform.as_str(),
            self.run_center.as_str(),
            self.run_date.as_str(),
            self.run_prefix.as_str(),
            self.sequencing_meth.as_str(),
            self.center_name.as_str(),
            self.center_project_name.as_str(),
            self.instrument_model.as_str(),
            self.runid.as_str(),
            self.sample_plate.as_str(),
            self.sample_well.as_str(),
            self.i7_index_id.as_str(),
            self.index.as_str(),
            self.i5_index_id.as_str(),
            self.index2.as_str(),
            self.lane.as_str(),
            self.sample_project.as_str(),
            self.well_description.as_str(),
        ]
    }
}

/// Preparation metadata for one project in one lane of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrepTable {
    pub run_id: String,
    pub project: String,
    pub lane: String,
    pub rows: Vec<PrepRow>,
}

impl PrepTable {
    /// Key of the table in [`Preparations::tables`]: `<run_id>.<project>.<lane>`.
    pub fn name(&self) -> String {
        format!("{}.{}.{}", self.run_id, self.project, self.lane)
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &PREP_COLUMNS
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn sample_names(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.sample_name.as_str())
    }

    /// Overwrites study-level columns when the project belongs to a registered study.
    pub fn apply_study_defaults(&mut self, registry_id: &str) -> bool {
        let Some(defaults) = STUDY_DEFAULTS
            .iter()
            .find(|defaults| defaults.registry_id == registry_id)
        else {
            return false;
        };
        for row in &mut self.rows {
            row.center_name = defaults.center_name.to_string();
            row.library_construction_protocol = defaults.library_construction_protocol.to_string();
            row.experiment_design_description = defaults.experiment_design_description.to_string();
        }
        true
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Preparations {
    pub tables: BTreeMap<String, PrepTable>,
    pub warnings: Vec<PrepWarning>,
}

/// Run-level facts shared by every row of every table.
struct RunContext<'a> {
    run_path: &'a Utf8Path,
    run_id: RunId,
    instrument: Instrument,
    pipeline: Pipeline,
}

/// Builds one preparation table per project and lane found in the sheet.
///
/// Samples without a non-empty forward/reverse pair on disk are left out of
/// their table. Malformed run ids, unknown instruments and mismatched read
/// file names abort the whole run.
pub fn build_preparations(
    run_path: &Utf8Path,
    sheet: &SampleSheet,
    pipeline: Option<Pipeline>,
) -> Result<Preparations, PrepError> {
    let run_id = RunId::from_run_path(run_path)?;
    let instrument = resolve_instrument(run_id.instrument_code())?;
    let context = RunContext {
        run_path,
        run_id,
        instrument,
        pipeline: pipeline.unwrap_or_default(),
    };
    tracing::info!(
        run_id = %context.run_id,
        model = %context.instrument.model,
        pipeline = %context.pipeline,
        "building preparations"
    );

    let mut diagnostics = Diagnostics::new();
    let rows = sheet.rows(&mut diagnostics)?;

    let mut tables = BTreeMap::new();
    for (project, lanes) in group_by_project_and_lane(&rows) {
        let project = ProjectName::new(project);
        for (lane, samples) in lanes {
            let table = build_table(&context, &project, lane, &samples, &mut diagnostics)?;
            tables.insert(table.name(), table);
        }
    }

    Ok(Preparations {
        tables,
        warnings: diagnostics.into_warnings(),
    })
}

fn group_by_project_and_lane(
    rows: &[SampleSheetRow],
) -> BTreeMap<&str, BTreeMap<&str, Vec<&SampleSheetRow>>> {
    let mut groups = BTreeMap::<&str, BTreeMap<&str, Vec<&SampleSheetRow>>>::new();
    for row in rows {
        groups
            .entry(row.sample_project.as_str())
            .or_default()
            .entry(row.lane.as_str())
            .or_default()
            .push(row);
    }
    groups
}

fn build_table(
    context: &RunContext<'_>,
    project: &ProjectName,
    lane: &str,
    samples: &[&SampleSheetRow],
    diagnostics: &mut Diagnostics,
) -> Result<PrepTable, PrepError> {
    let mut rows = Vec::with_capacity(samples.len());
    for sample in samples {
        let run_prefix = locate_prefix(
            context.run_path,
            project.raw(),
            &sample.sample_id,
            lane,
            context.pipeline,
        )?;
        let Some(run_prefix) = run_prefix else {
            continue;
        };
        rows.push(prep_row(context, project, lane, sample, run_prefix));
    }

    if rows.is_empty() {
        diagnostics.warn(PrepWarning::EmptyGroup {
            project: project.raw().to_string(),
            lane: lane.to_string(),
        });
    }

    let mut table = PrepTable {
        run_id: context.run_id.to_string(),
        project: project.raw().to_string(),
        lane: lane.to_string(),
        rows,
    };
    if table.apply_study_defaults(project.registry_id_or_placeholder()) {
        tracing::info!(project = %project, "applied study defaults");
    }

    let invalid = invalid_sample_names(table.sample_names());
    if !invalid.is_empty() {
        diagnostics.warn(PrepWarning::InvalidSampleNames { names: invalid });
    }

    tracing::info!(table = %table.name(), samples = table.len(), "built preparation");
    Ok(table)
}

fn prep_row(
    context: &RunContext<'_>,
    project: &ProjectName,
    lane: &str,
    sample: &SampleSheetRow,
    run_prefix: String,
) -> PrepRow {
    PrepRow {
        // The sheet's well description is the name downstream systems know the sample by.
        sample_name: sample.well_description.clone(),
        experiment_design_description: EXPERIMENT_DESCRIPTION_PLACEHOLDER.to_string(),
        library_construction_protocol: LIBRARY_PROTOCOL_PLACEHOLDER.to_string(),
        platform: PLATFORM.to_string(),
        run_center: context.instrument.run_center.clone(),
        run_date: context.run_id.formatted_date(),
        run_prefix,
        sequencing_meth: SEQUENCING_METHOD.to_string(),
        center_name: CENTER_NAME_PLACEHOLDER.to_string(),
        center_project_name: project.bare().to_string(),
        instrument_model: context.instrument.model.clone(),
        runid: context.run_id.to_string(),
        sample_plate: sample.sample_plate.clone(),
        sample_well: sample.sample_well.clone(),
        i7_index_id: sample.i7_index_id.clone(),
        index: sample.index.clone(),
        i5_index_id: sample.i5_index_id.clone(),
        index2: sample.index2.clone(),
        lane: lane.to_string(),
        sample_project: project.raw().to_string(),
        well_description: format!(
            "{}.{}.{}",
            sample.sample_plate, sample.sample_name, sample.sample_well
        ),
    }
}

/// Sample names with characters other than ASCII letters, digits and `.`.
pub fn invalid_sample_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    names
        .into_iter()
        .filter(|name| {
            !name
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '.')
        })
        .map(str::to_string)
        .collect()
}
