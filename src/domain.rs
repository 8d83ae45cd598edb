use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use camino::{Utf8Component, Utf8Path};
use chrono::NaiveDate;
use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::PrepError;

/// Placeholder registry id for projects without a trailing `_<digits>` group.
pub const MISSING_REGISTRY_ID: &str = "QIITA-ID";

static REGISTRY_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)_(\d+)$").expect("registry id pattern is valid"));

/// A run folder name of the form `YYMMDD_machinename_XXXX_FC`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunId {
    raw: String,
    run_date: NaiveDate,
    instrument_code: String,
}

impl RunId {
    /// Takes the final segment of a run directory path as the run identifier.
    ///
    /// `.` and `..` segments are folded lexically first, so `run/sub/..`
    /// names `run`.
    pub fn from_run_path(run_path: &Utf8Path) -> Result<Self, PrepError> {
        let name = normalized_file_name(run_path)
            .ok_or_else(|| PrepError::InvalidRunId(run_path.to_string()))?;
        name.parse()
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn run_date(&self) -> NaiveDate {
        self.run_date
    }

    /// Run date in the `YYYY-MM-DD` form used by preparation tables.
    pub fn formatted_date(&self) -> String {
        self.run_date.format("%Y-%m-%d").to_string()
    }

    /// Everything after the date token, e.g. `D00611_0365_AH2HJ5BCXY`.
    pub fn instrument_code(&self) -> &str {
        &self.instrument_code
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl FromStr for RunId {
    type Err = PrepError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (date, instrument_code) = value
            .split_once('_')
            .ok_or_else(|| PrepError::InvalidRunId(value.to_string()))?;

        let is_six_digits = date.len() == 6 && date.chars().all(|ch| ch.is_ascii_digit());
        if !is_six_digits {
            return Err(PrepError::InvalidRunId(value.to_string()));
        }
        let run_date = NaiveDate::parse_from_str(date, "%y%m%d")
            .map_err(|_| PrepError::InvalidRunId(value.to_string()))?;

        Ok(Self {
            raw: value.to_string(),
            run_date,
            instrument_code: instrument_code.to_string(),
        })
    }
}

fn normalized_file_name(path: &Utf8Path) -> Option<&str> {
    let mut names = Vec::new();
    for component in path.components() {
        match component {
            Utf8Component::Normal(name) => names.push(name),
            Utf8Component::ParentDir => {
                names.pop();
            }
            _ => {}
        }
    }
    names.last().copied()
}

/// Splits a run identifier into its `YYYY-MM-DD` date and instrument code.
pub fn parse_run_id(value: &str) -> Result<(String, String), PrepError> {
    let run_id: RunId = value.parse()?;
    Ok((run_id.formatted_date(), run_id.instrument_code))
}

/// Sequence processing pipeline that produced the run's per-project output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Pipeline {
    /// Keeps intermediate `atropos_qc` output next to `filtered_sequences`.
    #[serde(rename = "atropos-and-bowtie2")]
    #[value(name = "atropos-and-bowtie2")]
    AtroposAndBowtie2,
    /// Writes `trimmed_sequences` and `filtered_sequences`, no intermediates.
    #[default]
    #[serde(rename = "fastp-and-minimap2")]
    #[value(name = "fastp-and-minimap2")]
    FastpAndMinimap2,
}

impl Pipeline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pipeline::AtroposAndBowtie2 => "atropos-and-bowtie2",
            Pipeline::FastpAndMinimap2 => "fastp-and-minimap2",
        }
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Pipeline {
    type Err = PrepError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "atropos-and-bowtie2" => Ok(Pipeline::AtroposAndBowtie2),
            "fastp-and-minimap2" => Ok(Pipeline::FastpAndMinimap2),
            _ => Err(PrepError::InvalidPipeline(value.to_string())),
        }
    }
}

/// A `sample_project` value, optionally suffixed with `_<registry id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName {
    raw: String,
    bare: String,
    registry_id: Option<String>,
}

impl ProjectName {
    pub fn new(raw: &str) -> Self {
        match REGISTRY_ID_RE.captures(raw) {
            Some(caps) => Self {
                raw: raw.to_string(),
                bare: caps[1].to_string(),
                registry_id: Some(caps[2].to_string()),
            },
            None => Self {
                raw: raw.to_string(),
                bare: raw.to_string(),
                registry_id: None,
            },
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn bare(&self) -> &str {
        &self.bare
    }

    pub fn registry_id(&self) -> Option<&str> {
        self.registry_id.as_deref()
    }

    /// Registry id, or [`MISSING_REGISTRY_ID`] so it is easy to find and replace.
    pub fn registry_id_or_placeholder(&self) -> &str {
        self.registry_id().unwrap_or(MISSING_REGISTRY_ID)
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

pub fn strip_registry_id(project: &str) -> String {
    ProjectName::new(project).bare
}
