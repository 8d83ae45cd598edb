use std::fmt;

use serde::Serialize;

/// Non-fatal findings raised while building preparations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PrepWarning {
    MissingColumn { column: String },
    DescriptionSubstituted,
    EmptyGroup { project: String, lane: String },
    InvalidSampleNames { names: Vec<String> },
}

impl fmt::Display for PrepWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrepWarning::MissingColumn { column } => {
                write!(f, "required column not found: {column}")
            }
            PrepWarning::DescriptionSubstituted => write!(
                f,
                "using 'description' instead of 'well_description' because that column isn't present"
            ),
            PrepWarning::EmptyGroup { project, lane } => {
                write!(f, "project {project} and lane {lane} have no data")
            }
            PrepWarning::InvalidSampleNames { names } => {
                let quoted = names
                    .iter()
                    .map(|name| format!("\"{name}\""))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "the following sample names have invalid characters: {quoted}")
            }
        }
    }
}

/// Collects warnings and mirrors each one to the log.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<PrepWarning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, warning: PrepWarning) {
        tracing::warn!("{warning}");
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[PrepWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<PrepWarning> {
        self.warnings
    }
}
