use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum PrepError {
    #[error(
        "unrecognized run identifier format \"{0}\"; expected YYMMDD_machinename_XXXX_FC"
    )]
    InvalidRunId(String),

    #[error(
        "cannot find a machine code, instrument model {0} is malformed; the machine code is a one or two character prefix"
    )]
    InvalidMachineCode(String),

    #[error("unrecognized instrument {0}: no serial or machine family match")]
    UnknownInstrument(String),

    #[error("invalid pipeline \"{0}\"; expected atropos-and-bowtie2 or fastp-and-minimap2")]
    InvalidPipeline(String),

    #[error("forward and reverse sequence filenames don't match f:{forward} r:{reverse}")]
    MismatchedReadNames { forward: String, reverse: String },

    #[error("sample sheet is missing required column: {0}")]
    MissingSheetColumn(String),

    #[error("failed to read sample sheet: {0}")]
    SampleSheetRead(String),

    #[error("failed to parse sample sheet: {0}")]
    SampleSheetParse(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(Utf8PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
