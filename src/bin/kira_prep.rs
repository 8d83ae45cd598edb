use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use kira_prep::config::ConfigLoader;
use kira_prep::domain::{Pipeline, RunId};
use kira_prep::error::PrepError;
use kira_prep::instrument::resolve_instrument;
use kira_prep::output::{JsonOutput, OutputMode, PrepSummary, write_preparations};
use kira_prep::prep::build_preparations;
use kira_prep::sample_sheet::SampleSheet;

#[derive(Parser)]
#[command(name = "kira-prep")]
#[command(about = "Build sequencing preparation tables from a run directory and its sample sheet")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true)]
    non_interactive: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Build one preparation table per project and lane")]
    Prep(PrepArgs),
    #[command(about = "Show run date, instrument model and run center for a run id")]
    RunInfo(RunInfoArgs),
}

#[derive(Args)]
struct PrepArgs {
    run_dir: Utf8PathBuf,

    #[arg(long)]
    sample_sheet: Utf8PathBuf,

    #[arg(long)]
    pipeline: Option<Pipeline>,

    #[arg(long)]
    output_dir: Option<Utf8PathBuf>,

    #[arg(long)]
    config: Option<String>,
}

#[derive(Args)]
struct RunInfoArgs {
    run_id: String,
}

#[derive(Serialize)]
struct RunInfo {
    run_id: String,
    run_date: String,
    instrument_code: String,
    instrument_model: String,
    run_center: String,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<PrepError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &PrepError) -> u8 {
    match error {
        PrepError::InvalidPipeline(_)
        | PrepError::ConfigRead(_)
        | PrepError::ConfigParse(_) => 2,
        PrepError::SampleSheetRead(_)
        | PrepError::SampleSheetParse(_)
        | PrepError::MissingSheetColumn(_) => 3,
        PrepError::MismatchedReadNames { .. } | PrepError::Filesystem(_) => 4,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.non_interactive {
        OutputMode::NonInteractive
    } else {
        OutputMode::Interactive
    };

    match cli.command {
        Commands::Prep(args) => run_prep(args, output_mode),
        Commands::RunInfo(args) => run_info(args),
    }
}

fn run_prep(args: PrepArgs, output_mode: OutputMode) -> miette::Result<()> {
    let config = ConfigLoader::resolve(args.config.as_deref())?;
    let pipeline = args.pipeline.unwrap_or(config.pipeline);
    let output_dir = args.output_dir.or(config.output_dir);

    let sheet = SampleSheet::from_path(&args.sample_sheet)?;
    let preparations = build_preparations(&args.run_dir, &sheet, Some(pipeline))?;

    let written = match &output_dir {
        Some(dir) => write_preparations(dir, &preparations)?,
        None => Vec::new(),
    };

    let run_id = RunId::from_run_path(&args.run_dir)?;
    let summary = PrepSummary::new(run_id.as_str(), &preparations, &written);
    match output_mode {
        OutputMode::NonInteractive => JsonOutput::print_summary(&summary).into_diagnostic()?,
        OutputMode::Interactive => print_prep_summary(&summary),
    }
    Ok(())
}

fn run_info(args: RunInfoArgs) -> miette::Result<()> {
    let run_id: RunId = args.run_id.parse()?;
    let instrument = resolve_instrument(run_id.instrument_code())?;
    let info = RunInfo {
        run_id: run_id.to_string(),
        run_date: run_id.formatted_date(),
        instrument_code: run_id.instrument_code().to_string(),
        instrument_model: instrument.model,
        run_center: instrument.run_center,
    };
    JsonOutput::print_json(&info).into_diagnostic()
}

fn print_prep_summary(summary: &PrepSummary) {
    let green = "\x1b[32m";
    let yellow = "\x1b[33m";
    let cyan = "\x1b[36m";
    let reset = "\x1b[0m";

    println!("{cyan}kira-prep summary for {}{reset}", summary.run_id);
    println!("{green}preparations: {}{reset}", summary.tables.len());

    for table in &summary.tables {
        let color = if table.samples == 0 { yellow } else { green };
        println!("{color}  {} ({} samples){reset}", table.name, table.samples);
        if let Some(path) = &table.path {
            println!("{color}    written: {path}{reset}");
        }
    }

    if !summary.warnings.is_empty() {
        println!("{yellow}warnings: {}{reset}", summary.warnings.len());
        for warning in &summary.warnings {
            println!("{yellow}  {warning}{reset}");
        }
    }
}
