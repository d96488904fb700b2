use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use luna_tools::consolidate::{self, Consolidation, ConsolidateOptions};
use luna_tools::date::DEFAULT_MARKER;
use luna_tools::render::render_table;
use luna_tools::{Result, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_tracing().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| ToolError::Logging(err.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Consolidate(args) => execute_consolidate(args),
    }
}

fn execute_consolidate(args: ConsolidateArgs) -> Result<()> {
    if let Some(missing) = args.inputs.iter().find(|path| !path.exists()) {
        return Err(ToolError::MissingInput(missing.clone()));
    }

    let options = ConsolidateOptions {
        marker: args.marker.clone(),
    };

    let output = destination(&args)?;

    if !args.json {
        println!("Number of Files Uploaded: {}", args.inputs.len());
    }

    let outcome = match output {
        Some(output) => consolidate::consolidate_to_file(&args.inputs, output, &options)?,
        None => consolidate::consolidate(&args.inputs, &options)?,
    };

    match outcome {
        Consolidation::NoInput => {
            if args.json {
                println!("{}", serde_json::json!({ "files_processed": 0 }));
            } else {
                println!("No files selected.");
            }
        }
        Consolidation::Completed(report) => {
            let output = output.ok_or(ToolError::MissingOutput)?;
            if args.json {
                let summary = report.summary(Some(output));
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                if args.show {
                    println!("Final Output:");
                    println!("{}", render_table(&report.table));
                    println!();
                }
                println!("Final Output saved to: {}", output.display());
            }
        }
    }

    Ok(())
}

/// Destination of the table. Only needed once there is something to write.
fn destination(args: &ConsolidateArgs) -> Result<Option<&Path>> {
    match (args.inputs.is_empty(), args.output.as_deref()) {
        (true, _) => Ok(None),
        (false, Some(output)) => Ok(Some(output)),
        (false, None) => Err(ToolError::MissingOutput),
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Consolidate dated security valuation reports into one table."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Merge per-date reports into a single security-by-date table.
    Consolidate(ConsolidateArgs),
}

#[derive(clap::Args)]
struct ConsolidateArgs {
    /// Report files (.csv, .xlsx, .xls), processed in the given order.
    inputs: Vec<PathBuf>,

    /// Destination file; `.xlsx` writes a workbook, anything else CSV.
    /// Required when any input is given.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Token stripped from file names before reading the YYYYMMDD date.
    #[arg(long, default_value = DEFAULT_MARKER)]
    marker: String,

    /// Print the consolidated table.
    #[arg(long)]
    show: bool,

    /// Print a JSON summary instead of plain text.
    #[arg(long, conflicts_with = "show")]
    json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ConsolidateArgs {
        let cli = Cli::try_parse_from(args).expect("arguments parsed");
        match cli.command {
            Command::Consolidate(args) => args,
        }
    }

    #[test]
    fn no_inputs_need_no_output() {
        let args = parse(&["luna-tools", "consolidate"]);
        assert_eq!(destination(&args).expect("no destination needed"), None);
    }

    #[test]
    fn inputs_without_output_are_rejected() {
        let args = parse(&["luna-tools", "consolidate", "QUOTE20240101.csv"]);
        assert!(matches!(destination(&args), Err(ToolError::MissingOutput)));
    }

    #[test]
    fn inputs_with_output_resolve_destination() {
        let args = parse(&[
            "luna-tools",
            "consolidate",
            "QUOTE20240101.csv",
            "--output",
            "out.xlsx",
        ]);
        assert_eq!(
            destination(&args).expect("destination resolved"),
            Some(Path::new("out.xlsx"))
        );
    }
}
