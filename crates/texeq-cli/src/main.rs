use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use texeq_extract::{extract_with, EquationRecord, ExtractOptions, Extraction};
use texeq_source::{read_document, DerivationRequest, LocalDirectory, SourceProvider};

#[derive(Parser)]
#[command(name = "texeq")]
#[command(about = "Find LaTeX equations by the number a reader sees", long_about = None)]
struct Cli {
    /// More logging on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON file with extraction options
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every extracted equation as JSON
    List {
        /// A .tex file or a directory of sources
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Print the body of one equation
    Show {
        #[arg(value_name = "PATH")]
        path: PathBuf,
        /// Printed equation number, e.g. 7 or 7a
        label: String,
        /// Show neighbouring equations and ask before answering
        #[arg(long)]
        confirm: bool,
    },
    /// Print the derivation request for one equation as JSON
    Request {
        #[arg(value_name = "PATH")]
        path: PathBuf,
        label: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let options = load_options(cli.config.as_deref())?;

    match &cli.command {
        Commands::List { path } => {
            let extraction = load(path, &options)?;
            println!("{}", serde_json::to_string_pretty(&extraction.records)?);
        }
        Commands::Show {
            path,
            label,
            confirm,
        } => {
            let extraction = load(path, &options)?;
            let record = if *confirm {
                confirm_record(&extraction, label, options.neighborhood_radius)?
            } else {
                extraction.locate(label)?
            };
            println!("{}", record.body);
        }
        Commands::Request { path, label } => {
            let extraction = load(path, &options)?;
            let record = extraction.locate(label)?;
            println!("{}", DerivationRequest::for_record(record).to_json()?);
        }
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();
}

fn load_options(path: Option<&Path>) -> Result<ExtractOptions> {
    let Some(path) = path else {
        return Ok(ExtractOptions::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config {}", path.display()))
}

fn load(path: &Path, options: &ExtractOptions) -> Result<Extraction> {
    let identifier = path.to_string_lossy();
    let document = LocalDirectory::default()
        .locate(&identifier)
        .with_context(|| format!("No document at {}", path.display()))?;
    log::info!("Reading {}", document.display());

    let extraction = extract_with(&read_document(&document), options);
    for problem in &extraction.problems {
        log::info!("{}", problem);
    }
    Ok(extraction)
}

fn confirm_record<'a>(
    extraction: &'a Extraction,
    label: &str,
    radius: usize,
) -> Result<&'a EquationRecord> {
    let pending = extraction.disambiguate(label, radius)?;
    let mut stderr = io::stderr().lock();
    if pending.is_duplicated() {
        writeln!(
            stderr,
            "Equation ({}) appears more than once.",
            pending.label()
        )?;
    }
    for (index, record) in pending.window() {
        let marker = if index == pending.index() { ">" } else { " " };
        let number = record.number.as_deref().unwrap_or("-");
        writeln!(stderr, "{} ({}) {}", marker, number, record.body)?;
    }
    write!(
        stderr,
        "Is ({}) the equation you meant? [y / other label] ",
        pending.label()
    )?;
    stderr.flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(pending.answer(&input)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_show_with_confirm() {
        let cli = Cli::try_parse_from(["texeq", "-vv", "show", "paper.tex", "7a", "--confirm"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Show { ref label, confirm: true, .. } if label == "7a"
        ));
    }

    #[test]
    fn default_options_without_config() {
        assert_eq!(load_options(None).unwrap(), ExtractOptions::default());
    }
}
