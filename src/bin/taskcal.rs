use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::path::PathBuf;
use std::process::ExitCode;
use taskcal::{ConversionReport, Converter, ConverterOptions};

#[derive(Parser)]
#[command(name = "taskcal", version)]
#[command(about = "Convert a task spreadsheet (CSV) into an iCalendar (.ics) file")]
struct Cli {
    /// CSV file to read
    input: PathBuf,

    /// .ics file to write
    output: PathBuf,

    /// PRODID of the generated calendar
    #[arg(long)]
    prodid: Option<String>,

    /// Domain used in the generated UIDs
    #[arg(long)]
    uid_domain: Option<String>,

    /// Log more (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => LevelFilter::Off,
            (false, 0) => LevelFilter::Warn,
            (false, 1) => LevelFilter::Info,
            (false, _) => LevelFilter::Debug,
        }
    }

    fn options(&self) -> ConverterOptions {
        let defaults = ConverterOptions::default();
        ConverterOptions {
            product_id: self.prodid.clone().unwrap_or(defaults.product_id),
            uid_domain: self.uid_domain.clone().unwrap_or(defaults.uid_domain),
            ..defaults
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version end up here too
            let code = if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            err.print().ok();
            return code;
        }
    };

    let log_config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    if let Err(err) = TermLogger::init(
        cli.log_level(),
        log_config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Could not set up logging: {err}");
    }

    match run(&cli) {
        Ok(report) => {
            if !cli.quiet {
                println!(
                    "ICS file created: {} ({} events, {} rows skipped)",
                    cli.output.display(),
                    report.events().len(),
                    report.skipped.len()
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ConversionReport> {
    if !cli.input.is_file() {
        bail!("CSV not found: {}", cli.input.display());
    }

    let report = Converter::new(cli.options())
        .convert_path(&cli.input)
        .with_context(|| format!("Failed to convert {}", cli.input.display()))?;

    std::fs::write(&cli.output, report.to_ics())
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    Ok(report)
}
