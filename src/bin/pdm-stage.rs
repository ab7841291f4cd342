use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use pdmstage::{Error, OutputFormat, StageConfig, StepRequest};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Print PJM staging directives that copy restart files into rank directories
#[derive(clap::Parser, Debug)]
#[command(name = "pdm-stage")]
struct Args {
    /// number of processes to run
    #[arg(value_name = "NPROC", value_parser = parse_nproc, allow_negative_numbers = true)]
    nproc: usize,
    /// dfi filename to read
    #[arg(value_name = "DFI_FILE")]
    dfi_file: PathBuf,
    /// directory holding DFI_FILE and the region files
    #[arg(short, long, value_name = "DIR", default_value = "./")]
    input: PathBuf,
    /// time step to read, negative for the latest
    #[arg(
        short,
        long,
        value_name = "STEP",
        default_value = "-1",
        allow_negative_numbers = true,
        value_parser = StepRequest::from_str
    )]
    step: StepRequest,
    /// output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

fn parse_nproc(s: &str) -> Result<usize, String> {
    let nproc: i64 = s
        .parse()
        .map_err(|_| format!("invalid number of procs: {s}"))?;
    if nproc <= 0 {
        return Err(Error::InvalidProcessCount.to_string());
    }
    usize::try_from(nproc).map_err(|e| e.to_string())
}

impl From<Args> for StageConfig {
    fn from(args: Args) -> Self {
        StageConfig {
            input_dir: args.input,
            step: args.step,
            nproc: args.nproc,
            dfi_file: args.dfi_file,
            format: args.format,
        }
    }
}

fn main() -> ExitCode {
    // usage problems, --help included, exit with status 1
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            if err.kind() != ErrorKind::DisplayHelp && !err.to_string().contains("Usage:") {
                eprintln!("\n{}", Args::command().render_usage());
            }
            return ExitCode::from(1);
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdmstage=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = StageConfig::from(args);
    let stdout = std::io::stdout();
    match pdmstage::run(&config, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(1)
        }
    }
}
