//! Command-line interface for parse-nomad-config
//!
//! Loads one or more Nomad agent configuration files and prints the resulting
//! configuration as JSON, through a template, or as an empty line.

use anyhow::{bail, Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{load_config, Config, Merge};
use crate::render::format;
use crate::version::full_version;

pub mod output;

/// Load, merge and print Nomad agent configuration files
#[derive(Debug, Parser)]
#[command(name = "parse-nomad-config")]
#[command(author, about, long_about = None)]
pub struct Cli {
    /// Configuration files or directories (HCL or JSON)
    #[arg(value_name = "HCL-FILE")]
    pub files: Vec<PathBuf>,

    /// Output in JSON format
    #[arg(short, long)]
    pub json: bool,

    /// Handlebars template to format the output with
    #[arg(short, long, value_name = "TEMPLATE", default_value = "")]
    pub template: String,

    /// Write to the given file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<String>,

    /// Merge all files into one configuration instead of keeping only the last
    #[arg(short, long)]
    pub merge: bool,

    /// Show the version number and immediately exit
    #[arg(short = 'v', long)]
    pub version: bool,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(long)]
    pub verbose: bool,
}

impl Cli {
    /// Output file, if one was named. An empty `--out` means stdout.
    pub fn out_path(&self) -> Option<&Path> {
        self.out.as_deref().filter(|p| !p.is_empty()).map(Path::new)
    }
}

/// Parse `args`, run, and map the outcome to a process exit code:
/// 0 on success, 1 on a runtime error, 2 on a usage error.
pub fn run<I, T>(args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let code = usage_exit_code(&err);
            if err.kind() == ErrorKind::DisplayHelp {
                eprint!("{}", err.render());
            } else {
                let _ = err.print();
            }
            return ExitCode::from(code);
        }
    };

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if cli.version {
        println!("{}", full_version());
        return ExitCode::SUCCESS;
    }

    match execute(&cli, std::io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}\n", err);
            ExitCode::FAILURE
        }
    }
}

/// Exit status for a failed parse. Help output is a usage exit like any other.
fn usage_exit_code(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp => 2,
        _ => err.exit_code().clamp(0, 255) as u8,
    }
}

/// Load every file named in `cli`, format the result and write it to the
/// `--out` file or to `stdout`.
pub fn execute<W: Write>(cli: &Cli, stdout: W) -> Result<()> {
    if cli.files.is_empty() {
        bail!("no configuration file supplied");
    }

    let mut config = Config::default();
    for path in &cli.files {
        let loaded = load_config(path)
            .with_context(|| format!("failed to load configuration. file:{}", path.display()))?;
        if cli.merge {
            config.merge(loaded);
        } else {
            config = loaded;
        }
    }
    tracing::debug!("Loaded configuration from {} source file(s)", config.files.len());

    let out = format(cli.json, &cli.template, &config).context("failed outputting config")?;

    match cli.out_path() {
        Some(path) => {
            let file = output::create_truncate(path)
                .with_context(|| format!("can't open {} for writing", path.display()))?;
            output::write_line(file, &out)
                .with_context(|| format!("failed writing to {}", path.display()))?;
        }
        None => output::write_line(stdout, &out).context("failed writing to stdout")?,
    }

    Ok(())
}
