//! CLI command definitions and handlers (spec §6.3).

use std::fmt;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

/// Main CLI structure.
#[derive(Parser)]
#[command(name = "dbc")]
#[command(about = "Command-line interface for DBC file manipulation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Print version information.
    Version,
    /// Convert between the DBC text format and its JSON projection.
    Convert {
        /// Path to the input file.
        #[arg(long = "in")]
        input: PathBuf,
        /// Path to the output file. Printed to stdout if omitted.
        #[arg(long = "out")]
        output: Option<PathBuf>,
        /// Force the input format instead of inferring it from `--in`'s
        /// extension. Also used for the output format when `--out` is
        /// omitted or its extension is unrecognized.
        #[arg(long = "ext")]
        ext: Option<Format>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Dbc,
    Json,
}

impl Format {
    fn from_extension(path: &Path) -> Option<Format> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(e) if e.eq_ignore_ascii_case("dbc") => Some(Format::Dbc),
            Some(e) if e.eq_ignore_ascii_case("json") => Some(Format::Json),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum CliError {
    UnknownFormat(PathBuf),
    Dbc(dbc_rs::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::UnknownFormat(path) => {
                write!(f, "cannot infer format for '{}': pass --ext {{dbc|json}}", path.display())
            }
            CliError::Dbc(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {}

impl From<dbc_rs::Error> for CliError {
    fn from(e: dbc_rs::Error) -> Self {
        CliError::Dbc(e)
    }
}

pub fn execute_command(command: Option<Commands>) -> Result<(), CliError> {
    match command {
        Some(Commands::Version) | None => {
            println!("dbc-rs library version {}", dbc_rs::PKG_VERSION);
            Ok(())
        }
        Some(Commands::Convert { input, output, ext }) => convert(&input, output.as_deref(), ext),
    }
}

fn convert(input: &Path, output: Option<&Path>, ext: Option<Format>) -> Result<(), CliError> {
    let input_format = ext.or_else(|| Format::from_extension(input)).ok_or_else(|| CliError::UnknownFormat(input.to_path_buf()))?;
    let output_format = output
        .and_then(Format::from_extension)
        .or(ext)
        .unwrap_or(input_format);

    tracing::info!(path = %input.display(), format = ?input_format, "reading input file");
    let contents = std::fs::read_to_string(input).map_err(dbc_rs::Error::from)?;

    let net = match input_format {
        Format::Dbc => dbc_rs::parse_dbc(&contents)?,
        Format::Json => {
            let (net, warnings) = dbc_rs::from_json(&contents)?;
            for w in warnings {
                tracing::warn!("{}", w);
            }
            net
        }
    };
    dbc_rs::validate(&net)?;

    let rendered = match output_format {
        Format::Dbc => dbc_rs::emit_dbc(&net),
        Format::Json => dbc_rs::to_json(&net)?,
    };

    match output {
        Some(path) => {
            std::fs::write(path, rendered).map_err(dbc_rs::Error::from)?;
            tracing::info!(path = %path.display(), format = ?output_format, "wrote output file");
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
