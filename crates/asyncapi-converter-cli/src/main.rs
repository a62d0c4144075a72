//! AsyncAPI converter command-line tool.
//!
//! Reads an AsyncAPI 1.x document from a file or URL and prints it converted
//! to AsyncAPI 2.0.0-rc2.

mod error;
mod logging;
mod source;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use asyncapi_converter::{ConvertOptions, Converter, DecodeOrder, OutputFormat, TARGET_VERSION};

use crate::error::CliError;
use crate::logging::{events, LogFormat, LoggingConfig};
use crate::source::Source;

#[derive(Parser, Debug)]
#[command(
    name = "asyncapi-converter",
    about = "Convert AsyncAPI 1.x documents to AsyncAPI 2.0.0-rc2",
    version
)]
struct Cli {
    /// Path or http(s) URL of the document to convert (YAML or JSON).
    source: String,

    /// Application identifier written to `id` (default: derived from info.title).
    #[arg(long)]
    id: Option<String>,

    /// Emit YAML instead of JSON.
    #[arg(long = "to-yaml", alias = "toYAML")]
    to_yaml: bool,

    /// Write the converted document to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Try the YAML parser before the JSON parser.
    #[arg(long)]
    yaml_first: bool,

    /// Log level.
    #[arg(long, env = "ASYNCAPI_CONVERTER_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Log format (json or pretty).
    #[arg(
        long,
        env = "ASYNCAPI_CONVERTER_LOG_FORMAT",
        default_value = "pretty",
        value_parser = parse_log_format
    )]
    log_format: LogFormat,
}

fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    LogFormat::parse(s)
        .ok_or_else(|| format!("unknown log format '{}' (expected json or pretty)", s))
}

impl Cli {
    fn output_format(&self) -> OutputFormat {
        if self.to_yaml {
            OutputFormat::Yaml
        } else {
            OutputFormat::Json
        }
    }

    fn convert_options(&self) -> ConvertOptions {
        let order = if self.yaml_first {
            DecodeOrder::YamlFirst
        } else {
            DecodeOrder::JsonFirst
        };
        let options = ConvertOptions::new().with_decode_order(order);
        match &self.id {
            Some(id) => options.with_id(id.clone()),
            None => options,
        }
    }
}

/// Read, convert and write one document.
fn convert(cli: &Cli) -> Result<(), CliError> {
    let source = Source::parse(&cli.source);
    let input = source.read()?;
    tracing::info!(
        event = events::DOCUMENT_LOADED,
        source = %source,
        bytes = input.len()
    );

    let converter = Converter::new(cli.convert_options());
    let output = converter.convert(&input, cli.output_format())?;

    match &cli.output {
        Some(path) => std::fs::write(path, &output)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&output)?;
            stdout.flush()?;
        }
    }

    tracing::info!(
        event = events::DOCUMENT_WRITTEN,
        destination = %cli.output.as_ref().map_or("stdout".into(), |p| p.display().to_string()),
        bytes = output.len()
    );
    Ok(())
}

/// Run the conversion and map the outcome to an exit code.
fn run_convert(cli: &Cli) -> ExitCode {
    match convert(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_up_to_date() => {
            tracing::info!(event = events::DOCUMENT_UP_TO_DATE, source = %cli.source);
            eprintln!(
                "{} is already an AsyncAPI {} document, nothing to convert",
                cli.source, TARGET_VERSION
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(event = events::CONVERSION_FAILED, error = %e);
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let logging = LoggingConfig::new()
        .with_log_level(cli.log_level.clone())
        .with_log_format(cli.log_format);
    if let Err(e) = logging::init_logging(&logging) {
        eprintln!("warning: {}", e);
    }

    run_convert(&cli)
}
