use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jsend::{EnvelopeParser, JSendParser, JSendResult, ParsePolicy, SchemaRegistry};
use jsend_client::{ClientConfig, JSendClient};
use serde_json::Value;
use std::error::Error as _;
use std::io::Read;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "jsendctl", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a response body and print the normalized envelope
    Parse {
        /// Body file; reads stdin when omitted or "-"
        #[arg(value_name = "FILE")]
        file: Option<String>,
        /// strict rejects bodies that are not envelopes, naked reads them as data
        #[arg(long, env = "JSEND_PARSE_POLICY", default_value = "strict")]
        policy: ParsePolicy,
    },
    /// Check that a document is a well-formed JSend envelope
    Validate {
        /// Envelope file; reads stdin when omitted or "-"
        #[arg(value_name = "FILE")]
        file: Option<String>,
    },
    /// GET a URL and print the normalized envelope
    Get {
        #[arg(value_name = "URL")]
        url: String,
        #[arg(long, env = "JSEND_PARSE_POLICY", default_value = "strict")]
        policy: ParsePolicy,
    },
    /// Print version and exit
    Version,
}

fn init_tracing() {
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_input(file: Option<&str>) -> Result<Vec<u8>> {
    match file {
        None | Some("-") => {
            let mut buffer = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
        Some(path) => std::fs::read(path).with_context(|| format!("Failed to read {}", path)),
    }
}

fn print_result(result: &JSendResult<Value>) -> Result<()> {
    let envelope = result.to_envelope()?;
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

fn report(err: &dyn std::error::Error) {
    eprintln!("✗ {}", err);
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {}", cause);
        source = cause.source();
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    SchemaRegistry::init().context("Embedded JSend schemas failed to load")?;

    match cli.cmd {
        Commands::Parse { file, policy } => {
            let body = read_input(file.as_deref())?;
            debug!("Parsing {} bytes with {} policy", body.len(), policy);

            match EnvelopeParser::new(policy).parse_slice::<Value>(&body) {
                Ok(result) => print_result(&result)?,
                Err(err) => {
                    report(&err);
                    std::process::exit(1);
                }
            }
        }
        Commands::Validate { file } => {
            let body = read_input(file.as_deref())?;

            let document: Value = match serde_json::from_slice(&body) {
                Ok(document) => document,
                Err(e) => {
                    eprintln!("✗ Invalid JSend envelope: not valid JSON: {}", e);
                    std::process::exit(1);
                }
            };

            match SchemaRegistry::global().check_envelope(&document) {
                Ok(status) => println!("✓ Valid JSend envelope (status: {})", status),
                Err(violation) => {
                    eprintln!("✗ Invalid JSend envelope: {}", violation);
                    std::process::exit(1);
                }
            }
        }
        Commands::Get { url, policy } => {
            let config = ClientConfig::from_env()?.with_parse_policy(policy);
            let client = JSendClient::from_config(config)?;

            match client.get::<Value>(&url) {
                Ok(result) => print_result(&result)?,
                Err(err) => {
                    report(&err);
                    std::process::exit(1);
                }
            }
        }
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
