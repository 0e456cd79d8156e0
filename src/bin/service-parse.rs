//! service-parse CLI: turn mechanic transcripts into service record drafts.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use service_parser_core::{evaluate, EvaluationCase, ParserConfig, ServiceParser};

#[derive(Parser)]
#[command(name = "service-parse", version, about = "Parse vehicle service transcripts")]
struct Cli {
    /// Transcripts to parse. Reads one transcript per line from stdin when omitted.
    transcripts: Vec<String>,

    /// TOML file with parser settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output.
    #[arg(long)]
    pretty: bool,

    /// Evaluate a JSON array of {input, expected_parts, expected_cost} cases.
    #[arg(long, value_name = "FILE", conflicts_with = "transcripts")]
    eval: Option<PathBuf>,
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ParserConfig::from_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ParserConfig::default(),
    };
    let parser = ServiceParser::with_config(config).context("building parser")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(path) = &cli.eval {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading evaluation cases from {}", path.display()))?;
        let cases: Vec<EvaluationCase> =
            serde_json::from_str(&raw).context("evaluation file must be a JSON array of cases")?;
        let report = evaluate(&parser, &cases);
        writeln!(out, "{}", to_json(&report, cli.pretty)?)?;
        return Ok(());
    }

    if cli.transcripts.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line.context("reading stdin")?;
            if line.trim().is_empty() {
                continue;
            }
            writeln!(out, "{}", to_json(&parser.parse(&line), cli.pretty)?)?;
        }
    } else {
        for transcript in &cli.transcripts {
            writeln!(out, "{}", to_json(&parser.parse(transcript), cli.pretty)?)?;
        }
    }

    Ok(())
}
