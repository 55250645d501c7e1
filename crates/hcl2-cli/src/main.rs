//! `hcl2-to-json`: read HCL2, print the forward-transformed value tree as JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert HCL2 to JSON", long_about = None)]
struct Cli {
    /// Input file; reads stdin when omitted
    path: Option<PathBuf>,

    /// Include __start_line__/__end_line__ metadata on block bodies
    #[arg(long)]
    with_meta: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(&cli) {
        eprintln!("hcl2-to-json: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let text = match &cli.path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => std::io::read_to_string(std::io::stdin()).context("failed to read stdin")?,
    };

    let value = if cli.with_meta {
        hcl2_lib::loads_with_meta(&text)?
    } else {
        hcl2_lib::loads(&text)?
    };
    tracing::debug!("document transformed");

    let json = serde_json::to_string_pretty(&value)?;
    println!("{json}");
    Ok(())
}
