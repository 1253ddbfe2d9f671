//! Interactive client for ct RPC servers.
//!
//! Loads a schema, connects lazily to the configured server and reads one call per line from
//! stdin. Logs go to stderr; stdout carries only REPL output.

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ctpack::parse_schema;
use ctrpc::Session;

mod cli;
mod repl;
mod tcp;

use crate::cli::Args;
use crate::tcp::TcpTransport;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let text = std::fs::read_to_string(&args.schema)
        .with_context(|| format!("failed to read schema {}", args.schema.display()))?;
    let schema = parse_schema(&text)
        .with_context(|| format!("invalid schema {}", args.schema.display()))?;
    tracing::info!(
        path = %args.schema.display(),
        structs = schema.structs().count(),
        functions = schema.functions().count(),
        "schema loaded"
    );

    let transport = TcpTransport::new(args.addr(), args.timeout());
    let session = Session::new(Arc::new(schema), transport);

    let prompt = !args.no_tty && std::io::stdin().is_terminal();
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    repl::run(&session, stdin, tokio::io::stdout(), prompt).await
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
