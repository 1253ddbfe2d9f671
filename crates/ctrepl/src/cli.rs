use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Interactive client for a ct RPC server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Schema file describing the server's structs and functions
    #[arg(long, env = "CT_SCHEMA")]
    pub schema: PathBuf,

    /// Server host
    #[arg(long, env = "CT_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Server port
    #[arg(short, long, env = "CT_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Per-call timeout in milliseconds, covering connect, send and receive
    #[arg(long, env = "CT_TIMEOUT_MS", default_value_t = 5000)]
    pub timeout_ms: u64,

    /// Never print the prompt, even on a terminal
    #[arg(long)]
    pub no_tty: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["ctrepl", "--schema", "api.ct"]).unwrap();
        assert_eq!(args.schema, PathBuf::from("api.ct"));
        assert_eq!(args.addr(), "127.0.0.1:8080");
        assert_eq!(args.timeout(), Duration::from_secs(5));
        assert!(!args.no_tty);
        assert!(!args.verbose);
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "ctrepl",
            "--schema",
            "api.ct",
            "--host",
            "10.0.0.2",
            "-p",
            "9000",
            "--timeout-ms",
            "250",
            "--no-tty",
            "-v",
        ])
        .unwrap();
        assert_eq!(args.addr(), "10.0.0.2:9000");
        assert_eq!(args.timeout(), Duration::from_millis(250));
        assert!(args.no_tty);
        assert!(args.verbose);
    }

    #[test]
    fn test_schema_is_required() {
        assert!(Args::try_parse_from(["ctrepl"]).is_err());
    }
}
