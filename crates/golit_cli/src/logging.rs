//! Log output for the CLI, driven by `-v`/`-q` unless `RUST_LOG` is set.

use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// Crates whose events the default filter lets through.
const TARGETS: &[&str] = &["golit_cli", "golit_scanner", "golit_fixture"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    Debug,
    Trace,
}

impl Verbosity {
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }

    fn to_level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::INFO,
            Self::Debug => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    fn to_filter(self) -> String {
        let level = self.to_level();
        TARGETS
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

pub fn init(verbosity: Verbosity) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.to_filter()));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(verbosity >= Verbosity::Debug)
        .with_file(verbosity >= Verbosity::Debug)
        .with_line_number(verbosity >= Verbosity::Debug)
        .compact();

    // Logs go to stderr so that stdout stays machine-readable with --json.
    match verbosity {
        Verbosity::Quiet => subscriber.with_writer(std::io::sink).init(),
        Verbosity::Normal => subscriber.without_time().with_writer(std::io::stderr).init(),
        _ => subscriber.with_writer(std::io::stderr).init(),
    }
}
