//! Command-line argument definitions using clap.

use clap::{ArgAction, Parser, ValueEnum};
use rollcall::{AckPolicy, BarrierConfig};
use std::net::IpAddr;
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Wait until every host in a job has started.
///
/// Each participant runs `rollcall <HOSTFILE> <HOSTNAME>` with the same host
/// file. Peers announce themselves over UDP until everyone has heard from
/// everyone, then each prints `READY` on stderr and exits 0.
#[derive(Parser, Debug)]
#[command(name = "rollcall")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Newline-delimited list of participant hostnames
    pub hostfile: PathBuf,

    /// This host's identity as listed in the host file (default: system hostname)
    #[arg(env = "ROLLCALL_HOSTNAME")]
    pub hostname: Option<String>,

    /// TOML config file; command-line flags take precedence
    #[arg(short, long, env = "ROLLCALL_CONFIG")]
    pub config: Option<PathBuf>,

    /// UDP port to bind and to reach peers on
    #[arg(short, long, env = "ROLLCALL_PORT")]
    pub port: Option<u16>,

    /// Local address to bind
    #[arg(long, env = "ROLLCALL_BIND")]
    pub bind: Option<IpAddr>,

    /// Milliseconds between READY sweeps
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: Option<u64>,

    /// Milliseconds to wait after binding before the first sweep
    #[arg(long)]
    pub startup_delay_ms: Option<u64>,

    /// Give up after this many milliseconds (default: wait forever)
    #[arg(long, env = "ROLLCALL_MAX_WAIT_MS")]
    pub max_wait_ms: Option<u64>,

    /// Keep acknowledging late peers for this many milliseconds after completion
    #[arg(long)]
    pub linger_ms: Option<u64>,

    /// How an incoming ACK is interpreted
    #[arg(long, value_enum)]
    pub ack_policy: Option<AckPolicyArg>,

    /// Line printed to stderr once every peer is ready
    #[arg(long)]
    pub signal_line: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// [`AckPolicy`] as a command-line value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AckPolicyArg {
    /// An ACK marks its sender ready
    CountsAsReady,
    /// Only a READY marks its sender ready
    ReadyOnly,
}

impl From<AckPolicyArg> for AckPolicy {
    fn from(arg: AckPolicyArg) -> Self {
        match arg {
            AckPolicyArg::CountsAsReady => Self::CountsAsReady,
            AckPolicyArg::ReadyOnly => Self::ReadyOnly,
        }
    }
}

impl Cli {
    /// Default log level implied by `-v` / `-q`.
    pub const fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::WARN;
        }
        match self.verbose {
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    /// Overlay flags that were given on top of file config.
    pub fn apply(&self, config: &mut BarrierConfig) {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(bind) = self.bind {
            config.bind_ip = bind;
        }
        if let Some(ms) = self.interval_ms {
            config.retry_interval_ms = ms;
        }
        if let Some(ms) = self.startup_delay_ms {
            config.startup_delay_ms = ms;
        }
        if let Some(ms) = self.max_wait_ms {
            config.max_wait_ms = Some(ms);
        }
        if let Some(ms) = self.linger_ms {
            config.linger_ms = ms;
        }
        if let Some(policy) = self.ack_policy {
            config.ack_policy = policy.into();
        }
        if let Some(line) = &self.signal_line {
            config.signal_line.clone_from(line);
        }
    }
}
