pub mod scan;

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use snmpscan_common::config::{
    Config, Credentials, DEFAULT_MAX_IN_FLIGHT, DEFAULT_PROBE_ATTEMPTS, DEFAULT_SNMP_PORT,
    DEFAULT_SNMP_RETRIES, DEFAULT_WALK_LINE_BUDGET, Method, ProbeConfig, SnmpConfig, Version,
};

#[derive(Parser, Debug)]
#[command(name = "snmpscan")]
#[command(about = "Poll SNMP devices across an IPv4 range.")]
#[command(
    after_help = "Example: snmpscan -t 10.0.0.0-150 -c v3User -m Get -v 3 -p PrivPass --pt AES256 -a AuthPass --at SHA512 -o 1.3.6.1.2.1.1.1.0"
)]
pub struct CommandLine {
    /// Target devices (10.0.0.1, 10.0.0.1-100 or 10.0.0.1,10.0.0.2)
    #[arg(short = 't', long)]
    pub target: String,

    /// SNMP method: Get or Walk
    #[arg(short = 'm', long, default_value = "Get")]
    pub method: String,

    /// SNMP version: 1, 2c or 3
    #[arg(short = 'v', long = "snmp-version", default_value = "2c")]
    pub version: String,

    /// Community string, or user name for v3
    #[arg(short = 'c', long, default_value = "public")]
    pub community: String,

    /// v3 authentication passphrase
    #[arg(short = 'a', long = "auth", default_value = "")]
    pub auth_passphrase: String,

    /// v3 authentication protocol: SHA, SHA256 or SHA512
    #[arg(long = "at", default_value = "")]
    pub auth_protocol: String,

    /// v3 privacy passphrase
    #[arg(short = 'p', long = "priv", default_value = "")]
    pub priv_passphrase: String,

    /// v3 privacy protocol: AES, AES192 or AES256
    #[arg(long = "pt", default_value = "")]
    pub priv_protocol: String,

    /// OIDs separated by a comma. A walk uses the first one as its root
    #[arg(short = 'o', long, value_delimiter = ',')]
    pub oids: Vec<String>,

    /// Variables per printed batch during a walk. Lower prints sooner,
    /// higher finishes faster
    #[arg(short = 'n', long = "lines", default_value_t = DEFAULT_WALK_LINE_BUDGET)]
    pub line_budget: usize,

    /// Verbose per-target diagnostics
    #[arg(long = "vv")]
    pub verbose: bool,

    /// Targets polled at the same time
    #[arg(long, default_value_t = DEFAULT_MAX_IN_FLIGHT)]
    pub concurrency: usize,

    /// Echo requests sent before a host counts as unreachable
    #[arg(long, default_value_t = DEFAULT_PROBE_ATTEMPTS)]
    pub ping_attempts: u32,

    /// Seconds to wait for each echo reply
    #[arg(long, default_value_t = 1.0)]
    pub ping_timeout: f64,

    /// SNMP agent port
    #[arg(long, default_value_t = DEFAULT_SNMP_PORT)]
    pub port: u16,

    /// Seconds to wait for each SNMP reply
    #[arg(long, default_value_t = 1.0)]
    pub timeout: f64,

    /// SNMP retransmissions after a timeout
    #[arg(long, default_value_t = DEFAULT_SNMP_RETRIES)]
    pub retries: u32,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> anyhow::Result<Config> {
        let method: Method = self.method.parse()?;
        let version: Version = self.version.parse()?;

        Ok(Config {
            method: Some(method),
            version,
            credentials: Credentials {
                username: self.community.clone(),
                auth_passphrase: self.auth_passphrase.clone(),
                auth_protocol: self.auth_protocol.clone(),
                priv_passphrase: self.priv_passphrase.clone(),
                priv_protocol: self.priv_protocol.clone(),
            },
            oids: self.oids.clone(),
            walk_line_budget: self.line_budget,
            verbose: self.verbose,
            probe: ProbeConfig {
                attempts: self.ping_attempts,
                timeout: seconds(self.ping_timeout).context("invalid --ping-timeout")?,
            },
            snmp: SnmpConfig {
                port: self.port,
                timeout: seconds(self.timeout).context("invalid --timeout")?,
                retries: self.retries,
            },
            max_in_flight: self.concurrency,
        })
    }
}

fn seconds(secs: f64) -> anyhow::Result<Duration> {
    Ok(Duration::try_from_secs_f64(secs)?)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
