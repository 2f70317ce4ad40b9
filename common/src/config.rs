//! Scan configuration.
//!
//! A [`Config`] is assembled once by the caller and only ever read by the
//! scan. Tasks receive an immutable snapshot of it, never a handle into
//! state another task can change.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ScanError;

/// sysName.0, queried when a Get names no OIDs.
pub const DEFAULT_GET_OID: &str = "1.3.6.1.2.1.1.5.0";
/// Root walked when a Walk names no OID.
pub const DEFAULT_WALK_OID: &str = "1.3.6";

pub const DEFAULT_WALK_LINE_BUDGET: usize = 200;
pub const DEFAULT_MAX_IN_FLIGHT: usize = 200;

pub const DEFAULT_PROBE_ATTEMPTS: u32 = 3;
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(1_000);

pub const DEFAULT_SNMP_PORT: u16 = 161;
pub const DEFAULT_SNMP_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_SNMP_RETRIES: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Walk,
}

impl FromStr for Method {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "get" => Ok(Method::Get),
            "walk" => Ok(Method::Walk),
            _ => Err(ScanError::UnknownMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "Get"),
            Method::Walk => write!(f, "Walk"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Version {
    V1,
    #[default]
    V2c,
    V3,
}

impl FromStr for Version {
    type Err = ScanError;

    /// Accepts `1`, `2c`, `3`, optionally prefixed with `v`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.strip_prefix('v').unwrap_or(&lower) {
            "1" => Ok(Version::V1),
            "2c" | "2" => Ok(Version::V2c),
            "3" => Ok(Version::V3),
            _ => Err(ScanError::UnknownVersion(s.to_string())),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::V1 => write!(f, "1"),
            Version::V2c => write!(f, "2c"),
            Version::V3 => write!(f, "3"),
        }
    }
}

/// Credentials for a session.
///
/// Versions 1 and 2c only read `username`, as the community string.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub auth_passphrase: String,
    pub auth_protocol: String,
    pub priv_passphrase: String,
    pub priv_protocol: String,
}

impl Credentials {
    pub fn community(community: impl Into<String>) -> Self {
        Self {
            username: community.into(),
            ..Default::default()
        }
    }
}

// Secrets stay out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("auth_protocol", &self.auth_protocol)
            .field("priv_protocol", &self.priv_protocol)
            .finish_non_exhaustive()
    }
}

/// Liveness probe parameters. A probe is bounded by `attempts * timeout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeConfig {
    pub attempts: u32,
    pub timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_PROBE_ATTEMPTS,
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

/// Transport settings handed to the session connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnmpConfig {
    pub port: u16,
    pub timeout: Duration,
    pub retries: u32,
}

impl Default for SnmpConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_SNMP_PORT,
            timeout: DEFAULT_SNMP_TIMEOUT,
            retries: DEFAULT_SNMP_RETRIES,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` is rejected by the scan with `UnknownMethod`.
    pub method: Option<Method>,
    pub version: Version,
    pub credentials: Credentials,
    /// OIDs for a Get. A Walk uses the first entry as its root.
    pub oids: Vec<String>,
    /// Variables buffered before a Walk emits a response.
    pub walk_line_budget: usize,
    pub verbose: bool,
    pub probe: ProbeConfig,
    pub snmp: SnmpConfig,
    /// Upper bound on target tasks executing at the same time.
    pub max_in_flight: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            method: None,
            version: Version::default(),
            credentials: Credentials::community("public"),
            oids: Vec::new(),
            walk_line_budget: DEFAULT_WALK_LINE_BUDGET,
            verbose: false,
            probe: ProbeConfig::default(),
            snmp: SnmpConfig::default(),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }
}

impl Config {
    /// OIDs a Get asks for, falling back to sysName.0.
    pub fn get_oids(&self) -> Vec<String> {
        let oids: Vec<String> = self
            .oids
            .iter()
            .map(|oid| oid.trim().to_string())
            .filter(|oid| !oid.is_empty())
            .collect();

        if oids.is_empty() {
            vec![DEFAULT_GET_OID.to_string()]
        } else {
            oids
        }
    }

    /// Root a Walk starts from. Only the first configured OID is used.
    pub fn walk_root(&self) -> String {
        self.oids
            .iter()
            .map(|oid| oid.trim())
            .find(|oid| !oid.is_empty())
            .unwrap_or(DEFAULT_WALK_OID)
            .to_string()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
