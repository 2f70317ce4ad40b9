//! Contracts between the scan engine and the outside world.
//!
//! The engine never talks to sockets itself. It consumes a [`LivenessProbe`]
//! and a [`SessionConnector`], and hands [`Response`]s to whoever drains the
//! output channel.

use std::collections::BTreeMap;
use std::fmt;
use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::Version;
use crate::error::SessionError;
use crate::value::DecodedValue;

/// One variable returned by a device. `value` is `None` for nil and
/// exception values (`noSuchObject`, `noSuchInstance`, `endOfMibView`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarBind {
    pub oid: String,
    pub value: Option<DecodedValue>,
}

impl VarBind {
    pub fn new(oid: impl Into<String>, value: impl Into<DecodedValue>) -> Self {
        Self {
            oid: oid.into(),
            value: Some(value.into()),
        }
    }

    pub fn nil(oid: impl Into<String>) -> Self {
        Self {
            oid: oid.into(),
            value: None,
        }
    }
}

/// Values read from one device, keyed by OID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub ip: String,
    pub values: BTreeMap<String, String>,
}

impl Response {
    pub fn new(ip: Ipv4Addr) -> Self {
        Self {
            ip: ip.to_string(),
            values: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

/// Reachability check run before any session is opened.
#[async_trait]
pub trait LivenessProbe: Send + Sync {
    /// Sends up to `attempts` echo requests and returns `true` as soon as
    /// one is answered within `timeout`. Failing to probe at all (e.g.
    /// missing socket permissions) is reported as `false`.
    async fn probe(&self, addr: Ipv4Addr, timeout: Duration, attempts: u32) -> bool;
}

/// Opens management sessions.
#[async_trait]
pub trait SessionConnector: Send + Sync {
    type Session: Session + 'static;

    /// Opens a fresh session to `target`. Every call returns a new,
    /// exclusively owned session. Dropping it releases the connection.
    async fn connect(
        &self,
        target: Ipv4Addr,
        security: &SecurityParams,
    ) -> Result<Self::Session, SessionError>;
}

/// A live session with a single device.
#[async_trait]
pub trait Session: Send {
    /// Issues one request carrying every OID in `oids`.
    async fn get(&mut self, oids: &[String]) -> Result<Vec<VarBind>, SessionError>;

    /// Walks the subtree under `root`, handing each variable to `on_varbind`
    /// as it arrives.
    async fn walk(
        &mut self,
        root: &str,
        on_varbind: &mut (dyn FnMut(VarBind) + Send),
    ) -> Result<(), SessionError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthProtocol {
    Sha,
    Sha256,
    Sha512,
    /// A name missing from the lookup table. Rejected when connecting.
    Undefined(String),
}

const AUTH_PROTOCOLS: &[(&str, AuthProtocol)] = &[
    ("SHA", AuthProtocol::Sha),
    ("SHA256", AuthProtocol::Sha256),
    ("SHA512", AuthProtocol::Sha512),
];

impl AuthProtocol {
    /// Resolves a protocol name. An empty name means "no authentication".
    pub fn from_name(name: &str) -> Option<Self> {
        resolve(name, AUTH_PROTOCOLS, AuthProtocol::Undefined)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrivProtocol {
    Aes,
    Aes192,
    Aes256,
    /// A name missing from the lookup table. Rejected when connecting.
    Undefined(String),
}

const PRIV_PROTOCOLS: &[(&str, PrivProtocol)] = &[
    ("AES", PrivProtocol::Aes),
    ("AES192", PrivProtocol::Aes192),
    ("AES256", PrivProtocol::Aes256),
];

impl PrivProtocol {
    /// Resolves a protocol name. An empty name means "no privacy".
    pub fn from_name(name: &str) -> Option<Self> {
        resolve(name, PRIV_PROTOCOLS, PrivProtocol::Undefined)
    }
}

fn resolve<P: Clone>(name: &str, table: &[(&str, P)], undefined: fn(String) -> P) -> Option<P> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let upper = name.to_ascii_uppercase();
    let found = table
        .iter()
        .find(|(key, _)| *key == upper)
        .map(|(_, protocol)| protocol.clone())
        .unwrap_or_else(|| undefined(name.to_string()));
    Some(found)
}

/// User Security Model parameters for version 3.
#[derive(Clone, PartialEq, Eq)]
pub struct UsmParams {
    pub username: String,
    pub auth: Option<(AuthProtocol, String)>,
    pub privacy: Option<(PrivProtocol, String)>,
}

impl UsmParams {
    /// `noAuthNoPriv`, `authNoPriv` or `authPriv`.
    pub fn security_level(&self) -> &'static str {
        match (&self.auth, &self.privacy) {
            (None, _) => "noAuthNoPriv",
            (Some(_), None) => "authNoPriv",
            (Some(_), Some(_)) => "authPriv",
        }
    }
}

impl fmt::Debug for UsmParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsmParams")
            .field("username", &self.username)
            .field("auth", &self.auth.as_ref().map(|(p, _)| p))
            .field("privacy", &self.privacy.as_ref().map(|(p, _)| p))
            .finish()
    }
}

/// Everything a connector needs to authenticate a session.
#[derive(Clone, PartialEq, Eq)]
pub enum SecurityParams {
    Community { version: Version, community: String },
    Usm(UsmParams),
}

impl SecurityParams {
    pub fn version(&self) -> Version {
        match self {
            SecurityParams::Community { version, .. } => *version,
            SecurityParams::Usm(_) => Version::V3,
        }
    }
}

impl fmt::Debug for SecurityParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecurityParams::Community { version, .. } => f
                .debug_struct("Community")
                .field("version", version)
                .finish_non_exhaustive(),
            SecurityParams::Usm(usm) => usm.fmt(f),
        }
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
