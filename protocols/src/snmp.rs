//! SNMP sessions backed by `async-snmp`.
//!
//! Each [`SnmpSession`] owns its own client and UDP socket, so responses can
//! never cross between targets. Dropping the session closes the socket.

use std::net::Ipv4Addr;
use std::time::Duration;

use anyhow::Context;
use async_snmp::{
    Auth, Client, Error, ErrorStatus, Oid, Retry, UdpClient, Value, WalkAbortReason,
};
use async_trait::async_trait;
use tracing::debug;

use snmpscan_common::config::{SnmpConfig, Version};
use snmpscan_common::error::SessionError;
use snmpscan_common::scanning::{
    AuthProtocol, PrivProtocol, SecurityParams, Session, SessionConnector, VarBind,
};
use snmpscan_common::value::DecodedValue;

pub struct SnmpConnector {
    cfg: SnmpConfig,
}

impl SnmpConnector {
    pub fn new(cfg: SnmpConfig) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl SessionConnector for SnmpConnector {
    type Session = SnmpSession;

    async fn connect(
        &self,
        target: Ipv4Addr,
        security: &SecurityParams,
    ) -> Result<SnmpSession, SessionError> {
        let connect_err = move |reason: String| SessionError::Connect { target, reason };

        let auth: Auth = to_auth(security).map_err(|e| connect_err(format!("{e:#}")))?;
        let addr: String = format!("{target}:{}", self.cfg.port);

        let client: UdpClient = Client::builder(addr, auth)
            .timeout(self.cfg.timeout)
            .retry(Retry::fixed(self.cfg.retries, Duration::ZERO))
            .connect()
            .await
            .map_err(|e| connect_err(e.to_string()))?;

        debug!("session opened to {target} ({:?})", security.version());
        Ok(SnmpSession { target, client })
    }
}

pub struct SnmpSession {
    target: Ipv4Addr,
    client: UdpClient,
}

#[async_trait]
impl Session for SnmpSession {
    async fn get(&mut self, oids: &[String]) -> Result<Vec<VarBind>, SessionError> {
        let target = self.target;
        let query_err = move |e: anyhow::Error| SessionError::Query {
            target,
            reason: format!("{e:#}"),
        };

        let parsed: Vec<Oid> = oids
            .iter()
            .map(|oid| parse_oid(oid))
            .collect::<anyhow::Result<Vec<Oid>>>()
            .map_err(query_err)?;

        let varbinds = self
            .client
            .get_many(&parsed)
            .await
            .context("GET request failed")
            .map_err(query_err)?;

        Ok(varbinds
            .into_iter()
            .map(|vb| VarBind {
                oid: vb.oid.to_string(),
                value: decode(&vb.value),
            })
            .collect())
    }

    async fn walk(
        &mut self,
        root: &str,
        on_varbind: &mut (dyn FnMut(VarBind) + Send),
    ) -> Result<(), SessionError> {
        let target = self.target;
        let walk_err = move |e: anyhow::Error| SessionError::Walk {
            target,
            reason: format!("{e:#}"),
        };

        let root_oid: Oid = parse_oid(root).map_err(walk_err)?;
        let mut stream = self
            .client
            .walk(root_oid)
            .map_err(|e| walk_err(anyhow::Error::new(*e)))?;

        while let Some(item) = stream.next().await {
            let vb = match item {
                Ok(vb) => vb,
                Err(e) if ends_walk(&e) => {
                    debug!("{target}: walk of {root} ended: {e}");
                    break;
                }
                Err(e) => {
                    return Err(walk_err(
                        anyhow::Error::new(*e).context("walk request failed"),
                    ));
                }
            };

            let Some(value) = decode(&vb.value) else {
                break;
            };

            on_varbind(VarBind {
                oid: vb.oid.to_string(),
                value: Some(value),
            });
        }

        Ok(())
    }
}

/// Errors that terminate a walk cleanly. SNMPv1 agents signal the end of the
/// MIB with `noSuchName`; a non-increasing or repeated OID stops the loop.
fn ends_walk(err: &Error) -> bool {
    matches!(
        err,
        Error::Snmp {
            status: ErrorStatus::NoSuchName,
            ..
        } | Error::WalkAborted {
            reason: WalkAbortReason::NonIncreasing | WalkAbortReason::Cycle,
            ..
        }
    )
}

fn parse_oid(oid: &str) -> anyhow::Result<Oid> {
    Oid::parse(oid.trim().trim_start_matches('.')).with_context(|| format!("invalid OID '{oid}'"))
}

fn to_auth(security: &SecurityParams) -> anyhow::Result<Auth> {
    let auth: Auth = match security {
        SecurityParams::Community {
            version: Version::V1,
            community,
        } => Auth::v1(community.as_str()),
        SecurityParams::Community { community, .. } => Auth::v2c(community.as_str()),
        SecurityParams::Usm(usm) => {
            let mut builder = Auth::usm(usm.username.as_str());
            if let Some((protocol, passphrase)) = &usm.auth {
                builder = builder.auth(auth_protocol(protocol)?, passphrase.as_str());
            }
            if let Some((protocol, passphrase)) = &usm.privacy {
                builder = builder.privacy(priv_protocol(protocol)?, passphrase.as_str());
            }
            builder.into()
        }
    };
    Ok(auth)
}

fn auth_protocol(protocol: &AuthProtocol) -> anyhow::Result<async_snmp::AuthProtocol> {
    match protocol {
        AuthProtocol::Sha => Ok(async_snmp::AuthProtocol::Sha1),
        AuthProtocol::Sha256 => Ok(async_snmp::AuthProtocol::Sha256),
        AuthProtocol::Sha512 => Ok(async_snmp::AuthProtocol::Sha512),
        AuthProtocol::Undefined(name) => anyhow::bail!("unsupported auth protocol '{name}'"),
    }
}

fn priv_protocol(protocol: &PrivProtocol) -> anyhow::Result<async_snmp::PrivProtocol> {
    match protocol {
        PrivProtocol::Aes => Ok(async_snmp::PrivProtocol::Aes128),
        PrivProtocol::Aes192 => Ok(async_snmp::PrivProtocol::Aes192),
        PrivProtocol::Aes256 => Ok(async_snmp::PrivProtocol::Aes256),
        PrivProtocol::Undefined(name) => anyhow::bail!("unsupported privacy protocol '{name}'"),
    }
}

/// Decode step: maps a wire value onto [`DecodedValue`].
///
/// Nil and exception values decode to `None`.
pub fn decode(value: &Value) -> Option<DecodedValue> {
    match value {
        Value::Null | Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView => None,
        Value::OctetString(bytes) => Some(DecodedValue::Bytes(bytes.to_vec())),
        Value::Integer(n) => Some(DecodedValue::from(*n)),
        Value::Counter32(n) | Value::Gauge32(n) | Value::TimeTicks(n) => {
            Some(DecodedValue::from(*n))
        }
        Value::Counter64(n) => Some(DecodedValue::from(*n)),
        Value::IpAddress(octets) => Some(DecodedValue::Text(Ipv4Addr::from(*octets).to_string())),
        Value::ObjectIdentifier(oid) => Some(DecodedValue::Text(oid.to_string())),
        other => Some(unknown(other)),
    }
}

fn unknown(value: &Value) -> DecodedValue {
    let raw: String = format!("{value:?}");
    let type_name: String = raw
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("Value")
        .to_string();

    DecodedValue::Unknown { raw, type_name }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
