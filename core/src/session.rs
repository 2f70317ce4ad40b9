//! Session Builder.
//!
//! Turns credentials and a protocol version into the security parameters a
//! connector authenticates with. Called once per target so that no two
//! tasks ever share the parameters of a live session.

use snmpscan_common::config::{Credentials, Version};
use snmpscan_common::scanning::{AuthProtocol, PrivProtocol, SecurityParams, UsmParams};

pub fn build_security(credentials: &Credentials, version: Version) -> SecurityParams {
    match version {
        Version::V1 | Version::V2c => SecurityParams::Community {
            version,
            community: credentials.username.clone(),
        },
        Version::V3 => SecurityParams::Usm(UsmParams {
            username: credentials.username.clone(),
            auth: AuthProtocol::from_name(&credentials.auth_protocol)
                .map(|protocol| (protocol, credentials.auth_passphrase.clone())),
            privacy: PrivProtocol::from_name(&credentials.priv_protocol)
                .map(|protocol| (protocol, credentials.priv_passphrase.clone())),
        }),
    }
}

/// Protocol names that did not resolve and will fail at connect time.
pub fn undefined_protocols(security: &SecurityParams) -> Vec<String> {
    let SecurityParams::Usm(usm) = security else {
        return Vec::new();
    };

    let mut names: Vec<String> = Vec::new();
    if let Some((AuthProtocol::Undefined(name), _)) = &usm.auth {
        names.push(format!("auth protocol '{name}'"));
    }
    if let Some((PrivProtocol::Undefined(name), _)) = &usm.privacy {
        names.push(format!("privacy protocol '{name}'"));
    }
    names
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
