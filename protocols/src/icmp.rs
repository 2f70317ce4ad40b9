//! ICMP echo liveness probe.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use async_trait::async_trait;
use snmpscan_common::info;
use snmpscan_common::scanning::LivenessProbe;
use surge_ping::{Client, Config, ICMP, PingIdentifier, PingSequence};
use tracing::debug;

const PAYLOAD_LEN: usize = 56;

/// Echo-based prober sharing one ICMP socket across all probes.
///
/// When the socket cannot be opened every probe answers `false`.
pub struct IcmpProber {
    client: Option<Client>,
}

impl IcmpProber {
    /// Opens the ICMP socket. Must be called from within a Tokio runtime.
    pub fn new() -> Self {
        if !is_root::is_root() {
            info!("Not running as root, ICMP echo may be refused by the OS");
        }

        let config = Config::builder().kind(ICMP::V4).build();
        let client = match Client::new(&config) {
            Ok(client) => Some(client),
            Err(e) => {
                info!("ICMP socket unavailable, every host will be treated as down: {e}");
                None
            }
        };

        Self { client }
    }
}

impl Default for IcmpProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LivenessProbe for IcmpProber {
    async fn probe(&self, addr: Ipv4Addr, timeout: Duration, attempts: u32) -> bool {
        let Some(client) = &self.client else {
            return false;
        };

        let mut pinger = client
            .pinger(IpAddr::V4(addr), PingIdentifier(rand::random()))
            .await;
        pinger.timeout(timeout);

        let payload = [0u8; PAYLOAD_LEN];
        for seq in 0..attempts {
            match pinger.ping(PingSequence(seq as u16), &payload).await {
                Ok((_packet, rtt)) => {
                    debug!("{addr} answered echo #{seq} in {rtt:?}");
                    return true;
                }
                Err(e) => debug!("{addr} echo #{seq} failed: {e}"),
            }
        }
        false
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
