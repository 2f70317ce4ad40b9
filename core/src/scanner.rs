//! # Scan Executor
//!
//! Entry point of the engine. A scan validates its configuration, expands
//! the target list and hands one [`executor`] task per address to the
//! [`governor`], which caps how many run at once. Results leave through the
//! [`ScanChannels`] while the scan is still running; the scan only returns
//! once every task has reached a terminal state.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use snmpscan_common::config::{Config, Method};
use snmpscan_common::error::ScanError;
use snmpscan_common::network::target;
use snmpscan_common::scanning::{LivenessProbe, SessionConnector};
use snmpscan_common::warn;
use snmpscan_protocols::{IcmpProber, SnmpConnector};

use crate::output::{Output, ScanChannels};
use crate::session;

pub mod executor;
pub mod governor;


pub use executor::{Query, ScanRequest, TargetState};
pub use governor::ProgressFn;

use governor::{Governor, Tally};

/// Stands in for the method name when the configuration carries none.
const UNSET_METHOD: &str = "<unset>";

/// What a finished scan did, per terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    pub targets: usize,
    pub done: usize,
    pub unreachable: usize,
    pub connect_failed: usize,
    pub query_failed: usize,
    /// Tasks that panicked or were cancelled.
    pub aborted: usize,
    pub elapsed: Duration,
}

impl ScanSummary {
    fn new(targets: usize, tally: Tally, elapsed: Duration) -> Self {
        Self {
            targets,
            done: tally.done,
            unreachable: tally.unreachable,
            connect_failed: tally.connect_failed,
            query_failed: tally.query_failed,
            aborted: tally.aborted,
            elapsed,
        }
    }

    pub fn reachable(&self) -> usize {
        self.targets - self.unreachable - self.aborted
    }
}

impl ScanRequest {
    /// Snapshots the parts of `cfg` a target task reads.
    pub fn from_config(cfg: &Config) -> Result<Self, ScanError> {
        let query: Query = match cfg.method {
            Some(Method::Get) => Query::Get {
                oids: cfg.get_oids(),
            },
            Some(Method::Walk) => Query::Walk {
                root: cfg.walk_root(),
                line_budget: cfg.walk_line_budget,
            },
            None => return Err(ScanError::UnknownMethod(UNSET_METHOD.into())),
        };

        Ok(Self {
            query,
            credentials: cfg.credentials.clone(),
            version: cfg.version,
            probe: cfg.probe,
        })
    }
}

pub struct Scanner<P, C> {
    prober: Arc<P>,
    connector: Arc<C>,
    progress: Option<ProgressFn>,
}

impl<P, C> Scanner<P, C>
where
    P: LivenessProbe + 'static,
    C: SessionConnector + 'static,
{
    pub fn new(prober: P, connector: C) -> Self {
        Self {
            prober: Arc::new(prober),
            connector: Arc::new(connector),
            progress: None,
        }
    }

    /// Registers a callback fired with `(finished, total)` as targets
    /// complete.
    pub fn on_progress<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        let progress: ProgressFn = Arc::new(f);
        self.progress = Some(progress);
        self
    }

    /// Scans every address `target_spec` expands to.
    ///
    /// Fails before any network traffic if the method is missing or a target
    /// term is malformed. Per-target failures are reported on the info
    /// channel and counted in the summary, never returned.
    pub async fn scan(
        &self,
        target_spec: &str,
        cfg: &Config,
        channels: ScanChannels,
    ) -> Result<ScanSummary, ScanError> {
        let started = Instant::now();

        let request: ScanRequest = ScanRequest::from_config(cfg)?;
        let targets: Vec<Ipv4Addr> = target::expand(target_spec)?;
        let total: usize = targets.len();
        debug!("scanning {total} targets with {:?}", request.query);

        let output = Arc::new(Output::new(channels, cfg.verbose));

        let undefined = session::undefined_protocols(&session::build_security(
            &cfg.credentials,
            cfg.version,
        ));
        if !undefined.is_empty() {
            let msg = format!(
                "undefined {}, sessions will fail to connect",
                undefined.join(" and ")
            );
            warn!("{msg}");
            output.note(msg);
        }

        let tally: Tally = Governor::new(cfg.max_in_flight, self.progress.clone())
            .run(
                targets,
                Arc::new(request),
                self.prober.clone(),
                self.connector.clone(),
                output,
            )
            .await;

        Ok(ScanSummary::new(total, tally, started.elapsed()))
    }
}

/// Scans with ICMP liveness and real SNMP sessions, reporting
/// `(finished, total)` to `progress` as targets complete.
pub async fn scan(
    target_spec: &str,
    cfg: &Config,
    channels: ScanChannels,
    progress: Option<ProgressFn>,
) -> Result<ScanSummary, ScanError> {
    let scanner = Scanner {
        prober: Arc::new(IcmpProber::new()),
        connector: Arc::new(SnmpConnector::new(cfg.snmp)),
        progress,
    };
    scanner.scan(target_spec, cfg, channels).await
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
