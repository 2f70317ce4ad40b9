//! Per-target state machine.
//!
//! ```text
//! Pending -> Probing -> Unreachable
//!                    -> Connecting -> ConnectFailed
//!                                  -> Connected -> Querying -> Done
//!                                                           -> QueryFailed
//! ```
//!
//! A task always runs to one of the four terminal states. The session is
//! owned by the task alone and dropped on every path out of `Connected`.

use std::mem;
use std::net::Ipv4Addr;
use std::sync::Arc;

use tracing::{debug, trace};

use snmpscan_common::config::{Credentials, ProbeConfig, Version};
use snmpscan_common::scanning::{LivenessProbe, Response, Session, SessionConnector, VarBind};
use snmpscan_common::value::{NormalizedValue, normalize};

use crate::output::Output;
use crate::session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetState {
    Pending,
    Probing,
    Unreachable,
    Connecting,
    ConnectFailed,
    Connected,
    Querying,
    Done,
    QueryFailed,
}

impl TargetState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TargetState::Unreachable
                | TargetState::ConnectFailed
                | TargetState::Done
                | TargetState::QueryFailed
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Get { oids: Vec<String> },
    Walk { root: String, line_budget: usize },
}

/// Immutable snapshot of everything a target task needs.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub query: Query,
    pub credentials: Credentials,
    pub version: Version,
    pub probe: ProbeConfig,
}

pub(crate) struct TargetTask<P, C> {
    target: Ipv4Addr,
    state: TargetState,
    request: Arc<ScanRequest>,
    prober: Arc<P>,
    connector: Arc<C>,
    output: Arc<Output>,
}

impl<P, C> TargetTask<P, C>
where
    P: LivenessProbe,
    C: SessionConnector,
{
    pub(crate) fn new(
        target: Ipv4Addr,
        request: Arc<ScanRequest>,
        prober: Arc<P>,
        connector: Arc<C>,
        output: Arc<Output>,
    ) -> Self {
        Self {
            target,
            state: TargetState::Pending,
            request,
            prober,
            connector,
            output,
        }
    }

    pub(crate) async fn run(mut self) -> TargetState {
        let target: Ipv4Addr = self.target;
        let probe: ProbeConfig = self.request.probe;

        self.transition(TargetState::Probing);
        if !self
            .prober
            .probe(target, probe.timeout, probe.attempts)
            .await
        {
            self.output.verbose(|| format!("{target}: no echo reply, skipping"));
            return self.transition(TargetState::Unreachable);
        }

        self.transition(TargetState::Connecting);
        self.output
            .verbose(|| format!("{target}: SNMP Version: {}", self.request.version));

        let security = session::build_security(&self.request.credentials, self.request.version);
        let mut session: C::Session = match self.connector.connect(target, &security).await {
            Ok(session) => session,
            Err(e) => {
                self.output.note(e.to_string());
                return self.transition(TargetState::ConnectFailed);
            }
        };

        self.transition(TargetState::Connected);
        self.output.verbose(|| format!("connected to: {target}"));

        self.transition(TargetState::Querying);
        let outcome: TargetState = match &self.request.query {
            Query::Get { oids } => self.query_get(&mut session, oids).await,
            Query::Walk { root, line_budget } => {
                self.query_walk(&mut session, root, *line_budget).await
            }
        };
        drop(session);

        self.transition(outcome)
    }

    async fn query_get(&self, session: &mut C::Session, oids: &[String]) -> TargetState {
        let varbinds: Vec<VarBind> = match session.get(oids).await {
            Ok(varbinds) => varbinds,
            Err(e) => {
                // A device without the requested data is not a batch problem.
                self.output.verbose(|| e.to_string());
                return TargetState::QueryFailed;
            }
        };

        let mut response = Response::new(self.target);
        for varbind in varbinds {
            if let Some((oid, text)) = self.render(varbind) {
                response.values.insert(oid, text);
            }
        }

        self.output.emit(response);
        TargetState::Done
    }

    /// Emits a response every `line_budget` variables and flushes what is
    /// left once the walk ends, whether it ended cleanly or not.
    async fn query_walk(
        &self,
        session: &mut C::Session,
        root: &str,
        line_budget: usize,
    ) -> TargetState {
        let target: Ipv4Addr = self.target;
        let budget: usize = line_budget.max(1);
        self.output
            .verbose(|| format!("{target}: Walking devices from: {root}"));

        let mut batch = Response::new(target);
        let mut on_varbind = |varbind: VarBind| {
            if let Some((oid, text)) = self.render(varbind) {
                batch.values.insert(oid, text);
            }
            if batch.len() >= budget {
                self.output
                    .emit(mem::replace(&mut batch, Response::new(target)));
            }
        };

        let result = session.walk(root, &mut on_varbind).await;

        if !batch.is_empty() {
            self.output.emit(batch);
        }

        match result {
            Ok(()) => TargetState::Done,
            Err(e) => {
                self.output.note(e.to_string());
                TargetState::QueryFailed
            }
        }
    }

    /// Normalizes one variable. Nil values yield nothing.
    fn render(&self, varbind: VarBind) -> Option<(String, String)> {
        let value = varbind.value?;
        let normalized: NormalizedValue = normalize(&value);

        if normalized.is_unparsed() {
            self.output.verbose(|| {
                format!("{}: unparsed value for {}: {normalized}", self.target, varbind.oid)
            });
        }
        trace!("{} {} = {normalized}", self.target, varbind.oid);

        Some((varbind.oid, normalized.into_string()))
    }

    fn transition(&mut self, next: TargetState) -> TargetState {
        debug!("{}: {:?} -> {:?}", self.target, self.state, next);
        self.state = next;
        next
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
