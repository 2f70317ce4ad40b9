//! A scripted network for driving `Scanner` end to end without sockets.

use std::collections::{BTreeMap, HashMap};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use snmpscan_common::error::SessionError;
use snmpscan_common::scanning::{
    LivenessProbe, SecurityParams, Session, SessionConnector, VarBind,
};
use snmpscan_common::value::DecodedValue;

#[derive(Clone, Default)]
pub struct Agent {
    mib: BTreeMap<String, Option<DecodedValue>>,
    refuse: bool,
    fail_requests: bool,
}

impl Agent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn var(mut self, oid: &str, value: impl Into<DecodedValue>) -> Self {
        self.mib.insert(oid.to_string(), Some(value.into()));
        self
    }

    pub fn nil(mut self, oid: &str) -> Self {
        self.mib.insert(oid.to_string(), None);
        self
    }

    /// Answers pings but rejects every session.
    pub fn refusing(mut self) -> Self {
        self.refuse = true;
        self
    }

    /// Accepts sessions but times out every request.
    pub fn timing_out(mut self) -> Self {
        self.fail_requests = true;
        self
    }
}

#[derive(Default)]
struct Counters {
    probes_in_flight: AtomicUsize,
    peak_probes: AtomicUsize,
    probes: AtomicUsize,
    connects: AtomicUsize,
    live_sessions: AtomicUsize,
    next_session: AtomicUsize,
}

/// Hosts with an agent answer pings, everything else is silent.
#[derive(Clone, Default)]
pub struct Network {
    agents: Arc<HashMap<Ipv4Addr, Agent>>,
    probe_delay: Duration,
    counters: Arc<Counters>,
    security_seen: Arc<Mutex<Vec<SecurityParams>>>,
    /// (target, session id) for every request served.
    requests: Arc<Mutex<Vec<(Ipv4Addr, usize)>>>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agent(mut self, addr: [u8; 4], agent: Agent) -> Self {
        Arc::make_mut(&mut self.agents).insert(Ipv4Addr::from(addr), agent);
        self
    }

    pub fn probe_delay(mut self, delay: Duration) -> Self {
        self.probe_delay = delay;
        self
    }

    pub fn probes(&self) -> usize {
        self.counters.probes.load(Ordering::SeqCst)
    }

    pub fn peak_probes(&self) -> usize {
        self.counters.peak_probes.load(Ordering::SeqCst)
    }

    pub fn connects(&self) -> usize {
        self.counters.connects.load(Ordering::SeqCst)
    }

    pub fn live_sessions(&self) -> usize {
        self.counters.live_sessions.load(Ordering::SeqCst)
    }

    pub fn security_seen(&self) -> Vec<SecurityParams> {
        self.security_seen.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<(Ipv4Addr, usize)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LivenessProbe for Network {
    async fn probe(&self, addr: Ipv4Addr, _timeout: Duration, _attempts: u32) -> bool {
        let counters = &self.counters;
        counters.probes.fetch_add(1, Ordering::SeqCst);
        let now = counters.probes_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        counters.peak_probes.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.probe_delay).await;

        counters.probes_in_flight.fetch_sub(1, Ordering::SeqCst);
        self.agents.contains_key(&addr)
    }
}

#[async_trait]
impl SessionConnector for Network {
    type Session = AgentSession;

    async fn connect(
        &self,
        target: Ipv4Addr,
        security: &SecurityParams,
    ) -> Result<AgentSession, SessionError> {
        self.counters.connects.fetch_add(1, Ordering::SeqCst);
        self.security_seen.lock().unwrap().push(security.clone());

        let agent = match self.agents.get(&target) {
            Some(agent) if !agent.refuse => agent.clone(),
            _ => {
                return Err(SessionError::Connect {
                    target,
                    reason: "no response from agent".into(),
                });
            }
        };

        self.counters.live_sessions.fetch_add(1, Ordering::SeqCst);
        Ok(AgentSession {
            id: self.counters.next_session.fetch_add(1, Ordering::SeqCst),
            target,
            agent,
            counters: self.counters.clone(),
            requests: self.requests.clone(),
        })
    }
}

pub struct AgentSession {
    id: usize,
    target: Ipv4Addr,
    agent: Agent,
    counters: Arc<Counters>,
    requests: Arc<Mutex<Vec<(Ipv4Addr, usize)>>>,
}

impl AgentSession {
    fn served(&self) -> Result<(), SessionError> {
        self.requests.lock().unwrap().push((self.target, self.id));
        if self.agent.fail_requests {
            return Err(SessionError::Query {
                target: self.target,
                reason: "request timed out".into(),
            });
        }
        Ok(())
    }
}

impl Drop for AgentSession {
    fn drop(&mut self) {
        self.counters.live_sessions.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Session for AgentSession {
    async fn get(&mut self, oids: &[String]) -> Result<Vec<VarBind>, SessionError> {
        self.served()?;
        Ok(oids
            .iter()
            .map(|oid| VarBind {
                oid: oid.clone(),
                value: self.agent.mib.get(oid).cloned().flatten(),
            })
            .collect())
    }

    async fn walk(
        &mut self,
        root: &str,
        on_varbind: &mut (dyn FnMut(VarBind) + Send),
    ) -> Result<(), SessionError> {
        self.served().map_err(|_| SessionError::Walk {
            target: self.target,
            reason: "request timed out".into(),
        })?;

        let prefix: String = format!("{root}.");
        for (oid, value) in self.agent.mib.iter() {
            if oid.starts_with(&prefix) {
                on_varbind(VarBind {
                    oid: oid.clone(),
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}
