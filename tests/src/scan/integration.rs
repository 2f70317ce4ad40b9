use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use snmpscan_common::config::{Config, Credentials, Method, Version};
use snmpscan_common::error::ScanError;
use snmpscan_common::scanning::{AuthProtocol, PrivProtocol, Response, SecurityParams};
use snmpscan_core::{ScanChannels, ScanReceivers, ScanSummary, Scanner};

use crate::network::{Agent, Network};

const SYS_DESCR: &str = "1.3.6.1.2.1.1.1.0";
const SYS_NAME: &str = "1.3.6.1.2.1.1.5.0";

fn config(method: Method) -> Config {
    Config {
        method: Some(method),
        ..Config::default()
    }
}

fn switch(name: &str) -> Agent {
    Agent::new()
        .var(SYS_DESCR, "Cisco IOS Software")
        .var(SYS_NAME, name)
}

async fn run(
    network: &Network,
    targets: &str,
    cfg: &Config,
) -> (Result<ScanSummary, ScanError>, Vec<Response>, Vec<String>) {
    let (channels, ScanReceivers { mut responses, mut info }) = ScanChannels::new();
    let scanner = Scanner::new(network.clone(), network.clone());

    let result = scanner.scan(targets, cfg, channels).await;

    // The scan has returned, so every sender is gone and draining terminates.
    let mut emitted = Vec::new();
    while let Some(response) = responses.recv().await {
        emitted.push(response);
    }
    let mut notes = Vec::new();
    while let Some(note) = info.recv().await {
        notes.push(note);
    }
    (result, emitted, notes)
}

#[tokio::test]
async fn get_over_range_returns_only_alive_hosts() {
    let network = Network::new()
        .agent([10, 0, 0, 1], switch("core1"))
        .agent([10, 0, 0, 2], switch("core2"));

    let (result, responses, _) = run(&network, "10.0.0.1-3", &config(Method::Get)).await;
    let summary = result.unwrap();

    assert_eq!(responses.len(), 2);
    let ips: HashSet<&str> = responses.iter().map(|r| r.ip.as_str()).collect();
    assert_eq!(ips, HashSet::from(["10.0.0.1", "10.0.0.2"]));
    for response in &responses {
        assert_eq!(response.values.len(), 1);
        assert!(response.values[SYS_NAME].starts_with("core"));
    }

    assert_eq!(summary.targets, 3);
    assert_eq!(summary.done, 2);
    assert_eq!(summary.unreachable, 1);
    assert_eq!(network.probes(), 3);
    assert_eq!(network.connects(), 2);
}

#[tokio::test]
async fn unreachable_host_gets_no_session() {
    let network = Network::new();

    let (result, responses, notes) = run(&network, "10.0.0.9", &config(Method::Get)).await;

    assert_eq!(result.unwrap().unreachable, 1);
    assert!(responses.is_empty());
    assert!(notes.is_empty());
    assert_eq!(network.connects(), 0);
}

#[tokio::test]
async fn nil_values_are_left_out() {
    let network = Network::new().agent(
        [10, 0, 0, 1],
        Agent::new().var(SYS_DESCR, "Linux").nil(SYS_NAME),
    );
    let cfg = Config {
        oids: vec![SYS_DESCR.into(), SYS_NAME.into()],
        ..config(Method::Get)
    };

    let (_, responses, _) = run(&network, "10.0.0.1", &cfg).await;

    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].values.len(), 1);
    assert_eq!(responses[0].values[SYS_DESCR], "Linux");
}

#[tokio::test]
async fn values_are_normalized() {
    let network = Network::new().agent(
        [10, 0, 0, 1],
        Agent::new()
            .var("1.3.6.1.2.1.2.2.1.6.1", vec![0x00u8, 0x1a, 0x2b, 0x3c, 0x4d, 0x5e])
            .var("1.3.6.1.2.1.1.3.0", 123_456u32),
    );
    let cfg = Config {
        oids: vec!["1.3.6.1.2.1.2.2.1.6.1".into(), "1.3.6.1.2.1.1.3.0".into()],
        ..config(Method::Get)
    };

    let (_, responses, _) = run(&network, "10.0.0.1", &cfg).await;

    assert_eq!(responses[0].values["1.3.6.1.2.1.2.2.1.6.1"], "00:1A:2B:3C:4D:5E");
    assert_eq!(responses[0].values["1.3.6.1.2.1.1.3.0"], "123456");
}

#[tokio::test]
async fn every_target_gets_its_own_session() {
    let network = Network::new()
        .agent([192, 168, 0, 1], switch("a"))
        .agent([192, 168, 0, 2], switch("b"))
        .agent([192, 168, 0, 3], switch("c").timing_out())
        .agent([192, 168, 0, 4], switch("d").refusing());

    let (result, responses, _) =
        run(&network, "192.168.0.1-4", &config(Method::Get)).await;
    let summary = result.unwrap();

    let requests = network.requests();
    let sessions: HashSet<usize> = requests.iter().map(|(_, id)| *id).collect();
    let targets: HashSet<Ipv4Addr> = requests.iter().map(|(ip, _)| *ip).collect();
    assert_eq!(requests.len(), 3);
    assert_eq!(sessions.len(), 3);
    assert_eq!(targets.len(), 3);

    assert_eq!(responses.len(), 2);
    assert_eq!(summary.done, 2);
    assert_eq!(summary.query_failed, 1);
    assert_eq!(summary.connect_failed, 1);
    assert_eq!(network.live_sessions(), 0);
}

#[tokio::test]
async fn in_flight_targets_never_exceed_the_limit() {
    let network = Network::new().probe_delay(Duration::from_millis(10));
    let cfg = Config {
        max_in_flight: 4,
        ..config(Method::Get)
    };

    let (result, _, _) = run(&network, "10.1.1.1-40", &cfg).await;

    assert_eq!(result.unwrap().unreachable, 40);
    assert_eq!(network.probes(), 40);
    assert!(network.peak_probes() <= 4, "peak was {}", network.peak_probes());
}

#[tokio::test]
async fn missing_method_is_fatal_before_probing() {
    let network = Network::new().agent([10, 0, 0, 1], switch("core1"));

    let (result, responses, _) = run(&network, "10.0.0.1", &Config::default()).await;

    assert!(matches!(result, Err(ScanError::UnknownMethod(_))));
    assert!(responses.is_empty());
    assert_eq!(network.probes(), 0);
}

#[tokio::test]
async fn malformed_target_is_fatal_before_probing() {
    let network = Network::new().agent([10, 0, 0, 1], switch("core1"));

    for spec in ["10.0.0.1,10.0.0", "10.0.0.1-300", "10.0.0.x"] {
        let (result, responses, _) = run(&network, spec, &config(Method::Get)).await;
        assert!(
            matches!(result, Err(ScanError::MalformedTarget { .. })),
            "{spec} should be rejected"
        );
        assert!(responses.is_empty());
    }
    assert_eq!(network.probes(), 0);
}

#[tokio::test]
async fn connect_failure_is_reported_on_info_channel() {
    let network = Network::new().agent([10, 0, 0, 5], switch("x").refusing());

    let (result, responses, notes) = run(&network, "10.0.0.5", &config(Method::Get)).await;

    assert_eq!(result.unwrap().connect_failed, 1);
    assert!(responses.is_empty());
    assert_eq!(notes.len(), 1);
    assert!(notes[0].contains("10.0.0.5"));
}

#[tokio::test]
async fn walk_streams_subtree_in_budgeted_batches() {
    let mut agent = Agent::new().var("1.3.6.1.2.1.1.5.0", "outside");
    for i in 1..=7 {
        agent = agent.var(&format!("1.3.6.1.2.1.2.2.1.2.{i}"), format!("Gi0/{i}"));
    }
    let network = Network::new().agent([10, 0, 0, 1], agent);
    let cfg = Config {
        oids: vec!["1.3.6.1.2.1.2".into()],
        walk_line_budget: 3,
        ..config(Method::Walk)
    };

    let (result, responses, _) = run(&network, "10.0.0.1", &cfg).await;

    assert_eq!(result.unwrap().done, 1);
    let sizes: Vec<usize> = responses.iter().map(Response::len).collect();
    assert_eq!(sizes, vec![3, 3, 1]);
    let all: HashSet<&String> = responses.iter().flat_map(|r| r.values.keys()).collect();
    assert_eq!(all.len(), 7);
    assert!(!all.iter().any(|oid| oid.as_str() == "1.3.6.1.2.1.1.5.0"));
}

#[tokio::test]
async fn walk_failure_is_always_reported() {
    let network = Network::new().agent([10, 0, 0, 1], switch("a").timing_out());

    let (result, responses, notes) = run(&network, "10.0.0.1", &config(Method::Walk)).await;

    assert_eq!(result.unwrap().query_failed, 1);
    assert!(responses.is_empty());
    assert!(notes.iter().any(|n| n.contains("walking")));
    assert_eq!(network.live_sessions(), 0);
}

#[tokio::test]
async fn community_and_version_reach_the_connector() {
    let network = Network::new().agent([10, 0, 0, 1], switch("a"));
    let cfg = Config {
        version: Version::V1,
        credentials: Credentials::community("private"),
        ..config(Method::Get)
    };

    run(&network, "10.0.0.1", &cfg).await;

    assert_eq!(
        network.security_seen(),
        vec![SecurityParams::Community {
            version: Version::V1,
            community: "private".into()
        }]
    );
}

#[tokio::test]
async fn v3_credentials_resolve_protocols() {
    let network = Network::new().agent([10, 0, 0, 1], switch("a"));
    let cfg = Config {
        version: Version::V3,
        credentials: Credentials {
            username: "v3User".into(),
            auth_passphrase: "AuthPass".into(),
            auth_protocol: "SHA512".into(),
            priv_passphrase: "PrivPass".into(),
            priv_protocol: "AES256".into(),
        },
        ..config(Method::Get)
    };

    let (result, _, notes) = run(&network, "10.0.0.1", &cfg).await;
    assert_eq!(result.unwrap().done, 1);
    assert!(notes.is_empty());

    let seen = network.security_seen();
    let SecurityParams::Usm(usm) = &seen[0] else {
        panic!("expected USM parameters, got {seen:?}");
    };
    assert_eq!(usm.username, "v3User");
    assert_eq!(usm.auth, Some((AuthProtocol::Sha512, "AuthPass".to_string())));
    assert_eq!(usm.privacy, Some((PrivProtocol::Aes256, "PrivPass".to_string())));
    assert_eq!(usm.security_level(), "authPriv");
}

#[tokio::test]
async fn verbose_reports_progress_of_each_target() {
    let network = Network::new().agent([10, 0, 0, 1], switch("a"));
    let cfg = Config {
        verbose: true,
        ..config(Method::Get)
    };

    let (_, _, notes) = run(&network, "10.0.0.1-2", &cfg).await;

    assert!(notes.iter().any(|n| n == "connected to: 10.0.0.1"));
    assert!(notes.iter().any(|n| n.contains("10.0.0.2")));
}

#[tokio::test]
async fn progress_callback_sees_every_target() {
    let network = Network::new().agent([10, 0, 0, 1], switch("a"));
    let seen: Arc<Mutex<Vec<usize>>> = Arc::default();
    let sink = seen.clone();

    let scanner = Scanner::new(network.clone(), network.clone())
        .on_progress(move |finished, total| {
            assert_eq!(total, 5);
            sink.lock().unwrap().push(finished);
        });
    let (channels, _rx) = ScanChannels::new();
    scanner
        .scan("10.0.0.1-5", &config(Method::Get), channels)
        .await
        .unwrap();

    let mut seen = seen.lock().unwrap().clone();
    seen.sort();
    assert_eq!(seen, vec![1, 2, 3, 4, 5]);
}
