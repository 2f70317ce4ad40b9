//! # Scan Target Model
//!
//! Parses the target expression given to a scan into discrete IPv4 addresses.
//!
//! Accepted terms, optionally joined with commas:
//! * A single address (e.g. `10.0.0.1`).
//! * A range in the last octet (e.g. `10.0.0.1-50`).
//!
//! Ranges in any other octet are not supported. Duplicates across terms are
//! kept and the order of the expression is preserved.

use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::ScanError;
use crate::network::range::Ipv4Range;

/// Represents a distinct target to be scanned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// Scan a single specific host.
    Host { target_addr: Ipv4Addr },
    /// Scan a range of IPv4 addresses.
    Range { ipv4_range: Ipv4Range },
    /// Holds a list of different targets
    Multi { targets: Vec<Target> },
}

impl FromStr for Target {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains(',') {
            return parse_commas(s);
        }
        parse_term(s)
    }
}

impl Target {
    /// Expands the target into addresses, in order, duplicates kept.
    pub fn addresses(&self) -> Vec<Ipv4Addr> {
        let mut addrs: Vec<Ipv4Addr> = Vec::new();
        self.collect_into(&mut addrs);
        addrs
    }

    fn collect_into(&self, addrs: &mut Vec<Ipv4Addr>) {
        match self {
            Target::Host { target_addr } => addrs.push(*target_addr),
            Target::Range { ipv4_range } => addrs.extend(ipv4_range.iter()),
            Target::Multi { targets } => {
                for target in targets {
                    target.collect_into(addrs);
                }
            }
        }
    }
}

/// Parses and expands a target expression in one step.
pub fn expand(s: &str) -> Result<Vec<Ipv4Addr>, ScanError> {
    Ok(Target::from_str(s)?.addresses())
}

/// Parses a comma-separated list of terms (e.g. "10.0.0.1,10.0.0.5-9").
fn parse_commas(s: &str) -> Result<Target, ScanError> {
    let targets = s
        .split(',')
        .map(parse_term)
        .collect::<Result<Vec<Target>, ScanError>>()?;

    Ok(Target::Multi { targets })
}

/// Parses one `a.b.c.d` or `a.b.c.start-end` term.
fn parse_term(term: &str) -> Result<Target, ScanError> {
    let term = term.trim();
    let groups: Vec<&str> = term.split('.').collect();
    if groups.len() != 4 {
        return Err(ScanError::malformed(
            term,
            format!("expected 4 octet groups, found {}", groups.len()),
        ));
    }

    let mut network = [0u8; 3];
    for (slot, group) in network.iter_mut().zip(&groups[..3]) {
        *slot = parse_octet(group, term)?;
    }

    let Some((start_str, end_str)) = groups[3].split_once('-') else {
        let [a, b, c] = network;
        let last = parse_octet(groups[3], term)?;
        return Ok(Target::Host {
            target_addr: Ipv4Addr::new(a, b, c, last),
        });
    };

    let start = parse_octet(start_str, term)?;
    let end = parse_octet(end_str, term)?;
    let ipv4_range = Ipv4Range::last_octet(network, start, end);

    Ok(Target::Range { ipv4_range })
}

fn parse_octet(group: &str, term: &str) -> Result<u8, ScanError> {
    group
        .trim()
        .parse::<u8>()
        .map_err(|e| ScanError::malformed(term, format!("invalid octet '{group}': {e}")))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
