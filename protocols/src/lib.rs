//! Adapters for the capabilities the scan engine consumes: ICMP echo for
//! liveness and SNMP sessions for retrieval.

pub mod icmp;
pub mod snmp;

pub use icmp::IcmpProber;
pub use snmp::{SnmpConnector, SnmpSession};
