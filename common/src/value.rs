//! # Value Normalizer
//!
//! Protocol values reach the engine already decoded into a [`DecodedValue`]
//! by the transport adapter. [`normalize`] turns that into display text.
//! Both steps are pure: the same input always renders the same string.

use std::fmt;

/// Length of a byte string rendered as a MAC address.
pub const MAC_LEN: usize = 6;

/// A protocol value after the decode step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedValue {
    Text(String),
    Bytes(Vec<u8>),
    /// Any integral width, signed or unsigned.
    Integer(i128),
    /// A value the decoder had no shape for.
    Unknown { raw: String, type_name: String },
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for DecodedValue {
                fn from(v: $t) -> Self {
                    DecodedValue::Integer(i128::from(v))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32, u64);

impl From<&str> for DecodedValue {
    fn from(v: &str) -> Self {
        DecodedValue::Text(v.to_string())
    }
}

impl From<String> for DecodedValue {
    fn from(v: String) -> Self {
        DecodedValue::Text(v)
    }
}

impl From<Vec<u8>> for DecodedValue {
    fn from(v: Vec<u8>) -> Self {
        DecodedValue::Bytes(v)
    }
}

impl From<&[u8]> for DecodedValue {
    fn from(v: &[u8]) -> Self {
        DecodedValue::Bytes(v.to_vec())
    }
}

/// Display text for a value, tagged with how confident the decoding was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedValue {
    Decoded(String),
    /// Best-effort text for a value of unrecognized type.
    Unparsed { raw: String, type_name: String },
}

impl NormalizedValue {
    pub fn is_unparsed(&self) -> bool {
        matches!(self, NormalizedValue::Unparsed { .. })
    }

    pub fn into_string(self) -> String {
        match self {
            NormalizedValue::Decoded(text) => text,
            unparsed => unparsed.to_string(),
        }
    }
}

impl fmt::Display for NormalizedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizedValue::Decoded(text) => write!(f, "{text}"),
            NormalizedValue::Unparsed { raw, type_name } => write!(f, "*{raw} <{type_name}>"),
        }
    }
}

/// Renders a decoded value.
///
/// Any 6-byte string is formatted as a MAC address regardless of what it
/// actually holds. Other byte strings are read as (lossy) UTF-8.
pub fn normalize(value: &DecodedValue) -> NormalizedValue {
    match value {
        DecodedValue::Bytes(bytes) if bytes.len() == MAC_LEN => {
            NormalizedValue::Decoded(format_mac(bytes))
        }
        DecodedValue::Bytes(bytes) => {
            NormalizedValue::Decoded(String::from_utf8_lossy(bytes).into_owned())
        }
        DecodedValue::Text(text) => NormalizedValue::Decoded(text.clone()),
        DecodedValue::Integer(n) => NormalizedValue::Decoded(n.to_string()),
        DecodedValue::Unknown { raw, type_name } => NormalizedValue::Unparsed {
            raw: raw.clone(),
            type_name: type_name.clone(),
        },
    }
}

fn format_mac(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<String>>()
        .join(":")
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
