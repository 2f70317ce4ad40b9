//! Plain-text renderings of a response. No colour: these lines are meant to
//! be piped into other tools.

use snmpscan_common::scanning::Response;

const GET_SEPARATOR: &str = ":::";

/// `ip,[value1:::value2],[oid1:::oid2]`
pub fn get_line(response: &Response) -> String {
    let (oids, values): (Vec<&str>, Vec<&str>) = response
        .values
        .iter()
        .map(|(oid, value)| (oid.as_str(), value.as_str()))
        .unzip();

    format!(
        "{},[{}],[{}]",
        response.ip,
        values.join(GET_SEPARATOR),
        oids.join(GET_SEPARATOR)
    )
}

/// One `oid: value` line per variable.
pub fn walk_lines(response: &Response) -> String {
    response
        .values
        .iter()
        .map(|(oid, value)| format!("{oid}: {value}"))
        .collect::<Vec<String>>()
        .join("\n")
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
