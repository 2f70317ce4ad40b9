use std::time::Duration;

use colored::*;
use tracing::info;
use unicode_width::UnicodeWidthStr;

use snmpscan_common::macros::PRINT_TARGET;
use snmpscan_core::ScanSummary;

pub const TOTAL_WIDTH: usize = 64;

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, "{msg}");
}

pub fn banner() {
    let text_content: String = format!("⟦ SNMPSCAN v{} ⟧ ", env!("CARGO_PKG_VERSION"));
    let text_width: usize = UnicodeWidthStr::width(text_content.as_str());
    let text: ColoredString = text_content.bright_green().bold();
    let sep: ColoredString = "═"
        .repeat(TOTAL_WIDTH.saturating_sub(text_width) / 2)
        .bright_black();

    eprintln!("{}{}{}", sep, text, sep);
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = UnicodeWidthStr::width(formatted.as_str());

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    eprintln!("{}", line);
}

pub fn fat_separator() {
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH).bright_black();
    eprintln!("{}", sep);
}

pub fn summary(summary: &ScanSummary) {
    let answered: ColoredString = format!("{} answered", summary.done).bold().green();
    let total_time: ColoredString = format_elapsed(summary.elapsed).bold().yellow();

    fat_separator();
    eprintln!(
        "{} of {} targets {} in {}",
        "Scan Complete:".bright_green(),
        summary.targets,
        answered,
        total_time
    );

    eprintln!(
        "{} unreachable, {} refused, {} failed mid-query, {} aborted",
        summary.unreachable, summary.connect_failed, summary.query_failed, summary.aborted
    );
}

fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}
