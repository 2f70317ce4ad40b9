use indicatif::ProgressStyle;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

/// Span whose attached bar shows how many targets have finished. The bar
/// is drawn while the span is entered and cleared when it closes.
pub fn progress_span(total: usize) -> Span {
    let span = info_span!("scan", indicatif.pb_show = true);

    let style = ProgressStyle::with_template("{spinner:.blue} {msg} {pos}/{len} targets finished")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICK_STRINGS);

    span.pb_set_style(&style);
    span.pb_set_length(total as u64);
    span.pb_set_message("polling");
    span
}

/// Progress callback handed to the scanner. Safe to call from any task.
pub fn reporter(span: Span) -> impl Fn(usize, usize) + Send + Sync + 'static {
    move |finished: usize, _total: usize| {
        span.pb_set_position(finished as u64);
    }
}
