use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::{Instrument, Span, debug};

use snmpscan_common::config::{Config, Method};
use snmpscan_common::network::target;
use snmpscan_common::scanning::Response;
use snmpscan_common::success;
use snmpscan_core::scanner::ProgressFn;
use snmpscan_core::{ScanChannels, ScanReceivers, ScanSummary};

use crate::terminal::{format, print, spinner};

pub async fn scan(targets: &str, cfg: &Config) -> anyhow::Result<ScanSummary> {
    let method: Method = cfg.method.unwrap_or(Method::Get);
    let (channels, ScanReceivers { responses, info }) = ScanChannels::new();

    let printer: JoinHandle<usize> = tokio::spawn(print_responses(responses, method));
    let notes: JoinHandle<()> = tokio::spawn(print_notes(info));

    // Only sizes the bar. A bad target list is reported by the scan itself.
    let total: usize = target::expand(targets).map(|a| a.len()).unwrap_or(0);
    let span: Span = spinner::progress_span(total);

    let progress: ProgressFn = Arc::new(spinner::reporter(span.clone()));

    let result = snmpscan_core::scan(targets, cfg, channels, Some(progress))
        .instrument(span.clone())
        .await;
    drop(span);

    // The scan dropped its senders, so both consumers end once drained.
    let printed: usize = printer.await.context("response printer panicked")?;
    notes.await.context("diagnostic printer panicked")?;
    let summary: ScanSummary = result?;
    if cfg.verbose && printed > 0 {
        success!("{printed} responses from {} targets", summary.targets);
    } else {
        debug!("{printed} responses printed");
    }

    Ok(summary)
}

async fn print_responses(mut responses: UnboundedReceiver<Response>, method: Method) -> usize {
    let mut count: usize = 0;
    while let Some(response) = responses.recv().await {
        let text: String = match method {
            Method::Get => format::get_line(&response),
            Method::Walk => format::walk_lines(&response),
        };
        print::print(&text);
        count += 1;
    }
    count
}

async fn print_notes(mut info: UnboundedReceiver<String>) {
    while let Some(line) = info.recv().await {
        snmpscan_common::info!("{line}");
    }
}
