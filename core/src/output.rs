//! The two streams a scan writes to: responses and free-text diagnostics.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use snmpscan_common::scanning::Response;

/// Sending halves handed to a scan. Both are dropped when the scan returns,
/// which ends the consumer's receive loops.
#[derive(Clone)]
pub struct ScanChannels {
    pub responses: UnboundedSender<Response>,
    pub info: UnboundedSender<String>,
}

pub struct ScanReceivers {
    pub responses: UnboundedReceiver<Response>,
    pub info: UnboundedReceiver<String>,
}

impl ScanChannels {
    pub fn new() -> (Self, ScanReceivers) {
        let (responses_tx, responses_rx) = mpsc::unbounded_channel();
        let (info_tx, info_rx) = mpsc::unbounded_channel();
        (
            Self {
                responses: responses_tx,
                info: info_tx,
            },
            ScanReceivers {
                responses: responses_rx,
                info: info_rx,
            },
        )
    }
}

/// Shared writer used by every executor task of a batch.
pub(crate) struct Output {
    channels: ScanChannels,
    verbose: bool,
}

impl Output {
    pub(crate) fn new(channels: ScanChannels, verbose: bool) -> Self {
        Self { channels, verbose }
    }

    pub(crate) fn emit(&self, response: Response) {
        if self.channels.responses.send(response).is_err() {
            debug!("response receiver dropped, discarding result");
        }
    }

    /// Sends a diagnostic line regardless of verbosity.
    pub(crate) fn note(&self, msg: impl Into<String>) {
        let msg: String = msg.into();
        debug!(target: "snmpscan::info", "{msg}");
        let _ = self.channels.info.send(msg);
    }

    /// Sends a diagnostic line only in verbose mode. The message is not
    /// built otherwise.
    pub(crate) fn verbose<F>(&self, msg: F)
    where
        F: FnOnce() -> String,
    {
        if self.verbose {
            self.note(msg());
        }
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
