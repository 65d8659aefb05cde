//! Browser export sinks
//!
//! Share and clipboard only exist in the browser, so the server decides the
//! strategy from what the client reports and hands the document back for the
//! page to deliver. When the client-side attempt fails, the page asks again
//! with the failed strategy listed in `skip` and the chain moves on.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::Deserialize;

use super::{Delivery, ExportChain, ExportDocument, ExportError, ExportSink, SinkKind};

/// Download endpoint served alongside the export payload
pub const DOWNLOAD_PATH: &str = "/export/download";

/// Capabilities reported by the browser with an export request
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientCapabilities {
    /// `navigator.share` is available
    pub share: bool,
    /// `navigator.clipboard.writeText` is available
    pub clipboard: bool,
    /// Comma-separated strategies that already failed on the client
    pub skip: String,
}

impl ClientCapabilities {
    /// Strategies the client asked to skip; unknown names are ignored
    #[must_use]
    pub fn skipped(&self) -> HashSet<SinkKind> {
        self.skip
            .split(',')
            .filter(|name| !name.trim().is_empty())
            .filter_map(|name| name.parse().ok())
            .collect()
    }
}

/// A strategy carried out by the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientSink {
    kind: SinkKind,
    available: bool,
}

impl ClientSink {
    /// Create a client-side sink
    #[must_use]
    pub const fn new(kind: SinkKind, available: bool) -> Self {
        Self { kind, available }
    }
}

#[async_trait]
impl ExportSink for ClientSink {
    fn kind(&self) -> SinkKind {
        self.kind
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn deliver(&self, _document: &ExportDocument) -> Result<Delivery, ExportError> {
        let delivery = Delivery::new(self.kind);
        Ok(match self.kind {
            SinkKind::Download => delivery.at(DOWNLOAD_PATH),
            SinkKind::Share | SinkKind::Clipboard => delivery,
        })
    }
}

/// Share, then clipboard, then download, as far as the client allows
///
/// Download is always available.
#[must_use]
pub fn web_chain(capabilities: &ClientCapabilities) -> ExportChain {
    let skipped = capabilities.skipped();
    let sink = |kind: SinkKind, capable: bool| ClientSink::new(kind, capable && !skipped.contains(&kind));

    ExportChain::new()
        .with(sink(SinkKind::Share, capabilities.share))
        .with(sink(SinkKind::Clipboard, capabilities.clipboard))
        .with(sink(SinkKind::Download, true))
}
