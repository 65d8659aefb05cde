//! HTMX request extractors and response helpers
//!
//! Built on `axum-htmx`. The page script listens for the client events named
//! here and performs the browser-side half of an export.

pub use axum_htmx::{HxEvent, HxRefresh, HxRequest, HxResponseTrigger};
use serde::Serialize;

use crate::export::{Delivery, ExportDocument, SinkKind};

/// Event raised for a share delivery
pub const SHARE_EVENT: &str = "fitenenana:share";
/// Event raised for a clipboard delivery
pub const COPY_EVENT: &str = "fitenenana:copy";
/// Event raised for a download delivery
pub const DOWNLOAD_EVENT: &str = "fitenenana:download";

/// Client event name for a delivery kind
#[must_use]
pub const fn export_event(kind: SinkKind) -> &'static str {
    match kind {
        SinkKind::Share => SHARE_EVENT,
        SinkKind::Clipboard => COPY_EVENT,
        SinkKind::Download => DOWNLOAD_EVENT,
    }
}

/// Detail payload of an export event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportEventDetail {
    /// Strategy chosen by the server
    pub sink: SinkKind,
    /// Confirmation message
    pub message: String,
    /// Document title (share sheet title)
    pub title: String,
    /// Download file name
    pub filename: String,
    /// Download URL, for download deliveries
    pub location: Option<String>,
}

impl ExportEventDetail {
    /// Detail for a delivery of `document`
    #[must_use]
    pub fn new(delivery: &Delivery, document: &ExportDocument) -> Self {
        Self {
            sink: delivery.kind,
            message: delivery.message.clone(),
            title: document.title.clone(),
            filename: document.filename.clone(),
            location: delivery.location.clone(),
        }
    }

    /// `HX-Trigger-After-Settle` response carrying this detail
    ///
    /// Raised after settling so the swapped export payload is in the page
    /// when the event handler runs.
    ///
    /// # Errors
    ///
    /// Returns an error if the detail cannot be serialized
    pub fn into_trigger(self) -> Result<HxResponseTrigger, serde_json::Error> {
        let event = HxEvent::new_with_data(export_event(self.sink), self)?;
        Ok(HxResponseTrigger::after_settle([event]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(export_event(SinkKind::Share), "fitenenana:share");
        assert_eq!(export_event(SinkKind::Clipboard), "fitenenana:copy");
        assert_eq!(export_event(SinkKind::Download), "fitenenana:download");
    }

    #[test]
    fn test_detail_serializes_sink_in_lowercase() {
        let document = ExportDocument::assemble("Fiterahana Zaza", &[]);
        let detail = ExportEventDetail::new(&Delivery::new(SinkKind::Clipboard), &document);

        let json = serde_json::to_value(&detail).unwrap();

        assert_eq!(json["sink"], "clipboard");
        assert_eq!(json["filename"], "Fiterahana_Zaza.txt");
        assert_eq!(json["message"], "Nadika tao amin'ny clipboard!");
    }
}
