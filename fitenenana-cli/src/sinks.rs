//! Desktop export sinks
//!
//! The same share → clipboard → download chain as the web application, with
//! desktop back ends: an external share command fed the document on stdin,
//! the system clipboard, and a file written into the output directory.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use fitenenana::config::ExportSettings;
use fitenenana::export::{Delivery, ExportChain, ExportDocument, ExportError, ExportSink, SinkKind};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Share through an external program reading the document on stdin
#[derive(Debug, Clone, Default)]
pub struct CommandShareSink {
    command: Vec<String>,
}

impl CommandShareSink {
    /// Program followed by its arguments; an empty command is unavailable
    #[must_use]
    pub const fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}

#[async_trait]
impl ExportSink for CommandShareSink {
    fn kind(&self) -> SinkKind {
        SinkKind::Share
    }

    fn is_available(&self) -> bool {
        !self.command.is_empty()
    }

    async fn deliver(&self, document: &ExportDocument) -> Result<Delivery, ExportError> {
        let Some((program, args)) = self.command.split_first() else {
            return Err(failed(SinkKind::Share, "no share command configured"));
        };

        let mut child = Command::new(program)
            .args(args)
            .env("FITENENANA_TITLE", &document.title)
            .env("FITENENANA_FILENAME", &document.filename)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(document.text.as_bytes()).await?;
        }

        let status = child.wait().await?;
        if !status.success() {
            return Err(failed(SinkKind::Share, &format!("{program} exited with {status}")));
        }
        Ok(Delivery::new(SinkKind::Share).at(program.clone()))
    }
}

/// Copy to the system clipboard
#[derive(Debug, Clone, Copy)]
pub struct ClipboardSink {
    enabled: bool,
}

impl ClipboardSink {
    /// Clipboard sink; a disabled one is skipped
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

#[async_trait]
impl ExportSink for ClipboardSink {
    fn kind(&self) -> SinkKind {
        SinkKind::Clipboard
    }

    fn is_available(&self) -> bool {
        self.enabled && arboard::Clipboard::new().is_ok()
    }

    async fn deliver(&self, document: &ExportDocument) -> Result<Delivery, ExportError> {
        arboard::Clipboard::new()
            .and_then(|mut clipboard| clipboard.set_text(document.text.clone()))
            .map_err(|err| failed(SinkKind::Clipboard, &err.to_string()))?;
        Ok(Delivery::new(SinkKind::Clipboard))
    }
}

/// Write `<filename>` into a directory
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    /// Sink writing into `dir`, created on demand
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ExportSink for FileSink {
    fn kind(&self) -> SinkKind {
        SinkKind::Download
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn deliver(&self, document: &ExportDocument) -> Result<Delivery, ExportError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(&document.filename);
        tokio::fs::write(&path, document.text.as_bytes()).await?;
        Ok(Delivery::new(SinkKind::Download).at(path.display().to_string()))
    }
}

fn failed(kind: SinkKind, reason: &str) -> ExportError {
    ExportError::Failed {
        kind,
        reason: reason.to_string(),
    }
}

/// Share, clipboard, then file, from the export settings
#[must_use]
pub fn desktop_chain(settings: &ExportSettings, clipboard: bool) -> ExportChain {
    ExportChain::new()
        .with(CommandShareSink::new(settings.share_command.clone()))
        .with(ClipboardSink::new(clipboard))
        .with(FileSink::new(settings.output_dir.clone()))
}
