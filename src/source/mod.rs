//! Document Source Module
//!
//! Contracts for the collaborators the engine consumes (file access with
//! change notifications, workbook parsing) and the built-in implementations
//! used by the server binary: polling file access, a CSV/TSV parser, and a
//! calamine reader for xlsx, xls and ods.

mod delimited;
pub(crate) mod fs;
mod spreadsheet;

use std::io;
use std::path::Path;

use tokio::sync::mpsc;

use crate::error::ParseError;
use crate::models::Workbook;

pub use delimited::DelimitedParser;
pub use fs::FsFileAccess;
pub use spreadsheet::SpreadsheetParser;

/// Modification time token, milliseconds since the Unix epoch.
///
/// Precision is whatever the filesystem reports; on coarse filesystems two
/// writes inside one tick share a token and therefore a cache key.
pub type ModTime = u64;

// == Format Hint ==
/// File format guessed from the document identity's extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatHint {
    Csv,
    Tsv,
    Xlsx,
    Xls,
    Ods,
    Other(String),
}

impl FormatHint {
    pub fn from_identity(identity: &str) -> Self {
        let extension = Path::new(identity)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match extension.as_str() {
            "csv" => FormatHint::Csv,
            "tsv" | "tab" => FormatHint::Tsv,
            "xlsx" | "xlsm" => FormatHint::Xlsx,
            "xls" => FormatHint::Xls,
            "ods" => FormatHint::Ods,
            _ => FormatHint::Other(extension),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FormatHint::Csv => "csv",
            FormatHint::Tsv => "tsv",
            FormatHint::Xlsx => "xlsx",
            FormatHint::Xls => "xls",
            FormatHint::Ods => "ods",
            FormatHint::Other(ext) => ext,
        }
    }
}

// == Change Notifications ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    Modified,
    Removed,
}

/// Stream of change events for one document.
///
/// Dropping the subscription closes the channel, which stops whatever
/// producer feeds it.
#[derive(Debug)]
pub struct ChangeSubscription {
    rx: mpsc::Receiver<ChangeEvent>,
}

impl ChangeSubscription {
    /// Creates a connected sender/subscription pair.
    pub fn channel(buffer: usize) -> (mpsc::Sender<ChangeEvent>, Self) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (tx, Self { rx })
    }

    /// Next event, or None once the producer is gone.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        self.rx.recv().await
    }
}

// == Collaborator Traits ==
/// Read access to documents plus change notifications, keyed by identity.
///
/// Methods are blocking; the coordinator calls them from
/// `tokio::task::spawn_blocking`.
pub trait FileAccess: Send + Sync + 'static {
    fn read_all(&self, identity: &str) -> io::Result<Vec<u8>>;

    fn stat(&self, identity: &str) -> io::Result<ModTime>;

    /// Subscribes to changes of `identity`. Must be called inside a tokio runtime.
    fn watch(&self, identity: &str) -> io::Result<ChangeSubscription> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("change notifications are not available for {identity}"),
        ))
    }
}

/// Turns raw document bytes into a [`Workbook`].
pub trait WorkbookParser: Send + Sync + 'static {
    fn parse(&self, bytes: &[u8], hint: &FormatHint) -> Result<Workbook, ParseError>;
}

// == Built-in Parser ==
/// Routes each document to the parser for its format: delimited text to
/// [`DelimitedParser`], workbook formats to [`SpreadsheetParser`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatParser;

impl WorkbookParser for FormatParser {
    fn parse(&self, bytes: &[u8], hint: &FormatHint) -> Result<Workbook, ParseError> {
        match hint {
            FormatHint::Csv | FormatHint::Tsv => DelimitedParser.parse(bytes, hint),
            FormatHint::Xlsx | FormatHint::Xls | FormatHint::Ods => {
                SpreadsheetParser.parse(bytes, hint)
            }
            FormatHint::Other(ext) => Err(ParseError::new(format!(
                "unsupported format '{ext}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hint_from_identity() {
        assert_eq!(FormatHint::from_identity("/data/report.CSV"), FormatHint::Csv);
        assert_eq!(FormatHint::from_identity("a/b.tsv"), FormatHint::Tsv);
        assert_eq!(FormatHint::from_identity("book.xlsx"), FormatHint::Xlsx);
        assert_eq!(FormatHint::from_identity("book.xlsm"), FormatHint::Xlsx);
        assert_eq!(FormatHint::from_identity("legacy.xls"), FormatHint::Xls);
        assert_eq!(
            FormatHint::from_identity("notes"),
            FormatHint::Other(String::new())
        );
        assert_eq!(FormatHint::from_identity("x.numbers").as_str(), "numbers");
    }

    #[test]
    fn test_format_parser_dispatch() {
        let csv = FormatParser.parse(b"a,b\n1,2", &FormatHint::Csv).unwrap();
        assert_eq!(csv.sheet_names, vec!["Sheet1"]);

        let xlsx = include_bytes!("../../tests/fixtures/two_sheets.xlsx");
        let book = FormatParser.parse(xlsx, &FormatHint::Xlsx).unwrap();
        assert_eq!(book.sheet_names, vec!["Summary", "Data"]);

        let err = FormatParser
            .parse(b"", &FormatHint::Other("numbers".into()))
            .unwrap_err();
        assert_eq!(err.cause, "unsupported format 'numbers'");
    }

    #[tokio::test]
    async fn test_subscription_ends_when_sender_dropped() {
        let (tx, mut subscription) = ChangeSubscription::channel(4);
        tx.send(ChangeEvent::Modified).await.unwrap();
        drop(tx);

        assert_eq!(subscription.recv().await, Some(ChangeEvent::Modified));
        assert_eq!(subscription.recv().await, None);
    }
}
