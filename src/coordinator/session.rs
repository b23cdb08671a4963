//! Per-document session records.

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::error::ViewerError;

/// Lifecycle phase of an open document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "cause", rename_all = "snake_case")]
pub enum DocumentPhase {
    Unloaded,
    Loading,
    Ready,
    Invalidating,
    /// Last load failed; holds the cause shown to the user
    Failed(String),
}

/// State the coordinator keeps for one open document.
///
/// `generation` is bumped on every invalidation. Work that captured an
/// older generation must not write into the caches. The watcher task is
/// aborted when the session is dropped.
#[derive(Debug)]
pub struct DocumentSession {
    pub phase: DocumentPhase,
    pub generation: u64,
    /// Error reported to page requests until the document is reopened
    pub last_error: Option<ViewerError>,
    watcher: Option<JoinHandle<()>>,
}

impl DocumentSession {
    pub fn new() -> Self {
        Self {
            phase: DocumentPhase::Unloaded,
            generation: 0,
            last_error: None,
            watcher: None,
        }
    }

    /// Installs the change watcher, aborting any previous one.
    pub fn attach_watcher(&mut self, handle: JoinHandle<()>) {
        if let Some(previous) = self.watcher.replace(handle) {
            previous.abort();
        }
    }

    pub fn has_watcher(&self) -> bool {
        self.watcher.is_some()
    }

    /// Bumps the generation and returns the new value.
    pub fn bump_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}

impl Default for DocumentSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DocumentSession {
    fn drop(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            watcher.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_bump_generation() {
        let mut session = DocumentSession::new();
        assert_eq!(session.generation, 0);
        assert_eq!(session.bump_generation(), 1);
        assert_eq!(session.bump_generation(), 2);
    }

    #[tokio::test]
    async fn test_drop_aborts_watcher() {
        let handle = tokio::spawn(std::future::pending::<()>());
        let abort = handle.abort_handle();

        let mut session = DocumentSession::new();
        session.attach_watcher(handle);
        assert!(session.has_watcher());
        drop(session);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(abort.is_finished(), "Watcher should be aborted on drop");
    }

    #[test]
    fn test_phase_serialization() {
        let json = serde_json::to_string(&DocumentPhase::Failed("bad".into())).unwrap();
        assert_eq!(json, r#"{"phase":"failed","cause":"bad"}"#);
        let json = serde_json::to_string(&DocumentPhase::Ready).unwrap();
        assert_eq!(json, r#"{"phase":"ready"}"#);
    }
}
