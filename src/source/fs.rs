//! Filesystem-backed document access.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, UNIX_EPOCH};

use crate::source::{ChangeSubscription, FileAccess, ModTime};
use crate::tasks::spawn_mtime_poller;

/// Reads documents from the local filesystem and watches them by polling
/// their modification time.
#[derive(Debug, Clone)]
pub struct FsFileAccess {
    poll_interval: Duration,
}

impl FsFileAccess {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    /// Maps an identity to a path; `file://` URIs are accepted.
    pub fn path(identity: &str) -> PathBuf {
        PathBuf::from(identity.strip_prefix("file://").unwrap_or(identity))
    }
}

/// Modification time of `path` in milliseconds since the epoch.
pub(crate) fn modified_millis(path: &std::path::Path) -> io::Result<ModTime> {
    let modified = fs::metadata(path)?.modified()?;
    let since_epoch = modified
        .duration_since(UNIX_EPOCH)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    Ok(since_epoch.as_millis() as ModTime)
}

impl FileAccess for FsFileAccess {
    fn read_all(&self, identity: &str) -> io::Result<Vec<u8>> {
        fs::read(Self::path(identity))
    }

    fn stat(&self, identity: &str) -> io::Result<ModTime> {
        modified_millis(&Self::path(identity))
    }

    fn watch(&self, identity: &str) -> io::Result<ChangeSubscription> {
        tokio::runtime::Handle::try_current().map_err(io::Error::other)?;
        let (tx, subscription) = ChangeSubscription::channel(8);
        spawn_mtime_poller(Self::path(identity), self.poll_interval, tx);
        Ok(subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "sheet_pager_fs_{}_{}",
            std::process::id(),
            name
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_path_strips_file_uri() {
        assert_eq!(
            FsFileAccess::path("file:///tmp/book.csv"),
            PathBuf::from("/tmp/book.csv")
        );
        assert_eq!(FsFileAccess::path("relative.csv"), PathBuf::from("relative.csv"));
    }

    #[test]
    fn test_read_and_stat() {
        let path = temp_file("read.csv", "a,b\n1,2\n");
        let identity = path.to_string_lossy().to_string();
        let files = FsFileAccess::new(Duration::from_millis(50));

        assert_eq!(files.read_all(&identity).unwrap(), b"a,b\n1,2\n");
        assert!(files.stat(&identity).unwrap() > 0);

        fs::remove_file(&path).unwrap();
        assert!(files.stat(&identity).is_err());
    }

    #[test]
    fn test_watch_outside_runtime_fails() {
        let files = FsFileAccess::new(Duration::from_millis(50));
        assert!(files.watch("/nonexistent.csv").is_err());
    }
}
