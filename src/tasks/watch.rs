//! File Change Poller
//!
//! Background task that periodically stats a file and reports changes of
//! its modification time.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::source::fs::modified_millis;
use crate::source::ChangeEvent;

/// Spawns a background task that polls `path` every `interval` and sends a
/// [`ChangeEvent`] whenever its modification time changes or it disappears.
///
/// The task stops on its own once the receiving side of `tx` is dropped, so
/// the owner of the subscription controls its lifetime.
///
/// # Example
/// ```ignore
/// let (tx, mut subscription) = ChangeSubscription::channel(8);
/// spawn_mtime_poller(PathBuf::from("book.csv"), Duration::from_millis(500), tx);
/// while let Some(event) = subscription.recv().await { /* reload */ }
/// ```
pub fn spawn_mtime_poller(
    path: PathBuf,
    interval: Duration,
    tx: mpsc::Sender<ChangeEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Watching {} for changes every {} ms",
            path.display(),
            interval.as_millis()
        );

        let mut last_seen = modified_millis(&path).ok();
        let mut ticker = tokio::time::interval(interval);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            if tx.is_closed() {
                debug!("Watcher for {} closed", path.display());
                break;
            }

            let current = modified_millis(&path).ok();
            if current == last_seen {
                continue;
            }

            let event = match current {
                Some(_) => ChangeEvent::Modified,
                None => ChangeEvent::Removed,
            };
            last_seen = current;

            debug!("{} changed: {:?}", path.display(), event);
            if tx.send(event).await.is_err() {
                break;
            }
        }
    })
}
