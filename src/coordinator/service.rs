//! Cache Coordinator
//!
//! Owns the workbook cache and the page cache and is the only code that
//! mutates them. Ties cached artifacts to document identity and
//! modification time, collapses concurrent loads of the same workbook,
//! invalidates per document on change, and rejects page inserts computed
//! against a superseded document generation.
//!
//! Lock order, where locks nest: `in_flight` before `workbooks`, and
//! `pages` before `sessions`. Nothing takes them the other way round.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Weak};

use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, RecencyCache};
use crate::config::Config;
use crate::coordinator::keys::{belongs_to, page_key, workbook_key};
use crate::coordinator::session::{DocumentPhase, DocumentSession};
use crate::error::{Result, ViewerError};
use crate::models::{SheetPage, Workbook};
use crate::range::{parse_range, RangeInfo};
use crate::source::{ChangeSubscription, FileAccess, FormatHint, WorkbookParser};
use crate::window::{compute_window, extract_page, PageRequest};

/// Files above this size get an extra log line before parsing
const LARGE_FILE_BYTES: usize = 5 * 1024 * 1024;

type LoadOutcome = Result<Arc<Workbook>>;
type LoadReceiver = watch::Receiver<Option<LoadOutcome>>;

// == Limits ==
#[derive(Debug, Clone, Copy)]
pub struct CacheLimits {
    pub workbooks: usize,
    pub pages: usize,
}

impl Default for CacheLimits {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for CacheLimits {
    fn from(config: &Config) -> Self {
        Self {
            workbooks: config.workbook_cache_capacity,
            pages: config.page_cache_capacity,
        }
    }
}

// == Page Response ==
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "page", rename_all = "snake_case")]
pub enum PageContent {
    Rows(Arc<SheetPage>),
    /// The sheet has no (or a malformed) range descriptor
    NoData,
}

/// A served page. `sheet_name` and `page` echo the request so a caller can
/// discard results for navigation it has since moved away from.
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse {
    pub sheet_name: String,
    pub page: u32,
    pub range: Option<RangeInfo>,
    pub page_count: u32,
    pub content: PageContent,
}

impl PageResponse {
    fn no_data(request: &PageRequest) -> Self {
        Self {
            sheet_name: request.sheet_name.clone(),
            page: request.page,
            range: None,
            page_count: 0,
            content: PageContent::NoData,
        }
    }

    fn rows(request: &PageRequest, range: RangeInfo, page: Arc<SheetPage>) -> Self {
        Self {
            sheet_name: request.sheet_name.clone(),
            page: request.page,
            page_count: range.page_count(request.rows_per_page),
            range: Some(range),
            content: PageContent::Rows(page),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CoordinatorStats {
    pub workbooks: CacheStats,
    pub pages: CacheStats,
    pub open_documents: usize,
}

struct LoadedWorkbook {
    key: String,
    workbook: Arc<Workbook>,
}

struct Inner {
    files: Arc<dyn FileAccess>,
    parser: Arc<dyn WorkbookParser>,
    workbooks: Mutex<RecencyCache<String, Arc<Workbook>>>,
    pages: Mutex<RecencyCache<String, Arc<SheetPage>>>,
    sessions: Mutex<HashMap<String, DocumentSession>>,
    in_flight: Mutex<HashMap<String, LoadReceiver>>,
}

// == Cache Coordinator ==
/// Cheap to clone; clones share the same caches and sessions.
#[derive(Clone)]
pub struct CacheCoordinator {
    inner: Arc<Inner>,
}

impl CacheCoordinator {
    pub fn new(
        files: Arc<dyn FileAccess>,
        parser: Arc<dyn WorkbookParser>,
        limits: CacheLimits,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                files,
                parser,
                workbooks: Mutex::new(RecencyCache::new(limits.workbooks)),
                pages: Mutex::new(RecencyCache::new(limits.pages)),
                sessions: Mutex::new(HashMap::new()),
                in_flight: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn from_config(
        config: &Config,
        files: Arc<dyn FileAccess>,
        parser: Arc<dyn WorkbookParser>,
    ) -> Self {
        Self::new(files, parser, CacheLimits::from(config))
    }

    // == Open Document ==
    /// Opens (or reopens) a document and returns its parsed workbook.
    ///
    /// Starts a change watcher for the document if it has none. Reopening a
    /// document whose last load failed retries the load.
    ///
    /// A document that cannot be reached is not opened: no session or
    /// watcher outlives an I/O failure of a first open.
    pub async fn open_document(&self, identity: &str) -> Result<Arc<Workbook>> {
        if let Err(err) = self.with_files(identity, |files, id| files.stat(id)).await {
            warn!("Cannot open {}: {}", identity, err);
            return Err(err);
        }

        let (generation, created, needs_watcher) = {
            let mut sessions = self.inner.sessions.lock().await;
            let created = !sessions.contains_key(identity);
            let session = sessions.entry(identity.to_string()).or_default();
            session.phase = DocumentPhase::Loading;
            session.last_error = None;
            (session.generation, created, !session.has_watcher())
        };
        info!("Opening document {}", identity);

        if needs_watcher {
            self.attach_watcher(identity).await;
        }

        let result = self.load_workbook(identity).await;
        match &result {
            Err(ViewerError::Io(_)) if created => {
                self.discard_session(identity, generation).await;
            }
            _ => self.finish_load(identity, generation, &result).await,
        }
        result.map(|loaded| loaded.workbook)
    }

    // == Get Page ==
    /// Serves one page of one sheet of an open document.
    ///
    /// The page comes from the page cache when possible. Otherwise it is
    /// computed from the cached workbook (parsing the document first if
    /// needed) and inserted, unless the document was invalidated while the
    /// page was being computed.
    pub async fn get_page(&self, identity: &str, request: &PageRequest) -> Result<PageResponse> {
        let generation = self.servable_generation(identity).await?;
        let loaded = self.load_workbook(identity).await?;

        let sheet = loaded
            .workbook
            .sheet(&request.sheet_name)
            .ok_or_else(|| ViewerError::SheetNotFound(request.sheet_name.clone()))?;
        let Some(range) = sheet.range.as_deref().and_then(parse_range) else {
            debug!("Sheet {} of {} has no data", request.sheet_name, identity);
            return Ok(PageResponse::no_data(request));
        };

        let key = page_key(&loaded.key, request);
        if let Some(page) = self.inner.pages.lock().await.get(&key).cloned() {
            debug!("Page cache hit: {}", key);
            return Ok(PageResponse::rows(request, range, page));
        }
        debug!("Page cache miss: {}", key);

        let page = {
            let workbook = Arc::clone(&loaded.workbook);
            let owned_request = request.clone();
            let range = range.clone();
            tokio::task::spawn_blocking(move || {
                workbook.sheet(&owned_request.sheet_name).map(|sheet| {
                    let window = compute_window(&range, &owned_request);
                    Arc::new(extract_page(sheet, &window))
                })
            })
            .await?
            .ok_or_else(|| ViewerError::SheetNotFound(request.sheet_name.clone()))?
        };

        let page = {
            let mut pages = self.inner.pages.lock().await;
            if let Some(existing) = pages.get(&key) {
                Arc::clone(existing)
            } else if self.is_current(identity, generation).await {
                if let Some(evicted) = pages.set(key, Arc::clone(&page)) {
                    debug!("Evicted page {}", evicted);
                }
                page
            } else {
                warn!("Document {} changed while computing {}; not caching", identity, key);
                page
            }
        };

        Ok(PageResponse::rows(request, range, page))
    }

    // == Handle Change ==
    /// Reacts to a change notification: invalidates everything cached for
    /// the document, then reloads it.
    ///
    /// Returns `Ok(None)` when the document is not open.
    pub async fn handle_change(&self, identity: &str) -> Result<Option<Arc<Workbook>>> {
        let generation = {
            let mut sessions = self.inner.sessions.lock().await;
            let Some(session) = sessions.get_mut(identity) else {
                debug!("Ignoring change of {}: not open", identity);
                return Ok(None);
            };
            session.phase = DocumentPhase::Invalidating;
            session.last_error = None;
            session.bump_generation()
        };

        let removed = self.invalidate(identity).await;
        info!(
            "Document {} changed: invalidated {} cache entries, reloading",
            identity, removed
        );

        self.set_phase(identity, generation, DocumentPhase::Loading).await;
        let result = self.load_workbook(identity).await;
        self.finish_load(identity, generation, &result).await;
        result.map(|loaded| Some(loaded.workbook))
    }

    // == Invalidate ==
    /// Deletes every workbook and page entry derived from `identity`.
    ///
    /// Returns the number of entries removed.
    pub async fn invalidate(&self, identity: &str) -> usize {
        let workbooks = self
            .inner
            .workbooks
            .lock()
            .await
            .delete_by_predicate(|key| belongs_to(key, identity));
        let pages = self
            .inner
            .pages
            .lock()
            .await
            .delete_by_predicate(|key| belongs_to(key, identity));
        workbooks + pages
    }

    // == Close Document ==
    /// Drops the document's session and stops its watcher.
    ///
    /// Cached entries are left to age out. Returns false if it was not open.
    pub async fn close_document(&self, identity: &str) -> bool {
        let session = self.inner.sessions.lock().await.remove(identity);
        match session {
            Some(_) => {
                info!("Closed document {}", identity);
                true
            }
            None => false,
        }
    }

    /// Closes every open document.
    pub async fn shutdown(&self) {
        let closed = std::mem::take(&mut *self.inner.sessions.lock().await);
        info!("Closed {} open documents", closed.len());
    }

    pub async fn phase(&self, identity: &str) -> Option<DocumentPhase> {
        self.inner
            .sessions
            .lock()
            .await
            .get(identity)
            .map(|session| session.phase.clone())
    }

    pub async fn stats(&self) -> CoordinatorStats {
        CoordinatorStats {
            workbooks: self.inner.workbooks.lock().await.stats(),
            pages: self.inner.pages.lock().await.stats(),
            open_documents: self.inner.sessions.lock().await.len(),
        }
    }

    pub async fn cached_workbook_keys(&self) -> Vec<String> {
        self.inner.workbooks.lock().await.keys()
    }

    pub async fn cached_page_keys(&self) -> Vec<String> {
        self.inner.pages.lock().await.keys()
    }

    // == Loading ==
    /// Returns the workbook for the document's current modification time,
    /// from cache or by joining / starting a load.
    async fn load_workbook(&self, identity: &str) -> Result<LoadedWorkbook> {
        let modified = self.with_files(identity, |files, id| files.stat(id)).await?;
        let key = workbook_key(identity, modified);
        let generation = self.inner.sessions.lock().await.get(identity).map(|s| s.generation);

        let mut rx = {
            let mut in_flight = self.inner.in_flight.lock().await;
            if let Some(rx) = in_flight.get(&key) {
                debug!("Joining in-flight load of {}", key);
                rx.clone()
            } else {
                // A finished load inserts into the cache before leaving `in_flight`
                if let Some(workbook) = self.inner.workbooks.lock().await.get(&key).cloned() {
                    debug!("Workbook cache hit: {}", key);
                    return Ok(LoadedWorkbook { key, workbook });
                }
                let (tx, rx) = watch::channel(None);
                in_flight.insert(key.clone(), rx.clone());
                self.spawn_load(identity.to_string(), key.clone(), generation, tx);
                rx
            }
        };

        let outcome = rx
            .wait_for(Option::is_some)
            .await
            .map_err(|_| ViewerError::Internal(format!("load of {identity} was abandoned")))?
            .clone();

        match outcome {
            Some(Ok(workbook)) => Ok(LoadedWorkbook { key, workbook }),
            Some(Err(err)) => Err(err),
            None => Err(ViewerError::Internal(format!("load of {identity} produced nothing"))),
        }
    }

    /// Runs the load on its own task so it finishes (and wakes every
    /// waiter) even if the caller that started it goes away.
    fn spawn_load(
        &self,
        identity: String,
        key: String,
        generation: Option<u64>,
        tx: watch::Sender<Option<LoadOutcome>>,
    ) {
        let this = self.clone();
        tokio::spawn(async move {
            let outcome = this.read_and_parse(&identity, &key, generation).await;
            this.inner.in_flight.lock().await.remove(&key);
            let _ = tx.send(Some(outcome));
        });
    }

    async fn read_and_parse(
        &self,
        identity: &str,
        key: &str,
        generation: Option<u64>,
    ) -> LoadOutcome {
        let bytes = self.with_files(identity, |files, id| files.read_all(id)).await?;
        let hint = FormatHint::from_identity(identity);
        if bytes.len() > LARGE_FILE_BYTES {
            info!("Parsing large {} file {} ({} bytes)", hint.as_str(), identity, bytes.len());
        } else {
            debug!("Parsing {} file {} ({} bytes)", hint.as_str(), identity, bytes.len());
        }

        let parser = Arc::clone(&self.inner.parser);
        let parsed = tokio::task::spawn_blocking(move || parser.parse(&bytes, &hint)).await?;
        let workbook = match parsed {
            Ok(workbook) => workbook,
            Err(err) => {
                warn!("Failed to parse {}: {}", identity, err);
                return Err(err.into());
            }
        };
        if workbook.is_empty() {
            return Err(ViewerError::NoSheets(identity.to_string()));
        }

        let workbook = Arc::new(workbook);
        match generation {
            Some(generation) if self.is_current(identity, generation).await => {
                let evicted = self
                    .inner
                    .workbooks
                    .lock()
                    .await
                    .set(key.to_string(), Arc::clone(&workbook));
                if let Some(evicted) = evicted {
                    debug!("Evicted workbook {}", evicted);
                }
                info!(
                    "Loaded {} ({} sheets)",
                    identity,
                    workbook.sheet_names.len()
                );
            }
            _ => warn!("Document {} changed or closed during load; not caching", identity),
        }
        Ok(workbook)
    }

    async fn with_files<T, F>(&self, identity: &str, op: F) -> Result<T>
    where
        F: FnOnce(&dyn FileAccess, &str) -> io::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let files = Arc::clone(&self.inner.files);
        let identity = identity.to_string();
        let result = tokio::task::spawn_blocking(move || op(files.as_ref(), &identity)).await?;
        Ok(result?)
    }

    // == Sessions ==
    /// Generation of an open document, or the error that a page request for
    /// it should report.
    async fn servable_generation(&self, identity: &str) -> Result<u64> {
        let sessions = self.inner.sessions.lock().await;
        let session = sessions
            .get(identity)
            .ok_or_else(|| ViewerError::DocumentNotOpen(identity.to_string()))?;
        match &session.last_error {
            Some(err) => Err(err.clone()),
            None => Ok(session.generation),
        }
    }

    async fn is_current(&self, identity: &str, generation: u64) -> bool {
        self.inner
            .sessions
            .lock()
            .await
            .get(identity)
            .is_some_and(|session| session.generation == generation)
    }

    async fn set_phase(&self, identity: &str, generation: u64, phase: DocumentPhase) {
        let mut sessions = self.inner.sessions.lock().await;
        if let Some(session) = sessions.get_mut(identity) {
            if session.generation == generation {
                session.phase = phase;
            }
        }
    }

    async fn finish_load(
        &self,
        identity: &str,
        generation: u64,
        result: &Result<LoadedWorkbook>,
    ) {
        let mut sessions = self.inner.sessions.lock().await;
        let Some(session) = sessions.get_mut(identity) else {
            return;
        };
        if session.generation != generation {
            return;
        }
        match result {
            Ok(_) => {
                session.phase = DocumentPhase::Ready;
                session.last_error = None;
            }
            Err(err) => {
                session.phase = DocumentPhase::Failed(err.to_string());
                session.last_error = Some(err.clone());
            }
        }
    }

    /// Drops a session this call created, unless a change has since taken
    /// it over.
    async fn discard_session(&self, identity: &str, generation: u64) {
        let mut sessions = self.inner.sessions.lock().await;
        if sessions
            .get(identity)
            .is_some_and(|session| session.generation == generation)
        {
            sessions.remove(identity);
            debug!("Discarded session of unreachable document {}", identity);
        }
    }

    async fn attach_watcher(&self, identity: &str) {
        let subscription = match self.inner.files.watch(identity) {
            Ok(subscription) => subscription,
            Err(err) => {
                warn!("No change notifications for {}: {}", identity, err);
                return;
            }
        };

        let handle = spawn_change_watcher(
            Arc::downgrade(&self.inner),
            identity.to_string(),
            subscription,
        );
        let mut sessions = self.inner.sessions.lock().await;
        match sessions.get_mut(identity) {
            Some(session) => session.attach_watcher(handle),
            None => handle.abort(),
        }
    }
}

/// Forwards change events for one document to the coordinator. Holds only a
/// weak reference so an open document never keeps the coordinator alive.
fn spawn_change_watcher(
    inner: Weak<Inner>,
    identity: String,
    mut subscription: ChangeSubscription,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = subscription.recv().await {
            let Some(inner) = inner.upgrade() else {
                break;
            };
            debug!("Change event for {}: {:?}", identity, event);
            let coordinator = CacheCoordinator { inner };
            if let Err(err) = coordinator.handle_change(&identity).await {
                warn!("Reload of {} after change failed: {}", identity, err);
            }
        }
    })
}
