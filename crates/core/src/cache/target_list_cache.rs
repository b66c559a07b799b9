use crate::{
    address::{TargetAddress, normalize_path},
    error::Result,
    interfaces::{ProjectRoot, TargetLister},
};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Declared targets of one directory (and everything below it)
pub type TargetList = Arc<Vec<TargetAddress>>;

/// A listing that every caller for the same directory shares
pub type SharedTargets = Shared<BoxFuture<'static, Result<TargetList>>>;

/// Memoized `list targets under directory` queries
///
/// Each directory is queried at most once for the lifetime of the cache,
/// failures included. There is no eviction: build a new cache for every
/// operation that needs a fresh, consistent snapshot.
pub struct TargetListCache {
    root: Arc<dyn ProjectRoot>,
    lister: Arc<dyn TargetLister>,
    entries: DashMap<PathBuf, SharedTargets>,
}

impl TargetListCache {
    pub fn new(root: Arc<dyn ProjectRoot>, lister: Arc<dyn TargetLister>) -> Self {
        Self {
            root,
            lister,
            entries: DashMap::new(),
        }
    }

    /// Listing for `dir`, relative to the project root.
    ///
    /// The first request for a directory starts the query (on the tokio
    /// worker pool when called inside a runtime); later and concurrent
    /// requests get a clone of the same future.
    pub fn get_targets(&self, dir: &str) -> SharedTargets {
        let dir = normalize_path(dir);
        let key = self.root.resolve(&dir);

        match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                debug!("Target list cache hit for {:?}", entry.key());
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                debug!("Listing targets under {:?}", entry.key());
                let lister = Arc::clone(&self.lister);
                let query = async move { lister.list_targets(&dir).await.map(Arc::new) }
                    .boxed()
                    .shared();

                if let Ok(handle) = tokio::runtime::Handle::try_current() {
                    handle.spawn(query.clone());
                }

                entry.insert(query.clone());
                query
            }
        }
    }

    /// Number of distinct directories queried so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `path` (absolute, cleaned) has an entry
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn root(&self) -> &Arc<dyn ProjectRoot> {
        &self.root
    }
}
