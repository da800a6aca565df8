//! Per-run memo of provider tables.
//!
//! One assembler call issues the same provider query several times (the
//! Lahman teams table backs game logs, standings and team batting). The memo
//! lives for a single call so nothing is ever served across runs.
//!
//! Bulk tables are pinned for the whole call. Only team- and season-scoped
//! tables go through the bounded LRU, so a long range of schedules never
//! pushes out a registry.

use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use super::types::MemoStats;
use crate::constants::TABLE_MEMO_CAPACITY;
use crate::data_fetcher::provider::{StatsProvider, TableRequest};
use crate::error::AppError;
use crate::table::Table;

struct MemoState {
    bulk: HashMap<TableRequest, Table>,
    tables: LruCache<TableRequest, Table>,
    hits: u64,
    misses: u64,
}

/// Wraps a provider and answers repeated requests from memory.
///
/// Failed requests are not memoized.
pub struct CachedProvider<P> {
    inner: P,
    state: Mutex<MemoState>,
}

impl<P: StatsProvider> CachedProvider<P> {
    pub fn new(inner: P) -> Self {
        Self::with_capacity(inner, TABLE_MEMO_CAPACITY)
    }

    pub fn with_capacity(inner: P, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            state: Mutex::new(MemoState {
                bulk: HashMap::new(),
                tables: LruCache::new(capacity),
                hits: 0,
                misses: 0,
            }),
        }
    }

    pub async fn stats(&self) -> MemoStats {
        let state = self.state.lock().await;
        MemoStats {
            hits: state.hits,
            misses: state.misses,
            entries: state.bulk.len() + state.tables.len(),
            capacity: state.tables.cap().get(),
        }
    }
}

impl<P: StatsProvider> StatsProvider for CachedProvider<P> {
    #[instrument(skip(self))]
    async fn fetch_table(&self, request: &TableRequest) -> Result<Table, AppError> {
        {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            let memoized = state
                .bulk
                .get(request)
                .or_else(|| state.tables.get(request))
                .cloned();
            if let Some(table) = memoized {
                state.hits += 1;
                debug!("Memo hit for {request}");
                return Ok(table);
            }
            state.misses += 1;
        }

        debug!("Memo miss for {request}");
        let table = self.inner.fetch_table(request).await?;

        let mut state = self.state.lock().await;
        if request.is_bulk() {
            state.bulk.insert(request.clone(), table.clone());
        } else {
            state.tables.put(request.clone(), table.clone());
        }
        Ok(table)
    }
}
