//! SearchEngine - Main API for Swift interop
//!
//! Owns the read-only corpus and auxiliary tables plus the query history,
//! designed for UniFFI export.
//!
//! Concurrency Model:
//! - Corpus and auxiliary tables are immutable and shared via `Arc`, so any
//!   number of searches can scan them in parallel without locking
//! - The async `search` runs the scan on a `spawn_blocking` thread, using the
//!   current runtime or a global fallback when called from UniFFI
//! - Searches are never interrupted or discarded. Each call is stamped with
//!   a generation number returned on its `SearchResponse`; the caller drops
//!   responses for which `is_latest` is false
//! - History writes are serialized inside `QueryHistory`

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use once_cell::sync::Lazy;

use crate::config::SearchConfig;
use crate::history::QueryHistory;
use crate::interface::{
    Fundamentals, Instrument, KeyValueStore, ResultGroup, SearchResponse, TickrError,
};
use crate::models::{AuxiliaryIndex, Corpus};
use crate::search::{rank, tokenize};

/// Global fallback Tokio runtime for when async functions are called outside any runtime context.
/// This is shared across all SearchEngine instances and never dropped.
/// Used by UniFFI which doesn't provide a tokio runtime.
static FALLBACK_RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create fallback tokio runtime")
});

#[derive(uniffi::Object)]
pub struct SearchEngine {
    corpus: Arc<Corpus>,
    aux: Arc<AuxiliaryIndex>,
    history: QueryHistory,
    generation: AtomicU64,
}

// Internal implementation (not exported via FFI)
impl SearchEngine {
    /// Build an engine from an already wrapped corpus.
    pub fn with_corpus(
        corpus: Corpus,
        aux: AuxiliaryIndex,
        store: Arc<dyn KeyValueStore>,
        config: SearchConfig,
    ) -> Self {
        let history = QueryHistory::load(store, &config);
        tracing::debug!(
            instruments = corpus.len(),
            history = history.len(),
            "search engine ready"
        );
        Self {
            corpus: Arc::new(corpus),
            aux: Arc::new(aux),
            history,
            generation: AtomicU64::new(0),
        }
    }

    /// Get a tokio runtime handle - uses current runtime if available, otherwise global fallback
    fn runtime_handle(&self) -> tokio::runtime::Handle {
        tokio::runtime::Handle::try_current()
            .unwrap_or_else(|_| FALLBACK_RUNTIME.handle().clone())
    }

    /// Stamp a new search. Every earlier stamp stops being the latest.
    fn begin_search(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn rank_timed(keywords: &[String], corpus: &Corpus, aux: &AuxiliaryIndex) -> Vec<ResultGroup> {
        let started = Instant::now();
        let groups = rank(keywords, &corpus.stocks, &corpus.etfs, aux);
        tracing::debug!(
            keywords = keywords.len(),
            groups = groups.len(),
            results = groups.iter().map(|g| g.results.len()).sum::<usize>(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "search ranked"
        );
        groups
    }

    /// Record the query and package the groups. A history write failure
    /// becomes a warning on the response.
    fn finish(&self, query: &str, generation: u64, groups: Vec<ResultGroup>) -> SearchResponse {
        let history_warning = match self.history.record(query) {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to persist query history");
                Some(e.to_string())
            }
        };
        SearchResponse {
            groups,
            history_warning,
            generation,
        }
    }

    fn empty_response(generation: u64) -> SearchResponse {
        SearchResponse {
            groups: Vec::new(),
            history_warning: None,
            generation,
        }
    }
}

// FFI-exported constructor (must be in standalone impl block)
#[uniffi::export]
impl SearchEngine {
    /// Create an engine over the loader's collections. Lookup table keys are
    /// symbols in any case.
    #[uniffi::constructor]
    pub fn new(
        stocks: Vec<Instrument>,
        etfs: Vec<Instrument>,
        fundamentals: HashMap<String, Fundamentals>,
        compare_texts: HashMap<String, String>,
        store: Arc<dyn KeyValueStore>,
        config: SearchConfig,
    ) -> Self {
        Self::with_corpus(
            Corpus::new(stocks, etfs),
            AuxiliaryIndex::new(fundamentals, compare_texts),
            store,
            config,
        )
    }
}

#[uniffi::export]
impl SearchEngine {
    /// Search on the calling thread. A blank query returns no groups and
    /// leaves history untouched.
    pub fn search_sync(&self, query: String) -> SearchResponse {
        let generation = self.begin_search();
        let keywords = tokenize(&query);
        if keywords.is_empty() {
            return Self::empty_response(generation);
        }
        let groups = Self::rank_timed(&keywords, &self.corpus, &self.aux);
        self.finish(&query, generation, groups)
    }

    /// Search on a blocking worker thread.
    ///
    /// Overlapping calls all complete and are all recorded in history. Use
    /// `is_latest` on the response's generation to decide which one to show.
    pub async fn search(&self, query: String) -> Result<SearchResponse, TickrError> {
        let generation = self.begin_search();

        let keywords = tokenize(&query);
        if keywords.is_empty() {
            return Ok(Self::empty_response(generation));
        }

        let corpus = Arc::clone(&self.corpus);
        let aux = Arc::clone(&self.aux);
        let handle = self
            .runtime_handle()
            .spawn_blocking(move || Self::rank_timed(&keywords, &corpus, &aux));

        let groups = handle
            .await
            .map_err(|e| TickrError::Internal(e.to_string()))?;

        Ok(self.finish(&query, generation, groups))
    }

    /// True when no search started after the one stamped `generation`.
    pub fn is_latest(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Recent queries, most recent first
    pub fn history(&self) -> Vec<String> {
        self.history.all()
    }

    /// Record a query without searching (e.g. a history item tapped again)
    pub fn record_query(&self, query: String) -> Result<(), TickrError> {
        self.history.record(&query)
    }

    pub fn remove_history_entry(&self, query: String) -> Result<(), TickrError> {
        self.history.remove(&query)
    }

    pub fn clear_history(&self) -> Result<(), TickrError> {
        self.history.clear()
    }

    pub fn instrument_count(&self) -> u64 {
        self.corpus.len() as u64
    }
}
