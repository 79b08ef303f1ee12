//! Tickr FFI Interface Definition
//!
//! This file defines the public interface exposed to Swift via UniFFI.
//! It acts as the source of truth for shared types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Marker rendered for display fields that have no backing data.
pub const UNAVAILABLE: &str = "N/A";

// ═══════════════════════════════════════════════════════════════════════════════
// ENUMS
// ═══════════════════════════════════════════════════════════════════════════════

/// The instrument field a result group was matched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum)]
pub enum MatchCategory {
    Symbol,
    Name,
    StockTag,
    EtfTag,
    Description,
}

impl MatchCategory {
    /// All categories, in the order they are evaluated.
    pub const ALL: [MatchCategory; 5] = [
        MatchCategory::Symbol,
        MatchCategory::Name,
        MatchCategory::StockTag,
        MatchCategory::EtfTag,
        MatchCategory::Description,
    ];

    /// Tie-break priority between groups with equal highest score.
    /// Higher = shown first.
    pub fn priority(self) -> u8 {
        match self {
            MatchCategory::Symbol => 5,
            MatchCategory::StockTag => 4,
            MatchCategory::EtfTag => 3,
            MatchCategory::Name => 2,
            MatchCategory::Description => 1,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECORDS (Structs)
// ═══════════════════════════════════════════════════════════════════════════════

/// A stock or ETF as handed over by the corpus loader.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, uniffi::Record)]
pub struct Instrument {
    pub symbol: String,
    pub name: String,
    pub tags: Vec<String>,
    pub description1: String,
    pub description2: String,
}

/// Market data row for one symbol. Either value may be missing upstream.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, uniffi::Record)]
pub struct Fundamentals {
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
}

/// One instrument qualifying under a category, with its display fields.
///
/// `None` in a display field means "no data", never zero.
#[derive(Debug, Clone, PartialEq, Serialize, uniffi::Record)]
pub struct ScoredResult {
    pub instrument: Instrument,
    /// Formatted as `"<cap / 1e9>B"` with one decimal
    pub market_cap: Option<String>,
    /// Formatted with two decimals
    pub pe_ratio: Option<String>,
    pub compare_text: Option<String>,
    pub score: u32,
}

impl ScoredResult {
    pub fn market_cap_label(&self) -> &str {
        self.market_cap.as_deref().unwrap_or(UNAVAILABLE)
    }

    pub fn pe_ratio_label(&self) -> &str {
        self.pe_ratio.as_deref().unwrap_or(UNAVAILABLE)
    }
}

/// All results for one category, best first.
#[derive(Debug, Clone, PartialEq, Serialize, uniffi::Record)]
pub struct ResultGroup {
    pub category: MatchCategory,
    pub results: Vec<ScoredResult>,
    pub highest_score: u32,
}

/// Search result container
#[derive(Debug, Clone, PartialEq, Serialize, uniffi::Record)]
pub struct SearchResponse {
    pub groups: Vec<ResultGroup>,
    /// Set when the query could not be persisted to history.
    /// The groups are unaffected.
    pub history_warning: Option<String>,
    /// Stamp of the search that produced this response. Compare with
    /// `SearchEngine::is_latest` to drop responses that arrive late.
    pub generation: u64,
}

/// Error type for Tickr operations
#[derive(Debug, Error, uniffi::Error)]
pub enum TickrError {
    #[error("Store error: {0}")]
    Store(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error returned by a `KeyValueStore` implementation
#[derive(Debug, Error, uniffi::Error)]
pub enum StoreError {
    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<uniffi::UnexpectedUniFFICallbackError> for StoreError {
    fn from(e: uniffi::UnexpectedUniFFICallbackError) -> Self {
        StoreError::Backend(e.reason)
    }
}

impl From<StoreError> for TickrError {
    fn from(e: StoreError) -> Self {
        TickrError::Store(e.to_string())
    }
}

impl From<serde_json::Error> for TickrError {
    fn from(e: serde_json::Error) -> Self {
        TickrError::Store(e.to_string())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// FOREIGN INTERFACE
// ═══════════════════════════════════════════════════════════════════════════════

/// Durable string storage for the query history, implemented by the host
/// (e.g. backed by UserDefaults) or in Rust.
#[uniffi::export(with_foreign)]
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, `None` if never written.
    fn get(&self, key: String) -> Result<Option<String>, StoreError>;

    /// Overwrite the value under `key`.
    fn set(&self, key: String, value: String) -> Result<(), StoreError>;
}
