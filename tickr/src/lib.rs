//! Tickr Core - in-memory fuzzy search over stocks and ETFs
//!
//! Queries are split into keywords and matched against five independent
//! instrument fields (symbol, name, stock tags, ETF tags, description). Every
//! keyword must match within a field for an instrument to qualify there;
//! results come back grouped by field, best group first.
//!
//! Types are exported via UniFFI proc-macros (#[derive(uniffi::Record/Enum)]).

pub mod candidate;
pub mod config;
mod engine;
pub mod history;
pub mod interface;
pub mod matcher;
pub mod models;
pub mod ranking;
pub mod search;

pub use config::SearchConfig;
pub use engine::SearchEngine;
pub use history::{MemoryStore, QueryHistory};
pub use interface::*;
pub use models::{AuxiliaryIndex, AuxiliaryInfo, Corpus, Searchable};

uniffi::setup_scaffolding!("tickr");
