//! Core data models for Tickr
//!
//! The corpus and auxiliary tables are built once from what the loader hands
//! over and are read-only afterwards.

use std::collections::HashMap;

use crate::candidate::SearchCandidate;
use crate::interface::{Fundamentals, Instrument};

// ─────────────────────────────────────────────────────────────────────────────
// SEARCHABLE CAPABILITY
// ─────────────────────────────────────────────────────────────────────────────

/// Anything the category matcher can score: stocks, ETFs, or host records.
pub trait Searchable {
    fn symbol(&self) -> &str;
    fn name(&self) -> &str;
    fn tags(&self) -> &[String];
    fn description1(&self) -> &str;
    fn description2(&self) -> &str;

    /// Owned snapshot for result records.
    fn to_instrument(&self) -> Instrument {
        Instrument {
            symbol: self.symbol().to_string(),
            name: self.name().to_string(),
            tags: self.tags().to_vec(),
            description1: self.description1().to_string(),
            description2: self.description2().to_string(),
        }
    }
}

impl Searchable for Instrument {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn description1(&self) -> &str {
        &self.description1
    }

    fn description2(&self) -> &str {
        &self.description2
    }

    fn to_instrument(&self) -> Instrument {
        self.clone()
    }
}

impl<T: Searchable + ?Sized> Searchable for &T {
    fn symbol(&self) -> &str {
        (**self).symbol()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn tags(&self) -> &[String] {
        (**self).tags()
    }

    fn description1(&self) -> &str {
        (**self).description1()
    }

    fn description2(&self) -> &str {
        (**self).description2()
    }

    fn to_instrument(&self) -> Instrument {
        (**self).to_instrument()
    }
}

impl Instrument {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        tags: &[&str],
        description1: impl Into<String>,
        description2: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            description1: description1.into(),
            description2: description2.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CORPUS
// ─────────────────────────────────────────────────────────────────────────────

/// Stocks and ETFs wrapped as search candidates. Collection order is
/// preserved and used as the tie-break for equal scores.
#[derive(Debug, Default)]
pub struct Corpus<S: Searchable = Instrument> {
    pub stocks: Vec<SearchCandidate<S>>,
    pub etfs: Vec<SearchCandidate<S>>,
}

impl<S: Searchable> Corpus<S> {
    pub fn new(stocks: Vec<S>, etfs: Vec<S>) -> Self {
        Self {
            stocks: stocks.into_iter().map(SearchCandidate::new).collect(),
            etfs: etfs.into_iter().map(SearchCandidate::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.stocks.len() + self.etfs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// AUXILIARY DATA
// ─────────────────────────────────────────────────────────────────────────────

/// Everything known about a symbol besides the instrument itself.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AuxiliaryInfo<'a> {
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub compare_text: Option<&'a str>,
}

/// Market data and compare strings keyed by uppercased symbol.
#[derive(Debug, Clone, Default)]
pub struct AuxiliaryIndex {
    fundamentals: HashMap<String, Fundamentals>,
    compare_texts: HashMap<String, String>,
}

impl AuxiliaryIndex {
    pub fn new(
        fundamentals: HashMap<String, Fundamentals>,
        compare_texts: HashMap<String, String>,
    ) -> Self {
        Self {
            fundamentals: fundamentals
                .into_iter()
                .map(|(symbol, f)| (symbol.to_uppercase(), f))
                .collect(),
            compare_texts: compare_texts
                .into_iter()
                .map(|(symbol, text)| (symbol.to_uppercase(), text))
                .collect(),
        }
    }

    pub fn insert_fundamentals(&mut self, symbol: &str, fundamentals: Fundamentals) {
        self.fundamentals.insert(symbol.to_uppercase(), fundamentals);
    }

    pub fn insert_compare_text(&mut self, symbol: &str, text: impl Into<String>) {
        self.compare_texts.insert(symbol.to_uppercase(), text.into());
    }

    /// Look up a symbol in both tables. Missing rows yield empty fields.
    pub fn lookup(&self, symbol: &str) -> AuxiliaryInfo<'_> {
        let key = symbol.to_uppercase();
        let fundamentals = self.fundamentals.get(&key).copied().unwrap_or_default();
        AuxiliaryInfo {
            market_cap: fundamentals.market_cap,
            pe_ratio: fundamentals.pe_ratio,
            compare_text: self.compare_texts.get(&key).map(String::as_str),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive_on_symbol() {
        let mut aux = AuxiliaryIndex::default();
        aux.insert_fundamentals(
            "aapl",
            Fundamentals {
                market_cap: Some(2.5e12),
                pe_ratio: Some(28.1),
            },
        );
        aux.insert_compare_text("Aapl", "vs MSFT");

        let info = aux.lookup("AAPL");
        assert_eq!(info.market_cap, Some(2.5e12));
        assert_eq!(info.pe_ratio, Some(28.1));
        assert_eq!(info.compare_text, Some("vs MSFT"));
    }

    #[test]
    fn test_lookup_missing_symbol_is_empty() {
        let aux = AuxiliaryIndex::default();
        assert_eq!(aux.lookup("ZZZZ"), AuxiliaryInfo::default());
    }

    #[test]
    fn test_new_normalizes_keys() {
        let fundamentals = HashMap::from([(
            "spy".to_string(),
            Fundamentals {
                market_cap: None,
                pe_ratio: Some(21.0),
            },
        )]);
        let compare = HashMap::from([("spy".to_string(), "vs VOO".to_string())]);
        let aux = AuxiliaryIndex::new(fundamentals, compare);
        let info = aux.lookup("SPY");
        assert_eq!(info.market_cap, None);
        assert_eq!(info.pe_ratio, Some(21.0));
        assert_eq!(info.compare_text, Some("vs VOO"));
    }

    #[test]
    fn test_corpus_keeps_collection_order() {
        let corpus = Corpus::new(
            vec![
                Instrument::new("B", "Bravo", &[], "", ""),
                Instrument::new("A", "Alpha", &[], "", ""),
            ],
            vec![Instrument::new("E", "Echo", &[], "", "")],
        );
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.stocks[0].item().symbol(), "B");
        assert_eq!(corpus.stocks[1].item().symbol(), "A");
        assert!(!corpus.is_empty());
        assert!(Corpus::<Instrument>::new(Vec::new(), Vec::new()).is_empty());
    }
}
