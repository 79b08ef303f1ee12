//! Search candidate with memoized derived state.
//!
//! Module isolation ensures no code outside this module can mutate the wrapped
//! instrument after construction, so the `OnceLock` caches can never go stale.

use std::sync::OnceLock;

use crate::models::Searchable;
use crate::search::tokenize;

/// A corpus entry with its lowercased text memoized.
/// Each field is lowercased on first access and reused by every later search.
#[derive(Debug)]
pub struct SearchCandidate<S> {
    item: S,
    symbol_lower: OnceLock<String>,
    name_lower: OnceLock<String>,
    tags_lower: OnceLock<Vec<String>>,
    description_words: OnceLock<Vec<String>>,
}

impl<S: Searchable> SearchCandidate<S> {
    pub fn new(item: S) -> Self {
        Self {
            item,
            symbol_lower: OnceLock::new(),
            name_lower: OnceLock::new(),
            tags_lower: OnceLock::new(),
            description_words: OnceLock::new(),
        }
    }

    pub fn item(&self) -> &S {
        &self.item
    }

    pub fn symbol_lower(&self) -> &str {
        self.symbol_lower.get_or_init(|| self.item.symbol().to_lowercase())
    }

    pub fn name_lower(&self) -> &str {
        self.name_lower.get_or_init(|| self.item.name().to_lowercase())
    }

    pub fn tags_lower(&self) -> &[String] {
        self.tags_lower
            .get_or_init(|| self.item.tags().iter().map(|t| t.to_lowercase()).collect())
    }

    /// Both descriptions as one bag of lowercase words.
    pub fn description_words(&self) -> &[String] {
        self.description_words.get_or_init(|| {
            let mut words = tokenize(self.item.description1());
            words.extend(tokenize(self.item.description2()));
            words
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::Instrument;

    #[test]
    fn test_lowercased_fields() {
        let c = SearchCandidate::new(Instrument::new(
            "AAPL",
            "Apple Inc",
            &["Technology", "Consumer"],
            "Maker of iPhone",
            "  Cupertino\tbased ",
        ));
        assert_eq!(c.symbol_lower(), "aapl");
        assert_eq!(c.name_lower(), "apple inc");
        assert_eq!(c.tags_lower(), ["technology", "consumer"]);
        assert_eq!(c.description_words(), ["maker", "of", "iphone", "cupertino", "based"]);
    }

    #[test]
    fn test_empty_descriptions_have_no_words() {
        let c = SearchCandidate::new(Instrument::new("X", "X Corp", &[], "", ""));
        assert!(c.description_words().is_empty());
    }
}
