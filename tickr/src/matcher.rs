//! Category matcher: combines per-keyword scores for one instrument under one
//! category.
//!
//! Every keyword must score above zero for the instrument to qualify (AND
//! semantics). A qualifying instrument's category score is the sum of its
//! keyword scores, so more and stronger keyword hits always rank higher.

use crate::candidate::SearchCandidate;
use crate::interface::MatchCategory;
use crate::models::Searchable;
use crate::ranking::{self, is_typo_of, FUZZY_SCORE, SUBSTRING_SCORE};

/// Score a keyword against the description word bag.
///
/// Description hits are capped below an exact symbol or name hit: a keyword
/// equal to a whole description word scores 2, containment in a word or a
/// one-edit typo of a word scores 1.
pub fn description_score(words: &[String], keyword: &str) -> u32 {
    let mut best = 0;
    for word in words {
        if word == keyword {
            return SUBSTRING_SCORE;
        }
        if best == 0 && (word.contains(keyword) || is_typo_of(word, keyword)) {
            best = FUZZY_SCORE;
        }
    }
    best
}

/// Score of a single keyword under `category`, 0 = no match.
///
/// Tag categories are evaluated against any candidate's tags; choosing the
/// stock or ETF pool is the ranking engine's job.
pub fn keyword_score<S: Searchable>(
    candidate: &SearchCandidate<S>,
    keyword: &str,
    category: MatchCategory,
) -> u32 {
    match category {
        MatchCategory::Symbol => ranking::score(candidate.symbol_lower(), keyword),
        MatchCategory::Name => ranking::score(candidate.name_lower(), keyword),
        MatchCategory::StockTag | MatchCategory::EtfTag => {
            ranking::best_score(candidate.tags_lower(), keyword)
        }
        MatchCategory::Description => description_score(candidate.description_words(), keyword),
    }
}

/// Combined score of `candidate` under `category`, or `None` if any keyword
/// fails to match. Keywords must already be lowercased.
pub fn match_in_category<S: Searchable>(
    candidate: &SearchCandidate<S>,
    keywords: &[String],
    category: MatchCategory,
) -> Option<u32> {
    if keywords.is_empty() {
        return None;
    }

    let mut total = 0;
    for keyword in keywords {
        match keyword_score(candidate, keyword, category) {
            0 => return None,
            s => total += s,
        }
    }
    Some(total)
}
