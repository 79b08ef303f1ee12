//! Search Engine (tokenize -> per-category matching -> grouped ranking)
//!
//! Every category is scanned independently against its instrument pool.
//! Qualifying instruments are ordered by score inside their group, and groups
//! are ordered by their best score with category priority breaking ties.
//! The scan is parallel, but indexed rayon iterators keep collection order, so
//! output is identical run to run.

use std::cmp::Reverse;

use rayon::prelude::*;

use crate::candidate::SearchCandidate;
use crate::interface::{MatchCategory, ResultGroup, ScoredResult};
use crate::matcher::match_in_category;
use crate::models::{AuxiliaryIndex, Corpus, Searchable};

/// Split a query on whitespace runs into lowercase keywords.
/// A blank query yields no keywords, meaning no search is performed.
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect()
}

/// Market cap in billions with one decimal, e.g. `"2.5B"`.
pub fn format_market_cap(market_cap: f64) -> String {
    format!("{:.1}B", market_cap / 1e9)
}

/// Price/earnings ratio with two decimals.
pub fn format_pe_ratio(pe_ratio: f64) -> String {
    format!("{:.2}", pe_ratio)
}

/// Rank `stocks` and `etfs` against already-tokenized `keywords`.
///
/// Symbol, Name and Description scan stocks followed by ETFs; StockTag only
/// stocks; EtfTag only ETFs. Categories without a qualifying instrument are
/// omitted.
pub fn rank<S: Searchable + Sync>(
    keywords: &[String],
    stocks: &[SearchCandidate<S>],
    etfs: &[SearchCandidate<S>],
    aux: &AuxiliaryIndex,
) -> Vec<ResultGroup> {
    if keywords.is_empty() {
        return Vec::new();
    }

    let mut groups: Vec<ResultGroup> = MatchCategory::ALL
        .par_iter()
        .filter_map(|&category| {
            let pool: Vec<&SearchCandidate<S>> = match category {
                MatchCategory::StockTag => stocks.iter().collect(),
                MatchCategory::EtfTag => etfs.iter().collect(),
                MatchCategory::Symbol | MatchCategory::Name | MatchCategory::Description => {
                    stocks.iter().chain(etfs.iter()).collect()
                }
            };
            build_group(category, &pool, keywords, aux)
        })
        .collect();

    // Priorities are distinct, so this order is total
    groups.sort_by_key(|g| (Reverse(g.highest_score), Reverse(g.category.priority())));
    groups
}

/// Tokenize `query` and rank the whole corpus.
pub fn search_corpus<S: Searchable + Sync>(
    query: &str,
    corpus: &Corpus<S>,
    aux: &AuxiliaryIndex,
) -> Vec<ResultGroup> {
    rank(&tokenize(query), &corpus.stocks, &corpus.etfs, aux)
}

fn build_group<S: Searchable + Sync>(
    category: MatchCategory,
    pool: &[&SearchCandidate<S>],
    keywords: &[String],
    aux: &AuxiliaryIndex,
) -> Option<ResultGroup> {
    let mut scored: Vec<(&SearchCandidate<S>, u32)> = pool
        .par_iter()
        .filter_map(|&c| match_in_category(c, keywords, category).map(|s| (c, s)))
        .collect();

    if scored.is_empty() {
        return None;
    }

    // sort_by_key is stable: equal scores keep collection order
    scored.sort_by_key(|&(_, s)| Reverse(s));
    let highest_score = scored[0].1;

    let results = scored
        .into_iter()
        .map(|(c, score)| create_scored_result(c.item(), score, aux))
        .collect();

    Some(ResultGroup { category, results, highest_score })
}

/// Attach display fields for `item` from the auxiliary tables.
pub fn create_scored_result<S: Searchable>(
    item: &S,
    score: u32,
    aux: &AuxiliaryIndex,
) -> ScoredResult {
    let info = aux.lookup(item.symbol());
    ScoredResult {
        instrument: item.to_instrument(),
        market_cap: info.market_cap.map(format_market_cap),
        pe_ratio: info.pe_ratio.map(format_pe_ratio),
        compare_text: info.compare_text.map(str::to_string),
        score,
    }
}
