//! End-to-end ranking behavior through the public API.
//!
//! Covers the reference scenarios (exact symbol, typo symbol, multi-tag,
//! AND failure, tie-break by category, missing market data) plus the
//! properties every response must satisfy.

use std::collections::HashMap;
use std::sync::Arc;

use tickr::matcher::keyword_score;
use tickr::search::{rank, search_corpus, tokenize};
use tickr::{
    AuxiliaryIndex, Corpus, Fundamentals, Instrument, MatchCategory, MemoryStore, ResultGroup,
    SearchConfig, SearchEngine,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn apple() -> Instrument {
    Instrument::new("AAPL", "Apple Inc", &["Technology", "Consumer"], "maker of iPhone", "")
}

fn apple_engine() -> SearchEngine {
    init_tracing();
    SearchEngine::new(
        vec![apple()],
        Vec::new(),
        HashMap::new(),
        HashMap::new(),
        Arc::new(MemoryStore::new()),
        SearchConfig::default(),
    )
}

fn group(groups: &[ResultGroup], category: MatchCategory) -> Option<&ResultGroup> {
    groups.iter().find(|g| g.category == category)
}

fn market_corpus() -> (Vec<Instrument>, Vec<Instrument>) {
    let stocks = vec![
        apple(),
        Instrument::new(
            "MSFT",
            "Microsoft Corp",
            &["Technology", "Software"],
            "cloud and office software",
            "maker of Windows",
        ),
        Instrument::new(
            "NVDA",
            "NVIDIA Corp",
            &["Technology", "Semiconductors"],
            "graphics processors",
            "data center chips",
        ),
        Instrument::new(
            "JNJ",
            "Johnson & Johnson",
            &["Healthcare", "Pharma"],
            "pharmaceuticals and medical devices",
            "",
        ),
        Instrument::new("XOM", "Exxon Mobil", &["Energy", "Oil"], "integrated oil and gas", ""),
    ];
    let etfs = vec![
        Instrument::new(
            "SPY",
            "SPDR S&P 500 ETF Trust",
            &["Index", "Large Cap"],
            "tracks the S&P 500",
            "",
        ),
        Instrument::new(
            "QQQ",
            "Invesco QQQ Trust",
            &["Index", "Technology"],
            "tracks the Nasdaq-100",
            "heavy in technology",
        ),
        Instrument::new(
            "XLE",
            "Energy Select Sector SPDR",
            &["Energy", "Sector"],
            "energy stocks of the S&P 500",
            "",
        ),
    ];
    (stocks, etfs)
}

// ============================================================
// Scenarios
// ============================================================

#[test]
fn scenario_exact_symbol() {
    let response = apple_engine().search_sync("aapl".to_string());
    assert_eq!(response.groups.len(), 1);
    let symbol = &response.groups[0];
    assert_eq!(symbol.category, MatchCategory::Symbol);
    assert_eq!(symbol.results.len(), 1);
    assert_eq!(symbol.results[0].instrument.symbol, "AAPL");
    assert_eq!(symbol.results[0].score, 3);
    assert_eq!(symbol.highest_score, 3);
}

#[test]
fn scenario_typo_symbol() {
    let response = apple_engine().search_sync("appl".to_string());
    let symbol = group(&response.groups, MatchCategory::Symbol).expect("symbol group");
    assert_eq!(symbol.results[0].instrument.symbol, "AAPL");
    assert_eq!(symbol.results[0].score, 1);
}

#[test]
fn scenario_two_exact_tags() {
    let response = apple_engine().search_sync("technology consumer".to_string());
    let tags = group(&response.groups, MatchCategory::StockTag).expect("stock tag group");
    assert_eq!(tags.results[0].instrument.symbol, "AAPL");
    assert_eq!(tags.results[0].score, 6);
    // Stocks never appear under ETF tags
    assert!(group(&response.groups, MatchCategory::EtfTag).is_none());
}

#[test]
fn scenario_unmatched_keyword_excludes_instrument() {
    let response = apple_engine().search_sync("technology pharma".to_string());
    assert!(group(&response.groups, MatchCategory::StockTag).is_none());
}

#[test]
fn scenario_equal_scores_ordered_by_category_priority() {
    // Symbol: "aap" substring (2) + "appl" typo (1) = 3
    // Description of the second instrument: "aap" whole word (2) + "appl" inside "apple" (1) = 3
    let stocks = vec![
        Instrument::new("AAPL", "Apple Inc", &[], "maker of iPhone", ""),
        Instrument::new("ORCH", "Orchard Holdings", &[], "aap grower", "apple orchards"),
    ];
    let engine = SearchEngine::new(
        stocks,
        Vec::new(),
        HashMap::new(),
        HashMap::new(),
        Arc::new(MemoryStore::new()),
        SearchConfig::default(),
    );
    let response = engine.search_sync("aap appl".to_string());
    let categories: Vec<(MatchCategory, u32)> =
        response.groups.iter().map(|g| (g.category, g.highest_score)).collect();
    assert_eq!(
        categories,
        vec![(MatchCategory::Symbol, 3), (MatchCategory::Description, 3)]
    );
    assert_eq!(response.groups[0].results[0].instrument.symbol, "AAPL");
    assert_eq!(response.groups[1].results[0].instrument.symbol, "ORCH");
}

#[test]
fn scenario_missing_market_data_is_explicit() {
    let response = apple_engine().search_sync("aapl".to_string());
    let result = &response.groups[0].results[0];
    assert_eq!(result.market_cap, None);
    assert_eq!(result.market_cap_label(), tickr::UNAVAILABLE);
    assert_ne!(result.market_cap_label(), "0.0B");
    assert_eq!(result.pe_ratio, None);
    assert_eq!(result.compare_text, None);
}

// ============================================================
// Properties
// ============================================================

#[test]
fn every_result_matches_every_keyword() {
    let (stocks, etfs) = market_corpus();
    let corpus = Corpus::new(stocks, etfs);
    let aux = AuxiliaryIndex::default();

    let queries = [
        "technology",
        "tech index",
        "s&p 500",
        "energy oil",
        "corp",
        "maker",
        "tracks technology",
    ];
    for query in queries {
        let keywords = tokenize(query);
        let groups = rank(&keywords, &corpus.stocks, &corpus.etfs, &aux);
        for g in &groups {
            assert!(!g.results.is_empty(), "empty group for {query}");
            for r in &g.results {
                let candidate = corpus
                    .stocks
                    .iter()
                    .chain(corpus.etfs.iter())
                    .find(|c| c.item().symbol == r.instrument.symbol)
                    .unwrap();
                for kw in &keywords {
                    assert!(
                        keyword_score(candidate, kw, g.category) > 0,
                        "{} qualified under {:?} without matching {kw}",
                        r.instrument.symbol,
                        g.category
                    );
                }
            }
        }
    }
}

#[test]
fn groups_and_results_are_sorted() {
    let (stocks, etfs) = market_corpus();
    let corpus = Corpus::new(stocks, etfs);
    let groups = rank(
        &tokenize("technology"),
        &corpus.stocks,
        &corpus.etfs,
        &AuxiliaryIndex::default(),
    );

    for pair in groups.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            a.highest_score > b.highest_score
                || (a.highest_score == b.highest_score
                    && a.category.priority() > b.category.priority())
        );
    }
    for g in &groups {
        assert_eq!(g.highest_score, g.results[0].score);
        assert!(g.results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    let mut seen: Vec<MatchCategory> = groups.iter().map(|g| g.category).collect();
    seen.dedup();
    assert_eq!(seen.len(), groups.len(), "a category appeared twice");
}

#[test]
fn search_is_deterministic() {
    let (stocks, etfs) = market_corpus();
    let mut aux = AuxiliaryIndex::default();
    aux.insert_fundamentals(
        "NVDA",
        Fundamentals {
            market_cap: Some(1.2e12),
            pe_ratio: Some(65.3),
        },
    );
    aux.insert_compare_text("QQQ", "vs SPY");
    let corpus = Corpus::new(stocks, etfs);

    for query in ["technology", "tracks index", "s", "energy"] {
        let first = serde_json::to_string(&search_corpus(query, &corpus, &aux)).unwrap();
        for _ in 0..5 {
            let again = serde_json::to_string(&search_corpus(query, &corpus, &aux)).unwrap();
            assert_eq!(first, again, "non-deterministic output for {query}");
        }
    }
}

#[test]
fn case_and_spacing_do_not_change_results() {
    let (stocks, etfs) = market_corpus();
    let corpus = Corpus::new(stocks, etfs);
    let aux = AuxiliaryIndex::default();
    let a = search_corpus("Energy   OIL", &corpus, &aux);
    let b = search_corpus("  energy oil ", &corpus, &aux);
    assert_eq!(a, b);
    assert!(!a.is_empty());
}

#[test]
fn aux_fields_attached_to_results() {
    let (stocks, etfs) = market_corpus();
    let engine = SearchEngine::new(
        stocks,
        etfs,
        HashMap::from([(
            "nvda".to_string(),
            Fundamentals {
                market_cap: Some(1_234_000_000_000.0),
                pe_ratio: None,
            },
        )]),
        HashMap::from([("NVDA".to_string(), "vs AMD".to_string())]),
        Arc::new(MemoryStore::new()),
        SearchConfig::default(),
    );
    let response = engine.search_sync("nvda".to_string());
    let r = &group(&response.groups, MatchCategory::Symbol).unwrap().results[0];
    assert_eq!(r.market_cap.as_deref(), Some("1234.0B"));
    assert_eq!(r.pe_ratio, None);
    assert_eq!(r.pe_ratio_label(), tickr::UNAVAILABLE);
    assert_eq!(r.compare_text.as_deref(), Some("vs AMD"));
}

// ============================================================
// History through the engine
// ============================================================

#[test]
fn repeated_query_moves_to_front_once() {
    let engine = apple_engine();
    engine.search_sync("aapl".to_string());
    engine.search_sync("technology".to_string());
    engine.search_sync("AAPL".to_string());
    assert_eq!(engine.history(), vec!["AAPL", "technology"]);
}

#[test]
fn history_never_exceeds_capacity() {
    let engine = apple_engine();
    for i in 0..30 {
        engine.search_sync(format!("query{i}"));
        assert!(engine.history().len() <= 10);
    }
    assert_eq!(engine.history().len(), 10);
    assert_eq!(engine.history()[0], "query29");
}

#[test]
fn history_survives_engine_restart() {
    let store = Arc::new(MemoryStore::new());
    let make = |store: Arc<MemoryStore>| {
        SearchEngine::new(
            vec![apple()],
            Vec::new(),
            HashMap::new(),
            HashMap::new(),
            store,
            SearchConfig::default(),
        )
    };

    let engine = make(Arc::clone(&store));
    engine.search_sync("aapl".to_string());
    engine.search_sync("consumer".to_string());
    drop(engine);

    let engine = make(store);
    assert_eq!(engine.history(), vec!["consumer", "aapl"]);
}

#[tokio::test]
async fn async_search_matches_sync_search() {
    let (stocks, etfs) = market_corpus();
    let engine = SearchEngine::new(
        stocks,
        etfs,
        HashMap::new(),
        HashMap::new(),
        Arc::new(MemoryStore::new()),
        SearchConfig::default(),
    );
    let async_groups = engine.search("tech index".to_string()).await.unwrap().groups;
    let sync_groups = engine.search_sync("tech index".to_string()).groups;
    assert_eq!(async_groups, sync_groups);
    assert_eq!(engine.history(), vec!["tech index"]);
}
