//! Similarity scoring for a single text against a single keyword.
//!
//! Three discrete tiers, higher = better: exact equality, substring
//! containment, and a one-edit typo against any whitespace word of the text.
//! Scores are summed per keyword by the category matcher, so the tiers are
//! plain integers rather than an ordered tuple.

/// Score for `candidate == keyword`.
pub const EXACT_SCORE: u32 = 3;
/// Score for `candidate` containing `keyword`.
pub const SUBSTRING_SCORE: u32 = 2;
/// Score for a word of `candidate` within `MAX_TYPO_DISTANCE` edits of `keyword`.
pub const FUZZY_SCORE: u32 = 1;

/// Largest edit distance still treated as a typo.
pub const MAX_TYPO_DISTANCE: usize = 1;

/// Result of matching a keyword against a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchKind {
    None,
    Fuzzy,
    Substring,
    Exact,
}

impl MatchKind {
    pub fn score(self) -> u32 {
        match self {
            MatchKind::None => 0,
            MatchKind::Fuzzy => FUZZY_SCORE,
            MatchKind::Substring => SUBSTRING_SCORE,
            MatchKind::Exact => EXACT_SCORE,
        }
    }
}

/// Classify how `keyword` matches `candidate`: exact -> substring -> fuzzy.
/// Both inputs must already be lowercased.
pub fn classify(candidate: &str, keyword: &str) -> MatchKind {
    if candidate == keyword {
        return MatchKind::Exact;
    }
    if candidate.contains(keyword) {
        return MatchKind::Substring;
    }
    if candidate.split_whitespace().any(|word| is_typo_of(word, keyword)) {
        return MatchKind::Fuzzy;
    }
    MatchKind::None
}

/// Discrete match score of `keyword` against `candidate`, 0 = no match.
pub fn score(candidate: &str, keyword: &str) -> u32 {
    classify(candidate, keyword).score()
}

/// Best score of `keyword` against any text in `candidates`.
pub fn best_score<T: AsRef<str>>(candidates: &[T], keyword: &str) -> u32 {
    let mut best = 0;
    for candidate in candidates {
        best = best.max(score(candidate.as_ref(), keyword));
        if best == EXACT_SCORE {
            break;
        }
    }
    best
}

/// Whether `word` is a typo of `keyword`. Single-character keywords never
/// fuzzy-match.
pub fn is_typo_of(word: &str, keyword: &str) -> bool {
    keyword.chars().count() > 1
        && levenshtein_bounded(word, keyword, MAX_TYPO_DISTANCE).is_some()
}

/// Levenshtein edit distance over Unicode scalar values.
/// Insertions, deletions and substitutions each cost 1.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let n = b_chars.len();

    if a_chars.is_empty() {
        return n;
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for (i, &ac) in a_chars.iter().enumerate() {
        curr[0] = i + 1;
        for j in 1..=n {
            let cost = if ac == b_chars[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Levenshtein distance with threshold pruning.
/// Returns `Some(distance)` if distance <= max_dist, `None` otherwise.
pub fn levenshtein_bounded(a: &str, b: &str, max_dist: usize) -> Option<usize> {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m.abs_diff(n) > max_dist {
        return None;
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for i in 1..=m {
        curr[0] = i;
        let mut row_min = curr[0];

        for j in 1..=n {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
            row_min = row_min.min(curr[j]);
        }

        if row_min > max_dist {
            return None;
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    let result = prev[n];
    if result <= max_dist {
        Some(result)
    } else {
        None
    }
}
