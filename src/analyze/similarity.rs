use std::collections::BTreeSet;

/// Tokens this short carry no duplicate-detection signal.
const MIN_TOKEN_LEN: usize = 4;

/// Articles, conjunctions, and short prepositions that survive the
/// length cutoff but carry no signal either.
const STOP_WORDS: &[&str] = &[
    "this", "that", "these", "those", "with", "from", "into", "over", "after", "before", "about",
    "have", "been", "were", "will", "would", "should", "could", "they", "them", "then", "than",
    "when", "what", "which", "where", "while", "your", "also", "only", "does", "each", "such",
];

/// Lower-cases the text, strips everything except word characters,
/// hyphens, and whitespace, then keeps the unique significant tokens
/// in first-occurrence order. Empty or absent input yields an empty
/// list.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();

    let mut seen = BTreeSet::new();
    let mut keywords = Vec::new();
    for token in cleaned.split_whitespace() {
        if token.len() < MIN_TOKEN_LEN || STOP_WORDS.contains(&token) {
            continue;
        }
        if seen.insert(token.to_string()) {
            keywords.push(token.to_string());
        }
    }
    keywords
}

/// Jaccard similarity of the two keyword sets: intersection over
/// union, 0.0 when the union is empty. Symmetric and bounded in
/// [0, 1]; 1.0 only when the keyword sets are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let set_a: BTreeSet<String> = extract_keywords(a).into_iter().collect();
    let set_b: BTreeSet<String> = extract_keywords(b).into_iter().collect();

    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    intersection as f64 / union as f64
}
