//! Statistical frequency method: term/phrase TF-IDF over the document,
//! optionally with sibling documents as corpus context.

use std::collections::{HashMap, HashSet};

use crate::stopwords::is_stop;
use crate::tokenize::tokenize;

/// TF-IDF scores for unigrams and bigrams in `text`, normalized to [0, 1].
///
/// `corpus` holds sibling documents from the same batch; the scored
/// document itself always counts toward document frequency, so an empty
/// corpus degrades to plain term frequency.
pub fn tfidf_scores(text: &str, corpus: &[&str]) -> HashMap<String, f64> {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return HashMap::new();
    }

    let terms = collect_terms(&tokens);
    let total_terms = tokens.len() as f64;

    let corpus_terms: Vec<HashSet<String>> = corpus
        .iter()
        .map(|doc| collect_terms(&tokenize(doc)).into_keys().collect())
        .collect();
    let n_docs = corpus_terms.len() as f64 + 1.0;

    let mut scores: HashMap<String, f64> = HashMap::new();
    for (term, count) in terms {
        let tf = count as f64 / total_terms;
        // +1 for the scored document itself.
        let df = corpus_terms.iter().filter(|doc| doc.contains(&term)).count() as f64 + 1.0;
        let idf = ((n_docs + 1.0) / (df + 1.0)).ln() + 1.0;
        scores.insert(term, tf * idf);
    }

    normalize(scores)
}

/// Unigram and bigram counts, stop words excluded at term boundaries.
fn collect_terms(tokens: &[String]) -> HashMap<String, usize> {
    let mut terms: HashMap<String, usize> = HashMap::new();

    for token in tokens {
        if !is_stop(token) && token.len() > 1 {
            *terms.entry(token.clone()).or_insert(0) += 1;
        }
    }
    for pair in tokens.windows(2) {
        if !is_stop(&pair[0]) && !is_stop(&pair[1]) {
            let bigram = format!("{} {}", pair[0], pair[1]);
            *terms.entry(bigram).or_insert(0) += 1;
        }
    }
    terms
}

/// Scale scores so the best term is 1.0.
pub(crate) fn normalize(scores: HashMap<String, f64>) -> HashMap<String, f64> {
    let max = scores.values().copied().fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return scores;
    }
    scores.into_iter().map(|(k, v)| (k, v / max)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequent_term_scores_highest() {
        let text = "acquisition acquisition acquisition market shares market";
        let scores = tfidf_scores(text, &[]);
        assert_eq!(scores["acquisition"], 1.0);
        assert!(scores["shares"] < scores["market"]);
    }

    #[test]
    fn test_corpus_rarity_boosts_unique_terms() {
        let text = "merger talks continue alongside quarterly earnings";
        let siblings = [
            "quarterly earnings beat expectations",
            "quarterly earnings fall short",
        ];
        let scores = tfidf_scores(text, &siblings);
        // "merger" appears only in the scored document; "quarterly" is everywhere.
        assert!(scores["merger"] > scores["quarterly"]);
    }

    #[test]
    fn test_bigrams_present() {
        let scores = tfidf_scores("supply chain pressure eased as supply chain costs fell", &[]);
        assert!(scores.contains_key("supply chain"));
    }

    #[test]
    fn test_empty_text() {
        assert!(tfidf_scores("", &[]).is_empty());
    }
}
