//! Okapi BM25 relevance scoring over tokenized documents.

use std::collections::{HashMap, HashSet};

/// BM25 scorer fitted over a tokenized corpus.
///
/// `k1` controls term-frequency saturation and is clamped to [1.2, 2.0];
/// `b` controls document-length normalization.
pub struct Bm25 {
    k1: f64,
    b: f64,
    doc_freq: HashMap<String, usize>,
    n_docs: usize,
    avg_doc_len: f64,
}

impl Default for Bm25 {
    fn default() -> Self {
        Self::new(1.5, 0.75)
    }
}

impl Bm25 {
    pub fn new(k1: f64, b: f64) -> Self {
        Self {
            k1: k1.clamp(1.2, 2.0),
            b,
            doc_freq: HashMap::new(),
            n_docs: 0,
            avg_doc_len: 0.0,
        }
    }

    /// Fit document frequencies and average length over a corpus.
    pub fn fit(&mut self, corpus: &[Vec<String>]) {
        self.doc_freq.clear();
        self.n_docs = corpus.len();
        let total_len: usize = corpus.iter().map(|d| d.len()).sum();
        self.avg_doc_len = if self.n_docs > 0 {
            total_len as f64 / self.n_docs as f64
        } else {
            0.0
        };

        for doc in corpus {
            let unique: HashSet<&String> = doc.iter().collect();
            for term in unique {
                *self.doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
        }
    }

    fn idf(&self, term: &str) -> f64 {
        let df = self.doc_freq.get(term).copied().unwrap_or(0) as f64;
        let n = self.n_docs as f64;
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }

    /// Score one document against a bag of query terms.
    pub fn score(&self, query: &[String], doc: &[String]) -> f64 {
        if doc.is_empty() || self.n_docs == 0 {
            return 0.0;
        }

        let mut term_freq: HashMap<&str, f64> = HashMap::new();
        for token in doc {
            *term_freq.entry(token.as_str()).or_insert(0.0) += 1.0;
        }
        let dl = doc.len() as f64;
        let len_norm = 1.0 - self.b + self.b * dl / self.avg_doc_len.max(1.0);

        query
            .iter()
            .map(|term| {
                let tf = term_freq.get(term.as_str()).copied().unwrap_or(0.0);
                if tf == 0.0 {
                    return 0.0;
                }
                self.idf(term) * tf * (self.k1 + 1.0) / (tf + self.k1 * len_norm)
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(s: &str) -> Vec<String> {
        s.split_whitespace().map(|w| w.to_lowercase()).collect()
    }

    fn corpus() -> Vec<Vec<String>> {
        vec![
            tokens("the merger deal closed after regulators approved the merger"),
            tokens("cloud storage prices fell again this quarter"),
            tokens("analysts discussed the merger on the earnings call"),
            tokens("storage vendors announced new cloud products"),
        ]
    }

    #[test]
    fn test_matching_doc_outranks_nonmatching() {
        let mut bm25 = Bm25::default();
        let docs = corpus();
        bm25.fit(&docs);

        let query = tokens("merger");
        let hit = bm25.score(&query, &docs[0]);
        let miss = bm25.score(&query, &docs[1]);
        assert!(hit > 0.0);
        assert_eq!(miss, 0.0);
    }

    #[test]
    fn test_score_monotone_in_term_frequency() {
        let mut bm25 = Bm25::default();
        bm25.fit(&corpus());

        // Same document length, only the query-term count differs.
        let query = tokens("merger");
        let once = tokens("the merger deal closed after regulators approved the vote");
        let twice = tokens("the merger deal closed after regulators approved the merger");
        assert_eq!(once.len(), twice.len());
        assert!(bm25.score(&query, &twice) > bm25.score(&query, &once));
    }

    #[test]
    fn test_rare_term_weighs_more() {
        let mut bm25 = Bm25::default();
        let docs = corpus();
        bm25.fit(&docs);

        // "regulators" appears in 1 doc, "cloud" in 2.
        let rare = bm25.score(&tokens("regulators"), &docs[0]);
        let common = bm25.score(&tokens("cloud"), &docs[1]);
        assert!(rare > common);
    }

    #[test]
    fn test_k1_clamped() {
        let bm25 = Bm25::new(5.0, 0.75);
        assert_eq!(bm25.k1, 2.0);
        let bm25 = Bm25::new(0.1, 0.75);
        assert_eq!(bm25.k1, 1.2);
    }

    #[test]
    fn test_empty_inputs() {
        let bm25 = Bm25::default();
        assert_eq!(bm25.score(&tokens("merger"), &[]), 0.0);
    }
}
