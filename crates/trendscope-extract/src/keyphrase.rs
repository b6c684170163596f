//! Unsupervised keyphrase method: RAKE-style degree/frequency ranking.
//! Needs no corpus context; phrases are runs of content words between
//! stop words and punctuation.

use std::collections::HashMap;

use crate::statistical::normalize;
use crate::stopwords::is_stop;

/// RAKE scores for candidate phrases in `text`, normalized to [0, 1].
pub fn rake_scores(text: &str, max_phrase_len: usize) -> HashMap<String, f64> {
    let phrases = candidate_phrases(text, max_phrase_len);
    if phrases.is_empty() {
        return HashMap::new();
    }

    // Word degree and frequency across all candidate phrases.
    let mut freq: HashMap<&str, f64> = HashMap::new();
    let mut degree: HashMap<&str, f64> = HashMap::new();
    for phrase in &phrases {
        let co_occurrence = (phrase.len() - 1) as f64;
        for word in phrase {
            *freq.entry(word).or_insert(0.0) += 1.0;
            *degree.entry(word).or_insert(0.0) += co_occurrence;
        }
    }

    let mut scores: HashMap<String, f64> = HashMap::new();
    for phrase in &phrases {
        let score: f64 = phrase
            .iter()
            .map(|w| (degree[w.as_str()] + freq[w.as_str()]) / freq[w.as_str()])
            .sum();
        let key = phrase.join(" ");
        scores
            .entry(key)
            .and_modify(|s| *s = s.max(score))
            .or_insert(score);
    }

    normalize(scores)
}

/// Split into content-word runs at stop words and punctuation. Runs longer
/// than `max_phrase_len` are split into consecutive windows of at most
/// that length, so long stretches of content words still yield phrases.
fn candidate_phrases(text: &str, max_phrase_len: usize) -> Vec<Vec<String>> {
    let max_phrase_len = max_phrase_len.max(1);
    let mut phrases = Vec::new();
    let mut current: Vec<String> = Vec::new();

    let mut flush = |current: &mut Vec<String>| {
        if current.is_empty() {
            return;
        }
        let run = std::mem::take(current);
        for window in run.chunks(max_phrase_len) {
            phrases.push(window.to_vec());
        }
    };

    for raw in text.split(|c: char| c.is_whitespace() || ".,!?;:()[]\"".contains(c)) {
        let word: String = raw
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '-')
            .collect::<String>()
            .to_lowercase();
        if word.len() < 2 || is_stop(&word) {
            flush(&mut current);
        } else {
            current.push(word);
        }
    }
    flush(&mut current);
    phrases
}
