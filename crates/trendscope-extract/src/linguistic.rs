//! Linguistic method: named entities (via the injected recognizer) and
//! noun-phrase heuristics, each scored by normalized occurrence count
//! within the document.

use std::collections::HashMap;

use crate::tokenize::split_sentences;
use crate::types::KeywordType;
use trendscope_core::{EntityCategory, EntityRecognizer};

/// A linguistically derived candidate before merging.
#[derive(Debug, Clone)]
pub struct LinguisticCandidate {
    pub score: f64,
    pub kind: KeywordType,
    pub category: Option<EntityCategory>,
}

/// Entity and noun-phrase candidates keyed by normalized text, scores
/// normalized to [0, 1] by the most frequent candidate.
pub fn linguistic_scores(
    text: &str,
    recognizer: &dyn EntityRecognizer,
) -> HashMap<String, LinguisticCandidate> {
    let text_lower = text.to_lowercase();
    let mut counts: HashMap<String, (usize, KeywordType, Option<EntityCategory>)> = HashMap::new();

    // Entities claim their keys first; phrase/single sightings of the same
    // text must not downgrade the classification.
    for entity in recognizer.recognize(text) {
        let key = entity.text.to_lowercase();
        let occurrences = text_lower.matches(&key).count().max(1);
        counts
            .entry(key)
            .and_modify(|(c, kind, cat)| {
                *c = (*c).max(occurrences);
                *kind = KeywordType::Entity;
                *cat = Some(entity.category);
            })
            .or_insert((occurrences, KeywordType::Entity, Some(entity.category)));
    }

    for (phrase, kind) in capitalized_runs(text) {
        let key = phrase.to_lowercase();
        let occurrences = text_lower.matches(&key).count().max(1);
        counts
            .entry(key)
            .and_modify(|(c, _, _)| *c = (*c).max(occurrences))
            .or_insert((occurrences, kind, None));
    }

    let max = counts.values().map(|(c, _, _)| *c).max().unwrap_or(0) as f64;
    if max <= 0.0 {
        return HashMap::new();
    }

    counts
        .into_iter()
        .map(|(key, (count, kind, category))| {
            (
                key,
                LinguisticCandidate {
                    score: count as f64 / max,
                    kind,
                    category,
                },
            )
        })
        .collect()
}

/// Runs of consecutive capitalized words inside sentences, skipping the
/// sentence-start word. Single words become `Single` candidates, longer
/// runs `Phrase` candidates.
fn capitalized_runs(text: &str) -> Vec<(String, KeywordType)> {
    let mut out = Vec::new();
    for sentence in split_sentences(text) {
        let words: Vec<&str> = sentence.split_whitespace().collect();
        let mut run: Vec<String> = Vec::new();
        for (i, word) in words.iter().enumerate() {
            let cleaned: String = word
                .chars()
                .filter(|c| c.is_alphanumeric() || *c == '-')
                .collect();
            let is_cap = i > 0
                && cleaned.len() > 2
                && cleaned.chars().next().is_some_and(|c| c.is_uppercase())
                && !cleaned.chars().all(|c| c.is_uppercase());
            if is_cap {
                run.push(cleaned);
            } else if !run.is_empty() {
                push_run(&mut out, &run);
                run.clear();
            }
        }
        if !run.is_empty() {
            push_run(&mut out, &run);
        }
    }
    out
}

fn push_run(out: &mut Vec<(String, KeywordType)>, run: &[String]) {
    match run.len() {
        1 => out.push((run[0].clone(), KeywordType::Single)),
        2..=4 => out.push((run.join(" "), KeywordType::Phrase)),
        _ => {}
    }
}
