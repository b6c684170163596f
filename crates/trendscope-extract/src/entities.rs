//! Regex-heuristic entity recognizer — the default `EntityRecognizer`
//! implementation. A model-backed recognizer can be injected instead; this
//! one needs no model download.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use trendscope_core::{EntityCategory, EntityRecognizer, RecognizedEntity};

static ORG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s+(?:Inc\.|Corp\.|LLC|Ltd\.|Co\.|Group|Holdings)")
        .expect("org regex")
});

static TITLED_PERSON_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:Mr|Mrs|Ms|Dr|Prof)\.\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)")
        .expect("titled person regex")
});

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Z][a-z]+\s+[A-Z][a-z]+)\b").expect("name regex"));

static MONETARY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$[\d,]+(?:\.\d{2})?\s*(?:million|billion|trillion|M|B|K)?\b")
        .expect("monetary regex")
});

static DATE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2}(?:st|nd|rd|th)?,?\s*\d{4}\b",
        r"\b\d{4}[-/]\d{1,2}[-/]\d{1,2}\b",
        r"\bQ[1-4]\s*\d{4}\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("date regex"))
    .collect()
});

static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b\d+(?:,\d{3})*(?:\.\d+)?\s*(?:users|customers|employees|people|units|shares|percent|%)\b",
    )
    .expect("numeric regex")
});

/// Entity recognizer built on regex patterns: title+name and
/// consecutive-capitalized persons, corporate-suffix organizations,
/// monetary amounts, dates, and unit-tagged quantities.
pub struct HeuristicEntityRecognizer;

impl EntityRecognizer for HeuristicEntityRecognizer {
    fn recognize(&self, text: &str) -> Vec<RecognizedEntity> {
        let mut found: Vec<RecognizedEntity> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        let mut push = |text: &str, category: EntityCategory, seen: &mut HashSet<String>| {
            let key = text.to_lowercase();
            if seen.insert(key) {
                found.push(RecognizedEntity {
                    text: text.to_string(),
                    category,
                });
            }
        };

        // Organizations first so "Acme Corp." is not re-tagged as a name.
        let mut org_words: HashSet<String> = HashSet::new();
        for cap in ORG_RE.captures_iter(text) {
            if let (Some(whole), Some(name)) = (cap.get(0), cap.get(1)) {
                push(whole.as_str().trim(), EntityCategory::Organization, &mut seen);
                org_words.insert(name.as_str().to_lowercase());
            }
        }

        for cap in TITLED_PERSON_RE.captures_iter(text) {
            if let Some(name) = cap.get(1) {
                push(name.as_str(), EntityCategory::Person, &mut seen);
            }
        }

        // Two consecutive capitalized words, skipping text start (likely a
        // sentence opener) and organization names already claimed.
        for m in NAME_RE.find_iter(text) {
            let key = m.as_str().to_lowercase();
            let claimed = org_words.contains(&key)
                || seen.iter().any(|s| s.starts_with(&key) || key.starts_with(s.as_str()));
            if m.start() > 2 && !claimed {
                push(m.as_str(), EntityCategory::Person, &mut seen);
            }
        }

        for m in MONETARY_RE.find_iter(text) {
            push(m.as_str(), EntityCategory::Monetary, &mut seen);
        }
        for re in DATE_RES.iter() {
            for m in re.find_iter(text) {
                push(m.as_str(), EntityCategory::Date, &mut seen);
            }
        }
        for m in NUMERIC_RE.find_iter(text) {
            push(m.as_str(), EntityCategory::Numeric, &mut seen);
        }

        found
    }

    fn is_available(&self) -> bool {
        true
    }
}
