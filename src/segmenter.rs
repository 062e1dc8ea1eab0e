// WHY: Seam for the upstream sentence segmenter the corrector repairs
// The bundled regex segmenter knows only personal titles, so it makes both kinds of boundary error

use anyhow::{Context, Result};
use regex_automata::meta::Regex;
use std::collections::HashSet;
use tracing::debug;

use crate::corrector::tables::PERSONAL_TITLE_ABBREVIATIONS;
use crate::normalization::normalize_fragment;

/// Anything that turns running text into candidate sentences
pub trait SentenceSegmenter: Send + Sync {
    /// Candidate sentences in text order, whitespace-normalized and non-empty
    fn segment(&self, text: &str) -> Vec<String>;
}

/// Punctuation + capital letter segmenter
pub struct RegexSegmenter {
    /// Group 1 is the terminal mark plus closing quotes or brackets
    boundary: Regex,
    titles: HashSet<&'static str>,
}

impl RegexSegmenter {
    pub fn new() -> Result<Self> {
        let pattern = r#"([.!?]["')\]\u{201D}\u{2019}]*)\s+["'(\[\u{201C}\u{2018}]?[A-Z]"#;
        let boundary = Regex::new(pattern).context("segmenter boundary pattern")?;
        debug!("Compiled regex segmenter with pattern: {}", pattern);

        Ok(Self {
            boundary,
            titles: PERSONAL_TITLE_ABBREVIATIONS.iter().copied().collect(),
        })
    }

    /// Title abbreviations like "Dr." precede proper nouns and never end the candidate
    fn ends_with_title(&self, candidate: &str) -> bool {
        candidate
            .split_whitespace()
            .next_back()
            .map(|word| {
                word.trim_matches(|c: char| {
                    matches!(c, '"' | '\'' | '(' | '[' | '\u{201C}' | '\u{201D}' | '\u{2018}' | '\u{2019}')
                })
            })
            .is_some_and(|word| self.titles.contains(word))
    }
}

impl SentenceSegmenter for RegexSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut start = 0;

        for caps in self.boundary.captures_iter(text) {
            let Some(mark) = caps.get_group(1) else {
                continue;
            };
            let candidate = &text[start..mark.end];
            if self.ends_with_title(candidate) {
                continue;
            }
            push_sentence(&mut sentences, candidate);
            start = mark.end;
        }
        push_sentence(&mut sentences, &text[start..]);

        debug!("Segmented {} bytes into {} candidate sentences", text.len(), sentences.len());
        sentences
    }
}

fn push_sentence(sentences: &mut Vec<String>, raw: &str) {
    let sentence = normalize_fragment(raw);
    if !sentence.is_empty() {
        sentences.push(sentence);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    static SHARED_SEGMENTER: OnceLock<RegexSegmenter> = OnceLock::new();

    fn segmenter() -> &'static RegexSegmenter {
        SHARED_SEGMENTER.get_or_init(|| RegexSegmenter::new().unwrap())
    }

    #[test]
    fn test_basic_segmentation() {
        let sentences = segmenter().segment("Hello world. This is a test! Is it working?");
        assert_eq!(sentences, vec!["Hello world.", "This is a test!", "Is it working?"]);
    }

    #[test]
    fn test_title_does_not_split() {
        let sentences = segmenter().segment("Dr. Smith examined the patient. Mrs. Jones waited.");
        assert_eq!(sentences, vec!["Dr. Smith examined the patient.", "Mrs. Jones waited."]);
    }

    #[test]
    fn test_other_abbreviations_split_early() {
        let sentences = segmenter().segment("See e.g. The Odyssey for details.");
        assert_eq!(sentences, vec!["See e.g.", "The Odyssey for details."]);
    }

    #[test]
    fn test_quotes_and_line_breaks() {
        let sentences = segmenter().segment("He said, \"Stop.\"\n\"Why?\" she\nasked.");
        assert_eq!(sentences, vec!["He said, \"Stop.\"", "\"Why?\" she asked."]);
    }

    #[test]
    fn test_empty_input() {
        assert!(segmenter().segment("").is_empty());
        assert!(segmenter().segment("   \n ").is_empty());
    }
}
