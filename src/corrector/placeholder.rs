// WHY: Hides `!` and `?` inside proper nouns ("Yahoo!") from every boundary-sensitive stage
// The substitution is reversible and its mapping lives only as long as one input text

use anyhow::{Context, Result};
use regex_automata::{meta::Regex, Input};
use std::collections::HashSet;
use tracing::trace;

/// Marker spliced in place of `!`
pub const EXCLAMATION_MARKER: &str = "XXEXCLXX";
/// Marker spliced in place of `?`
pub const QUESTION_MARKER: &str = "XXQUESTXX";

/// Placeholders substituted in one text, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderMap {
    entries: Vec<(String, String)>,
    // placeholders the source text already followed with a period ("Yahoo!.")
    keeps_period: HashSet<String>,
}

impl PlaceholderMap {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// (placeholder, original) pairs
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    fn record(&mut self, placeholder: String, original: &str) {
        if !self.entries.iter().any(|(p, _)| *p == placeholder) {
            self.entries.push((placeholder, original.to_string()));
        }
    }

    fn keep_period(&mut self, placeholder: &str) {
        self.keeps_period.insert(placeholder.to_string());
    }

    /// Restore every placeholder recorded in this map
    ///
    /// A placeholder followed by a period collapses to the bare brand: the
    /// brand's own mark already ends the sentence. Brands that carried a
    /// period in the source text keep it.
    pub fn denormalize(&self, text: &str) -> String {
        let mut restored = text.to_string();
        for (placeholder, original) in &self.entries {
            if !restored.contains(placeholder.as_str()) {
                continue;
            }
            if !self.keeps_period.contains(placeholder) {
                restored = restored.replace(&format!("{placeholder}."), original);
            }
            restored = restored.replace(placeholder.as_str(), original);
        }
        restored
    }
}

/// Output of [`PlaceholderNormalizer::normalize`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    pub map: PlaceholderMap,
}

/// Compiled brand matcher
#[derive(Debug, Clone)]
pub struct PlaceholderNormalizer {
    brands: Option<Regex>,
    brand_count: usize,
}

impl PlaceholderNormalizer {
    /// Build one case-insensitive matcher over every brand containing `!` or `?`
    pub fn new<S: AsRef<str>>(brands: &[S]) -> Result<Self> {
        let mut protected: Vec<&str> = brands
            .iter()
            .map(|b| b.as_ref().trim())
            .filter(|b| b.contains(&['!', '?'][..]))
            .collect();
        protected.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        protected.dedup();

        if protected.is_empty() {
            return Ok(Self { brands: None, brand_count: 0 });
        }

        let alternation = protected
            .iter()
            .map(|b| super::rules::escape_literal(b))
            .collect::<Vec<_>>()
            .join("|");
        // group 1 is the brand; the surrounding context stands in for word boundaries
        let pattern = format!(r#"(?i)(?:^|[^\w])({alternation})(?:$|[\s.,;:)\]"'\u{{201D}}\u{{2019}}])"#);
        let regex = Regex::new(&pattern).context("brand placeholder pattern")?;

        Ok(Self {
            brands: Some(regex),
            brand_count: protected.len(),
        })
    }

    pub fn brand_count(&self) -> usize {
        self.brand_count
    }

    /// Replace each protected brand occurrence with its placeholder form
    pub fn normalize(&self, text: &str) -> Normalized {
        let mut map = PlaceholderMap::default();
        let Some(regex) = &self.brands else {
            return Normalized { text: text.to_string(), map };
        };

        let mut output = String::with_capacity(text.len() + 16);
        let mut copied_to = 0;
        let mut search_from = 0;
        let mut caps = regex.create_captures();

        while search_from <= text.len() {
            regex.captures(Input::new(text).range(search_from..), &mut caps);
            let Some(brand) = caps.get_group(1) else {
                break;
            };
            let original = &text[brand.range()];
            let placeholder = placeholder_for(original);
            trace!("Protecting brand {:?} as {}", original, placeholder);

            output.push_str(&text[copied_to..brand.start]);
            output.push_str(&placeholder);
            if text[brand.end..].starts_with('.') {
                map.keep_period(&placeholder);
            }
            map.record(placeholder, original);
            copied_to = brand.end;

            // the trailing context char may open the next match
            search_from = brand.end;
        }
        output.push_str(&text[copied_to..]);

        Normalized { text: output, map }
    }

    /// Convenience round trip used by tests and the CLI stdin path
    pub fn denormalize(&self, normalized: &Normalized) -> String {
        normalized.map.denormalize(&normalized.text)
    }
}

fn placeholder_for(brand: &str) -> String {
    let mut placeholder = String::with_capacity(brand.len() + 16);
    for ch in brand.chars() {
        match ch {
            '!' => placeholder.push_str(EXCLAMATION_MARKER),
            '?' => placeholder.push_str(QUESTION_MARKER),
            _ => placeholder.push(ch),
        }
    }
    placeholder
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corrector::tables::PUNCTUATED_BRANDS;

    fn normalizer() -> PlaceholderNormalizer {
        PlaceholderNormalizer::new(PUNCTUATED_BRANDS).unwrap()
    }

    #[test]
    fn test_brand_is_hidden() {
        let normalized = normalizer().normalize("She works at Yahoo! In the marketing department.");
        assert!(!normalized.text.contains('!'));
        assert!(normalized.text.contains(&format!("Yahoo{EXCLAMATION_MARKER}")));
        assert_eq!(normalized.map.len(), 1);
    }

    #[test]
    fn test_case_insensitive_match_keeps_case() {
        let normalized = normalizer().normalize("i love YAHOO! and jeopardy!");
        assert!(normalized.text.contains(&format!("YAHOO{EXCLAMATION_MARKER}")));
        assert!(normalized.text.contains(&format!("jeopardy{EXCLAMATION_MARKER}")));
        assert_eq!(normalizer().denormalize(&normalized), "i love YAHOO! and jeopardy!");
    }

    #[test]
    fn test_word_boundary_required() {
        let normalized = normalizer().normalize("MyYahoo! is not a brand.");
        assert_eq!(normalized.text, "MyYahoo! is not a brand.");
        assert!(normalized.map.is_empty());
    }

    #[test]
    fn test_adjacent_brands() {
        let text = "Yahoo! Yahoo! Jeopardy!";
        let normalized = normalizer().normalize(text);
        assert!(!normalized.text.contains('!'));
        assert_eq!(normalizer().denormalize(&normalized), text);
    }

    #[test]
    fn test_marker_period_collapses() {
        let normalized = normalizer().normalize("I searched on Yahoo!");
        let appended = format!("{}.", normalized.text);
        assert_eq!(normalized.map.denormalize(&appended), "I searched on Yahoo!");
    }

    #[test]
    fn test_source_period_after_brand_survives() {
        let normalizer = normalizer();
        for text in ["I love Yahoo!.", "He said Yahoo!. Then he left."] {
            let normalized = normalizer.normalize(text);
            assert_eq!(normalizer.denormalize(&normalized), text);
        }
    }

    #[test]
    fn test_round_trip() {
        let texts = [
            "She works at Yahoo! In the marketing department.",
            "Did you watch Who Wants to Be a Millionaire? It was fun.",
            "Panic! at the Disco played, then Wham! closed the show.",
            "Nothing to protect here!",
            "",
        ];
        let normalizer = normalizer();
        for text in texts {
            let normalized = normalizer.normalize(text);
            assert_eq!(normalizer.denormalize(&normalized), text, "round trip failed for {text:?}");
        }
    }

    #[test]
    fn test_empty_brand_list() {
        let normalizer = PlaceholderNormalizer::new::<&str>(&[]).unwrap();
        let normalized = normalizer.normalize("Yahoo! is here.");
        assert_eq!(normalized.text, "Yahoo! is here.");
        assert_eq!(normalizer.brand_count(), 0);
    }
}
