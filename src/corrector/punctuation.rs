// WHY: `?` and `!` boundaries the segmenter missed, plus the one artifact that splitting creates
// Brand names are shielded by placeholders so their own marks never count as boundaries

use anyhow::{Context, Result};
use regex_automata::meta::Regex;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, trace};

use super::placeholder::PlaceholderNormalizer;
use super::rules::{first_group, RuleTable};

/// Splits fragments at `?`/`!` followed by whitespace and a capital letter
#[derive(Debug, Clone)]
pub struct PunctuationSplitter {
    /// Group 1 is the mark run plus any closing quote or bracket kept with the left half
    boundary: Regex,
    placeholders: Arc<PlaceholderNormalizer>,
}

impl PunctuationSplitter {
    pub fn new(placeholders: Arc<PlaceholderNormalizer>) -> Result<Self> {
        let boundary = Regex::new(
            r#"([?!]+["')\]\u{201D}\u{2019}]*)\s+["'(\u{201C}\u{2018}]?[A-Z]"#,
        )
        .context("punctuation boundary pattern")?;
        Ok(Self { boundary, placeholders })
    }

    pub fn split(&self, fragments: Vec<String>) -> Vec<String> {
        let input_count = fragments.len();
        let mut output = Vec::with_capacity(input_count);

        for fragment in &fragments {
            let normalized = self.placeholders.normalize(fragment);
            for cut in self.split_normalized(&normalized.text) {
                let restored = normalized.map.denormalize(cut);
                let restored = restored.trim();
                if !restored.is_empty() {
                    output.push(restored.to_string());
                }
            }
        }

        debug!("Punctuation splitter: {} fragments in, {} out", input_count, output.len());
        output
    }

    fn split_normalized<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut pieces = Vec::new();
        let mut start = 0;
        let mut from = 0;

        while from < text.len() {
            let Some((_, mark)) = first_group(&self.boundary, text, from) else {
                break;
            };
            trace!("Punctuation boundary after {:?}", &text[start..mark.end]);
            pieces.push(&text[start..mark.end]);
            start = mark.end;
            from = mark.end;
        }
        pieces.push(&text[start..]);
        pieces
    }
}

/// Fuses "Dr." with a following one-word exclaimed or questioned name ("Who?")
#[derive(Debug, Clone)]
pub struct TitleNameRepair {
    table: Arc<RuleTable>,
    /// Group 1 is the name with its marks, group 2 a stray period
    name_shape: Regex,
}

impl TitleNameRepair {
    pub fn new(table: Arc<RuleTable>) -> Result<Self> {
        let name_shape = Regex::new(r"^([A-Z][A-Za-z'\-]*[?!]+)(\.?)(?:\s+|$)")
            .context("title name pattern")?;
        Ok(Self { table, name_shape })
    }

    /// Single left-to-right pass; text after the name is re-queued
    pub fn merge(&self, fragments: Vec<String>) -> Vec<String> {
        let input_count = fragments.len();
        let mut pending: VecDeque<String> = fragments.into();
        let mut output = Vec::with_capacity(input_count);

        while let Some(current) = pending.pop_front() {
            let repaired = pending
                .front()
                .and_then(|next| self.repair(&current, next));

            match repaired {
                Some((merged, remainder)) => {
                    pending.pop_front();
                    output.push(merged);
                    if let Some(rest) = remainder {
                        pending.push_front(rest);
                    }
                }
                None => output.push(current),
            }
        }

        debug!("Title+name repair: {} fragments in, {} out", input_count, output.len());
        output
    }

    fn repair(&self, current: &str, next: &str) -> Option<(String, Option<String>)> {
        let title = current.split_whitespace().next_back()?;
        if !self.table.is_name_repair_title(title) {
            return None;
        }

        let next = next.trim_start();
        let (whole, name) = first_group(&self.name_shape, next, 0)?;
        let merged = format!("{} {}", current.trim_end(), &next[name]);
        trace!("Repaired title and name: {:?}", merged);

        let rest = next[whole.end..].trim();
        Some((merged, (!rest.is_empty()).then(|| rest.to_string())))
    }
}
