// WHY: Undoes the segmenter's premature splits after abbreviations and reference markers
// Runs whole passes over the fragment list until a pass changes nothing

use anyhow::{Context, Result};
use regex_automata::meta::Regex;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, trace, warn};

use super::rules::{first_group, AbbreviationClass, RuleTable};

/// What one successful merge commits and what it hands back to the work list
#[derive(Debug, Clone, PartialEq, Eq)]
struct MergeOutcome {
    committed: Vec<String>,
    remainder: Option<String>,
}

impl MergeOutcome {
    fn fused(merged: String, remainder: &str) -> Self {
        let remainder = remainder.trim();
        Self {
            committed: vec![merged],
            remainder: (!remainder.is_empty()).then(|| remainder.to_string()),
        }
    }
}

/// Fixed-point merge engine
#[derive(Debug, Clone)]
pub struct MergeEngine {
    table: Arc<RuleTable>,
    max_passes: usize,
    /// "<abbreviation> <numeral>" at the end of a fragment; group 1 is the abbreviation
    reference_tail: Regex,
}

impl MergeEngine {
    pub fn new(table: Arc<RuleTable>, max_passes: usize) -> Result<Self> {
        let reference_tail = Regex::new(
            r"(?:^|\s)(\S+\.)\s+(?:\d[\d.,:\-]*|[IVXLCDM]{2,}|[VXLCDM])\.?$",
        )
        .context("reference tail pattern")?;

        Ok(Self {
            table,
            max_passes: max_passes.max(1),
            reference_tail,
        })
    }

    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Merge until a pass leaves the fragment list unchanged
    ///
    /// Gives up after `max_passes` passes and returns the last state.
    pub fn merge(&self, fragments: Vec<String>) -> Vec<String> {
        let mut current: Vec<String> = fragments
            .into_iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();

        for pass in 1..=self.max_passes {
            let next = self.merge_pass(&current);
            if next == current {
                debug!("Merge engine reached fixed point after {} passes with {} fragments", pass, next.len());
                return next;
            }
            current = next;
        }

        warn!(
            "Merge engine stopped after {} passes without reaching a fixed point",
            self.max_passes
        );
        current
    }

    /// One left-to-right pass; remainders are re-queued at the current position
    pub fn merge_pass(&self, fragments: &[String]) -> Vec<String> {
        let mut pending: VecDeque<String> = fragments.iter().cloned().collect();
        let mut output = Vec::with_capacity(fragments.len());

        while let Some(fragment) = pending.pop_front() {
            let current = clean_artifacts(&fragment);
            let Some(next) = pending.front() else {
                output.push(current);
                continue;
            };

            match self.merge_pair(&current, next) {
                Some(outcome) => {
                    pending.pop_front();
                    output.extend(outcome.committed);
                    if let Some(remainder) = outcome.remainder {
                        pending.push_front(remainder);
                    }
                }
                None => output.push(current),
            }
        }

        output
    }

    fn merge_pair(&self, current: &str, next: &str) -> Option<MergeOutcome> {
        if next.starts_with(')') && has_unclosed_paren(current) {
            trace!("Closing parenthetical across {:?} | {:?}", current, next);
            return Some(MergeOutcome::fused(join(current, next), ""));
        }

        if let Some((clause, token)) = self.detached_abbreviation(current) {
            if let Some(mut outcome) = self.fuse(token, next) {
                trace!("Detached {:?} from clause {:?}", token, clause);
                outcome.committed.insert(0, clause.to_string());
                return Some(outcome);
            }
        }

        self.fuse(current, next)
    }

    /// Rule table, then the reference-number fallback, then clause separators
    fn fuse(&self, current: &str, next: &str) -> Option<MergeOutcome> {
        if let Some(rule_match) = self.table.find_continuation(current, next) {
            let captured = &next[rule_match.captured.clone()];
            trace!("Rule {} absorbs {:?} into {:?}", rule_match.label, captured, current);
            return Some(MergeOutcome::fused(
                join(current, captured),
                &next[rule_match.captured.end..],
            ));
        }

        let next = strip_join_artifact(next);

        if self.ends_with_reference_number(current) && starts_lowercase(next) {
            trace!("Reference continuation {:?} | {:?}", current, next);
            return Some(MergeOutcome::fused(join(current, next), ""));
        }

        let separator_end = current.strip_suffix('.').unwrap_or(current);
        if separator_end.ends_with(&[';', ':'][..]) && self.continues_after_separator(next) {
            trace!("Clause separator continuation {:?} | {:?}", current, next);
            return Some(MergeOutcome::fused(join(separator_end, next), ""));
        }

        None
    }

    fn ends_with_reference_number(&self, current: &str) -> bool {
        first_group(&self.reference_tail, current, 0)
            .is_some_and(|(_, token)| self.table.is_abbreviation(&current[token]))
    }

    /// First token is an abbreviation, except a title that introduces a capitalized name
    fn continues_after_separator(&self, next: &str) -> bool {
        let mut tokens = next.split_whitespace();
        let Some(first) = tokens.next() else {
            return false;
        };
        match self.table.class_of(first) {
            None => false,
            Some(AbbreviationClass::PersonalTitle) => {
                !tokens.next().is_some_and(|name| name.starts_with(|c: char| c.is_uppercase()))
            }
            Some(_) => true,
        }
    }

    /// "complete clause. abbr." where the trailing lowercase abbreviation opens the next sentence
    fn detached_abbreviation<'a>(&self, current: &'a str) -> Option<(&'a str, &'a str)> {
        let (clause, token) = current.rsplit_once(char::is_whitespace)?;
        let clause = clause.trim_end();

        if !token.starts_with(|c: char| c.is_lowercase()) || !self.table.is_abbreviation(token) {
            return None;
        }
        if !clause.ends_with('.') || clause.ends_with("..") {
            return None;
        }
        let mut words = clause.split_whitespace();
        let last = words.next_back()?;
        if words.next().is_none() || self.table.is_abbreviation(last) {
            return None;
        }
        Some((clause, token))
    }
}

/// Collapse ",." / ";." appended by the segmenter and an accidental ".." (never "...")
pub(crate) fn clean_artifacts(fragment: &str) -> String {
    let trimmed = fragment.trim();

    if let Some(body) = trimmed.strip_suffix('.') {
        let body_end = body.trim_end();
        if body_end.ends_with(&[',', ';'][..]) {
            return body_end.to_string();
        }
        if body.ends_with('.') && !body.ends_with("..") {
            return body.to_string();
        }
    }
    trimmed.to_string()
}

fn strip_join_artifact(next: &str) -> &str {
    match next.strip_prefix(". ") {
        Some(rest) => rest.trim_start(),
        None => next,
    }
}

fn has_unclosed_paren(text: &str) -> bool {
    let opened = text.chars().filter(|c| *c == '(').count();
    let closed = text.chars().filter(|c| *c == ')').count();
    opened > closed
}

fn join(current: &str, next: &str) -> String {
    format!("{} {}", current.trim_end(), next.trim_start())
}

fn starts_lowercase(text: &str) -> bool {
    text.chars().next().is_some_and(char::is_lowercase)
}
