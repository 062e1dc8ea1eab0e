// WHY: Inserts the boundaries the upstream segmenter missed after sentence-ending abbreviations
// Each candidate "abbreviation + capital" passes an ordered list of suppression guards first

use anyhow::{Context, Result};
use regex_automata::meta::Regex;
use std::collections::{HashSet, VecDeque};
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, trace};

use super::rules::{first_group, AbbreviationClass, RuleTable};
use super::tables;

/// Reasons to keep an "abbreviation + capital" pair inside one sentence
///
/// Evaluated in declaration order; the first guard that fires wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitGuard {
    /// Company suffix or title not preceded by a proper noun
    EntityContext,
    /// Unit or reference marker after a function word or inside a colon list
    MeasurementContext,
    /// "9 a.m. Monday and ..." qualifier phrase
    TimeBeforeWeekday,
    /// Second word of "et al.", "op. cit."
    CompoundAbbreviation,
    /// "U.S. Army"
    CountryInstitution,
    /// "U.S. U.K."
    CountryPair,
    /// "At 5 p.m. Dr. Smith ..."
    TimePhraseTitle,
}

impl SplitGuard {
    pub const ORDER: [SplitGuard; 7] = [
        SplitGuard::EntityContext,
        SplitGuard::MeasurementContext,
        SplitGuard::TimeBeforeWeekday,
        SplitGuard::CompoundAbbreviation,
        SplitGuard::CountryInstitution,
        SplitGuard::CountryPair,
        SplitGuard::TimePhraseTitle,
    ];
}

/// One "abbreviation + capital" occurrence inside a fragment
#[derive(Debug, Clone)]
struct Candidate<'a> {
    abbreviation: &'a str,
    class: AbbreviationClass,
    before: &'a str,
    after: &'a str,
}

impl<'a> Candidate<'a> {
    fn new(fragment: &'a str, span: Range<usize>, class: AbbreviationClass) -> Self {
        Self {
            abbreviation: &fragment[span.clone()],
            class,
            before: fragment[..span.start].trim_end(),
            after: fragment[span.end..].trim_start(),
        }
    }

    fn previous_token(&self) -> Option<&'a str> {
        self.before.split_whitespace().next_back()
    }

    fn next_token(&self) -> Option<&'a str> {
        self.after.split_whitespace().next()
    }

    fn token_after_next(&self) -> Option<&'a str> {
        self.after.split_whitespace().nth(1)
    }
}

/// Word lists consulted by the guards, lowercased for case-insensitive lookup
#[derive(Debug, Clone)]
struct ContextWords {
    articles: HashSet<&'static str>,
    connectives: HashSet<&'static str>,
    parentheticals: HashSet<&'static str>,
    institutions: HashSet<&'static str>,
    weekdays: HashSet<&'static str>,
    time_qualifiers: HashSet<&'static str>,
}

impl ContextWords {
    fn new() -> Self {
        let connectives = tables::CONJUNCTIONS
            .iter()
            .chain(tables::PREPOSITIONS)
            .chain(tables::FUNCTION_WORDS)
            .copied()
            .collect();
        Self {
            articles: tables::ARTICLES.iter().copied().collect(),
            connectives,
            parentheticals: tables::PARENTHETICAL_TOKENS.iter().copied().collect(),
            institutions: tables::INSTITUTION_WORDS.iter().copied().collect(),
            weekdays: tables::WEEKDAYS.iter().copied().collect(),
            time_qualifiers: tables::TIME_QUALIFIERS.iter().copied().collect(),
        }
    }

    fn is_connective(&self, token: &str) -> bool {
        self.connectives.contains(bare_word(token).to_lowercase().as_str())
    }

    fn is_article(&self, token: &str) -> bool {
        self.articles.contains(bare_word(token).to_lowercase().as_str())
    }

    fn is_punctuation_token(&self, token: &str) -> bool {
        self.parentheticals.contains(token)
            || token.starts_with(super::rules::is_opening_mark)
            || token.ends_with(&[',', ';', ':', '(', '-'][..])
            || !token.chars().any(char::is_alphanumeric)
    }
}

/// Split engine over already-segmented fragments
#[derive(Debug, Clone)]
pub struct SplitEngine {
    table: Arc<RuleTable>,
    words: ContextWords,
    proof_marker: Regex,
    time_phrase: Regex,
}

impl SplitEngine {
    pub fn new(table: Arc<RuleTable>) -> Result<Self> {
        let markers = tables::PROOF_MARKERS
            .iter()
            .map(|m| super::rules::escape_literal(m))
            .collect::<Vec<_>>()
            .join("|");
        // group 1 is the marker; the char before the period must close a word, not an abbreviation dot
        let proof_marker = Regex::new(&format!(r"[^\s.]\.\s+({markers})(?:\s|$)"))
            .context("proof marker pattern")?;

        let prepositions = tables::TIME_PHRASE_PREPOSITIONS.join("|");
        let time_phrase = Regex::new(&format!(r"(?i)^(?:{prepositions})\s+\d{{1,2}}(?:[:.]\d{{2}})?$"))
            .context("time phrase pattern")?;

        Ok(Self {
            table,
            words: ContextWords::new(),
            proof_marker,
            time_phrase,
        })
    }

    /// Split every fragment at each unsuppressed "abbreviation + capital" position
    ///
    /// Both halves of a split go back on the work list, so each is rescanned.
    pub fn split(&self, fragments: Vec<String>) -> Vec<String> {
        let mut pending: VecDeque<String> = fragments
            .into_iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();
        let mut output = Vec::with_capacity(pending.len());
        let input_count = pending.len();

        while let Some(fragment) = pending.pop_front() {
            match self.split_once(&fragment) {
                Some(pieces) => {
                    for piece in pieces.into_iter().rev() {
                        pending.push_front(piece);
                    }
                }
                None => output.push(fragment),
            }
        }

        debug!("Split engine: {} fragments in, {} out", input_count, output.len());
        output
    }

    /// First split of one fragment, as two or three non-empty pieces
    fn split_once(&self, fragment: &str) -> Option<Vec<String>> {
        if let Some(pieces) = self.split_proof_marker(fragment) {
            return Some(pieces);
        }

        let cut = self.find_abbreviation_split(fragment)?;
        let (left, right) = fragment.split_at(cut);
        let (left, right) = (left.trim_end(), right.trim_start());
        if left.is_empty() || right.is_empty() {
            return None;
        }
        trace!("Splitting {:?} | {:?}", left, right);
        Some(vec![left.to_string(), right.to_string()])
    }

    /// "... clause. q.e.d. ..." always yields the marker as its own fragment
    fn split_proof_marker(&self, fragment: &str) -> Option<Vec<String>> {
        let (_, marker) = first_group(&self.proof_marker, fragment, 0)?;
        let left = fragment[..marker.start].trim_end();
        let clause_tail = left.split_whitespace().next_back()?;
        if self.table.is_abbreviation(clause_tail) {
            return None;
        }

        let mut pieces = vec![left.to_string(), fragment[marker.clone()].to_string()];
        let rest = fragment[marker.end..].trim();
        if !rest.is_empty() {
            pieces.push(rest.to_string());
        }
        trace!("Detaching proof marker from {:?}", left);
        Some(pieces)
    }

    /// Byte offset just past the first abbreviation that should end a sentence
    fn find_abbreviation_split(&self, fragment: &str) -> Option<usize> {
        let candidates = self.table.split_candidates();
        let mut from = 0;

        while from < fragment.len() {
            let (_, span) = first_group(candidates, fragment, from)?;
            from = span.end;

            let Some(class) = self.table.class_of(&fragment[span.clone()]) else {
                continue;
            };
            let candidate = Candidate::new(fragment, span.clone(), class);

            match self.suppressing_guard(&candidate) {
                Some(guard) => {
                    trace!("Split after {:?} suppressed by {:?}", candidate.abbreviation, guard);
                }
                None => return Some(span.end),
            }
        }
        None
    }

    fn suppressing_guard(&self, candidate: &Candidate<'_>) -> Option<SplitGuard> {
        SplitGuard::ORDER
            .into_iter()
            .find(|guard| self.guard_fires(*guard, candidate))
    }

    fn guard_fires(&self, guard: SplitGuard, candidate: &Candidate<'_>) -> bool {
        match guard {
            SplitGuard::EntityContext => self.entity_context(candidate),
            SplitGuard::MeasurementContext => self.measurement_context(candidate),
            SplitGuard::TimeBeforeWeekday => self.time_before_weekday(candidate),
            SplitGuard::CompoundAbbreviation => candidate
                .previous_token()
                .is_some_and(|previous| self.table.is_compound_tail(previous, candidate.abbreviation)),
            SplitGuard::CountryInstitution => {
                candidate.class == AbbreviationClass::CountryCode
                    && candidate.next_token().is_some_and(|next| {
                        self.words.institutions.contains(next)
                            || self.words.institutions.contains(bare_word(next))
                    })
            }
            SplitGuard::CountryPair => {
                candidate.class == AbbreviationClass::CountryCode
                    && candidate.next_token().is_some_and(|next| {
                        self.table.class_of(next.trim_end_matches(&[',', ';', ':'][..]))
                            == Some(AbbreviationClass::CountryCode)
                    })
            }
            SplitGuard::TimePhraseTitle => self.time_phrase_title(candidate),
        }
    }

    /// Entity suffixes and titles split only after a capitalized proper noun
    fn entity_context(&self, candidate: &Candidate<'_>) -> bool {
        if !matches!(
            candidate.class,
            AbbreviationClass::EntitySuffix | AbbreviationClass::PersonalTitle
        ) {
            return false;
        }
        let Some(previous) = candidate.previous_token() else {
            return true;
        };
        if self.words.is_article(previous)
            || self.words.is_connective(previous)
            || self.words.is_punctuation_token(previous)
            || starts_lowercase(previous)
        {
            return true;
        }

        // "Then Dr. Smith": a title near the fragment start, or after anything but a
        // non-initial capitalized name ("John Smith Jr."), prefixes the next word
        candidate.class == AbbreviationClass::PersonalTitle
            && (candidate.before.split_whitespace().count() < 2 || !starts_uppercase(previous))
    }

    /// Units and reference markers: same idea with a narrower word set (no articles)
    fn measurement_context(&self, candidate: &Candidate<'_>) -> bool {
        if candidate.class != AbbreviationClass::Ambiguous {
            return false;
        }
        let Some(previous) = candidate.previous_token() else {
            return true;
        };
        if self.words.is_connective(previous) {
            return true;
        }
        // a short item introduced by a colon or semicolon ("Weight: 10 lbs. Height: ...")
        match candidate.before.rfind(&[':', ';'][..]) {
            Some(pos) => candidate.before[pos + 1..].split_whitespace().count() <= 2,
            None => false,
        }
    }

    fn time_before_weekday(&self, candidate: &Candidate<'_>) -> bool {
        if !self.table.is_time_marker(candidate.abbreviation) {
            return false;
        }
        let Some(day) = candidate.next_token() else {
            return false;
        };
        let bare_day = bare_word(day);
        if !self.words.weekdays.contains(bare_day) {
            return false;
        }
        // "Monday," or "Monday." closes the qualifier phrase itself
        if bare_day.len() != day.len() {
            return true;
        }
        match candidate.token_after_next() {
            None => true,
            Some(word) => {
                let lowered = bare_word(word).to_lowercase();
                self.words.time_qualifiers.contains(lowered.as_str()) || !starts_lowercase(word)
            }
        }
    }

    fn time_phrase_title(&self, candidate: &Candidate<'_>) -> bool {
        let next_is_title = candidate
            .next_token()
            .is_some_and(|next| self.table.class_of(next) == Some(AbbreviationClass::PersonalTitle));
        next_is_title && self.time_phrase.is_match(candidate.before)
    }
}

/// Token with surrounding punctuation removed ("Monday," -> "Monday")
fn bare_word(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric())
}

fn starts_lowercase(token: &str) -> bool {
    token
        .chars()
        .find(|c| c.is_alphabetic())
        .is_some_and(char::is_lowercase)
}

fn starts_uppercase(token: &str) -> bool {
    token
        .chars()
        .find(|c| c.is_alphabetic())
        .is_some_and(char::is_uppercase)
}
