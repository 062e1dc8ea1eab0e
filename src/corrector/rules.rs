// WHY: Compiles the literal abbreviation tables into ordered (boundary, continuation) rule pairs
// Every pattern is built once per corrector and shared by all passes

use anyhow::{bail, Context, Result};
use regex_automata::{meta::Regex, Input};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Range;
use tracing::{debug, info};

use super::tables;

/// Behaviour class of an abbreviation, implied by table membership
///
/// Variant order is lookup precedence: a surface form listed in two tables
/// belongs to the earlier class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbbreviationClass {
    /// Latin and cross-reference abbreviations ("e.g.", "cf.", "vs."): always merge
    Reference,
    /// Reference numbers and units ("no.", "vol.", "ft."): merge numerals first
    Ambiguous,
    /// Dotted country and organisation codes ("U.S.", "U.K.")
    CountryCode,
    /// Company-name endings ("Inc.", "Corp.")
    EntitySuffix,
    /// Honorifics ("Dr.", "Sr.")
    PersonalTitle,
    /// May or may not end a sentence ("etc.", "a.m.")
    SometimesEnds,
}

impl AbbreviationClass {
    pub const ALL: [AbbreviationClass; 6] = [
        AbbreviationClass::Reference,
        AbbreviationClass::Ambiguous,
        AbbreviationClass::CountryCode,
        AbbreviationClass::EntitySuffix,
        AbbreviationClass::PersonalTitle,
        AbbreviationClass::SometimesEnds,
    ];

    pub fn builtin_entries(self) -> &'static [&'static str] {
        match self {
            AbbreviationClass::Reference => tables::REFERENCE_ABBREVIATIONS,
            AbbreviationClass::Ambiguous => tables::AMBIGUOUS_ABBREVIATIONS,
            AbbreviationClass::CountryCode => tables::COUNTRY_CODE_ABBREVIATIONS,
            AbbreviationClass::EntitySuffix => tables::ENTITY_SUFFIX_ABBREVIATIONS,
            AbbreviationClass::PersonalTitle => tables::PERSONAL_TITLE_ABBREVIATIONS,
            AbbreviationClass::SometimesEnds => tables::SOMETIMES_ENDS_ABBREVIATIONS,
        }
    }

    /// Whether the split engine may place a boundary right after this class
    pub fn can_end_sentence(self) -> bool {
        !matches!(self, AbbreviationClass::Reference)
    }

    /// Continuation tests in the order they are tried; partial captures come first
    pub fn continuations(self) -> &'static [Continuation] {
        use Continuation::*;
        match self {
            AbbreviationClass::Reference => &[AnyText],
            AbbreviationClass::Ambiguous => &[Numeral, RomanNumeral, Lowercase],
            AbbreviationClass::CountryCode => &[Lowercase],
            AbbreviationClass::EntitySuffix => &[Lowercase],
            AbbreviationClass::PersonalTitle => &[Lowercase, Digit],
            AbbreviationClass::SometimesEnds => &[Lowercase, Digit],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AbbreviationClass::Reference => "reference",
            AbbreviationClass::Ambiguous => "ambiguous",
            AbbreviationClass::CountryCode => "country_code",
            AbbreviationClass::EntitySuffix => "entity_suffix",
            AbbreviationClass::PersonalTitle => "personal_title",
            AbbreviationClass::SometimesEnds => "sometimes_ends",
        }
    }
}

/// Shape of the next fragment that continues an abbreviation
///
/// Group 1 of each pattern is the absorbed text. A leading ". " is a
/// segmenter artifact and sits outside the group so it is dropped on merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Continuation {
    Numeral,
    RomanNumeral,
    Lowercase,
    Digit,
    AnyText,
}

impl Continuation {
    pub fn pattern(self) -> &'static str {
        match self {
            Continuation::Numeral => r"^(?:\.\s+)?(\d+(?:[.,:\-]\d+)*\.?)(?:\s+|$)",
            // single "I" only with a period so the pronoun is never taken for a numeral
            Continuation::RomanNumeral => {
                r"^(?:\.\s+)?((?:[IVXLCDM]{2,}|[VXLCDM])\.?|I\.)(?:\s+|$)"
            }
            Continuation::Lowercase => r"(?s)^(?:\.\s+)?([a-z].*)$",
            Continuation::Digit => r"(?s)^(?:\.\s+)?(\d.*)$",
            Continuation::AnyText => r"(?s)^(?:\.\s+)?(\S.*)$",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Continuation::Numeral => "numeral",
            Continuation::RomanNumeral => "roman_numeral",
            Continuation::Lowercase => "lowercase",
            Continuation::Digit => "digit",
            Continuation::AnyText => "any_text",
        }
    }
}

/// One (boundary test, continuation test) pair
#[derive(Debug, Clone)]
pub struct AbbreviationRule {
    pub class: AbbreviationClass,
    pub label: String,
    boundary: Regex,
    continuation: Regex,
}

impl AbbreviationRule {
    /// Compile a rule pair, rejecting a continuation test without a capture group
    pub fn new(class: AbbreviationClass, label: &str, boundary: &str, continuation: &str) -> Result<Self> {
        let boundary_re = Regex::new(boundary)
            .with_context(|| format!("rule {label}: invalid boundary test"))?;
        let continuation_re = Regex::new(continuation)
            .with_context(|| format!("rule {label}: invalid continuation test"))?;

        // captures_len counts the implicit whole-match group
        if continuation_re.captures_len() < 2 {
            bail!("rule {label}: continuation test `{continuation}` defines no capture group");
        }

        Ok(Self {
            class,
            label: label.to_string(),
            boundary: boundary_re,
            continuation: continuation_re,
        })
    }

    pub fn matches_boundary(&self, current: &str) -> bool {
        self.boundary.is_match(current)
    }

    /// Span of `next` absorbed by this rule, if the continuation test matches
    pub fn continuation_span(&self, next: &str) -> Option<Range<usize>> {
        first_group(&self.continuation, next, 0).map(|(_, group)| group)
    }
}

/// Result of a successful rule lookup for a fragment pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    pub class: AbbreviationClass,
    pub label: String,
    /// Absorbed span of the next fragment
    pub captured: Range<usize>,
}

/// Compiled abbreviation rule table
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<AbbreviationRule>,
    classes: HashMap<String, AbbreviationClass>,
    time_markers: HashSet<&'static str>,
    name_repair_titles: HashSet<&'static str>,
    compounds: Vec<(&'static str, &'static str)>,
    split_candidates: Regex,
}

impl RuleTable {
    /// Build the table from the built-in lists plus caller-supplied additions
    ///
    /// Additions override the built-in class of an existing surface form.
    pub fn new(extra: &BTreeMap<AbbreviationClass, Vec<String>>) -> Result<Self> {
        let mut classes: HashMap<String, AbbreviationClass> = HashMap::new();
        for class in AbbreviationClass::ALL {
            for entry in class.builtin_entries() {
                classes.entry((*entry).to_string()).or_insert(class);
            }
        }

        for (class, entries) in extra {
            for entry in entries {
                validate_entry(entry)
                    .with_context(|| format!("extra {} abbreviation", class.name()))?;
                if let Some(previous) = classes.insert(entry.clone(), *class) {
                    debug!("Abbreviation {} moved from {} to {}", entry, previous.name(), class.name());
                }
            }
        }

        let mut rules = Vec::new();
        for class in AbbreviationClass::ALL {
            let members = class_members(&classes, class);
            if members.is_empty() {
                continue;
            }
            let boundary = format!(r#"(?:^|[\s(\["'\u{{201C}}\u{{2018}}])(?:{})$"#, alternation(&members));
            for continuation in class.continuations() {
                let label = format!("{}/{}", class.name(), continuation.name());
                rules.push(AbbreviationRule::new(class, &label, &boundary, continuation.pattern())?);
            }
        }

        let mut candidates: Vec<&str> = classes
            .iter()
            .filter(|(_, class)| class.can_end_sentence())
            .map(|(entry, _)| entry.as_str())
            .collect();
        candidates.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        let split_pattern = format!(
            r#"(?:^|[\s(\["'\u{{201C}}\u{{2018}}])({})\s+["'\u{{201C}}\u{{2018}}(]?[A-Z]"#,
            alternation(&candidates)
        );
        let split_candidates = Regex::new(&split_pattern).context("split candidate pattern")?;

        info!("Compiled rule table: {} abbreviations, {} rules", classes.len(), rules.len());

        Ok(Self {
            rules,
            classes,
            time_markers: tables::TIME_ABBREVIATIONS.iter().copied().collect(),
            name_repair_titles: tables::NAME_REPAIR_TITLES.iter().copied().collect(),
            compounds: tables::COMPOUND_ABBREVIATIONS.to_vec(),
            split_candidates,
        })
    }

    pub fn builtin() -> Result<Self> {
        Self::new(&BTreeMap::new())
    }

    pub fn rules(&self) -> &[AbbreviationRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Class of a single token, ignoring opening brackets and quotes
    pub fn class_of(&self, token: &str) -> Option<AbbreviationClass> {
        let token = token.trim_start_matches(is_opening_mark);
        self.classes.get(token).copied()
    }

    pub fn is_abbreviation(&self, token: &str) -> bool {
        self.class_of(token).is_some()
    }

    pub fn is_time_marker(&self, token: &str) -> bool {
        self.time_markers.contains(token)
    }

    pub fn is_name_repair_title(&self, token: &str) -> bool {
        self.name_repair_titles.contains(token)
    }

    /// True when `token` is the second word of a compound whose first word is `previous`
    pub fn is_compound_tail(&self, previous: &str, token: &str) -> bool {
        self.compounds
            .iter()
            .any(|(head, tail)| *tail == token && head.eq_ignore_ascii_case(previous))
    }

    /// Pattern "known abbreviation, whitespace, capital letter"; group 1 is the abbreviation
    pub fn split_candidates(&self) -> &Regex {
        &self.split_candidates
    }

    /// First rule, in precedence order, whose boundary matches `current` and whose
    /// continuation matches `next`
    pub fn find_continuation(&self, current: &str, next: &str) -> Option<RuleMatch> {
        self.rules
            .iter()
            .filter(|rule| rule.matches_boundary(current))
            .find_map(|rule| {
                rule.continuation_span(next).map(|captured| RuleMatch {
                    class: rule.class,
                    label: rule.label.clone(),
                    captured,
                })
            })
    }
}

fn validate_entry(entry: &str) -> Result<()> {
    if entry.is_empty() {
        bail!("abbreviation entry is empty");
    }
    if entry.chars().any(char::is_whitespace) {
        bail!("abbreviation `{entry}` contains whitespace");
    }
    if !entry.ends_with('.') {
        bail!("abbreviation `{entry}` does not end with a period");
    }
    Ok(())
}

fn class_members(classes: &HashMap<String, AbbreviationClass>, class: AbbreviationClass) -> Vec<&str> {
    let mut members: Vec<&str> = classes
        .iter()
        .filter(|(_, c)| **c == class)
        .map(|(entry, _)| entry.as_str())
        .collect();
    // longest first keeps "U.S.A." ahead of "U.S." inside one alternation
    members.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    members
}

fn alternation(entries: &[&str]) -> String {
    entries
        .iter()
        .map(|entry| escape_literal(entry))
        .collect::<Vec<_>>()
        .join("|")
}

/// Escape a literal for inclusion in a regex-automata pattern
pub(crate) fn escape_literal(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len() * 2);
    for ch in literal.chars() {
        if r"\.+*?()|[]{}^$#&-~".contains(ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

pub(crate) fn is_opening_mark(ch: char) -> bool {
    matches!(ch, '(' | '[' | '{' | '"' | '\'' | '\u{201C}' | '\u{2018}')
}

/// Whole-match and group-1 spans of the first match at or after `from`
pub(crate) fn first_group(re: &Regex, haystack: &str, from: usize) -> Option<(Range<usize>, Range<usize>)> {
    let mut caps = re.create_captures();
    re.captures(Input::new(haystack).range(from..), &mut caps);
    let whole = caps.get_match()?;
    let group = caps.get_group(1)?;
    Some((whole.range(), group.range()))
}
