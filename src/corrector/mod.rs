// WHY: Orchestrates the correction stages over one input and owns everything compiled up front
// Stage order: split, punctuation split, title+name repair, merge to fixed point

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

pub mod merge;
pub mod placeholder;
pub mod punctuation;
pub mod rules;
pub mod split;
pub mod tables;

pub use merge::MergeEngine;
pub use placeholder::{Normalized, PlaceholderMap, PlaceholderNormalizer};
pub use punctuation::{PunctuationSplitter, TitleNameRepair};
pub use rules::{AbbreviationClass, AbbreviationRule, Continuation, RuleMatch, RuleTable};
pub use split::{SplitEngine, SplitGuard};

use crate::normalization::normalize_fragment;
use crate::segmenter::{RegexSegmenter, SentenceSegmenter};

/// Default bound on merge passes before the engine gives up on a fixed point
pub const DEFAULT_MAX_MERGE_PASSES: usize = 64;

/// Corrector configuration, loadable from JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectorConfig {
    pub max_merge_passes: usize,
    /// Additions to the built-in abbreviation tables
    pub extra_abbreviations: BTreeMap<AbbreviationClass, Vec<String>>,
    /// Additional `!`/`?` brand names to protect
    pub extra_brands: Vec<String>,
    /// False when inputs are already one fragment per line
    pub segment_input: bool,
}

impl Default for CorrectorConfig {
    fn default() -> Self {
        Self {
            max_merge_passes: DEFAULT_MAX_MERGE_PASSES,
            extra_abbreviations: BTreeMap::new(),
            extra_brands: Vec::new(),
            segment_input: true,
        }
    }
}

impl CorrectorConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Full correction pipeline
///
/// Every pattern is compiled in [`BoundaryCorrector::new`]; the correction
/// calls take `&self` and keep no state between calls, so one instance can
/// be shared behind an `Arc` across threads.
pub struct BoundaryCorrector {
    config: CorrectorConfig,
    table: Arc<RuleTable>,
    placeholders: Arc<PlaceholderNormalizer>,
    segmenter: Box<dyn SentenceSegmenter>,
    splitter: SplitEngine,
    punctuation: PunctuationSplitter,
    title_repair: TitleNameRepair,
    merger: MergeEngine,
}

impl BoundaryCorrector {
    pub fn new(config: CorrectorConfig) -> Result<Self> {
        info!("Building boundary corrector");

        let table = Arc::new(
            RuleTable::new(&config.extra_abbreviations).context("Failed to compile rule table")?,
        );

        let brands: Vec<&str> = tables::PUNCTUATED_BRANDS
            .iter()
            .copied()
            .chain(config.extra_brands.iter().map(String::as_str))
            .collect();
        let placeholders = Arc::new(PlaceholderNormalizer::new(brands.as_slice())?);

        let splitter = SplitEngine::new(Arc::clone(&table))?;
        let punctuation = PunctuationSplitter::new(Arc::clone(&placeholders))?;
        let title_repair = TitleNameRepair::new(Arc::clone(&table))?;
        let merger = MergeEngine::new(Arc::clone(&table), config.max_merge_passes)?;
        let segmenter = Box::new(RegexSegmenter::new()?);

        info!(
            "Boundary corrector ready: {} abbreviations, {} protected brands, {} max merge passes",
            table.len(),
            placeholders.brand_count(),
            merger.max_passes()
        );

        Ok(Self {
            config,
            table,
            placeholders,
            segmenter,
            splitter,
            punctuation,
            title_repair,
            merger,
        })
    }

    pub fn with_default_config() -> Result<Self> {
        Self::new(CorrectorConfig::default())
    }

    /// Replace the bundled regex segmenter
    pub fn with_segmenter(mut self, segmenter: Box<dyn SentenceSegmenter>) -> Self {
        self.segmenter = segmenter;
        self
    }

    pub fn config(&self) -> &CorrectorConfig {
        &self.config
    }

    pub fn rule_table(&self) -> &RuleTable {
        &self.table
    }

    pub fn placeholders(&self) -> &PlaceholderNormalizer {
        &self.placeholders
    }

    pub fn segmenter(&self) -> &dyn SentenceSegmenter {
        self.segmenter.as_ref()
    }

    pub fn split_engine(&self) -> &SplitEngine {
        &self.splitter
    }

    pub fn punctuation_splitter(&self) -> &PunctuationSplitter {
        &self.punctuation
    }

    pub fn title_repair(&self) -> &TitleNameRepair {
        &self.title_repair
    }

    pub fn merge_engine(&self) -> &MergeEngine {
        &self.merger
    }

    /// Correct segmenter output that is already placeholder-normalized
    pub fn correct_fragments(&self, fragments: Vec<String>) -> Vec<String> {
        let input_count = fragments.len();

        let fragments = self.splitter.split(fragments);
        let fragments = self.punctuation.split(fragments);
        let fragments = self.title_repair.merge(fragments);
        let fragments = self.merger.merge(fragments);

        let corrected: Vec<String> = fragments
            .iter()
            .map(|f| normalize_fragment(f))
            .filter(|f| !f.is_empty())
            .collect();

        debug!("Corrected {} fragments into {} sentences", input_count, corrected.len());
        corrected
    }

    /// Normalize, segment, correct and restore one text
    pub fn correct_text(&self, text: &str) -> Vec<String> {
        self.correct_document(text, true).sentences
    }

    /// Correct fragments from an external segmenter, one per element
    pub fn correct_segmented<S: AsRef<str>>(&self, fragments: &[S]) -> Vec<String> {
        let joined = fragments
            .iter()
            .map(|f| normalize_fragment(f.as_ref()))
            .filter(|f| !f.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        self.correct_document(&joined, false).sentences
    }

    /// Whole-document entry point used by the CLI
    ///
    /// With `segment` false every non-blank line is taken as one fragment.
    /// One placeholder map covers the whole document either way.
    pub fn correct_document(&self, text: &str, segment: bool) -> Correction {
        let normalized = self.placeholders.normalize(text);
        let fragments: Vec<String> = if segment {
            self.segmenter.segment(&normalized.text)
        } else {
            normalized
                .text
                .lines()
                .map(normalize_fragment)
                .filter(|line| !line.is_empty())
                .collect()
        };

        let fragments_in = fragments.len();
        let corrected = self.correct_fragments(fragments);
        let sentences = if normalized.map.is_empty() {
            corrected
        } else {
            corrected.iter().map(|f| normalized.map.denormalize(f)).collect()
        };

        Correction { fragments_in, sentences }
    }
}

/// Corrected sentences for one document and the fragment count they came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub fragments_in: usize,
    pub sentences: Vec<String>,
}
