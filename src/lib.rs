pub mod batch;
pub mod corrector;
pub mod normalization;
pub mod segmenter;

// Re-export the pipeline entry points
pub use corrector::{
    AbbreviationClass, BoundaryCorrector, Correction, CorrectorConfig, MergeEngine,
    PlaceholderMap, PlaceholderNormalizer, PunctuationSplitter, RuleTable, SplitEngine,
    TitleNameRepair,
};
pub use segmenter::{RegexSegmenter, SentenceSegmenter};

// Re-export batch types used by the CLI and benches
pub use batch::{process_files, BatchConfig, FileStats, RunStats};
