// Placeholder normalizer tests over the built-in brand table

use seams_fix::corrector::placeholder::{EXCLAMATION_MARKER, QUESTION_MARKER};
use seams_fix::corrector::tables::PUNCTUATED_BRANDS;
use seams_fix::{BoundaryCorrector, CorrectorConfig, PlaceholderNormalizer};
use std::sync::OnceLock;

static SHARED_NORMALIZER: OnceLock<PlaceholderNormalizer> = OnceLock::new();

fn get_normalizer() -> &'static PlaceholderNormalizer {
    SHARED_NORMALIZER.get_or_init(|| PlaceholderNormalizer::new(PUNCTUATED_BRANDS).unwrap())
}

#[test]
fn test_every_builtin_brand_round_trips() {
    let normalizer = get_normalizer();
    for brand in PUNCTUATED_BRANDS {
        let text = format!("Yesterday {brand} was mentioned twice, {brand} again.");
        let normalized = normalizer.normalize(&text);

        assert!(
            !normalized.text.contains(&['!', '?'][..]),
            "marks left in {:?}",
            normalized.text
        );
        assert_eq!(normalized.map.len(), 1, "one placeholder expected for {brand}");
        assert_eq!(normalized.map.denormalize(&normalized.text), text);
    }
}

#[test]
fn test_markers_replace_marks() {
    let normalized = get_normalizer().normalize("Who Wants to Be a Millionaire? Yes.");
    assert!(normalized.text.starts_with(&format!("Who Wants to Be a Millionaire{QUESTION_MARKER}")));

    let normalized = get_normalizer().normalize("Panic! at the Disco");
    assert_eq!(normalized.text, format!("Panic{EXCLAMATION_MARKER} at the Disco"));
}

#[test]
fn test_unprotected_marks_untouched() {
    let text = "Stop! Who goes there? Nobody.";
    let normalized = get_normalizer().normalize(text);
    assert_eq!(normalized.text, text);
    assert!(normalized.map.is_empty());
}

#[test]
fn test_maps_are_per_call() {
    let normalizer = get_normalizer();
    let first = normalizer.normalize("Yahoo! here.");
    let second = normalizer.normalize("Nothing here.");
    assert_eq!(first.map.len(), 1);
    assert!(second.map.is_empty());
}

#[test]
fn test_extra_brand_from_config() {
    let config = CorrectorConfig {
        extra_brands: vec!["Hooray!".to_string()],
        ..CorrectorConfig::default()
    };
    let corrector = BoundaryCorrector::new(config).unwrap();

    assert_eq!(
        corrector.correct_text("We cheered Hooray! Then we left."),
        vec!["We cheered Hooray! Then we left."]
    );
}

#[test]
fn test_source_period_after_brand_kept() {
    let normalized = get_normalizer().normalize("I love Yahoo!.");
    assert_eq!(normalized.map.denormalize(&normalized.text), "I love Yahoo!.");

    let corrector = BoundaryCorrector::with_default_config().unwrap();
    assert_eq!(corrector.correct_text("I love Yahoo!."), vec!["I love Yahoo!."]);
}
