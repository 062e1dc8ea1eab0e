// Punctuation boundary splitter and title+name repair tests

use seams_fix::BoundaryCorrector;
use std::sync::OnceLock;

static SHARED_CORRECTOR: OnceLock<BoundaryCorrector> = OnceLock::new();

fn get_corrector() -> &'static BoundaryCorrector {
    SHARED_CORRECTOR.get_or_init(|| BoundaryCorrector::with_default_config().unwrap())
}

fn frags(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn punct_split(text: &str) -> Vec<String> {
    get_corrector().punctuation_splitter().split(vec![text.to_string()])
}

fn repair(items: &[&str]) -> Vec<String> {
    get_corrector().title_repair().merge(frags(items))
}

#[test]
fn test_question_and_exclamation_boundaries() {
    assert_eq!(
        punct_split("Where is he? Nobody knows! Maybe later."),
        frags(&["Where is he?", "Nobody knows!", "Maybe later."])
    );
}

#[test]
fn test_brand_mark_is_not_a_boundary() {
    assert_eq!(
        punct_split("She works at Yahoo! In the marketing department."),
        frags(&["She works at Yahoo! In the marketing department."])
    );
    assert_eq!(
        punct_split("They played Jeopardy! Then they slept. Why? Tired."),
        frags(&["They played Jeopardy! Then they slept. Why?", "Tired."])
    );
}

#[test]
fn test_quoted_question() {
    assert_eq!(
        punct_split("\"Are you coming?\" He shook his head."),
        frags(&["\"Are you coming?\"", "He shook his head."])
    );
}

#[test]
fn test_repeated_marks_stay_together() {
    assert_eq!(
        punct_split("What?! No way."),
        frags(&["What?!", "No way."])
    );
}

#[test]
fn test_title_name_repair() {
    assert_eq!(repair(&["Dr.", "Who?"]), frags(&["Dr. Who?"]));
    assert_eq!(
        repair(&["Dr.", "Where did he go?"]),
        frags(&["Dr.", "Where did he go?"])
    );
}

#[test]
fn test_title_name_repair_requeues_rest() {
    assert_eq!(
        repair(&["We watched Mr.", "Bean! It was funny.", "The end."]),
        frags(&["We watched Mr. Bean!", "It was funny.", "The end."])
    );
}

#[test]
fn test_split_then_repair_round_trip() {
    let corrector = get_corrector();
    let split = corrector
        .punctuation_splitter()
        .split(frags(&["I met Prof.", "Xavier! He was kind."]));
    assert_eq!(split, frags(&["I met Prof.", "Xavier!", "He was kind."]));

    let repaired = corrector.title_repair().merge(split);
    assert_eq!(repaired, frags(&["I met Prof. Xavier!", "He was kind."]));
}
