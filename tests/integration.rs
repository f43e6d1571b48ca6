use headline_lens::{
    annotate, annotate_with, coverage, score, AnnotatedSpan, Catalog, Category, CriterionResult,
    RuleDef, RULES,
};
use proptest::prelude::*;

fn find<'a>(spans: &'a [AnnotatedSpan], text: &str) -> Option<&'a AnnotatedSpan> {
    spans.iter().find(|s| s.text == text)
}

fn assert_well_formed(headline: &str, spans: &[AnnotatedSpan]) {
    for s in spans {
        assert!(s.start_index < s.end_index, "empty span {s:?}");
        assert_eq!(&headline[s.start_index..s.end_index], s.text);
    }
    for pair in spans.windows(2) {
        assert!(
            pair[0].end_index <= pair[1].start_index,
            "overlap between {:?} and {:?}",
            pair[0],
            pair[1]
        );
    }
}

fn results(verdicts: &[(u8, bool)]) -> Vec<CriterionResult> {
    verdicts
        .iter()
        .map(|&(id, passed)| CriterionResult::new(id, passed, "judged upstream"))
        .collect()
}

const HEADLINES: &[&str] = &[
    "Cyclist dead after East Vancouver crash",
    "Driver of truck strikes and kills man riding bicycle in East Vancouver crash",
    "Teenage boy dies after being hit by truck on notorious road that has claimed other lives",
    "Man killed in car crash",
    "Amsterdam taxi driver in custody after crash sends pedestrian to the hospital",
    "2 dead, 3 injured as SUV ploughs into bus shelter; expect major delays",
    "Jaywalker struck by car was at fault, police say",
    "Woman, 34, in critical condition after collision with pickup",
    "Motorcyclist found dead; crash caused hours of delays",
];

#[test]
fn cyclist_headline_flags_role_outcome_and_crash() {
    let spans = annotate("Cyclist dead after East Vancouver crash");
    assert_well_formed("Cyclist dead after East Vancouver crash", &spans);

    let cyclist = find(&spans, "Cyclist").expect("Cyclist annotated");
    assert!(matches!(
        cyclist.category,
        Some(Category::RoleBased) | Some(Category::VehicleTerms)
    ));
    assert_eq!(find(&spans, "dead").and_then(|s| s.category), Some(Category::OutcomeFocused));
    assert_eq!(find(&spans, "crash").and_then(|s| s.category), Some(Category::CrashTerminology));
}

#[test]
fn active_verb_survives_in_fully_humanized_headline() {
    let headline = "Driver of truck strikes and kills man riding bicycle in East Vancouver crash";
    let spans = annotate(headline);
    assert_well_formed(headline, &spans);

    let strikes = find(&spans, "strikes").expect("strikes annotated");
    assert_eq!(strikes.category, Some(Category::ActiveVoice));
    assert_eq!(strikes.start_index, 16);
    assert!(spans
        .iter()
        .all(|s| s.start_index != strikes.start_index || s.category == Some(Category::ActiveVoice)));

    assert_eq!(spans[0].text, "Driver of truck");
    assert_eq!(find(&spans, "kills").and_then(|s| s.category), Some(Category::ActiveVoice));
    assert_eq!(find(&spans, "man").and_then(|s| s.category), Some(Category::Humanization));
}

#[test]
fn vehicle_subject_outranks_bare_vehicle_term() {
    let spans = annotate("Truck strikes cyclist");
    assert_eq!(spans.len(), 2);
    assert_eq!(spans[0].text, "Truck strikes");
    assert_eq!(spans[0].category, Some(Category::VehicleAsSubject));
    assert_eq!(spans[1].text, "cyclist");
}

#[test]
fn empty_headline_is_not_an_error() {
    assert!(annotate("").is_empty());
}

#[test]
fn fixture_headlines_are_sorted_and_disjoint() {
    for headline in HEADLINES {
        let spans = annotate(headline);
        assert!(!spans.is_empty(), "nothing found in {headline:?}");
        assert_well_formed(headline, &spans);
    }
}

#[test]
fn annotate_is_repeatable() {
    for headline in HEADLINES {
        assert_eq!(annotate(headline), annotate(headline));
    }
}

#[test]
fn dropping_a_rule_never_adds_spans_without_shadowing() {
    // neither headline has a long match hiding shorter ones
    for headline in [
        "Cyclist dead after East Vancouver crash",
        "Pedestrian injured in collision",
    ] {
        let full = annotate(headline).len();
        for skip in 0..RULES.len() {
            let defs: Vec<RuleDef> = RULES
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, r)| *r)
                .collect();
            let reduced = annotate_with(&Catalog::new(&defs).unwrap(), headline).len();
            assert!(reduced <= full, "rule {skip} grew {headline:?}: {reduced} > {full}");
        }
    }
}

#[test]
fn removing_long_span_can_expose_shorter_ones() {
    let headline = "Man killed in car crash";
    let spans = annotate(headline);
    let texts: Vec<&str> = spans.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["Man", "killed", "car crash"]);

    let defs: Vec<RuleDef> = RULES
        .iter()
        .filter(|r| r.category != Some(Category::VehicleAsSubject))
        .copied()
        .collect();
    let reduced = annotate_with(&Catalog::new(&defs).unwrap(), headline);
    let texts: Vec<&str> = reduced.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["Man", "killed", "car", "crash"]);
}

#[test]
fn coverage_counts_match_annotation() {
    for headline in HEADLINES {
        let cov = coverage(headline);
        assert_eq!(cov.headline, *headline);
        assert_eq!(cov.match_count, annotate(headline).len());
        assert_eq!(cov.coverage_mask.chars().count(), headline.chars().count());
    }
}

#[test]
fn scores_follow_first_failure() {
    assert_eq!(score(&results(&[(1, true), (2, true), (3, true)])), Ok(3));
    assert_eq!(score(&results(&[(1, true), (2, false), (3, true)])), Ok(1));
    assert_eq!(score(&[]), Ok(0));
    assert_eq!(score(&results(&[(1, false), (2, true), (3, true)])), Ok(0));
}

#[test]
fn json_output_is_valid() {
    let spans = annotate("Cyclist dead after East Vancouver crash");
    let json = serde_json::to_string_pretty(&spans).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    let first = &parsed[0];
    assert_eq!(first["text"], "Cyclist");
    assert_eq!(first["startIndex"], 0);
    assert_eq!(first["endIndex"], 7);
    assert_eq!(first["category"], "role-based");
    assert!(first.get("explanation").is_some());
    assert!(first.get("priority").is_none());

    let cov = serde_json::to_value(coverage("Cyclist dead")).unwrap();
    assert!(cov.get("match_count").is_some());
    assert!(cov.get("coverage_mask").is_some());
}

const VOCAB: &[&str] = &[
    "driver", "of", "the", "car", "truck", "strikes", "hits", "hit", "killed", "kills", "man",
    "woman", "cyclist", "pedestrian", "dead", "dies", "in", "crash", "collision", "was", "struck",
    "by", "3", "injured", "runs", "over", "into", "traffic", "delays", "accident", "after",
    "caused", "17-year-old", "SUV", "ploughs", "responsible", "for", "reckless", "Vancouver",
];

#[test]
fn word_classes_and_case_folding_are_ascii() {
    let spans = annotate("Véhicule accidenté sur l'autoroute");
    let accident = find(&spans, "accident").expect("accident before a non-ASCII letter");
    assert_eq!(accident.start_index, 10);
    assert_eq!(accident.category, Some(Category::CrashTerminology));

    // Arabic-Indic three is not a digit here
    let spans = annotate("\u{0663} killed");
    assert!(spans.iter().all(|s| s.category != Some(Category::Statistical)));
    assert_eq!(
        spans.iter().map(|s| (s.text.as_str(), s.category)).collect::<Vec<_>>(),
        vec![("killed", Some(Category::PassiveVoice))]
    );

    // Kelvin sign does not fold to 'k'
    let spans = annotate("Car \u{212A}ills man");
    assert!(spans.iter().all(|s| s.category != Some(Category::VehicleAsSubject)));
    assert_eq!(
        spans.iter().map(|s| (s.text.as_str(), s.category)).collect::<Vec<_>>(),
        vec![("Car", Some(Category::VehicleTerms)), ("man", Some(Category::Humanization))]
    );
}

#[test]
fn annotate_is_consistent_across_threads() {
    let serial: Vec<Vec<AnnotatedSpan>> = HEADLINES.iter().map(|h| annotate(h)).collect();
    let parallel: Vec<Vec<AnnotatedSpan>> = std::thread::scope(|scope| {
        let handles: Vec<_> = HEADLINES
            .iter()
            .map(|h| scope.spawn(move || annotate(h)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });
    assert_eq!(serial, parallel);
}

fn vocab_headline() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(VOCAB), 0..14).prop_map(|words| words.join(" "))
}

proptest! {
    #[test]
    fn proptest_spans_never_overlap(headline in vocab_headline()) {
        let spans = annotate(&headline);
        for pair in spans.windows(2) {
            prop_assert!(pair[0].start_index < pair[1].start_index);
            prop_assert!(pair[0].end_index <= pair[1].start_index);
        }
        for s in &spans {
            prop_assert_eq!(&headline[s.start_index..s.end_index], s.text.as_str());
        }
    }

    #[test]
    fn proptest_arbitrary_text_is_total(headline in "\\PC{0,60}") {
        let first = annotate(&headline);
        prop_assert_eq!(&first, &annotate(&headline));
        for pair in first.windows(2) {
            prop_assert!(pair[0].end_index <= pair[1].start_index);
        }
    }

    #[test]
    fn proptest_score_is_leading_passes(
        verdicts in prop::collection::vec(prop::option::of(any::<bool>()), 3),
    ) {
        let input: Vec<CriterionResult> = verdicts
            .iter()
            .zip(1u8..)
            .filter_map(|(v, id)| v.map(|passed| CriterionResult::new(id, passed, "")))
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        let expected = verdicts.iter().take_while(|v| **v == Some(true)).count() as u8;
        prop_assert_eq!(score(&input), Ok(expected));

        if let Some(first_fail) = verdicts.iter().position(|v| *v != Some(true)) {
            prop_assert!(usize::from(expected) <= first_fail);
        }
    }
}
