use mediagantt_core::importance::{classify, importance_label, Importance, Thresholds};

fn milestones() -> Vec<String> {
    vec!["Theory".to_string(), "other".to_string()]
}

#[test]
fn counts_map_to_threshold_tags() {
    let thresholds = Thresholds {
        crit: 5,
        active: 3,
        done: 2,
    };
    let cases = [
        (Some(9), Some(Importance::Crit)),
        (Some(5), Some(Importance::Crit)),
        (Some(4), Some(Importance::Active)),
        (Some(3), Some(Importance::Active)),
        (Some(2), Some(Importance::Done)),
        (Some(1), None),
        (None, None),
    ];
    for (count, expected) in cases {
        assert_eq!(
            classify("Software", count, &milestones(), &thresholds),
            expected,
            "count {count:?}"
        );
    }
}

#[test]
fn milestone_keyword_wins_regardless_of_count() {
    let thresholds = Thresholds::default();
    for count in [None, Some(0), Some(100)] {
        assert_eq!(
            classify("Theory", count, &milestones(), &thresholds),
            Some(Importance::Milestone)
        );
    }
    assert_eq!(
        classify("Film Theory Seminar", Some(1), &milestones(), &thresholds),
        Some(Importance::Milestone)
    );
}

#[test]
fn milestone_match_is_case_sensitive_substring() {
    let thresholds = Thresholds::default();
    assert_eq!(
        classify("Others", Some(1), &milestones(), &thresholds),
        None
    );
    assert_eq!(
        classify("another", Some(1), &milestones(), &thresholds),
        Some(Importance::Milestone)
    );
}

#[test]
fn inverted_thresholds_apply_literally() {
    let thresholds = Thresholds {
        crit: 2,
        active: 3,
        done: 10,
    };
    assert_eq!(
        classify("Software", Some(12), &[], &thresholds),
        Some(Importance::Crit)
    );
    assert_eq!(
        classify("Software", Some(1), &[], &thresholds),
        None
    );
}

#[test]
fn labels_render_lowercase_and_empty_for_none() {
    assert_eq!(importance_label(Some(Importance::Milestone)), "milestone");
    assert_eq!(importance_label(Some(Importance::Crit)), "crit");
    assert_eq!(importance_label(None), "");
}
