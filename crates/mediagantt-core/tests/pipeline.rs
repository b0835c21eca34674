use anyhow::Result;
use mediagantt_core::importance::Importance;
use mediagantt_core::ingestion::load_table;
use mediagantt_core::pipeline::{enrich, EnrichmentSteps, EnrichmentSummary};
use mediagantt_core::timeline::{Schedule, INVALID_FORMAT};
use mediagantt_core::{PipelineConfig, PipelineError, RawConfig};
use mediagantt_parser::{Field, RawRecord, RecordTable};

fn fixture_path(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../mediagantt-parser/tests/data")
        .join(name)
}

fn default_config() -> PipelineConfig {
    RawConfig::default().validate().expect("default config is valid")
}

fn record(category: &str, count: Option<i64>) -> RawRecord {
    RawRecord {
        timeline: Some("2024/01~2024/02".to_string()),
        category: Some(category.to_string()),
        count,
        code_name: Some(format!("{category} task")),
        ..RawRecord::default()
    }
}

#[test]
fn enriches_fixture_table() -> Result<()> {
    let config = default_config();
    let table = load_table(&fixture_path("media_tasks.tsv"))?;
    let enriched = enrich(table, &config);

    assert_eq!(
        enriched.steps,
        EnrichmentSteps {
            timeline: true,
            category: true,
            importance: true,
            link: true
        }
    );
    assert_eq!(enriched.len(), 4);

    let first = &enriched.records[0];
    assert_eq!(first.index, 0);
    assert_eq!(first.category.as_deref(), Some("Software"));
    assert_eq!(first.raw.category.as_deref(), Some("Software Dev"));
    assert_eq!(first.importance, Some(Importance::Crit));
    assert_eq!(first.link.as_deref(), Some("https://example.com/a"));
    let schedule = first.schedule.expect("timeline column present");
    assert_eq!(schedule.start_text(), "2024-01-15");
    assert_eq!(schedule.end_text(), "2024-03-01");

    let second = &enriched.records[1];
    assert_eq!(second.category.as_deref(), Some("Hardware"));
    assert_eq!(second.importance, Some(Importance::Done));
    assert_eq!(second.link, None);
    let schedule = second.schedule.expect("timeline column present");
    assert_eq!(schedule.start_text(), "2023-06-01");
    assert_eq!(schedule.end_text(), "2025-01-01");

    let third = &enriched.records[2];
    assert_eq!(third.schedule, Some(Schedule::InvalidFormat));
    assert_eq!(third.importance, Some(Importance::Milestone));
    assert_eq!(third.link, None);

    let fourth = &enriched.records[3];
    assert_eq!(fourth.category.as_deref(), Some("Misc"));
    assert_eq!(fourth.importance, None);
    assert_eq!(fourth.importance_label(), "");
    assert_eq!(fourth.link.as_deref(), Some("http://intra.net/x"));

    assert_eq!(
        enriched.summary,
        EnrichmentSummary {
            total_records: 4,
            invalid_timelines: 1,
            categorized: 3,
            classified: 3,
            linked: 2,
        }
    );
    Ok(())
}

#[test]
fn invalid_timeline_does_not_abort_batch() {
    let config = default_config();
    let mut bad = record("Software", Some(3));
    bad.timeline = Some("next spring".to_string());
    let table = RecordTable::with_fields(
        "TEST",
        &[Field::Timeline, Field::Category, Field::Count, Field::CodeName],
        vec![record("Hardware", Some(1)), bad, record("Medium", Some(9))],
    );

    let enriched = enrich(table, &config);
    let starts: Vec<String> = enriched
        .records
        .iter()
        .map(|r| r.schedule.map(|s| s.start_text()).unwrap_or_default())
        .collect();
    assert_eq!(starts, ["2024-01-01", INVALID_FORMAT, "2024-01-01"]);
    assert_eq!(enriched.summary.invalid_timelines, 1);
}

#[test]
fn exact_category_labels_count_as_categorized() {
    let config = default_config();
    let table = RecordTable::with_fields(
        "TEST",
        &[Field::Timeline, Field::Category, Field::Count, Field::CodeName],
        vec![
            record("Software", Some(1)),
            record("Hardware Rig", Some(1)),
            record("Misc", Some(1)),
        ],
    );

    let enriched = enrich(table, &config);
    assert_eq!(enriched.records[0].category.as_deref(), Some("Software"));
    assert_eq!(enriched.summary.categorized, 2);
}

#[test]
fn missing_columns_skip_their_steps() {
    let config = default_config();
    let table = RecordTable::with_fields(
        "TEST",
        &[Field::Category, Field::CodeName],
        vec![RawRecord {
            category: Some("Theory Lab".to_string()),
            code_memo: Some("https://ignored.example".to_string()),
            count: Some(10),
            ..RawRecord::default()
        }],
    );

    let enriched = enrich(table, &config);
    let only = &enriched.records[0];
    assert_eq!(
        enriched.steps,
        EnrichmentSteps {
            timeline: false,
            category: true,
            importance: false,
            link: false
        }
    );
    assert_eq!(only.schedule, None);
    assert_eq!(only.category.as_deref(), Some("Theory"));
    assert_eq!(only.importance, None);
    assert_eq!(only.link, None);
}

#[test]
fn empty_count_still_allows_milestone() {
    let config = default_config();
    let table = RecordTable::with_fields(
        "TEST",
        &[Field::Timeline, Field::Category, Field::Count],
        vec![record("Theory", None), record("Software", None)],
    );

    let enriched = enrich(table, &config);
    assert_eq!(enriched.records[0].importance, Some(Importance::Milestone));
    assert_eq!(enriched.records[1].importance, None);
}

#[test]
fn record_order_and_indices_are_preserved() {
    let config = default_config();
    let categories = ["Others", "Software", "Unlisted", "Hardware", "Software"];
    let table = RecordTable::with_fields(
        "TEST",
        &[Field::Timeline, Field::Category, Field::Count],
        categories.iter().map(|c| record(c, Some(1))).collect(),
    );

    let enriched = enrich(table, &config);
    let indices: Vec<usize> = enriched.records.iter().map(|r| r.index).collect();
    assert_eq!(indices, [0, 1, 2, 3, 4]);

    let kept: Vec<usize> = enriched
        .configured_records(&config)
        .map(|r| r.index)
        .collect();
    assert_eq!(kept, [0, 1, 3, 4]);
}

#[test]
fn unreadable_source_is_reported() {
    let err = load_table(std::path::Path::new("/no/such/tasks.tsv")).unwrap_err();
    assert!(matches!(err, PipelineError::Read { .. }));
}
