use mediagantt_parser::{Field, RawRecord, RecordTable, TableColumn};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::importance::{classify, importance_label, Importance};
use crate::links::extract_link;
use crate::timeline::Schedule;

/// Which derived columns were produced, based on the source columns present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentSteps {
    pub timeline: bool,
    pub category: bool,
    pub importance: bool,
    pub link: bool,
}

impl EnrichmentSteps {
    pub fn for_table(table: &RecordTable) -> Self {
        Self {
            timeline: table.has_field(Field::Timeline),
            category: table.has_field(Field::Category),
            importance: table.has_field(Field::Count),
            link: table.has_field(Field::CodeMemo),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedRecord {
    /// Position in the loaded table; diagram task ids are derived from it.
    pub index: usize,
    pub raw: RawRecord,
    pub schedule: Option<Schedule>,
    /// Resolved label, or the raw text when no keyword matched.
    pub category: Option<String>,
    pub importance: Option<Importance>,
    pub link: Option<String>,
}

impl EnrichedRecord {
    pub fn category_text(&self) -> Option<&str> {
        self.category.as_deref().or(self.raw.category.as_deref())
    }

    pub fn importance_label(&self) -> &'static str {
        importance_label(self.importance)
    }

    /// True when the resolved category is exactly one of the configured keywords.
    pub fn is_configured(&self, config: &PipelineConfig) -> bool {
        self.category
            .as_deref()
            .is_some_and(|label| config.is_configured_category(label))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentSummary {
    pub total_records: usize,
    pub invalid_timelines: usize,
    /// Records whose category text contained a configured keyword.
    pub categorized: usize,
    pub classified: usize,
    pub linked: usize,
}

#[derive(Debug, Clone)]
pub struct EnrichedTable {
    pub format: &'static str,
    pub columns: Vec<TableColumn>,
    pub steps: EnrichmentSteps,
    pub records: Vec<EnrichedRecord>,
    pub summary: EnrichmentSummary,
}

impl EnrichedTable {
    /// Records whose resolved category is exactly one of the configured keywords,
    /// in table order.
    pub fn configured_records<'a>(
        &'a self,
        config: &'a PipelineConfig,
    ) -> impl Iterator<Item = &'a EnrichedRecord> + 'a {
        configured_records(&self.records, config)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub fn configured_records<'a>(
    records: &'a [EnrichedRecord],
    config: &'a PipelineConfig,
) -> impl Iterator<Item = &'a EnrichedRecord> + 'a {
    records
        .iter()
        .filter(move |record| record.is_configured(config))
}

/// Applies timeline parsing, categorization, importance and link extraction to every
/// record. Record-local failures become sentinel values; the batch never aborts.
pub fn enrich(table: RecordTable, config: &PipelineConfig) -> EnrichedTable {
    let steps = EnrichmentSteps::for_table(&table);
    debug!(?steps, format = table.format, "enriching task table");

    let mut summary = EnrichmentSummary {
        total_records: table.records.len(),
        ..EnrichmentSummary::default()
    };

    let records: Vec<EnrichedRecord> = table
        .records
        .into_iter()
        .enumerate()
        .map(|(index, raw)| enrich_record(index, raw, steps, config))
        .collect();

    for record in &records {
        if record.schedule.is_some_and(|schedule| !schedule.is_valid()) {
            summary.invalid_timelines += 1;
        }
        let matched = record
            .raw
            .category
            .as_deref()
            .is_some_and(|text| config.categorizer.find(text).is_some());
        if steps.category && matched {
            summary.categorized += 1;
        }
        if record.importance.is_some() {
            summary.classified += 1;
        }
        if record.link.is_some() {
            summary.linked += 1;
        }
    }

    info!(
        total = summary.total_records,
        invalid_timelines = summary.invalid_timelines,
        categorized = summary.categorized,
        classified = summary.classified,
        linked = summary.linked,
        "task table enriched"
    );

    EnrichedTable {
        format: table.format,
        columns: table.columns,
        steps,
        records,
        summary,
    }
}

pub fn enrich_record(
    index: usize,
    raw: RawRecord,
    steps: EnrichmentSteps,
    config: &PipelineConfig,
) -> EnrichedRecord {
    let schedule = steps.timeline.then(|| {
        let (schedule, err) = Schedule::resolve(raw.timeline.as_deref(), &config.default_end_date);
        if let Some(err) = err {
            warn!(row = index, error = %err, "timeline could not be parsed");
        }
        schedule
    });

    let category = if steps.category {
        raw.category
            .as_deref()
            .map(|text| config.categorizer.categorize(text).to_string())
    } else {
        None
    };

    let importance = if steps.importance {
        classify(
            category.as_deref().unwrap_or_default(),
            raw.count,
            &config.milestone_keywords,
            &config.thresholds,
        )
    } else {
        None
    };

    let link = if steps.link {
        raw.code_memo
            .as_deref()
            .and_then(extract_link)
            .map(str::to_string)
    } else {
        None
    };

    EnrichedRecord {
        index,
        raw,
        schedule,
        category,
        importance,
        link,
    }
}
