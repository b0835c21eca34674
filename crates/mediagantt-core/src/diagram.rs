use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::importance::Importance;
use crate::pipeline::{configured_records, EnrichedRecord};
use crate::timeline::INVALID_FORMAT;

const HEADER: &str = "gantt\n\
title Media Development Timeline\n\
dateFormat YYYY-MM-DD\n\
axisFormat %Y\n";

const THEME_DIRECTIVE: &str = "%%{init: { 'theme': 'base', 'themeVariables': {\n \
'primaryColor': '#D3D3D3', 'primaryTextColor': '#000000', 'primaryBorderColor': '#A9A9A1',\n \
'lineColor': '#eee', 'secondaryColor': '#f0e68c', 'tertiaryColor': '#C0C0C0'\n\
}, 'gantt': {\n \
'topAxis': 1,\n \
'titleTopMargin': 25,\n \
'barHeight': 20,\n \
'barGap': 4,\n \
'topPadding': 75,\n \
'rightPadding': 5,\n \
'leftPadding': 5,\n \
'gridLineStartPadding': 100,\n \
'fontSize': 20,\n \
'sectionFontSize': 25,\n \
'numberSectionStyles': 2\n\
} } }%%\n";

const TODAY_MARKER: &str = "todayMarker stroke-width:1px,stroke:#d8d8d8,opacity:0.8\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GanttTask {
    pub id: usize,
    pub label: String,
    pub importance: Option<Importance>,
    pub start: String,
    pub end: String,
    pub link: Option<String>,
}

impl GanttTask {
    fn from_record(record: &EnrichedRecord, config: &PipelineConfig) -> Self {
        let mut label = record.raw.code_name.clone().unwrap_or_default();
        if config.append_timeline {
            if let Some(timeline) = record.raw.timeline.as_deref() {
                label.push('_');
                label.push_str(timeline);
            }
        }

        let (start, end) = match record.schedule {
            Some(schedule) => (schedule.start_text(), schedule.end_text()),
            None => (INVALID_FORMAT.to_string(), INVALID_FORMAT.to_string()),
        };
        let end = if record.importance == Some(Importance::Milestone) {
            start.clone()
        } else {
            end
        };

        Self {
            id: record.index,
            label,
            importance: record.importance,
            start,
            end,
            link: record.link.clone(),
        }
    }

    pub fn task_id(&self) -> String {
        format!("t{}", self.id)
    }
}

impl fmt::Display for GanttTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.importance {
            Some(tag) => writeln!(
                f,
                " {} : {}, {}, {} , {}",
                self.label,
                tag,
                self.task_id(),
                self.start,
                self.end
            )?,
            None => writeln!(
                f,
                " {} : {}, {} , {}",
                self.label,
                self.task_id(),
                self.start,
                self.end
            )?,
        }
        if let Some(link) = &self.link {
            writeln!(f, "click {} href \"{}\"", self.task_id(), link)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GanttSection {
    pub label: String,
    pub tasks: Vec<GanttTask>,
}

impl fmt::Display for GanttSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "section {}", self.label)?;
        for task in &self.tasks {
            write!(f, "{task}")?;
        }
        Ok(())
    }
}

/// A Mermaid Gantt script. Rendering goes through `Display`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GanttDocument {
    pub custom_theme: bool,
    pub sections: Vec<GanttSection>,
}

impl GanttDocument {
    /// Keeps records whose category is a configured keyword and groups them into
    /// sections in first-seen order.
    pub fn build(records: &[EnrichedRecord], config: &PipelineConfig) -> Result<Self> {
        if records.is_empty() {
            return Err(PipelineError::EmptyDataset {
                operation: "diagram generation",
            });
        }

        let mut sections: Vec<GanttSection> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for record in configured_records(records, config) {
            let Some(label) = record.category.as_deref() else {
                continue;
            };
            let position = *positions.entry(label).or_insert_with(|| {
                sections.push(GanttSection {
                    label: label.to_string(),
                    tasks: Vec::new(),
                });
                sections.len() - 1
            });
            sections[position]
                .tasks
                .push(GanttTask::from_record(record, config));
        }

        debug!(
            sections = sections.len(),
            tasks = sections.iter().map(|s| s.tasks.len()).sum::<usize>(),
            "gantt document built"
        );

        Ok(Self {
            custom_theme: config.custom_theme,
            sections,
        })
    }

    pub fn task_count(&self) -> usize {
        self.sections.iter().map(|section| section.tasks.len()).sum()
    }
}

impl fmt::Display for GanttDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(HEADER)?;
        if self.custom_theme {
            f.write_str(THEME_DIRECTIVE)?;
        }
        f.write_str(TODAY_MARKER)?;
        for section in &self.sections {
            write!(f, "{section}")?;
        }
        Ok(())
    }
}

/// Renders enriched records as Mermaid Gantt text.
pub fn generate(records: &[EnrichedRecord], config: &PipelineConfig) -> Result<String> {
    Ok(GanttDocument::build(records, config)?.to_string())
}
