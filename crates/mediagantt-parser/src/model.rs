use std::fmt;

use serde::{Deserialize, Serialize};

/// Columns the enrichment pipeline knows how to consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Timeline,
    Category,
    Count,
    CodeMemo,
    CodeName,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Timeline,
        Field::Category,
        Field::Count,
        Field::CodeMemo,
        Field::CodeName,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            Field::Timeline => "Timeline",
            Field::Category => "Category",
            Field::Count => "Count",
            Field::CodeMemo => "Code Memo",
            Field::CodeName => "Code Name",
        }
    }

    pub fn from_column_name(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        Field::ALL
            .into_iter()
            .find(|field| field.column_name() == trimmed)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnSlot {
    Field(Field),
    /// Position inside [`RawRecord::extra`].
    Extra(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    pub name: String,
    pub slot: ColumnSlot,
}

impl TableColumn {
    pub fn field(field: Field) -> Self {
        Self {
            name: field.column_name().to_string(),
            slot: ColumnSlot::Field(field),
        }
    }

    pub fn extra(name: impl Into<String>, position: usize) -> Self {
        Self {
            name: name.into(),
            slot: ColumnSlot::Extra(position),
        }
    }
}

/// One input row with its known cells resolved at load time. Empty cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub timeline: Option<String>,
    pub category: Option<String>,
    pub count: Option<i64>,
    pub code_memo: Option<String>,
    pub code_name: Option<String>,
    pub extra: Vec<Option<String>>,
}

impl RawRecord {
    /// Text form of a cell as it appeared in the source table.
    pub fn cell_text(&self, slot: ColumnSlot) -> Option<String> {
        match slot {
            ColumnSlot::Field(Field::Timeline) => self.timeline.clone(),
            ColumnSlot::Field(Field::Category) => self.category.clone(),
            ColumnSlot::Field(Field::Count) => self.count.map(|count| count.to_string()),
            ColumnSlot::Field(Field::CodeMemo) => self.code_memo.clone(),
            ColumnSlot::Field(Field::CodeName) => self.code_name.clone(),
            ColumnSlot::Extra(position) => self.extra.get(position).cloned().flatten(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordTable {
    pub format: &'static str,
    pub columns: Vec<TableColumn>,
    pub records: Vec<RawRecord>,
}

impl RecordTable {
    /// Builds a table whose header holds exactly `fields`, in order.
    pub fn with_fields(format: &'static str, fields: &[Field], records: Vec<RawRecord>) -> Self {
        Self {
            format,
            columns: fields.iter().copied().map(TableColumn::field).collect(),
            records,
        }
    }

    pub fn has_field(&self, field: Field) -> bool {
        self.columns
            .iter()
            .any(|column| column.slot == ColumnSlot::Field(field))
    }

    pub fn extra_columns(&self) -> impl Iterator<Item = &TableColumn> {
        self.columns
            .iter()
            .filter(|column| matches!(column.slot, ColumnSlot::Extra(_)))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
