// Record domain model - generic rows managed by every tabular module
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Text used for substring search; numbers render without a trailing `.0`
    pub fn search_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) if n.fract() == 0.0 && n.is_finite() => format!("{:.0}", n),
            FieldValue::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub fields: BTreeMap<String, FieldValue>,
    pub status: String,
}

impl Record {
    pub fn new(id: RecordId, fields: BTreeMap<String, FieldValue>, status: impl Into<String>) -> Self {
        Self {
            id,
            fields,
            status: status.into(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

/// Fixed cyclic order of status labels. Two labels form a binary toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCycle(Vec<String>);

impl StatusCycle {
    pub fn new<I, S>(labels: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.len() < 2 {
            return None;
        }
        // Duplicate labels would make `next` ambiguous
        for (i, label) in labels.iter().enumerate() {
            if labels[i + 1..].contains(label) {
                return None;
            }
        }
        Some(Self(labels))
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, status: &str) -> bool {
        self.0.iter().any(|s| s == status)
    }

    /// Label following `current`; unknown labels restart the cycle
    pub fn next(&self, current: &str) -> &str {
        match self.0.iter().position(|s| s == current) {
            Some(idx) => &self.0[(idx + 1) % self.0.len()],
            None => &self.0[0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default = "default_true")]
    pub required: bool,
    #[serde(default)]
    pub numeric: bool,
    #[serde(default)]
    pub searchable: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleSchema {
    pub slug: String,
    pub title: String,
    pub fields: Vec<FieldSpec>,
    pub statuses: StatusCycle,
    pub default_status: String,
    pub page_size: usize,
    /// Listing only; every mutation is refused
    pub read_only: bool,
}

impl ModuleSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn searchable_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.searchable)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
    pub page_size: usize,
    pub records: Vec<Record>,
}
