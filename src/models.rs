use serde::{Deserialize, Serialize};

/// Canonical patent record; every raw spelling variant is resolved before
/// one of these is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatentRecord {
    pub id: Option<String>,
    pub number: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub domain: Option<String>,
    pub technology: Option<String>,
    pub sub_technology: Option<String>,
    pub keywords: Vec<String>, // lower-cased, trimmed
}

impl PatentRecord {
    pub fn number_or_empty(&self) -> &str {
        self.number.as_deref().unwrap_or("")
    }
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
    pub fn abstract_or_empty(&self) -> &str {
        self.abstract_text.as_deref().unwrap_or("")
    }
    pub fn domain_or_empty(&self) -> &str {
        self.domain.as_deref().unwrap_or("")
    }
    pub fn technology_or_empty(&self) -> &str {
        self.technology.as_deref().unwrap_or("")
    }
    pub fn sub_technology_or_empty(&self) -> &str {
        self.sub_technology.as_deref().unwrap_or("")
    }
}

/// One bar/slice of a category chart (domain, technology, country).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub name: String,
    pub value: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<u32>,
}

/// Share of records mentioning a label; `value` lies in `[0, 1]` unless a
/// record repeats the same label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frequency {
    pub name: String,
    pub count: u32,
    pub value: f64,
}

/// Result of one completed search, as the service reported it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub keywords: Vec<String>,
    pub total: u64,
    pub records: Vec<PatentRecord>,
}
