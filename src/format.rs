use crate::api_types::RawRecord;
use crate::models::PatentRecord;

const NUMBER_KEYS: [&str; 2] = ["Patent Number", "Patent_Number"];
const DOMAIN_KEYS: [&str; 2] = ["Industry Domain", "Industry_Domain"];
const TECHNOLOGY_KEYS: [&str; 2] = ["Technology Area", "Technology_Area"];
const SUB_TECHNOLOGY_KEYS: [&str; 2] = ["Sub-Technology Area", "Sub_Technology_Area"];

const KEYWORD_SEPARATOR: &str = ", ";

/// Map one raw service record onto the canonical shape. Space-separated keys
/// win over their underscore spelling; missing fields stay `None`.
pub fn format_record(raw: &RawRecord) -> PatentRecord {
    let number = raw.first_of(&NUMBER_KEYS);
    PatentRecord {
        id: number.clone(),
        number,
        title: raw.text("Title"),
        abstract_text: raw.text("Abstract"),
        domain: raw.first_of(&DOMAIN_KEYS),
        technology: raw.first_of(&TECHNOLOGY_KEYS),
        sub_technology: raw.first_of(&SUB_TECHNOLOGY_KEYS),
        keywords: raw.text("Keywords").map(|k| parse_keywords(&k)).unwrap_or_default(),
    }
}

pub fn format_records(raw: &[RawRecord]) -> Vec<PatentRecord> {
    raw.iter().map(format_record).collect()
}

/// Split a `", "`-delimited keyword string into trimmed, lower-cased pieces.
/// Duplicates are kept.
pub fn parse_keywords(s: &str) -> Vec<String> {
    if s.is_empty() {
        return Vec::new();
    }
    s.split(KEYWORD_SEPARATOR)
        .map(|k| k.trim().to_lowercase())
        .collect()
}
