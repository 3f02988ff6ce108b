// src/aggregate.rs
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;
use std::{collections::HashMap, fs, path::Path};
use tracing::debug;

use crate::models::{CategoryCount, Frequency, PatentRecord};

pub const UNKNOWN_LABEL: &str = "Unknown";
pub const OTHER_COUNTRY: &str = "OTH";

pub const TOP_TECHNOLOGIES: usize = 10;
pub const TOP_SUB_TECHNOLOGIES: usize = 12;
pub const TOP_COUNTRIES: usize = 15;

/* -------------------------------------------------------------------------- */
/* Bundle                                                                     */
/* -------------------------------------------------------------------------- */

/// Every chart series derived from one record snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Analytics {
    pub records: usize,
    pub domains: Vec<CategoryCount>,
    pub technologies: Vec<CategoryCount>,
    pub sub_technologies: Vec<Frequency>,
    pub keywords: Vec<CategoryCount>,
    pub countries: Vec<CategoryCount>,
}

impl Analytics {
    pub fn from_records(records: &[PatentRecord]) -> Self {
        Self {
            records: records.len(),
            domains: domain_counts(records),
            technologies: technology_counts(records),
            sub_technologies: sub_technology_counts(records),
            keywords: keyword_counts(records),
            countries: country_counts(records),
        }
    }

    /// Nothing to chart.
    pub fn is_empty(&self) -> bool {
        self.records == 0
    }
}

/* -------------------------------------------------------------------------- */
/* Counting                                                                   */
/* -------------------------------------------------------------------------- */

/// Insertion-ordered tally; ties keep first-seen order once sorted.
#[derive(Default)]
struct Tally {
    order: Vec<(String, u32)>,
    index: HashMap<String, usize>,
}

impl Tally {
    fn bump(&mut self, label: String) {
        match self.index.get(&label) {
            Some(&i) => self.order[i].1 += 1,
            None => {
                self.index.insert(label.clone(), self.order.len());
                self.order.push((label, 1));
            }
        }
    }

    fn sorted(mut self) -> Vec<(String, u32)> {
        // sort_by is stable
        self.order.sort_by(|a, b| b.1.cmp(&a.1));
        self.order
    }
}

/// Divisor for shares; never zero.
fn share_total(records: &[PatentRecord]) -> f64 {
    records.len().max(1) as f64
}

/// Strip `*` markers and surrounding whitespace; empty becomes `Unknown`.
pub fn clean_category(raw: Option<&str>) -> String {
    let cleaned: String = raw.unwrap_or("").chars().filter(|&c| c != '*').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        UNKNOWN_LABEL.to_string()
    } else {
        cleaned.to_string()
    }
}

fn category_tally<'a, F>(records: &'a [PatentRecord], field: F) -> Vec<(String, u32)>
where
    F: Fn(&'a PatentRecord) -> Option<&'a str>,
{
    let mut tally = Tally::default();
    for r in records {
        tally.bump(clean_category(field(r)));
    }
    tally.sorted()
}

/* -------------------------------------------------------------------------- */
/* 1) Domain / technology                                                     */
/* -------------------------------------------------------------------------- */

/// Industry domains, all of them, with rounded percentage of the record count.
pub fn domain_counts(records: &[PatentRecord]) -> Vec<CategoryCount> {
    if records.is_empty() {
        return Vec::new();
    }
    let total = share_total(records);
    category_tally(records, |r| r.domain.as_deref())
        .into_iter()
        .map(|(name, value)| CategoryCount {
            name,
            value,
            percentage: Some((value as f64 / total * 100.0).round() as u32),
        })
        .collect()
}

pub fn technology_counts(records: &[PatentRecord]) -> Vec<CategoryCount> {
    if records.is_empty() {
        return Vec::new();
    }
    category_tally(records, |r| r.technology.as_deref())
        .into_iter()
        .take(TOP_TECHNOLOGIES)
        .map(|(name, value)| CategoryCount { name, value, percentage: None })
        .collect()
}

/* -------------------------------------------------------------------------- */
/* 2) Sub-technology                                                          */
/* -------------------------------------------------------------------------- */

pub fn split_sub_technologies(s: &str) -> impl Iterator<Item = &str> {
    s.split([',', ';']).map(str::trim).filter(|p| !p.is_empty())
}

/// Sub-technology mentions as a fraction of records. One record may vote for
/// several labels.
pub fn sub_technology_counts(records: &[PatentRecord]) -> Vec<Frequency> {
    if records.is_empty() {
        return Vec::new();
    }
    let total = share_total(records);
    let mut tally = Tally::default();
    for r in records {
        for piece in split_sub_technologies(r.sub_technology_or_empty()) {
            tally.bump(piece.to_string());
        }
    }
    tally
        .sorted()
        .into_iter()
        .take(TOP_SUB_TECHNOLOGIES)
        .map(|(name, count)| Frequency {
            name,
            count,
            value: count as f64 / total,
        })
        .collect()
}

/* -------------------------------------------------------------------------- */
/* 3) Keywords                                                                */
/* -------------------------------------------------------------------------- */

/// Occurrences of each keyword across all records. Not charted yet.
pub fn keyword_counts(records: &[PatentRecord]) -> Vec<CategoryCount> {
    let mut tally = Tally::default();
    for kw in records.iter().flat_map(|r| r.keywords.iter()) {
        let kw = kw.trim();
        if !kw.is_empty() {
            tally.bump(kw.to_string());
        }
    }
    tally
        .sorted()
        .into_iter()
        .map(|(name, value)| CategoryCount { name, value, percentage: None })
        .collect()
}

/* -------------------------------------------------------------------------- */
/* 4) Country                                                                 */
/* -------------------------------------------------------------------------- */

/// Jurisdiction prefix of a patent number (`US1023456` → `US`); `OTH` when
/// the number does not open with two ASCII letters.
pub fn country_code(number: Option<&str>) -> String {
    let mut chars = number.unwrap_or("").chars();
    match (chars.next(), chars.next()) {
        (Some(a), Some(b)) if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() => {
            format!("{}{}", a.to_ascii_uppercase(), b.to_ascii_uppercase())
        }
        _ => OTHER_COUNTRY.to_string(),
    }
}

pub fn country_counts(records: &[PatentRecord]) -> Vec<CategoryCount> {
    if records.is_empty() {
        return Vec::new();
    }
    let mut tally = Tally::default();
    for r in records {
        tally.bump(country_code(r.number.as_deref()));
    }
    tally
        .sorted()
        .into_iter()
        .take(TOP_COUNTRIES)
        .map(|(name, value)| CategoryCount { name, value, percentage: None })
        .collect()
}

/* -------------------------------------------------------------------------- */
/* Chart files                                                                */
/* -------------------------------------------------------------------------- */

/// Write one chart-ready JSON per series plus `analytics.index.json`.
pub fn write_analytics(out_dir: &Path, query: &str, snapshot_id: &str, a: &Analytics) -> Result<()> {
    fs::create_dir_all(out_dir).with_context(|| format!("create {:?}", out_dir))?;

    write_json(out_dir.join("analytics.domains.json"), &a.domains)?;
    write_json(out_dir.join("analytics.technologies.json"), &a.technologies)?;
    write_json(out_dir.join("analytics.subtechnologies.json"), &a.sub_technologies)?;
    write_json(out_dir.join("analytics.keywords.json"), &a.keywords)?;
    write_json(out_dir.join("analytics.countries.json"), &a.countries)?;

    let idx = json!({
        "query": query,
        "snapshot": snapshot_id,
        "version": 1,
        "counts": {
            "records": a.records,
            "domains": a.domains.len(),
            "countries": a.countries.len(),
        },
        "empty": a.is_empty(),
        "files": [
            "analytics.domains.json",
            "analytics.technologies.json",
            "analytics.subtechnologies.json",
            "analytics.keywords.json",
            "analytics.countries.json"
        ]
    });
    write_json(out_dir.join("analytics.index.json"), &idx)?;
    debug!("Wrote analytics bundle - dir={}, records={}", out_dir.display(), a.records);

    Ok(())
}

fn write_json<P: AsRef<Path>, T: ?Sized + Serialize>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, serde_json::to_vec_pretty(value)?).with_context(|| format!("write {:?}", path))
}
