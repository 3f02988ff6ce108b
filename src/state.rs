//! Session state for one search client, updated only through [`Action`]s.
//!
//! Every submission clears the previous results before the request goes out
//! and is tagged with a fresh token; a response carrying any other token is
//! dropped, so results from two different searches are never mixed.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use xxhash_rust::xxh3::xxh3_64;

use crate::models::{PatentRecord, SearchOutcome};
use crate::paginate::{PageChange, PageState};

pub type RequestToken = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Submit { query: String },
    Loaded { token: RequestToken, outcome: SearchOutcome },
    Failed { token: RequestToken },
    ChangePage(usize),
    ShowAnalytics(bool),
}

/// What a reducer step asks the view to do afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Issue the request for this token.
    Fetch { token: RequestToken, query: String },
    ScrollToTop,
    /// A response arrived for a search that is no longer current.
    Discarded { token: RequestToken },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Loading,
    NoResults,
    Found(u64),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchState {
    pub query: String,
    pub loading: bool,
    pub has_searched: bool,
    pub keywords: Vec<String>,
    pub total: u64,
    pub records: Vec<PatentRecord>,
    pub page: PageState,
    pub show_analytics: bool,
    next_token: RequestToken,
    in_flight: Option<RequestToken>,
}

impl SearchState {
    pub fn status(&self) -> Status {
        if self.loading {
            Status::Loading
        } else if !self.has_searched {
            Status::Idle
        } else if self.total == 0 {
            Status::NoResults
        } else {
            Status::Found(self.total)
        }
    }

    pub fn visible(&self) -> &[PatentRecord] {
        self.page.visible(&self.records)
    }

    pub fn in_flight(&self) -> Option<RequestToken> {
        self.in_flight
    }

    /// Stable fingerprint of the current record list.
    pub fn snapshot_id(&self) -> String {
        let ids: Vec<&str> = self.records.iter().map(|r| r.number_or_empty()).collect();
        format!("{:016x}", xxh3_64(format!("{}|{}", self.query, ids.join(",")).as_bytes()))
    }

    fn clear_results(&mut self) {
        self.records.clear();
        self.keywords.clear();
        self.total = 0;
        self.show_analytics = false;
        self.page = PageState::new(0);
    }

    pub fn apply(&mut self, action: Action) -> Effect {
        match action {
            Action::Submit { query } => {
                self.clear_results();
                self.next_token += 1;
                let token = self.next_token;
                self.query = query.clone();
                self.loading = true;
                self.has_searched = true;
                self.in_flight = Some(token);
                debug!("Search submitted - token={}, query={:?}", token, query);
                Effect::Fetch { token, query }
            }
            Action::Loaded { token, outcome } => {
                if self.in_flight != Some(token) {
                    warn!("Discarding stale response - token={}, current={:?}", token, self.in_flight);
                    return Effect::Discarded { token };
                }
                self.in_flight = None;
                self.loading = false;
                self.keywords = outcome.keywords;
                self.total = outcome.total;
                self.page = PageState::new(outcome.records.len());
                self.records = outcome.records;
                Effect::None
            }
            Action::Failed { token } => {
                if self.in_flight != Some(token) {
                    return Effect::Discarded { token };
                }
                self.in_flight = None;
                self.loading = false;
                self.clear_results();
                Effect::None
            }
            Action::ChangePage(page) => {
                let PageChange { scroll_to_top, .. } = self.page.go_to(page);
                if scroll_to_top {
                    Effect::ScrollToTop
                } else {
                    Effect::None
                }
            }
            Action::ShowAnalytics(show) => {
                self.show_analytics = show && !self.records.is_empty();
                Effect::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: usize) -> PatentRecord {
        PatentRecord {
            id: Some(format!("US{n}")),
            number: Some(format!("US{n}")),
            title: None,
            abstract_text: None,
            domain: None,
            technology: None,
            sub_technology: None,
            keywords: Vec::new(),
        }
    }

    fn outcome(n: usize) -> SearchOutcome {
        SearchOutcome {
            keywords: vec!["solar".into()],
            total: n as u64,
            records: (0..n).map(record).collect(),
        }
    }

    fn fetch_token(effect: Effect) -> RequestToken {
        match effect {
            Effect::Fetch { token, .. } => token,
            other => panic!("expected fetch, got {other:?}"),
        }
    }

    #[test]
    fn submit_clears_before_refetch() {
        let mut s = SearchState::default();
        let t1 = fetch_token(s.apply(Action::Submit { query: "a".into() }));
        s.apply(Action::Loaded { token: t1, outcome: outcome(14) });
        s.apply(Action::ChangePage(3));
        s.apply(Action::ShowAnalytics(true));
        assert_eq!(s.status(), Status::Found(14));

        s.apply(Action::Submit { query: "b".into() });
        assert!(s.records.is_empty());
        assert!(s.keywords.is_empty());
        assert_eq!(s.page.current_page, 1);
        assert!(!s.show_analytics);
        assert_eq!(s.status(), Status::Loading);
    }

    #[test]
    fn stale_responses_are_discarded() {
        let mut s = SearchState::default();
        let t1 = fetch_token(s.apply(Action::Submit { query: "a".into() }));
        let t2 = fetch_token(s.apply(Action::Submit { query: "b".into() }));
        assert!(t2 > t1);

        assert_eq!(s.apply(Action::Loaded { token: t1, outcome: outcome(3) }), Effect::Discarded { token: t1 });
        assert!(s.loading);
        assert!(s.records.is_empty());

        s.apply(Action::Loaded { token: t2, outcome: outcome(2) });
        assert_eq!(s.records.len(), 2);
        assert_eq!(s.apply(Action::Failed { token: t1 }), Effect::Discarded { token: t1 });
        assert_eq!(s.records.len(), 2);
    }

    #[test]
    fn failure_resets_to_empty() {
        let mut s = SearchState::default();
        let t = fetch_token(s.apply(Action::Submit { query: "a".into() }));
        s.apply(Action::Failed { token: t });
        assert!(!s.loading);
        assert!(s.records.is_empty());
        assert_eq!(s.status(), Status::NoResults);
    }

    #[test]
    fn analytics_stay_hidden_without_records() {
        let mut s = SearchState::default();
        let t = fetch_token(s.apply(Action::Submit { query: "x".into() }));
        s.apply(Action::Loaded { token: t, outcome: outcome(0) });
        s.apply(Action::ShowAnalytics(true));
        assert!(!s.show_analytics);
    }

    #[test]
    fn zero_total_keeps_keywords() {
        let mut s = SearchState::default();
        let t = fetch_token(s.apply(Action::Submit { query: "x".into() }));
        s.apply(Action::Loaded { token: t, outcome: outcome(0) });
        assert_eq!(s.status(), Status::NoResults);
        assert_eq!(s.keywords, vec!["solar"]);
        assert!(s.visible().is_empty());
    }

    #[test]
    fn page_survives_analytics_toggle() {
        let mut s = SearchState::default();
        let t = fetch_token(s.apply(Action::Submit { query: "a".into() }));
        s.apply(Action::Loaded { token: t, outcome: outcome(14) });
        assert_eq!(s.apply(Action::ChangePage(9)), Effect::ScrollToTop);
        assert_eq!(s.page.current_page, 3);
        assert_eq!(s.apply(Action::ChangePage(3)), Effect::None);
        s.apply(Action::ShowAnalytics(true));
        assert!(s.show_analytics);
        s.apply(Action::ShowAnalytics(false));
        assert_eq!(s.page.current_page, 3);
        assert_eq!(s.visible().len(), 2);
    }
}
