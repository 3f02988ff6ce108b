// src/render.rs
use crate::aggregate::Analytics;
use crate::highlight::{split_values, truncate_abstract, Highlighter, ABSTRACT_PREVIEW_CHARS};
use crate::models::PatentRecord;
use crate::paginate::PageItem;
use crate::state::{SearchState, Status};

pub fn render_status(s: &SearchState) -> String {
    let mut out = String::new();
    let status = s.status();
    if matches!(status, Status::Found(_) | Status::NoResults) && !s.keywords.is_empty() {
        out.push_str(&format!("Showing results for: {}\n", s.keywords.join(", ")));
    }
    match status {
        Status::Idle => {}
        Status::Loading => out.push_str("Understanding your query…\n"),
        Status::Found(total) => {
            out.push_str(&format!("Found {} matching patents\n", total));
        }
        Status::NoResults => {
            out.push_str(&format!("No patents found for: {}\n", s.keywords.join(", ")));
        }
    }
    out
}

pub fn render_card(p: &PatentRecord, h: &Highlighter, expanded: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("### Patent: {}\n\n", p.number_or_empty()));
    out.push_str(&format!("#### {}\n\n", h.markdown(p.title_or_empty())));

    out.push_str(&format!("- Domain: {}\n", h.markdown(p.domain_or_empty())));
    out.push_str(&format!("- Technology: {}\n", h.markdown(p.technology_or_empty())));

    let subs = split_values(p.sub_technology_or_empty());
    if !subs.is_empty() {
        let tags: Vec<String> = subs.iter().map(|t| format!("`{}`", h.markdown(t))).collect();
        out.push_str(&format!("- Sub-technology: {}\n", tags.join(" ")));
    }

    let abs = p.abstract_or_empty();
    if !abs.is_empty() {
        let text = if expanded {
            abs.to_string()
        } else {
            truncate_abstract(abs, ABSTRACT_PREVIEW_CHARS)
        };
        out.push_str(&format!("\n{}\n", h.markdown(&text)));
    }

    out.push_str(&format!("\n- Keywords: {}\n", render_keywords(&p.keywords, h)));
    out
}

/// The record's own keywords; those equal to a search keyword are bold.
fn render_keywords(keywords: &[String], h: &Highlighter) -> String {
    if keywords.is_empty() {
        return "No keywords".to_string();
    }
    keywords
        .iter()
        .map(|k| if h.is_keyword(k) { format!("**{k}**") } else { k.clone() })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_page_selector(items: &[PageItem], current: usize) -> String {
    items
        .iter()
        .map(|item| match item {
            PageItem::Page(p) if *p == current => format!("[{}]", p),
            PageItem::Page(p) => p.to_string(),
            PageItem::Ellipsis => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The status line, the cards of the current page and, when there is more
/// than one page, the selector.
pub fn render_page(s: &SearchState, expanded: bool) -> String {
    let mut md = String::new();
    md.push_str(&render_status(s));

    let h = Highlighter::new(&s.keywords);
    for p in s.visible() {
        md.push('\n');
        md.push_str(&render_card(p, &h, expanded));
    }

    if s.page.needs_selector() {
        let prev = if s.page.has_prev() { "< Previous" } else { "(Previous)" };
        let next = if s.page.has_next() { "Next >" } else { "(Next)" };
        md.push_str(&format!(
            "\n{}  {}  {}\n",
            prev,
            render_page_selector(&s.page.items(), s.page.current_page),
            next
        ));
    }
    md
}

pub fn render_analytics_summary(a: &Analytics) -> String {
    if a.is_empty() {
        return "No data\n".to_string();
    }
    let mut md = String::new();

    md.push_str("## Domain Distribution\n");
    for d in &a.domains {
        md.push_str(&format!("- {}: {} patents ({}%)\n", d.name, d.value, d.percentage.unwrap_or(0)));
    }

    md.push_str("\n## Top Technologies\n");
    for t in &a.technologies {
        md.push_str(&format!("- {}: {}\n", t.name, t.value));
    }

    if !a.sub_technologies.is_empty() {
        md.push_str("\n## Sub-Technology Focus\n");
        for f in &a.sub_technologies {
            md.push_str(&format!("- {}: {:.1}%\n", f.name, f.value * 100.0));
        }
    }

    md.push_str("\n## Patent Filing by Country\n");
    for c in &a.countries {
        md.push_str(&format!("- {}: {}\n", c.name, c.value));
    }
    md
}
