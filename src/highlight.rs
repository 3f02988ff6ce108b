use regex::{Regex, RegexBuilder};
use tracing::warn;

pub const ABSTRACT_PREVIEW_CHARS: usize = 250;

/// Compiled-size cap for the keyword matcher.
const MATCHER_SIZE_LIMIT: usize = 10 * (1 << 20);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Hit(&'a str),
}

impl<'a> Segment<'a> {
    pub fn text(&self) -> &'a str {
        match self {
            Segment::Plain(s) | Segment::Hit(s) => s,
        }
    }
}

/// Case-insensitive matcher for a set of search keywords.
pub struct Highlighter {
    re: Option<Regex>,
    keywords: Vec<String>,
}

impl Highlighter {
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Self {
        Self::with_size_limit(keywords, MATCHER_SIZE_LIMIT)
    }

    fn with_size_limit<S: AsRef<str>>(keywords: &[S], size_limit: usize) -> Self {
        let keywords: Vec<String> = keywords
            .iter()
            .map(|k| k.as_ref().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        let re = if keywords.is_empty() {
            None
        } else {
            let alternation = keywords
                .iter()
                .map(|k| regex::escape(k))
                .collect::<Vec<_>>()
                .join("|");
            match RegexBuilder::new(&format!("({alternation})"))
                .case_insensitive(true)
                .size_limit(size_limit)
                .build()
            {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!("Keyword matcher unavailable, rendering plain text - keywords={}, error={}", keywords.len(), e);
                    None
                }
            }
        };
        Self { re, keywords }
    }

    /// True when `piece` equals one of the keywords, ignoring case.
    pub fn is_keyword(&self, piece: &str) -> bool {
        let piece = piece.to_lowercase();
        self.keywords.iter().any(|k| k.to_lowercase() == piece)
    }

    /// Split `text` into plain and highlighted pieces. Concatenating the
    /// pieces yields `text` again.
    pub fn segments<'a>(&self, text: &'a str) -> Vec<Segment<'a>> {
        if text.is_empty() {
            return Vec::new();
        }
        let Some(re) = &self.re else {
            return vec![Segment::Plain(text)];
        };

        let mut out = Vec::new();
        let mut last = 0;
        for m in re.find_iter(text) {
            if m.start() > last {
                out.push(Segment::Plain(&text[last..m.start()]));
            }
            if self.is_keyword(m.as_str()) {
                out.push(Segment::Hit(m.as_str()));
            } else {
                out.push(Segment::Plain(m.as_str()));
            }
            last = m.end();
        }
        if last < text.len() {
            out.push(Segment::Plain(&text[last..]));
        }
        out
    }

    /// Markdown rendition with hits in bold.
    pub fn markdown(&self, text: &str) -> String {
        self.segments(text)
            .into_iter()
            .map(|s| match s {
                Segment::Hit(h) => format!("**{h}**"),
                Segment::Plain(p) => p.to_string(),
            })
            .collect()
    }
}

/// First `limit` characters followed by `...`, or the text unchanged.
pub fn truncate_abstract(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Split a multi-valued field on `,` or `;`, dropping blanks.
pub fn split_values(text: &str) -> Vec<&str> {
    crate::aggregate::split_sub_technologies(text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_keywords_case_insensitively() {
        let h = Highlighter::new(&["solar", "cell"]);
        let segs = h.segments("Solar panels and CELLS");
        assert_eq!(
            segs,
            vec![
                Segment::Hit("Solar"),
                Segment::Plain(" panels and "),
                Segment::Hit("CELL"),
                Segment::Plain("S"),
            ]
        );
        assert_eq!(h.markdown("solar cell"), "**solar** **cell**");
    }

    #[test]
    fn segments_concatenate_to_input() {
        let h = Highlighter::new(&["a.b", "(x)"]);
        let text = "see a.b and axb then (x) or x";
        let joined: String = h.segments(text).iter().map(|s| s.text()).collect();
        assert_eq!(joined, text);
        assert_eq!(h.segments(text).iter().filter(|s| matches!(s, Segment::Hit(_))).count(), 2);
    }

    #[test]
    fn no_keywords_means_plain_text() {
        let h = Highlighter::new::<&str>(&[]);
        assert_eq!(h.segments("abc"), vec![Segment::Plain("abc")]);
        assert!(h.segments("").is_empty());
    }

    #[test]
    fn matcher_over_size_limit_falls_back_to_plain() {
        let h = Highlighter::with_size_limit(&["solar", "cell"], 16);
        assert_eq!(h.segments("solar cell"), vec![Segment::Plain("solar cell")]);
        assert!(h.is_keyword("SOLAR"));
    }

    #[test]
    fn truncates_long_abstracts() {
        let long = "x".repeat(300);
        let t = truncate_abstract(&long, ABSTRACT_PREVIEW_CHARS);
        assert_eq!(t.len(), 253);
        assert!(t.ends_with("..."));
        assert_eq!(truncate_abstract("short", ABSTRACT_PREVIEW_CHARS), "short");
        assert_eq!(truncate_abstract("héllo", 2), "hé...");
    }

    #[test]
    fn splits_multi_values() {
        assert_eq!(split_values("MRI; CT, , PET"), vec!["MRI", "CT", "PET"]);
    }
}
