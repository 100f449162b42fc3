//! Segmentation: scan normalized text for numbered provision headings and
//! cut the document into fragments at each heading.
//!
//! Two heading dialects exist. Philippine labor-code articles are announced
//! inline as `ART. 130` with an optional bracketed renumbering (`ART. 130
//! [135]`). Hong Kong ordinance sections start a line with a decimal number
//! plus optional letter suffix and carry their title on that line
//! (`32. Deductions from wages`). Text ahead of the first heading becomes a
//! preamble fragment when it is more than trivially short.

use std::sync::LazyLock;

use regex::Regex;

use crate::provision::{Jurisdiction, PREAMBLE_IDENTIFIER};

static ARTICLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)ART\.?\s*(\d+)(?:\s*\[(\d+)\])?").unwrap());

// Whitespace after the dot must not cross a newline; the title belongs to
// the heading line itself.
static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(\d+[A-Z]*)\. +(.*)").unwrap());

/// Preamble shorter than this after trimming is treated as page noise.
const PREAMBLE_MIN_CHARS: usize = 5;

const PREAMBLE_TITLE: &str = "Introductory Provisions";

/// One cut of the document, not yet validated.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub identifier: String,
    pub superseded: Option<i64>,
    /// Title text from the heading line, for dialects that carry one there.
    pub title_hint: Option<String>,
    pub body: String,
    pub preamble: bool,
}

/// A heading match: where it starts, where its body slice starts, and what
/// it captured.
struct Numbering {
    start: usize,
    body_from: usize,
    identifier: String,
    superseded: Option<i64>,
    title: Option<String>,
}

/// Cut `text` into fragments using the heading dialect of `jurisdiction`.
pub fn segment(jurisdiction: Jurisdiction, text: &str) -> Vec<Fragment> {
    let marks = match jurisdiction {
        Jurisdiction::Philippine => article_marks(text),
        Jurisdiction::HongKong => section_marks(text),
    };
    assemble(text, marks)
}

fn article_marks(text: &str) -> Vec<Numbering> {
    ARTICLE_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            // A bracketed number marks the provision that this one replaced.
            let superseded = caps.get(2).and_then(|m| m.as_str().parse().ok());
            Some(Numbering {
                start: whole.start(),
                body_from: whole.end(),
                identifier: caps[1].to_string(),
                superseded,
                title: None,
            })
        })
        .collect()
}

fn section_marks(text: &str) -> Vec<Numbering> {
    SECTION_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let title = caps.get(2)?;
            Some(Numbering {
                start: whole.start(),
                // Body keeps the title line so markers printed on it, like
                // "(Repealed)", stay visible downstream.
                body_from: title.start(),
                identifier: caps[1].to_string(),
                superseded: None,
                title: Some(title.as_str().trim().to_string()),
            })
        })
        .collect()
}

/// Walk the marks in order; each fragment's body runs to the next mark.
fn assemble(text: &str, marks: Vec<Numbering>) -> Vec<Fragment> {
    let mut fragments = Vec::with_capacity(marks.len() + 1);
    if let Some(first) = marks.first() {
        push_preamble(text, first.start, &mut fragments);
    }
    for (i, mark) in marks.iter().enumerate() {
        let end = marks.get(i + 1).map_or(text.len(), |next| next.start);
        let body = text[mark.body_from..end].trim();
        fragments.push(Fragment {
            identifier: mark.identifier.clone(),
            superseded: mark.superseded,
            title_hint: mark.title.clone(),
            body: body.to_string(),
            preamble: false,
        });
    }
    fragments
}

fn push_preamble(text: &str, first_start: usize, fragments: &mut Vec<Fragment>) {
    let preamble = text[..first_start].trim();
    if preamble.chars().count() > PREAMBLE_MIN_CHARS {
        fragments.push(Fragment {
            identifier: PREAMBLE_IDENTIFIER.to_string(),
            superseded: None,
            title_hint: Some(PREAMBLE_TITLE.to_string()),
            body: preamble.to_string(),
            preamble: true,
        });
    }
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn articles_split_at_each_heading() {
        let text = "ART. 1 Title line\nBody text. ART. 2 [99] Another\nMore body.";
        let fragments = segment(Jurisdiction::Philippine, text);
        assert_eq!(fragments.len(), 2);

        assert_eq!(fragments[0].identifier, "1");
        assert_eq!(fragments[0].superseded, None);
        assert_eq!(fragments[0].body, "Title line\nBody text.");

        assert_eq!(fragments[1].identifier, "2");
        assert_eq!(fragments[1].superseded, Some(99));
        assert_eq!(fragments[1].body, "Another\nMore body.");
    }

    #[test]
    fn article_heading_variants_match() {
        let text = "ART 5 First body here. art. 6 Second body here. ART.7 Third body here.";
        let fragments = segment(Jurisdiction::Philippine, text);
        let ids: Vec<&str> = fragments.iter().map(|f| f.identifier.as_str()).collect();
        assert_eq!(ids, vec!["5", "6", "7"]);
    }

    #[test]
    fn preamble_before_first_article_is_kept() {
        let text = "PRELIMINARY TITLE\nChapter I GENERAL PROVISIONS\nART. 1 Name of Decree. This Decree shall be known as the Labor Code.";
        let fragments = segment(Jurisdiction::Philippine, text);
        assert_eq!(fragments.len(), 2);
        assert!(fragments[0].preamble);
        assert_eq!(fragments[0].identifier, PREAMBLE_IDENTIFIER);
        assert_eq!(fragments[0].title_hint.as_deref(), Some("Introductory Provisions"));
        assert_eq!(fragments[0].body, "PRELIMINARY TITLE\nChapter I GENERAL PROVISIONS");
        assert!(!fragments[1].preamble);
    }

    #[test]
    fn short_preamble_is_noise() {
        let text = "p. 1 ART. 1 Body of the first article.";
        let fragments = segment(Jurisdiction::Philippine, text);
        assert_eq!(fragments.len(), 1);
        assert!(!fragments[0].preamble);
    }

    #[test]
    fn sections_carry_title_on_heading_line() {
        let text = "1. Short title\nThis Ordinance may be cited as the Employment Ordinance.\n2A. Continuous employment\nSchedule 1 applies for determining continuity.";
        let fragments = segment(Jurisdiction::HongKong, text);
        assert_eq!(fragments.len(), 2);

        assert_eq!(fragments[0].identifier, "1");
        assert_eq!(fragments[0].title_hint.as_deref(), Some("Short title"));
        assert_eq!(
            fragments[0].body,
            "Short title\nThis Ordinance may be cited as the Employment Ordinance."
        );

        assert_eq!(fragments[1].identifier, "2A");
        assert_eq!(fragments[1].title_hint.as_deref(), Some("Continuous employment"));
    }

    #[test]
    fn section_numbers_only_match_at_line_start() {
        let text = "1. Short title\nAmounts of 12. 5 dollars are unaffected because midline numbers\ndo not open sections.";
        let fragments = segment(Jurisdiction::HongKong, text);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].identifier, "1");
    }

    #[test]
    fn blank_title_heading_does_not_swallow_next_heading() {
        let text = "2. \n3. Wages defined\nWages means all remuneration.";
        let fragments = segment(Jurisdiction::HongKong, text);
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].identifier, "2");
        assert_eq!(fragments[0].body, "");
        assert_eq!(fragments[1].identifier, "3");
        assert_eq!(fragments[1].title_hint.as_deref(), Some("Wages defined"));
    }

    #[test]
    fn trailing_empty_section_yields_empty_body() {
        let text = "1. Short title\nCited as above.\n9. ";
        let fragments = segment(Jurisdiction::HongKong, text);
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[1].identifier, "9");
        assert_eq!(fragments[1].body, "");
    }

    #[test]
    fn no_headings_yields_nothing() {
        let fragments = segment(Jurisdiction::Philippine, "No numbered provisions anywhere in this text.");
        assert!(fragments.is_empty());
    }
}
