//! Keyword emphasis
//!
//! Splits free text into plain and emphasized segments. Only terms from the
//! closed `KEYWORDS` list are emphasized, and only as whole, case-sensitive
//! words. When two terms start at the same position the longer one wins
//! (`React Native` over `React`).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::markup::{Element, Node};

/// Technology terms that get bolded in summary and bullet text
pub const KEYWORDS: &[&str] = &[
    "React",
    "Next.js",
    "TypeScript",
    "Redux",
    "HTML5",
    "CSS3",
    "Astro",
    "React Native",
    "Expo",
    "Expo Go",
    "Node.js",
    "Express.js",
    "Python",
    "FastAPI",
    "NestJS",
    "Docker",
    "AWS",
    "MongoDB",
    "PostgreSQL",
    "Git",
    "LangGraph",
    "LLMs",
    "UX",
];

static KEYWORD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let mut terms: Vec<&str> = KEYWORDS.to_vec();
    // Alternation is leftmost-first, so longer terms must come first
    terms.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    let alternation = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{})\b", alternation)).expect("keyword pattern is valid")
});

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Segment<'a> {
    Plain(&'a str),
    Emphasis(&'a str),
}

impl<'a> Segment<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Segment::Plain(s) | Segment::Emphasis(s) => s,
        }
    }
}

/// Tokenize `text` into plain and emphasized segments.
///
/// Concatenating the segments reproduces `text` exactly.
pub fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut last = 0;
    for m in KEYWORD_PATTERN.find_iter(text) {
        if m.start() > last {
            out.push(Segment::Plain(&text[last..m.start()]));
        }
        out.push(Segment::Emphasis(m.as_str()));
        last = m.end();
    }
    if last < text.len() {
        out.push(Segment::Plain(&text[last..]));
    }
    out
}

/// The emphasized terms of `text`, in order
pub fn emphasized_terms(text: &str) -> Vec<&str> {
    segments(text)
        .into_iter()
        .filter_map(|s| match s {
            Segment::Emphasis(term) => Some(term),
            Segment::Plain(_) => None,
        })
        .collect()
}

/// Text nodes with a `<strong>` wrapper per emphasized term
pub fn emphasize(text: &str) -> Vec<Node> {
    segments(text)
        .into_iter()
        .map(|segment| match segment {
            Segment::Plain(s) => Node::text(s),
            Segment::Emphasis(term) => Element::new("strong").text(term).into(),
        })
        .collect()
}
