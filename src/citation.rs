//! Citation marker grouping
//!
//! Prose cites sources with bracketed 1-based numbers, often several in a row:
//! `grew [1][2] last year`. A run of adjacent markers is collapsed into one markdown
//! link whose label encodes every index and whose target is the first cited source:
//!
//! ```text
//! grew [CITATION_GROUP_1_2](https://first.example) last year
//! ```
//!
//! The renderer turns that link into a badge with an expandable source list, using
//! [`parse_placeholder`] / [`CitationGroup::sources`] to get back to the sources.
//!
//! Indices outside `1..=sources.len()` are dropped from their group. A run with no valid
//! index is left exactly as written. Index order inside a run is preserved.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Target used when the representative source has no URL.
pub const DEFAULT_FALLBACK_URL: &str = "#";

/// Link label prefix of a grouped citation.
pub const PLACEHOLDER_PREFIX: &str = "CITATION_GROUP_";

static MARKER_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:\[[0-9]+\])+").unwrap());

static MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([0-9]+)\]").unwrap());

static PLACEHOLDER_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(CITATION_GROUP_[0-9]+(?:_[0-9]+)*)\]\(([^)\s]*)\)").unwrap());

/// An externally supplied reference. Position in the list is its citation number.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub media: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Source {
    pub fn titled(title: &str, url: Option<&str>) -> Self {
        Source {
            title: title.to_string(),
            url: url.map(str::to_string),
            ..Default::default()
        }
    }

    /// Text for a link to this source: the title, or the URL when untitled.
    pub fn label(&self) -> &str {
        if self.title.is_empty() {
            self.url.as_deref().unwrap_or_default()
        } else {
            &self.title
        }
    }
}

/// One collapsed run of citation markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationGroup {
    /// 1-based source numbers in the order they were written.
    pub indices: Vec<usize>,
    pub representative_url: String,
}

impl CitationGroup {
    /// Build a group from raw indices, keeping only those that resolve in `sources`.
    ///
    /// Returns `None` when no index is in range.
    pub fn resolve(indices: &[usize], sources: &[Source], fallback_url: &str) -> Option<Self> {
        let valid: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i >= 1 && i <= sources.len())
            .collect();
        let first = *valid.first()?;
        let representative_url = sources[first - 1]
            .url
            .clone()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| fallback_url.to_string());
        Some(CitationGroup {
            indices: valid,
            representative_url,
        })
    }

    /// The link label encoding this group, e.g. `CITATION_GROUP_1_2`.
    pub fn label(&self) -> String {
        let joined: Vec<String> = self.indices.iter().map(|i| i.to_string()).collect();
        format!("{PLACEHOLDER_PREFIX}{}", joined.join("_"))
    }

    /// The markdown link that replaces the original marker run.
    pub fn to_placeholder(&self) -> String {
        format!("[{}]({})", self.label(), self.representative_url)
    }

    /// Sources cited by this group, in citation order.
    pub fn sources<'a>(&self, sources: &'a [Source]) -> Vec<&'a Source> {
        self.indices
            .iter()
            .filter_map(|&i| i.checked_sub(1).and_then(|i| sources.get(i)))
            .collect()
    }
}

/// Rewrite every run of adjacent citation markers into a grouped placeholder link.
pub fn group_citations(text: &str, sources: &[Source]) -> String {
    group_citations_with_fallback(text, sources, DEFAULT_FALLBACK_URL)
}

pub fn group_citations_with_fallback(text: &str, sources: &[Source], fallback_url: &str) -> String {
    rewrite_citations(text, sources, fallback_url).0
}

/// Rewrite citation runs and return the groups the rewrite produced, in text order.
///
/// Placeholder-looking text already present in `text` is not reported as a group.
pub fn rewrite_citations(
    text: &str,
    sources: &[Source],
    fallback_url: &str,
) -> (String, Vec<CitationGroup>) {
    if sources.is_empty() {
        return (text.to_string(), Vec::new());
    }
    let mut groups = Vec::new();
    let rewritten = MARKER_RUN
        .replace_all(text, |caps: &Captures| {
            let run = &caps[0];
            match CitationGroup::resolve(&marker_indices(run), sources, fallback_url) {
                Some(group) => {
                    let placeholder = group.to_placeholder();
                    groups.push(group);
                    placeholder
                }
                None => run.to_string(),
            }
        })
        .into_owned();
    (rewritten, groups)
}

/// Every bracketed number in `text`, in order.
///
/// Numbers too large to represent are mapped to `usize::MAX`, which no source list can
/// reach, so they are treated as out of range rather than silently dropped from the run.
pub fn marker_indices(text: &str) -> Vec<usize> {
    MARKER
        .captures_iter(text)
        .map(|caps| caps[1].parse::<usize>().unwrap_or(usize::MAX))
        .collect()
}

/// Decode a placeholder link label (`CITATION_GROUP_1_2`) into its indices.
pub fn parse_placeholder(label: &str) -> Option<Vec<usize>> {
    let rest = label.strip_prefix(PLACEHOLDER_PREFIX)?;
    rest.split('_')
        .map(|part| part.parse::<usize>().ok())
        .collect::<Option<Vec<_>>>()
        .filter(|indices| !indices.is_empty())
}

/// Sources behind a placeholder link label, for the expandable source list.
///
/// Unknown labels resolve to nothing.
pub fn cited_sources<'a>(label: &str, sources: &'a [Source]) -> Vec<&'a Source> {
    parse_placeholder(label)
        .map(|indices| {
            indices
                .into_iter()
                .filter_map(|i| i.checked_sub(1).and_then(|i| sources.get(i)))
                .collect()
        })
        .unwrap_or_default()
}

/// All citation groups already written into `text`, in order of appearance.
pub fn find_groups(text: &str) -> Vec<CitationGroup> {
    PLACEHOLDER_LINK
        .captures_iter(text)
        .filter_map(|caps| {
            let indices = parse_placeholder(&caps[1])?;
            Some(CitationGroup {
                indices,
                representative_url: caps[2].to_string(),
            })
        })
        .collect()
}
