use super::document::{element_text, Page, TextOptions};
use crate::error::{ConfigError, Result};
use scraper::ElementRef;
use serde::Deserialize;

/// Where a marker-span boundary sits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerSpec {
    /// Right after the already-extracted title text.
    AfterTitle,
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TitleSpec {
    Heading { tag: String },
    Fixed { text: String },
}

/// How the devotional region is located on a page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegionStrategy {
    /// Paragraph siblings following the first `heading`, up to a stop tag.
    SiblingWalk {
        heading: String,
        #[serde(default = "default_item")]
        item: String,
        #[serde(default = "default_stop")]
        stop: Vec<String>,
    },
    /// Text between two markers of the flattened page.
    MarkerSpan { start: MarkerSpec, end: MarkerSpec },
}

impl TitleSpec {
    pub fn resolve(&self, page: &Page) -> Option<String> {
        match self {
            TitleSpec::Heading { tag } => page
                .first_by_tag(tag)
                .map(element_text)
                .filter(|title| !title.is_empty()),
            TitleSpec::Fixed { text } => Some(text.clone()),
        }
    }
}

impl RegionStrategy {
    /// Returns `None` when the heuristic finds nothing usable.
    pub fn select(&self, page: &Page, title: &str) -> Option<String> {
        match self {
            RegionStrategy::SiblingWalk {
                heading,
                item,
                stop,
            } => {
                let heading = page.first_by_tag(heading)?;
                sibling_walk(heading, item, stop)
            }
            RegionStrategy::MarkerSpan { start, end } => {
                marker_span(&page.text(TextOptions::LINES), start, end, title)
            }
        }
    }

    pub(crate) fn validate(&self, source: &str) -> Result<()> {
        let invalid = |what: &str| -> Result<()> {
            Err(ConfigError::InvalidValue(format!("{} of source {} cannot be empty", what, source)).into())
        };

        match self {
            RegionStrategy::SiblingWalk { heading, item, .. } => {
                if heading.is_empty() {
                    return invalid("region.heading");
                }
                if item.is_empty() {
                    return invalid("region.item");
                }
            }
            RegionStrategy::MarkerSpan { start, end } => {
                if matches!(start, MarkerSpec::Text(t) if t.is_empty()) {
                    return invalid("region.start");
                }
                if matches!(end, MarkerSpec::Text(t) if t.is_empty()) {
                    return invalid("region.end");
                }
            }
        }
        Ok(())
    }
}

/// Byte range of the first occurrence of `marker` in `text`.
///
/// The title is matched ignoring whitespace: page text keeps the heading's
/// raw line breaks and tag boundaries, the title has them collapsed.
fn locate(text: &str, marker: &MarkerSpec, title: &str) -> Option<(usize, usize)> {
    match marker {
        MarkerSpec::AfterTitle => find_ignoring_whitespace(text, title),
        MarkerSpec::Text(needle) if needle.is_empty() => None,
        MarkerSpec::Text(needle) => text.find(needle.as_str()).map(|at| (at, at + needle.len())),
    }
}

fn find_ignoring_whitespace(text: &str, needle: &str) -> Option<(usize, usize)> {
    let wanted: Vec<char> = needle.chars().filter(|c| !c.is_whitespace()).collect();
    let (&first, rest) = wanted.split_first()?;

    text.char_indices()
        .filter(|&(_, c)| c == first)
        .find_map(|(start, _)| {
            let base = start + first.len_utf8();
            let mut end = base;
            let mut remaining = rest.iter();
            let mut want = remaining.next();

            for (offset, c) in text[base..].char_indices() {
                let Some(&expected) = want else { break };
                if c.is_whitespace() {
                    continue;
                }
                if c != expected {
                    return None;
                }
                end = base + offset + c.len_utf8();
                want = remaining.next();
            }

            want.is_none().then_some((start, end))
        })
}

/// Collects `item` siblings after `heading` until a `stop` sibling, joined by a blank line.
pub fn sibling_walk(heading: ElementRef<'_>, item: &str, stop: &[String]) -> Option<String> {
    let mut paragraphs = Vec::new();

    for sibling in heading.next_siblings().filter_map(ElementRef::wrap) {
        let name = sibling.value().name();
        if name == item {
            let text = element_text(sibling);
            if !text.is_empty() {
                paragraphs.push(text);
            }
        } else if stop.iter().any(|tag| tag == name) {
            break;
        }
    }

    if paragraphs.is_empty() {
        None
    } else {
        Some(paragraphs.join("\n\n"))
    }
}

/// Trimmed text between the first `start` and the first `end`, scanning left to right.
pub fn marker_span(text: &str, start: &MarkerSpec, end: &MarkerSpec, title: &str) -> Option<String> {
    let (_, from) = locate(text, start, title)?;
    let (to, _) = locate(text, end, title)?;
    if to < from {
        return None;
    }

    let span = text[from..to].trim();
    if span.is_empty() {
        None
    } else {
        Some(span.to_string())
    }
}

fn default_item() -> String {
    "p".to_string()
}

fn default_stop() -> Vec<String> {
    ["h1", "h2", "h3", "h4", "h5", "h6", "hr"]
        .iter()
        .map(|tag| tag.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk() -> RegionStrategy {
        RegionStrategy::SiblingWalk {
            heading: "h3".to_string(),
            item: default_item(),
            stop: default_stop(),
        }
    }

    #[test]
    fn sibling_walk_returns_paragraphs_between_headings() {
        let page = Page::parse(
            r#"<div>
                <h3>Title</h3>
                <p>One  two</p>
                <div class="ad">skip me</div>
                <p>Three <em>four</em></p>
                <h4>Next</h4>
                <p>after</p>
            </div>"#,
        );
        assert_eq!(
            walk().select(&page, "Title").as_deref(),
            Some("One two\n\nThree four")
        );
    }

    #[test]
    fn sibling_walk_stops_at_rule() {
        let page = Page::parse("<h3>T</h3><p>a</p><hr><p>b</p>");
        assert_eq!(walk().select(&page, "T").as_deref(), Some("a"));
    }

    #[test]
    fn sibling_walk_without_heading_or_paragraphs_is_empty() {
        assert!(walk().select(&Page::parse("<p>orphan</p>"), "").is_none());
        assert!(walk()
            .select(&Page::parse("<h3>T</h3><h3>U</h3><p>x</p>"), "T")
            .is_none());
        assert!(walk().select(&Page::parse("<h3>T</h3><p>  </p>"), "T").is_none());
    }

    fn between(text: &str, start: &str, end: &str) -> Option<String> {
        marker_span(
            text,
            &MarkerSpec::Text(start.to_string()),
            &MarkerSpec::Text(end.to_string()),
            "",
        )
    }

    #[test]
    fn marker_span_returns_trimmed_text_between_first_markers() {
        let text = "nav\n말씀 :\n창세기 1:1\n태초에\n한마디\n기도\n한마디";
        assert_eq!(
            between(text, "말씀 :", "한마디").as_deref(),
            Some("창세기 1:1\n태초에")
        );
    }

    #[test]
    fn marker_span_requires_both_markers_in_order() {
        assert!(between("start body", "start", "end").is_none());
        assert!(between("body end", "start", "end").is_none());
        assert!(between("end body start", "start", "end").is_none());
        assert!(between("start   end", "start", "end").is_none());
        assert!(between("start body end", "", "end").is_none());
    }

    #[test]
    fn marker_span_uses_first_end_marker_even_if_before_start() {
        // The first "end" precedes "start", so there is no valid span.
        assert!(between("end start body end", "start", "end").is_none());
    }

    #[test]
    fn after_title_marker_starts_behind_the_title() {
        let page = Page::parse(
            "<h3>Light Of Life</h3><p>Passage: John 1</p><p>In the beginning</p><p>Prayer: Lord</p>",
        );
        let strategy = RegionStrategy::MarkerSpan {
            start: MarkerSpec::AfterTitle,
            end: MarkerSpec::Text("Prayer:".to_string()),
        };
        let title = TitleSpec::Heading {
            tag: "h3".to_string(),
        }
        .resolve(&page)
        .unwrap();

        assert_eq!(title, "Light Of Life");
        assert_eq!(
            strategy.select(&page, &title).as_deref(),
            Some("Passage: John 1\nIn the beginning")
        );
    }

    fn after_title_span(html: &str) -> (String, Option<String>) {
        let page = Page::parse(html);
        let title = TitleSpec::Heading {
            tag: "h3".to_string(),
        }
        .resolve(&page)
        .unwrap();
        let span = RegionStrategy::MarkerSpan {
            start: MarkerSpec::AfterTitle,
            end: MarkerSpec::Text("Prayer:".to_string()),
        }
        .select(&page, &title);
        (title, span)
    }

    #[test]
    fn after_title_marker_survives_wrapped_heading() {
        let (title, span) = after_title_span(
            "<h3>The Light Shines\n      In The Darkness</h3><p>Body text</p><p>Prayer: Amen</p>",
        );
        assert_eq!(title, "The Light Shines In The Darkness");
        assert_eq!(span.as_deref(), Some("Body text"));
    }

    #[test]
    fn after_title_marker_survives_non_breaking_space() {
        let (title, span) = after_title_span(
            "<h3>The Light&nbsp;Shines</h3><p>Body text</p><p>Prayer: Amen</p>",
        );
        assert_eq!(title, "The Light Shines");
        assert_eq!(span.as_deref(), Some("Body text"));
    }

    #[test]
    fn after_title_marker_survives_inline_tags() {
        let (title, span) = after_title_span(
            "<h3>The Light <em>Shines</em></h3><p>Body text</p><p>Prayer: Amen</p>",
        );
        assert_eq!(title, "The Light Shines");
        assert_eq!(span.as_deref(), Some("Body text"));
    }

    #[test]
    fn whitespace_insensitive_find_reports_byte_range() {
        let text = "nav\n말씀\u{a0}:\n본문";
        let (start, end) = find_ignoring_whitespace(text, "말씀 :").unwrap();
        assert_eq!(&text[start..end], "말씀\u{a0}:");
        assert!(find_ignoring_whitespace(text, "기도").is_none());
        assert!(find_ignoring_whitespace(text, "  ").is_none());
    }

    #[test]
    fn title_spec_resolves_heading_or_fixed_text() {
        let page = Page::parse("<h3> </h3>");
        let heading = TitleSpec::Heading {
            tag: "h3".to_string(),
        };
        assert!(heading.resolve(&page).is_none());

        let fixed = TitleSpec::Fixed {
            text: "일용할 양식".to_string(),
        };
        assert_eq!(fixed.resolve(&page).as_deref(), Some("일용할 양식"));
    }

    #[test]
    fn empty_markers_fail_validation() {
        let strategy = RegionStrategy::MarkerSpan {
            start: MarkerSpec::Text(String::new()),
            end: MarkerSpec::Text("x".to_string()),
        };
        assert!(strategy.validate("Test").is_err());
        assert!(walk().validate("Test").is_ok());
    }
}
