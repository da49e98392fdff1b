use super::document::{element_text, Page};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;

static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Removes site boilerplate from an extracted span.
pub struct Normalizer<'a> {
    boilerplate: &'a [String],
    label_prefixes: &'a [String],
}

impl<'a> Normalizer<'a> {
    pub fn new(boilerplate: &'a [String], label_prefixes: &'a [String]) -> Self {
        Self {
            boilerplate,
            label_prefixes,
        }
    }

    /// Idempotent: the cleanup pass is repeated until the text stops changing.
    pub fn normalize(&self, raw: &str) -> String {
        let mut current = self.pass(raw);
        loop {
            let next = self.pass(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn pass(&self, text: &str) -> String {
        let mut text = text.to_string();

        for phrase in self.boilerplate.iter().filter(|p| !p.is_empty()) {
            while let Some(at) = text.find(phrase.as_str()) {
                text.replace_range(at..at + phrase.len(), "");
            }
        }

        if !self.label_prefixes.is_empty() {
            text = text
                .lines()
                .filter(|line| !self.is_label_line(line))
                .collect::<Vec<_>>()
                .join("\n");
        }

        BLANK_RUNS.replace_all(&text, "\n\n").trim().to_string()
    }

    fn is_label_line(&self, line: &str) -> bool {
        let line = line.trim_start();
        self.label_prefixes
            .iter()
            .any(|prefix| !prefix.is_empty() && line.starts_with(prefix.as_str()))
    }
}

/// Paragraphs of a passage container with annotation elements removed first.
///
/// Returns `None` when the container is missing or holds no text.
pub fn passage_paragraphs(
    html: &str,
    container_tag: &str,
    container_class: &str,
    annotations: &[Selector],
) -> Option<String> {
    let mut page = Page::parse(html);
    for selector in annotations {
        page.strip(selector);
    }

    let container = page
        .by_tag_and_class(container_tag, container_class)
        .into_iter()
        .next()?;

    let paragraphs: Vec<String> = container
        .descendants()
        .filter_map(scraper::ElementRef::wrap)
        .filter(|el| el.value().name() == "p")
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect();

    if paragraphs.is_empty() {
        None
    } else {
        Some(paragraphs.join("\n\n"))
    }
}
