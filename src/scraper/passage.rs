use super::document::Page;
use super::normalize::passage_paragraphs;
use crate::client::Fetch;
use crate::error::{AppError, ConfigError, Result, ScraperError};
use scraper::Selector;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Where the scripture passage lives and how its translation is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PassageConfig {
    #[serde(default = "default_link_contains")]
    pub link_contains: String,
    #[serde(default = "default_version_param")]
    pub version_param: String,
    #[serde(default = "default_from_version")]
    pub from_version: String,
    #[serde(default = "default_to_version")]
    pub to_version: String,
    #[serde(default = "default_container_tag")]
    pub container_tag: String,
    #[serde(default = "default_container_class")]
    pub container_class: String,
    /// CSS selectors of verse numbers, cross references and footnotes.
    #[serde(default = "default_annotations")]
    pub annotations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    Merged { url: String },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoLink,
    InvalidLink(String),
    FetchFailed(String),
    NoPassage,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoLink => write!(f, "no passage link on the page"),
            SkipReason::InvalidLink(e) => write!(f, "passage link is not a valid URL: {}", e),
            SkipReason::FetchFailed(e) => write!(f, "passage fetch failed: {}", e),
            SkipReason::NoPassage => write!(f, "passage container not found"),
        }
    }
}

impl Default for PassageConfig {
    fn default() -> Self {
        Self {
            link_contains: default_link_contains(),
            version_param: default_version_param(),
            from_version: default_from_version(),
            to_version: default_to_version(),
            container_tag: default_container_tag(),
            container_class: default_container_class(),
            annotations: default_annotations(),
        }
    }
}

impl PassageConfig {
    pub fn annotation_selectors(&self) -> Result<Vec<Selector>> {
        self.annotations
            .iter()
            .map(|s| {
                Selector::parse(s).map_err(|e| {
                    AppError::from(ScraperError::SelectorError(format!("{}: {}", s, e)))
                })
            })
            .collect()
    }

    pub(crate) fn validate(&self, source: &str) -> Result<()> {
        if self.link_contains.is_empty() || self.version_param.is_empty() {
            return Err(ConfigError::InvalidValue(format!(
                "passage.link_contains and passage.version_param of source {} cannot be empty",
                source
            ))
            .into());
        }
        self.annotation_selectors().map(|_| ())
    }

    /// The passage link on `page`, resolved against `page_url` and switched to `to_version`.
    pub fn discover(&self, page: &Page, page_url: &str) -> std::result::Result<Url, SkipReason> {
        let href = page
            .matching_attr("a", "href", |href| href.contains(self.link_contains.as_str()))
            .into_iter()
            .find_map(|a| a.value().attr("href").map(str::to_string))
            .ok_or(SkipReason::NoLink)?;

        let link = Url::parse(page_url)
            .and_then(|base| base.join(&href))
            .map_err(|e| SkipReason::InvalidLink(e.to_string()))?;

        Ok(self.rewrite_version(&link))
    }

    pub fn rewrite_version(&self, link: &Url) -> Url {
        let mut found = false;
        let mut pairs = Vec::new();
        for (key, value) in link.query_pairs() {
            if key == self.version_param.as_str() {
                found = true;
                if value.eq_ignore_ascii_case(&self.from_version) {
                    pairs.push((key.into_owned(), self.to_version.clone()));
                    continue;
                }
            }
            pairs.push((key.into_owned(), value.into_owned()));
        }
        if !found {
            pairs.push((self.version_param.clone(), self.to_version.clone()));
        }

        let mut rewritten = link.clone();
        rewritten.query_pairs_mut().clear().extend_pairs(pairs);
        rewritten
    }
}

/// Fetches the passage linked from `page` and puts it ahead of `devotional`.
///
/// Any failure leaves `devotional` untouched.
pub async fn merge_passage<F: Fetch>(
    fetcher: &F,
    page: &Page,
    page_url: &str,
    headers: &BTreeMap<String, String>,
    config: &PassageConfig,
    devotional: String,
) -> (String, MergeOutcome) {
    let url = match config.discover(page, page_url) {
        Ok(url) => url,
        Err(reason) => return (devotional, MergeOutcome::Skipped(reason)),
    };

    let html = match fetcher.fetch(url.as_str(), headers).await {
        Ok(html) => html,
        Err(e) => {
            return (
                devotional,
                MergeOutcome::Skipped(SkipReason::FetchFailed(e.to_string())),
            )
        }
    };

    // Selectors were checked when the config was loaded.
    let selectors = config.annotation_selectors().unwrap_or_default();
    match passage_paragraphs(
        &html,
        &config.container_tag,
        &config.container_class,
        &selectors,
    ) {
        Some(passage) => (
            format!("{}\n\n{}", passage, devotional),
            MergeOutcome::Merged {
                url: url.to_string(),
            },
        ),
        None => (devotional, MergeOutcome::Skipped(SkipReason::NoPassage)),
    }
}

fn default_link_contains() -> String {
    "biblegateway.com/passage".to_string()
}

fn default_version_param() -> String {
    "version".to_string()
}

fn default_from_version() -> String {
    "NIV".to_string()
}

fn default_to_version() -> String {
    "ESV".to_string()
}

fn default_container_tag() -> String {
    "div".to_string()
}

fn default_container_class() -> String {
    "passage-text".to_string()
}

fn default_annotations() -> Vec<String> {
    ["sup.versenum", "sup.crossreference", "sup.footnote", "span.chapternum"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
