use crate::client::Fetch;
use crate::config::{ExtractionConfig, SourceConfig};
use crate::record::ExtractedRecord;
use crate::scraper::{merge_passage, MergeOutcome, Normalizer, Page};
use crate::{log_error, log_info, log_warn};

/// Fetches one source and extracts its record.
///
/// A failed page fetch is logged and yields `None`; every other shortfall is
/// absorbed into the record's placeholders.
pub async fn scrape_source<F: Fetch>(
    fetcher: &F,
    source: &SourceConfig,
    extraction: &ExtractionConfig,
) -> Option<ExtractedRecord> {
    log_info!("[sources] Fetching {} from {}", source.name, source.url);

    let html = match fetcher.fetch(&source.url, &source.headers).await {
        Ok(html) => html,
        Err(e) => {
            log_error!("[sources] Scraping {} failed: {}", source.name, e);
            return None;
        }
    };

    let page = Page::parse(&html);
    let mut record = extract_record(&page, source, extraction);

    if let Some(passage) = &source.passage {
        let (content, outcome) = merge_passage(
            fetcher,
            &page,
            &source.url,
            &source.headers,
            passage,
            record.content,
        )
        .await;
        record.content = content;

        match outcome {
            MergeOutcome::Merged { url } => {
                log_info!("[sources] Merged passage from {} into {}", url, source.name);
            }
            MergeOutcome::Skipped(reason) => {
                log_warn!("[sources] Passage merge skipped for {}: {}", source.name, reason);
            }
        }
    }

    log_info!(
        "[sources] Extracted {} ({} chars) from {}",
        record.title,
        record.content.chars().count(),
        source.name
    );
    Some(record)
}

/// Title, region and normalization for an already fetched page.
pub fn extract_record(
    page: &Page,
    source: &SourceConfig,
    extraction: &ExtractionConfig,
) -> ExtractedRecord {
    let title = source
        .title
        .resolve(page)
        .unwrap_or_else(|| extraction.fallback_title.clone());

    let normalizer = Normalizer::new(&source.boilerplate, &source.label_prefixes);
    let content = source
        .region
        .select(page, &title)
        .map(|raw| normalizer.normalize(&raw))
        .filter(|content| !content.is_empty())
        .unwrap_or_else(|| {
            log_warn!(
                "[sources] Region not found for {}, using placeholder",
                source.name
            );
            extraction.fallback_content.clone()
        });

    ExtractedRecord::new(&source.name, title, content)
}
