use crate::client::Fetch;
use crate::config::Config;
use crate::document::{file_name, DocumentPlan};
use crate::drive::Upload;
use crate::error::Result;
use crate::sources::scrape_source;
use crate::utils::{ensure_directory, TempArtifact};
use crate::{log_error, log_info, log_warn};
use chrono::NaiveDate;
use std::path::Path;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub attempted: usize,
    pub extracted: usize,
    pub document: Option<String>,
    pub file_id: Option<String>,
}

/// One full run: scrape every source, assemble, upload, clean up.
///
/// Nothing here fails the run. Write and upload failures are logged and show
/// up as an empty `file_id`.
pub async fn run<F: Fetch, U: Upload>(
    config: &Config,
    fetcher: &F,
    uploader: &U,
    today: NaiveDate,
) -> RunSummary {
    let mut summary = RunSummary {
        attempted: config.sources.len(),
        ..RunSummary::default()
    };

    let mut records = Vec::with_capacity(config.sources.len());
    for source in &config.sources {
        records.push(scrape_source(fetcher, source, &config.extraction).await);
    }
    summary.extracted = records.iter().flatten().count();

    let plan = match DocumentPlan::assemble(&records, today, &config.document.title_prefix) {
        Some(plan) => plan,
        None => {
            log_warn!("[pipeline] No source produced any data, skipping document and upload");
            return summary;
        }
    };

    let name = file_name(&config.document.file_prefix, today, &config.document.extension);
    let artifact = TempArtifact::new(Path::new(&config.document.output_dir).join(&name));
    summary.document = Some(name);

    if let Err(e) = write_document(&plan, &config.document.output_dir, &artifact) {
        log_error!(e => "[pipeline] Failed to write document");
        return summary;
    }

    match uploader.upload(artifact.path()).await {
        Ok(id) => {
            log_info!("[pipeline] Upload complete, file id {}", id);
            summary.file_id = Some(id);
        }
        Err(e) => {
            log_error!(e => "[pipeline] Upload failed");
        }
    }

    summary
}

fn write_document(plan: &DocumentPlan, output_dir: &str, artifact: &TempArtifact) -> Result<()> {
    ensure_directory(output_dir)?;
    plan.render(artifact.path())
}
