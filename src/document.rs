use crate::error::{DocumentError, Result};
use crate::log_info;
use crate::record::ExtractedRecord;
use chrono::NaiveDate;
use docx_rs::{BreakType, Docx, Paragraph, Run, Style, StyleType};
use std::fs::File;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Level 0 is the document title.
    Heading { level: u8, text: String },
    Paragraph(String),
    PageBreak,
}

/// The day's document before it is written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPlan {
    pub blocks: Vec<Block>,
}

impl DocumentPlan {
    /// One section per present record, in order. `None` when no record is present.
    pub fn assemble(
        records: &[Option<ExtractedRecord>],
        date: NaiveDate,
        title_prefix: &str,
    ) -> Option<Self> {
        let present: Vec<&ExtractedRecord> = records.iter().flatten().collect();
        if present.is_empty() {
            return None;
        }

        let mut blocks = vec![Block::Heading {
            level: 0,
            text: format!("{} - {}", title_prefix, date.format("%Y-%m-%d")),
        }];

        for record in present {
            blocks.push(Block::Heading {
                level: 1,
                text: record.source.clone(),
            });
            blocks.push(Block::Heading {
                level: 2,
                text: record.title.clone(),
            });
            blocks.push(Block::Paragraph(record.content.clone()));
            blocks.push(Block::PageBreak);
        }

        Some(Self { blocks })
    }

    pub fn sections(&self) -> usize {
        self.blocks
            .iter()
            .filter(|block| matches!(block, Block::PageBreak))
            .count()
    }

    pub fn render(&self, path: &Path) -> Result<()> {
        if self.blocks.is_empty() {
            return Err(DocumentError::Empty.into());
        }

        let mut docx = Docx::new()
            .add_style(heading_style("Title", "Title", 52))
            .add_style(heading_style("Heading1", "Heading 1", 32))
            .add_style(heading_style("Heading2", "Heading 2", 26));

        for block in &self.blocks {
            docx = match block {
                Block::Heading { level, text } => docx.add_paragraph(
                    Paragraph::new()
                        .style(heading_style_id(*level))
                        .add_run(Run::new().add_text(text)),
                ),
                Block::Paragraph(text) => docx.add_paragraph(text_paragraph(text)),
                Block::PageBreak => docx
                    .add_paragraph(Paragraph::new().add_run(Run::new().add_break(BreakType::Page))),
            };
        }

        let file = File::create(path)?;
        docx.build()
            .pack(file)
            .map_err(|e| DocumentError::Pack(e.to_string()))?;

        log_info!(
            "[document] Wrote {} section(s) to {}",
            self.sections(),
            path.display()
        );
        Ok(())
    }
}

/// `<prefix>_<YYYY-MM-DD>.<extension>`
pub fn file_name(prefix: &str, date: NaiveDate, extension: &str) -> String {
    format!("{}_{}.{}", prefix, date.format("%Y-%m-%d"), extension)
}

fn heading_style(id: &str, name: &str, half_points: usize) -> Style {
    Style::new(id, StyleType::Paragraph)
        .name(name)
        .size(half_points)
        .bold()
}

fn heading_style_id(level: u8) -> &'static str {
    match level {
        0 => "Title",
        1 => "Heading1",
        _ => "Heading2",
    }
}

// Line breaks inside one paragraph, like the scraped text.
fn text_paragraph(text: &str) -> Paragraph {
    let mut run = Run::new();
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        run = run.add_text(line);
    }
    Paragraph::new().add_run(run)
}
