/// One source's contribution to the day's document.
///
/// Title and content are always populated: when extraction finds nothing they
/// carry the configured placeholders instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRecord {
    pub source: String,
    pub title: String,
    pub content: String,
}

impl ExtractedRecord {
    pub fn new(
        source: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            title: title.into(),
            content: content.into(),
        }
    }
}
