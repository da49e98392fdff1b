use crate::error::{ConfigError, Result};
use crate::logging::parse_log_level;
use crate::scraper::{MarkerSpec, PassageConfig, RegionStrategy, TitleSpec};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_directory")]
    pub directory: String,
    #[serde(default = "default_log_filename")]
    pub filename: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

/// Placeholders substituted when a heuristic finds nothing.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    #[serde(default = "default_fallback_title")]
    pub fallback_title: String,
    #[serde(default = "default_fallback_content")]
    pub fallback_content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentConfig {
    #[serde(default = "default_title_prefix")]
    pub title_prefix: String,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DriveConfig {
    #[serde(default = "default_folder_id")]
    pub folder_id: String,
    /// Environment variable that is `"true"` when running in the automated environment.
    #[serde(default = "default_automation_flag")]
    pub automation_flag: String,
    /// Environment variable carrying the service account JSON in the automated environment.
    #[serde(default = "default_key_env")]
    pub key_env: String,
    /// Service account JSON file used everywhere else.
    #[serde(default = "default_key_file")]
    pub key_file: String,
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default = "default_upload_url")]
    pub upload_url: String,
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
}

/// One scraped page and the rules that pull a record out of it.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    pub title: TitleSpec,
    pub region: RegionStrategy,
    #[serde(default)]
    pub boilerplate: Vec<String>,
    #[serde(default)]
    pub label_prefixes: Vec<String>,
    #[serde(default)]
    pub passage: Option<PassageConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LogConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub extraction: ExtractionConfig,

    #[serde(default)]
    pub document: DocumentConfig,

    #[serde(default)]
    pub drive: DriveConfig,

    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: default_log_directory(),
            filename: default_log_filename(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            fallback_title: default_fallback_title(),
            fallback_content: default_fallback_content(),
        }
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            title_prefix: default_title_prefix(),
            file_prefix: default_file_prefix(),
            extension: default_extension(),
            output_dir: default_output_dir(),
        }
    }
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            folder_id: default_folder_id(),
            automation_flag: default_automation_flag(),
            key_env: default_key_env(),
            key_file: default_key_file(),
            scope: default_scope(),
            upload_url: default_upload_url(),
            mime_type: default_mime_type(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LogConfig::default(),
            http: HttpConfig::default(),
            extraction: ExtractionConfig::default(),
            document: DocumentConfig::default(),
            drive: DriveConfig::default(),
            sources: default_sources(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::FileRead)?;
        let config = Self::from_toml(&content)?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        parse_log_level(&self.logging.level)?;

        if self.http.request_timeout == 0 {
            return Err(ConfigError::InvalidValue(
                "http.request_timeout must be greater than 0".to_string(),
            )
            .into());
        }

        if self.sources.is_empty() {
            return Err(ConfigError::MissingField("sources".to_string()).into());
        }

        for source in &self.sources {
            if source.name.is_empty() {
                return Err(ConfigError::MissingField("sources.name".to_string()).into());
            }
            if !source.url.starts_with("http") {
                return Err(ConfigError::InvalidValue(format!(
                    "url of source {} must start with http(s): {}",
                    source.name, source.url
                ))
                .into());
            }
            source.region.validate(&source.name)?;
            if let Some(passage) = &source.passage {
                passage.validate(&source.name)?;
            }
        }

        if self.document.file_prefix.is_empty() {
            return Err(
                ConfigError::InvalidValue("document.file_prefix cannot be empty".to_string())
                    .into(),
            );
        }

        if self.drive.folder_id.is_empty() {
            return Err(ConfigError::MissingField("drive.folder_id".to_string()).into());
        }

        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> String {
    "logs".to_string()
}

fn default_log_filename() -> String {
    "daily-bread.log".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.0.0 Safari/537.36".to_string()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.7,ko;q=0.6".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_fallback_title() -> String {
    "No Title Found".to_string()
}

fn default_fallback_content() -> String {
    "content could not be automatically extracted".to_string()
}

fn default_title_prefix() -> String {
    "Daily Bread".to_string()
}

fn default_file_prefix() -> String {
    "DailyBread".to_string()
}

fn default_extension() -> String {
    "docx".to_string()
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_folder_id() -> String {
    "1Y0K1FaTb2STwT7Fp6nk-Zlc4AyZfFVRv".to_string()
}

fn default_automation_flag() -> String {
    "GITHUB_ACTIONS".to_string()
}

fn default_key_env() -> String {
    "SERVICE_ACCOUNT_KEY".to_string()
}

fn default_key_file() -> String {
    "SERVICE_ACCOUNT_KEY".to_string()
}

fn default_scope() -> String {
    "https://www.googleapis.com/auth/drive".to_string()
}

fn default_upload_url() -> String {
    "https://www.googleapis.com/upload/drive/v3/files".to_string()
}

fn default_mime_type() -> String {
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document".to_string()
}

fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig {
            name: "UBF.org".to_string(),
            url: "https://www.ubf.org/daily-breads".to_string(),
            headers: BTreeMap::new(),
            title: TitleSpec::Heading {
                tag: "h3".to_string(),
            },
            region: RegionStrategy::MarkerSpan {
                start: MarkerSpec::AfterTitle,
                end: MarkerSpec::Text("Prayer:".to_string()),
            },
            boilerplate: vec!["Show Bible NIV ESV".to_string()],
            label_prefixes: vec!["Passage:".to_string(), "Key verse:".to_string()],
            passage: Some(PassageConfig::default()),
        },
        SourceConfig {
            name: "BS.UBF.KR".to_string(),
            url: "https://bs.ubf.kr/dailybread/dailybread.php".to_string(),
            headers: BTreeMap::from([("user-agent".to_string(), "Mozilla/5.0".to_string())]),
            title: TitleSpec::Fixed {
                text: "일용할 양식".to_string(),
            },
            region: RegionStrategy::MarkerSpan {
                start: MarkerSpec::Text("말씀 :".to_string()),
                end: MarkerSpec::Text("한마디".to_string()),
            },
            boilerplate: Vec::new(),
            label_prefixes: Vec::new(),
            passage: None,
        },
    ]
}
