use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("Scraping error: {0}")]
    Scraper(#[from] ScraperError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing required configuration: {0}")]
    MissingField(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Failure to fetch a page. The source is treated as unavailable for the run.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to build client: {0}")]
    BuildError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Response error {status_code}: {message}")]
    ResponseError { status_code: u16, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Selector error: {0}")]
    SelectorError(String),
}

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Nothing to assemble")]
    Empty,

    #[error("Failed to write document: {0}")]
    Pack(String),
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Credential unavailable: {0}")]
    Credentials(String),

    #[error("Failed to sign token request: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Token exchange failed: {0}")]
    Token(String),

    #[error("Failed to read document for upload: {0}")]
    Read(String),

    #[error("Upload request failed: {0}")]
    Request(String),

    #[error("Unreadable upload response: {0}")]
    Response(String),

    #[error("Upload response carried no file id")]
    MissingFileId,
}

pub type Result<T> = std::result::Result<T, AppError>;
