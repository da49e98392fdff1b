mod auth;
mod credentials;

pub use credentials::CredentialSource;

use crate::client::Client;
use crate::config::DriveConfig;
use crate::error::{Result, UploadError};
use crate::log_info;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::Path;

const BOUNDARY: &str = "daily_bread_upload_boundary";

/// Pushes a finished document somewhere remote and returns its id.
pub trait Upload {
    async fn upload(&self, path: &Path) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct CreatedFile {
    id: Option<String>,
}

/// Creates files in a shared Google Drive folder with a service account.
pub struct DriveUploader {
    client: Client,
    credentials: CredentialSource,
    config: DriveConfig,
}

impl DriveUploader {
    pub fn new(client: Client, credentials: CredentialSource, config: DriveConfig) -> Self {
        Self {
            client,
            credentials,
            config,
        }
    }

    fn upload_url(&self) -> String {
        format!(
            "{}?uploadType=multipart&supportsAllDrives=true&fields=id",
            self.config.upload_url
        )
    }
}

impl Upload for DriveUploader {
    async fn upload(&self, path: &Path) -> Result<String> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content = tokio::fs::read(path)
            .await
            .map_err(|e| UploadError::Read(format!("{}: {}", path.display(), e)))?;

        let key = self.credentials.load()?;
        let token = auth::access_token(&self.client, &key, &self.config.scope).await?;

        let body = multipart_body(&name, &self.config.folder_id, &self.config.mime_type, &content);

        let headers = BTreeMap::from([
            ("authorization".to_string(), format!("Bearer {}", token)),
            (
                "content-type".to_string(),
                format!("multipart/related; boundary={}", BOUNDARY),
            ),
        ]);

        log_info!(
            "[drive] Uploading {} ({} bytes) to folder {}",
            name,
            content.len(),
            self.config.folder_id
        );
        let response = self
            .client
            .post(&self.upload_url(), &headers, body)
            .await
            .map_err(|e| UploadError::Request(e.to_string()))?;

        created_file_id(&response.content)
    }
}

fn created_file_id(body: &str) -> Result<String> {
    let created: CreatedFile =
        serde_json::from_str(body).map_err(|e| UploadError::Response(e.to_string()))?;
    created.id.ok_or_else(|| UploadError::MissingFileId.into())
}

/// `multipart/related` body: JSON metadata part followed by the media part.
fn multipart_body(name: &str, folder_id: &str, mime_type: &str, content: &[u8]) -> Vec<u8> {
    let metadata = json!({
        "name": name,
        "parents": [folder_id],
    });

    let mut body = Vec::with_capacity(content.len() + 512);
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{m}\r\n--{b}\r\nContent-Type: {t}\r\n\r\n",
            b = BOUNDARY,
            m = metadata,
            t = mime_type
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::testing::scratch_dir;

    const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

    #[test]
    fn multipart_body_has_metadata_then_media() {
        let body = multipart_body("DailyBread_2026-10-18.docx", "folder-1", DOCX, b"PK\x03\x04");
        let text = String::from_utf8_lossy(&body);

        let metadata_at = text.find("\"name\":\"DailyBread_2026-10-18.docx\"").unwrap();
        let media_at = text.find(&format!("Content-Type: {}", DOCX)).unwrap();
        assert!(metadata_at < media_at);
        assert!(text.contains("\"parents\":[\"folder-1\"]"));
        assert!(text.starts_with(&format!("--{}\r\n", BOUNDARY)));
        assert!(text.ends_with(&format!("\r\n--{}--\r\n", BOUNDARY)));
        assert!(body.windows(4).any(|w| w == b"PK\x03\x04"));
    }

    #[test]
    fn upload_url_enables_shared_drives() {
        let client = Client::builder().build().unwrap();
        let uploader = DriveUploader::new(
            client,
            CredentialSource::File("key.json".into()),
            DriveConfig::default(),
        );
        let url = uploader.upload_url();
        assert!(url.starts_with("https://www.googleapis.com/upload/drive/v3/files?"));
        assert!(url.contains("supportsAllDrives=true"));
        assert!(url.contains("uploadType=multipart"));
    }

    fn uploader(key_path: &Path) -> DriveUploader {
        DriveUploader::new(
            Client::builder().build().unwrap(),
            CredentialSource::File(key_path.to_path_buf()),
            DriveConfig::default(),
        )
    }

    #[tokio::test]
    async fn missing_credentials_fail_before_any_request() {
        let dir = scratch_dir("drive-no-key");
        let document = dir.join("DailyBread_2026-10-18.docx");
        std::fs::write(&document, b"PK").unwrap();

        let err = uploader(&dir.join("missing.json"))
            .upload(&document)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upload(UploadError::Credentials(_))));
    }

    #[tokio::test]
    async fn unreadable_document_is_an_upload_error() {
        let dir = scratch_dir("drive-no-document");
        let key = dir.join("key.json");
        std::fs::write(&key, r#"{"client_email":"a@b.iam","private_key":"unused"}"#).unwrap();

        let err = uploader(&key)
            .upload(&dir.join("missing.docx"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upload(UploadError::Read(_))));
        assert!(err.to_string().contains("missing.docx"));
    }

    #[test]
    fn response_body_maps_to_upload_errors() {
        assert_eq!(created_file_id(r#"{"id":"file-123"}"#).unwrap(), "file-123");
        assert!(matches!(
            created_file_id("<html>bad gateway</html>"),
            Err(AppError::Upload(UploadError::Response(_)))
        ));
        assert!(matches!(
            created_file_id("{}"),
            Err(AppError::Upload(UploadError::MissingFileId))
        ));
    }
}
