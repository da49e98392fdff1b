//! Stub collaborators shared by the unit tests.

use crate::client::Fetch;
use crate::drive::Upload;
use crate::error::{ClientError, Result, UploadError};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Serves canned pages by URL; unknown URLs fail like a 404.
#[derive(Default)]
pub struct StubFetcher {
    pages: HashMap<String, std::result::Result<String, String>>,
    requests: RefCell<Vec<(String, BTreeMap<String, String>)>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), Ok(html.to_string()));
        self
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.pages
            .insert(url.to_string(), Err("connection reset".to_string()));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub fn headers_for(&self, url: &str) -> BTreeMap<String, String> {
        self.requests
            .borrow()
            .iter()
            .find(|(requested, _)| requested == url)
            .map(|(_, headers)| headers.clone())
            .unwrap_or_default()
    }
}

impl Fetch for StubFetcher {
    async fn fetch(&self, url: &str, headers: &BTreeMap<String, String>) -> Result<String> {
        self.requests
            .borrow_mut()
            .push((url.to_string(), headers.clone()));

        match self.pages.get(url) {
            Some(Ok(html)) => Ok(html.clone()),
            Some(Err(reason)) => Err(ClientError::RequestFailed(reason.clone()).into()),
            None => Err(ClientError::ResponseError {
                status_code: 404,
                message: String::new(),
            }
            .into()),
        }
    }
}

/// Records upload attempts and whether the file existed at upload time.
#[derive(Default)]
pub struct RecordingUploader {
    fail: bool,
    uploads: RefCell<Vec<(PathBuf, bool)>>,
}

impl RecordingUploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn uploads(&self) -> Vec<(PathBuf, bool)> {
        self.uploads.borrow().clone()
    }
}

impl Upload for RecordingUploader {
    async fn upload(&self, path: &Path) -> Result<String> {
        self.uploads
            .borrow_mut()
            .push((path.to_path_buf(), path.exists()));

        if self.fail {
            Err(UploadError::Token("invalid_grant".to_string()).into())
        } else {
            Ok("file-123".to_string())
        }
    }
}

/// A fresh, empty directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("daily-bread-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
