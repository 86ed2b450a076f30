use anyhow::{bail, Context, Result};
use reqwest::blocking::{multipart, Client, Response};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::parser::IngestReport;

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    login: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    pub report: IngestReport,
}

#[derive(Debug, Deserialize)]
struct ExistsResponse {
    exists: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Blocking client for the admin endpoints of a running server
pub struct AdminClient {
    client: Client,
    base_url: String,
}

impl AdminClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent("schoolmap")
            .cookie_store(true)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Log in; the session cookie is kept for the following requests
    pub fn login(&self, login: &str, password: &str) -> Result<()> {
        let response = self
            .client
            .post(self.url("/api/admin/login"))
            .json(&Credentials { login, password })
            .send()
            .context("Failed to reach server")?;
        check(response)?;
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        let response = self
            .client
            .post(self.url("/api/admin/logout"))
            .send()
            .context("Failed to reach server")?;
        check(response)?;
        Ok(())
    }

    /// Upload a workbook to replace the server's dataset
    pub fn upload(&self, path: &Path) -> Result<UploadResponse> {
        let size = std::fs::metadata(path)
            .with_context(|| format!("Failed to read {:?}", path))?
            .len();
        log::info!("uploading {:?} ({})", path, format_bytes(size));

        let form = multipart::Form::new()
            .file("file", path)
            .with_context(|| format!("Failed to read {:?}", path))?;

        let response = self
            .client
            .post(self.url("/api/admin/data/upload"))
            .multipart(form)
            .send()
            .context("Failed to upload workbook")?;

        check(response)?
            .json()
            .context("Failed to parse upload response")
    }

    pub fn data_exists(&self) -> Result<bool> {
        let response = self
            .client
            .get(self.url("/api/admin/data/exists"))
            .send()
            .context("Failed to reach server")?;

        let body: ExistsResponse = check(response)?
            .json()
            .context("Failed to parse response")?;
        Ok(body.exists)
    }
}

/// Turn a non-success status into an error carrying the server's `detail`
fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.detail)
        .unwrap_or(text);
    bail!("server answered {}: {}", status, detail)
}

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    if bytes >= 1_000_000_000 {
        format!("{:.1} GB", bytes as f64 / 1_000_000_000.0)
    } else if bytes >= 1_000_000 {
        format!("{:.1} MB", bytes as f64 / 1_000_000.0)
    } else if bytes >= 1_000 {
        format!("{:.1} KB", bytes as f64 / 1_000.0)
    } else {
        format!("{} B", bytes)
    }
}
