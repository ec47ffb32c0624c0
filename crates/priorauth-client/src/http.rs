//! HTTP client for the extraction service's `/extract` and `/health` endpoints.

use std::path::Path;

use async_trait::async_trait;
use priorauth_core::ExtractionResult;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::info;

use crate::{ExtractError, Extractor, read_packet};

/// Where the extraction service listens when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Multipart part name the service expects the packet under.
const FILE_PART: &str = "file";

/// HTTP client for the extraction service.
pub struct ExtractClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct HealthResponse {
    status: String,
}

impl Default for ExtractClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL.to_string())
    }
}

impl ExtractClient {
    /// Create a client for the given service base URL.
    ///
    /// `base_url` should be like `http://localhost:8000`; a trailing slash is dropped.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload one packet and decode the extraction result.
    ///
    /// Any non-2xx status is returned as [`ExtractError::Server`]; nothing is retried.
    pub async fn extract_bytes(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<ExtractionResult, ExtractError> {
        let url = format!("{}/extract", self.base_url);
        let size = bytes.len();
        let form = Form::new().part(FILE_PART, Part::bytes(bytes).file_name(filename.to_string()));

        info!(url = %url, filename, size, "uploading packet for extraction");
        let resp = self.client.post(&url).multipart(form).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ExtractError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        let result: ExtractionResult = serde_json::from_str(&body)?;
        info!(
            fields = result.fields.len(),
            missing = result.missing_fields.len(),
            action = %result.action(),
            "extraction complete"
        );
        Ok(result)
    }

    /// Probe `GET /health`. Returns the reported status string, normally `ok`.
    pub async fn health(&self) -> Result<String, ExtractError> {
        let url = format!("{}/health", self.base_url);

        info!(url = %url, "checking extraction service health");
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ExtractError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let health: HealthResponse = resp.json().await?;
        Ok(health.status)
    }
}

#[async_trait]
impl Extractor for ExtractClient {
    async fn extract(&self, path: &Path) -> Result<ExtractionResult, ExtractError> {
        let bytes = read_packet(path).await?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        self.extract_bytes(&filename, bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use priorauth_core::{ActionKind, demo};
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn client_trims_trailing_slash() {
        let client = ExtractClient::new("http://localhost:8000/".into());
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(ExtractClient::default().base_url(), DEFAULT_API_URL);
    }

    #[tokio::test]
    async fn extract_posts_multipart_file() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/extract"))
            .and(body_string_contains("name=\"file\""))
            .and(body_string_contains("filename=\"packet.txt\""))
            .and(body_string_contains("NPI: 1234567890"))
            .respond_with(ResponseTemplate::new(200).set_body_json(demo::complete()))
            .expect(1)
            .mount(&server)
            .await;

        let client = ExtractClient::new(server.uri());
        let result = client
            .extract_bytes("packet.txt", b"NPI: 1234567890\n".to_vec())
            .await
            .unwrap();
        assert_eq!(result, demo::complete());
        assert_eq!(result.action(), ActionKind::Submit);
    }

    #[tokio::test]
    async fn non_success_status_carries_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/extract"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = ExtractClient::new(server.uri());
        let err = client
            .extract_bytes("packet.pdf", vec![1, 2, 3])
            .await
            .unwrap_err();
        match &err {
            ExtractError::Server { status, body } => {
                assert_eq!(*status, 502);
                assert_eq!(body, "bad gateway");
            }
            other => panic!("expected server error, got {other:?}"),
        }
        assert_eq!(err.to_string(), "upload failed (502)");
    }

    #[tokio::test]
    async fn malformed_body_is_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/extract"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"fields\": 3}"))
            .mount(&server)
            .await;

        let client = ExtractClient::new(server.uri());
        let err = client.extract_bytes("packet.pdf", vec![0]).await.unwrap_err();
        assert!(matches!(err, ExtractError::Json(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn extractor_reads_file_from_disk() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/extract"))
            .and(body_string_contains("filename=\"request.txt\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(demo::incomplete()))
            .mount(&server)
            .await;

        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("request.txt");
        tokio::fs::write(&file, "Patient Name: Jordan Rivera").await.unwrap();

        let client = ExtractClient::new(server.uri());
        let result = client.extract(&file).await.unwrap();
        assert_eq!(result.action(), ActionKind::RequestMoreInfo);
    }

    #[tokio::test]
    async fn extractor_reports_unreadable_file() {
        let client = ExtractClient::new("http://127.0.0.1:9".into());
        let err = client
            .extract(Path::new("/definitely/not/here.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Io { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn health_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "ok"})),
            )
            .mount(&server)
            .await;

        let client = ExtractClient::new(server.uri());
        assert_eq!(client.health().await.unwrap(), "ok");
    }
}
