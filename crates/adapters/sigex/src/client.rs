//! SIGEX client implementation

use std::fs;
use std::time::Instant;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use dealer_errors::{AppError, AppResult};
use dealer_ports::{
    DdcOptions, DocumentRegistration, QrOperationStatus, QrSigningRequest, RemoteSigningPort,
    SignatureSubmission,
};
use metrics::{counter, histogram};
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::SigexSettings;
use crate::error::{malformed, map_transport_error};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterResponse {
    document_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignResponse {
    sign_id: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QrResponse {
    operation_id: String,
}

#[derive(Deserialize)]
struct DdcResponse {
    ddc: String,
}

/// SIGEX client for the document registry API
pub struct SigexClient {
    /// `None` when the mTLS identity is not configured
    http: Option<reqwest::Client>,
    base_url: Url,
    settings: SigexSettings,
}

impl SigexClient {
    /// Create a client from settings
    ///
    /// A missing certificate or key does not fail construction: the service can
    /// still start, and every signing call reports `NotConfigured` without
    /// touching the network.
    pub fn new(settings: SigexSettings) -> AppResult<Self> {
        let base_url = parse_base_url(&settings.base_url)?;

        let http = match (non_empty(&settings.mtls_crt), non_empty(&settings.mtls_key)) {
            (Some(crt), Some(key)) => {
                let mut pem = fs::read(crt).map_err(|e| {
                    AppError::not_configured(format!("Cannot read SIGEX certificate {}: {}", crt.display(), e))
                })?;
                pem.push(b'\n');
                pem.extend(fs::read(key).map_err(|e| {
                    AppError::not_configured(format!("Cannot read SIGEX key {}: {}", key.display(), e))
                })?);

                let identity = reqwest::Identity::from_pem(&pem).map_err(|e| {
                    AppError::not_configured(format!("Invalid SIGEX client identity: {}", e))
                })?;
                let client = reqwest::Client::builder()
                    .identity(identity)
                    .connect_timeout(settings.connect_timeout)
                    .build()
                    .map_err(|e| AppError::not_configured(format!("Failed to build SIGEX client: {}", e)))?;

                info!(base_url = %base_url, "SIGEX client configured with mTLS identity");
                Some(client)
            }
            _ => {
                warn!("SIGEX mTLS certificate/key not configured, signing calls will be rejected");
                None
            }
        };

        Ok(Self {
            http,
            base_url,
            settings,
        })
    }

    /// Create a client around a pre-built HTTP client
    ///
    /// Used when TLS is terminated elsewhere (sidecar proxy) and in tests.
    pub fn from_parts(settings: SigexSettings, http: reqwest::Client) -> AppResult<Self> {
        Ok(Self {
            http: Some(http),
            base_url: parse_base_url(&settings.base_url)?,
            settings,
        })
    }

    /// Whether signing calls can be made at all
    pub fn is_configured(&self) -> bool {
        self.http.is_some()
    }

    fn http(&self) -> AppResult<&reqwest::Client> {
        self.http.as_ref().ok_or_else(|| {
            AppError::not_configured("SIGEX is not configured: set SIGEX_MTLS_CRT and SIGEX_MTLS_KEY")
        })
    }

    /// `{base}/api/{segments...}`
    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::not_configured("SIGEX base URL cannot carry a path"))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    async fn call(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> AppResult<Vec<u8>> {
        let started = Instant::now();
        let result = async {
            let response = request
                .send()
                .await
                .map_err(|e| map_transport_error(e, operation))?
                .error_for_status()
                .map_err(|e| map_transport_error(e, operation))?;
            let body = response
                .bytes()
                .await
                .map_err(|e| map_transport_error(e, operation))?;
            Ok(body.to_vec())
        }
        .await;

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        let outcome = if result.is_ok() { "ok" } else { "error" };
        counter!("sigex_requests_total", "operation" => operation, "outcome" => outcome).increment(1);
        histogram!("sigex_request_duration_ms", "operation" => operation).record(elapsed_ms);
        debug!(operation, outcome, elapsed_ms, "SIGEX call finished");

        result
    }

    async fn call_json<R: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> AppResult<R> {
        let body = self
            .call(operation, request.timeout(self.settings.json_timeout))
            .await?;
        serde_json::from_slice(&body).map_err(|e| malformed(operation, e))
    }
}

fn parse_base_url(raw: &str) -> AppResult<Url> {
    Url::parse(raw.trim().trim_end_matches('/'))
        .map_err(|e| AppError::not_configured(format!("Invalid SIGEX base URL '{}': {}", raw, e)))
}

fn non_empty(path: &Option<std::path::PathBuf>) -> Option<&std::path::Path> {
    path.as_deref().filter(|p| !p.as_os_str().is_empty())
}

#[async_trait]
impl RemoteSigningPort for SigexClient {
    async fn register_document(&self, request: &DocumentRegistration) -> AppResult<String> {
        let http = self.http()?;
        let url = self.endpoint(&[])?;
        let response: RegisterResponse = self
            .call_json("register", http.post(url).json(request))
            .await?;
        if response.document_id.trim().is_empty() {
            return Err(malformed("register", "empty documentId"));
        }
        Ok(response.document_id)
    }

    async fn upload_document_data(&self, document_id: &str, data: Vec<u8>) -> AppResult<()> {
        let http = self.http()?;
        let url = self.endpoint(&[document_id, "data"])?;
        let request = http
            .post(url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(data)
            .timeout(self.settings.upload_timeout);

        // The acknowledgement body may be empty or arbitrary; only the status matters
        self.call("upload", request).await?;
        Ok(())
    }

    async fn add_signature(
        &self,
        document_id: &str,
        submission: &SignatureSubmission,
    ) -> AppResult<i64> {
        let http = self.http()?;
        let url = self.endpoint(&[document_id])?;
        let response: SignResponse = self
            .call_json("add_signature", http.post(url).json(submission))
            .await?;
        Ok(response.sign_id)
    }

    async fn start_qr_signing(
        &self,
        document_id: &str,
        request: &QrSigningRequest,
    ) -> AppResult<String> {
        let http = self.http()?;
        let url = self.endpoint(&[document_id, "egovQr"])?;
        let response: QrResponse = self
            .call_json("start_qr", http.post(url).json(request))
            .await?;
        Ok(response.operation_id)
    }

    async fn qr_operation_status(
        &self,
        document_id: &str,
        operation_id: &str,
    ) -> AppResult<QrOperationStatus> {
        let http = self.http()?;
        let url = self.endpoint(&[document_id, "egovOperation", operation_id])?;
        self.call_json("qr_status", http.get(url)).await
    }

    async fn build_ddc(&self, document_id: &str, options: &DdcOptions) -> AppResult<Vec<u8>> {
        let http = self.http()?;
        let url = self.endpoint(&[document_id, "buildDDC"])?;
        let response: DdcResponse = self
            .call_json(
                "build_ddc",
                http.post(url)
                    .query(&options.to_query())
                    .json(&serde_json::json!({})),
            )
            .await?;
        STANDARD
            .decode(response.ddc.trim())
            .map_err(|e| malformed("build_ddc", e))
    }
}
