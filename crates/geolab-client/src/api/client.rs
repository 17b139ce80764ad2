//! Report API client.

use geolab_model::FormKind;
use geolab_persistence::TokenStore;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::remote::{ExportArtifact, RemoteSync, ReportDetail, ReportSummary, SaveReceipt};
use crate::session::{SessionBus, SessionEvent};

/// User agent string for API requests.
const USER_AGENT_VALUE: &str = concat!("geolab/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the laboratory report API.
///
/// Every request carries the bearer token currently in the token store, so a
/// refreshed token is picked up without rebuilding the client.
#[derive(Debug, Clone)]
pub struct LabApiClient {
    client: reqwest::Client,
    base_url: Url,
    tokens: TokenStore,
    session: SessionBus,
}

impl LabApiClient {
    pub fn new(config: &ClientConfig, tokens: TokenStore, session: SessionBus) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|_| ApiError::InvalidUrl(config.base_url.clone()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.base_url.clone()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            tokens,
            session,
        })
    }

    pub fn session(&self) -> &SessionBus {
        &self.session
    }

    /// `<base>/api/<slug>/<segments...>`
    fn endpoint(&self, kind: FormKind, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ApiError::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty().push("api").push(kind.api_slug());
            path.extend(segments);
        }
        Ok(url)
    }

    fn excel_url(&self, kind: FormKind, download: bool, report_id: Option<u64>) -> Result<Url> {
        let mut url = self.endpoint(kind, &["excel"])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("download", if download { "true" } else { "false" });
            if let Some(id) = report_id {
                query.append_pair("ensayo_id", &id.to_string());
            }
        }
        Ok(url)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.tokens.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = self.authorized(request).send().await?;
        self.check_status(response).await
    }

    /// Maps non-success statuses to errors. A `401` also raises the
    /// session-expired event.
    async fn check_status(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(url = %response.url(), "request unauthorized, session expired");
            self.session.publish(SessionEvent::SessionExpired);
            return Err(ApiError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = error_detail(&body);
        tracing::warn!(status = status.as_u16(), detail = ?detail, "API request failed");
        Err(ApiError::Http {
            status: status.as_u16(),
            detail,
        })
    }

    async fn json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Extracts a string `detail` from an error body.
fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|detail| !detail.is_empty())
        .map(str::to_string)
}

impl RemoteSync for LabApiClient {
    async fn save(
        &self,
        kind: FormKind,
        payload: Value,
        report_id: Option<u64>,
    ) -> Result<SaveReceipt> {
        let url = self.excel_url(kind, false, report_id)?;
        tracing::debug!(%kind, ?report_id, "saving report");

        let response = self.send(self.client.post(url).json(&payload)).await?;
        let receipt: SaveReceipt = Self::json(response).await?;

        tracing::info!(%kind, id = receipt.id, number = %receipt.report_number, "report saved");
        Ok(receipt)
    }

    async fn save_and_export(
        &self,
        kind: FormKind,
        payload: Value,
        report_id: Option<u64>,
    ) -> Result<ExportArtifact> {
        let url = self.excel_url(kind, true, report_id)?;
        tracing::debug!(%kind, ?report_id, "saving and exporting report");

        let response = self.send(self.client.post(url).json(&payload)).await?;
        let header = format!("x-{}-id", kind.api_slug());
        let saved_id = response
            .headers()
            .get(header.as_str())
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let bytes = response.bytes().await?.to_vec();

        tracing::info!(%kind, id = ?saved_id, size = bytes.len(), "report exported");
        Ok(ExportArtifact {
            bytes,
            report_id: saved_id,
        })
    }

    async fn fetch_by_id(&self, kind: FormKind, report_id: u64) -> Result<ReportDetail> {
        let url = self.endpoint(kind, &[&report_id.to_string()])?;
        tracing::debug!(%kind, report_id, "fetching report");

        let response = self.send(self.client.get(url)).await?;
        Self::json(response).await
    }

    async fn list(&self, kind: FormKind, limit: usize) -> Result<Vec<ReportSummary>> {
        let mut url = self.endpoint(kind, &[""])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        tracing::debug!(%kind, limit, "listing reports");

        let response = self.send(self.client.get(url)).await?;
        Self::json(response).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use geolab_persistence::MemoryStore;

    use super::*;

    fn client(base: &str) -> LabApiClient {
        let tokens = TokenStore::new(Arc::new(MemoryStore::new()));
        LabApiClient::new(
            &ClientConfig::default().with_base_url(base),
            tokens,
            SessionBus::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_excel_url() {
        let api = client("https://api.example.test");
        assert_eq!(
            api.excel_url(FormKind::SandEquivalent, false, None)
                .unwrap()
                .as_str(),
            "https://api.example.test/api/equi-arena/excel?download=false"
        );
        assert_eq!(
            api.excel_url(FormKind::Gradation, true, Some(12))
                .unwrap()
                .as_str(),
            "https://api.example.test/api/gran-agregado/excel?download=true&ensayo_id=12"
        );
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let api = client("https://host.test/lab/");
        assert_eq!(
            api.endpoint(FormKind::SandEquivalent, &["7"])
                .unwrap()
                .as_str(),
            "https://host.test/lab/api/equi-arena/7"
        );
        assert_eq!(
            api.endpoint(FormKind::SandEquivalent, &[""])
                .unwrap()
                .as_str(),
            "https://host.test/lab/api/equi-arena/"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let tokens = TokenStore::new(Arc::new(MemoryStore::new()));
        let result = LabApiClient::new(
            &ClientConfig::default().with_base_url("not a url"),
            tokens,
            SessionBus::new(),
        );
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_error_detail() {
        assert_eq!(
            error_detail(r#"{"detail": "Ensayo no encontrado"}"#).as_deref(),
            Some("Ensayo no encontrado")
        );
        assert_eq!(error_detail(r#"{"detail": [{"msg": "x"}]}"#), None);
        assert_eq!(error_detail("<html>"), None);
    }
}
