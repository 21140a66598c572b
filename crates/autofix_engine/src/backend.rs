use std::time::Duration;

use autofix_core::{AutofixResponse, RootCauseSelection, Run};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;

use crate::{BackendError, StartRunRequest};

const JSON: &str = "application/json";

#[derive(Debug, Clone)]
pub struct BackendSettings {
    /// API root, e.g. `https://sentry.io/api/0`.
    pub base_url: String,
    pub auth_token: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "https://sentry.io/api/0".to_string(),
            auth_token: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The three operations the remediation backend exposes per issue.
#[async_trait::async_trait]
pub trait AutofixBackend: Send + Sync {
    async fn start_run(&self, group_id: &str, request: &StartRunRequest)
        -> Result<(), BackendError>;

    async fn fetch_run(&self, group_id: &str) -> Result<Option<Run>, BackendError>;

    async fn select_root_cause(
        &self,
        group_id: &str,
        run_id: &str,
        selection: &RootCauseSelection,
    ) -> Result<(), BackendError>;
}

#[derive(Serialize)]
struct UpdateRequest<'a> {
    run_id: &'a str,
    payload: SelectRootCausePayload<'a>,
}

#[derive(Serialize)]
struct SelectRootCausePayload<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(flatten)]
    selection: &'a RootCauseSelection,
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: BackendSettings,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| BackendError::Network(err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, group_id: &str, suffix: &str) -> Result<reqwest::Url, BackendError> {
        let base = self.settings.base_url.trim_end_matches('/');
        let raw = format!("{base}/issues/{group_id}/autofix/{suffix}");
        reqwest::Url::parse(&raw).map_err(|err| BackendError::InvalidUrl(format!("{raw}: {err}")))
    }

    fn request(&self, method: reqwest::Method, url: reqwest::Url) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, url).header(ACCEPT, JSON);
        match self.settings.auth_token.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn post_json<T: Serialize>(
        &self,
        url: reqwest::Url,
        body: &T,
    ) -> Result<reqwest::Response, BackendError> {
        let bytes = serde_json::to_vec(body).map_err(|err| BackendError::Decode(err.to_string()))?;
        let response = self
            .request(reqwest::Method::POST, url)
            .header(CONTENT_TYPE, JSON)
            .body(bytes)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        ensure_success(response).await
    }
}

#[async_trait::async_trait]
impl AutofixBackend for ReqwestBackend {
    async fn start_run(
        &self,
        group_id: &str,
        request: &StartRunRequest,
    ) -> Result<(), BackendError> {
        let url = self.endpoint(group_id, "")?;
        // Only failures matter; the success body is not read.
        self.post_json(url, request).await.map(drop)
    }

    async fn fetch_run(&self, group_id: &str) -> Result<Option<Run>, BackendError> {
        let url = self.endpoint(group_id, "")?;
        let response = self
            .request(reqwest::Method::GET, url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response).await?;
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        let body: AutofixResponse =
            serde_json::from_slice(&bytes).map_err(|err| BackendError::Decode(err.to_string()))?;
        Ok(body.autofix)
    }

    async fn select_root_cause(
        &self,
        group_id: &str,
        run_id: &str,
        selection: &RootCauseSelection,
    ) -> Result<(), BackendError> {
        let url = self.endpoint(group_id, "update/")?;
        let body = UpdateRequest {
            run_id,
            payload: SelectRootCausePayload {
                kind: "select_root_cause",
                selection,
            },
        };
        self.post_json(url, &body).await.map(drop)
    }
}

/// Turns a non-2xx response into `HttpStatus`, keeping a `detail` string from the body.
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let detail = response
        .bytes()
        .await
        .ok()
        .and_then(|bytes| serde_json::from_slice::<serde_json::Value>(&bytes).ok())
        .and_then(|body| {
            body.get("detail")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        });
    Err(BackendError::HttpStatus {
        status: status.as_u16(),
        detail,
    })
}

fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        return BackendError::Timeout(err.to_string());
    }
    if err.is_decode() {
        return BackendError::Decode(err.to_string());
    }
    BackendError::Network(err.to_string())
}
