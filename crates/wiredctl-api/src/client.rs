// Hand-crafted async HTTP client for the Catalyst Center intent API.
//
// Base path: /dna/intent/api/v1/
// Auth: X-Auth-Token header (obtained from /dna/system/api/v1/auth/token)

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::auth::{self, Credentials};
use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::{
    ConfigStage, Envelope, ErrorResponse, NetworkDevice, ReleaseInfo, TaskDetail, TaskId,
    TaskIdResponse, TaskResponse,
};

const INTENT_PREFIX: &str = "dna/intent/api/v1";

/// Truncated body text for error messages.
pub(crate) fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}

/// Write bodies nest the container under its feature name.
fn feature_body(feature: &str, container: &Value) -> Value {
    let mut body = serde_json::Map::new();
    body.insert(feature.to_owned(), container.clone());
    Value::Object(body)
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Catalyst Center intent API.
///
/// Holds an authenticated `reqwest::Client` and the controller root URL.
/// Every method maps to one endpoint; envelopes are stripped before the
/// caller sees the data.
pub struct CatalystClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CatalystClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Authenticate with username/password and build a client that injects
    /// the resulting `X-Auth-Token` on every request.
    pub async fn login(
        base_url: &str,
        credentials: &Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;

        let bootstrap = transport.build_client()?;
        let token = auth::fetch_token(&bootstrap, &base_url, credentials).await?;
        debug!("token exchange successful");

        let mut headers = HeaderMap::new();
        let mut token_value =
            HeaderValue::from_str(token.expose_secret()).map_err(|e| Error::Authentication {
                message: format!("invalid token header value: {e}"),
            })?;
        token_value.set_sensitive(true);
        headers.insert("X-Auth-Token", token_value);

        let http = transport.build_client_with_headers(headers)?;
        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the base URL ends with `/` so relative joins keep its path.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(&format!("{INTENT_PREFIX}/{path}"))?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        self.handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: format!("{e} (body preview: {:?})", preview(&body)),
                body,
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::TokenExpired;
        }

        let raw = resp.text().await.unwrap_or_default();

        let parsed = serde_json::from_str::<ErrorResponse>(&raw).unwrap_or_default();
        let (message, code) = match parsed.response {
            Some(body) => (body.detail.or(body.message), body.error_code),
            None => (parsed.message.or(parsed.error), None),
        };

        Error::Api {
            status: status.as_u16(),
            message: message.unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    preview(&raw)
                }
            }),
            code,
        }
    }

    fn task_id(envelope: Envelope<TaskIdResponse>) -> Result<TaskId, Error> {
        envelope
            .response
            .and_then(|r| r.task_id)
            .ok_or(Error::MissingTaskId)
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── System ───────────────────────────────────────────────────────

    /// Controller release string, if the controller reports one.
    pub async fn release(&self) -> Result<Option<ReleaseInfo>, Error> {
        let env: Envelope<ReleaseInfo> = self.get("dnac-release").await?;
        Ok(env.response)
    }

    // ── Devices ──────────────────────────────────────────────────────

    pub async fn devices_by_management_ip(&self, ip: &str) -> Result<Vec<NetworkDevice>, Error> {
        let env: Envelope<Vec<NetworkDevice>> = self
            .get_with_params("network-device", &[("managementIpAddress", ip.to_owned())])
            .await?;
        Ok(env.response.unwrap_or_default())
    }

    pub async fn devices_by_hostname(&self, hostname: &str) -> Result<Vec<NetworkDevice>, Error> {
        let env: Envelope<Vec<NetworkDevice>> = self
            .get_with_params("network-device", &[("hostname", hostname.to_owned())])
            .await?;
        Ok(env.response.unwrap_or_default())
    }

    // ── Layer-2 configuration features ───────────────────────────────

    /// Read one feature container for a device.
    ///
    /// Returns `None` when the controller answers with an empty or null
    /// response. `page` is an `(offset, limit)` pair passed as query params.
    pub async fn layer2_feature(
        &self,
        device_id: &str,
        stage: ConfigStage,
        feature: &str,
        page: Option<(u32, u32)>,
    ) -> Result<Option<Value>, Error> {
        let path = format!("networkDevices/{device_id}/configFeatures/{stage}/layer2/{feature}");
        let env: Envelope<Value> = match page {
            Some((offset, limit)) => {
                self.get_with_params(
                    &path,
                    &[("offset", offset.to_string()), ("limit", limit.to_string())],
                )
                .await?
            }
            None => self.get(&path).await?,
        };

        Ok(env.response.and_then(|resp| match resp {
            Value::Object(mut map) => match map.remove(feature) {
                Some(Value::Null) => None,
                Some(container) => Some(container),
                None if map.contains_key("items") => Some(Value::Object(map)),
                None => None,
            },
            _ => None,
        }))
    }

    /// Create intended configuration for a feature that has none yet.
    pub async fn create_intent(
        &self,
        device_id: &str,
        feature: &str,
        container: &Value,
    ) -> Result<TaskId, Error> {
        let path = format!("networkDevices/{device_id}/configFeatures/intended/layer2/{feature}");
        Self::task_id(self.post(&path, &feature_body(feature, container)).await?)
    }

    /// Replace existing intended configuration for a feature.
    pub async fn update_intent(
        &self,
        device_id: &str,
        feature: &str,
        container: &Value,
    ) -> Result<TaskId, Error> {
        let path = format!("networkDevices/{device_id}/configFeatures/intended/layer2/{feature}");
        Self::task_id(self.put(&path, &feature_body(feature, container)).await?)
    }

    /// Drop intended configuration for a feature (next deploy resets it).
    pub async fn delete_intent(&self, device_id: &str, feature: &str) -> Result<TaskId, Error> {
        let path = format!("networkDevices/{device_id}/configFeatures/intended/layer2/{feature}");
        Self::task_id(self.delete(&path).await?)
    }

    /// Push all pending intent for a device to the device.
    pub async fn deploy(&self, device_id: &str) -> Result<TaskId, Error> {
        let path = format!("networkDevices/{device_id}/configFeatures/deploy");
        Self::task_id(self.post(&path, &serde_json::json!({})).await?)
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub async fn task(&self, task_id: &TaskId) -> Result<TaskResponse, Error> {
        let env: Envelope<TaskResponse> = self.get(&format!("tasks/{task_id}")).await?;
        env.response.ok_or_else(|| Error::Api {
            message: format!("task {task_id} not found"),
            code: None,
            status: 404,
        })
    }

    pub async fn task_detail(&self, task_id: &TaskId) -> Result<TaskDetail, Error> {
        let env: Envelope<TaskDetail> = self.get(&format!("tasks/{task_id}/detail")).await?;
        Ok(env.response.unwrap_or_default())
    }
}
