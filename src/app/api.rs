//! Backend REST client.
//!
//! Every call is bearer-authenticated. In the browser requests go through
//! `fetch`; natively (host process, tests) through `reqwest`.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::config::ClientConfig;
use crate::notifications::model::{lenient_flag, lenient_int};
use crate::notifications::{Notification, RecordId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("no access token stored")]
    MissingToken,
    #[error("request rejected: unauthorized")]
    Unauthorized,
    #[error("backend returned HTTP {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("could not decode response: {0}")]
    Decode(String),
}

/// Response of `GET /auth/auth`
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthInfo {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub id: i64,
    #[serde(rename = "isAdmin", default, deserialize_with = "lenient_flag")]
    pub is_admin: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Method {
    Get,
    Put,
    Delete,
}

impl Method {
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// Map an HTTP status to success or the matching error
fn check_status(status: u16) -> Result<(), ApiError> {
    match status {
        200..=299 => Ok(()),
        401 => Err(ApiError::Unauthorized),
        other => Err(ApiError::Status(other)),
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn decode_notifications(body: &str) -> Result<Vec<Notification>, ApiError> {
    let rows: Vec<serde_json::Value> = decode(body)?;
    Ok(rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value::<Notification>(row) {
            Ok(n) => Some(n),
            Err(e) => {
                tracing::warn!("Skipping undecodable notification: {}", e);
                None
            }
        })
        .collect())
}

#[derive(Clone, Debug)]
pub struct BackendClient {
    base: String,
    #[cfg(not(target_arch = "wasm32"))]
    http: reqwest::Client,
}

impl PartialEq for BackendClient {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
    }
}

impl BackendClient {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self {
            base,
            #[cfg(not(target_arch = "wasm32"))]
            http: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.api_base.clone())
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// `GET /auth/auth`
    pub async fn verify_token(&self, token: &str) -> Result<AuthInfo, ApiError> {
        let body = self.send(Method::Get, "/auth/auth", token).await?;
        decode(&body)
    }

    /// `DELETE /events/{id}`
    pub async fn delete_event(&self, token: &str, event_id: &str) -> Result<(), ApiError> {
        let path = format!("/events/{}", urlencoding::encode(event_id));
        self.send(Method::Delete, &path, token).await.map(|_| ())
    }

    /// `GET /notifications/admin`. Records that fail to decode are logged
    /// and skipped; only a body that is not a list fails the call.
    pub async fn admin_notifications(&self, token: &str) -> Result<Vec<Notification>, ApiError> {
        let body = self.send(Method::Get, "/notifications/admin", token).await?;
        decode_notifications(&body)
    }

    /// `PUT /notifications/admin/{id}/read`
    pub async fn mark_admin_notification_read(
        &self,
        token: &str,
        id: &RecordId,
    ) -> Result<(), ApiError> {
        let path = format!(
            "/notifications/admin/{}/read",
            urlencoding::encode(id.as_str())
        );
        self.send(Method::Put, &path, token).await.map(|_| ())
    }

    /// `PUT /notifications/admin/read-all`
    pub async fn mark_all_admin_notifications_read(&self, token: &str) -> Result<(), ApiError> {
        self.send(Method::Put, "/notifications/admin/read-all", token)
            .await
            .map(|_| ())
    }

    #[cfg(target_arch = "wasm32")]
    async fn send(&self, method: Method, path: &str, token: &str) -> Result<String, ApiError> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen_futures::JsFuture;
        use web_sys::{Headers, Request, RequestInit, Response};

        fn js_err(e: wasm_bindgen::JsValue) -> ApiError {
            ApiError::Network(format!("{:?}", e))
        }

        let window = web_sys::window().ok_or_else(|| ApiError::Network("No window".into()))?;

        let headers = Headers::new().map_err(js_err)?;
        headers
            .set("Authorization", &format!("Bearer {token}"))
            .map_err(js_err)?;

        let opts = RequestInit::new();
        opts.set_method(method.as_str());
        opts.set_headers(&headers);

        let request = Request::new_with_str_and_init(&self.url(path), &opts).map_err(js_err)?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_err)?;

        let resp: Response = resp_value
            .dyn_into()
            .map_err(|_| ApiError::Network("Not a Response".into()))?;

        check_status(resp.status())?;

        let text = JsFuture::from(resp.text().map_err(js_err)?)
            .await
            .map_err(js_err)?;

        Ok(text.as_string().unwrap_or_default())
    }

    #[cfg(not(target_arch = "wasm32"))]
    async fn send(&self, method: Method, path: &str, token: &str) -> Result<String, ApiError> {
        let url = self.url(path);
        let request = match method {
            Method::Get => self.http.get(&url),
            Method::Put => self.http.put(&url),
            Method::Delete => self.http.delete(&url),
        };

        let resp = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        check_status(resp.status().as_u16())?;

        resp.text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }
}
