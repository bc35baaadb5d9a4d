use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::AuthContext;
use crate::config::DashboardConfig;
use crate::errors::ApiError;

/// `pagination` block of a paged response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub pages: usize,
}

/// Wire envelope shared by every admin endpoint.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

/// Decoded successful response.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub data: T,
    pub pagination: Option<Pagination>,
    pub message: Option<String>,
}

/// Thin REST client for `/api/...`. Every request carries the current
/// bearer token; when there is none the request is not sent at all.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth: AuthContext,
}

impl ApiClient {
    pub fn new(base_url: &str, auth: AuthContext, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Transport)?;
        Ok(ApiClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    pub fn from_config(config: &DashboardConfig, auth: AuthContext) -> Result<Self, ApiError> {
        Self::new(&config.api_base_url, auth, config.request_timeout)
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET with query parameters, decoding `data` as `T`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<ApiResponse<T>, ApiError> {
        let response = self.get_raw(path, query).await?;
        decode_data(response, path)
    }

    /// GET returning the undecoded `data` value.
    pub async fn get_raw(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<ApiResponse<Value>, ApiError> {
        self.execute(Method::GET, path, |req| req.query(query)).await
    }

    /// POST/PUT with an optional JSON body, decoding `data` as `T`.
    pub async fn send<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .execute(method, path, |req| match body {
                Some(body) => req.json(body),
                None => req,
            })
            .await?;
        decode_data(response, path)
    }

    /// Mutation whose response body carries nothing the caller needs.
    pub async fn send_ack<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.execute(method, path, |req| match body {
            Some(body) => req.json(body),
            None => req,
        })
        .await
        .map(|_| ())
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<ApiResponse<Value>, ApiError> {
        let context = format!("{method} {path}");
        let Some(token) = self.auth.bearer_token() else {
            return Err(ApiError::MissingCredential.logged(&context));
        };

        let request = build(self.http.request(method, self.url(path))).bearer_auth(token);
        match dispatch(request).await {
            Ok(response) => {
                log::debug!("{context} ok");
                Ok(response)
            }
            Err(e) => Err(e.logged(&context)),
        }
    }
}

async fn dispatch(request: RequestBuilder) -> Result<ApiResponse<Value>, ApiError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status(status.as_u16()));
    }
    let body = response.text().await?;
    let envelope: Envelope = serde_json::from_str(&body)?;
    if !envelope.success {
        let reason = envelope
            .message
            .or(envelope.error)
            .unwrap_or_else(|| "success flag not set".to_string());
        return Err(ApiError::Unsuccessful(reason));
    }
    Ok(ApiResponse {
        data: envelope.data.unwrap_or(Value::Null),
        pagination: envelope.pagination,
        message: envelope.message,
    })
}

fn decode_data<T: DeserializeOwned>(response: ApiResponse<Value>, path: &str) -> Result<ApiResponse<T>, ApiError> {
    let data = serde_json::from_value(response.data)
        .map_err(|e| ApiError::from(e).logged(&format!("decode {path}")))?;
    Ok(ApiResponse {
        data,
        pagination: response.pagination,
        message: response.message,
    })
}
