//! HTTP 传输 - 基础设施层
//!
//! 持有唯一的 HTTP 客户端资源，只暴露"发请求"的能力

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::config::OpenProjectConfig;
use crate::error::{ApiError, AppError, AppResult};

/// Basic 认证时使用的固定用户名，密码为 API key
pub const API_KEY_USERNAME: &str = "apikey";

/// 远端响应：状态码和原始响应体
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx 视为成功
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 解析为 JSON，失败返回 None
    pub fn json_value(&self) -> Option<JsonValue> {
        serde_json::from_str(&self.body).ok()
    }

    /// 解析成功时返回 JSON，否则把原始文本包成字符串
    pub fn json_or_text(&self) -> JsonValue {
        self.json_value()
            .unwrap_or_else(|| JsonValue::String(self.body.clone()))
    }
}

/// 上传用的文件片段
#[derive(Debug, Clone, Copy)]
pub struct FilePart<'a> {
    pub field: &'a str,
    pub filename: &'a str,
    pub bytes: &'a [u8],
}

/// HTTP 传输能力
///
/// 职责：
/// - `path` 为 `/api/v3/...` 形式的相对路径，由实现负责拼接实例地址
/// - 非 2xx 不是错误，按 `HttpResponse` 返回
/// - 只有传输层失败（连接、超时、TLS）才返回 `Err`
/// - 不认识工作项 / 类型 / 状态
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, path: &str) -> AppResult<HttpResponse>;

    async fn post_json(&self, path: &str, body: &JsonValue) -> AppResult<HttpResponse>;

    async fn patch_json(&self, path: &str, body: &JsonValue) -> AppResult<HttpResponse>;

    /// multipart 上传，使用较长的超时
    async fn post_multipart(&self, path: &str, file: FilePart<'_>) -> AppResult<HttpResponse>;
}

/// 基于 reqwest 的实现
///
/// 两个客户端共用同一套认证和证书设置，只是超时不同
pub struct ReqwestTransport {
    base_url: String,
    api_key: Option<String>,
    client: Client,
    upload_client: Client,
}

impl ReqwestTransport {
    /// 根据配置创建传输层
    pub fn new(config: &OpenProjectConfig) -> AppResult<Self> {
        let client = Self::build_client(config, config.request_timeout())?;
        let upload_client = Self::build_client(config, config.upload_timeout())?;

        Ok(Self {
            base_url: config.base_url().to_string(),
            api_key: config.api_key.clone().filter(|key| !key.is_empty()),
            client,
            upload_client,
        })
    }

    fn build_client(config: &OpenProjectConfig, timeout: std::time::Duration) -> AppResult<Client> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| {
                AppError::Api(ApiError::ClientBuildFailed {
                    source: Box::new(e),
                })
            })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.basic_auth(API_KEY_USERNAME, Some(key)),
            None => request,
        }
    }

    async fn send(&self, path: &str, request: RequestBuilder) -> AppResult<HttpResponse> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(path, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(path, e))?;

        debug!("{} -> {} ({} 字节)", path, status, body.len());
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, path: &str) -> AppResult<HttpResponse> {
        debug!("GET {}", path);
        self.send(path, self.client.get(self.url(path))).await
    }

    async fn post_json(&self, path: &str, body: &JsonValue) -> AppResult<HttpResponse> {
        debug!("POST {}", path);
        let request = self
            .client
            .post(self.url(path))
            .header(CONTENT_TYPE, "application/json")
            .json(body);
        self.send(path, request).await
    }

    async fn patch_json(&self, path: &str, body: &JsonValue) -> AppResult<HttpResponse> {
        debug!("PATCH {}", path);
        let request = self
            .client
            .patch(self.url(path))
            .header(CONTENT_TYPE, "application/json")
            .json(body);
        self.send(path, request).await
    }

    async fn post_multipart(&self, path: &str, file: FilePart<'_>) -> AppResult<HttpResponse> {
        debug!("POST {} (multipart, {} 字节)", path, file.bytes.len());
        let part = Part::bytes(file.bytes.to_vec()).file_name(file.filename.to_string());
        let form = Form::new().part(file.field.to_string(), part);
        let request = self.upload_client.post(self.url(path)).multipart(form);
        self.send(path, request).await
    }
}
