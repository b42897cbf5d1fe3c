//! 集成测试共用的脚本化传输层
//!
//! 按 (方法, 路径) 预置响应，并记录每一次调用

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use openproject_feedback::config::OpenProjectConfig;
use openproject_feedback::error::AppResult;
use openproject_feedback::infrastructure::{FilePart, HttpResponse, HttpTransport};
use openproject_feedback::AppError;
use serde_json::{json, Value};

pub const BASE_URL: &str = "https://op.example.com";

/// 预置的回复
#[derive(Debug, Clone)]
pub enum Reply {
    Respond(HttpResponse),
    /// 模拟连接失败 / 超时
    TransportError,
}

impl Reply {
    pub fn json(status: u16, body: Value) -> Self {
        Reply::Respond(HttpResponse::new(status, body.to_string()))
    }

    pub fn text(status: u16, body: &str) -> Self {
        Reply::Respond(HttpResponse::new(status, body))
    }
}

/// 被记录的调用
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
    pub filename: Option<String>,
}

#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<(&'static str, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// 预置一个回复；同一路由多次预置时按顺序消费，最后一个重复使用
    pub fn on(&self, method: &'static str, path: &str, reply: Reply) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: &str, path: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method && c.path == path)
            .collect()
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls().iter().filter(|c| c.method == method).count()
    }

    fn reply(&self, call: Call) -> AppResult<HttpResponse> {
        let key = (call.method, call.path.clone());
        self.calls.lock().unwrap().push(call);

        let mut routes = self.routes.lock().unwrap();
        let reply = match routes.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        match reply {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::TransportError) => Err(AppError::api_request_failed(
                key.1,
                std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out"),
            )),
            None => Ok(HttpResponse::new(404, r#"{"message":"not found"}"#)),
        }
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn get(&self, path: &str) -> AppResult<HttpResponse> {
        self.reply(Call {
            method: "GET",
            path: path.to_string(),
            body: None,
            filename: None,
        })
    }

    async fn post_json(&self, path: &str, body: &Value) -> AppResult<HttpResponse> {
        self.reply(Call {
            method: "POST",
            path: path.to_string(),
            body: Some(body.clone()),
            filename: None,
        })
    }

    async fn patch_json(&self, path: &str, body: &Value) -> AppResult<HttpResponse> {
        self.reply(Call {
            method: "PATCH",
            path: path.to_string(),
            body: Some(body.clone()),
            filename: None,
        })
    }

    async fn post_multipart(&self, path: &str, file: FilePart<'_>) -> AppResult<HttpResponse> {
        self.reply(Call {
            method: "MULTIPART",
            path: path.to_string(),
            body: None,
            filename: Some(file.filename.to_string()),
        })
    }
}

/// `_embedded.elements` 列表
pub fn listing(elements: &[(&str, u64)]) -> Value {
    let elements: Vec<Value> = elements
        .iter()
        .map(|(name, id)| json!({ "_type": "Type", "id": id, "name": name }))
        .collect();
    json!({
        "_type": "Collection",
        "total": elements.len(),
        "_embedded": { "elements": elements }
    })
}

pub fn config(project_id: Option<u64>) -> OpenProjectConfig {
    OpenProjectConfig {
        url: format!("{}/", BASE_URL),
        api_key: Some("secret".to_string()),
        project_id,
        ..Default::default()
    }
}

pub fn init_logging() {
    openproject_feedback::utils::logging::init(true);
}
