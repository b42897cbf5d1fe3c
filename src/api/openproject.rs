//! OpenProject API v3 模块
//!
//! 负责资源路径和 HAL (`_links` / `_embedded`) 结构的拼装与解析

use serde_json::{json, Value};

/// API 根路径
pub const API_ROOT: &str = "/api/v3";

/// 资源集合
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Projects,
    Types,
    Statuses,
    Priorities,
    WorkPackages,
    Uploads,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Projects => "projects",
            Collection::Types => "types",
            Collection::Statuses => "statuses",
            Collection::Priorities => "priorities",
            Collection::WorkPackages => "work_packages",
            Collection::Uploads => "uploads",
        }
    }

    /// `/api/v3/<collection>`
    pub fn path(self) -> String {
        format!("{}/{}", API_ROOT, self.as_str())
    }

    /// `/api/v3/<collection>/<id>`，也用作 `_links` 中的 href
    pub fn href(self, id: u64) -> String {
        format!("{}/{}/{}", API_ROOT, self.as_str(), id)
    }
}

/// 项目下可用的工作项类型列表
pub fn project_types_path(project_id: u64) -> String {
    format!("{}/types", Collection::Projects.href(project_id))
}

/// 连接探测依次尝试的入口
pub const PROBE_ENDPOINTS: [&str; 4] = [
    "/api/v3",
    "/api/v3/projects",
    "/api/v3/statuses",
    "/api/v3/work_packages",
];

/// 工作项的浏览页地址（非 API 地址）
pub fn work_package_view_url(base_url: &str, id: u64) -> String {
    format!("{}/work_packages/{}", base_url.trim_end_matches('/'), id)
}

/// `{"href": ...}`
pub fn link(href: impl Into<String>) -> Value {
    json!({ "href": href.into() })
}

/// 读取 `_embedded.elements` 中的 (name, id)
///
/// 缺少 name 或 id 的元素直接跳过
pub fn named_elements(listing: &Value) -> Vec<(String, u64)> {
    listing
        .pointer("/_embedded/elements")
        .and_then(Value::as_array)
        .map(|elements| {
            elements
                .iter()
                .filter_map(|element| {
                    let name = element.get("name")?.as_str()?;
                    let id = element.get("id")?.as_u64()?;
                    Some((name.to_string(), id))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// 读取 `_links.self.href`
pub fn self_href(resource: &Value) -> Option<&str> {
    resource.pointer("/_links/self/href").and_then(Value::as_str)
}
