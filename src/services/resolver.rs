//! 资源解析服务 - 业务能力层
//!
//! 只负责"把类型名 / 状态名解析成远端 ID"，不关心流程

use std::sync::Arc;

use tracing::{debug, warn};

use crate::api::openproject::{named_elements, project_types_path, Collection};
use crate::infrastructure::HttpTransport;

/// 名称比较前的规范化：去掉首尾空白并转小写
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// 两轮匹配
///
/// 第一轮要求规范化后完全相等；第一轮没有结果时，第二轮取第一个包含查询串的候选。
/// 精确匹配永远优先于列表中更靠前的子串匹配。查询串为空时不匹配。
pub fn match_by_name<S: AsRef<str>>(query: &str, candidates: &[(S, u64)]) -> Option<u64> {
    let query = normalize_name(query);
    if query.is_empty() {
        return None;
    }

    let normalized: Vec<(String, u64)> = candidates
        .iter()
        .map(|(name, id)| (normalize_name(name.as_ref()), *id))
        .collect();

    normalized
        .iter()
        .find(|(name, _)| *name == query)
        .or_else(|| normalized.iter().find(|(name, _)| name.contains(&query)))
        .map(|(_, id)| *id)
}

/// 资源解析服务
///
/// 职责：
/// - 查询远端列表并按名称匹配
/// - 不缓存结果，每次提交都重新查询
/// - 查询失败、传输失败、无匹配都返回 None，由调用方决定是否致命
pub struct ResourceResolver {
    transport: Arc<dyn HttpTransport>,
}

impl ResourceResolver {
    /// 创建新的解析服务
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// 在项目的可用类型中查找 `type_name`
    pub async fn resolve_type_id(&self, project_id: u64, type_name: &str) -> Option<u64> {
        self.resolve(&project_types_path(project_id), "类型", type_name)
            .await
    }

    /// 在全局状态列表中查找 `status_name`
    pub async fn resolve_status_id(&self, status_name: &str) -> Option<u64> {
        self.resolve(&Collection::Statuses.path(), "状态", status_name)
            .await
    }

    async fn resolve(&self, path: &str, kind: &str, name: &str) -> Option<u64> {
        let response = match self.transport.get(path).await {
            Ok(response) => response,
            Err(e) => {
                warn!("查询{}列表失败: {}", kind, e);
                return None;
            }
        };

        if !response.is_success() {
            warn!("查询{}列表返回 {} ({})", kind, response.status, path);
            return None;
        }

        let Some(listing) = response.json_value() else {
            warn!("{}列表不是合法的 JSON ({})", kind, path);
            return None;
        };

        let candidates = named_elements(&listing);
        let found = match_by_name(name, &candidates);
        match found {
            Some(id) => debug!("{} \"{}\" -> {}", kind, name, id),
            None => debug!(
                "{} \"{}\" 在 {} 个候选中未找到",
                kind,
                name,
                candidates.len()
            ),
        }
        found
    }
}
