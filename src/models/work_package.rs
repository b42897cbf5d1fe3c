use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::api::openproject::{link, Collection};

/// 单次提交对默认配置的覆盖，全部可选
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorkPackageOverrides {
    pub project_id: Option<u64>,
    pub type_id: Option<u64>,
    pub type_name: Option<String>,
    pub status_id: Option<u64>,
    pub status_name: Option<String>,
    pub priority_id: Option<u64>,
}

/// 创建工作项的请求，每次提交重新构建
///
/// project 和 type 必须已经确定；status / priority 可缺省
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkPackageRequest {
    pub project_id: u64,
    pub type_id: u64,
    pub status_id: Option<u64>,
    pub priority_id: Option<u64>,
    pub subject: String,
    /// markdown 格式的描述
    pub description: String,
}

impl WorkPackageRequest {
    /// 构建 `POST /api/v3/work_packages` 的请求体
    pub fn to_payload(&self) -> Value {
        let mut links = Map::new();
        links.insert("project".into(), link(Collection::Projects.href(self.project_id)));
        links.insert("type".into(), link(Collection::Types.href(self.type_id)));
        if let Some(status_id) = self.status_id {
            links.insert("status".into(), link(Collection::Statuses.href(status_id)));
        }
        if let Some(priority_id) = self.priority_id {
            links.insert("priority".into(), link(Collection::Priorities.href(priority_id)));
        }

        json!({
            "subject": self.subject,
            "description": {
                "format": "markdown",
                "raw": self.description,
            },
            "_links": links,
        })
    }
}

/// 把附件关联到工作项的 PATCH 请求体
pub fn attachment_link_payload(upload_href: &str) -> Value {
    json!({
        "_links": {
            "attachments": [ link(upload_href) ]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> WorkPackageRequest {
        WorkPackageRequest {
            project_id: 3,
            type_id: 5,
            status_id: None,
            priority_id: None,
            subject: "Bug X".to_string(),
            description: "steps...".to_string(),
        }
    }

    #[test]
    fn test_payload_required_links_only() {
        let payload = request().to_payload();

        assert_eq!(payload["subject"], "Bug X");
        assert_eq!(payload["description"]["format"], "markdown");
        assert_eq!(payload["description"]["raw"], "steps...");
        assert_eq!(payload["_links"]["project"]["href"], "/api/v3/projects/3");
        assert_eq!(payload["_links"]["type"]["href"], "/api/v3/types/5");
        assert!(payload["_links"].get("status").is_none());
        assert!(payload["_links"].get("priority").is_none());
    }

    #[test]
    fn test_payload_optional_links() {
        let payload = WorkPackageRequest {
            status_id: Some(1),
            priority_id: Some(8),
            ..request()
        }
        .to_payload();

        assert_eq!(payload["_links"]["status"]["href"], "/api/v3/statuses/1");
        assert_eq!(payload["_links"]["priority"]["href"], "/api/v3/priorities/8");
    }

    #[test]
    fn test_attachment_link_payload() {
        let payload = attachment_link_payload("/api/v3/attachments/77");
        assert_eq!(
            payload,
            json!({ "_links": { "attachments": [ { "href": "/api/v3/attachments/77" } ] } })
        );
    }
}
