//! 操作结果
//!
//! 编排流程和连接探测对外只返回这里的类型，不向调用方抛出错误

use serde::Serialize;
use serde_json::Value;

/// 工作项创建结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "FeedbackResponse")]
pub enum OperationOutcome {
    Success(CreatedWorkPackage),
    Failure(OperationFailure),
}

/// 创建成功
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedWorkPackage {
    pub id: u64,
    /// 可在浏览器中打开的地址
    pub url: String,
    /// 每个附件的上传结果，不影响创建成功与否
    pub attachments: Vec<AttachmentOutcome>,
}

/// 失败：可读信息，以及远端状态码 / 响应体（如有）
#[derive(Debug, Clone, PartialEq)]
pub struct OperationFailure {
    pub message: String,
    pub status: Option<u16>,
    pub raw_error: Option<Value>,
}

/// 单个附件的两阶段上传结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum AttachmentOutcome {
    /// 上传并关联成功
    Linked { filename: String, upload_href: String },
    /// 阶段 A（上传）失败，未尝试关联
    UploadFailed {
        filename: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
        message: String,
    },
    /// 阶段 B（关联）失败，上传的文件可能残留在远端
    LinkFailed {
        filename: String,
        upload_href: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
        message: String,
    },
}

impl AttachmentOutcome {
    pub fn is_linked(&self) -> bool {
        matches!(self, AttachmentOutcome::Linked { .. })
    }
}

impl OperationOutcome {
    /// 只有信息的失败
    pub fn failure(message: impl Into<String>) -> Self {
        OperationOutcome::Failure(OperationFailure {
            message: message.into(),
            status: None,
            raw_error: None,
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OperationOutcome::Success(_))
    }

    pub fn created(&self) -> Option<&CreatedWorkPackage> {
        match self {
            OperationOutcome::Success(created) => Some(created),
            OperationOutcome::Failure(_) => None,
        }
    }

    pub fn failure_message(&self) -> Option<&str> {
        match self {
            OperationOutcome::Success(_) => None,
            OperationOutcome::Failure(failure) => Some(&failure.message),
        }
    }
}

/// 返回给请求层的 JSON 结构
///
/// `{success, message?, id?, url?, attachments?, status_code?, error?}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl From<OperationOutcome> for FeedbackResponse {
    fn from(outcome: OperationOutcome) -> Self {
        match outcome {
            OperationOutcome::Success(created) => Self {
                success: true,
                message: None,
                id: Some(created.id),
                url: Some(created.url),
                attachments: created.attachments,
                status_code: None,
                error: None,
            },
            OperationOutcome::Failure(failure) => Self {
                success: false,
                message: Some(failure.message),
                id: None,
                url: None,
                attachments: Vec::new(),
                status_code: failure.status,
                error: failure.raw_error,
            },
        }
    }
}

/// 连接探测结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// 第一个返回 2xx 的入口
    Reachable {
        endpoint: &'static str,
        status_code: u16,
        data: Value,
    },
    Unreachable { message: String },
}

impl ProbeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Reachable { .. })
    }
}
