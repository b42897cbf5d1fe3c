use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::FormConfig;
use crate::error::ValidationError;

/// 提交时间的固定格式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 提交人
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submitter {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// 附件（截图）
#[derive(Clone, PartialEq, Eq)]
pub struct AttachmentFile {
    pub filename: String,
    pub content: Vec<u8>,
}

impl AttachmentFile {
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content,
        }
    }

    /// 向上取整的 KB 大小
    pub fn size_kb(&self) -> usize {
        self.content.len().div_ceil(1024)
    }

    /// 按文件头判断是否为 png / jpeg / gif / bmp / webp
    pub fn is_image(&self) -> bool {
        let content = self.content.as_slice();
        let webp = content.len() >= 12 && &content[..4] == b"RIFF" && &content[8..12] == b"WEBP";
        webp || IMAGE_SIGNATURES
            .iter()
            .any(|signature| content.starts_with(signature))
    }
}

impl std::fmt::Debug for AttachmentFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttachmentFile")
            .field("filename", &self.filename)
            .field("bytes", &self.content.len())
            .finish()
    }
}

/// 一次用户反馈
///
/// 由外部请求层构造，编排流程只读
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackSubmission {
    pub subject: String,
    pub description: String,
    /// 用户提交反馈时所在页面
    pub url: Option<String>,
    pub user_agent: Option<String>,
    pub timestamp: Option<String>,
    pub submitter: Option<Submitter>,
    pub attachments: Vec<AttachmentFile>,
}

impl FeedbackSubmission {
    /// 创建新的反馈，时间戳取当前本地时间
    pub fn new(subject: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            description: description.into(),
            url: None,
            user_agent: None,
            timestamp: Some(chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()),
            submitter: None,
            attachments: Vec::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: Option<String>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_submitter(mut self, submitter: Submitter) -> Self {
        self.submitter = Some(submitter);
        self
    }

    pub fn with_attachment(mut self, attachment: AttachmentFile) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// 按表单配置校验
    ///
    /// 截图功能关闭时丢弃附件而不是报错
    pub fn validate(mut self, form: &FormConfig) -> Result<Self, ValidationError> {
        check_text("subject", &self.subject, form.subject_max_length)?;
        check_text("description", &self.description, form.description_max_length)?;

        if let Some(url) = self.url.as_deref() {
            let len = url.chars().count();
            if len > form.url_max_length {
                return Err(ValidationError::TooLong {
                    field: "url",
                    actual: len,
                    max: form.url_max_length,
                });
            }
            if !is_http_url(url) {
                return Err(ValidationError::InvalidUrl(url.to_string()));
            }
        }

        if !form.screenshot_enabled {
            if !self.attachments.is_empty() {
                warn!("截图功能已关闭，丢弃 {} 个附件", self.attachments.len());
            }
            self.attachments.clear();
        }

        for attachment in &self.attachments {
            if attachment.size_kb() > form.screenshot_max_size_kb {
                return Err(ValidationError::AttachmentTooLarge {
                    filename: attachment.filename.clone(),
                    size_kb: attachment.size_kb(),
                    max_kb: form.screenshot_max_size_kb,
                });
            }
            if !attachment.is_image() {
                return Err(ValidationError::NotAnImage {
                    filename: attachment.filename.clone(),
                });
            }
        }

        Ok(self)
    }
}

/// 常见图片格式的文件头
const IMAGE_SIGNATURES: [&[u8]; 5] = [
    b"\x89PNG\r\n\x1a\n",
    b"\xFF\xD8\xFF",
    b"GIF87a",
    b"GIF89a",
    b"BM",
];

fn check_text(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::TooLong {
            field,
            actual: len,
            max,
        });
    }
    Ok(())
}

fn is_http_url(url: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
            && url.len() > scheme.len()
    })
}
