use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::fs;
use tracing::info;

use crate::error::{AppError, AppResult, FileError};
use crate::models::feedback::{AttachmentFile, FeedbackSubmission, Submitter};
use crate::models::work_package::WorkPackageOverrides;

/// TOML 格式的反馈文件
///
/// ```toml
/// subject = "保存按钮无响应"
/// description = "点击保存后页面没有变化"
/// url = "https://app.example.com/settings"
/// screenshot = "shot.png"
///
/// [submitter]
/// id = "7"
/// name = "Alice"
/// email = "alice@example.com"
///
/// [overrides]
/// type_name = "Bug"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackFile {
    pub subject: String,
    pub description: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    /// 缺省时使用加载时间
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub submitter: Option<Submitter>,
    /// 截图路径，相对路径以 TOML 文件所在目录为基准
    #[serde(default)]
    pub screenshot: Option<PathBuf>,
    #[serde(default)]
    pub overrides: WorkPackageOverrides,
}

impl FeedbackFile {
    /// 转换为反馈对象，附件内容需另行读取
    fn into_parts(self) -> (FeedbackSubmission, WorkPackageOverrides, Option<PathBuf>) {
        let mut submission = FeedbackSubmission::new(self.subject, self.description);
        if self.timestamp.is_some() {
            submission = submission.with_timestamp(self.timestamp);
        }
        submission.url = self.url;
        submission.user_agent = self.user_agent;
        submission.submitter = self.submitter;
        (submission, self.overrides, self.screenshot)
    }
}

/// 从 TOML 文件加载反馈，并读取截图内容
pub async fn load_feedback_file(
    path: &Path,
) -> AppResult<(FeedbackSubmission, WorkPackageOverrides)> {
    let display = path.display().to_string();
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(&display, e))?;

    let file: FeedbackFile =
        toml::from_str(&content).map_err(|e| AppError::toml_parse_failed(&display, e))?;
    let (mut submission, overrides, screenshot) = file.into_parts();

    if let Some(screenshot) = screenshot {
        let screenshot_path = match path.parent() {
            Some(dir) if screenshot.is_relative() => dir.join(&screenshot),
            _ => screenshot,
        };
        let attachment = read_attachment(&screenshot_path).await?;
        info!(
            "已读取截图 {} ({} 字节)",
            attachment.filename,
            attachment.content.len()
        );
        submission = submission.with_attachment(attachment);
    }

    Ok((submission, overrides))
}

async fn read_attachment(path: &Path) -> AppResult<AttachmentFile> {
    let display = path.display().to_string();
    if !path.exists() {
        return Err(AppError::File(FileError::NotFound { path: display }));
    }

    let content = fs::read(path)
        .await
        .map_err(|e| AppError::file_read_failed(&display, e))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "screenshot".to_string());

    Ok(AttachmentFile::new(filename, content))
}
