//! 附件上传服务 - 业务能力层
//!
//! 两阶段：先上传文件，再把文件关联到工作项。
//! 关联失败时不删除已上传的文件。

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::openproject::{self_href, Collection};
use crate::infrastructure::{FilePart, HttpTransport};
use crate::models::feedback::AttachmentFile;
use crate::models::outcome::AttachmentOutcome;
use crate::models::work_package::attachment_link_payload;

/// multipart 中文件字段名
const FILE_FIELD: &str = "file";

/// 附件上传服务
pub struct AttachmentUploader {
    transport: Arc<dyn HttpTransport>,
}

impl AttachmentUploader {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// 上传并关联一个附件
    ///
    /// 阶段 A 失败时不会进行阶段 B
    pub async fn upload_and_link(
        &self,
        work_package_id: u64,
        attachment: &AttachmentFile,
    ) -> AttachmentOutcome {
        let filename = attachment.filename.clone();

        let upload_href = match self.upload(attachment).await {
            Ok(href) => href,
            Err((status, message)) => {
                warn!("⚠️ 附件 {} 上传失败: {}", filename, message);
                return AttachmentOutcome::UploadFailed {
                    filename,
                    status,
                    message,
                };
            }
        };

        match self.link(work_package_id, &upload_href).await {
            Ok(()) => {
                info!("✓ 附件 {} 已关联到工作项 #{}", filename, work_package_id);
                AttachmentOutcome::Linked {
                    filename,
                    upload_href,
                }
            }
            Err((status, message)) => {
                warn!(
                    "⚠️ 附件 {} 关联失败: {} (文件已上传: {})",
                    filename, message, upload_href
                );
                AttachmentOutcome::LinkFailed {
                    filename,
                    upload_href,
                    status,
                    message,
                }
            }
        }
    }

    /// 阶段 A：上传文件，返回上传资源的 self href
    async fn upload(&self, attachment: &AttachmentFile) -> Result<String, (Option<u16>, String)> {
        let path = Collection::Uploads.path();
        let file = FilePart {
            field: FILE_FIELD,
            filename: &attachment.filename,
            bytes: &attachment.content,
        };

        let response = self
            .transport
            .post_multipart(&path, file)
            .await
            .map_err(|e| (None, format!("上传请求失败: {}", e)))?;

        if !response.is_success() {
            return Err((
                Some(response.status),
                format!("上传失败: {}", response.status),
            ));
        }

        response
            .json_value()
            .as_ref()
            .and_then(self_href)
            .map(str::to_string)
            .ok_or_else(|| {
                (
                    Some(response.status),
                    "上传响应缺少 _links.self.href".to_string(),
                )
            })
    }

    /// 阶段 B：PATCH 工作项，添加附件链接
    async fn link(&self, work_package_id: u64, upload_href: &str) -> Result<(), (Option<u16>, String)> {
        let path = Collection::WorkPackages.href(work_package_id);
        let response = self
            .transport
            .patch_json(&path, &attachment_link_payload(upload_href))
            .await
            .map_err(|e| (None, format!("关联请求失败: {}", e)))?;

        if response.is_success() {
            Ok(())
        } else {
            Err((
                Some(response.status),
                format!("关联附件失败: {}", response.status),
            ))
        }
    }
}
