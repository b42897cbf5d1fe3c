//! 工作项创建流程 - 流程层
//!
//! 核心职责：定义"一条反馈"变成远端工作项的完整流程
//!
//! 流程顺序：
//! 1. 确定项目 → 2. 确定类型 → 3. 拼装描述 → 4. 确定状态（非致命）
//! 5. 组装请求体 → 6. 创建 → 7. 上传附件（跳过空文件） → 8. 返回结果

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::api::openproject::{work_package_view_url, Collection};
use crate::config::{Config, OpenProjectConfig};
use crate::error::{ApiError, AppError, AppResult};
use crate::infrastructure::{HttpTransport, ReqwestTransport};
use crate::models::feedback::FeedbackSubmission;
use crate::models::outcome::{CreatedWorkPackage, OperationFailure, OperationOutcome, ProbeOutcome};
use crate::models::work_package::{WorkPackageOverrides, WorkPackageRequest};
use crate::services::{format_description, AttachmentUploader, ConnectivityProbe, ResourceResolver};
use crate::utils::truncate_text;

/// 类型名的兜底值
pub const FALLBACK_TYPE_NAME: &str = "Bug";
/// 状态名兜底链：配置 / 覆盖的名称之后依次尝试
pub const FALLBACK_STATUS_NAMES: [&str; 2] = ["New", "Open"];
/// 标题为空时使用的占位标题
pub const UNTITLED_SUBJECT: &str = "Feedback without title";

/// 工作项创建流程
///
/// - 编排解析、创建、上传几个能力
/// - 所有远端调用按顺序执行，不重试
/// - 配置在构造时注入，运行期间只读
/// - 对外只返回 `OperationOutcome`
pub struct WorkPackageFlow {
    config: OpenProjectConfig,
    transport: Arc<dyn HttpTransport>,
    resolver: ResourceResolver,
    uploader: AttachmentUploader,
    probe: ConnectivityProbe,
}

impl WorkPackageFlow {
    /// 使用指定的传输层创建流程
    pub fn new(config: &OpenProjectConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config: config.clone(),
            resolver: ResourceResolver::new(Arc::clone(&transport)),
            uploader: AttachmentUploader::new(Arc::clone(&transport)),
            probe: ConnectivityProbe::new(Arc::clone(&transport)),
            transport,
        }
    }

    /// 使用 reqwest 传输层创建流程
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let transport = ReqwestTransport::new(&config.openproject)?;
        Ok(Self::new(&config.openproject, Arc::new(transport)))
    }

    /// 测试远端连接
    pub async fn probe(&self) -> ProbeOutcome {
        self.probe.probe().await
    }

    /// 创建工作项
    ///
    /// 内部任何未预期的错误都在这里转换成失败结果
    pub async fn create_work_package(
        &self,
        submission: &FeedbackSubmission,
        overrides: &WorkPackageOverrides,
    ) -> OperationOutcome {
        info!(
            "📤 创建工作项: {}",
            truncate_text(&submission.subject, 80)
        );

        match self.run(submission, overrides).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("❌ 创建工作项出错: {}", e);
                OperationOutcome::failure(format!("错误: {}", e))
            }
        }
    }

    async fn run(
        &self,
        submission: &FeedbackSubmission,
        overrides: &WorkPackageOverrides,
    ) -> AppResult<OperationOutcome> {
        // ========== 1. 项目 ==========
        let Some(project_id) = non_zero(overrides.project_id.or(self.config.project_id)) else {
            warn!("⚠️ 未配置项目 ID，放弃创建");
            return Ok(OperationOutcome::failure("必须提供项目 ID"));
        };

        // ========== 2. 类型 ==========
        // 覆盖的 ID > 覆盖的名称 > 配置的 ID > 配置的名称
        let explicit_type_id = match present(overrides.type_name.as_deref()) {
            Some(_) => non_zero(overrides.type_id),
            None => non_zero(overrides.type_id.or(self.config.type_id)),
        };
        let type_id = match explicit_type_id {
            Some(id) => id,
            None => {
                let type_name = self.type_name(overrides);
                match self.resolver.resolve_type_id(project_id, type_name).await {
                    Some(id) => id,
                    None => {
                        warn!("⚠️ 项目 {} 中找不到类型 \"{}\"", project_id, type_name);
                        return Ok(OperationOutcome::failure(format!(
                            "无法找到工作项类型: \"{}\"",
                            type_name
                        )));
                    }
                }
            }
        };

        // ========== 3. 描述 ==========
        let description = format_description(submission);

        // ========== 4. 状态（非致命） ==========
        let status_id = self.resolve_status(overrides).await;
        if status_id.is_none() {
            warn!("⚠️ 未能确定初始状态，将不带状态创建");
        }

        // ========== 5. 请求体 ==========
        let subject = if submission.subject.trim().is_empty() {
            UNTITLED_SUBJECT.to_string()
        } else {
            submission.subject.clone()
        };
        let request = WorkPackageRequest {
            project_id,
            type_id,
            status_id,
            priority_id: non_zero(overrides.priority_id),
            subject,
            description,
        };
        debug!("工作项请求: {:?}", request);

        // ========== 6. 创建 ==========
        let path = Collection::WorkPackages.path();
        let response = self
            .transport
            .post_json(&path, &request.to_payload())
            .await?;

        if !response.is_success() {
            warn!("⚠️ 创建工作项失败: {}", response.status);
            return Ok(OperationOutcome::Failure(OperationFailure {
                message: format!("创建工作项失败: {}", response.status),
                status: Some(response.status),
                raw_error: Some(response.json_or_text()),
            }));
        }

        let created = response.json_value().unwrap_or_default();
        let id = created
            .get("id")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| {
                AppError::Api(ApiError::MissingField {
                    endpoint: path.clone(),
                    field: "id",
                })
            })?;
        info!("✓ 工作项 #{} 创建成功", id);

        // ========== 7. 附件 ==========
        let mut attachments = Vec::with_capacity(submission.attachments.len());
        for attachment in &submission.attachments {
            if attachment.content.is_empty() {
                debug!("附件 {} 为空，跳过上传", attachment.filename);
                continue;
            }
            attachments.push(self.uploader.upload_and_link(id, attachment).await);
        }

        // ========== 8. 结果 ==========
        Ok(OperationOutcome::Success(CreatedWorkPackage {
            id,
            url: work_package_view_url(self.config.base_url(), id),
            attachments,
        }))
    }

    fn type_name<'a>(&'a self, overrides: &'a WorkPackageOverrides) -> &'a str {
        present(overrides.type_name.as_deref())
            .or_else(|| present(Some(self.config.type_name.as_str())))
            .unwrap_or(FALLBACK_TYPE_NAME)
    }

    /// 显式 ID > 覆盖 / 配置的名称 > "New" > "Open" > 无
    ///
    /// 名称按大小写不敏感去重，避免对同一名称重复查询
    async fn resolve_status(&self, overrides: &WorkPackageOverrides) -> Option<u64> {
        if let Some(id) = non_zero(overrides.status_id) {
            return Some(id);
        }

        let mut names: Vec<&str> = Vec::with_capacity(3);
        if let Some(name) = present(overrides.status_name.as_deref())
            .or_else(|| present(Some(self.config.status_name.as_str())))
        {
            names.push(name);
        }
        for fallback in FALLBACK_STATUS_NAMES {
            if !names.iter().any(|n| n.eq_ignore_ascii_case(fallback)) {
                names.push(fallback);
            }
        }

        for name in names {
            if let Some(id) = self.resolver.resolve_status_id(name).await {
                debug!("状态 \"{}\" -> {}", name, id);
                return Some(id);
            }
        }
        None
    }
}

/// 0 视为未提供
fn non_zero(id: Option<u64>) -> Option<u64> {
    id.filter(|id| *id != 0)
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
