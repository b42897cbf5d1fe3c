//! # OpenProject Feedback
//!
//! 把用户反馈（标题、描述、截图、页面地址、提交人）提交为 OpenProject 工作项
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有 HTTP 客户端，只暴露能力
//! - `HttpTransport` - GET / POST / PATCH / multipart 上传
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每个能力只做一件事
//! - `ConnectivityProbe` - 连接探测
//! - `ResourceResolver` - 类型名 / 状态名解析
//! - `AttachmentUploader` - 两阶段附件上传
//! - `format_description` - markdown 描述拼装
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一条反馈"的完整处理流程
//! - `WorkPackageFlow` - 流程编排（解析 → 创建 → 附件）
//!
//! ## 模块结构

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::{Config, FormConfig, OpenProjectConfig};
pub use error::{AppError, AppResult};
pub use infrastructure::{HttpResponse, HttpTransport, ReqwestTransport};
pub use models::{
    AttachmentFile, AttachmentOutcome, FeedbackSubmission, OperationOutcome, ProbeOutcome,
    Submitter, WorkPackageOverrides,
};
pub use workflow::WorkPackageFlow;
