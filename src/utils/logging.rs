/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// 初始化全局日志
///
/// `RUST_LOG` 优先；否则默认 `info`，`verbose` 时为 `debug`。
/// 重复初始化会被忽略（测试中会多次调用）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// 不输出 API key
pub fn log_startup(config: &Config) {
    let op = &config.openproject;
    info!("{}", "=".repeat(60));
    info!("🚀 OpenProject 反馈服务启动");
    info!("🌐 实例地址: {}", op.base_url());
    info!(
        "📁 默认项目: {}",
        op.project_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "(未设置)".to_string())
    );
    info!("🏷️ 默认类型: {} / 默认状态: {}", op.type_name, op.status_name);
    if op.accept_invalid_certs {
        info!("⚠️ 已关闭证书校验");
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
