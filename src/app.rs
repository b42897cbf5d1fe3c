use std::path::Path;

use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppResult, ConfigError};
use crate::models::loaders::load_feedback_file;
use crate::models::outcome::{FeedbackResponse, OperationOutcome};
use crate::utils::logging::log_startup;
use crate::workflow::WorkPackageFlow;

/// 命令行命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 测试远端连接
    Probe,
    /// 提交一个 TOML 反馈文件
    Submit(String),
}

impl Command {
    /// 解析命令行参数（不含程序名）
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Option<Self> {
        let mut args = args.into_iter();
        match args.next()?.as_str() {
            "probe" => Some(Command::Probe),
            "submit" => args.next().map(Command::Submit),
            _ => None,
        }
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    flow: WorkPackageFlow,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> AppResult<Self> {
        log_startup(&config);

        if !config.openproject.is_configured() {
            return Err(ConfigError::NotConfigured.into());
        }

        let flow = WorkPackageFlow::from_config(&config)?;
        Ok(Self { config, flow })
    }

    /// 执行命令，返回是否成功
    pub async fn run(&self, command: Command) -> AppResult<bool> {
        match command {
            Command::Probe => {
                let outcome = self.flow.probe().await;
                println!("{}", serde_json::to_string_pretty(&outcome)?);
                Ok(outcome.is_success())
            }
            Command::Submit(path) => self.submit(Path::new(&path)).await,
        }
    }

    async fn submit(&self, path: &Path) -> AppResult<bool> {
        info!("📋 读取反馈文件: {}", path.display());
        let (submission, overrides) = load_feedback_file(path).await?;

        let outcome = match submission.validate(&self.config.form) {
            Ok(submission) => self.flow.create_work_package(&submission, &overrides).await,
            Err(e) => {
                warn!("⚠️ 反馈数据无效: {}", e);
                OperationOutcome::failure(format!("数据无效: {}", e))
            }
        };

        if let Some(created) = outcome.created() {
            let linked = created.attachments.iter().filter(|a| a.is_linked()).count();
            info!(
                "✓ 反馈已提交: {} (附件 {}/{})",
                created.url,
                linked,
                created.attachments.len()
            );
        }

        let success = outcome.is_success();
        let response = FeedbackResponse::from(outcome);
        println!("{}", serde_json::to_string_pretty(&response)?);
        Ok(success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(Command::parse(args(&["probe"])), Some(Command::Probe));
        assert_eq!(
            Command::parse(args(&["submit", "feedback.toml"])),
            Some(Command::Submit("feedback.toml".to_string()))
        );
        assert_eq!(Command::parse(args(&["submit"])), None);
        assert_eq!(Command::parse(args(&[])), None);
        assert_eq!(Command::parse(args(&["delete"])), None);
    }

    #[test]
    fn test_initialize_requires_configuration() {
        let err = App::initialize(Config::default()).err().unwrap();
        assert!(err.to_string().contains("未配置"));
    }
}
