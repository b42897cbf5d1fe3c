use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppError, AppResult, ConfigError, FileError};

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "OPENPROJECT_FEEDBACK_CONFIG";

/// 程序配置
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenProject 远端配置
    pub openproject: OpenProjectConfig,
    /// 反馈表单的校验上限
    pub form: FormConfig,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

/// OpenProject 远端配置，构造时注入，请求期间只读
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct OpenProjectConfig {
    /// 实例地址，例如 `https://openproject.example.com`
    pub url: String,
    pub api_key: Option<String>,
    pub project_id: Option<u64>,
    pub type_id: Option<u64>,
    pub type_name: String,
    pub status_name: String,
    /// 跳过证书校验，只能显式开启
    pub accept_invalid_certs: bool,
    pub request_timeout_secs: u64,
    pub upload_timeout_secs: u64,
}

impl Default for OpenProjectConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: None,
            project_id: None,
            type_id: None,
            type_name: "Bug".to_string(),
            status_name: "New".to_string(),
            accept_invalid_certs: false,
            request_timeout_secs: 30,
            upload_timeout_secs: 60,
        }
    }
}

impl OpenProjectConfig {
    /// 地址和 API key 都存在时才算配置完整
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
            && self
                .api_key
                .as_deref()
                .is_some_and(|key| !key.trim().is_empty())
    }

    /// 去掉末尾斜杠的实例地址
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }
}

/// 表单校验上限
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub subject_max_length: usize,
    pub description_max_length: usize,
    pub url_max_length: usize,
    pub screenshot_enabled: bool,
    /// 截图大小上限（KB）
    pub screenshot_max_size_kb: usize,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            subject_max_length: 255,
            description_max_length: 5000,
            url_max_length: 2000,
            screenshot_enabled: true,
            screenshot_max_size_kb: 5120,
        }
    }
}

impl Config {
    /// 优先读取 `OPENPROJECT_FEEDBACK_CONFIG` 指向的 TOML 文件，否则读取环境变量
    pub fn load() -> AppResult<Self> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_toml_file(Path::new(&path)),
            _ => Self::from_env(),
        }
    }

    /// 从环境变量读取，未设置的项使用默认值，格式错误时报错
    pub fn from_env() -> AppResult<Self> {
        let default = OpenProjectConfig::default();
        let form_default = FormConfig::default();
        let local_env = env_string("APP_ENV").is_some_and(|v| v == "local");

        Ok(Self {
            openproject: OpenProjectConfig {
                url: env_string("OPENPROJECT_URL").unwrap_or(default.url),
                api_key: env_string("OPENPROJECT_API_KEY"),
                project_id: env_parse("OPENPROJECT_PROJECT_ID", "u64")?,
                type_id: env_parse("OPENPROJECT_TYPE_ID", "u64")?,
                type_name: env_string("OPENPROJECT_TYPE_NAME").unwrap_or(default.type_name),
                status_name: env_string("OPENPROJECT_STATUS_NAME").unwrap_or(default.status_name),
                accept_invalid_certs: env_parse("OPENPROJECT_ACCEPT_INVALID_CERTS", "bool")?
                    .unwrap_or(local_env),
                request_timeout_secs: env_parse("OPENPROJECT_REQUEST_TIMEOUT_SECS", "u64")?
                    .unwrap_or(default.request_timeout_secs),
                upload_timeout_secs: env_parse("OPENPROJECT_UPLOAD_TIMEOUT_SECS", "u64")?
                    .unwrap_or(default.upload_timeout_secs),
            },
            form: FormConfig {
                subject_max_length: env_parse("FEEDBACK_SUBJECT_MAX_LENGTH", "usize")?
                    .unwrap_or(form_default.subject_max_length),
                description_max_length: env_parse("FEEDBACK_DESCRIPTION_MAX_LENGTH", "usize")?
                    .unwrap_or(form_default.description_max_length),
                url_max_length: env_parse("FEEDBACK_URL_MAX_LENGTH", "usize")?
                    .unwrap_or(form_default.url_max_length),
                screenshot_enabled: env_parse("FEEDBACK_SCREENSHOT_ENABLED", "bool")?
                    .unwrap_or(form_default.screenshot_enabled),
                screenshot_max_size_kb: env_parse("FEEDBACK_SCREENSHOT_MAX_SIZE_KB", "usize")?
                    .unwrap_or(form_default.screenshot_max_size_kb),
            },
            verbose_logging: env_parse("VERBOSE_LOGGING", "bool")?.unwrap_or(false),
        })
    }

    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let display = path.display().to_string();
        if !path.exists() {
            return Err(AppError::File(FileError::NotFound { path: display }));
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| AppError::file_read_failed(&display, e))?;
        Self::from_toml_str(&content).map_err(|e| AppError::toml_parse_failed(display, e))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str, expected_type: &str) -> AppResult<Option<T>> {
    let Some(value) = env_string(name) else {
        return Ok(None);
    };
    value.trim().parse().map(Some).map_err(|_| {
        AppError::Config(ConfigError::EnvVarParseFailed {
            var_name: name.to_string(),
            value,
            expected_type: expected_type.to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.openproject.type_name, "Bug");
        assert_eq!(config.openproject.status_name, "New");
        assert!(!config.openproject.accept_invalid_certs);
        assert_eq!(config.openproject.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.openproject.upload_timeout(), Duration::from_secs(60));
        assert_eq!(config.form.subject_max_length, 255);
        assert_eq!(config.form.screenshot_max_size_kb, 5120);
        assert!(!config.openproject.is_configured());
    }

    #[test]
    fn test_from_toml_partial() {
        let content = r#"
            verbose_logging = true

            [openproject]
            url = "https://op.example.com/"
            api_key = "secret"
            project_id = 3
            type_name = "Feature"

            [form]
            description_max_length = 100
        "#;

        let config = Config::from_toml_str(content).unwrap();
        assert!(config.verbose_logging);
        assert_eq!(config.openproject.base_url(), "https://op.example.com");
        assert_eq!(config.openproject.project_id, Some(3));
        assert_eq!(config.openproject.type_id, None);
        assert_eq!(config.openproject.type_name, "Feature");
        assert_eq!(config.openproject.status_name, "New");
        assert_eq!(config.form.description_max_length, 100);
        assert_eq!(config.form.subject_max_length, 255);
        assert!(config.openproject.is_configured());
    }

    #[test]
    fn test_blank_api_key_is_not_configured() {
        let config = OpenProjectConfig {
            url: "https://op.example.com".to_string(),
            api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(!config.is_configured());
    }

    #[test]
    fn test_env_parse_reports_bad_value() {
        std::env::set_var("OPENPROJECT_FEEDBACK_TEST_NUMBER", "abc");
        let err = env_parse::<u64>("OPENPROJECT_FEEDBACK_TEST_NUMBER", "u64").unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::EnvVarParseFailed { ref value, .. }) if value == "abc"
        ));

        std::env::set_var("OPENPROJECT_FEEDBACK_TEST_NUMBER", " 12 ");
        assert_eq!(
            env_parse::<u64>("OPENPROJECT_FEEDBACK_TEST_NUMBER", "u64").unwrap(),
            Some(12)
        );
        assert_eq!(
            env_parse::<u64>("OPENPROJECT_FEEDBACK_TEST_UNSET", "u64").unwrap(),
            None
        );
        std::env::remove_var("OPENPROJECT_FEEDBACK_TEST_NUMBER");
    }

    #[test]
    fn test_missing_config_file() {
        let err = Config::from_toml_file(Path::new("/nonexistent/feedback.toml")).unwrap_err();
        assert!(matches!(err, AppError::File(FileError::NotFound { .. })));
    }
}
