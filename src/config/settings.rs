// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::utils::retry_policy::RetryPolicy;

/// 默认 User-Agent（桌面版 Chrome）
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// 应用程序配置设置
///
/// 包含输入、输出、HTTP、代理、重试、并发控制和字段提取等所有配置项。
/// 在启动时构建一次，之后以引用或所有权的方式传入各组件。
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 输入配置
    pub input: InputSettings,
    /// 输出配置
    pub output: OutputSettings,
    /// HTTP配置
    pub http: HttpSettings,
    /// 代理配置
    pub proxy: ProxySettings,
    /// 重试配置
    pub retry: RetrySettings,
    /// 并发控制配置
    pub concurrency: ConcurrencySettings,
    /// 字段提取配置
    pub extraction: ExtractionSettings,
}

/// 输入配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct InputSettings {
    /// 输入表格文件路径 (CSV)
    pub path: String,
    /// URL 所在列的列名
    pub url_column: String,
    /// 是否去除重复 URL
    pub deduplicate: bool,
}

/// 输出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    /// 输出 CSV 文件路径
    pub path: String,
}

/// HTTP配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    /// 请求使用的 User-Agent
    pub user_agent: String,
    /// 单次请求超时时间（秒）
    pub timeout_secs: u64,
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 代理配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ProxySettings {
    /// 是否启用代理
    pub enabled: bool,
    /// 代理协议 (http, https)
    pub scheme: String,
    /// 代理地址 (host:port)
    pub host: String,
    /// 代理用户名
    pub username: Option<String>,
    /// 代理密码
    pub password: Option<String>,
}

impl ProxySettings {
    /// 代理地址（不含凭据）
    ///
    /// 凭据通过 basic auth 单独设置，避免出现在日志中。
    pub fn url(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }

    /// 是否配置了认证凭据
    pub fn has_credentials(&self) -> bool {
        self.username.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// 重试配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    /// 每个 URL 的最大尝试次数
    pub max_attempts: u32,
    /// 初始退避时间（秒）
    pub backoff_secs: f64,
    /// 退避乘数 (1.0 表示固定间隔)
    pub backoff_multiplier: f64,
    /// 最大退避时间（秒）
    pub max_backoff_secs: f64,
    /// 抖动因子 (0.0-1.0)
    pub jitter_factor: f64,
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        RetryPolicy {
            max_attempts: settings.max_attempts,
            initial_backoff: secs_to_duration(settings.backoff_secs),
            max_backoff: secs_to_duration(settings.max_backoff_secs),
            backoff_multiplier: settings.backoff_multiplier.max(1.0),
            jitter_factor: settings.jitter_factor.clamp(0.0, 1.0),
        }
    }
}

/// 秒数转换为 Duration，超出范围时取 `Duration::MAX`
fn secs_to_duration(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or(Duration::MAX)
}

/// 并发控制配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ConcurrencySettings {
    /// 同时处理的最大 URL 数量
    pub max_in_flight: usize,
}

/// 字段提取配置设置
///
/// 每个字段对应一个 CSS 选择器
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionSettings {
    /// 名称（必需字段）
    pub name_selector: String,
    /// 标语
    pub tagline_selector: String,
    /// 简介段落
    pub about_selector: String,
    /// 市场标签
    pub market_tags_selector: String,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            name_selector: "h1.profile-name".to_string(),
            tagline_selector: "p.profile-tagline".to_string(),
            about_selector: "div.profile-description p".to_string(),
            market_tags_selector: "div.markets-list a.market-item".to_string(),
        }
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、`config/default`、`config/{APP_ENVIRONMENT}` 以及
    /// `HARVESTRS__` 前缀的环境变量，后者覆盖前者。
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载并校验的配置
    /// * `Err(ConfigError)` - 配置加载或校验失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::with_defaults(Config::builder())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("HARVESTRS").separator("__"));

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn with_defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let extraction = ExtractionSettings::default();
        builder
            // Default input / output
            .set_default("input.path", "input.csv")?
            .set_default("input.url_column", "main href")?
            .set_default("input.deduplicate", false)?
            .set_default("output.path", "f6s_scraping.csv")?
            // Default HTTP settings
            .set_default("http.user_agent", DEFAULT_USER_AGENT)?
            .set_default("http.timeout_secs", 15)?
            // Default proxy settings
            .set_default("proxy.enabled", false)?
            .set_default("proxy.scheme", "http")?
            .set_default("proxy.host", "shared-datacenter.geonode.com:9000")?
            // Default retry settings (fixed 2s backoff)
            .set_default("retry.max_attempts", 10)?
            .set_default("retry.backoff_secs", 2.0)?
            .set_default("retry.backoff_multiplier", 1.0)?
            .set_default("retry.max_backoff_secs", 60.0)?
            .set_default("retry.jitter_factor", 0.0)?
            // Default concurrency settings
            .set_default("concurrency.max_in_flight", 50)?
            // Default selectors
            .set_default("extraction.name_selector", extraction.name_selector)?
            .set_default("extraction.tagline_selector", extraction.tagline_selector)?
            .set_default("extraction.about_selector", extraction.about_selector)?
            .set_default(
                "extraction.market_tags_selector",
                extraction.market_tags_selector,
            )
    }

    /// 校验配置的取值范围
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input.path.trim().is_empty() {
            return Err(ConfigError::Message("input.path must not be empty".into()));
        }
        if self.output.path.trim().is_empty() {
            return Err(ConfigError::Message("output.path must not be empty".into()));
        }
        if self.concurrency.max_in_flight == 0 {
            return Err(ConfigError::Message(
                "concurrency.max_in_flight must be at least 1".into(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Message(
                "retry.max_attempts must be at least 1".into(),
            ));
        }
        for (key, secs) in [
            ("retry.backoff_secs", self.retry.backoff_secs),
            ("retry.max_backoff_secs", self.retry.max_backoff_secs),
        ] {
            if Duration::try_from_secs_f64(secs).is_err() {
                return Err(ConfigError::Message(format!(
                    "{key} must be a finite, non-negative number of seconds (got {secs})"
                )));
            }
        }
        if !self.retry.backoff_multiplier.is_finite() || self.retry.backoff_multiplier < 1.0 {
            return Err(ConfigError::Message(
                "retry.backoff_multiplier must be a finite number >= 1.0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.retry.jitter_factor) {
            return Err(ConfigError::Message(
                "retry.jitter_factor must be between 0.0 and 1.0".into(),
            ));
        }
        if self.proxy.enabled && !matches!(self.proxy.scheme.as_str(), "http" | "https") {
            return Err(ConfigError::Message(format!(
                "proxy.scheme must be http or https (got {})",
                self.proxy.scheme
            )));
        }
        if self.proxy.enabled && self.proxy.host.trim().is_empty() {
            return Err(ConfigError::Message(
                "proxy.host is required when the proxy is enabled".into(),
            ));
        }
        Ok(())
    }

    /// 该配置对应的重试策略
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from(&self.retry)
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
