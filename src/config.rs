use serde::Deserialize;
use std::collections::HashMap;
use config::{Config, Environment, File};
use tracing::debug;

use crate::error::{Error, Result};

pub const TRANSLATE_SYSTEM_PROMPT: &str = "你是世界上最专业的翻译工具，擅长英文和中文互译。你是一位精通英文和中文的专业翻译，尤其擅长将IT公司黑话和专业词汇翻译成简洁易懂的地道表达。你的任务是将以下内容翻译成地道的中文，风格与科普杂志或日常对话相似。";
pub const KEYWORD_SYSTEM_PROMPT: &str = "根据所提供的产品信息生成合适的中文关键词，关键词简单易懂，总数不超过5个关键词。关键词之间用逗号分隔。";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub producthunt: ProductHuntConfig,
    pub llm: LlmConfig,
    pub images: ImageConfig,
    pub display: DisplayConfig,
    pub coze: CozeConfig,
    pub wechat: WechatConfig,
    pub pipeline: PipelineConfig,
    #[serde(skip)]
    pub credentials: Credentials,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ProductHuntConfig {
    pub token_url: String,
    pub graphql_url: String,
    /// Fetched above the nominal list size so listings without images can be dropped.
    pub top_count: usize,
    pub headers: HashMap<String, String>,
    pub retry: RetryConfig,
}

impl Default for ProductHuntConfig {
    fn default() -> Self {
        let headers = HashMap::from([
            ("User-Agent".to_string(), "producthunt-daily/0.1".to_string()),
            ("Accept-Language".to_string(), "en-US,en;q=0.9,zh-CN;q=0.8,zh;q=0.7".to_string()),
        ]);
        Self {
            token_url: "https://api.producthunt.com/v2/oauth/token".to_string(),
            graphql_url: "https://api.producthunt.com/v2/api/graphql".to_string(),
            top_count: 6,
            headers,
            retry: RetryConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub translate_max_tokens: u32,
    pub keyword_max_tokens: u32,
    pub translate_prompt: String,
    pub keyword_prompt: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.deepseek.com/v1".to_string(),
            model: "deepseek-chat".to_string(),
            temperature: 0.7,
            translate_max_tokens: 500,
            keyword_max_tokens: 50,
            translate_prompt: TRANSLATE_SYSTEM_PROMPT.to_string(),
            keyword_prompt: KEYWORD_SYSTEM_PROMPT.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ImageConfig {
    pub scrape_timeout_secs: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self { scrape_timeout_secs: 10 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    pub utc_offset_hours: i32,
    pub time_format: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: 8,
            time_format: "%Y年%m月%d日 %p%I:%M (北京时间)".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CozeConfig {
    pub base_url: String,
    pub resume_data: String,
    pub max_resumes: usize,
}

impl Default for CozeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.coze.cn".to_string(),
            resume_data: "hey".to_string(),
            max_resumes: 8,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WechatConfig {
    pub upload_url: String,
    pub media_url: String,
}

impl Default for WechatConfig {
    fn default() -> Self {
        Self {
            upload_url: "https://api.weixin.qq.com/cgi-bin/media/upload".to_string(),
            media_url: "https://api.weixin.qq.com/cgi-bin/media/get".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct PipelineConfig {
    pub require_image: bool,
}

/// Secrets, read from the process environment under their conventional names.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub producthunt_developer_token: Option<String>,
    pub producthunt_client_id: Option<String>,
    pub producthunt_client_secret: Option<String>,
    pub coze_api_token: Option<String>,
    pub workflow_id: Option<String>,
    pub wechat_access_token: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        // Environment keys are lowercased, so OPENAI_API_KEY and coze_api_token land alike.
        let config = Config::builder()
            .add_source(Environment::default())
            .build()?;

        let credentials: Credentials = config.try_deserialize()?;
        Ok(credentials.normalized())
    }

    /// Blank values are treated as unset.
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            openai_api_key: clean(self.openai_api_key),
            producthunt_developer_token: clean(self.producthunt_developer_token),
            producthunt_client_id: clean(self.producthunt_client_id),
            producthunt_client_secret: clean(self.producthunt_client_secret),
            coze_api_token: clean(self.coze_api_token),
            workflow_id: clean(self.workflow_id),
            wechat_access_token: clean(self.wechat_access_token),
        }
    }

    pub fn require<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str> {
        value.as_deref().ok_or(Error::MissingCredential(name))
    }
}

impl Settings {
    pub fn new() -> Result<Self> {
        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;

        if let Ok(headers) = config.get_table("producthunt.headers") {
            debug!(
                ?headers,
                "Loaded Product Hunt headers from configuration"
            );
        }

        let mut settings: Settings = config.try_deserialize()?;
        settings.credentials = Credentials::from_env()?;

        debug!(
            top_count = settings.producthunt.top_count,
            model = %settings.llm.model,
            has_llm_key = settings.credentials.openai_api_key.is_some(),
            has_developer_token = settings.credentials.producthunt_developer_token.is_some(),
            "Parsed settings"
        );

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_daily_digest_conventions() {
        let settings = Settings::default();
        assert_eq!(settings.producthunt.top_count, 6);
        assert_eq!(settings.producthunt.retry.max_attempts, 3);
        assert_eq!(settings.llm.model, "deepseek-chat");
        assert_eq!(settings.llm.translate_max_tokens, 500);
        assert_eq!(settings.llm.keyword_max_tokens, 50);
        assert_eq!(settings.images.scrape_timeout_secs, 10);
        assert_eq!(settings.display.utc_offset_hours, 8);
        assert_eq!(settings.coze.base_url, "https://api.coze.cn");
        assert!(!settings.pipeline.require_image);
    }

    #[test]
    fn blank_credentials_are_dropped() {
        let credentials = Credentials {
            openai_api_key: Some("   ".to_string()),
            coze_api_token: Some(" pat_123 ".to_string()),
            ..Credentials::default()
        }
        .normalized();

        assert!(credentials.openai_api_key.is_none());
        assert_eq!(credentials.coze_api_token.as_deref(), Some("pat_123"));
    }

    #[test]
    fn require_reports_the_missing_name() {
        let err = Credentials::require(&None, "workflow_id").unwrap_err();
        assert!(matches!(err, Error::MissingCredential("workflow_id")));
    }
}
