use std::collections::HashSet;
use std::sync::Arc;
use async_trait::async_trait;
use http::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::clients::HttpClient;
use crate::config::{LlmConfig, Settings};
use crate::error::{Error, Result};
use crate::models::Enrichment;

const KEYWORD_DELIMITERS: [char; 3] = ['&', '|', '-'];

/// A single-shot chat completion.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, system: &str, user: &str, max_tokens: u32) -> Result<String>;
}

/// OpenAI-compatible `/chat/completions` client.
pub struct OpenAiChat {
    http: HttpClient,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiChat {
    pub fn new(http: HttpClient, config: &LlmConfig, api_key: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiChat {
    async fn complete(&self, system: &str, user: &str, max_tokens: u32) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            max_tokens,
            temperature: self.temperature,
        };

        let builder = self.http.post_json(&self.endpoint, &request)?
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key));
        let response: ChatResponse = self.http.send_json(builder).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(Error::UnexpectedPayload("empty completion".to_string()));
        }
        Ok(content)
    }
}

/// Translates listing text and derives keywords, degrading to local fallbacks.
#[derive(Clone)]
pub struct Translator {
    model: Option<Arc<dyn ChatModel>>,
    config: LlmConfig,
}

impl Translator {
    pub fn new(model: Option<Arc<dyn ChatModel>>, config: LlmConfig) -> Self {
        Self { model, config }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let model = match settings.credentials.openai_api_key.as_deref() {
            Some(key) => {
                let chat = OpenAiChat::new(HttpClient::plain()?, &settings.llm, key);
                info!(model = %settings.llm.model, "Language model client ready");
                Some(Arc::new(chat) as Arc<dyn ChatModel>)
            }
            None => {
                warn!("OPENAI_API_KEY is not set, translations and keywords will use fallbacks");
                None
            }
        };
        Ok(Self::new(model, settings.llm.clone()))
    }

    /// Returns the translation, or `text` unchanged when the model is unavailable or fails.
    pub async fn translate(&self, text: &str) -> Enrichment<String> {
        let Some(model) = &self.model else {
            return Enrichment::fallback(text.to_string(), "language model unavailable");
        };
        if text.trim().is_empty() {
            return Enrichment::fallback(text.to_string(), "nothing to translate");
        }

        match model
            .complete(&self.config.translate_prompt, text, self.config.translate_max_tokens)
            .await
        {
            Ok(translated) => Enrichment::Fresh(translated),
            Err(e) => {
                warn!(error = %e, "Translation failed, keeping original text");
                Enrichment::fallback(text.to_string(), e.to_string())
            }
        }
    }

    pub async fn keywords(&self, name: &str, tagline: &str, description: &str) -> Enrichment<String> {
        let Some(model) = &self.model else {
            return Enrichment::fallback(fallback_keywords(name, tagline), "language model unavailable");
        };

        let prompt = format!(
            "根据以下内容生成适合的中文关键词，用英文逗号分隔开：\n\n产品名称：{name}\n\n标语：{tagline}\n\n描述：{description}"
        );

        match model
            .complete(&self.config.keyword_prompt, &prompt, self.config.keyword_max_tokens)
            .await
        {
            Ok(keywords) => Enrichment::Fresh(normalize_keywords(&keywords)),
            Err(e) => {
                warn!(product = name, error = %e, "Keyword generation failed, using local fallback");
                Enrichment::fallback(fallback_keywords(name, tagline), e.to_string())
            }
        }
    }
}

/// A model answer without commas is treated as whitespace-separated keywords.
fn normalize_keywords(keywords: &str) -> String {
    if keywords.contains(',') {
        keywords.to_string()
    } else {
        keywords.split_whitespace().collect::<Vec<_>>().join(", ")
    }
}

/// Splits name and tagline on `&`, `|`, `-` and `,`, then rejoins the distinct trimmed tokens.
/// Tokens keep their first-occurrence order.
pub fn fallback_keywords(name: &str, tagline: &str) -> String {
    let combined = format!("{name}, {tagline}");
    let mut seen = HashSet::new();

    combined
        .split(|c: char| c == ',' || KEYWORD_DELIMITERS.contains(&c))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter(|token| seen.insert(*token))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_answers_are_comma_joined() {
        assert_eq!(normalize_keywords("隐私 AI 去中心化"), "隐私, AI, 去中心化");
        assert_eq!(normalize_keywords("隐私,AI"), "隐私,AI");
    }

    #[test]
    fn fallback_drops_empty_and_duplicate_tokens() {
        assert_eq!(fallback_keywords("Venice", "Venice | AI -"), "Venice, AI");
    }
}
