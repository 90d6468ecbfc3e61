//! OpenAI 兼容的 LlmClient 实现：基于 async-openai，日志中的 API key 做掩码处理。

use std::sync::Arc;

use anyhow::Result;
use async_openai::{config::OpenAIConfig, types::CreateChatCompletionRequestArgs, Client};
use async_trait::async_trait;
use prompt::ChatMessage;
use tracing::instrument;

use super::{chat_message_to_openai, LlmClient, LlmConfig};

/// 日志用 API key 掩码：前 7 个字符 + "***" + 后 4 个字符。
/// 长度 <= 11 的 key 整体替换为 "***"。
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 || !token.is_char_boundary(7) || !token.is_char_boundary(len - 4) {
        return "***".to_string();
    }
    format!("{}***{}", &token[..7], &token[len - 4..])
}

/// 基于 OpenAI 兼容 chat completions 接口的 LlmClient 实现。
#[derive(Clone)]
pub struct OpenAILlmClient {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
    masked_key: String,
}

impl OpenAILlmClient {
    pub fn new(api_key: String) -> Self {
        let masked_key = mask_token(&api_key);
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Arc::new(Client::with_config(config)),
            model: "gpt-4o-mini".to_string(),
            masked_key,
        }
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let masked_key = mask_token(&api_key);
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        Self {
            client: Arc::new(Client::with_config(config)),
            model: "gpt-4o-mini".to_string(),
            masked_key,
        }
    }

    /// 从任意 [`LlmConfig`]（api key、base url、model）构建客户端。
    pub fn from_config(config: &dyn LlmConfig) -> Self {
        Self::with_base_url(config.api_key().to_string(), config.base_url().to_string())
            .with_model(config.model().to_string())
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmClient for OpenAILlmClient {
    #[instrument(skip(self, messages), fields(model = %self.model))]
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let openai_messages = messages
            .iter()
            .map(chat_message_to_openai)
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(
            message_count = openai_messages.len(),
            api_key = %self.masked_key,
            "chat completion request"
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .messages(openai_messages)
            .build()?;

        if let Ok(json) = serde_json::to_string(&request) {
            tracing::debug!(request_json = %json, "chat completion request JSON");
        }

        let response = self.client.chat().create(request).await?;

        if let Some(ref u) = response.usage {
            tracing::info!(
                prompt_tokens = u.prompt_tokens,
                completion_tokens = u.completion_tokens,
                total_tokens = u.total_tokens,
                "chat completion usage"
            );
        }

        match response.choices.first() {
            Some(choice) => Ok(choice.message.content.clone().unwrap_or_default()),
            None => anyhow::bail!("No choices in chat completion response"),
        }
    }
}
