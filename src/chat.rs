//! One-shot chat completion for the `ai` tool.
//!
//! A single user message goes out; the first choice's content comes back.
//! No conversation history, no streaming, no retry.

use crate::config::ChatConfig;
use crate::error::Md2NotionError;
use crate::prompts::build_prompt;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// The model's answer.
#[derive(Debug, Clone)]
pub struct ChatReply {
    /// Reply text, surrounding whitespace trimmed.
    pub content: String,
    pub duration_ms: u64,
}

/// Send `prompt` to the configured provider.
pub async fn ask(prompt: &str, config: &ChatConfig) -> Result<ChatReply, Md2NotionError> {
    let provider = resolve_provider(config)?;
    ask_with(provider.as_ref(), prompt, config).await
}

/// Send `prompt` to an already constructed provider.
pub async fn ask_with(
    provider: &dyn LLMProvider,
    prompt: &str,
    config: &ChatConfig,
) -> Result<ChatReply, Md2NotionError> {
    let start = Instant::now();
    let messages = build_messages(prompt, config);
    let options = build_options(config);

    info!("Asking {} ({} chars)", config.model, messages[0].content.len());
    let response = provider
        .chat(&messages, Some(&options))
        .await
        .map_err(|e| Md2NotionError::LlmApiError {
            message: e.to_string(),
        })?;

    let duration = start.elapsed();
    debug!(
        "{} input tokens, {} output tokens, {:?}",
        response.prompt_tokens, response.completion_tokens, duration
    );

    Ok(ChatReply {
        content: response.content.trim().to_string(),
        duration_ms: duration.as_millis() as u64,
    })
}

/// Use the injected provider, else build one by name.
///
/// The factory reads the provider's API key (`OPENAI_API_KEY`, ...) from
/// the environment; the binary has already verified it is present.
fn resolve_provider(config: &ChatConfig) -> Result<Arc<dyn LLMProvider>, Md2NotionError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    ProviderFactory::create_llm_provider(&config.provider_name, &config.model).map_err(|e| {
        Md2NotionError::ProviderNotConfigured {
            provider: config.provider_name.clone(),
            hint: format!("{e}"),
        }
    })
}

/// The single user message sent for `prompt`.
fn build_messages(prompt: &str, config: &ChatConfig) -> Vec<ChatMessage> {
    vec![ChatMessage::user(build_prompt(prompt, config.brief))]
}

fn build_options(config: &ChatConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgequake_llm::{ChatRole, MockProvider};

    #[test]
    fn build_options_defaults_to_provider_settings() {
        let opts = build_options(&ChatConfig::default());
        assert_eq!(opts.temperature, None);
        assert_eq!(opts.max_tokens, None);
    }

    #[test]
    fn build_options_passes_overrides() {
        let config = ChatConfig::builder()
            .temperature(0.2)
            .max_tokens(512)
            .build()
            .unwrap();
        let opts = build_options(&config);
        assert_eq!(opts.temperature, Some(0.2));
        assert_eq!(opts.max_tokens, Some(512));
    }

    #[test]
    fn one_user_message_with_brief_suffix() {
        let messages = build_messages("  what is a monad? ", &ChatConfig::default());
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[0].content, "what is a monad?\n\nAnswer briefly.");
    }

    #[test]
    fn no_brief_sends_prompt_unchanged() {
        let config = ChatConfig::builder().brief(false).build().unwrap();
        let messages = build_messages("what is a monad?", &config);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "what is a monad?");
    }

    #[tokio::test]
    async fn reply_is_trimmed() {
        let provider = MockProvider::new();
        provider.add_response("  hello there \n").await;

        let reply = ask_with(&provider, "hi", &ChatConfig::default())
            .await
            .unwrap();
        assert_eq!(reply.content, "hello there");
    }

    #[tokio::test]
    async fn injected_provider_is_used_by_ask() {
        let provider = Arc::new(MockProvider::new());
        provider.add_response("**42**").await;
        let config = ChatConfig::builder()
            .provider(provider as Arc<dyn LLMProvider>)
            .build()
            .unwrap();

        let reply = ask("meaning of life", &config).await.unwrap();
        assert_eq!(reply.content, "**42**");
    }
}
