/*!
 * Core translation service implementation.
 *
 * This module contains the `TextTranslator` boundary used by the pipeline
 * and `TranslationService`, which implements it on top of the configured
 * provider: one numbered-list request per language job, with strict
 * count and order verification of the reply.
 */

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use std::time::Instant;

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::{ProviderError, TranslationError};
use crate::providers::anthropic::{Anthropic, AnthropicRequest};
use crate::providers::mock::{MockProvider, MockRequest};
use crate::providers::ollama::{ChatMessage, ChatRequest, Ollama};
use crate::providers::openai::{OpenAI, OpenAIRequest};
use crate::providers::Provider;

use super::formatting::{number_lines, parse_numbered_response};
use super::prompts::{build_user_prompt, PromptTemplate};

/// The translation boundary: an ordered list of texts in, the same number
/// of translated texts out, in the same order
#[async_trait]
pub trait TextTranslator: Send + Sync {
    /// Translate `texts` into the language called `language_name`
    async fn translate_batch(&self, texts: &[String], language_name: &str) -> Result<Vec<String>, TranslationError>;
}

/// Translation provider implementation variants
#[derive(Debug)]
enum TranslationProviderImpl {
    /// Ollama LLM service
    Ollama {
        /// Client instance
        client: Ollama,
    },

    /// OpenAI API service
    OpenAI {
        /// Client instance
        client: OpenAI,
    },

    /// LM Studio local server (OpenAI-compatible)
    LMStudio {
        /// Client instance (OpenAI-compatible)
        client: OpenAI,
    },

    /// Anthropic API service
    Anthropic {
        /// Client instance
        client: Anthropic,
    },

    /// Scripted provider for tests
    Mock {
        /// Client instance
        client: MockProvider,
    },
}

/// Translation service backed by an LLM provider
#[derive(Debug)]
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,

    /// System prompt template
    prompt: PromptTemplate,
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(config: TranslationConfig) -> Result<Self> {
        let timeout_secs = config.get_timeout_secs();
        let provider = match config.provider {
            ConfigTranslationProvider::Ollama => TranslationProviderImpl::Ollama {
                client: Ollama::new(&config.get_endpoint(), timeout_secs)?,
            },
            ConfigTranslationProvider::OpenAI => TranslationProviderImpl::OpenAI {
                client: OpenAI::new(config.get_api_key(), config.get_endpoint(), timeout_secs),
            },
            ConfigTranslationProvider::LMStudio => {
                // LM Studio often doesn't require an API key; use a default if empty
                let api_key = {
                    let k = config.get_api_key();
                    if k.is_empty() { "lm-studio".to_string() } else { k }
                };
                TranslationProviderImpl::LMStudio {
                    client: OpenAI::new(api_key, config.get_endpoint(), timeout_secs),
                }
            }
            ConfigTranslationProvider::Anthropic => TranslationProviderImpl::Anthropic {
                client: Anthropic::new(config.get_api_key(), config.get_endpoint(), timeout_secs),
            },
        };

        let prompt = PromptTemplate::new(&config.common.system_prompt);
        Ok(Self { provider, config, prompt })
    }

    /// Create a service that talks to a mock provider instead of the network
    pub fn with_mock(config: TranslationConfig, client: MockProvider) -> Self {
        let prompt = PromptTemplate::new(&config.common.system_prompt);
        Self {
            provider: TranslationProviderImpl::Mock { client },
            config,
            prompt,
        }
    }

    /// Name of the provider in use
    pub fn provider_name(&self) -> &str {
        match &self.provider {
            TranslationProviderImpl::Mock { .. } => "Mock",
            _ => self.config.provider.display_name(),
        }
    }

    /// Send one system/user prompt pair and return the reply text
    async fn request_completion(&self, system_prompt: &str, user_prompt: &str, language_name: &str) -> Result<String, ProviderError> {
        let model = self.config.get_model();
        let temperature = self.config.common.temperature;
        let max_tokens = self.config.common.max_tokens;

        match &self.provider {
            TranslationProviderImpl::Ollama { client } => {
                let request = ChatRequest::new(
                    model,
                    vec![
                        ChatMessage::new("system", system_prompt),
                        ChatMessage::new("user", user_prompt),
                    ],
                )
                .temperature(temperature)
                .num_predict(i32::try_from(max_tokens).unwrap_or(i32::MAX))
                .no_stream();
                let response = client.complete(request).await?;
                debug!(
                    "Ollama usage: prompt={:?} completion={:?}",
                    response.prompt_eval_count, response.eval_count
                );
                Ok(Ollama::extract_text(&response))
            }
            TranslationProviderImpl::OpenAI { client } | TranslationProviderImpl::LMStudio { client } => {
                let request = OpenAIRequest::new(model)
                    .add_message("system", system_prompt)
                    .add_message("user", user_prompt)
                    .temperature(temperature)
                    .max_tokens(max_tokens);
                let response = client.complete(request).await?;
                if let Some(usage) = &response.usage {
                    debug!(
                        "OpenAI-compatible usage: prompt={} completion={}",
                        usage.prompt_tokens, usage.completion_tokens
                    );
                }
                Ok(OpenAI::extract_text(&response))
            }
            TranslationProviderImpl::Anthropic { client } => {
                let request = AnthropicRequest::new(model, max_tokens)
                    .system(system_prompt)
                    .add_message("user", user_prompt)
                    .temperature(temperature);
                let response = client.complete(request).await?;
                debug!(
                    "Anthropic usage: input={} output={}",
                    response.usage.input_tokens, response.usage.output_tokens
                );
                Ok(Anthropic::extract_text(&response))
            }
            TranslationProviderImpl::Mock { client } => {
                let request = MockRequest {
                    system_prompt: system_prompt.to_string(),
                    user_prompt: user_prompt.to_string(),
                    target_language: language_name.to_string(),
                };
                let response = client.complete(request).await?;
                Ok(MockProvider::extract_text(&response))
            }
        }
    }
}

#[async_trait]
impl TextTranslator for TranslationService {
    async fn translate_batch(&self, texts: &[String], language_name: &str) -> Result<Vec<String>, TranslationError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let start_time = Instant::now();
        let system_prompt = self.prompt.render(language_name);
        let user_prompt = build_user_prompt(&number_lines(texts), language_name);

        let reply = self
            .request_completion(&system_prompt, &user_prompt, language_name)
            .await?;
        debug!(
            "{} answered for {} in {:?}",
            self.provider_name(),
            language_name,
            start_time.elapsed()
        );

        parse_numbered_response(&reply, texts.len())
    }
}
