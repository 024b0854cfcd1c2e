//! LLM Provider implementations for studentsim.
//!
//! All providers implement the `studentsim_core::Provider` trait.
//! [`build_from_config`] picks the backend named in the configuration.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

use std::sync::Arc;
use studentsim_config::AppConfig;
use studentsim_core::error::ProviderError;
use studentsim_core::provider::Provider;
use tracing::debug;

/// Build the chat-completion provider described by `config`.
///
/// Every supported backend speaks the OpenAI wire format, so the provider
/// name only decides whether an API key is mandatory. `ollama` runs locally
/// and needs none; everything else fails with `NotConfigured` when the key
/// is missing.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let api_key = match config.provider.as_str() {
        "ollama" => config.api_key.clone().unwrap_or_else(|| "ollama".into()),
        _ => config
            .require_api_key()
            .map_err(|e| ProviderError::NotConfigured(e.to_string()))?
            .to_string(),
    };

    let provider = OpenAiCompatProvider::new(config.provider.as_str(), config.api_url.as_str(), api_key)?;
    debug!(provider = %config.provider, url = %provider.base_url(), "Provider built");
    Ok(Arc::new(provider))
}
