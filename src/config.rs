//! Configuration types for uploading and chatting.
//!
//! Uploader credentials are read from the environment exactly once, at
//! process start, into [`Credentials`] and passed down by reference. The chat
//! tool only checks that its provider's key is present
//! ([`check_chat_credentials`]); the provider factory reads it itself.
//! Behaviour knobs live in [`UploadConfig`] and [`ChatConfig`], each built
//! through a builder that validates in `build()`.

use crate::error::Md2NotionError;
use crate::page_id::PageId;
use crate::progress::ProgressCallback;
use edgequake_llm::LLMProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Notion API root.
pub const DEFAULT_NOTION_API_URL: &str = "https://api.notion.com";

/// Value of the `Notion-Version` header the block shapes are written for.
pub const NOTION_VERSION: &str = "2022-06-28";

/// imgbb upload endpoint.
pub const DEFAULT_IMGBB_URL: &str = "https://api.imgbb.com/1/upload";

/// Chat model used when none is given.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o";

pub const NOTION_API_KEY_VAR: &str = "NOTION_API_KEY";
pub const IMGBB_API_KEY_VAR: &str = "IMGBB_API_KEY";
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const ANTHROPIC_API_KEY_VAR: &str = "ANTHROPIC_API_KEY";
pub const OPENROUTER_API_KEY_VAR: &str = "OPENROUTER_API_KEY";
pub const XAI_API_KEY_VAR: &str = "XAI_API_KEY";
pub const MISTRAL_API_KEY_VAR: &str = "MISTRAL_API_KEY";

// ── Credentials ──────────────────────────────────────────────────────────

/// API keys for the uploader.
#[derive(Clone)]
pub struct Credentials {
    pub notion_api_key: String,
    pub imgbb_api_key: String,
}

impl Credentials {
    pub fn new(notion_api_key: impl Into<String>, imgbb_api_key: impl Into<String>) -> Self {
        Self {
            notion_api_key: notion_api_key.into(),
            imgbb_api_key: imgbb_api_key.into(),
        }
    }

    /// Read `NOTION_API_KEY` and `IMGBB_API_KEY`.
    pub fn from_env() -> Result<Self, Md2NotionError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`Credentials::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Md2NotionError> {
        Ok(Self {
            notion_api_key: require(&lookup, NOTION_API_KEY_VAR)?,
            imgbb_api_key: require(&lookup, IMGBB_API_KEY_VAR)?,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("notion_api_key", &"<redacted>")
            .field("imgbb_api_key", &"<redacted>")
            .finish()
    }
}

/// Environment variable holding the API key `provider` needs, if it needs
/// exactly one.
///
/// Local providers (`ollama`, `lmstudio`, `mock`) need none. Providers with
/// several accepted variables (Gemini, Azure) or unknown names return `None`
/// and are left to the factory to report.
pub fn chat_api_key_var(provider: &str) -> Option<&'static str> {
    match provider.trim().to_lowercase().as_str() {
        "openai" => Some(OPENAI_API_KEY_VAR),
        "anthropic" | "claude" => Some(ANTHROPIC_API_KEY_VAR),
        "openrouter" | "open-router" => Some(OPENROUTER_API_KEY_VAR),
        "xai" | "grok" => Some(XAI_API_KEY_VAR),
        "mistral" | "mistral-ai" | "mistralai" => Some(MISTRAL_API_KEY_VAR),
        _ => None,
    }
}

/// Fail at startup when `provider`'s API key is missing or blank.
pub fn check_chat_credentials(provider: &str) -> Result<(), Md2NotionError> {
    check_chat_credentials_with(provider, |var| std::env::var(var).ok())
}

pub fn check_chat_credentials_with(
    provider: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), Md2NotionError> {
    match chat_api_key_var(provider) {
        Some(var) => require(&lookup, var).map(|_| ()),
        None => Ok(()),
    }
}

fn require(lookup: &impl Fn(&str) -> Option<String>, var: &str) -> Result<String, Md2NotionError> {
    match lookup(var) {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(Md2NotionError::MissingCredential {
            var: var.to_string(),
        }),
    }
}

// ── Policies ─────────────────────────────────────────────────────────────

/// What to do when a local image cannot be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MissingImagePolicy {
    /// Stop the run with [`Md2NotionError::MissingImage`]. (default)
    #[default]
    Abort,
    /// Log a warning and continue with the next line.
    Skip,
}

/// What to do with a `$$` group still open at end of file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnterminatedEquationPolicy {
    /// Drop the buffered lines. (default)
    #[default]
    Discard,
    /// Submit the buffered lines as an equation block anyway.
    Flush,
}

// ── Upload ───────────────────────────────────────────────────────────────

/// Configuration for one Markdown upload.
///
/// Built via [`UploadConfig::builder()`].
///
/// # Example
/// ```rust
/// use notion_md::{MissingImagePolicy, UploadConfig};
///
/// let config = UploadConfig::builder("0123456789abcdef0123456789abcdef")
///     .missing_image(MissingImagePolicy::Skip)
///     .build()
///     .unwrap();
/// assert_eq!(config.page_id.as_str(), "01234567-89ab-cdef-0123-456789abcdef");
/// ```
#[derive(Clone)]
pub struct UploadConfig {
    /// Target page, already in dashed form.
    pub page_id: PageId,

    /// Notion API root, without trailing slash. Default: [`DEFAULT_NOTION_API_URL`].
    pub notion_base_url: String,

    /// `Notion-Version` header. Default: [`NOTION_VERSION`].
    pub notion_version: String,

    /// imgbb upload endpoint. Default: [`DEFAULT_IMGBB_URL`].
    pub imgbb_url: String,

    /// Per-request timeout in seconds. Default: 60.
    pub request_timeout_secs: u64,

    /// Default: [`MissingImagePolicy::Abort`].
    pub missing_image: MissingImagePolicy,

    /// Default: [`UnterminatedEquationPolicy::Discard`].
    pub unterminated_equation: UnterminatedEquationPolicy,

    /// Optional per-line progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for UploadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadConfig")
            .field("page_id", &self.page_id)
            .field("notion_base_url", &self.notion_base_url)
            .field("notion_version", &self.notion_version)
            .field("imgbb_url", &self.imgbb_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("missing_image", &self.missing_image)
            .field("unterminated_equation", &self.unterminated_equation)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn UploadProgressCallback>"),
            )
            .finish()
    }
}

impl UploadConfig {
    /// Create a builder targeting `page_id` (any accepted shape, see [`PageId::parse`]).
    pub fn builder(page_id: impl AsRef<str>) -> UploadConfigBuilder {
        UploadConfigBuilder {
            config: Self {
                page_id: PageId::parse(page_id.as_ref()),
                notion_base_url: DEFAULT_NOTION_API_URL.to_string(),
                notion_version: NOTION_VERSION.to_string(),
                imgbb_url: DEFAULT_IMGBB_URL.to_string(),
                request_timeout_secs: 60,
                missing_image: MissingImagePolicy::default(),
                unterminated_equation: UnterminatedEquationPolicy::default(),
                progress_callback: None,
            },
        }
    }

    /// Full URL of the page's children collection.
    pub fn children_url(&self) -> String {
        format!(
            "{}/v1/blocks/{}/children",
            self.notion_base_url, self.page_id
        )
    }
}

/// Builder for [`UploadConfig`].
#[derive(Debug)]
pub struct UploadConfigBuilder {
    config: UploadConfig,
}

impl UploadConfigBuilder {
    pub fn notion_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.notion_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn notion_version(mut self, version: impl Into<String>) -> Self {
        self.config.notion_version = version.into();
        self
    }

    pub fn imgbb_url(mut self, url: impl Into<String>) -> Self {
        self.config.imgbb_url = url.into();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    pub fn missing_image(mut self, policy: MissingImagePolicy) -> Self {
        self.config.missing_image = policy;
        self
    }

    pub fn unterminated_equation(mut self, policy: UnterminatedEquationPolicy) -> Self {
        self.config.unterminated_equation = policy;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<UploadConfig, Md2NotionError> {
        let c = &self.config;
        if c.page_id.as_str().is_empty() {
            return Err(Md2NotionError::InvalidConfig(
                "Page id must not be empty".into(),
            ));
        }
        if c.notion_base_url.is_empty() || c.imgbb_url.is_empty() {
            return Err(Md2NotionError::InvalidConfig(
                "Endpoint URLs must not be empty".into(),
            ));
        }
        if c.request_timeout_secs == 0 {
            return Err(Md2NotionError::InvalidConfig(
                "Request timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Chat ─────────────────────────────────────────────────────────────────

/// Configuration for a single chat completion.
#[derive(Clone)]
pub struct ChatConfig {
    /// Model identifier. Default: [`DEFAULT_CHAT_MODEL`].
    pub model: String,

    /// Provider name handed to the provider factory. Default: "openai".
    pub provider_name: String,

    /// Pre-constructed provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Append a brief-answer instruction to the prompt. Default: true.
    pub brief: bool,

    /// Sampling temperature. Provider default when `None`.
    pub temperature: Option<f32>,

    /// Completion token cap. Provider default when `None`.
    pub max_tokens: Option<usize>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_CHAT_MODEL.to_string(),
            provider_name: "openai".to_string(),
            provider: None,
            brief: true,
            temperature: None,
            max_tokens: None,
        }
    }
}

impl fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("brief", &self.brief)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl ChatConfig {
    pub fn builder() -> ChatConfigBuilder {
        ChatConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ChatConfig`].
#[derive(Debug)]
pub struct ChatConfigBuilder {
    config: ChatConfig,
}

impl ChatConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = name.into();
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn brief(mut self, v: bool) -> Self {
        self.config.brief = v;
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = Some(t.clamp(0.0, 2.0));
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = Some(n);
        self
    }

    pub fn build(self) -> Result<ChatConfig, Md2NotionError> {
        if self.config.model.trim().is_empty() {
            return Err(Md2NotionError::InvalidConfig(
                "Model must not be empty".into(),
            ));
        }
        if self.config.max_tokens == Some(0) {
            return Err(Md2NotionError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn credentials_from_lookup() {
        let creds = Credentials::from_lookup(env(&[
            (NOTION_API_KEY_VAR, "secret_abc"),
            (IMGBB_API_KEY_VAR, " key "),
        ]))
        .unwrap();
        assert_eq!(creds.notion_api_key, "secret_abc");
        assert_eq!(creds.imgbb_api_key, "key");
    }

    #[test]
    fn missing_credential_is_fatal() {
        let err = Credentials::from_lookup(env(&[(NOTION_API_KEY_VAR, "x")])).unwrap_err();
        assert!(matches!(
            err,
            Md2NotionError::MissingCredential { ref var } if var == IMGBB_API_KEY_VAR
        ));
    }

    #[test]
    fn blank_credential_is_fatal() {
        let err =
            check_chat_credentials_with("openai", env(&[(OPENAI_API_KEY_VAR, "   ")])).unwrap_err();
        assert!(matches!(err, Md2NotionError::MissingCredential { .. }));
    }

    #[test]
    fn chat_key_follows_provider() {
        let only_anthropic = env(&[(ANTHROPIC_API_KEY_VAR, "sk-ant")]);
        assert!(check_chat_credentials_with("anthropic", &only_anthropic).is_ok());
        assert!(check_chat_credentials_with("Claude", &only_anthropic).is_ok());

        let err = check_chat_credentials_with("anthropic", env(&[(OPENAI_API_KEY_VAR, "sk")]))
            .unwrap_err();
        assert!(matches!(
            err,
            Md2NotionError::MissingCredential { ref var } if var == ANTHROPIC_API_KEY_VAR
        ));
    }

    #[test]
    fn local_providers_need_no_key() {
        for provider in ["ollama", "lmstudio", "mock"] {
            assert_eq!(chat_api_key_var(provider), None);
            assert!(check_chat_credentials_with(provider, env(&[])).is_ok());
        }
    }

    #[test]
    fn credentials_debug_is_redacted() {
        let creds = Credentials::new("secret_abc", "imgbb_xyz");
        let dbg = format!("{creds:?}");
        assert!(!dbg.contains("secret_abc"));
        assert!(!dbg.contains("imgbb_xyz"));
    }

    #[test]
    fn upload_defaults() {
        let c = UploadConfig::builder("0123456789abcdef0123456789abcdef")
            .build()
            .unwrap();
        assert_eq!(c.missing_image, MissingImagePolicy::Abort);
        assert_eq!(c.unterminated_equation, UnterminatedEquationPolicy::Discard);
        assert_eq!(c.notion_version, "2022-06-28");
        assert_eq!(
            c.children_url(),
            "https://api.notion.com/v1/blocks/01234567-89ab-cdef-0123-456789abcdef/children"
        );
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let c = UploadConfig::builder("abc")
            .notion_base_url("http://127.0.0.1:9999/")
            .build()
            .unwrap();
        assert_eq!(c.children_url(), "http://127.0.0.1:9999/v1/blocks/abc/children");
    }

    #[test]
    fn empty_page_id_is_rejected() {
        assert!(UploadConfig::builder("  ").build().is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(UploadConfig::builder("abc")
            .request_timeout_secs(0)
            .build()
            .is_err());
    }

    #[test]
    fn chat_defaults() {
        let c = ChatConfig::builder().build().unwrap();
        assert_eq!(c.model, "gpt-4o");
        assert!(c.brief);
        assert!(c.provider.is_none());
    }

    #[test]
    fn chat_temperature_is_clamped() {
        let c = ChatConfig::builder().temperature(5.0).build().unwrap();
        assert_eq!(c.temperature, Some(2.0));
    }

    #[test]
    fn chat_empty_model_is_rejected() {
        assert!(ChatConfig::builder().model(" ").build().is_err());
    }
}
