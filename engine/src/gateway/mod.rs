//! AI Gateway
//!
//! Request/response capability used by the command router as its fallback
//! for unrecognized verbs, and by [`analysis`] for project write-ups. Transport, timeout and retry behavior
//! belong to the implementation; callers only see `Ok(text)` or a
//! [`GatewayError`].

use async_trait::async_trait;

use crate::portfolio::ProfileContext;

pub mod analysis;
pub mod gemini;

pub use analysis::analyze_project;
pub use gemini::GeminiGateway;

/// Result type for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors that can occur while querying the AI collaborator
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Gateway unavailable: {0}")]
    Unavailable(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Empty response from gateway")]
    EmptyResponse,
}

/// Style instruction sent ahead of the profile payload on every query.
const STYLE_PREFIX: &str = "You are a helpful AI assistant for a portfolio website. Your personality is professional but friendly. Answer questions based on this data about the portfolio owner";

const STYLE_SUFFIX: &str = "Keep your answers concise and conversational. If asked a question you cannot answer from the data, politely say you don't have that information.";

/// Build the constant system instruction for a profile.
pub fn system_instruction(profile: &ProfileContext) -> String {
    let data = serde_json::to_string_pretty(profile).unwrap_or_else(|_| "{}".to_string());
    format!(
        "{}, {}:\n{}\n{}",
        STYLE_PREFIX, profile.name, data, STYLE_SUFFIX
    )
}

/// The AI collaborator contract.
#[async_trait]
pub trait AiGateway: Send + Sync {
    /// Short provider name used in logs and `folio doctor`
    fn name(&self) -> &str;

    /// Ask one question. `prompt` is the raw command text, unmodified.
    async fn query(&self, prompt: &str, profile: &ProfileContext) -> Result<String>;

    /// Send a self-contained prompt with no system instruction.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Whether the gateway is configured well enough to attempt a query
    async fn check_health(&self) -> bool;
}

/// Gateway used when no provider is configured. Every query fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineGateway;

#[async_trait]
impl AiGateway for OfflineGateway {
    fn name(&self) -> &str {
        "offline"
    }

    async fn query(&self, _prompt: &str, _profile: &ProfileContext) -> Result<String> {
        Err(GatewayError::Unavailable(
            "no AI provider configured".to_string(),
        ))
    }

    async fn complete(&self, _prompt: &str) -> Result<String> {
        Err(GatewayError::Unavailable(
            "no AI provider configured".to_string(),
        ))
    }

    async fn check_health(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_instruction_embeds_profile() {
        let profile = ProfileContext::builtin();
        let instruction = system_instruction(&profile);
        assert!(instruction.starts_with(STYLE_PREFIX));
        assert!(instruction.contains("Shaik Nelofor:\n{"));
        assert!(instruction.contains("FoodLens"));
        assert!(instruction.ends_with(STYLE_SUFFIX));
    }

    #[tokio::test]
    async fn test_offline_gateway_always_fails() {
        let gateway = OfflineGateway;
        let result = gateway.query("whoami", &ProfileContext::builtin()).await;
        assert!(matches!(result, Err(GatewayError::Unavailable(_))));
        assert!(matches!(
            gateway.complete("analyze").await,
            Err(GatewayError::Unavailable(_))
        ));
        assert!(!gateway.check_health().await);
    }
}
