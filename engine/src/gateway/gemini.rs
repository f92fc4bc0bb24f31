use super::{system_instruction, AiGateway, GatewayError};
use crate::config::GatewayConfig;
use crate::portfolio::ProfileContext;
use crate::secrets::SecretString;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Google Gemini `generateContent` client.
pub struct GeminiGateway {
    base_url: String,
    model: String,
    api_key: SecretString,
    client: reqwest::Client,
}

impl GeminiGateway {
    pub fn new(config: &GatewayConfig, api_key: SecretString) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            client,
        })
    }
}

#[async_trait]
impl AiGateway for GeminiGateway {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn check_health(&self) -> bool {
        !self.api_key.unsecure().is_empty()
    }

    async fn query(&self, prompt: &str, profile: &ProfileContext) -> super::Result<String> {
        let payload = json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": prompt}]
            }],
            "systemInstruction": {
                "parts": [{"text": system_instruction(profile)}]
            }
        });
        self.generate(&payload).await
    }

    async fn complete(&self, prompt: &str) -> super::Result<String> {
        let payload = json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": prompt}]
            }]
        });
        self.generate(&payload).await
    }
}

impl GeminiGateway {
    async fn generate(&self, payload: &serde_json::Value) -> super::Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url,
            self.model,
            self.api_key.unsecure()
        );

        debug!(model = %self.model, "sending gemini query");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                400 | 404 => GatewayError::InvalidRequest(text),
                429 => GatewayError::RateLimited,
                401 | 403 => GatewayError::Authentication(text),
                _ => GatewayError::Unavailable(format!("Gemini API error ({}): {}", status, text)),
            });
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))?;

        let parts = data
            .get("candidates")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .and_then(|candidate| candidate.get("content"))
            .and_then(|content| content.get("parts"))
            .and_then(|p| p.as_array())
            .ok_or_else(|| GatewayError::Parse("No candidate content in response".to_string()))?;

        let full_text: String = parts
            .iter()
            .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
            .collect();

        if full_text.trim().is_empty() {
            return Err(GatewayError::EmptyResponse);
        }

        Ok(full_text)
    }
}
