use std::time::Duration;

use crate::config::Config;

const PLACEHOLDER_KEY: &str = "your_gemini_api_key_here";
const MIN_KEY_LEN: usize = 20;
const EMPTY_CANDIDATE_REPLY: &str = "I'm here to support you. How are you feeling right now?";

/// Client for the hosted generative-language API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    api_url: String,
}

impl GeminiClient {
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
            api_url: config.gemini_api_url.trim_end_matches('/').to_string(),
        }
    }

    /// False for empty, short or placeholder keys; callers go straight to fallbacks.
    pub fn is_configured(&self) -> bool {
        self.api_key.len() >= MIN_KEY_LEN && self.api_key != PLACEHOLDER_KEY
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate(&self, system_prompt: &str, user_message: &str) -> Result<String, anyhow::Error> {
        if !self.is_configured() {
            anyhow::bail!("Gemini API key not configured");
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        let prompt = format!("{}\n\nUser message: {}", system_prompt, user_message);

        let response = client
            .post(format!("{}/models/{}:generateContent", self.api_url, self.model))
            .query(&[("key", self.api_key.as_str())])
            .json(&serde_json::json!({
                "contents": [{
                    "parts": [{ "text": prompt }]
                }],
                "generationConfig": {
                    "temperature": 0.7,
                    "topK": 40,
                    "topP": 0.95,
                    "maxOutputTokens": 1024,
                },
                "safetySettings": [
                    { "category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
                    { "category": "HARM_CATEGORY_HATE_SPEECH", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
                    { "category": "HARM_CATEGORY_SEXUALLY_EXPLICIT", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
                    { "category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
                ],
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error {}: {}", status, body);
        }

        let body: serde_json::Value = response.json().await?;
        let text = body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .unwrap_or(EMPTY_CANDIDATE_REPLY);

        Ok(text.to_string())
    }
}
