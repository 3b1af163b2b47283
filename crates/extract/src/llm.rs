use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.cohere.ai";
pub const DEFAULT_MODEL: &str = "command-r";

#[derive(Clone)]
pub struct CohereClient {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    message: String,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    text: String,
}

impl CohereClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string(), api_key, model)
    }

    pub fn with_base_url(base_url: String, api_key: String, model: String) -> Self {
        Self {
            base_url,
            model,
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// Send one message to the chat endpoint and return the completion text.
    pub async fn chat(&self, message: &str) -> Result<String> {
        let url = format!("{}/v1/chat", self.base_url);

        let request = ChatRequest {
            model: self.model.clone(),
            message: message.to_string(),
            // Extraction wants determinism, not creativity.
            temperature: 0.0,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractError::Endpoint { status, body });
        }

        let chat_response: ChatResponse = response.json().await?;
        Ok(chat_response.text)
    }
}
