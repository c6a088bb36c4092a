use super::prompt::PromptMode;
use anyhow::{Context, Result};
use parking_lot::Mutex;
use reqwest::blocking::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o";

const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 3500;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub mode: PromptMode,
    pub system_prompt: String,
    pub user_prompt: String,
}

pub trait LLMClient: Send + Sync {
    fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

pub struct OpenAiLLMClient {
    endpoint: String,
    model: String,
    api_key: String,
    http: HttpClient,
}

impl OpenAiLLMClient {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("impossible d'initialiser le client HTTP pour le service de complétion")?;

        Ok(Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
            http,
        })
    }
}

impl LLMClient for OpenAiLLMClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let payload = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .context("appel HTTP au service de complétion impossible")?
            .error_for_status()
            .context("le service de complétion a renvoyé un statut d'erreur")?;

        let raw: ChatCompletionResponse = response
            .json()
            .context("réponse du service de complétion illisible")?;

        let choice = raw
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("réponse sans choix du service de complétion"))?;
        choice
            .message
            .content
            .ok_or_else(|| anyhow::anyhow!("réponse sans contenu du service de complétion"))
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Clone, Default)]
pub struct MockLLMClient {
    responses: Arc<Mutex<VecDeque<String>>>,
}

impl MockLLMClient {
    pub fn push_response(&self, response: impl Into<String>) {
        self.responses.lock().push_back(response.into());
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().len()
    }
}

impl LLMClient for MockLLMClient {
    fn complete(&self, _: &CompletionRequest) -> Result<String> {
        self.responses
            .lock()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("aucune réponse mock disponible"))
    }
}
