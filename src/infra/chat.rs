use reqwest::{
    Client,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::{DEFAULT_CHAT_MODEL, ProviderConfig};
use crate::error::{AppError, AppResult};
use crate::infra::prompt::{CHAT_SYSTEM_PROMPT, chat_prompt, strip_code_fence};

/// Sent when no key is configured; local servers such as Ollama ignore it but
/// still expect the header.
pub const PLACEHOLDER_API_KEY: &str = "ollama";

/// Client for endpoints implementing the OpenAI chat-completions protocol.
pub struct ChatCompletionClient {
    http: Client,
}

impl ChatCompletionClient {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    fn endpoint(base_url: &str) -> String {
        format!("{}/chat/completions", base_url.trim_end_matches('/'))
    }

    fn auth_header(api_key: &str) -> String {
        let token = match api_key.trim() {
            "" => PLACEHOLDER_API_KEY,
            key => key,
        };
        format!("Bearer {token}")
    }

    pub async fn extract(&self, text: &str, config: &ProviderConfig) -> AppResult<Value> {
        let url = Self::endpoint(&config.base_url);
        let model = match config.model.trim() {
            "" => DEFAULT_CHAT_MODEL,
            model => model,
        };
        debug!(%url, model, "requesting chat completion");

        let prompt = chat_prompt(text);
        let request_body = ChatCompletionRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: CHAT_SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            stream: false,
        };

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, Self::auth_header(&config.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|err| AppError::Provider(format!("failed to call {url}: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::Provider(format!(
                "chat endpoint responded with {status}: {body}"
            )));
        }

        let payload: ChatCompletionResponse = response.json().await.map_err(|err| {
            AppError::MalformedResponse(format!("failed to parse chat completion: {err}"))
        })?;

        let content = payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                AppError::MalformedResponse("chat completion has no message content".to_string())
            })?;

        serde_json::from_str(strip_code_fence(&content)).map_err(|err| {
            AppError::MalformedResponse(format!("model reply is not JSON: {err}"))
        })
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}
