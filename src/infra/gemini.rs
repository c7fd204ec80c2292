use reqwest::{Client, header::CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::infra::prompt::{strip_code_fence, structured_prompt};

pub const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for the Gemini `generateContent` API with a schema-constrained reply.
pub struct GeminiClient {
    http: Client,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(http: Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/models/{model}:generateContent",
            self.endpoint.trim_end_matches('/')
        )
    }

    pub async fn extract(&self, text: &str, api_key: &str, model: &str) -> AppResult<Value> {
        let url = self.generate_url(model);
        debug!(%url, model, "requesting structured generation");

        let request_body = json!({
            "contents": [{ "parts": [{ "text": structured_prompt(text) }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": ticket_schema(),
            },
        });

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|err| AppError::Provider(format!("failed to call Gemini: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::Provider(format!(
                "Gemini responded with {status}: {body}"
            )));
        }

        let payload: GenerateContentResponse = response.json().await.map_err(|err| {
            AppError::MalformedResponse(format!("failed to parse Gemini response: {err}"))
        })?;

        let reply = payload.first_text().ok_or_else(|| {
            AppError::MalformedResponse("Gemini response has no text candidate".to_string())
        })?;

        serde_json::from_str(strip_code_fence(&reply)).map_err(|err| {
            AppError::MalformedResponse(format!("model reply is not JSON: {err}"))
        })
    }
}

/// Response schema: every field a string, `type` limited to the two transport
/// tags, and the five fields a card cannot do without marked required.
pub fn ticket_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "type": { "type": "STRING", "enum": ["TRAIN", "FLIGHT"] },
            "origin": { "type": "STRING" },
            "destination": { "type": "STRING" },
            "number": { "type": "STRING" },
            "date": { "type": "STRING" },
            "time": { "type": "STRING" },
            "passengerName": { "type": "STRING" },
            "gateOrSeat": { "type": "STRING" },
            "extraInfo": { "type": "STRING" },
        },
        "required": ["type", "origin", "destination", "date", "time"],
    })
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .find_map(|part| part.text)
    }
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}
