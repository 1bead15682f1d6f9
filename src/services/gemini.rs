//! Gemini `generateContent` client used as the spelling corrector.

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;

use super::{Corrector, Service, ServiceError, ensure_success, http_client, trim_base_url};

pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Placeholder replaced by the text under review.
pub const TEXT_PLACEHOLDER: &str = "{text}";

pub const DEFAULT_PROMPT: &str = "Dame solo el texto corregido (en español), sin explicaciones ni comillas. Si el texto está bien, devolvelo igual. Texto: {text}";

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

pub struct GeminiCorrector {
    http: Client,
    api_url: String,
    api_key: String,
    model: String,
    prompt_template: String,
}

impl GeminiCorrector {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        prompt_template: impl Into<String>,
    ) -> Result<Self, ServiceError> {
        Ok(Self {
            http: http_client(Service::Gemini)?,
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            prompt_template: prompt_template.into(),
        })
    }

    fn generate_url(&self) -> String {
        let model = self.model.trim_start_matches("models/");
        format!(
            "{}/v1beta/models/{}:generateContent",
            trim_base_url(&self.api_url),
            model
        )
    }
}

impl Corrector for GeminiCorrector {
    fn correct(&self, text: &str) -> Result<String, ServiceError> {
        let prompt = render_prompt(&self.prompt_template, text);
        let body = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });

        let response = self
            .http
            .post(self.generate_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .map_err(|source| ServiceError::transport(Service::Gemini, source))?;
        let response = ensure_success(Service::Gemini, response)?;

        let generated: GenerateResponse = response
            .json()
            .map_err(|e| ServiceError::decode(Service::Gemini, e))?;
        let reply = first_text(generated).ok_or_else(|| {
            ServiceError::decode(Service::Gemini, "response has no text candidate")
        })?;
        Ok(clean_reply(&reply))
    }
}

pub fn render_prompt(template: &str, text: &str) -> String {
    template.replace(TEXT_PLACEHOLDER, text)
}

/// Strip surrounding whitespace, then surrounding double quotes.
pub fn clean_reply(reply: &str) -> String {
    reply.trim().trim_matches('"').to_string()
}

fn first_text(response: GenerateResponse) -> Option<String> {
    response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .find_map(|part| part.text)
}
