use async_trait::async_trait;
use bytes::Bytes;
use futures::{stream, StreamExt};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, info};

use crate::config::Config;
use crate::generation::{GenerativeService, ImagePayload, TextStream};
use crate::schema::ResponseShape;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")] Http(String),
    #[error("missing API credential: set GEMINI_API_KEY")] Credential,
    #[error("undecodable reply: {0}")] Decode(String),
}

// Helper function to truncate base64 data in JSON for cleaner logging
fn truncate_base64_in_json(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                if key == "data" {
                    if let Value::String(s) = val {
                        if s.len() > 100 && s.chars().all(|c| c.is_alphanumeric() || c == '+' || c == '/' || c == '=') {
                            *val = Value::String(format!("{}...[truncated {} chars]", &s[..50], s.len() - 50));
                        }
                    }
                } else {
                    truncate_base64_in_json(val);
                }
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                truncate_base64_in_json(val);
            }
        }
        _ => {}
    }
}

fn preview(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }

    fn endpoint(&self, method: &str, query: &str) -> Result<(String, &str), GeminiError> {
        let key = self.api_key.as_deref().ok_or(GeminiError::Credential)?;
        Ok((format!("{}/models/{}:{}?{}key={}", self.base_url, self.model, method, query, key), key))
    }

    async fn post(&self, method: &str, query: &str, body: &Value) -> Result<reqwest::Response, GeminiError> {
        let (url, key) = self.endpoint(method, query)?;
        info!("🔗 Making request to: {}", url.replace(key, "***"));

        let mut logged = body.clone();
        truncate_base64_in_json(&mut logged);
        info!("📤 Request body: {}", serde_json::to_string_pretty(&logged).unwrap_or_default());

        let response = self.client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| GeminiError::Http(e.to_string()))?;

        let status = response.status();
        info!("📥 Response status: {}", status);

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!("❌ API Error response: {}", error_body);
            return Err(GeminiError::Http(format!("status={} body={}", status, error_body)));
        }
        Ok(response)
    }

    async fn generate_content(&self, parts: Vec<Value>, shape: &ResponseShape) -> Result<String, GeminiError> {
        let body = json!({
            "contents": [{ "parts": parts }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": shape.to_gemini_schema(),
            }
        });

        let response = self.post("generateContent", "", &body).await?;
        let response_text = response.text().await.map_err(|e| GeminiError::Http(e.to_string()))?;
        info!("📥 Raw Gemini API response ({} chars): {}", response_text.len(), preview(&response_text, 1000));

        let parsed: GeminiResponse = serde_json::from_str(&response_text)
            .map_err(|e| GeminiError::Decode(format!("parse error: {}", e)))?;
        let text = parsed.text();
        if text.is_empty() {
            return Err(GeminiError::Decode("no text content found in response".into()));
        }
        info!("✅ {} reply decoded ({} chars)", shape.name, text.len());
        Ok(text)
    }
}

#[async_trait]
impl GenerativeService for GeminiClient {
    async fn generate_json(&self, prompt: &str, shape: &ResponseShape) -> Result<String, GeminiError> {
        info!("🎯 Structured generation for {} with prompt (truncated): {}", shape.name, preview(prompt, 120));
        self.generate_content(vec![json!({ "text": prompt })], shape).await
    }

    async fn analyze_images(
        &self,
        images: &[ImagePayload],
        prompt: &str,
        shape: &ResponseShape,
    ) -> Result<String, GeminiError> {
        info!("🖼️ Vision generation for {} with {} image(s)", shape.name, images.len());
        let mut parts: Vec<Value> = images
            .iter()
            .map(|img| json!({ "inlineData": { "mimeType": img.mime_type, "data": img.to_base64() } }))
            .collect();
        parts.push(json!({ "text": prompt }));
        self.generate_content(parts, shape).await
    }

    async fn stream_text(&self, prompt: &str, system: &str) -> Result<TextStream, GeminiError> {
        info!("🌊 Streaming generation with prompt (truncated): {}", preview(prompt, 120));
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "systemInstruction": { "parts": [{ "text": system }] },
        });

        let response = self.post("streamGenerateContent", "alt=sse&", &body).await?;

        // `None` marks the end of the body so a trailing event still gets flushed.
        let mut decoder = SseDecoder::default();
        let chunks = response
            .bytes_stream()
            .map(Some)
            .chain(stream::once(async { None }));
        let events = chunks.map(move |chunk: Option<Result<Bytes, reqwest::Error>>| {
            let decoded = match chunk {
                Some(Ok(bytes)) => decoder.push(&bytes),
                Some(Err(e)) => Err(GeminiError::Http(e.to_string())),
                None => decoder.finish().map(|last| last.into_iter().collect()),
            };
            match decoded {
                Ok(events) => events.into_iter().map(Ok).collect::<Vec<_>>(),
                Err(e) => vec![Err(e)],
            }
        });
        let fragments = events
            .flat_map(stream::iter)
            .filter_map(|event: Result<String, GeminiError>| async move {
                match event {
                    Ok(data) => match serde_json::from_str::<GeminiResponse>(&data) {
                        Ok(parsed) => {
                            let text = parsed.text();
                            (!text.is_empty()).then_some(Ok(text))
                        }
                        Err(e) => Some(Err(GeminiError::Decode(format!("stream event: {}", e)))),
                    },
                    Err(e) => Some(Err(e)),
                }
            });
        Ok(Box::pin(fragments))
    }
}

/// Splits a server-sent-event byte stream into `data:` payloads.
/// Lines may arrive split across network chunks, including inside a UTF-8 sequence.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<String>, GeminiError> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(event) = self.line(&line)? {
                events.push(event);
            }
        }
        Ok(events)
    }

    /// Call once the body has ended: emits an event left open by a missing blank line.
    pub fn finish(&mut self) -> Result<Option<String>, GeminiError> {
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            self.line(&rest)?;
        }
        Ok(self.flush())
    }

    fn line(&mut self, raw: &[u8]) -> Result<Option<String>, GeminiError> {
        let line = std::str::from_utf8(raw)
            .map_err(|e| GeminiError::Decode(format!("stream line is not UTF-8: {}", e)))?;
        let line = line.trim_end_matches(['\n', '\r']);
        if line.is_empty() {
            return Ok(self.flush());
        }
        if let Some(data) = line.strip_prefix("data:") {
            self.data.push(data.strip_prefix(' ').unwrap_or(data).to_string());
        }
        Ok(None)
    }

    fn flush(&mut self) -> Option<String> {
        if self.data.is_empty() {
            return None;
        }
        let event = self.data.join("\n");
        self.data.clear();
        Some(event)
    }
}

// --- Response Parsing Helpers ---

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GeminiResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .filter_map(|p| match p {
                        Part::Text { text } => Some(text.as_str()),
                        Part::Other(_) => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate { #[serde(default)] content: Content }

#[derive(Debug, Deserialize, Default)]
struct Content { #[serde(default)] parts: Vec<Part> }

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    Other(Value),
}
