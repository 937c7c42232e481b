//! One generic "remote generation call": every tool reduces its input to a
//! [`Generation`] and hands it to a [`GenerativeService`].

use std::pin::Pin;

use async_trait::async_trait;
use base64::Engine;
use futures::{Stream, StreamExt};

use crate::gemini::GeminiError;
use crate::schema::ResponseShape;

/// Ordered text fragments of a streaming reply.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, GeminiError>> + Send>>;

pub const MAX_IMAGES: usize = 5;
const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// An image attachment, decoded from the browser's data URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ImagePayload {
    /// Accepts `data:<mime>;base64,<payload>` or a bare base64 payload.
    pub fn from_data_url(input: &str) -> Result<Self, String> {
        let (header, encoded) = match input.split_once(',') {
            Some((header, encoded)) if header.starts_with("data:") => (Some(header), encoded),
            Some(_) => return Err("malformed data URL".into()),
            None => (None, input),
        };
        let data = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| format!("image is not valid base64: {e}"))?;
        if data.is_empty() {
            return Err("image payload is empty".into());
        }
        let declared = header
            .and_then(|h| h.strip_prefix("data:"))
            .and_then(|h| h.split(';').next())
            .filter(|m| m.starts_with("image/"))
            .map(str::to_string);
        let mime_type = declared
            .or_else(|| image::guess_format(&data).ok().map(|f| f.to_mime_type().to_string()))
            .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string());
        Ok(Self { mime_type, data })
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }
}

/// A single request to the generative service.
#[derive(Debug, Clone)]
pub enum Generation {
    Structured { prompt: String, shape: ResponseShape },
    Streaming { prompt: String, system: String },
    Vision { images: Vec<ImagePayload>, prompt: String, shape: ResponseShape },
}

impl Generation {
    pub fn kind(&self) -> &'static str {
        match self {
            Generation::Structured { .. } => "structured",
            Generation::Streaming { .. } => "streaming",
            Generation::Vision { .. } => "vision",
        }
    }

    pub fn is_streaming(&self) -> bool { matches!(self, Generation::Streaming { .. }) }
}

#[async_trait]
pub trait GenerativeService: Send + Sync {
    /// Returns the raw JSON text of a schema-constrained reply.
    async fn generate_json(&self, prompt: &str, shape: &ResponseShape) -> Result<String, GeminiError>;

    async fn analyze_images(
        &self,
        images: &[ImagePayload],
        prompt: &str,
        shape: &ResponseShape,
    ) -> Result<String, GeminiError>;

    async fn stream_text(&self, prompt: &str, system: &str) -> Result<TextStream, GeminiError>;
}

/// Running concatenation of stream fragments.
#[derive(Debug, Default, Clone)]
pub struct TextAccumulator {
    text: String,
}

impl TextAccumulator {
    pub fn push(&mut self, fragment: &str) -> &str {
        self.text.push_str(fragment);
        &self.text
    }

    pub fn into_text(self) -> String { self.text }
}

/// Folds a fragment stream in arrival order, reporting `(fragment, accumulated)`
/// after every fragment. Stops at the first error.
pub async fn drive_stream<F>(mut stream: TextStream, mut on_fragment: F) -> Result<String, GeminiError>
where
    F: FnMut(&str, &str),
{
    let mut acc = TextAccumulator::default();
    while let Some(item) = stream.next().await {
        let fragment = item?;
        let text = acc.push(&fragment);
        on_fragment(&fragment, text);
    }
    Ok(acc.into_text())
}


#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use pretty_assertions::assert_eq;

    const PNG_1X1: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    fn fragments(items: &[&str]) -> TextStream {
        let items: Vec<Result<String, GeminiError>> = items.iter().map(|s| Ok(s.to_string())).collect();
        Box::pin(stream::iter(items))
    }

    #[tokio::test]
    async fn stream_fold_reports_intermediate_text() {
        let mut snapshots = Vec::new();
        let text = drive_stream(fragments(&["Hello ", "world"]), |fragment, acc| {
            snapshots.push((fragment.to_string(), acc.to_string()));
        })
        .await
        .unwrap();

        assert_eq!(text, "Hello world");
        assert_eq!(
            snapshots,
            vec![
                ("Hello ".to_string(), "Hello ".to_string()),
                ("world".to_string(), "Hello world".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn stream_fold_stops_on_error() {
        let items: Vec<Result<String, GeminiError>> = vec![
            Ok("partial".into()),
            Err(GeminiError::Http("connection reset".into())),
            Ok("never".into()),
        ];
        let mut seen = 0;
        let result = drive_stream(Box::pin(stream::iter(items)), |_, _| seen += 1).await;
        assert!(matches!(result, Err(GeminiError::Http(_))));
        assert_eq!(seen, 1);
    }

    #[test]
    fn accumulator_appends_in_order() {
        let mut acc = TextAccumulator::default();
        assert_eq!(acc.push("a"), "a");
        assert_eq!(acc.push(""), "a");
        assert_eq!(acc.push("bc"), "abc");
        assert_eq!(acc.into_text(), "abc");
    }

    #[test]
    fn data_url_keeps_declared_mime() {
        let payload = ImagePayload::from_data_url(&format!("data:image/png;base64,{PNG_1X1}")).unwrap();
        assert_eq!(payload.mime_type, "image/png");
        assert_eq!(payload.to_base64(), PNG_1X1);
    }

    #[test]
    fn bare_base64_is_sniffed() {
        let payload = ImagePayload::from_data_url(PNG_1X1).unwrap();
        assert_eq!(payload.mime_type, "image/png");
    }

    #[test]
    fn unknown_bytes_default_to_jpeg() {
        let payload = ImagePayload::from_data_url("data:application/octet-stream;base64,AAECAw==").unwrap();
        assert_eq!(payload.mime_type, "image/jpeg");
        assert_eq!(payload.data, vec![0, 1, 2, 3]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(ImagePayload::from_data_url("data:image/png;base64,@@@").is_err());
        assert!(ImagePayload::from_data_url("data:image/png;base64,").is_err());
        assert!(ImagePayload::from_data_url("http://x,y").is_err());
    }
}
