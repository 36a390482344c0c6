use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::Client;
use serde_json::Value as JsonValue;

use crate::error::{Error, Result};

/// Remote text-extraction backend for scanned/rendered documents. PDF inputs
/// go through here; Word documents are read locally and never touch it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OcrBackend: Send + Sync {
    async fn process(&self, content: &[u8], mime_type: &str) -> Result<String>;
}

/// Client for a Document-AI style processor endpoint:
/// `POST {endpoint}/v1/{processor}:process` with a base64 raw document,
/// answering `{ "document": { "text": ... } }`.
#[derive(Clone)]
pub struct DocumentAiClient {
    client: Client,
    endpoint: String,
    processor: String,
    access_token: String,
}

impl DocumentAiClient {
    pub fn new(endpoint: String, processor: String, access_token: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client for document backend");

        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            processor,
            access_token,
        }
    }
}

#[async_trait]
impl OcrBackend for DocumentAiClient {
    async fn process(&self, content: &[u8], mime_type: &str) -> Result<String> {
        let payload = serde_json::json!({
            "rawDocument": {
                "content": BASE64.encode(content),
                "mimeType": mime_type,
            }
        });

        let url = format!("{}/v1/{}:process", self.endpoint, self.processor);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::ParseFailed(format!("document backend request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::ParseFailed(format!(
                "document backend returned {status}: {detail}"
            )));
        }

        let body: JsonValue = response
            .json()
            .await
            .map_err(|e| Error::ParseFailed(format!("document backend sent malformed JSON: {e}")))?;

        let document = body
            .get("document")
            .ok_or_else(|| Error::ParseFailed("document backend response missing document".into()))?;

        Ok(document
            .get("text")
            .and_then(|t| t.as_str())
            .unwrap_or_default()
            .to_string())
    }
}
