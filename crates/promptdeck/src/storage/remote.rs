use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use ureq::Agent;

use crate::error::{PromptdeckError, Result};
use crate::template::Template;

use super::TemplateStorage;

/// Template collection kept by a `promptdeck-server` instance
///
/// Uses the two collection endpoints: `GET /api/prompts` and
/// `POST /api/prompts`. Requests run on tokio's blocking pool.
#[derive(Clone)]
pub struct RemoteStorage {
    base_url: String,
    agent: Agent,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl RemoteStorage {
    /// Create a remote storage for the server at `base_url`
    /// (e.g. `http://localhost:3000`)
    pub fn new(base_url: impl Into<String>) -> Self {
        let config = Agent::config_builder().http_status_as_error(false).build();
        let base_url: String = base_url.into();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: Agent::new_with_config(config),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/prompts", self.base_url)
    }

    /// Server-provided error message, or the raw status when there is none
    fn error_message(status: u16, body: &str) -> String {
        serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.error)
            .unwrap_or_else(|_| format!("HTTP {}", status))
    }
}

#[async_trait]
impl TemplateStorage for RemoteStorage {
    async fn fetch_all(&self) -> Result<Vec<Template>> {
        let agent = self.agent.clone();
        let url = self.endpoint();
        debug!(url = %url, "fetching templates");

        let (status, body) = tokio::task::spawn_blocking(move || {
            let mut response = agent.get(&url).call()?;
            let status = response.status().as_u16();
            let body = response.body_mut().read_to_string()?;
            Ok::<_, ureq::Error>((status, body))
        })
        .await
        .map_err(|e| PromptdeckError::storage(format!("Request task failed: {}", e)))?
        .map_err(|e| PromptdeckError::storage(format!("Request failed: {}", e)))?;

        if !(200..300).contains(&status) {
            return Err(PromptdeckError::storage(Self::error_message(status, &body)));
        }

        serde_json::from_str(&body).map_err(|e| PromptdeckError::malformed_data(e.to_string()))
    }

    async fn replace_all(&self, templates: &[Template]) -> Result<()> {
        let payload = serde_json::to_string(templates)
            .map_err(|e| PromptdeckError::persist_failure(format!("Failed to serialize: {}", e)))?;
        let agent = self.agent.clone();
        let url = self.endpoint();
        debug!(url = %url, count = templates.len(), "saving templates");

        let (status, body) = tokio::task::spawn_blocking(move || {
            let mut response = agent
                .post(&url)
                .header("Content-Type", "application/json")
                .send(payload.as_bytes())?;
            let status = response.status().as_u16();
            let body = response.body_mut().read_to_string()?;
            Ok::<_, ureq::Error>((status, body))
        })
        .await
        .map_err(|e| PromptdeckError::persist_failure(format!("Request task failed: {}", e)))?
        .map_err(|e| PromptdeckError::persist_failure(format!("Request failed: {}", e)))?;

        if !(200..300).contains(&status) {
            return Err(PromptdeckError::persist_failure(Self::error_message(
                status, &body,
            )));
        }

        Ok(())
    }

    fn describe(&self) -> String {
        self.endpoint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let storage = RemoteStorage::new("http://localhost:3000/");
        assert_eq!(storage.endpoint(), "http://localhost:3000/api/prompts");
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            RemoteStorage::error_message(400, r#"{"error":"Data must be an array"}"#),
            "Data must be an array"
        );
        assert_eq!(RemoteStorage::error_message(502, "<html>"), "HTTP 502");
    }
}
