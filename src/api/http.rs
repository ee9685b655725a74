//! HTTP implementation of the remote session store
//!
//! `AgentClient` talks JSON over HTTP to the co-founder agent backend.
//! There is no push channel at this boundary; the synchronizer polls the
//! list and board routes, and the console drives history, invoke, voice,
//! mutation, and profile routes on demand.

use crate::api::base::{BoardDetail, ChatMessage, RemoteStore};
use crate::config::ServerConfig;
use crate::error::{CofoundError, Result};
use crate::session::Session;

use async_trait::async_trait;
use reqwest::multipart;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP client for the co-founder agent backend
///
/// # Examples
///
/// ```no_run
/// use cofound::api::{AgentClient, RemoteStore};
/// use cofound::config::ServerConfig;
///
/// # async fn example() -> cofound::error::Result<()> {
/// let client = AgentClient::new(&ServerConfig::default())?;
/// let sessions = client.list_sessions().await?;
/// # Ok(())
/// # }
/// ```
pub struct AgentClient {
    client: Client,
    base_url: String,
}

/// Response from `GET /agent/projects`
#[derive(Debug, Deserialize)]
struct ProjectsResponse {
    #[serde(default)]
    projects: Vec<Session>,
}

/// Response from `GET /agent/history/{thread_id}`
#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    messages: Vec<ChatMessage>,
}

/// Request body for `POST /agent/invoke`
#[derive(Debug, Serialize)]
struct InvokeRequest {
    input: InvokeInput,
    config: InvokeConfig,
}

#[derive(Debug, Serialize)]
struct InvokeInput {
    messages: Vec<InvokeMessage>,
}

#[derive(Debug, Serialize)]
struct InvokeMessage {
    r#type: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct InvokeConfig {
    configurable: InvokeConfigurable,
}

#[derive(Debug, Serialize)]
struct InvokeConfigurable {
    thread_id: String,
}

/// Response from the invoke and voice routes
#[derive(Debug, Deserialize)]
struct InvokeResponse {
    output: InvokeOutput,
}

#[derive(Debug, Deserialize)]
struct InvokeOutput {
    #[serde(default)]
    messages: Vec<ReplyMessage>,
}

/// One message in the agent's reply stream
///
/// The backend returns its full internal message trail; only the content
/// of the last entry matters to the transcript.
#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: String,
}

/// Request body for `POST /agent/thread/{id}/rename`
#[derive(Debug, Serialize)]
struct RenameRequest {
    name: String,
}

/// Body for both directions of `/agent/profile`
#[derive(Debug, Serialize, Deserialize)]
struct ProfileBody {
    #[serde(default)]
    content: String,
}

impl AgentClient {
    /// Create a new client for the configured backend
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(concat!("cofound/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CofoundError::Api(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(base_url = %config.base_url, "Initialized agent client");

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn an invoke-shaped response into the assistant's reply
    fn extract_reply(response: InvokeResponse) -> Result<ChatMessage> {
        let last = response
            .output
            .messages
            .into_iter()
            .last()
            .ok_or_else(|| CofoundError::Invoke("Agent returned no messages".to_string()))?;
        Ok(ChatMessage::assistant(last.content))
    }

    /// Read the body of a failed response for error context
    async fn error_body(response: reqwest::Response) -> String {
        response.text().await.unwrap_or_default()
    }
}

#[async_trait]
impl RemoteStore for AgentClient {
    async fn list_sessions(&self) -> Result<Vec<Session>> {
        let url = self.url("/agent/projects");
        tracing::debug!(%url, "Fetching session list");

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::warn!("Session list fetch failed: {}", e);
            CofoundError::Api(format!("Failed to fetch session list: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = Self::error_body(response).await;
            tracing::warn!(%status, "Session list fetch returned error");
            return Err(
                CofoundError::Api(format!("Session list returned {}: {}", status, body)).into(),
            );
        }

        let parsed: ProjectsResponse = response.json().await.map_err(|e| {
            CofoundError::Api(format!("Failed to parse session list: {}", e))
        })?;

        tracing::debug!(count = parsed.projects.len(), "Fetched session list");
        Ok(parsed.projects)
    }

    async fn fetch_board(&self, thread_id: &str) -> Result<BoardDetail> {
        let url = self.url(&format!("/agent/projects/{}", thread_id));
        tracing::debug!(%url, "Fetching board");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CofoundError::Api(format!("Failed to fetch board: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = Self::error_body(response).await;
            return Err(CofoundError::Api(format!("Board returned {}: {}", status, body)).into());
        }

        let board: BoardDetail = response
            .json()
            .await
            .map_err(|e| CofoundError::Api(format!("Failed to parse board: {}", e)))?;
        Ok(board)
    }

    async fn fetch_history(&self, thread_id: &str) -> Result<Vec<ChatMessage>> {
        let url = self.url(&format!("/agent/history/{}", thread_id));
        tracing::debug!(%url, "Fetching history");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CofoundError::Api(format!("Failed to fetch history: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = Self::error_body(response).await;
            return Err(
                CofoundError::Api(format!("History returned {}: {}", status, body)).into(),
            );
        }

        let parsed: HistoryResponse = response
            .json()
            .await
            .map_err(|e| CofoundError::Api(format!("Failed to parse history: {}", e)))?;

        tracing::debug!(thread_id, count = parsed.messages.len(), "Fetched history");
        Ok(parsed.messages)
    }

    async fn send_message(&self, thread_id: &str, content: &str) -> Result<ChatMessage> {
        let url = self.url("/agent/invoke");
        let request = InvokeRequest {
            input: InvokeInput {
                messages: vec![InvokeMessage {
                    r#type: "human".to_string(),
                    content: content.to_string(),
                }],
            },
            config: InvokeConfig {
                configurable: InvokeConfigurable {
                    thread_id: thread_id.to_string(),
                },
            },
        };

        tracing::debug!(thread_id, "Sending message");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Invoke request failed: {}", e);
                CofoundError::Invoke(format!("Failed to reach agent: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = Self::error_body(response).await;
            tracing::error!(%status, "Invoke returned error");
            return Err(CofoundError::Invoke(format!("Agent returned {}: {}", status, body)).into());
        }

        let parsed: InvokeResponse = response
            .json()
            .await
            .map_err(|e| CofoundError::Invoke(format!("Failed to parse agent reply: {}", e)))?;

        Self::extract_reply(parsed)
    }

    async fn send_voice(
        &self,
        thread_id: &str,
        file_name: &str,
        audio: Vec<u8>,
    ) -> Result<ChatMessage> {
        let url = self.url("/agent/voice");
        tracing::debug!(thread_id, bytes = audio.len(), "Uploading voice message");

        let part = multipart::Part::bytes(audio)
            .file_name(file_name.to_string())
            .mime_str("audio/webm")
            .map_err(|e| CofoundError::Invoke(format!("Invalid audio part: {}", e)))?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("thread_id", thread_id.to_string());

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Voice upload failed: {}", e);
                CofoundError::Invoke(format!("Failed to upload voice message: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = Self::error_body(response).await;
            return Err(
                CofoundError::Invoke(format!("Voice route returned {}: {}", status, body)).into(),
            );
        }

        let parsed: InvokeResponse = response
            .json()
            .await
            .map_err(|e| CofoundError::Invoke(format!("Failed to parse agent reply: {}", e)))?;

        Self::extract_reply(parsed)
    }

    async fn toggle_pin(&self, thread_id: &str) -> Result<()> {
        let url = self.url(&format!("/agent/thread/{}/pin", thread_id));
        tracing::debug!(thread_id, "Toggling pin");

        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| CofoundError::Api(format!("Pin request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = Self::error_body(response).await;
            return Err(CofoundError::Api(format!("Pin returned {}: {}", status, body)).into());
        }
        Ok(())
    }

    async fn rename(&self, thread_id: &str, name: &str) -> Result<()> {
        let url = self.url(&format!("/agent/thread/{}/rename", thread_id));
        tracing::debug!(thread_id, name, "Renaming thread");

        let response = self
            .client
            .post(&url)
            .json(&RenameRequest {
                name: name.to_string(),
            })
            .send()
            .await
            .map_err(|e| CofoundError::Api(format!("Rename request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = Self::error_body(response).await;
            return Err(CofoundError::Api(format!("Rename returned {}: {}", status, body)).into());
        }
        Ok(())
    }

    async fn delete(&self, thread_id: &str) -> Result<()> {
        let url = self.url(&format!("/agent/thread/{}", thread_id));
        tracing::debug!(thread_id, "Deleting thread");

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| CofoundError::Api(format!("Delete request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = Self::error_body(response).await;
            return Err(CofoundError::Api(format!("Delete returned {}: {}", status, body)).into());
        }
        Ok(())
    }

    async fn get_profile(&self) -> Result<String> {
        let url = self.url("/agent/profile");
        tracing::debug!("Fetching profile");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CofoundError::Profile(format!("Profile fetch failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = Self::error_body(response).await;
            return Err(
                CofoundError::Profile(format!("Profile returned {}: {}", status, body)).into(),
            );
        }

        let body: ProfileBody = response
            .json()
            .await
            .map_err(|e| CofoundError::Profile(format!("Failed to parse profile: {}", e)))?;
        Ok(body.content)
    }

    async fn set_profile(&self, content: &str) -> Result<()> {
        let url = self.url("/agent/profile");
        tracing::debug!(bytes = content.len(), "Saving profile");

        let response = self
            .client
            .post(&url)
            .json(&ProfileBody {
                content: content.to_string(),
            })
            .send()
            .await
            .map_err(|e| CofoundError::Profile(format!("Profile save failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = Self::error_body(response).await;
            return Err(
                CofoundError::Profile(format!("Profile save returned {}: {}", status, body)).into(),
            );
        }
        Ok(())
    }
}
