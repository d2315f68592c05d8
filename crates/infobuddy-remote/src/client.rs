//! reqwest-backed client for the OpenAI assistants v2 API.

use crate::error::RemoteError;
use crate::types::{
    ApiErrorEnvelope, MessageList, MessageObject, RunId, RunObject, RunStatus, ThreadId,
    ThreadMessage, ThreadObject,
};
use crate::AssistantService;
use async_trait::async_trait;
use infobuddy_config::RemoteConfig;
use log::{debug, info, warn};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::{Value, json};
use std::time::Duration;

/// Version header required by the assistants endpoints.
const BETA_HEADER: (&str, &str) = ("OpenAI-Beta", "assistants=v2");

/// Connect timeout for the shared HTTP client.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Per-request timeout for the shared HTTP client.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client for a hosted assistants v2 service.
pub struct OpenAiAssistantClient {
    client: Client,
    base_url: String,
    api_key: String,
    assistant_id: String,
}

impl OpenAiAssistantClient {
    /// Build a client from remote config; requires an API key and an
    /// assistant id.
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(RemoteError::MissingCredential("api_key"))?;
        let assistant_id = config
            .assistant_id
            .clone()
            .ok_or(RemoteError::MissingCredential("assistant_id"))?;
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        info!(
            "assistant client ready (base_url={}, assistant_id={})",
            config.base_url, assistant_id
        );
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            assistant_id,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.base_url))
            .bearer_auth(&self.api_key)
            .header(BETA_HEADER.0, BETA_HEADER.1)
    }

    /// Check the response status and decode the body as `T`.
    async fn decode<T: serde::de::DeserializeOwned>(
        response: Response,
    ) -> Result<T, RemoteError> {
        let status = response.status();
        if status.is_success() {
            let body = response.bytes().await?;
            return Ok(serde_json::from_slice(&body)?);
        }
        let status_code = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or(body);
        warn!("remote api error (status={status_code})");
        Err(RemoteError::Api {
            status: status_code,
            message,
        })
    }

    async fn post(&self, path: &str, body: Value) -> Result<Response, RemoteError> {
        Ok(self
            .request(Method::POST, path)
            .json(&body)
            .send()
            .await?)
    }

    async fn get(&self, path: &str) -> Result<Response, RemoteError> {
        Ok(self.request(Method::GET, path).send().await?)
    }
}

#[async_trait]
impl AssistantService for OpenAiAssistantClient {
    async fn create_thread(&self) -> Result<ThreadId, RemoteError> {
        let response = self.post("/threads", json!({})).await?;
        let thread: ThreadObject = Self::decode(response).await?;
        info!("created thread (thread_id={})", thread.id);
        Ok(thread.id)
    }

    async fn append_user_message(
        &self,
        thread_id: &ThreadId,
        content: &str,
    ) -> Result<(), RemoteError> {
        debug!(
            "appending user message (thread_id={}, content_len={})",
            thread_id,
            content.len()
        );
        let response = self
            .post(
                &format!("/threads/{thread_id}/messages"),
                json!({ "role": "user", "content": content }),
            )
            .await?;
        let _: Value = Self::decode(response).await?;
        Ok(())
    }

    async fn start_run(
        &self,
        thread_id: &ThreadId,
        instructions: &str,
    ) -> Result<RunId, RemoteError> {
        let response = self
            .post(
                &format!("/threads/{thread_id}/runs"),
                json!({
                    "assistant_id": self.assistant_id,
                    "instructions": instructions,
                }),
            )
            .await?;
        let run: RunObject = Self::decode(response).await?;
        info!("started run (thread_id={}, run_id={})", thread_id, run.id);
        Ok(run.id)
    }

    async fn run_status(
        &self,
        thread_id: &ThreadId,
        run_id: &RunId,
    ) -> Result<RunStatus, RemoteError> {
        let response = self
            .get(&format!("/threads/{thread_id}/runs/{run_id}"))
            .await?;
        let run: RunObject = Self::decode(response).await?;
        debug!(
            "run status (thread_id={}, run_id={}, status={})",
            thread_id, run_id, run.status
        );
        if run.status == RunStatus::Failed
            && let Some(last_error) = run.last_error
        {
            warn!(
                "run failed (run_id={}, code={}, message={})",
                run_id,
                last_error.code.as_deref().unwrap_or("unknown"),
                last_error.message.as_deref().unwrap_or("")
            );
        }
        Ok(run.status)
    }

    async fn latest_message(
        &self,
        thread_id: &ThreadId,
    ) -> Result<Option<ThreadMessage>, RemoteError> {
        let response = self
            .get(&format!("/threads/{thread_id}/messages?order=desc&limit=1"))
            .await?;
        let list: MessageList = Self::decode(response).await?;
        Ok(list
            .data
            .into_iter()
            .next()
            .map(MessageObject::into_thread_message))
    }
}
