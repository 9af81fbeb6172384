//! Chat panel client
//!
//! The chat panel forwards trimmed user input to `POST /api/chat` and appends
//! the answer to the conversation. Any failure (transport, bad JSON, error
//! status) degrades to an apology message so input is never blocked.

use serde::{Deserialize, Serialize};

use crate::error::ChatClientError;

/// First message shown in a new conversation
pub const GREETING: &str = "Hi! Ask me about yield, weather, disease, fertilizer or rainfall.";

/// Appended in place of a reply when the request fails
pub const APOLOGY: &str = "Sorry, server error. Try again later.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// Successful `/api/chat` answer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    pub ts: i64,
}

/// HTTP client for the reply endpoint
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ChatClient {
    /// `base_url` is the absolute server origin, e.g. `http://localhost:8080`
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn send(&self, message: &str) -> Result<ChatReply, ChatClientError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&ChatRequest { message })
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        let body: serde_json::Value = if text.is_empty() {
            serde_json::json!({})
        } else {
            serde_json::from_str(&text).map_err(|_| ChatClientError::BadJson)?
        };
        let error = body.get("error").and_then(|e| e.as_str()).map(str::to_string);

        if !status.is_success() {
            return Err(ChatClientError::Server(
                error.unwrap_or_else(|| "Request failed".to_string()),
            ));
        }
        if let Some(error) = error {
            return Err(ChatClientError::Server(error));
        }
        serde_json::from_value(body).map_err(|_| ChatClientError::BadJson)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    fn bot(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Bot,
            content: content.into(),
        }
    }
}

/// Message history of one chat panel
#[derive(Debug)]
pub struct Conversation {
    client: ChatClient,
    messages: Vec<ChatMessage>,
    last_error: Option<String>,
}

impl Conversation {
    pub fn new(client: ChatClient) -> Self {
        Self {
            client,
            messages: vec![ChatMessage::bot(GREETING)],
            last_error: None,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Send `input` and append the answer.
    ///
    /// Blank input is ignored and returns `None`. Otherwise the bot message
    /// that was appended is returned, which is the apology on failure.
    pub async fn submit(&mut self, input: &str) -> Option<&ChatMessage> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        self.messages.push(ChatMessage::user(trimmed));
        self.last_error = None;

        let answer = match self.client.send(trimmed).await {
            Ok(reply) => reply.reply,
            Err(e) => {
                tracing::warn!(error = %e, "Chat request failed");
                self.last_error = Some(e.to_string());
                APOLOGY.to_string()
            }
        };
        self.messages.push(ChatMessage::bot(answer));
        self.messages.last()
    }
}
