//! Chat session collaborators
//!
//! Defines the SDK, session and conversation traits the chat assembly talks
//! to, the message types crossing them, and bot-identity resolution.
//! Two implementations exist outside this crate's core:
//! - the real chat SDK binding, supplied by the embedding application
//! - `mock`: in-memory session for tests

pub mod mock;

use crate::adapter::Handler;
use crate::diagnostics::Diagnostics;
use crate::error::{AdapterError, AdapterResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Where the chat SDK is hosted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HostType {
    #[default]
    IFrame,
    Page,
}

/// Conversation protocol spoken by the SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProtocolType {
    #[default]
    V1Sdk,
    V2Sdk,
}

/// What the SDK is allowed to use while bootstrapping.
#[derive(Clone)]
pub struct SdkCapabilities {
    pub host_type: HostType,
    pub protocol_type: ProtocolType,
    pub logger: Arc<dyn Diagnostics>,
}

/// Credentials presented when the session starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SdkCredentials {
    /// Region routing hints, passed through opaquely
    pub region_gtms: HashMap<String, String>,
    pub token: String,
    pub visitor: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Bot,
    User,
    Agent,
}

/// A participant of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub role: MemberRole,
}

impl Member {
    pub fn new(id: impl Into<String>, role: MemberRole) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            role,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// A message as the chat service carries it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_message_id: Option<String>,
    pub content: String,
    /// e.g. "text"
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<Member>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ChatMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            client_message_id: None,
            content: content.into(),
            content_type: "text".to_string(),
            sender: None,
            timestamp: None,
        }
    }

    pub fn from_sender(mut self, sender: Member) -> Self {
        self.sender = Some(sender);
        self
    }
}

/// A change to the conversation thread (membership, properties).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadUpdate {
    pub id: String,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

/// Entry point of the chat SDK.
#[async_trait]
pub trait ChatSdk: Send + Sync {
    /// Bootstrap a session. `sdk_url` locates the SDK resources when set.
    async fn initialize(
        &self,
        sdk_url: Option<String>,
        capabilities: SdkCapabilities,
        credentials: SdkCredentials,
    ) -> AdapterResult<Arc<dyn ChatSession>>;
}

/// A live SDK session.
#[async_trait]
pub trait ChatSession: Send + Sync {
    async fn join_conversation(&self, chat_id: &str) -> AdapterResult<Arc<dyn Conversation>>;
}

/// A joined conversation.
#[async_trait]
pub trait Conversation: Send + Sync {
    fn id(&self) -> &str;

    async fn members(&self) -> AdapterResult<Vec<Member>>;

    /// Hand a message to the session's outbound queue.
    fn send_message(&self, message: ChatMessage) -> AdapterResult<()>;

    /// Register a callback for every new message.
    fn on_new_message(&self, handler: Handler<ChatMessage>);

    /// Register a callback for every thread update.
    fn on_thread_update(&self, handler: Handler<ThreadUpdate>);
}

/// Id of the first bot taking part in `conversation`.
pub async fn resolve_bot_id(conversation: &dyn Conversation) -> AdapterResult<String> {
    conversation
        .members()
        .await?
        .into_iter()
        .find(|member| member.role == MemberRole::Bot)
        .map(|member| member.id)
        .ok_or_else(|| {
            AdapterError::Session(format!(
                "no bot is a member of conversation '{}'",
                conversation.id()
            ))
        })
}
