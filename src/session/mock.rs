//! In-memory chat session for testing
//!
//! `MockSdk` → `MockSession` → `MockConversation`, each recording what it
//! was asked to do. Failures can be configured at the bootstrap and join
//! steps; messages and thread updates are injected with `deliver_*`.

use super::{
    ChatMessage, ChatSdk, ChatSession, Conversation, HostType, Member, ProtocolType,
    SdkCapabilities, SdkCredentials, ThreadUpdate,
};
use crate::adapter::Handler;
use crate::error::{AdapterError, AdapterResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Arguments of one `initialize` call.
#[derive(Debug, Clone, PartialEq)]
pub struct InitializeCall {
    pub sdk_url: Option<String>,
    pub host_type: HostType,
    pub protocol_type: ProtocolType,
    pub credentials: SdkCredentials,
}

/// Mock SDK returning a preconfigured session.
pub struct MockSdk {
    session: Arc<MockSession>,
    failure: Option<String>,
    calls: AtomicUsize,
    last_call: Mutex<Option<InitializeCall>>,
}

impl MockSdk {
    pub fn new(session: Arc<MockSession>) -> Self {
        Self {
            session,
            failure: None,
            calls: AtomicUsize::new(0),
            last_call: Mutex::new(None),
        }
    }

    /// Make `initialize` fail with a session error.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    pub fn initialize_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_initialize(&self) -> Option<InitializeCall> {
        self.last_call.lock().ok().and_then(|call| call.clone())
    }
}

#[async_trait]
impl ChatSdk for MockSdk {
    async fn initialize(
        &self,
        sdk_url: Option<String>,
        capabilities: SdkCapabilities,
        credentials: SdkCredentials,
    ) -> AdapterResult<Arc<dyn ChatSession>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_call.lock() {
            *last = Some(InitializeCall {
                sdk_url,
                host_type: capabilities.host_type,
                protocol_type: capabilities.protocol_type,
                credentials,
            });
        }

        if let Some(message) = &self.failure {
            return Err(AdapterError::Session(message.clone()));
        }
        capabilities.logger.info("mock session initialized");
        Ok(self.session.clone())
    }
}

/// Mock session that joins one conversation.
pub struct MockSession {
    conversation: Arc<MockConversation>,
    join_failure: Option<String>,
    joined: Mutex<Vec<String>>,
}

impl MockSession {
    pub fn new(conversation: Arc<MockConversation>) -> Self {
        Self {
            conversation,
            join_failure: None,
            joined: Mutex::new(Vec::new()),
        }
    }

    /// Make `join_conversation` fail with a session error.
    pub fn with_join_failure(mut self, message: impl Into<String>) -> Self {
        self.join_failure = Some(message.into());
        self
    }

    /// Chat ids passed to `join_conversation`, in order.
    pub fn joined(&self) -> Vec<String> {
        self.joined.lock().map(|j| j.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ChatSession for MockSession {
    async fn join_conversation(&self, chat_id: &str) -> AdapterResult<Arc<dyn Conversation>> {
        if let Ok(mut joined) = self.joined.lock() {
            joined.push(chat_id.to_string());
        }
        if let Some(message) = &self.join_failure {
            return Err(AdapterError::Session(message.clone()));
        }
        Ok(self.conversation.clone())
    }
}

/// Mock conversation keeping sent messages and registered callbacks.
pub struct MockConversation {
    id: String,
    members: Vec<Member>,
    sent: Mutex<Vec<ChatMessage>>,
    message_handlers: Mutex<Vec<Handler<ChatMessage>>>,
    thread_handlers: Mutex<Vec<Handler<ThreadUpdate>>>,
}

impl MockConversation {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            members: Vec::new(),
            sent: Mutex::new(Vec::new()),
            message_handlers: Mutex::new(Vec::new()),
            thread_handlers: Mutex::new(Vec::new()),
        }
    }

    pub fn with_members(mut self, members: Vec<Member>) -> Self {
        self.members = members;
        self
    }

    /// Messages handed to `send_message`, in order.
    pub fn sent_messages(&self) -> Vec<ChatMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn message_subscribers(&self) -> usize {
        self.message_handlers.lock().map(|h| h.len()).unwrap_or(0)
    }

    /// Push a new message to every registered callback.
    pub fn deliver_message(&self, message: ChatMessage) -> AdapterResult<()> {
        let handlers = self
            .message_handlers
            .lock()
            .map(|h| h.clone())
            .unwrap_or_default();
        handlers
            .iter()
            .try_for_each(|handler| handler(message.clone()))
    }

    /// Push a thread update to every registered callback.
    pub fn deliver_thread_update(&self, update: ThreadUpdate) -> AdapterResult<()> {
        let handlers = self
            .thread_handlers
            .lock()
            .map(|h| h.clone())
            .unwrap_or_default();
        handlers
            .iter()
            .try_for_each(|handler| handler(update.clone()))
    }
}

#[async_trait]
impl Conversation for MockConversation {
    fn id(&self) -> &str {
        &self.id
    }

    async fn members(&self) -> AdapterResult<Vec<Member>> {
        Ok(self.members.clone())
    }

    fn send_message(&self, message: ChatMessage) -> AdapterResult<()> {
        self.sent
            .lock()
            .map_err(|_| AdapterError::Session("outbound queue poisoned".to_string()))?
            .push(message);
        Ok(())
    }

    fn on_new_message(&self, handler: Handler<ChatMessage>) {
        if let Ok(mut handlers) = self.message_handlers.lock() {
            handlers.push(handler);
        }
    }

    fn on_thread_update(&self, handler: Handler<ThreadUpdate>) {
        if let Ok(mut handlers) = self.thread_handlers.lock() {
            handlers.push(handler);
        }
    }
}
