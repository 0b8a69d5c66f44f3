//! End-to-end scenarios for the chat assembly over the mock session

#[cfg(test)]
mod tests {
    use crate::adapter::{map_adapter, Adapter, AdapterObject, AdapterState, ReadyState, StateKey};
    use crate::chat::features::{FeatureEnhancers, FeatureFactory};
    use crate::chat::{
        create_chat_adapter, create_chat_enhancer, ChatAdapterOptions, ChatDependencies, ChatToken,
    };
    use crate::diagnostics::RecordingDiagnostics;
    use crate::error::{AdapterError, AdapterResult};
    use crate::session::mock::{MockConversation, MockSdk, MockSession};
    use crate::session::{
        ChatMessage, Conversation, HostType, Member, MemberRole, ProtocolType, ThreadUpdate,
    };
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use tokio_test::{assert_ready, task};

    struct Harness {
        conversation: Arc<MockConversation>,
        session: Arc<MockSession>,
        sdk: Arc<MockSdk>,
        diagnostics: Arc<RecordingDiagnostics>,
    }

    impl Harness {
        fn new() -> Self {
            let conversation = Arc::new(MockConversation::new("chat-1").with_members(vec![
                Member::new("user-1", MemberRole::User),
                Member::new("bot-1", MemberRole::Bot),
            ]));
            let session = Arc::new(MockSession::new(conversation.clone()));
            Self::with_session(conversation, session)
        }

        fn with_session(conversation: Arc<MockConversation>, session: Arc<MockSession>) -> Self {
            Self {
                sdk: Arc::new(MockSdk::new(session.clone())),
                conversation,
                session,
                diagnostics: Arc::new(RecordingDiagnostics::new()),
            }
        }

        fn deps(&self) -> ChatDependencies {
            ChatDependencies::new(self.sdk.clone()).with_diagnostics(self.diagnostics.clone())
        }
    }

    fn options() -> ChatAdapterOptions {
        ChatAdapterOptions::new(ChatToken::new("chat-1", "secret")).with_user("user-1", "Ada")
    }

    // ================================================================
    // Configuration
    // ================================================================

    // === Scenario: chat token absent ===
    #[test]
    fn missing_token_fails_before_bootstrap() {
        let harness = Harness::new();
        let deps = harness.deps();

        let mut construction =
            task::spawn(create_chat_enhancer(ChatAdapterOptions::default(), &deps));
        let result = assert_ready!(construction.poll());

        assert!(matches!(result, Err(AdapterError::Configuration(_))));
        assert_eq!(harness.sdk.initialize_calls(), 0);
    }

    // === Scenario: legacy resource locator only ===
    #[tokio::test]
    async fn legacy_sdk_url_reaches_the_sdk_with_one_warning() {
        let harness = Harness::new();
        let mut options = options();
        options.legacy_sdk_url = Some("https://sdk/legacy".to_string());

        create_chat_adapter(options, &harness.deps()).await.unwrap();

        let call = harness.sdk.last_initialize().unwrap();
        assert_eq!(call.sdk_url.as_deref(), Some("https://sdk/legacy"));
        let warnings = harness.diagnostics.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("sdkURL"));
    }

    #[tokio::test]
    async fn bootstrap_receives_defaults_and_credentials() {
        let harness = Harness::new();
        let mut token = ChatToken::new("chat-1", "secret");
        token.region_gtms.insert("primary".into(), "emea".into());

        create_chat_adapter(ChatAdapterOptions::new(token), &harness.deps())
            .await
            .unwrap();

        let call = harness.sdk.last_initialize().unwrap();
        assert_eq!(call.host_type, HostType::IFrame);
        assert_eq!(call.protocol_type, ProtocolType::V1Sdk);
        assert_eq!(call.credentials.token, "secret");
        assert_eq!(call.credentials.region_gtms["primary"], "emea");
        assert!(call.credentials.visitor);
        assert_eq!(harness.session.joined(), vec!["chat-1"]);
    }

    // ================================================================
    // Assembled adapter
    // ================================================================

    #[tokio::test]
    async fn adapter_is_configured_and_open() {
        let harness = Harness::new();
        let adapter = create_chat_adapter(options(), &harness.deps()).await.unwrap();

        assert!(adapter.is_plain());
        assert_eq!(adapter.ready_state(), ReadyState::Open);
        assert_eq!(adapter.get_config(&StateKey::BotId), Some(json!("bot-1")));
        assert_eq!(adapter.get_config(&StateKey::UserId), Some(json!("user-1")));
        assert_eq!(adapter.get_config(&StateKey::UserDisplayName), Some(json!("Ada")));
    }

    #[tokio::test]
    async fn conversation_messages_arrive_as_activities() {
        let harness = Harness::new();
        let adapter = create_chat_adapter(options(), &harness.deps()).await.unwrap();
        let mut activities = adapter.take_activities().unwrap();

        harness
            .conversation
            .deliver_thread_update(ThreadUpdate {
                id: "thread".into(),
                members: vec![Member::new("agent-1", MemberRole::Agent)],
                properties: Default::default(),
            })
            .unwrap();
        harness
            .conversation
            .deliver_message(
                ChatMessage::text("hi").from_sender(Member::new("bot-1", MemberRole::Bot)),
            )
            .unwrap();

        let activity = activities.recv().await.unwrap();
        assert_eq!(activity["type"], "message");
        assert_eq!(activity["text"], "hi");
        assert_eq!(activity["from"]["role"], "bot");
        assert_eq!(activity["conversation"]["id"], "chat-1");
        assert!(activities.try_recv().is_err());
    }

    #[tokio::test]
    async fn egress_reaches_the_conversation() {
        let harness = Harness::new();
        let adapter = create_chat_adapter(options(), &harness.deps()).await.unwrap();

        adapter
            .egress(json!({ "type": "message", "id": "c-1", "text": "hello there" }))
            .unwrap();

        let sent = harness.conversation.sent_messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].content, "hello there");
        assert_eq!(sent[0].client_message_id.as_deref(), Some("c-1"));
    }

    #[tokio::test]
    async fn feature_enhancers_run_in_declared_order() {
        let harness = Harness::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let tagged = |name: &'static str, inner: FeatureFactory| -> FeatureFactory {
            let order = order.clone();
            Arc::new(move |conversation: Arc<dyn Conversation>| {
                let order = order.clone();
                let tag = map_adapter(move |adapter: Adapter<Value>| {
                    order.lock().unwrap().push(name);
                    Ok(adapter)
                });
                crate::adapter::compose_enhancers(vec![tag, inner(conversation)])
            })
        };
        let defaults = FeatureEnhancers::default();
        let features = FeatureEnhancers {
            subscribe_new_message: tagged("new-message", defaults.subscribe_new_message),
            subscribe_thread_update: tagged("thread-update", defaults.subscribe_thread_update),
            egress: tagged("egress", defaults.egress),
            ingress: tagged("ingress", defaults.ingress),
        };

        create_chat_adapter(options(), &harness.deps().with_features(features))
            .await
            .unwrap();

        // Post-construction hooks run innermost first.
        assert_eq!(
            *order.lock().unwrap(),
            vec!["ingress", "egress", "thread-update", "new-message"]
        );
    }

    #[tokio::test]
    async fn class_style_feature_fails_construction() {
        let harness = Harness::new();
        let sealing: FeatureFactory = Arc::new(|_conversation: Arc<dyn Conversation>| {
            map_adapter(|adapter: Adapter<Value>| {
                let sealed: Arc<dyn AdapterObject<Value>> = Arc::new(Sealed(adapter, AdapterState::new()));
                Ok(Adapter::Object(sealed))
            })
        });
        let features = FeatureEnhancers {
            subscribe_new_message: sealing,
            ..FeatureEnhancers::default()
        };

        let err = create_chat_adapter(options(), &harness.deps().with_features(features))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AdapterError::NonPlainAdapter));
    }

    struct Sealed(Adapter<Value>, AdapterState);

    impl AdapterObject<Value> for Sealed {
        fn ingress(&self, value: Value) -> AdapterResult<()> {
            self.0.ingress(value)
        }
        fn egress(&self, value: Value) -> AdapterResult<()> {
            self.0.egress(value)
        }
        fn state(&self) -> &AdapterState {
            &self.1
        }
    }

    // ================================================================
    // Upstream failures
    // ================================================================

    #[tokio::test]
    async fn bootstrap_failure_propagates_unchanged() {
        let conversation = Arc::new(MockConversation::new("chat-1"));
        let session = Arc::new(MockSession::new(conversation.clone()));
        let mut harness = Harness::with_session(conversation, session.clone());
        harness.sdk = Arc::new(MockSdk::new(session).with_failure("sdk unreachable"));

        let err = create_chat_adapter(options(), &harness.deps()).await.err().unwrap();
        assert!(matches!(err, AdapterError::Session(msg) if msg == "sdk unreachable"));
        assert!(harness.session.joined().is_empty());
    }

    #[tokio::test]
    async fn join_failure_propagates_unchanged() {
        let conversation = Arc::new(MockConversation::new("chat-1"));
        let session = Arc::new(
            MockSession::new(conversation.clone()).with_join_failure("not a participant"),
        );
        let harness = Harness::with_session(conversation, session);

        let err = create_chat_adapter(options(), &harness.deps()).await.err().unwrap();
        assert!(matches!(err, AdapterError::Session(msg) if msg == "not a participant"));
    }

    #[tokio::test]
    async fn missing_bot_fails_construction() {
        let conversation = Arc::new(
            MockConversation::new("chat-1").with_members(vec![Member::new("u", MemberRole::User)]),
        );
        let session = Arc::new(MockSession::new(conversation.clone()));
        let harness = Harness::with_session(conversation.clone(), session);

        let err = create_chat_adapter(options(), &harness.deps()).await.err().unwrap();
        assert!(matches!(err, AdapterError::Session(_)));
        assert_eq!(conversation.message_subscribers(), 0);
    }
}
