//! Chat adapter assembly
//!
//! Resolves options, bootstraps the session, joins the conversation and
//! identifies the bot, then composes the enhancer chain:
//!
//! 1. identity-config (bot id, user, ready state)
//! 2. subscribe-new-message
//! 3. subscribe-thread-update
//! 4. egress
//! 5. ingress
//! 6. ingress middleware (activity filter)
//!
//! The first listed is outermost. This order is load-bearing for event
//! delivery and must not be rearranged.

use super::features::{ingress_filter, FeatureEnhancers};
use super::options::ChatAdapterOptions;
use crate::adapter::{
    base_creator, compose_enhancers, map_adapter, Adapter, AdapterOptions, Enhancer, ReadyState,
    StateKey,
};
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::error::AdapterResult;
use crate::middleware::apply_ingress_middleware;
use crate::session::{resolve_bot_id, ChatSdk, SdkCapabilities, SdkCredentials};
use serde_json::Value;
use std::sync::Arc;

/// Collaborators of the chat assembly.
#[derive(Clone)]
pub struct ChatDependencies {
    pub sdk: Arc<dyn ChatSdk>,
    pub diagnostics: Arc<dyn Diagnostics>,
    pub features: FeatureEnhancers,
}

impl ChatDependencies {
    /// Default features, diagnostics through `tracing`.
    pub fn new(sdk: Arc<dyn ChatSdk>) -> Self {
        Self {
            sdk,
            diagnostics: Arc::new(TracingDiagnostics),
            features: FeatureEnhancers::default(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn with_features(mut self, features: FeatureEnhancers) -> Self {
        self.features = features;
        self
    }
}

fn identity_enhancer(
    bot_id: String,
    user_display_name: Option<String>,
    user_id: Option<String>,
) -> Enhancer<Value> {
    map_adapter(move |adapter: Adapter<Value>| {
        adapter.set_config(StateKey::BotId, bot_id.clone());
        adapter.set_config(StateKey::UserDisplayName, user_display_name.clone());
        adapter.set_config(StateKey::UserId, user_id.clone());
        adapter.set_ready_state(ReadyState::Open);
        Ok(adapter)
    })
}

/// Build the chat enhancer for one conversation.
///
/// Options are validated before the SDK is touched; bootstrap, join and
/// bot resolution then run one after another. Session errors are returned
/// as the collaborators produced them.
pub async fn create_chat_enhancer(
    options: ChatAdapterOptions,
    deps: &ChatDependencies,
) -> AdapterResult<Enhancer<Value>> {
    let options = options.resolve(deps.diagnostics.as_ref())?;

    let capabilities = SdkCapabilities {
        host_type: options.host_type,
        protocol_type: options.protocol_type,
        logger: deps.diagnostics.clone(),
    };
    let credentials = SdkCredentials {
        region_gtms: options.chat_token.region_gtms.clone(),
        token: options.chat_token.token.clone(),
        visitor: options.visitor,
    };

    let session = deps
        .sdk
        .initialize(options.sdk_url.clone(), capabilities, credentials)
        .await?;
    let conversation = session.join_conversation(&options.chat_token.chat_id).await?;
    tracing::info!(conversation = conversation.id(), "joined conversation");
    let bot_id = resolve_bot_id(conversation.as_ref()).await?;

    let features = &deps.features;
    Ok(compose_enhancers(vec![
        identity_enhancer(bot_id, options.user_display_name, options.user_id),
        (features.subscribe_new_message)(conversation.clone()),
        (features.subscribe_thread_update)(conversation.clone()),
        (features.egress)(conversation.clone()),
        (features.ingress)(conversation),
        apply_ingress_middleware(vec![ingress_filter()]),
    ]))
}

/// Build a ready chat adapter on top of the base adapter.
pub async fn create_chat_adapter(
    options: ChatAdapterOptions,
    deps: &ChatDependencies,
) -> AdapterResult<Adapter<Value>> {
    let enhance = create_chat_enhancer(options, deps).await?;
    enhance(base_creator())(AdapterOptions::new())
}
