//! Feature enhancers bound to a joined conversation
//!
//! Each factory takes the conversation and returns an enhancer. The
//! assembly composes them in a fixed order; callers may swap any of them
//! through [`FeatureEnhancers`].
//!
//! Inbound values flow through `ingress` as JSON envelopes:
//! `{"message": ...}` and `{"thread": ...}` from the subscriptions, rewritten
//! to `{"activity": ...}` by the ingress enhancer, unwrapped by the filter.

use crate::adapter::{
    handler, map_adapter, Adapter, AdapterFunctions, Enhancer, Handler, MiddlewareApi,
};
use crate::error::{AdapterError, AdapterResult};
use crate::middleware::{middleware, Middleware};
use crate::session::{ChatMessage, Conversation, MemberRole, ThreadUpdate};
use chrono::Utc;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use uuid::Uuid;

/// Builds an enhancer for one conversation.
pub type FeatureFactory = Arc<dyn Fn(Arc<dyn Conversation>) -> Enhancer<Value> + Send + Sync>;

/// The conversation-bound enhancers of the chat assembly.
#[derive(Clone)]
pub struct FeatureEnhancers {
    pub subscribe_new_message: FeatureFactory,
    pub subscribe_thread_update: FeatureFactory,
    pub egress: FeatureFactory,
    pub ingress: FeatureFactory,
}

impl Default for FeatureEnhancers {
    fn default() -> Self {
        Self {
            subscribe_new_message: Arc::new(subscribe_new_message_enhancer),
            subscribe_thread_update: Arc::new(subscribe_thread_update_enhancer),
            egress: Arc::new(egress_enhancer),
            ingress: Arc::new(ingress_enhancer),
        }
    }
}

/// Delivers every new conversation message to the adapter as `{"message": ...}`.
pub fn subscribe_new_message_enhancer(conversation: Arc<dyn Conversation>) -> Enhancer<Value> {
    map_adapter(move |adapter: Adapter<Value>| {
        let ingress = ingress_of(&adapter)?;
        conversation.on_new_message(handler(move |message: ChatMessage| {
            let message = serde_json::to_value(&message)?;
            ingress(json!({ "message": message }))
        }));
        Ok(adapter)
    })
}

/// Delivers every thread update to the adapter as `{"thread": ...}`.
pub fn subscribe_thread_update_enhancer(conversation: Arc<dyn Conversation>) -> Enhancer<Value> {
    map_adapter(move |adapter: Adapter<Value>| {
        let ingress = ingress_of(&adapter)?;
        conversation.on_thread_update(handler(move |update: ThreadUpdate| {
            let update = serde_json::to_value(&update)?;
            ingress(json!({ "thread": update }))
        }));
        Ok(adapter)
    })
}

/// The adapter's ingress function on its own. Subscriptions hold this
/// rather than the adapter, whose egress owns the conversation.
fn ingress_of(adapter: &Adapter<Value>) -> AdapterResult<Handler<Value>> {
    adapter
        .as_record()
        .map(|record| record.functions.ingress.clone())
        .ok_or(AdapterError::NonPlainAdapter)
}

/// Sends message activities from `egress` into the conversation.
///
/// Other activity types (typing, events) are accepted and dropped.
pub fn egress_enhancer(conversation: Arc<dyn Conversation>) -> Enhancer<Value> {
    map_adapter(move |adapter: Adapter<Value>| {
        let record = adapter.into_record()?;
        let conversation = conversation.clone();
        let egress = handler(move |activity: Value| match activity_to_message(&activity) {
            Some(message) => conversation.send_message(message),
            None => Ok(()),
        });
        Ok(Adapter::Record(record.with_functions(AdapterFunctions {
            egress,
            ..record.functions.clone()
        })))
    })
}

/// Rewrites `{"message": ...}` envelopes on `ingress` into `{"activity": ...}`.
pub fn ingress_enhancer(conversation: Arc<dyn Conversation>) -> Enhancer<Value> {
    map_adapter(move |adapter: Adapter<Value>| {
        let record = adapter.into_record()?;
        let next = record.functions.ingress.clone();
        let conversation_id = conversation.id().to_string();

        let ingress = handler(move |value: Value| {
            let raw = match value {
                Value::Object(mut fields) => match fields.remove("message") {
                    Some(raw) => raw,
                    None => return next(Value::Object(fields)),
                },
                other => return next(other),
            };
            let message: ChatMessage = serde_json::from_value(raw)?;
            next(json!({ "activity": message_to_activity(&message, &conversation_id) }))
        });
        Ok(Adapter::Record(record.with_functions(AdapterFunctions {
            ingress,
            ..record.functions.clone()
        })))
    })
}

/// Forwards only the nested `activity` of each value; drops anything else.
pub fn ingress_filter() -> Arc<dyn Middleware<Value>> {
    middleware(|_api: &MiddlewareApi<Value>| {
        |next: Handler<Value>| {
            handler(move |value: Value| match value {
                Value::Object(mut fields) => match fields.remove("activity") {
                    Some(activity) => next(activity),
                    None => Ok(()),
                },
                _ => Ok(()),
            })
        }
    })
}

fn activity_to_message(activity: &Value) -> Option<ChatMessage> {
    if activity.get("type").and_then(Value::as_str) != Some("message") {
        return None;
    }

    let text = activity.get("text").and_then(Value::as_str).unwrap_or_default();
    let content_type = match activity.get("textFormat").and_then(Value::as_str) {
        Some("markdown") => "markdown",
        _ => "text",
    };
    let client_message_id = activity
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    Some(ChatMessage {
        client_message_id: Some(client_message_id),
        content: text.to_string(),
        content_type: content_type.to_string(),
        sender: None,
        timestamp: Some(Utc::now()),
    })
}

fn message_to_activity(message: &ChatMessage, conversation_id: &str) -> Value {
    let mut activity = Map::new();
    activity.insert("type".into(), json!("message"));
    activity.insert(
        "id".into(),
        json!(message
            .client_message_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())),
    );
    activity.insert("text".into(), json!(message.content));
    activity.insert(
        "textFormat".into(),
        json!(if message.content_type == "markdown" { "markdown" } else { "plain" }),
    );
    activity.insert("conversation".into(), json!({ "id": conversation_id }));

    if let Some(sender) = &message.sender {
        let role = match sender.role {
            MemberRole::Bot => "bot",
            MemberRole::User | MemberRole::Agent => "user",
        };
        activity.insert(
            "from".into(),
            json!({ "id": sender.id, "name": sender.display_name, "role": role }),
        );
    }

    let timestamp = message.timestamp.unwrap_or_else(Utc::now);
    activity.insert("timestamp".into(), json!(timestamp.to_rfc3339()));

    Value::Object(activity)
}
