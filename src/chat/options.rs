//! Chat adapter configuration
//!
//! Options arrive as camelCase JSON (or are built in code), then get
//! resolved once: required fields checked, renamed fields migrated, and
//! defaults filled in. Resolution never awaits anything.

use crate::diagnostics::Diagnostics;
use crate::error::{AdapterError, AdapterResult};
use crate::session::{HostType, ProtocolType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Credentials for one chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatToken {
    pub chat_id: String,
    pub token: String,
    #[serde(rename = "regionGTMS", default)]
    pub region_gtms: HashMap<String, String>,
}

impl ChatToken {
    pub fn new(chat_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            token: token.into(),
            region_gtms: HashMap::new(),
        }
    }
}

/// Options accepted by the chat adapter assembly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatAdapterOptions {
    pub chat_token: Option<ChatToken>,
    pub host_type: Option<HostType>,
    pub protocol_type: Option<ProtocolType>,
    #[serde(rename = "sdkURL")]
    pub sdk_url: Option<String>,
    /// Former name of `sdk_url`
    #[serde(rename = "sdkUrl", skip_serializing_if = "Option::is_none")]
    pub legacy_sdk_url: Option<String>,
    pub user_display_name: Option<String>,
    pub user_id: Option<String>,
    pub visitor: Option<bool>,
}

/// Options after validation and defaulting.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedChatOptions {
    pub chat_token: ChatToken,
    pub host_type: HostType,
    pub protocol_type: ProtocolType,
    pub sdk_url: Option<String>,
    pub user_display_name: Option<String>,
    pub user_id: Option<String>,
    pub visitor: bool,
}

impl ChatAdapterOptions {
    pub fn new(chat_token: ChatToken) -> Self {
        Self {
            chat_token: Some(chat_token),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> AdapterResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_sdk_url(mut self, url: impl Into<String>) -> Self {
        self.sdk_url = Some(url.into());
        self
    }

    pub fn with_user(mut self, id: impl Into<String>, display_name: impl Into<String>) -> Self {
        self.user_id = Some(id.into());
        self.user_display_name = Some(display_name.into());
        self
    }

    /// Validate and fill defaults.
    ///
    /// A legacy `sdkUrl` without `sdkURL` is carried over with one warning
    /// sent to `diagnostics`.
    pub fn resolve(self, diagnostics: &dyn Diagnostics) -> AdapterResult<ResolvedChatOptions> {
        let chat_token = self
            .chat_token
            .ok_or_else(|| {
                AdapterError::Configuration("\"chatToken\" must be specified".to_string())
            })?;
        if chat_token.token.is_empty() {
            return Err(AdapterError::Configuration(
                "\"chatToken.token\" must not be empty".to_string(),
            ));
        }
        if chat_token.chat_id.is_empty() {
            return Err(AdapterError::Configuration(
                "\"chatToken.chatId\" must not be empty".to_string(),
            ));
        }

        let sdk_url = match (self.sdk_url, self.legacy_sdk_url) {
            (None, Some(legacy)) => {
                diagnostics.warn(
                    "\"sdkUrl\" has been renamed to \"sdkURL\". \
                     Please rename accordingly to suppress this warning in the future.",
                );
                Some(legacy)
            }
            (current, _) => current,
        };

        Ok(ResolvedChatOptions {
            chat_token,
            host_type: self.host_type.unwrap_or_default(),
            protocol_type: self.protocol_type.unwrap_or_default(),
            sdk_url,
            user_display_name: self.user_display_name,
            user_id: self.user_id,
            visitor: self.visitor.unwrap_or(true),
        })
    }
}
