//! Chat adapter: the enhancer chain over a joined conversation

mod assembly;
pub mod features;
#[cfg(test)]
mod integration_tests;
mod options;

pub use assembly::{create_chat_adapter, create_chat_enhancer, ChatDependencies};
pub use features::{FeatureEnhancers, FeatureFactory};
pub use options::{ChatAdapterOptions, ChatToken, ResolvedChatOptions};
