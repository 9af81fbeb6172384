//! Agri Portal core
//!
//! The pieces of the agri portal that carry real state or policy:
//!
//! - [`reply`] - first-match keyword reply rules behind `/api/chat`
//! - [`catalog`] - the ordered catalog of third-party AI services
//! - [`session`] - the embedded-service session (Closed/Loading/Ready/Failed)
//! - [`overlay`] - page scroll lock shared by the modal-like overlays
//! - [`chat`] - client side of the chat panel
//! - [`config`] - environment driven server configuration

pub mod catalog;
pub mod chat;
pub mod config;
pub mod error;
pub mod opener;
pub mod overlay;
pub mod reply;
pub mod session;

pub use catalog::{ServiceCatalog, ServiceDescriptor};
pub use chat::{ChatClient, ChatMessage, ChatReply, ChatRole, Conversation};
pub use config::ServerConfig;
pub use error::{CatalogError, ChatClientError, ConfigError, ReplyRuleError};
pub use opener::ExternalOpener;
pub use overlay::{Overlay, ScrollLock};
pub use reply::{PatternRule, ReplyMatcher};
pub use session::{
    ActiveSession, EmbedPhase, EmbedSession, InstanceToken, OpenOutcome, SessionSnapshot,
    SessionState, EMBED_LOAD_TIMEOUT,
};
