#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

//! Upstream callers shared by every adapter
//!
//! [`InferenceClient`] talks to the per-model inference provider with the
//! bounded retry loop that masks model cold-starts; [`ChatClient`] talks to
//! the chat-completion gateway. Both normalize failures into
//! [`cortex_core::ProxyError`].

mod chat;
mod inference;
mod retry;

pub use chat::{ChatClient, ChatContent, ChatMessage, ChatPart};
pub use inference::InferenceClient;
pub use retry::{DelayPolicy, RetryPolicy, TRANSIENT_MARKERS, is_transient};
