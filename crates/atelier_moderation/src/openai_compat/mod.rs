//! OpenAI-compatible chat completion client.
//!
//! Used by the safety classifier; any endpoint speaking the chat completions
//! format works.

mod client;
mod dto;

pub use client::{ChatCompletion, OpenAICompatibleClient};
pub use dto::{
    ChatChoice, ChatCompletionError, ChatMessage, ChatRequest, ChatRequestBuilder, ChatResponse,
    ChatResponseMessage,
};
