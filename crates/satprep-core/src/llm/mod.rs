//! LLM integration
//!
//! Provides traits and implementations for:
//! - Embedding generation via external services (OpenAI, vLLM, etc.)
//! - Prompt completion for question generation

mod client;
mod http;
mod traits;

pub use client::{APIMetrics, ChatMessage, LLMClient, MetricsSnapshot, OpenAIClient};
pub use http::{HttpEmbedder, HttpGenerator};
pub use traits::*;
