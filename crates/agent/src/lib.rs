//! Assistant side of qcars: turns a free-text trip description into an
//! ordered list of recommended vehicle ids.
//!
//! - `llm` - the `LlmClient` seam plus Gemini and Ollama adapters over `reqwest`
//! - `recommendation` - prompt assembly, strict reply parsing, fallback reply
//! - `conversation` - a single-flight chat session with its transcript
//!
//! # Safety Principle
//!
//! The model only suggests ids. Prices, discounts and availability always come
//! from `qcars-core`, and a reply that does not match the schema is discarded.

pub mod conversation;
pub mod llm;
pub mod recommendation;

pub use conversation::{ChatError, ChatMessage, ChatRole, ChatSession};
pub use llm::{build_client, CompletionRequest, LlmClient};
pub use recommendation::{Recommendation, RecommendationService, FALLBACK_MESSAGE};
