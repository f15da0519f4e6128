use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use qcars_core::domain::vehicle::Vehicle;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::recommendation::{Recommendation, RecommendationService};

pub const GREETING: &str = "Hi! I'm Q-Bot. Tell me about your trip (e.g., 'weekend in the mountains' or 'business trip alone') and I'll suggest the perfect car.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("a recommendation request is already in flight")]
    Busy,
    #[error("prompt must not be blank")]
    EmptyPrompt,
}

/// One assistant conversation. At most one prompt is outstanding at a time;
/// a second submit while one is pending is rejected, not queued.
pub struct ChatSession {
    service: Arc<RecommendationService>,
    in_flight: AtomicBool,
    log: Mutex<Vec<ChatMessage>>,
}

impl ChatSession {
    pub fn new(service: Arc<RecommendationService>) -> Self {
        Self {
            service,
            in_flight: AtomicBool::new(false),
            log: Mutex::new(vec![ChatMessage {
                role: ChatRole::Assistant,
                text: GREETING.to_string(),
            }]),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn submit(
        &self,
        prompt: &str,
        catalog: &[Vehicle],
    ) -> Result<Recommendation, ChatError> {
        if prompt.trim().is_empty() {
            return Err(ChatError::EmptyPrompt);
        }
        let _guard = InFlight::acquire(&self.in_flight).ok_or(ChatError::Busy)?;

        self.push(ChatRole::User, prompt).await;
        let recommendation = self.service.recommend(prompt, catalog).await;
        self.push(ChatRole::Assistant, &recommendation.message).await;

        Ok(recommendation)
    }

    pub async fn transcript(&self) -> Vec<ChatMessage> {
        self.log.lock().await.clone()
    }

    async fn push(&self, role: ChatRole, text: &str) {
        self.log.lock().await.push(ChatMessage { role, text: text.to_string() });
    }
}

/// Clears the in-flight flag when the submission ends, including on drop of
/// a cancelled future.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
