//! Shared test doubles for the `newsqa` workspace.

use async_trait::async_trait;
use newsqa::errors::PromptError;
use newsqa::providers::ai::AiProvider;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

// --- Mock AI Provider ---

/// An `AiProvider` that replays queued responses and records every call.
#[derive(Clone, Debug, Default)]
pub struct MockAiProvider {
    responses: Arc<Mutex<Vec<Result<String, String>>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response. Responses are returned in insertion order.
    pub fn add_response(&self, response: &str) {
        self.responses
            .lock()
            .unwrap()
            .push(Ok(response.to_string()));
    }

    /// Queues an API failure.
    pub fn add_error(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push(Err(message.to_string()));
    }

    /// Retrieves the recorded `(system_prompt, user_prompt)` calls for assertion.
    pub fn get_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PromptError> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(PromptError::AiApi(
                "MockAiProvider: no response programmed".to_string(),
            ));
        }
        responses.remove(0).map_err(PromptError::AiApi)
    }
}
