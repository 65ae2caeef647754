//! Stage that sends a prompt to the language model.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use providers::LanguageModel;
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::traits::Stage;

/// One model call. The stage name tags provider errors.
pub struct InvokeModel {
    name: String,
    model: Arc<dyn LanguageModel>,
}

impl InvokeModel {
    pub fn new(name: impl Into<String>, model: Arc<dyn LanguageModel>) -> Self {
        Self {
            name: name.into(),
            model,
        }
    }
}

#[async_trait]
impl Stage for InvokeModel {
    type Input = String;
    type Output = String;

    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, prompt: String) -> Result<String> {
        let start = Instant::now();
        let reply = self
            .model
            .complete(&prompt)
            .await
            .map_err(|e| PipelineError::provider(&self.name, e))?;
        debug!(
            "{}: model replied with {} chars in {:.2?}",
            self.name,
            reply.len(),
            start.elapsed()
        );
        Ok(reply)
    }
}
