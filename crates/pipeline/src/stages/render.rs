//! Stage that turns a value into a prompt string.

use std::marker::PhantomData;

use async_trait::async_trait;

use crate::error::Result;
use crate::prompts::{PromptTemplate, PromptVars};
use crate::traits::Stage;

/// Renders `template` with the placeholders supplied by the input value.
pub struct RenderPrompt<T> {
    template: PromptTemplate,
    _input: PhantomData<fn(T)>,
}

impl<T> RenderPrompt<T> {
    pub fn new(template: PromptTemplate) -> Self {
        Self {
            template,
            _input: PhantomData,
        }
    }
}

#[async_trait]
impl<T> Stage for RenderPrompt<T>
where
    T: PromptVars + Send + 'static,
{
    type Input = T;
    type Output = String;

    fn name(&self) -> &str {
        self.template.name()
    }

    async fn run(&self, input: T) -> Result<String> {
        Ok(self.template.render(&input.vars()))
    }
}
