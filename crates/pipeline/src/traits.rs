//! Core traits for the recommendation pipeline.
//!
//! A `Stage` is one step `Input -> Result<Output>`. Stages are composed with
//! `StageExt::then` (sequential, short-circuits on the first error) and
//! `FanOut` (two branches over the same input, merged afterwards).

use async_trait::async_trait;

use crate::chain::Chain;
use crate::error::Result;

/// Core trait for pipeline steps.
///
/// ## Design Note
/// - `Send + Sync` so composed pipelines can be shared across tasks
/// - `run` takes its input by value; stages never mutate upstream values
#[async_trait]
pub trait Stage: Send + Sync {
    type Input: Send + 'static;
    type Output: Send + 'static;

    /// Returns the name of this stage (for logging and error context)
    fn name(&self) -> &str;

    /// Rows of stage names, top to bottom, used to draw the pipeline graph.
    fn layers(&self) -> Vec<Vec<String>> {
        vec![vec![self.name().to_string()]]
    }

    async fn run(&self, input: Self::Input) -> Result<Self::Output>;
}

/// A type-erased stage.
pub type BoxStage<I, O> = Box<dyn Stage<Input = I, Output = O>>;

/// Builder helpers available on every stage.
pub trait StageExt: Stage + Sized {
    /// Feed this stage's output into `next`.
    fn then<B>(self, next: B) -> Chain<Self, B>
    where
        B: Stage<Input = Self::Output>,
    {
        Chain::new(self, next)
    }

    fn boxed(self) -> BoxStage<Self::Input, Self::Output>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<S: Stage> StageExt for S {}
