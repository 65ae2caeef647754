//! Stage combinators.
//!
//! `Chain` runs two stages one after the other. `FanOut` runs two stages on
//! the same input concurrently and merges their outputs.
//!
//! ## Usage
//! ```ignore
//! let plot = RetrieveArticle::new(encyclopedia)
//!     .then(RenderPrompt::new(SUMMARIZE_PLOT))
//!     .then(InvokeModel::new("summarize_plot", model.clone()));
//!
//! let enrich = FanOut::new("enrich", plot, FindTrailer::new(video), |title, summary, trailer| {
//!     Enrichment { title, summary, trailer }
//! });
//! ```

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::traits::Stage;

/// Two stages in sequence.
pub struct Chain<A, B> {
    first: A,
    second: B,
}

impl<A, B> Chain<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

#[async_trait]
impl<A, B> Stage for Chain<A, B>
where
    A: Stage,
    B: Stage<Input = A::Output>,
{
    type Input = A::Input;
    type Output = B::Output;

    fn name(&self) -> &str {
        self.second.name()
    }

    fn layers(&self) -> Vec<Vec<String>> {
        let mut layers = self.first.layers();
        layers.extend(self.second.layers());
        layers
    }

    async fn run(&self, input: A::Input) -> Result<B::Output> {
        debug!("Running stage: {}", self.first.name());
        let intermediate = self.first.run(input).await?;
        debug!("Running stage: {}", self.second.name());
        self.second.run(intermediate).await
    }
}

/// Two independent branches over one input, merged by a closure.
///
/// Both branches get a clone of the input and run concurrently. The first
/// branch error wins and the other branch is dropped.
pub struct FanOut<L, R, F> {
    name: String,
    left: L,
    right: R,
    merge: F,
}

impl<L, R, F> FanOut<L, R, F> {
    pub fn new<O>(name: impl Into<String>, left: L, right: R, merge: F) -> Self
    where
        L: Stage,
        R: Stage<Input = L::Input>,
        F: Fn(L::Input, L::Output, R::Output) -> O,
    {
        Self {
            name: name.into(),
            left,
            right,
            merge,
        }
    }
}

#[async_trait]
impl<L, R, F, O> Stage for FanOut<L, R, F>
where
    L: Stage,
    L::Input: Clone + Sync,
    R: Stage<Input = L::Input>,
    F: Fn(L::Input, L::Output, R::Output) -> O + Send + Sync,
    O: Send + 'static,
{
    type Input = L::Input;
    type Output = O;

    fn name(&self) -> &str {
        &self.name
    }

    /// Branch rows side by side, then one row for the merge.
    fn layers(&self) -> Vec<Vec<String>> {
        let left = self.left.layers();
        let right = self.right.layers();
        let depth = left.len().max(right.len());

        let mut layers: Vec<Vec<String>> = (0..depth)
            .map(|i| {
                let mut row = left.get(i).cloned().unwrap_or_default();
                row.extend(right.get(i).cloned().unwrap_or_default());
                row
            })
            .collect();
        layers.push(vec![self.name.clone()]);
        layers
    }

    async fn run(&self, input: L::Input) -> Result<O> {
        debug!(
            "Fanning out {}: {} | {}",
            self.name,
            self.left.name(),
            self.right.name()
        );
        let (left, right) = tokio::try_join!(
            self.left.run(input.clone()),
            self.right.run(input.clone())
        )?;
        Ok((self.merge)(input, left, right))
    }
}
