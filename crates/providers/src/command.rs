//! Video search through an external program.
//!
//! Some search tools only print a formatted list of links, e.g.
//! `['https://www.youtube.com/watch?v=...', ...]`. The program is invoked with
//! the query appended as its last argument and its stdout is handed back
//! untouched as `VideoResults::Display`.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{ProviderError, Result};
use crate::{VideoResults, VideoSearch};

#[derive(Debug, Clone)]
pub struct CommandVideoSearch {
    program: String,
    args: Vec<String>,
}

impl CommandVideoSearch {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

#[async_trait]
impl VideoSearch for CommandVideoSearch {
    async fn search(&self, query: &str) -> Result<VideoResults> {
        debug!("Running {} {:?} with query {:?}", self.program, self.args, query);
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(query)
            .output()
            .await?;

        if !output.status.success() {
            return Err(ProviderError::CommandFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(VideoResults::Display(
            String::from_utf8_lossy(&output.stdout).into_owned(),
        ))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_command_output_is_returned_verbatim() {
        let search = CommandVideoSearch::new("echo", vec!["found:".to_string()]);
        let results = search.search("Heat movie trailer").await.unwrap();
        assert_eq!(
            results,
            VideoResults::Display("found: Heat movie trailer\n".to_string())
        );
    }

    #[tokio::test]
    async fn test_failing_command_is_classified() {
        let search = CommandVideoSearch::new("false", vec![]);
        let result = search.search("anything").await;
        assert!(matches!(result, Err(ProviderError::CommandFailed { .. })));
    }

    #[tokio::test]
    async fn test_missing_program_is_classified() {
        let search = CommandVideoSearch::new("movie-chain-no-such-program", vec![]);
        let result = search.search("anything").await;
        assert!(matches!(result, Err(ProviderError::Command(_))));
    }
}
