use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{GenerationOptions, Generator};

/// A scripted generator for tests. Returns pre-defined replies in order
/// and records every prompt it receives.
pub struct MockGenerator {
    replies: Vec<Result<String, String>>,
    index: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn new(replies: Vec<Result<String, String>>) -> Self {
        Self {
            replies,
            index: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with `text` on the first call.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(vec![Ok(text.into())])
    }

    /// Fail the first call with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(vec![Err(message.into())])
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, prompt: &str, _options: &GenerationOptions) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let i = self.index.fetch_add(1, Ordering::SeqCst);
        match self.replies.get(i) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(message)) => Err(anyhow::anyhow!("{message}")),
            None => Err(anyhow::anyhow!(
                "MockGenerator: no more replies (called {} times)",
                i + 1
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replies_in_order_then_runs_out() {
        let mock = MockGenerator::new(vec![Ok("one".to_string()), Err("two".to_string())]);
        let options = GenerationOptions::default();

        assert_eq!(mock.generate("a", &options).await.unwrap(), "one");
        assert_eq!(mock.generate("b", &options).await.unwrap_err().to_string(), "two");
        let err = mock.generate("c", &options).await.unwrap_err();
        assert!(err.to_string().contains("no more replies"));

        assert_eq!(mock.prompts(), vec!["a", "b", "c"]);
    }
}
