//! Summarize and chat operations on top of a [`ChatModel`].

use tracing::{info, warn};

use crate::llm::{ChatModel, CompletionRequest, LlmError, CHAT_PARAMS, SUMMARY_PARAMS};
use crate::prompt::{chat_prompt, summary_prompt};
use crate::scraper::PageContent;

#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error("Cannot summarize due to scraping error.")]
    ScrapeFailed,

    #[error("Error summarizing text: {0}")]
    Llm(#[from] LlmError),
}

#[derive(Debug, thiserror::Error)]
#[error("Error generating response: {0}")]
pub struct ChatError(#[from] pub LlmError);

/// Summarizes scraped page text with `model_id`. A failed scrape short-circuits
/// without calling the model.
pub async fn summarize(
    model: &dyn ChatModel,
    page: &PageContent,
    model_id: &str,
) -> Result<String, SummarizeError> {
    let text = match page {
        Ok(text) => text,
        Err(_) => return Err(SummarizeError::ScrapeFailed),
    };

    let request = CompletionRequest {
        model: model_id.to_string(),
        prompt: summary_prompt(text.as_str()),
        params: SUMMARY_PARAMS,
    };

    let summary = model.complete(request).await.inspect_err(|e| {
        warn!(model_id, error = %e, "summarization failed");
    })?;

    info!(model_id, summary_len = summary.len(), "page summarized");
    Ok(summary)
}

pub async fn chat(
    model: &dyn ChatModel,
    message: &str,
    context: Option<&str>,
    model_id: &str,
) -> Result<String, ChatError> {
    let request = CompletionRequest {
        model: model_id.to_string(),
        prompt: chat_prompt(message, context),
        params: CHAT_PARAMS,
    };

    let reply = model.complete(request).await.inspect_err(|e| {
        warn!(model_id, error = %e, "chat completion failed");
    })?;

    info!(model_id, reply_len = reply.len(), "chat answered");
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::scraper::extract_text;

    #[derive(Default)]
    struct RecordingModel {
        calls: Mutex<Vec<CompletionRequest>>,
        fail: bool,
    }

    #[async_trait]
    impl ChatModel for RecordingModel {
        async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
            self.calls.lock().unwrap().push(request);
            if self.fail {
                Err(LlmError::Status {
                    status: 429,
                    message: "rate limited".into(),
                })
            } else {
                Ok("stub reply".into())
            }
        }
    }

    async fn failed_page() -> PageContent {
        // Relative URLs fail while the request is built, before any I/O.
        crate::scraper::PageFetcher::new()
            .unwrap()
            .scrape("not a url")
            .await
    }

    #[tokio::test]
    async fn scrape_failure_skips_model() {
        let model = RecordingModel::default();
        let page = failed_page().await;

        let err = summarize(&model, &page, "llama-3.1-8b-instant").await.unwrap_err();

        assert_eq!(err.to_string(), "Cannot summarize due to scraping error.");
        assert!(model.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn summarize_uses_summary_params_and_model() {
        let model = RecordingModel::default();
        let page: PageContent = Ok(extract_text("<p>Ferris the crab.</p>"));

        let summary = summarize(&model, &page, "gemma2-9b-it").await.unwrap();

        assert_eq!(summary, "stub reply");
        let calls = model.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, "gemma2-9b-it");
        assert_eq!(calls[0].params, SUMMARY_PARAMS);
        assert!(calls[0].prompt.user.ends_with("Ferris the crab."));
    }

    #[tokio::test]
    async fn summarize_reports_model_failure() {
        let model = RecordingModel {
            fail: true,
            ..Default::default()
        };
        let page: PageContent = Ok(extract_text("<p>text</p>"));

        let err = summarize(&model, &page, "m").await.unwrap_err();

        assert_eq!(err.to_string(), "Error summarizing text: HTTP 429: rate limited");
    }

    #[tokio::test]
    async fn chat_uses_chat_params() {
        let model = RecordingModel::default();

        let reply = chat(&model, "hello", Some("context text"), "mixtral-8x7b-32768")
            .await
            .unwrap();

        assert_eq!(reply, "stub reply");
        let calls = model.calls.lock().unwrap();
        assert_eq!(calls[0].params, CHAT_PARAMS);
        assert_eq!(calls[0].model, "mixtral-8x7b-32768");
        assert!(calls[0].prompt.user.contains("context text"));
    }

    #[tokio::test]
    async fn chat_reports_model_failure() {
        let model = RecordingModel {
            fail: true,
            ..Default::default()
        };

        let err = chat(&model, "hello", None, "m").await.unwrap_err();

        assert_eq!(err.to_string(), "Error generating response: HTTP 429: rate limited");
    }
}
