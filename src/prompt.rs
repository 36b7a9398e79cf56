//! System/user message pairs for the two model tasks.

use crate::scraper::truncate_chars;

pub const MAX_SUMMARY_INPUT_CHARS: usize = 8_000;
pub const SUMMARY_TRUNCATION_MARKER: &str = "... [text truncated for summarization]";

const SUMMARY_SYSTEM: &str =
    "You are a helpful assistant that creates concise summaries of web content.";
const CHAT_SYSTEM: &str =
    "You are a helpful assistant that answers questions based on provided context when available.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

pub fn summary_prompt(text: &str) -> Prompt {
    let text = truncate_chars(text, MAX_SUMMARY_INPUT_CHARS, SUMMARY_TRUNCATION_MARKER);

    // Pre-allocate approximately the right amount of space
    let mut user = String::with_capacity(text.len() + 80);
    user.push_str("Please provide a clear and concise summary of the following text:\n\n");
    user.push_str(&text);

    Prompt {
        system: SUMMARY_SYSTEM.to_string(),
        user,
    }
}

/// Builds the chat prompt. Context is only used when it is non-empty and is
/// not an echoed scrape failure.
pub fn chat_prompt(message: &str, context: Option<&str>) -> Prompt {
    let user = match usable_context(context) {
        Some(context) => format!(
            "Context from scraped webpage:\n{context}\n\nUser question: {message}\n\n\
             Please answer based on the context when possible:"
        ),
        None => format!("User question: {message}\n\nPlease answer helpfully:"),
    };

    Prompt {
        system: CHAT_SYSTEM.to_string(),
        user,
    }
}

// Clients send back whatever `scraped_text` they got, including error text.
fn usable_context(context: Option<&str>) -> Option<&str> {
    context.filter(|c| !c.is_empty() && !c.starts_with("Error"))
}
