use serde::{Deserialize, Serialize};

// Required fields are optional here so a missing one becomes a 400 with a
// readable message instead of a deserialization rejection.

#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    pub scraped_text: String,
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectModelRequest {
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SelectModelResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
    pub active: String,
}
