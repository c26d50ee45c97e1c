use serde::{Deserialize, Serialize};

// ===== Chat completion wire types =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

impl ChatResponse {
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|choice| choice.message.content.as_str())
    }
}

// Error body returned by the completions API on non-2xx
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
}

// ===== Company research =====

/// Profile cached per company name under `companyProfiles`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyProfile {
    pub company_name: String,
    pub industry: String,
    pub size: String,
    pub culture: String,
    pub values: Vec<String>,
    pub recent_news: Vec<String>,
    pub tech_stack: Vec<String>,
    pub benefits: Vec<String>,
    pub interview_process: String,
    pub tips: Vec<String>,
    /// Prose answer kept verbatim when the model did not return JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
}
