// src/ai.rs
//! Remote AI collaborator with heuristic fallback

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::AiConfig;
use crate::job::analysis::{analysis_from_ai, analyze_posting};
use crate::storage::{KvStore, StorageKey};
use crate::types::job::{JobAnalysis, JobPosting};
use crate::types::response::{ApiErrorBody, ChatMessage, ChatRequest, ChatResponse, CompanyProfile};

pub const SYSTEM_PROMPT: &str = "You are an expert resume writer and career consultant with deep knowledge of ATS systems, hiring practices, and industry trends. You help job seekers create compelling, tailored resumes that highlight their strengths and match job requirements.";

const CHAT_COMPLETIONS_ENDPOINT: &str = "/chat/completions";

/// Model reply: parsed JSON when the content was a JSON object, else the raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum AiPayload {
    Structured(Value),
    Text(String),
}

/// Code fences around a JSON reply are tolerated.
pub fn parse_structured(content: &str) -> AiPayload {
    let trimmed = content.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    match serde_json::from_str::<Value>(unfenced) {
        Ok(value) if value.is_object() => AiPayload::Structured(value),
        _ => AiPayload::Text(content.to_string()),
    }
}

pub struct AiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl AiClient {
    pub fn new(config: &AiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .context("OpenAI API key not configured")?;

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    pub async fn chat(&self, system: &str, user: &str) -> Result<AiPayload> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let url = format!("{}{}", self.base_url, CHAT_COMPLETIONS_ENDPOINT);
        info!("Sending chat completion request to {} ({})", url, self.model);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .context("Failed to send request to OpenAI API")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&error_text)
                .map(|body| body.error.message)
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("OpenAI API error {}: {}", status, error_text);
            anyhow::bail!("OpenAI API error ({}): {}", status, message);
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI API response")?;

        let content = chat_response
            .first_content()
            .context("OpenAI API response contained no choices")?;

        Ok(parse_structured(content))
    }
}

pub fn job_analysis_prompt(posting: &JobPosting) -> String {
    format!(
        r#"Analyze this job posting and provide a comprehensive analysis in JSON format:

Job Title: {}
Company: {}
Location: {}
Job Description: {}

Please provide analysis in this exact JSON format:
{{
    "keywords": ["list", "of", "important", "keywords"],
    "requirements": ["list", "of", "key", "requirements"],
    "skills": {{
        "technical": ["technical", "skills", "needed"],
        "soft": ["soft", "skills", "needed"]
    }},
    "experience": {{
        "level": "entry|mid|senior|lead",
        "years": "X+ years",
        "type": "description of experience type"
    }},
    "industry": "detected industry"
}}"#,
        posting.title, posting.company, posting.location, posting.description
    )
}

pub fn company_analysis_prompt(company: &str) -> String {
    format!(
        r#"Analyze this company and provide insights in JSON format:

Company: {}

Please provide analysis in this exact JSON format:
{{
    "industry": "primary industry",
    "size": "startup|small|medium|large|enterprise",
    "culture": "company culture description",
    "values": ["core", "company", "values"],
    "recentNews": ["notable", "recent", "developments"],
    "techStack": ["common", "technologies", "used"],
    "benefits": ["common", "benefits", "offered"],
    "interviewProcess": "typical interview process",
    "tips": ["advice", "for", "candidates"]
}}"#,
        company
    )
}

/// Job and company analysis. Job analysis never fails: without a key, on a
/// transport error, or on an unreadable reply it uses the heuristics.
pub struct JobAnalyzer {
    client: Option<AiClient>,
}

impl JobAnalyzer {
    /// Without an API key this is the offline analyzer.
    pub fn new(config: &AiConfig) -> Self {
        if !config.has_api_key() {
            debug!("No AI API key configured, using heuristic analysis");
            return Self::offline();
        }

        let client = match AiClient::new(config) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("AI analysis disabled: {:#}", e);
                None
            }
        };
        Self { client }
    }

    /// Heuristics only.
    pub fn offline() -> Self {
        Self { client: None }
    }

    pub fn is_online(&self) -> bool {
        self.client.is_some()
    }

    pub async fn analyze(&self, posting: &JobPosting) -> JobAnalysis {
        let Some(client) = &self.client else {
            return analyze_posting(posting);
        };

        match client.chat(SYSTEM_PROMPT, &job_analysis_prompt(posting)).await {
            Ok(payload) => analysis_from_payload(&payload, posting),
            Err(e) => {
                warn!("AI job analysis failed, using heuristics: {:#}", e);
                analyze_posting(posting)
            }
        }
    }

    /// Cached per company under `companyProfiles`; a miss asks the model and
    /// stores the answer.
    pub async fn analyze_company(&self, company: &str, store: &KvStore) -> Result<CompanyProfile> {
        if let Some(profile) = store.company_profile(company).await? {
            info!("Using cached company profile for {}", company);
            return Ok(profile);
        }

        let client = self
            .client
            .as_ref()
            .context("OpenAI API key not configured")?;

        let profile = match client.chat(SYSTEM_PROMPT, &company_analysis_prompt(company)).await? {
            AiPayload::Structured(value) => {
                let mut profile: CompanyProfile = serde_json::from_value(value)
                    .context("Failed to read company profile from AI response")?;
                profile.company_name = company.to_string();
                profile
            }
            AiPayload::Text(text) => CompanyProfile {
                company_name: company.to_string(),
                analysis: Some(text),
                ..CompanyProfile::default()
            },
        };

        store.save_company_profile(company, &profile).await?;
        Ok(profile)
    }
}

/// Structured replies become an analysis; prose or unreadable replies fall
/// back to heuristics, keeping the prose as notes.
pub fn analysis_from_payload(payload: &AiPayload, posting: &JobPosting) -> JobAnalysis {
    match payload {
        AiPayload::Structured(value) => analysis_from_ai(value, posting).unwrap_or_else(|| {
            warn!("AI analysis missing expected fields, using heuristics");
            analyze_posting(posting)
        }),
        AiPayload::Text(text) => {
            warn!("AI analysis was not JSON, using heuristics");
            JobAnalysis {
                notes: Some(text.clone()),
                analyzed_at: Utc::now(),
                ..analyze_posting(posting)
            }
        }
    }
}

/// The stored `aiConfig` wins over the configured defaults, except that a
/// configured key fills a stored record that has none.
pub async fn resolve_ai_config(store: &KvStore, fallback: &AiConfig) -> Result<AiConfig> {
    let mut config = store
        .get::<AiConfig>(StorageKey::AiConfig)
        .await?
        .unwrap_or_else(|| fallback.clone());
    if !config.has_api_key() && fallback.has_api_key() {
        config.api_key = fallback.api_key.clone();
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::job::Industry;
    use serde_json::json;

    fn posting() -> JobPosting {
        JobPosting {
            title: "Data Engineer".to_string(),
            company: "Globex".to_string(),
            location: "Berlin".to_string(),
            description: "<p>Senior role, 5+ years of experience with SQL at a bank.</p>".to_string(),
            url: "https://jobs.globex.example/7".to_string(),
            source: "Generic".to_string(),
        }
    }

    #[test]
    fn test_parse_structured() {
        assert_eq!(
            parse_structured(r#"{"keywords":["sql"]}"#),
            AiPayload::Structured(json!({"keywords": ["sql"]}))
        );
        assert_eq!(
            parse_structured("```json\n{\"a\": 1}\n```"),
            AiPayload::Structured(json!({"a": 1}))
        );
        assert_eq!(
            parse_structured("This role suits you."),
            AiPayload::Text("This role suits you.".to_string())
        );
        assert!(matches!(parse_structured("[1, 2]"), AiPayload::Text(_)));
    }

    #[test]
    fn test_text_payload_falls_back_to_heuristics() {
        let payload = AiPayload::Text("Looks like a strong fit.".to_string());
        let analysis = analysis_from_payload(&payload, &posting());

        assert_eq!(analysis.notes.as_deref(), Some("Looks like a strong fit."));
        assert_eq!(analysis.experience[0], "5+ years of experience");
        assert!(analysis.keywords.contains(&"sql".to_string()));
        assert_eq!(analysis.company, "Globex");
    }

    #[test]
    fn test_structured_payload_is_used() {
        let payload = AiPayload::Structured(json!({
            "keywords": ["spark"],
            "industry": "healthcare"
        }));
        let analysis = analysis_from_payload(&payload, &posting());
        assert_eq!(analysis.keywords, vec!["spark"]);
        assert_eq!(analysis.industry, Industry::Healthcare);
    }

    #[test]
    fn test_client_requires_api_key() {
        assert!(AiClient::new(&AiConfig::default()).is_err());
        let config = AiConfig {
            api_key: Some("  ".to_string()),
            ..AiConfig::default()
        };
        assert!(AiClient::new(&config).is_err());
        assert!(!JobAnalyzer::new(&config).is_online());
    }

    #[test]
    fn test_analyzer_online_only_with_key() {
        assert!(!JobAnalyzer::new(&AiConfig::default()).is_online());
        let config = AiConfig {
            api_key: Some("sk-test".to_string()),
            ..AiConfig::default()
        };
        assert!(JobAnalyzer::new(&config).is_online());
    }

    #[tokio::test]
    async fn test_offline_analyzer_uses_heuristics() {
        let analysis = JobAnalyzer::offline().analyze(&posting()).await;
        assert!(analysis.notes.is_none());
        assert!(analysis.skills.contains(&"database".to_string()));
    }

    #[tokio::test]
    async fn test_company_analysis_cache_and_key_requirement() {
        let store = KvStore::open_in_memory().await.unwrap();
        let analyzer = JobAnalyzer::offline();
        assert!(analyzer.analyze_company("Globex", &store).await.is_err());

        let cached = CompanyProfile {
            company_name: "Globex".to_string(),
            culture: "Pragmatic".to_string(),
            ..CompanyProfile::default()
        };
        store.save_company_profile("Globex", &cached).await.unwrap();
        assert_eq!(analyzer.analyze_company("Globex", &store).await.unwrap(), cached);
    }

    #[tokio::test]
    async fn test_resolve_ai_config() {
        let store = KvStore::open_in_memory().await.unwrap();
        let fallback = AiConfig {
            api_key: Some("sk-env".to_string()),
            ..AiConfig::default()
        };
        assert_eq!(resolve_ai_config(&store, &fallback).await.unwrap(), fallback);

        let stored = AiConfig {
            model: "gpt-4o".to_string(),
            ..AiConfig::default()
        };
        store.set(StorageKey::AiConfig, &stored).await.unwrap();
        let resolved = resolve_ai_config(&store, &fallback).await.unwrap();
        assert_eq!(resolved.model, "gpt-4o");
        assert_eq!(resolved.api_key.as_deref(), Some("sk-env"));
    }
}
