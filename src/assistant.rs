//! Chat assistant that answers questions about the current roster.
//!
//! Each question is a single `generateContent` call carrying a fresh
//! attendance summary. Every failure is turned into a fixed reply; callers
//! never see transport errors.

use crate::config::Config;
use crate::models::AppData;
use crate::stats::StudentTally;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

pub const MISSING_KEY_REPLY: &str =
    "I need an API Key to see your data! Please check your environment configuration.";
pub const FAILURE_REPLY: &str = "Oop! My circuits are jammed. Please try again later.";
pub const EMPTY_REPLY: &str = "I couldn't think of a response right now.";

const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("text service returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// One line per student: `"<name>: <p> Present, <a> Absent, <l> Late"`.
pub fn roster_summary(data: &AppData) -> String {
    data.students
        .iter()
        .map(|student| {
            let tally = StudentTally::for_record(data.attendance.get(&student.id));
            format!(
                "{}: {} Present, {} Absent, {} Late",
                student.name, tally.present, tally.absent, tally.late
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn system_instruction(summary: &str) -> String {
    format!(
        "You are \"Sparky\", a cheerful and motivating robot assistant for the JDVP 40-Day Training Program.\n\
         \n\
         Your goal is to help the instructor manage attendance and analyze student performance.\n\
         \n\
         Here is the current class summary:\n\
         {summary}\n\
         \n\
         Rules:\n\
         1. Be concise, encouraging, and helpful.\n\
         2. If asked about specific students, use the provided summary.\n\
         3. Identify students at risk (high absences) if asked.\n\
         4. Keep the tone professional but fun."
    )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    fn text(&self) -> Option<String> {
        let text: String = self
            .candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.trim().is_empty() { None } else { Some(text) }
    }
}

/// Thin client for the Gemini `generateContent` endpoint.
/// Clone is cheap; reqwest shares its connection pool.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, base_url: String) -> Result<Self, AssistantError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the generated text, or `None` when the service answered
    /// without any.
    pub async fn generate(
        &self,
        system: &str,
        message: &str,
    ) -> Result<Option<String>, AssistantError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: system }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: message }],
            }],
        };

        debug!(model = %self.model, "sending assistant request");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Status { status, body });
        }

        let parsed: GenerateResponse = response.json().await?;
        Ok(parsed.text())
    }
}

pub struct Assistant {
    client: Option<GeminiClient>,
}

impl Assistant {
    pub fn new(client: Option<GeminiClient>) -> Self {
        Self { client }
    }

    /// Builds the assistant from config. A missing key, or a client that
    /// can't be built, leaves the assistant disabled.
    pub fn from_config(config: &Config) -> Self {
        let client = config.gemini_api_key.as_ref().and_then(|key| {
            GeminiClient::new(
                key.clone(),
                config.gemini_model.clone(),
                config.gemini_api_base.clone(),
            )
            .map_err(|err| error!("failed to build assistant client: {err}"))
            .ok()
        });
        Self::new(client)
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    pub async fn ask(&self, query: &str, snapshot: &AppData) -> String {
        let Some(client) = &self.client else {
            return MISSING_KEY_REPLY.to_string();
        };

        let system = system_instruction(&roster_summary(snapshot));
        match client.generate(&system, query).await {
            Ok(Some(text)) => text,
            Ok(None) => EMPTY_REPLY.to_string(),
            Err(err) => {
                error!("assistant request failed: {err}");
                FAILURE_REPLY.to_string()
            }
        }
    }
}
