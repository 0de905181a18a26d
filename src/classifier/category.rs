//! Job category classification on top of a completion provider.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::provider::{CompletionOptions, CompletionProvider, LlmError};
use super::types::Message;
use crate::server::metrics;
use crate::store::UNCATEGORIZED;

const MISSING_DESCRIPTION: &str = "No description provided";
const NO_CATEGORIES_YET: &str = "None (this will be the first category)";

const SYSTEM_PROMPT: &str = "You are an intelligent categorization assistant for a job platform called J-KIT. \
Your task is to analyze a new job posting and place it into the most appropriate category. \
You can either use one of the existing categories or, if none are suitable, create a new, sensible category name.";

lazy_static! {
    static ref CODE_FENCE: Regex = Regex::new(r"```(?:json|JSON)?").expect("valid fence regex");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRequest {
    pub title: String,
    pub description: String,
    pub known_categories: Vec<String>,
}

/// The classifier's answer: an existing category, or a new one to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySuggestion {
    pub name: String,
    pub is_new: bool,
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier call failed: {0}")]
    Provider(#[from] LlmError),

    #[error("malformed classifier response: {0}")]
    Malformed(String),

    #[error("no classifier is configured")]
    NotConfigured,
}

/// Maps a job's text to a category name.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<CategorySuggestion, ClassifierError>;
}

/// Asks a completion provider for a `{"name", "isNew"}` JSON answer.
pub struct LlmCategoryClassifier {
    provider: Arc<dyn CompletionProvider>,
    options: CompletionOptions,
}

impl LlmCategoryClassifier {
    pub fn new(provider: Arc<dyn CompletionProvider>, options: CompletionOptions) -> Self {
        Self { provider, options }
    }

    /// Checks that the backing endpoint answers at all.
    pub async fn check_health(&self) -> Result<(), LlmError> {
        self.provider.health_check().await
    }

    fn build_prompt(request: &ClassificationRequest) -> String {
        let description = match request.description.trim() {
            "" => MISSING_DESCRIPTION,
            d => d,
        };
        let categories = if request.known_categories.is_empty() {
            NO_CATEGORIES_YET.to_string()
        } else {
            request.known_categories.join(", ")
        };

        format!(
            r#"Here is the list of existing categories:
{categories}

Here is the new job posting:
- Title: "{title}"
- Description: "{description}"

Instructions:
1. Read the title and description carefully to understand the job's core function.
2. Compare this understanding against the list of existing categories.
3. If a suitable category exists, choose it. The match doesn't have to be exact, but it should be logical (e.g., "House painter" fits into "Skilled trades, Building and Maintenance").
4. If NO existing category is a good fit, create a concise and professional new category name (e.g., "Event Management", "Animal Care", "Data Science"). Do not create a new category if a reasonable one already exists.
5. Your response MUST be a single, valid JSON object with two keys:
   - "name": The chosen or newly created category name (string).
   - "isNew": A boolean value, true if you created a new category, false otherwise.

Example 1 (Existing):
Input: Title="Babysitter Needed for Weekend", Description="Looking for a reliable person to watch our two kids..."
Existing Categories: ["Domestic work", "Skilled trades...", ...]
Output: {{ "name": "Domestic work", "isNew": false }}

Example 2 (New):
Input: Title="Data Analyst for E-commerce startup", Description="We need a data analyst to track KPIs and build dashboards..."
Existing Categories: ["Domestic work", "I.T jobs", ...]
Output: {{ "name": "Data Science", "isNew": true }}

Now, analyze the provided job posting and return the JSON object."#,
            title = request.title.trim(),
        )
    }
}

#[async_trait]
impl Classifier for LlmCategoryClassifier {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<CategorySuggestion, ClassifierError> {
        let messages = [
            Message::system(SYSTEM_PROMPT),
            Message::user(Self::build_prompt(request)),
        ];

        let started = Instant::now();
        let result = self.provider.complete(&messages, &self.options).await;
        metrics::record_classifier_request(
            if result.is_ok() { "ok" } else { "error" },
            started.elapsed(),
        );
        let response = result?;

        debug!(
            provider = self.provider.name(),
            model = self.provider.model(),
            raw = %response.message.content,
            "Classifier answered"
        );
        parse_suggestion(&response.message.content)
    }
}

/// Stand-in used when no provider is configured. Every run aborts.
pub struct UnconfiguredClassifier;

#[async_trait]
impl Classifier for UnconfiguredClassifier {
    async fn classify(
        &self,
        _request: &ClassificationRequest,
    ) -> Result<CategorySuggestion, ClassifierError> {
        Err(ClassifierError::NotConfigured)
    }
}

/// Extracts `{"name", "isNew"}` from a completion, tolerating code fences and
/// prose around the JSON object.
pub fn parse_suggestion(raw: &str) -> Result<CategorySuggestion, ClassifierError> {
    let cleaned = CODE_FENCE.replace_all(raw, "");
    let (start, end) = match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => return Err(ClassifierError::Malformed(format!("no JSON object in {:?}", raw))),
    };

    let value: Value = serde_json::from_str(&cleaned[start..=end])
        .map_err(|e| ClassifierError::Malformed(e.to_string()))?;

    let name = value
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();
    if name.is_empty() {
        return Err(ClassifierError::Malformed("missing category name".to_string()));
    }
    if name.eq_ignore_ascii_case(UNCATEGORIZED) {
        return Err(ClassifierError::Malformed(format!(
            "classifier answered with the placeholder {:?}",
            name
        )));
    }

    let is_new = match value.get("isNew") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => true,
        Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => false,
        Some(other) => {
            return Err(ClassifierError::Malformed(format!(
                "isNew is not a boolean: {}",
                other
            )))
        }
    };

    Ok(CategorySuggestion {
        name: name.to_string(),
        is_new,
    })
}
