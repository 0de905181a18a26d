//! Category classifier.
//!
//! A job's title and description go in, a chosen-or-new category name comes
//! out. The transport is any OpenAI-compatible chat completions endpoint.

mod category;
mod openai;
mod provider;
mod types;

pub use category::{
    parse_suggestion, CategorySuggestion, ClassificationRequest, Classifier, ClassifierError,
    LlmCategoryClassifier, UnconfiguredClassifier,
};
pub use openai::{ApiKeySource, OpenAIProvider};
pub use provider::{CompletionOptions, CompletionProvider, LlmError};
pub use types::{CompletionResponse, Message, MessageRole, TokenUsage};
