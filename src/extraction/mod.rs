//! Natural-language intent extraction

pub mod extractor;
pub mod llm;

pub use extractor::{parse_intent, IntentExtractor};
pub use llm::{LanguageModel, OpenAiChatModel};
