//! Prompt templates for the decision oracle

pub mod template;

pub use template::PromptTemplate;
