pub mod llm_service;

pub use llm_service::{parse_answer_payload, AnswerResolver, LlmService};
