// Draft generation: job extraction, email drafting, subject/body splitting.
// All LLM calls go through llm_client::CompletionService; no direct HTTP calls here.

pub mod email_drafter;
pub mod email_parser;
pub mod handlers;
pub mod job_extractor;
pub mod pipeline;
pub mod prompts;

#[cfg(test)]
pub mod test_support;
