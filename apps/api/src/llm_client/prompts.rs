// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Sampling temperature for every call. Extraction and drafting must be reproducible.
pub const DETERMINISTIC_TEMPERATURE: f32 = 0.0;

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to free-text prompts so the model emits the artifact and nothing else.
pub const NO_PREAMBLE_INSTRUCTION: &str =
    "Do not provide a preamble or post-amble, only the requested content.";
