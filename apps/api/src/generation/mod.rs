// Draft generation pipeline: angle fan-out, per-angle search enrichment,
// per-angle model calls, partial-failure aggregation.
// All LLM calls go through llm_client — no direct Anthropic calls here.

pub mod handlers;
pub mod orchestrator;
