// Food blog post pipeline.
// Implements: restaurant resolution, planning, section writing, review, revision, hashtags.
// All LLM calls go through llm_client — no direct HTTP calls here.

pub mod generator;
pub mod guide;
pub mod handlers;
pub mod hashtags;
pub mod metrics;
pub mod planner;
pub mod prompts;
pub mod restaurant;
pub mod reviewer;
pub mod revisor;
pub mod writer;
