//! Personalized suggestions: prompt builders and response parsers for each kind,
//! mentor matching, the generation pipeline and its HTTP handlers.

pub mod companies;
pub mod handlers;
pub mod jobs;
pub mod mentors;
pub mod orchestrator;
pub mod prompts;
pub mod schema;
pub mod skills;
