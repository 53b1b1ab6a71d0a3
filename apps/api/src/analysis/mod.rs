// Resume analysis: extraction → ATS scoring → AI review → assembly.
// All model calls go through llm_client via the ResumeAnalyzer trait.

pub mod analyzer;
pub mod assembler;
pub mod handlers;
pub mod models;
pub mod prompts;
