pub mod audio;
pub mod billing;
pub mod classifier;
pub mod llm;
pub mod observability;
pub mod persistence;
pub mod text_processing;
