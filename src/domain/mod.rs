/// Domain layer - core business models
///
/// These models and functions are free of I/O: prompt rendering, reply
/// extraction and fallback synthesis are all pure.
pub mod extraction;
pub mod fallback;
pub mod lexicon;
pub mod models;
pub mod prompts;
pub mod sales;

pub use models::{AnalysisInput, AnalysisResult, Attendee, MeetingMetadata, PreviousAction};
pub use prompts::PromptTemplates;
pub use sales::{SalesAnalysis, SalesCallAnalysis, SalesDataset};
