//! Application services
//!
//! Each service owns an injected LLM port and the request settings, and
//! combines them with the pure domain logic.

pub mod meeting_intelligence;
pub mod sales_call;
pub mod sales_insights;

pub use meeting_intelligence::MeetingIntelligenceService;
pub use sales_call::SalesCallAnalyzer;
pub use sales_insights::SalesInsightsService;
