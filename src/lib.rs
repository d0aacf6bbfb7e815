//! Meeting and sales-call intelligence on top of Google Gemini
//!
//! Layout follows ports and adapters: pure `domain` logic, the `ports` the
//! domain needs, `adapters` for concrete services, and `services` wiring them
//! together for the CLI `commands`.

pub mod adapters;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

use adapters::services::llm::GoogleService;
use config::AppConfig;
use error::Result;
use ports::llm::{LlmConfig, LlmServicePort};
use services::{MeetingIntelligenceService, SalesCallAnalyzer, SalesInsightsService};
use std::sync::Arc;

/// Shared state handed to every command
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn LlmServicePort>,
    pub llm_config: LlmConfig,
}

impl AppState {
    pub fn new(llm: Arc<dyn LlmServicePort>, llm_config: LlmConfig) -> Self {
        Self { llm, llm_config }
    }

    /// Gemini-backed state. A missing API key is not an error here.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        if let Err(e) = config.require_api_key() {
            log::warn!("{}; model calls will fail", e);
        }
        let google = GoogleService::from_config(config)?;
        Ok(Self::new(Arc::new(google), config.llm_config()))
    }

    pub fn meeting_service(&self) -> MeetingIntelligenceService {
        MeetingIntelligenceService::new(self.llm.clone(), self.llm_config.clone())
    }

    pub fn sales_call_analyzer(&self) -> SalesCallAnalyzer {
        SalesCallAnalyzer::new(self.llm.clone(), self.llm_config.clone())
    }

    pub fn sales_insights_service(&self) -> SalesInsightsService {
        SalesInsightsService::new(self.llm.clone(), self.llm_config.clone())
    }
}
