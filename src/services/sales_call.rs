//! Sales call analysis
//!
//! Unlike meeting analysis this contract has no fallback: every failure is
//! returned to the caller.

use crate::domain::extraction::parse_sales_call_reply;
use crate::domain::{PromptTemplates, SalesCallAnalysis};
use crate::error::{AppError, Result};
use crate::ports::llm::{GenerationRequest, LlmConfig, LlmServicePort};
use std::sync::Arc;

pub struct SalesCallAnalyzer {
    llm: Arc<dyn LlmServicePort>,
    config: LlmConfig,
}

impl SalesCallAnalyzer {
    pub fn new(llm: Arc<dyn LlmServicePort>, config: LlmConfig) -> Self {
        Self { llm, config }
    }

    pub async fn analyze(&self, transcript: &str) -> Result<SalesCallAnalysis> {
        log::info!("Analyzing sales call transcript ({} chars)", transcript.len());

        let request = GenerationRequest::new(PromptTemplates::sales_call(transcript));
        let reply = self.llm.generate(&request, &self.config).await?;
        if reply.trim().is_empty() {
            return Err(AppError::Llm("No response from model".to_string()));
        }

        parse_sales_call_reply(&reply).ok_or_else(|| {
            log::error!("Sales call reply did not contain JSON");
            AppError::Llm("Invalid response format from model".to_string())
        })
    }
}
