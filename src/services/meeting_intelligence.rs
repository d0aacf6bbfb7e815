//! Meeting intelligence service
//!
//! Renders the analysis prompt, makes one model call and reads the reply into
//! an [`AnalysisResult`]. Any failure along the way yields the deterministic
//! fallback instead.

use crate::domain::extraction::extract_analysis;
use crate::domain::fallback::synthesize_fallback;
use crate::domain::{AnalysisInput, AnalysisResult, PromptTemplates};
use crate::error::{AppError, Result};
use crate::ports::llm::{GenerationRequest, LlmConfig, LlmServicePort};
use std::sync::Arc;

pub struct MeetingIntelligenceService {
    llm: Arc<dyn LlmServicePort>,
    config: LlmConfig,
}

impl MeetingIntelligenceService {
    pub fn new(llm: Arc<dyn LlmServicePort>, config: LlmConfig) -> Self {
        Self { llm, config }
    }

    /// The exact request sent to the model for `input`
    pub fn build_request(input: &AnalysisInput) -> GenerationRequest {
        GenerationRequest::new(PromptTemplates::meeting_analysis(input))
            .with_system_instruction(PromptTemplates::meeting_system_instruction())
    }

    /// Analyze a meeting. Always resolves to a complete result.
    pub async fn analyze(&self, input: &AnalysisInput) -> AnalysisResult {
        match self.try_analyze(input).await {
            Ok(result) => result,
            Err(e) => {
                log::warn!(
                    "Meeting analysis via {} failed, using fallback: {}",
                    self.llm.provider_name(),
                    e
                );
                synthesize_fallback(input)
            }
        }
    }

    async fn try_analyze(&self, input: &AnalysisInput) -> Result<AnalysisResult> {
        log::info!(
            "Analyzing meeting \"{}\" with {} attendee(s), transcript {} chars",
            input.meeting_metadata.title,
            input.attendees().len(),
            input.transcript.len()
        );

        let request = Self::build_request(input);
        let reply = self.llm.generate(&request, &self.config).await?;
        if reply.trim().is_empty() {
            return Err(AppError::Llm("No response from model".to_string()));
        }

        Ok(extract_analysis(&reply, input).into_result(input))
    }
}
