//! Meeting analysis commands

use super::read_json;
use crate::domain::AnalysisInput;
use crate::error::Result;
use crate::services::MeetingIntelligenceService;
use crate::AppState;
use std::path::Path;

/// Analyze the meeting described by a JSON [`AnalysisInput`] file
pub async fn analyze_meeting_file(state: &AppState, input: &Path) -> Result<String> {
    let request: AnalysisInput = read_json(input).await?;
    log::info!(
        "Loaded meeting \"{}\" from {}",
        request.meeting_metadata.title,
        input.display()
    );

    let result = state.meeting_service().analyze(&request).await;
    Ok(serde_json::to_string_pretty(&result)?)
}

/// Render the system instruction and prompt without calling the model
pub async fn render_prompt_file(input: &Path) -> Result<String> {
    let request: AnalysisInput = read_json(input).await?;
    let generation = MeetingIntelligenceService::build_request(&request);

    Ok(format!(
        "{}\n\n---\n\n{}",
        generation.system_instruction.unwrap_or_default(),
        generation.prompt
    ))
}
