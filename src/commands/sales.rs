//! Sales call and pipeline commands

use super::{read_input, read_json};
use crate::domain::SalesDataset;
use crate::error::Result;
use crate::AppState;
use std::path::Path;

/// Analyze a plain-text sales call transcript
pub async fn analyze_call_file(state: &AppState, transcript: &Path) -> Result<String> {
    let text = read_input(transcript).await?;
    let analysis = state.sales_call_analyzer().analyze(&text).await?;
    Ok(serde_json::to_string_pretty(&analysis)?)
}

/// Derive pipeline insights from a JSON CRM snapshot
pub async fn sales_insights_file(state: &AppState, input: &Path) -> Result<String> {
    let dataset: SalesDataset = read_json(input).await?;
    let analysis = state.sales_insights_service().analyze(&dataset).await;
    Ok(serde_json::to_string_pretty(&analysis)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SalesAnalysis, SalesCallAnalysis};
    use crate::error::AppError;
    use crate::ports::llm::LlmConfig;
    use crate::ports::mocks::StubLlm;
    use std::sync::Arc;

    fn state(llm: StubLlm) -> AppState {
        AppState::new(Arc::new(llm), LlmConfig::default())
    }

    #[tokio::test]
    async fn test_analyze_call_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("call.txt");
        tokio::fs::write(&path, "Prospect: pricing is too high.")
            .await
            .unwrap();

        let llm = StubLlm::replying(
            r#"{"summary": "Pricing pushback.", "objections": ["Too expensive"]}"#,
        );
        let json = analyze_call_file(&state(llm.clone()), &path).await.unwrap();

        let analysis: SalesCallAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(analysis.summary, "Pricing pushback.");
        assert_eq!(analysis.objections, vec!["Too expensive"]);
        assert!(analysis.outcomes.is_empty());
        assert!(llm.requests()[0].prompt.contains("pricing is too high"));
    }

    #[tokio::test]
    async fn test_analyze_call_file_propagates_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("call.txt");
        tokio::fs::write(&path, "Rep: hello").await.unwrap();

        let err = analyze_call_file(&state(StubLlm::unconfigured()), &path)
            .await
            .unwrap_err();
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn test_sales_insights_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crm.json");
        tokio::fs::write(
            &path,
            r#"{"deals": [{"value": "2500", "stage": "proposal"}], "leads": [], "accounts": [{"industry": "retail"}]}"#,
        )
        .await
        .unwrap();

        let json = sales_insights_file(&state(StubLlm::failing("down")), &path)
            .await
            .unwrap();

        let analysis: SalesAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(
            analysis.summary,
            "Your CRM shows 1 deals worth $2,500 with 0 leads across 1 accounts."
        );
        assert_eq!(analysis.key_metrics.pipeline_health, 100.0);
    }

    #[tokio::test]
    async fn test_sales_insights_file_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crm.json");
        tokio::fs::write(&path, r#"{"deals": "many"}"#).await.unwrap();

        let err = sales_insights_file(&state(StubLlm::replying("{}")), &path)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
