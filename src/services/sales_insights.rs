//! CRM pipeline insights
//!
//! Aggregates the dataset, asks the model for insights in JSON and falls back
//! to the statistics alone when anything goes wrong.

use crate::domain::extraction::extract_json;
use crate::domain::models::Level;
use crate::domain::sales::{
    KeyMetrics, SalesDataContext, SalesInsight, SalesInsightType,
};
use crate::domain::{PromptTemplates, SalesAnalysis, SalesDataset};
use crate::error::{AppError, Result};
use crate::ports::llm::{GenerationRequest, LlmConfig, LlmServicePort};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use std::sync::Arc;

/// Model reply before ids and timestamps are filled in
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsightsReply {
    #[serde(default)]
    insights: Vec<InsightReply>,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    key_metrics: KeyMetrics,
}

#[derive(Debug, Deserialize)]
struct InsightReply {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "type")]
    insight_type: SalesInsightType,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    impact: Level,
    #[serde(default)]
    actionable: bool,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

pub struct SalesInsightsService {
    llm: Arc<dyn LlmServicePort>,
    config: LlmConfig,
}

impl SalesInsightsService {
    pub fn new(llm: Arc<dyn LlmServicePort>, config: LlmConfig) -> Self {
        Self { llm, config }
    }

    /// Analyze a CRM snapshot. Always resolves.
    pub async fn analyze(&self, dataset: &SalesDataset) -> SalesAnalysis {
        match self.try_analyze(dataset).await {
            Ok(analysis) => analysis,
            Err(e) => {
                log::warn!("Sales insight analysis failed, using statistics only: {}", e);
                SalesAnalysis::fallback(dataset, &now_rfc3339())
            }
        }
    }

    async fn try_analyze(&self, dataset: &SalesDataset) -> Result<SalesAnalysis> {
        log::info!(
            "Analyzing CRM snapshot: {} deals, {} leads, {} accounts",
            dataset.deals.len(),
            dataset.leads.len(),
            dataset.accounts.len()
        );

        let context = serde_json::to_string_pretty(&SalesDataContext::from_dataset(dataset))?;
        let request = GenerationRequest::new(PromptTemplates::sales_insights(&context))
            .with_system_instruction(PromptTemplates::sales_insights_system_instruction());

        let reply = self.llm.generate(&request, &self.config).await?;
        let value = extract_json(&reply)
            .ok_or_else(|| AppError::Llm("Invalid response format from model".to_string()))?;
        let parsed: InsightsReply = serde_json::from_value(value)?;

        let analysis = finalize(parsed, Utc::now().timestamp_millis(), &now_rfc3339());
        log::info!("Generated {} sales insights", analysis.insights.len());
        Ok(analysis)
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Fill missing ids as `insight_<millis>_<index>` and stamp every insight
fn finalize(reply: InsightsReply, millis: i64, timestamp: &str) -> SalesAnalysis {
    let insights = reply
        .insights
        .into_iter()
        .enumerate()
        .map(|(index, insight)| SalesInsight {
            id: insight
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| format!("insight_{}_{}", millis, index)),
            insight_type: insight.insight_type,
            title: insight.title,
            description: insight.description,
            impact: insight.impact,
            actionable: insight.actionable,
            data: insight.data,
            timestamp: timestamp.to_string(),
        })
        .collect();

    SalesAnalysis {
        insights,
        summary: reply.summary,
        key_metrics: reply.key_metrics,
    }
}
