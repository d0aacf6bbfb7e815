//! Sales models: call analysis and CRM pipeline statistics
//!
//! The pipeline statistics are plain aggregates over CRM rows. They feed the
//! insight prompt and the deterministic fallback.

use crate::domain::models::Level;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Structured reading of a raw sales call transcript
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SalesCallAnalysis {
    pub summary: String,
    pub outcomes: Vec<String>,
    pub action_items: Vec<String>,
    pub pain_points: Vec<String>,
    pub objections: Vec<String>,
}

/// A deal row; `value` may arrive as a number or a numeric string
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Deal {
    #[serde(default, deserialize_with = "lenient_number")]
    pub value: f64,
    #[serde(default)]
    pub stage: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Lead {
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub score: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Account {
    #[serde(default)]
    pub industry: String,
}

/// CRM snapshot handed to the pipeline insight analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SalesDataset {
    #[serde(default)]
    pub deals: Vec<Deal>,
    #[serde(default)]
    pub leads: Vec<Lead>,
    #[serde(default)]
    pub accounts: Vec<Account>,
}

fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn distribution<'a>(keys: impl Iterator<Item = &'a str>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for key in keys {
        *counts.entry(key.to_string()).or_insert(0) += 1;
    }
    counts
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DealStats {
    pub total_value: f64,
    pub average_value: f64,
    pub win_rate: f64,
    pub loss_rate: f64,
    pub active_deal_count: usize,
    pub stage_distribution: BTreeMap<String, usize>,
}

impl DealStats {
    pub fn from_deals(deals: &[Deal]) -> Self {
        let total_value: f64 = deals.iter().map(|d| d.value).sum();
        let won = deals.iter().filter(|d| d.stage == "closed-won").count();
        let lost = deals.iter().filter(|d| d.stage == "closed-lost").count();
        let active = deals
            .iter()
            .filter(|d| !d.stage.starts_with("closed"))
            .count();

        Self {
            total_value,
            average_value: if deals.is_empty() {
                0.0
            } else {
                total_value / deals.len() as f64
            },
            win_rate: percent(won, deals.len()),
            loss_rate: percent(lost, deals.len()),
            active_deal_count: active,
            stage_distribution: distribution(deals.iter().map(|d| d.stage.as_str())),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeadStats {
    pub qualification_rate: f64,
    /// Sources ordered by lead count, most frequent first
    pub top_sources: Vec<(String, usize)>,
    pub industry_distribution: BTreeMap<String, usize>,
    pub average_score: f64,
}

impl LeadStats {
    pub fn from_leads(leads: &[Lead]) -> Self {
        let qualified = leads.iter().filter(|l| l.stage == "qualified").count();

        let mut top_sources: Vec<(String, usize)> =
            distribution(leads.iter().map(|l| l.source.as_str()))
                .into_iter()
                .collect();
        // stable sort keeps ties in alphabetical order
        top_sources.sort_by(|a, b| b.1.cmp(&a.1));

        Self {
            qualification_rate: percent(qualified, leads.len()),
            top_sources,
            industry_distribution: distribution(leads.iter().map(|l| l.industry.as_str())),
            average_score: if leads.is_empty() {
                0.0
            } else {
                leads.iter().map(|l| l.score).sum::<f64>() / leads.len() as f64
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountStats {
    pub industry_distribution: BTreeMap<String, usize>,
    pub total_accounts: usize,
}

impl AccountStats {
    pub fn from_accounts(accounts: &[Account]) -> Self {
        Self {
            industry_distribution: distribution(accounts.iter().map(|a| a.industry.as_str())),
            total_accounts: accounts.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DatasetTotals {
    pub deals: usize,
    pub leads: usize,
    pub accounts: usize,
}

/// Aggregated view of a [`SalesDataset`], serialized into the prompt
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalesDataContext {
    pub totals: DatasetTotals,
    pub deal_stats: DealStats,
    pub lead_stats: LeadStats,
    pub account_stats: AccountStats,
    pub timeframe: String,
}

impl SalesDataContext {
    pub fn from_dataset(dataset: &SalesDataset) -> Self {
        Self {
            totals: DatasetTotals {
                deals: dataset.deals.len(),
                leads: dataset.leads.len(),
                accounts: dataset.accounts.len(),
            },
            deal_stats: DealStats::from_deals(&dataset.deals),
            lead_stats: LeadStats::from_leads(&dataset.leads),
            account_stats: AccountStats::from_accounts(&dataset.accounts),
            timeframe: "current_data_snapshot".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SalesInsightType {
    Trend,
    Opportunity,
    Warning,
    Recommendation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalesInsight {
    pub id: String,
    #[serde(rename = "type")]
    pub insight_type: SalesInsightType,
    pub title: String,
    pub description: String,
    pub impact: Level,
    pub actionable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyMetrics {
    pub conversion_rate: f64,
    pub average_deal_size: f64,
    pub sales_velocity: f64,
    pub pipeline_health: f64,
}

/// Result of a pipeline insight analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalesAnalysis {
    pub insights: Vec<SalesInsight>,
    pub summary: String,
    pub key_metrics: KeyMetrics,
}

const FALLBACK_SALES_VELOCITY: f64 = 30.0;

/// Dollar amount with thousands separators and up to three decimals,
/// e.g. `12,500` or `1,500.555`
pub fn format_amount(value: f64) -> String {
    let thousandths = (value.abs() * 1000.0).round() as u64;
    let whole = (thousandths / 1000).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let fraction = thousandths % 1000;
    let sign = if value < 0.0 && thousandths > 0 { "-" } else { "" };
    if fraction == 0 {
        format!("{}{}", sign, grouped)
    } else {
        let decimals = format!("{:03}", fraction);
        format!("{}{}.{}", sign, grouped, decimals.trim_end_matches('0'))
    }
}

impl SalesAnalysis {
    /// Statistics-only analysis used when the model is unavailable
    pub fn fallback(dataset: &SalesDataset, timestamp: &str) -> Self {
        let deal_stats = DealStats::from_deals(&dataset.deals);
        let lead_stats = LeadStats::from_leads(&dataset.leads);

        let insights = vec![
            SalesInsight {
                id: "fallback_conversion".to_string(),
                insight_type: SalesInsightType::Trend,
                title: "Lead Conversion Analysis".to_string(),
                description: format!(
                    "Current lead qualification rate is {:.1}%. This indicates the quality of incoming leads.",
                    lead_stats.qualification_rate
                ),
                impact: if lead_stats.qualification_rate > 25.0 {
                    Level::High
                } else {
                    Level::Medium
                },
                actionable: true,
                data: None,
                timestamp: timestamp.to_string(),
            },
            SalesInsight {
                id: "fallback_pipeline".to_string(),
                insight_type: SalesInsightType::Opportunity,
                title: "Pipeline Health Check".to_string(),
                description: format!(
                    "You have {} active deals with a {:.1}% win rate.",
                    deal_stats.active_deal_count, deal_stats.win_rate
                ),
                impact: Level::Medium,
                actionable: true,
                data: None,
                timestamp: timestamp.to_string(),
            },
        ];

        let pipeline_health = (deal_stats.active_deal_count as f64
            / dataset.deals.len().max(1) as f64
            * 100.0)
            .min(100.0);

        Self {
            insights,
            summary: format!(
                "Your CRM shows {} deals worth ${} with {} leads across {} accounts.",
                dataset.deals.len(),
                format_amount(deal_stats.total_value),
                dataset.leads.len(),
                dataset.accounts.len()
            ),
            key_metrics: KeyMetrics {
                conversion_rate: lead_stats.qualification_rate,
                average_deal_size: deal_stats.average_value,
                sales_velocity: FALLBACK_SALES_VELOCITY,
                pipeline_health,
            },
        }
    }
}
