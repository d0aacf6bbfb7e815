/// Domain models for Meeting Intel
///
/// The request/response contract of a meeting analysis. Field names follow the
/// camelCase JSON shape the CRM frontend sends and expects back.
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A person invited to the meeting
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attendee {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Attendee {
    /// Creates a new attendee without a role
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role: None,
        }
    }

    /// Sets the role (builder pattern)
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Name used in generated sentences; blank names read as "participant"
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "participant"
        } else {
            &self.name
        }
    }
}

/// Calendar metadata attached to a transcript
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MeetingMetadata {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub organizer: String,
    #[serde(
        default,
        alias = "participants",
        deserialize_with = "deserialize_attendees"
    )]
    pub attendees: Vec<Attendee>,
    #[serde(default)]
    pub scheduled_start: String,
    #[serde(default)]
    pub scheduled_end: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agenda: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MeetingMetadata {
    /// Agenda text, ignoring blank values
    pub fn agenda(&self) -> Option<&str> {
        self.agenda.as_deref().filter(|a| !a.trim().is_empty())
    }

    /// Email -> role map; attendees without a role are "Participant"
    pub fn attendee_roles(&self) -> BTreeMap<String, String> {
        self.attendees
            .iter()
            .map(|a| {
                let role = a
                    .role
                    .clone()
                    .filter(|r| !r.trim().is_empty())
                    .unwrap_or_else(|| "Participant".to_string());
                (a.email.clone(), role)
            })
            .collect()
    }

    /// Scheduled length in whole minutes, rounded to the nearest minute.
    ///
    /// Returns 0 when either bound cannot be parsed. A window that ends before
    /// it starts yields a negative value.
    pub fn duration_minutes(&self) -> i64 {
        match (
            parse_timestamp(&self.scheduled_start),
            parse_timestamp(&self.scheduled_end),
        ) {
            (Some(start), Some(end)) => {
                let millis = (end - start).num_milliseconds() as f64;
                (millis / 60_000.0).round() as i64
            }
            _ => 0,
        }
    }
}

/// Parses RFC 3339 timestamps, plus naive ISO forms taken as UTC
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Accepts any JSON shape for the attendee list.
///
/// Non-array values become an empty list and array elements that are not
/// attendee objects are dropped.
fn deserialize_attendees<'de, D>(deserializer: D) -> std::result::Result<Vec<Attendee>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter(serde_json::Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// An action item carried over from an earlier meeting
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PreviousAction {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub assignee: String,
    #[serde(default)]
    pub status: String,
}

/// Everything a single meeting analysis needs
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisInput {
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub meeting_metadata: MeetingMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_meeting_actions: Option<Vec<PreviousAction>>,
}

impl AnalysisInput {
    pub fn attendees(&self) -> &[Attendee] {
        &self.meeting_metadata.attendees
    }
}

/// Sentiment tag
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Neutral => write!(f, "neutral"),
            Sentiment::Negative => write!(f, "negative"),
        }
    }
}

/// Three-step tier used by questions, follow-ups and sales insights
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    #[default]
    Medium,
    High,
}

/// Four-step tier used by insights and pain point severity
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// Outcome priority
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SentimentAnalysis {
    pub overall: Sentiment,
    pub participants: BTreeMap<String, Sentiment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MeetingSummary {
    pub concise_summary: String,
    pub key_topics: Vec<String>,
    pub meeting_intent: String,
    pub attendee_roles: BTreeMap<String, String>,
    /// Minutes
    pub duration: i64,
    /// 0-100
    pub engagement_score: u32,
    pub sentiment_analysis: SentimentAnalysis,
}

/// Per-attendee next steps
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantOutcome {
    pub participant_email: String,
    pub participant_name: String,
    pub next_steps: Vec<String>,
    pub assigned_tasks: Vec<String>,
    pub commitments: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<String>,
    pub priority: Priority,
}

/// Kind of meeting insight
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    ActionItem,
    Sentiment,
    KeyDecision,
    FollowUp,
    Risk,
    Opportunity,
}

impl std::fmt::Display for InsightType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsightType::ActionItem => write!(f, "action_item"),
            InsightType::Sentiment => write!(f, "sentiment"),
            InsightType::KeyDecision => write!(f, "key_decision"),
            InsightType::FollowUp => write!(f, "follow_up"),
            InsightType::Risk => write!(f, "risk"),
            InsightType::Opportunity => write!(f, "opportunity"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MeetingInsight {
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_participant: Option<String>,
    pub importance: Importance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuestionCategory {
    Technical,
    Pricing,
    Timeline,
    Process,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MeetingQuestion {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asked_by: Option<String>,
    pub category: QuestionCategory,
    pub importance: Level,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    pub is_answered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answered_by: Option<String>,
    pub follow_up_required: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PainPointCategory {
    Technical,
    Process,
    Cost,
    Timeline,
    Resource,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PainPoint {
    pub pain_point: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_email: Option<String>,
    pub category: PainPointCategory,
    pub severity: Importance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_solution: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FollowUpType {
    Meeting,
    Email,
    Call,
    Demo,
    Proposal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpAction {
    #[serde(rename = "type")]
    pub follow_up_type: FollowUpType,
    pub title: String,
    pub description: String,
    pub assigned_to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub priority: Level,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UpdateKind {
    Create,
    Update,
}

/// Suggested calendar write; never applied by this crate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarUpdate {
    #[serde(rename = "type")]
    pub kind: UpdateKind,
    pub title: String,
    pub description: String,
    pub participants: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_date: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CrmEntity {
    Deal,
    Contact,
    Account,
    Lead,
}

/// Suggested CRM field write; never applied by this crate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CrmUpdate {
    pub entity: CrmEntity,
    pub action: UpdateKind,
    pub field: String,
    pub value: String,
    pub reason: String,
}

/// Fixed-shape result of a meeting analysis.
///
/// Every field is always populated, whether the content came from the model
/// reply or from the fallback path.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: MeetingSummary,
    pub outcomes: Vec<ParticipantOutcome>,
    pub insights: Vec<MeetingInsight>,
    pub questions: Vec<MeetingQuestion>,
    pub pain_points: Vec<PainPoint>,
    pub follow_ups: Vec<FollowUpAction>,
    pub calendar_updates: Vec<CalendarUpdate>,
    pub crm_updates: Vec<CrmUpdate>,
}
