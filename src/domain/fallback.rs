//! Minimal meeting analysis derived from the request alone.
//!
//! Used whenever the model cannot be reached or gives nothing to extract.

use crate::domain::models::{
    AnalysisInput, AnalysisResult, Attendee, MeetingSummary, ParticipantOutcome, Priority,
    Sentiment, SentimentAnalysis,
};

const FALLBACK_ENGAGEMENT: u32 = 75;

/// Build a complete [`AnalysisResult`] without any model output
pub fn synthesize_fallback(input: &AnalysisInput) -> AnalysisResult {
    let meta = &input.meeting_metadata;
    let attendees = input.attendees();

    let who = if attendees.is_empty() {
        "participants".to_string()
    } else {
        attendees
            .iter()
            .map(Attendee::display_name)
            .collect::<Vec<_>>()
            .join(", ")
    };

    AnalysisResult {
        summary: MeetingSummary {
            concise_summary: format!("Meeting \"{}\" conducted with {}.", meta.title, who),
            key_topics: vec![
                "Business discussion".to_string(),
                "Next steps planning".to_string(),
            ],
            meeting_intent: meta.agenda().unwrap_or("Business meeting").to_string(),
            attendee_roles: meta.attendee_roles(),
            duration: meta.duration_minutes(),
            engagement_score: FALLBACK_ENGAGEMENT,
            sentiment_analysis: SentimentAnalysis {
                overall: Sentiment::Neutral,
                participants: Default::default(),
            },
        },
        outcomes: attendees
            .iter()
            .map(|attendee| ParticipantOutcome {
                participant_email: attendee.email.clone(),
                participant_name: attendee.name.clone(),
                next_steps: vec!["Review meeting outcomes".to_string()],
                assigned_tasks: vec!["Follow up on action items".to_string()],
                commitments: vec!["Participate in next steps".to_string()],
                follow_up_date: None,
                priority: Priority::Medium,
            })
            .collect(),
        insights: Vec::new(),
        questions: Vec::new(),
        pain_points: Vec::new(),
        follow_ups: Vec::new(),
        calendar_updates: Vec::new(),
        crm_updates: Vec::new(),
    }
}
