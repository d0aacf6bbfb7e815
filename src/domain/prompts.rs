//! Prompt templates for LLM analysis
//!
//! Provides the static system instructions and the deterministic prompt
//! builders for each analysis. Builders are pure: the same input always
//! renders the same text.

use crate::domain::models::AnalysisInput;

/// Reply section headings the meeting system instruction asks for
pub mod sections {
    pub const MEETING_SUMMARY: &str = "MEETING SUMMARY";
    pub const OUTCOMES: &str = "OUTCOMES & NEXT STEPS";
    pub const KEY_INSIGHTS: &str = "KEY INSIGHTS";
    pub const QUESTIONS: &str = "IMPORTANT QUESTIONS";
    pub const PAIN_POINTS: &str = "PAIN POINTS & OBJECTIONS";
    pub const FOLLOW_UPS: &str = "FOLLOW-UP ACTIONS";
}

/// Default prompt templates
pub struct PromptTemplates;

impl PromptTemplates {
    /// System instruction for meeting intelligence
    pub fn meeting_system_instruction() -> &'static str {
        r#"You are a highly capable AI meeting assistant built for B2B sales and client teams. Your task is to analyze meeting transcripts and calendar metadata to generate comprehensive meeting intelligence.

You must provide structured output in the following format:

## MEETING SUMMARY
- Concise 2-3 sentence summary
- Key topics discussed (bulleted list)
- Meeting intent/purpose
- Attendee roles and contexts
- Overall engagement assessment (1-100)
- Sentiment analysis (positive/neutral/negative)

## OUTCOMES & NEXT STEPS
For each participant:
- Name and email
- Specific next steps assigned
- Tasks committed to
- Follow-up dates
- Priority level

## KEY INSIGHTS
- Action items with timestamps
- Sentiment observations
- Key decisions made
- Risks identified
- Opportunities spotted

## IMPORTANT QUESTIONS
- Questions asked during meeting
- Who asked them
- Whether they were answered
- Follow-up required

## PAIN POINTS & OBJECTIONS
- Specific pain points mentioned
- Who mentioned them
- Severity assessment
- Suggested solutions

## FOLLOW-UP ACTIONS
- Required follow-up meetings
- Email communications needed
- Calendar updates suggested
- CRM field updates recommended

Use professional, actionable language. Reference specific names, times, and commitments from the transcript and calendar data."#
    }

    /// Render the meeting analysis prompt.
    ///
    /// Embeds the transcript verbatim followed by the calendar metadata.
    /// Optional agenda, description and previous actions are only rendered
    /// when present.
    pub fn meeting_analysis(input: &AnalysisInput) -> String {
        let meta = &input.meeting_metadata;
        let attendees = meta
            .attendees
            .iter()
            .map(|a| match a.role.as_deref().filter(|r| !r.is_empty()) {
                Some(role) => format!("{} ({}) - {}", a.name, a.email, role),
                None => format!("{} ({})", a.name, a.email),
            })
            .collect::<Vec<_>>()
            .join(", ");

        let mut lines = vec![
            "Analyze this meeting transcript and provide comprehensive intelligence:".to_string(),
            String::new(),
            "## MEETING TRANSCRIPT:".to_string(),
            input.transcript.clone(),
            String::new(),
            "## CALENDAR METADATA:".to_string(),
            format!("- Title: {}", meta.title),
            format!("- Organizer: {}", meta.organizer),
            format!("- Attendees: {}", attendees),
            format!(
                "- Scheduled: {} to {}",
                meta.scheduled_start, meta.scheduled_end
            ),
        ];
        if let Some(agenda) = meta.agenda() {
            lines.push(format!("- Agenda: {}", agenda));
        }
        if let Some(description) = meta.description.as_deref().filter(|d| !d.trim().is_empty()) {
            lines.push(format!("- Description: {}", description));
        }

        if let Some(actions) = input
            .previous_meeting_actions
            .as_ref()
            .filter(|a| !a.is_empty())
        {
            lines.push(String::new());
            lines.push("## PREVIOUS MEETING ACTIONS:".to_string());
            lines.extend(actions.iter().map(|action| {
                format!(
                    "- {} (Assigned to: {}, Status: {})",
                    action.action, action.assignee, action.status
                )
            }));
        }

        lines.push(String::new());
        lines.push(
            "Please provide a comprehensive analysis following the system instruction format."
                .to_string(),
        );
        lines.join("\n")
    }

    /// Prompt for the JSON sales call analysis
    pub fn sales_call(transcript: &str) -> String {
        format!(
            r#"Analyze this sales meeting transcript and provide:

1. A concise summary (2-3 sentences)
2. Key outcomes achieved
3. Action items mentioned
4. Pain points discussed by the prospect
5. Objections raised by the prospect

Format your response as JSON with the following structure:
{{
  "summary": "Brief meeting summary",
  "outcomes": ["outcome1", "outcome2"],
  "actionItems": ["action1", "action2"],
  "painPoints": ["pain1", "pain2"],
  "objections": ["objection1", "objection2"]
}}

Transcript:
{}

Respond with valid JSON only, no additional text or formatting."#,
            transcript
        )
    }

    /// System instruction for CRM pipeline insights
    pub fn sales_insights_system_instruction() -> &'static str {
        r#"You are an expert sales analytics AI that provides data-driven insights in JSON format.
Analyze the provided CRM data and respond with JSON only in this exact structure:
{
  "insights": [
    {
      "id": "unique_id",
      "type": "trend|opportunity|warning|recommendation",
      "title": "Brief insight title",
      "description": "Detailed explanation",
      "impact": "high|medium|low",
      "actionable": true|false,
      "data": {}
    }
  ],
  "summary": "2-3 sentence executive summary",
  "keyMetrics": {
    "conversionRate": number,
    "averageDealSize": number,
    "salesVelocity": number,
    "pipelineHealth": number
  }
}"#
    }

    /// Prompt for CRM pipeline insights; `data_context` is pretty-printed JSON
    pub fn sales_insights(data_context: &str) -> String {
        format!(
            r#"You are a senior sales analyst AI. Analyze the following CRM data and provide actionable sales insights in JSON format.

CRM Data Context:
{}

Focus on:
1. Conversion rate trends and patterns
2. Deal size variations by industry/source
3. Sales cycle optimization opportunities
4. Pipeline health indicators
5. Actionable recommendations for improvement

Generate 4-6 specific, actionable insights based on the actual data patterns."#,
            data_context
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Attendee, MeetingMetadata, PreviousAction};

    fn sample_input() -> AnalysisInput {
        AnalysisInput {
            transcript: "Ana: Can we start in March?\nBen: Yes.".to_string(),
            meeting_metadata: MeetingMetadata {
                title: "Renewal".to_string(),
                organizer: "ana@x.com".to_string(),
                attendees: vec![
                    Attendee::new("Ana", "ana@x.com").with_role("AE"),
                    Attendee::new("Ben", "ben@y.com"),
                ],
                scheduled_start: "2024-01-01T10:00:00Z".to_string(),
                scheduled_end: "2024-01-01T10:30:00Z".to_string(),
                agenda: Some("Pricing".to_string()),
                description: None,
            },
            previous_meeting_actions: None,
        }
    }

    #[test]
    fn test_system_instruction_lists_every_section() {
        let instruction = PromptTemplates::meeting_system_instruction();
        for section in [
            sections::MEETING_SUMMARY,
            sections::OUTCOMES,
            sections::KEY_INSIGHTS,
            sections::QUESTIONS,
            sections::PAIN_POINTS,
            sections::FOLLOW_UPS,
        ] {
            assert!(instruction.contains(&format!("## {}", section)));
        }
    }

    #[test]
    fn test_meeting_prompt_is_deterministic() {
        let input = sample_input();
        let first = PromptTemplates::meeting_analysis(&input);
        let second = PromptTemplates::meeting_analysis(&input.clone());
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn test_meeting_prompt_renders_metadata() {
        let prompt = PromptTemplates::meeting_analysis(&sample_input());
        assert!(prompt.contains("Ana: Can we start in March?\nBen: Yes."));
        assert!(prompt.contains("- Attendees: Ana (ana@x.com) - AE, Ben (ben@y.com)\n"));
        assert!(prompt.contains("- Scheduled: 2024-01-01T10:00:00Z to 2024-01-01T10:30:00Z"));
        assert!(prompt.contains("- Agenda: Pricing"));
        assert!(!prompt.contains("- Description:"));
        assert!(!prompt.contains("PREVIOUS MEETING ACTIONS"));
    }

    #[test]
    fn test_meeting_prompt_renders_previous_actions() {
        let mut input = sample_input();
        input.previous_meeting_actions = Some(vec![PreviousAction {
            action: "Send deck".to_string(),
            assignee: "Ana".to_string(),
            status: "done".to_string(),
        }]);
        let prompt = PromptTemplates::meeting_analysis(&input);
        assert!(prompt.contains("## PREVIOUS MEETING ACTIONS:\n- Send deck (Assigned to: Ana, Status: done)"));
    }

    #[test]
    fn test_sales_call_prompt_embeds_transcript() {
        let prompt = PromptTemplates::sales_call("we need SSO");
        assert!(prompt.contains("Transcript:\nwe need SSO"));
        assert!(prompt.contains(r#""actionItems": ["action1", "action2"]"#));
    }
}
