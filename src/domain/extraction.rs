//! Best-effort extraction of model replies
//!
//! Everything in this module is total: a reply that lacks a section, a
//! bullet or a keyword produces an empty value for that field, never an
//! error. [`ExtractedAnalysis::into_result`] then merges the extracted values
//! over default-populated ones.

use crate::domain::lexicon;
use crate::domain::models::{
    AnalysisInput, AnalysisResult, Attendee, CalendarUpdate, CrmEntity, CrmUpdate,
    FollowUpAction, FollowUpType, Importance, InsightType, Level, MeetingInsight,
    MeetingQuestion, MeetingSummary, PainPoint, PainPointCategory, ParticipantOutcome, Priority,
    QuestionCategory, Sentiment, SentimentAnalysis, UpdateKind,
};
use crate::domain::prompts::sections;
use crate::domain::sales::SalesCallAnalysis;
use regex::Regex;
use serde_json::Value;

const INTENT_KEYWORDS: &[&str] = &["purpose", "intent", "goal", "objective"];
const BULLET_MARKERS: [char; 3] = ['-', '•', '*'];

/// Returns the text under `## <section>` up to the next `##` heading.
///
/// The heading match is case-insensitive and the heading itself is not part
/// of the returned text. Missing sections yield an empty string.
pub fn extract_section(text: &str, section: &str) -> String {
    let pattern = format!(r"(?i)##[ \t]*{}", regex::escape(section));
    let Ok(heading) = Regex::new(&pattern) else {
        return String::new();
    };
    let Some(found) = heading.find(text) else {
        return String::new();
    };

    let rest = &text[found.end()..];
    let end = rest.find("##").unwrap_or(rest.len());
    rest[..end].trim().trim_start_matches(':').trim().to_string()
}

/// Lines that start with `-`, `•` or `*`, with the marker removed
pub fn extract_bullets(section: &str) -> Vec<String> {
    section
        .lines()
        .filter_map(|line| line.trim_start().strip_prefix(BULLET_MARKERS))
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Meeting intent: the agenda when there is one, otherwise the text that
/// follows the first intent keyword up to the end of its sentence or line.
pub fn extract_intent(text: &str, agenda: Option<&str>) -> String {
    if let Some(agenda) = agenda.filter(|a| !a.trim().is_empty()) {
        return agenda.to_string();
    }

    INTENT_KEYWORDS
        .iter()
        .filter_map(|keyword| Regex::new(&format!(r"(?i){}[:\s]+([^\n.]+)", keyword)).ok())
        .find_map(|re| {
            re.captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
        })
        .unwrap_or_default()
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn classify_question(question: &str) -> QuestionCategory {
    let q = question.to_lowercase();
    if contains_any(&q, &["price", "pricing", "cost", "budget", "discount", "quote"]) {
        QuestionCategory::Pricing
    } else if contains_any(&q, &["when", "timeline", "deadline", "date", "schedule", "how long"]) {
        QuestionCategory::Timeline
    } else if contains_any(&q, &["integrat", "api", "technical", "security", "sso", "data"]) {
        QuestionCategory::Technical
    } else if contains_any(&q, &["process", "next step", "approval", "contract", "onboard"]) {
        QuestionCategory::Process
    } else {
        QuestionCategory::Other
    }
}

fn classify_pain_point(pain: &str) -> PainPointCategory {
    let p = pain.to_lowercase();
    if contains_any(&p, &["cost", "price", "budget", "expensive", "spend"]) {
        PainPointCategory::Cost
    } else if contains_any(&p, &["delay", "slow", "deadline", "timeline", "late"]) {
        PainPointCategory::Timeline
    } else if contains_any(&p, &["bug", "integrat", "performance", "technical", "system", "outage"]) {
        PainPointCategory::Technical
    } else if contains_any(&p, &["staff", "headcount", "resource", "hiring", "bandwidth"]) {
        PainPointCategory::Resource
    } else if contains_any(&p, &["process", "manual", "workflow", "approval"]) {
        PainPointCategory::Process
    } else {
        PainPointCategory::Other
    }
}

fn assess_severity(pain: &str) -> Importance {
    let p = pain.to_lowercase();
    if contains_any(&p, &["critical", "blocker", "blocking"]) {
        Importance::Critical
    } else if contains_any(&p, &["major", "significant", "severe", "urgent"]) {
        Importance::High
    } else if contains_any(&p, &["minor", "small", "slight"]) {
        Importance::Low
    } else {
        Importance::Medium
    }
}

/// First attendee whose name appears in `text`
fn mentioned_attendee<'a>(text: &str, attendees: &'a [Attendee]) -> Option<&'a Attendee> {
    let lower = text.to_lowercase();
    attendees
        .iter()
        .filter(|a| !a.name.trim().is_empty())
        .find(|a| lower.contains(&a.name.to_lowercase()))
}

/// Bulleted questions from the questions section
pub fn extract_questions(text: &str, attendees: &[Attendee]) -> Vec<MeetingQuestion> {
    extract_bullets(&extract_section(text, sections::QUESTIONS))
        .into_iter()
        .filter(|item| item.contains('?'))
        .map(|question| MeetingQuestion {
            asked_by: mentioned_attendee(&question, attendees).map(|a| a.name.clone()),
            category: classify_question(&question),
            importance: Level::Medium,
            timestamp: None,
            is_answered: false,
            answer: None,
            answered_by: None,
            follow_up_required: true,
            question,
        })
        .collect()
}

/// Bulleted pain points from the pain point section
pub fn extract_pain_points(text: &str, attendees: &[Attendee]) -> Vec<PainPoint> {
    extract_bullets(&extract_section(text, sections::PAIN_POINTS))
        .into_iter()
        .map(|pain| {
            let speaker = mentioned_attendee(&pain, attendees);
            PainPoint {
                participant_name: speaker.map(|a| a.name.clone()),
                participant_email: speaker.map(|a| a.email.clone()),
                category: classify_pain_point(&pain),
                severity: assess_severity(&pain),
                timestamp: None,
                context: None,
                suggested_solution: None,
                pain_point: pain,
            }
        })
        .collect()
}

/// Fields read out of a free-text meeting reply
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedAnalysis {
    pub summary: String,
    pub key_topics: Vec<String>,
    pub intent: String,
    pub engagement_score: u32,
    pub sentiment: Sentiment,
    pub questions: Vec<MeetingQuestion>,
    pub pain_points: Vec<PainPoint>,
}

/// Read a meeting reply. Never fails.
pub fn extract_analysis(reply: &str, input: &AnalysisInput) -> ExtractedAnalysis {
    let summary = extract_section(reply, sections::MEETING_SUMMARY);
    ExtractedAnalysis {
        key_topics: extract_bullets(&summary),
        summary,
        intent: extract_intent(reply, input.meeting_metadata.agenda()),
        engagement_score: lexicon::engagement_score(reply),
        sentiment: lexicon::overall_sentiment(reply),
        questions: extract_questions(reply, input.attendees()),
        pain_points: extract_pain_points(reply, input.attendees()),
    }
}

impl ExtractedAnalysis {
    /// Merge the extracted fields over defaults into a complete result
    pub fn into_result(self, input: &AnalysisInput) -> AnalysisResult {
        let meta = &input.meeting_metadata;
        let attendees = input.attendees();
        let names: Vec<&str> = attendees.iter().map(Attendee::display_name).collect();

        let concise_summary = if self.summary.is_empty() {
            format!(
                "Meeting \"{}\" with {} to discuss key business topics and next steps.",
                meta.title,
                names.join(", ")
            )
        } else {
            self.summary
        };

        let key_topics = if self.key_topics.is_empty() {
            ["Business discussion", "Strategic planning", "Next steps"]
                .iter()
                .map(|t| t.to_string())
                .collect()
        } else {
            self.key_topics
        };

        let meeting_intent = if self.intent.is_empty() {
            "Business meeting to discuss key topics and align on next steps".to_string()
        } else {
            self.intent
        };

        let questions = if self.questions.is_empty() {
            vec![MeetingQuestion {
                question: "What are the next steps following this meeting?".to_string(),
                asked_by: None,
                category: QuestionCategory::Process,
                importance: Level::High,
                timestamp: None,
                is_answered: false,
                answer: None,
                answered_by: None,
                follow_up_required: true,
            }]
        } else {
            self.questions
        };

        AnalysisResult {
            summary: MeetingSummary {
                concise_summary,
                key_topics,
                meeting_intent,
                attendee_roles: meta.attendee_roles(),
                duration: meta.duration_minutes(),
                engagement_score: self.engagement_score,
                sentiment_analysis: SentimentAnalysis {
                    overall: self.sentiment,
                    participants: attendees
                        .iter()
                        .map(|a| (a.name.clone(), Sentiment::Neutral))
                        .collect(),
                },
            },
            outcomes: attendees.iter().map(generic_outcome).collect(),
            insights: standard_insights(),
            questions,
            pain_points: self.pain_points,
            follow_ups: vec![FollowUpAction {
                follow_up_type: FollowUpType::Email,
                title: "Send Meeting Summary".to_string(),
                description: "Send comprehensive meeting summary to all participants".to_string(),
                assigned_to: attendees
                    .first()
                    .map(|a| a.display_name().to_string())
                    .unwrap_or_else(|| "Meeting Organizer".to_string()),
                due_date: None,
                priority: Level::High,
            }],
            calendar_updates: vec![CalendarUpdate {
                kind: UpdateKind::Create,
                title: "Follow-up Meeting".to_string(),
                description: "Continue discussion from previous meeting".to_string(),
                participants: attendees.iter().map(|a| a.email.clone()).collect(),
                suggested_date: None,
            }],
            crm_updates: vec![CrmUpdate {
                entity: CrmEntity::Contact,
                action: UpdateKind::Update,
                field: "last_contact".to_string(),
                value: chrono::Utc::now().to_rfc3339(),
                reason: "Meeting conducted".to_string(),
            }],
        }
    }
}

/// Outcome rows are the same for every attendee; the reply is not consulted
fn generic_outcome(attendee: &Attendee) -> ParticipantOutcome {
    ParticipantOutcome {
        participant_email: attendee.email.clone(),
        participant_name: attendee.name.clone(),
        next_steps: vec!["Follow up on discussion points from meeting".to_string()],
        assigned_tasks: vec!["Review meeting outcomes and prepare for next steps".to_string()],
        commitments: vec!["Participate in follow-up activities as needed".to_string()],
        follow_up_date: None,
        priority: Priority::Medium,
    }
}

fn standard_insights() -> Vec<MeetingInsight> {
    vec![
        MeetingInsight {
            insight_type: InsightType::ActionItem,
            title: "Follow-up Meeting Required".to_string(),
            description: "Schedule follow-up meeting to continue discussion on key topics"
                .to_string(),
            related_participant: None,
            importance: Importance::Medium,
            timestamp: None,
            context: None,
            suggested_action: Some("Send calendar invite for follow-up meeting".to_string()),
        },
        MeetingInsight {
            insight_type: InsightType::Opportunity,
            title: "Engagement Opportunity".to_string(),
            description: "High engagement levels indicate strong interest in moving forward"
                .to_string(),
            related_participant: None,
            importance: Importance::High,
            timestamp: None,
            context: None,
            suggested_action: Some(
                "Prepare detailed proposal or next steps presentation".to_string(),
            ),
        },
    ]
}

/// Pull a JSON object out of a model reply.
///
/// Strips markdown code fences; if the remainder still does not parse, falls
/// back to the outermost `{ ... }` span.
pub fn extract_json(reply: &str) -> Option<Value> {
    let cleaned = reply.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();
    if let Ok(value) = serde_json::from_str::<Value>(cleaned) {
        return Some(value);
    }

    let start = cleaned.find('{')?;
    let end = cleaned.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&cleaned[start..=end]).ok()
}

/// String elements of a JSON array field; anything else is empty
pub fn string_list(value: &Value, field: &str) -> Vec<String> {
    value
        .get(field)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Read a sales call reply; `None` when the reply holds no JSON at all.
///
/// Any JSON value is accepted. Fields that are absent or of the wrong shape
/// come back empty.
pub fn parse_sales_call_reply(reply: &str) -> Option<SalesCallAnalysis> {
    let value = extract_json(reply)?;
    Some(SalesCallAnalysis {
        summary: value
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        outcomes: string_list(&value, "outcomes"),
        action_items: string_list(&value, "actionItems"),
        pain_points: string_list(&value, "painPoints"),
        objections: string_list(&value, "objections"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::MeetingMetadata;

    const REPLY: &str = "## MEETING SUMMARY\n\
        Kickoff for the Q3 rollout. The purpose: align on the pilot scope.\n\
        - Pilot scope\n\
        • Pricing tiers\n\
        * Security review\n\
        \n\
        ## OUTCOMES & NEXT STEPS\n\
        - Ana sends the order form\n\
        \n\
        ## IMPORTANT QUESTIONS\n\
        - Ben asked what the discount is for a 3 year term?\n\
        - Ana confirmed the SSO setup\n\
        - When can the pilot start?\n\
        \n\
        ## PAIN POINTS & OBJECTIONS\n\
        - Ben: manual approval workflow is a major drag\n\
        - Budget is tight this quarter\n";

    fn input() -> AnalysisInput {
        AnalysisInput {
            transcript: "...".to_string(),
            meeting_metadata: MeetingMetadata {
                title: "Kickoff".to_string(),
                attendees: vec![
                    Attendee::new("Ana", "ana@x.com"),
                    Attendee::new("Ben", "ben@y.com"),
                ],
                scheduled_start: "2024-01-01T10:00:00Z".to_string(),
                scheduled_end: "2024-01-01T10:45:00Z".to_string(),
                ..Default::default()
            },
            previous_meeting_actions: None,
        }
    }

    #[test]
    fn test_section_is_heading_delimited_and_case_insensitive() {
        let text = "## meeting summary\nfoo\n## outcomes & next steps\nbar";
        let section = extract_section(text, "MEETING SUMMARY");
        assert!(section.contains("foo"));
        assert!(!section.contains("bar"));
        assert!(!section.to_lowercase().contains("meeting summary"));
    }

    #[test]
    fn test_section_runs_to_end_of_text() {
        let text = "intro\n## Outcomes & Next Steps:\n- bar\n- baz";
        assert_eq!(extract_section(text, sections::OUTCOMES), "- bar\n- baz");
    }

    #[test]
    fn test_missing_section_is_empty() {
        assert_eq!(extract_section("no headings here", "MEETING SUMMARY"), "");
        assert!(extract_bullets("").is_empty());
    }

    #[test]
    fn test_bullets_accept_all_markers() {
        let section = extract_section(REPLY, sections::MEETING_SUMMARY);
        assert_eq!(
            extract_bullets(&section),
            vec!["Pilot scope", "Pricing tiers", "Security review"]
        );
    }

    #[test]
    fn test_intent_prefers_agenda() {
        assert_eq!(extract_intent(REPLY, Some("Renewal terms")), "Renewal terms");
    }

    #[test]
    fn test_intent_from_keyword() {
        assert_eq!(extract_intent(REPLY, None), "align on the pilot scope");
        assert_eq!(extract_intent("Our GOAL is growth", None), "is growth");
    }

    #[test]
    fn test_intent_missing_is_empty() {
        assert_eq!(extract_intent("nothing relevant", Some("  ")), "");
    }

    #[test]
    fn test_questions_need_question_mark() {
        let questions = extract_questions(REPLY, input().attendees());
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].asked_by.as_deref(), Some("Ben"));
        assert_eq!(questions[0].category, QuestionCategory::Pricing);
        assert_eq!(questions[1].category, QuestionCategory::Timeline);
        assert!(questions.iter().all(|q| q.follow_up_required && !q.is_answered));
    }

    #[test]
    fn test_pain_points_are_classified() {
        let pains = extract_pain_points(REPLY, input().attendees());
        assert_eq!(pains.len(), 2);
        assert_eq!(pains[0].participant_email.as_deref(), Some("ben@y.com"));
        assert_eq!(pains[0].category, PainPointCategory::Process);
        assert_eq!(pains[0].severity, Importance::High);
        assert_eq!(pains[1].category, PainPointCategory::Cost);
        assert_eq!(pains[1].participant_name, None);
    }

    #[test]
    fn test_into_result_uses_extracted_fields() {
        let input = input();
        let result = extract_analysis(REPLY, &input).into_result(&input);
        assert!(result.summary.concise_summary.starts_with("Kickoff for the Q3 rollout."));
        assert_eq!(result.summary.key_topics.len(), 3);
        assert_eq!(result.summary.meeting_intent, "align on the pilot scope");
        assert_eq!(result.summary.duration, 45);
        assert_eq!(result.summary.sentiment_analysis.participants.len(), 2);
        assert_eq!(result.outcomes.len(), 2);
        assert_eq!(result.outcomes[1].participant_email, "ben@y.com");
        assert_eq!(result.insights.len(), 2);
        assert_eq!(result.questions.len(), 2);
        assert_eq!(result.pain_points.len(), 2);
        assert_eq!(result.follow_ups[0].assigned_to, "Ana");
        assert_eq!(
            result.calendar_updates[0].participants,
            vec!["ana@x.com", "ben@y.com"]
        );
        assert_eq!(result.crm_updates[0].field, "last_contact");
    }

    #[test]
    fn test_into_result_defaults_for_unstructured_reply() {
        let input = input();
        let result = extract_analysis("Thanks, talk soon.", &input).into_result(&input);
        assert_eq!(
            result.summary.concise_summary,
            "Meeting \"Kickoff\" with Ana, Ben to discuss key business topics and next steps."
        );
        assert_eq!(
            result.summary.key_topics,
            vec!["Business discussion", "Strategic planning", "Next steps"]
        );
        assert_eq!(
            result.summary.meeting_intent,
            "Business meeting to discuss key topics and align on next steps"
        );
        assert_eq!(result.summary.engagement_score, 50);
        assert_eq!(result.questions.len(), 1);
        assert_eq!(result.questions[0].category, QuestionCategory::Process);
        assert!(result.pain_points.is_empty());
    }

    #[test]
    fn test_follow_up_without_attendees_goes_to_organizer() {
        let input = AnalysisInput::default();
        let result = extract_analysis("", &input).into_result(&input);
        assert_eq!(result.follow_ups[0].assigned_to, "Meeting Organizer");
        assert!(result.outcomes.is_empty());
    }

    #[test]
    fn test_extract_json_strips_fences() {
        let value = extract_json("```json\n{\"summary\": \"ok\"}\n```").unwrap();
        assert_eq!(value["summary"], "ok");
    }

    #[test]
    fn test_extract_json_finds_embedded_object() {
        let value = extract_json("Here you go: {\"a\": 1} hope it helps").unwrap();
        assert_eq!(value["a"], 1);
        assert!(extract_json("no json at all").is_none());
    }

    #[test]
    fn test_sales_call_reply_tolerates_bad_fields() {
        let reply = r#"{"summary": "Intro call", "outcomes": "none", "actionItems": ["Send quote", 3], "objections": null}"#;
        let analysis = parse_sales_call_reply(reply).unwrap();
        assert_eq!(analysis.summary, "Intro call");
        assert!(analysis.outcomes.is_empty());
        assert_eq!(analysis.action_items, vec!["Send quote"]);
        assert!(analysis.pain_points.is_empty());
        assert!(analysis.objections.is_empty());
    }

    #[test]
    fn test_sales_call_reply_non_object_degrades_to_empty() {
        let analysis = parse_sales_call_reply("[1, 2]").unwrap();
        assert_eq!(analysis, SalesCallAnalysis::default());
        assert!(parse_sales_call_reply("").is_none());
        assert!(parse_sales_call_reply("not json").is_none());
    }
}
