//! Community events parsed out of labelled GitHub issues.

use std::{cmp::Ordering, sync::LazyLock};

use chrono::NaiveDate;
use optiblog_github_models::Issue;
use optiblog_stats_models::{CommunityEvent, EventType};
use regex::Regex;

/// Lowercase label fragments that mark an issue as an event.
pub const EVENT_LABEL_KEYWORDS: [&str; 6] = [
    "event",
    "hackathon",
    "workshop",
    "meetup",
    "webinar",
    "conference",
];

pub const DEFAULT_TIME: &str = "12:00";
pub const DEFAULT_LOCATION: &str = "virtual";
pub const DEFAULT_ORGANIZER: &str = "Community";

const DESCRIPTION_LIMIT: usize = 200;
const FEATURED_REACTION_THRESHOLD: u64 = 10;

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)date[:\s]*(\d{4}-\d{2}-\d{2}|\d{1,2}/\d{1,2}/\d{4})")
        .expect("date pattern is valid")
});
static TIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)time[:\s]*(\d{1,2}:\d{2})").expect("time pattern is valid"));
static LOCATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)location[:\s]*([^\n\r]+)").expect("location pattern is valid")
});
static REGISTRATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)registration[:\s]*(https?://[^\s]+)").expect("registration pattern is valid")
});

/// Details found in a free-text issue body. Every field is optional; callers
/// decide the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDetails {
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub registration_url: Option<String>,
}

impl EventDetails {
    #[must_use]
    pub fn extract(body: &str) -> Self {
        let capture = |pattern: &Regex| {
            pattern
                .captures(body)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim().to_string())
                .filter(|s| !s.is_empty())
        };

        Self {
            date: capture(&DATE_PATTERN),
            time: capture(&TIME_PATTERN),
            location: capture(&LOCATION_PATTERN),
            registration_url: capture(&REGISTRATION_PATTERN),
        }
    }
}

#[must_use]
pub fn is_event_issue(issue: &Issue) -> bool {
    issue
        .label_names_lowercase()
        .iter()
        .any(|name| EVENT_LABEL_KEYWORDS.iter().any(|k| name.contains(k)))
}

/// Highest-priority type named by any label, `Meetup` otherwise.
#[must_use]
pub fn classify(issue: &Issue) -> EventType {
    let names = issue.label_names_lowercase();

    EventType::LABEL_PRIORITY
        .into_iter()
        .find(|kind| {
            let keyword: &str = kind.as_ref();
            names.iter().any(|name| name.contains(keyword))
        })
        .unwrap_or_default()
}

/// Returns `None` when the issue carries no event label.
#[must_use]
pub fn event_from_issue(issue: &Issue, today: NaiveDate) -> Option<CommunityEvent> {
    if !is_event_issue(issue) {
        return None;
    }

    let body = issue.body.as_deref().unwrap_or_default();
    let details = EventDetails::extract(body);
    let reactions = issue.reaction_total();

    Some(CommunityEvent {
        id: issue.id.to_string(),
        title: issue.title.clone(),
        description: truncate_description(body),
        date: details
            .date
            .unwrap_or_else(|| today.format("%Y-%m-%d").to_string()),
        time: details.time.unwrap_or_else(|| DEFAULT_TIME.to_string()),
        kind: classify(issue),
        location: details
            .location
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        attendees: issue.comments + reactions,
        max_attendees: None,
        organizer: issue
            .user
            .as_ref()
            .map(|u| u.login.clone())
            .filter(|login| !login.is_empty())
            .unwrap_or_else(|| DEFAULT_ORGANIZER.to_string()),
        registration_url: details
            .registration_url
            .or_else(|| Some(issue.html_url.clone()))
            .filter(|url| !url.is_empty()),
        tags: issue
            .labels
            .iter()
            .filter(|l| !l.name.to_lowercase().contains("event"))
            .map(|l| l.name.clone())
            .collect(),
        featured: reactions > FEATURED_REACTION_THRESHOLD || issue.milestone.is_some(),
    })
}

/// Converts every event issue and orders the result newest first.
#[must_use]
pub fn events_from_issues(issues: &[Issue], today: NaiveDate) -> Vec<CommunityEvent> {
    let mut events: Vec<CommunityEvent> = issues
        .iter()
        .filter_map(|issue| event_from_issue(issue, today))
        .collect();

    events.sort_by(|a, b| match (parse_date(&a.date), parse_date(&b.date)) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    events
}

fn truncate_description(body: &str) -> String {
    match body.char_indices().nth(DESCRIPTION_LIMIT) {
        Some((end, _)) => format!("{}...", &body[..end]),
        None => body.to_string(),
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%m/%d/%Y"))
        .ok()
}
