use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discussion {
    pub id: String,
    pub title: String,
    pub body: String,
    pub author: DiscussionAuthor,
    pub category: DiscussionCategory,
    pub created_at: String,
    pub updated_at: String,
    pub comments: u64,
    pub reactions: DiscussionReactions,
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub answered: bool,
    pub featured: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionAuthor {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionCategory {
    pub name: String,
    pub emoji: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionReactions {
    pub total: u64,
    pub heart: u64,
    pub thumbs_up: u64,
    pub rocket: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD`, or `M/D/YYYY` when taken verbatim from an issue body.
    pub date: String,
    /// `HH:MM`.
    pub time: String,
    #[serde(rename = "type")]
    pub kind: EventType,
    /// `virtual`, `hybrid`, or a free-form place.
    pub location: String,
    pub attendees: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attendees: Option<u64>,
    pub organizer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_url: Option<String>,
    pub tags: Vec<String>,
    pub featured: bool,
}

#[derive(
    Debug,
    Copy,
    Clone,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EventType {
    Hackathon,
    Workshop,
    #[default]
    Meetup,
    Webinar,
    Conference,
}

impl EventType {
    /// Types an issue label can select, highest priority first. `Meetup` is
    /// the default and never selected by label.
    pub const LABEL_PRIORITY: [Self; 4] =
        [Self::Hackathon, Self::Workshop, Self::Webinar, Self::Conference];
}
