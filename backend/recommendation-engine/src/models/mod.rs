use crate::error::{RecommendError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Catalog item (course, tutorial, quiz, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(rename = "type", default)]
    pub item_type: String,
}

impl Item {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            tags: Vec::new(),
            item_type: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = item_type.into();
        self
    }

    /// Text used for vectorization: title, description, tags and type,
    /// skipping empty parts.
    pub fn text(&self) -> String {
        let tags = self.tags.join(" ");
        [
            self.title.as_str(),
            self.description.as_str(),
            tags.as_str(),
            self.item_type.as_str(),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    #[default]
    View,
    Quiz,
    Complete,
    Like,
    #[serde(other)]
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::View => "view",
            EventType::Quiz => "quiz",
            EventType::Complete => "complete",
            EventType::Like => "like",
            EventType::Other => "other",
        }
    }
}

/// Interaction event from the append-only event log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub user_id: String,
    pub item_id: String,
    #[serde(rename = "type", default)]
    pub event_type: EventType,
    /// Quiz score, typically in [0, 1]
    #[serde(default)]
    pub score: f64,
    #[serde(default, alias = "ts", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Event {
    pub fn new(
        user_id: impl Into<String>,
        item_id: impl Into<String>,
        event_type: EventType,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            item_id: item_id.into(),
            event_type,
            score: 0.0,
            timestamp: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(RecommendError::InvalidInput(format!(
                "event for item '{}' is missing user_id",
                self.item_id
            )));
        }
        if self.item_id.trim().is_empty() {
            return Err(RecommendError::InvalidInput(format!(
                "event for user '{}' is missing item_id",
                self.user_id
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub interests: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub goals: Vec<String>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interests = interests.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_goals<I, S>(mut self, goals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.goals = goals.into_iter().map(Into::into).collect();
        self
    }

    /// Free-text profile: interests then goals, space-joined
    pub fn profile_text(&self) -> String {
        format!("{} {}", self.interests.join(" "), self.goals.join(" "))
            .trim()
            .to_string()
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(RecommendError::InvalidInput(
                "user record is missing id".to_string(),
            ));
        }
        Ok(())
    }
}

/// Reward statistics for one `(user_id, item_id)` arm
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BanditArmState {
    pub count: u64,
    pub total_reward: f64,
    pub last_reward: Option<f64>,
}

impl BanditArmState {
    pub fn record(&mut self, reward: f64) {
        self.count += 1;
        self.total_reward += reward;
        self.last_reward = Some(reward);
    }

    /// Historical mean reward; 0.0 for an arm that was never pulled
    pub fn average_reward(&self) -> f64 {
        if self.count > 0 {
            self.total_reward / self.count as f64
        } else {
            0.0
        }
    }
}

/// Candidate with its blended ranking key
#[derive(Debug, Clone, PartialEq)]
pub struct RankedItem {
    pub item_id: String,
    pub score: f64,
}

/// Shape of the model produced by a `fit` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FitSummary {
    pub item_count: usize,
    pub vocabulary_size: usize,
    pub user_count: usize,
    pub interacted_item_count: usize,
}

pub fn parse_items(json: &str) -> Result<Vec<Item>> {
    Ok(serde_json::from_str(json)?)
}

pub fn parse_events(json: &str) -> Result<Vec<Event>> {
    let events: Vec<Event> = serde_json::from_str(json)?;
    for event in &events {
        event.validate()?;
    }
    Ok(events)
}

pub fn parse_user(json: &str) -> Result<User> {
    let user: User = serde_json::from_str(json)?;
    user.validate()?;
    Ok(user)
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
