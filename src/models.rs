use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// An idea as it comes back from a store, before any defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaRecord {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub upvotes: Option<i64>,
    #[serde(default)]
    pub comments: Option<i64>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Text(value)) => Some(value),
        Some(RawId::Int(value)) => Some(value.to_string()),
        Some(RawId::Float(value)) => Some(value.to_string()),
        None => None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Unknown or missing values fall back to `Medium`.
    pub fn parse_lossy(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.parse().ok())
            .unwrap_or(Priority::Medium)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }

    pub fn as_lower(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "HIGH" => Ok(Priority::High),
            "MEDIUM" => Ok(Priority::Medium),
            "LOW" => Ok(Priority::Low),
            other => Err(format!("unknown priority '{other}'")),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Status stored on the idea itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdeaStatus {
    Pending,
    InProgress,
    Completed,
    /// A non-empty value the pipeline does not know about.
    Other(String),
}

impl IdeaStatus {
    /// Only the exact backend spellings are known; anything else is `Other`.
    pub fn parse_lossy(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
            return IdeaStatus::Pending;
        };

        match raw {
            "PENDING" => IdeaStatus::Pending,
            "IN_PROGRESS" => IdeaStatus::InProgress,
            "COMPLETED" => IdeaStatus::Completed,
            _ => IdeaStatus::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            IdeaStatus::Pending => "PENDING",
            IdeaStatus::InProgress => "IN_PROGRESS",
            IdeaStatus::Completed => "COMPLETED",
            IdeaStatus::Other(raw) => raw,
        }
    }
}

impl fmt::Display for IdeaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Normalized idea. Every field is populated once, right after a fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct Idea {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: IdeaStatus,
    pub tags: Vec<String>,
    pub assigned_to: String,
    pub created_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub upvotes: u32,
    pub comments: u32,
}

pub const UNTITLED: &str = "Untitled Idea";

impl Idea {
    pub fn from_record(record: IdeaRecord) -> Self {
        let title = record
            .title
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());

        let tags = record
            .tags
            .unwrap_or_default()
            .into_iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect();

        Idea {
            id: record.id.unwrap_or_default(),
            title,
            description: record.description.unwrap_or_default(),
            priority: Priority::parse_lossy(record.priority.as_deref()),
            status: IdeaStatus::parse_lossy(record.status.as_deref()),
            tags,
            assigned_to: record
                .assigned_to
                .map(|value| value.trim().to_string())
                .unwrap_or_default(),
            created_date: record.created_date.as_deref().and_then(parse_date),
            due_date: record.due_date.as_deref().and_then(parse_date),
            upvotes: clamp_count(record.upvotes),
            comments: clamp_count(record.comments),
        }
    }

    /// Case-insensitive existence test.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate.eq_ignore_ascii_case(tag))
    }
}

fn clamp_count(value: Option<i64>) -> u32 {
    value.unwrap_or(0).clamp(0, u32::MAX as i64) as u32
}

/// Parses `YYYY-MM-DD`, ignoring any time component that follows.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Payload for creating an idea.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIdea {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub assigned_to: String,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Todo,
    InProgress,
    Completed,
    OnHold,
    Cancelled,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Todo => "todo",
            ProjectStatus::InProgress => "in-progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::OnHold => "on-hold",
            ProjectStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(ProjectStatus::Todo),
            "in-progress" => Ok(ProjectStatus::InProgress),
            "completed" => Ok(ProjectStatus::Completed),
            "on-hold" => Ok(ProjectStatus::OnHold),
            "cancelled" => Ok(ProjectStatus::Cancelled),
            other => Err(format!(
                "unknown status '{other}' (expected todo, in-progress, completed, on-hold or cancelled)"
            )),
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub name: String,
    pub completed: bool,
    pub due_date: NaiveDate,
}

impl Milestone {
    pub fn new(name: &str, completed: bool, due_date: NaiveDate) -> Self {
        Milestone {
            name: name.to_string(),
            completed,
            due_date,
        }
    }
}

/// Derived tracking view of an idea. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProgress {
    pub id: String,
    pub title: String,
    pub description: String,
    pub assignee: String,
    pub start_date: NaiveDate,
    pub estimated_end_date: NaiveDate,
    pub actual_end_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub progress: u8,
    pub category: String,
    pub priority: String,
    pub milestones: Vec<Milestone>,
    pub tags: Vec<String>,
    pub upvotes: u32,
    pub comments: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub name: String,
    pub count: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub total_projects: usize,
    pub todo_projects: usize,
    pub in_progress_projects: usize,
    pub completed_projects: usize,
    pub on_hold_projects: usize,
    pub cancelled_projects: usize,
    pub overdue_projects: usize,
    pub completion_rate: u8,
    pub average_progress: u8,
    pub categories: Vec<CategorySummary>,
}
