use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    Pothole,
    Garbage,
    Streetlight,
    WaterLeakage,
    Drainage,
}

impl IssueType {
    pub const ALL: [IssueType; 5] = [
        IssueType::Pothole,
        IssueType::Garbage,
        IssueType::Streetlight,
        IssueType::WaterLeakage,
        IssueType::Drainage,
    ];

    /// Department that receives reports of this type.
    pub fn department(self) -> &'static str {
        match self {
            IssueType::Pothole => "Road Maintenance Dept",
            IssueType::Garbage => "Sanitation Dept",
            IssueType::Streetlight => "Electrical Dept",
            IssueType::WaterLeakage => "Water Supply Dept",
            IssueType::Drainage => "Sewerage Dept",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IssueType::Pothole => "Pothole",
            IssueType::Garbage => "Garbage",
            IssueType::Streetlight => "Broken Streetlight",
            IssueType::WaterLeakage => "Water Leakage",
            IssueType::Drainage => "Drainage",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IssueType::Pothole => "pothole",
            IssueType::Garbage => "garbage",
            IssueType::Streetlight => "streetlight",
            IssueType::WaterLeakage => "water_leakage",
            IssueType::Drainage => "drainage",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Medium,
    Low,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Reported,
    InProgress,
    Fixed,
}

impl IssueStatus {
    /// Statuses only move forward; `Reported` may skip straight to `Fixed`.
    pub fn can_transition_to(self, next: IssueStatus) -> bool {
        matches!(
            (self, next),
            (IssueStatus::Reported, IssueStatus::InProgress)
                | (IssueStatus::Reported, IssueStatus::Fixed)
                | (IssueStatus::InProgress, IssueStatus::Fixed)
        )
    }

    pub fn is_resolved(self) -> bool {
        matches!(self, IssueStatus::Fixed)
    }

    pub fn label(self) -> &'static str {
        match self {
            IssueStatus::Reported => "Work Reported",
            IssueStatus::InProgress => "Work In Progress",
            IssueStatus::Fixed => "Work Fixed",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IssueStatus::Reported => "reported",
            IssueStatus::InProgress => "in_progress",
            IssueStatus::Fixed => "fixed",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for IssueStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "reported" => Ok(IssueStatus::Reported),
            "in_progress" | "in-progress" => Ok(IssueStatus::InProgress),
            "fixed" => Ok(IssueStatus::Fixed),
            _ => Err(format!("unknown issue status: {value}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "mr")]
    Marathi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Citizen,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
    pub city: String,
    pub ward: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueRecord {
    pub id: String,
    pub reporter_id: String,
    pub reporter_name: String,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub description: String,
    pub image: String, // URL or data URI
    pub location: Location,
    pub severity: Severity,
    pub is_anonymous: bool,
    pub status: IssueStatus,
    pub created_at: String, // RFC 3339
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_at: Option<String>,
    pub confirmations: u32,
    pub is_verified: bool,
    pub needs_review: bool,
    pub assigned_department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_demo: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Citizen-supplied part of a report; the rest is stamped on submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewIssue {
    pub reporter_id: String,
    pub reporter_name: String,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub description: String,
    pub image: String,
    pub location: Location,
    pub severity: Severity,
    pub is_anonymous: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CityScoreEntry {
    pub city: String,
    pub civic_health_score: u8,
    pub total_issues: usize,
    pub resolved_issues: usize,
    pub avg_fix_time_hours: u32, // placeholder, not derived from data
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub age: u32,
    pub city: String,
    pub email: String,
    pub preferred_language: Language,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub issues_reported_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues_handled_count: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub created_at: String,
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_id: Option<String>,
}
