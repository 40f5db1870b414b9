//! Descriptive task fields that do not take part in the state machine.

use super::{ParseTaskValueError, TaskDomainError};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-empty, trimmed task title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Creates a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of work a task represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    /// Watering, feeding and pruning plants.
    PlantCare,
    /// Feeding and tending animals.
    AnimalCare,
    /// Repairs and upkeep of the house.
    HomeMaintenance,
    /// Garden beds and grounds.
    Garden,
    /// Tools and machinery.
    Equipment,
    /// Work tied to the time of year.
    Seasonal,
    /// Anything else.
    #[default]
    Custom,
}

impl TaskCategory {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PlantCare => "plant_care",
            Self::AnimalCare => "animal_care",
            Self::HomeMaintenance => "home_maintenance",
            Self::Garden => "garden",
            Self::Equipment => "equipment",
            Self::Seasonal => "seasonal",
            Self::Custom => "custom",
        }
    }
}

impl TryFrom<&str> for TaskCategory {
    type Error = ParseTaskValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "plant_care" => Ok(Self::PlantCare),
            "animal_care" => Ok(Self::AnimalCare),
            "home_maintenance" => Ok(Self::HomeMaintenance),
            "garden" => Ok(Self::Garden),
            "equipment" => Ok(Self::Equipment),
            "seasonal" => Ok(Self::Seasonal),
            "custom" => Ok(Self::Custom),
            _ => Err(ParseTaskValueError::new("category", value)),
        }
    }
}

/// Task priority, stored as 1 (high) to 3 (low).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TaskPriority {
    /// Do first.
    High,
    /// Normal.
    #[default]
    Medium,
    /// When time allows.
    Low,
}

impl From<TaskPriority> for u8 {
    fn from(priority: TaskPriority) -> Self {
        match priority {
            TaskPriority::High => 1,
            TaskPriority::Medium => 2,
            TaskPriority::Low => 3,
        }
    }
}

impl TryFrom<u8> for TaskPriority {
    type Error = ParseTaskValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::High),
            2 => Ok(Self::Medium),
            3 => Ok(Self::Low),
            _ => Err(ParseTaskValueError::new("priority", value.to_string())),
        }
    }
}

/// How often a task repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    /// Does not repeat.
    #[default]
    Once,
    /// Every day.
    Daily,
    /// Every week.
    Weekly,
    /// Every two weeks.
    Biweekly,
    /// Every month.
    Monthly,
    /// Every three months.
    Quarterly,
    /// Every year.
    Annually,
}

impl Recurrence {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Once => "once",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Annually => "annually",
        }
    }
}

impl TryFrom<&str> for Recurrence {
    type Error = ParseTaskValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "once" => Ok(Self::Once),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "biweekly" => Ok(Self::Biweekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "annually" => Ok(Self::Annually),
            _ => Err(ParseTaskValueError::new("recurrence", value)),
        }
    }
}

/// Descriptive and scheduling fields of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetails {
    /// Task title.
    pub title: TaskTitle,
    /// Longer description.
    pub description: String,
    /// Kind of work.
    pub category: TaskCategory,
    /// Priority.
    pub priority: TaskPriority,
    /// Day the task is due, if scheduled.
    pub due_date: Option<NaiveDate>,
    /// Time of day the task is due, if set.
    pub due_time: Option<NaiveTime>,
    /// Repeat schedule.
    pub recurrence: Recurrence,
    /// Whether a reminder email is sent.
    pub notify_email: bool,
}

impl TaskDetails {
    /// Creates details with only a title set.
    #[must_use]
    pub fn titled(title: TaskTitle) -> Self {
        Self {
            title,
            description: String::new(),
            category: TaskCategory::default(),
            priority: TaskPriority::default(),
            due_date: None,
            due_time: None,
            recurrence: Recurrence::default(),
            notify_email: false,
        }
    }
}
