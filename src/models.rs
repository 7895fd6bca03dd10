// Data models for JustTasks

use eyre::eyre;
use serde::{Deserialize, Serialize};

/// A single to-do item.
///
/// Identity is positional: a task is addressed by its index in the stored
/// list, so there is no id field. `text` is kept exactly as entered;
/// trimming only gates the empty check when a task is added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub text: String,
    pub category: Category,
    pub priority: Priority,
    pub completed: bool,
}

impl Task {
    /// Build a new, incomplete task.
    pub fn new(text: impl Into<String>, category: Category, priority: Priority) -> Self {
        Self {
            text: text.into(),
            category,
            priority,
            completed: false,
        }
    }
}

/// Task category. Serialized labels are the variant names verbatim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[default]
    General,
    Work,
    Personal,
}

impl Category {
    /// All categories, in the order the view presents them.
    pub const ALL: [Category; 3] = [Category::General, Category::Work, Category::Personal];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::General => "General",
            Category::Work => "Work",
            Category::Personal => "Personal",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "General" => Ok(Category::General),
            "Work" => Ok(Category::Work),
            "Personal" => Ok(Category::Personal),
            _ => Err(eyre!("Unknown category: {}", s)),
        }
    }
}

/// Task priority. Serialized labels are the variant names verbatim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// All priorities, in the order the view presents them.
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Display-sort rank: High sorts before Medium sorts before Low.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "High" => Ok(Priority::High),
            "Medium" => Ok(Priority::Medium),
            "Low" => Ok(Priority::Low),
            _ => Err(eyre!("Unknown priority: {}", s)),
        }
    }
}
