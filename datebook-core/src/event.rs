//! Calendar event types.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{DatebookError, DatebookResult};

/// A persisted base event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "crate::timestamp")]
    pub start: NaiveDateTime,
    #[serde(with = "crate::timestamp")]
    pub end: NaiveDateTime,
    pub category: Category,
}

/// Event fields as supplied by a caller. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub user_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "crate::timestamp")]
    pub start: NaiveDateTime,
    #[serde(with = "crate::timestamp")]
    pub end: NaiveDateTime,
    #[serde(default)]
    pub category: Category,
}

impl NewEvent {
    pub fn new(
        user_id: u64,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        category: Category,
    ) -> Self {
        NewEvent {
            user_id,
            title: title.into(),
            description: String::new(),
            start,
            end,
            category,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Boundary validation. The stores themselves accept anything.
    pub fn validate(&self) -> DatebookResult<()> {
        let mut errors = Vec::new();

        if self.user_id == 0 {
            errors.push("user_id must be a positive integer".to_string());
        }
        if self.title.trim().is_empty() {
            errors.push("title is required".to_string());
        }
        if self.end < self.start {
            errors.push("end must not be before start".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(DatebookError::Validation(errors))
        }
    }

    pub fn into_event(self, id: u64) -> Event {
        Event {
            id,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            start: self.start,
            end: self.end,
            category: self.category,
        }
    }
}

impl From<Event> for NewEvent {
    fn from(event: Event) -> Self {
        NewEvent {
            user_id: event.user_id,
            title: event.title,
            description: event.description,
            start: event.start,
            end: event.end,
            category: event.category,
        }
    }
}

/// The fixed set of event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Category {
    Work,
    #[default]
    Personal,
    Study,
    Health,
    Social,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Work,
        Category::Personal,
        Category::Study,
        Category::Health,
        Category::Social,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Study => "Study",
            Category::Health => "Health",
            Category::Social => "Social",
            Category::Other => "Other",
        }
    }
}

impl FromStr for Category {
    type Err = DatebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DatebookError::invalid("category", trimmed))
    }
}

impl TryFrom<String> for Category {
    type Error = DatebookError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for &'static str {
    fn from(category: Category) -> Self {
        category.as_str()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
