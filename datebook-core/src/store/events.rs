//! Base event storage (`events.csv`).

use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::table::{CsvTable, Outcome, Record};
use crate::error::{DatebookError, DatebookResult};
use crate::event::{Category, Event, NewEvent};

#[derive(Serialize, Deserialize)]
pub struct EventRow {
    id: u64,
    #[serde(rename = "userId")]
    user_id: u64,
    title: String,
    description: String,
    #[serde(rename = "startDateTime", with = "crate::timestamp")]
    start: NaiveDateTime,
    #[serde(rename = "endDateTime", with = "crate::timestamp")]
    end: NaiveDateTime,
    category: Category,
}

impl Record for Event {
    type Row = EventRow;

    const HEADERS: &'static [&'static str] = &[
        "id",
        "userId",
        "title",
        "description",
        "startDateTime",
        "endDateTime",
        "category",
    ];

    fn key(&self) -> u64 {
        self.id
    }

    fn to_row(&self) -> EventRow {
        EventRow {
            id: self.id,
            user_id: self.user_id,
            title: self.title.clone(),
            description: self.description.clone(),
            start: self.start,
            end: self.end,
            category: self.category,
        }
    }

    fn from_row(row: EventRow) -> Self {
        Event {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            start: row.start,
            end: row.end,
            category: row.category,
        }
    }
}

/// Owns every persisted base event.
pub struct EventStore {
    table: CsvTable<Event>,
}

impl EventStore {
    pub const FILE_NAME: &'static str = "events.csv";

    pub fn open(path: impl Into<PathBuf>) -> DatebookResult<Self> {
        Ok(EventStore {
            table: CsvTable::open(path)?,
        })
    }

    /// All events in insertion order.
    pub fn list(&self) -> Vec<Event> {
        self.table.all()
    }

    /// Store a new event under a freshly allocated id.
    pub fn create(&self, new: NewEvent) -> DatebookResult<Event> {
        let event = self.table.mutate(|rows| {
            let event = new.into_event(rows.ids.allocate());
            rows.records.push(event.clone());
            Ok(Outcome::changed(event))
        })?;

        tracing::info!(id = event.id, user_id = event.user_id, "Created event");
        Ok(event)
    }

    /// Overwrite every field of the event with `id`.
    pub fn update(&self, id: u64, new: NewEvent) -> DatebookResult<Event> {
        let event = self.table.mutate(|rows| {
            let slot = rows
                .records
                .iter_mut()
                .find(|e| e.id == id)
                .ok_or_else(|| DatebookError::not_found("Event", id))?;
            *slot = new.into_event(id);
            Ok(Outcome::changed(slot.clone()))
        })?;

        tracing::info!(id, "Updated event");
        Ok(event)
    }

    /// Remove the event with `id`. Returns whether anything was removed.
    pub fn delete(&self, id: u64) -> DatebookResult<bool> {
        let removed = self.table.mutate(|rows| {
            let before = rows.records.len();
            rows.records.retain(|e| e.id != id);
            let removed = rows.records.len() != before;
            Ok(if removed {
                Outcome::changed(true)
            } else {
                Outcome::unchanged(false)
            })
        })?;

        if removed {
            tracing::info!(id, "Deleted event");
        }
        Ok(removed)
    }

    pub fn find_by_id(&self, id: u64) -> Option<Event> {
        self.table.find(|e| e.id == id)
    }

    pub fn find_by_user(&self, user_id: u64) -> Vec<Event> {
        self.table.filter(|e| e.user_id == user_id)
    }

    pub fn find_by_category(&self, category: Category) -> Vec<Event> {
        self.table.filter(|e| e.category == category)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
