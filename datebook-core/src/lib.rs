//! Core types and storage for datebook.
//!
//! - `event`, `recurrence`, `user` define the data model
//! - `store` persists each record type to its own CSV file
//! - `Datebook` ties the stores together and builds occurrence listings

pub mod config;
pub mod date_range;
pub mod datebook;
pub mod error;
pub mod event;
pub mod recurrence;
pub mod session;
pub mod stats;
pub mod store;
pub mod timestamp;
pub mod user;

pub use datebook::{Datebook, EventFilter, Repeat};
pub use error::{DatebookError, DatebookResult};
pub use event::{Category, Event, NewEvent};
pub use recurrence::{EndDatePolicy, Interval, Occurrence, OccurrenceKey, RecurrenceRule};
pub use session::Session;
pub use user::{NewUser, User};
