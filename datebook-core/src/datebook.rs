//! Datebook data directory: the three stores plus the recurrence policy.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};

use crate::config::DatebookConfig;
use crate::date_range::DateRange;
use crate::error::{DatebookError, DatebookResult};
use crate::event::{Category, Event, NewEvent};
use crate::recurrence::{EndDatePolicy, Interval, Occurrence, RecurrenceRule, repetitions};
use crate::session::Session;
use crate::stats::Stats;
use crate::store::{EventStore, RuleStore, UserStore};
use crate::user::{NewUser, User};

/// Which base events an occurrence listing starts from.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventFilter {
    pub user_id: Option<u64>,
    pub category: Option<Category>,
    pub range: DateRange,
}

impl EventFilter {
    pub fn for_session(session: Session) -> Self {
        EventFilter {
            user_id: Some(session.user_id),
            ..Default::default()
        }
    }

    pub fn within(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    fn matches_base(&self, event: &Event) -> bool {
        self.user_id.is_none_or(|id| event.user_id == id)
            && self.category.is_none_or(|c| event.category == c)
    }
}

/// Recurrence settings supplied together with a new event.
#[derive(Debug, Clone, Copy)]
pub struct Repeat {
    pub interval: Interval,
    pub times: u32,
    pub until: Option<NaiveDate>,
}

impl Repeat {
    pub fn rule_for(&self, event_id: u64) -> RecurrenceRule {
        RecurrenceRule {
            event_id,
            interval: self.interval,
            times: self.times,
            end_date: self.until,
        }
    }
}

pub struct Datebook {
    events: EventStore,
    rules: RuleStore,
    users: UserStore,
    policy: EndDatePolicy,
}

impl Datebook {
    pub fn open(config: &DatebookConfig) -> DatebookResult<Self> {
        Self::open_dir(config.data_path(), config.recurrence.end_date_policy)
    }

    pub fn open_dir(data_dir: impl Into<PathBuf>, policy: EndDatePolicy) -> DatebookResult<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;

        let datebook = Datebook {
            events: EventStore::open(data_dir.join(EventStore::FILE_NAME))?,
            rules: RuleStore::open(data_dir.join(RuleStore::FILE_NAME))?,
            users: UserStore::open(data_dir.join(UserStore::FILE_NAME))?,
            policy,
        };

        tracing::info!(
            data_dir = %data_dir.display(),
            events = datebook.events.len(),
            policy = ?policy,
            "Opened datebook"
        );
        Ok(datebook)
    }

    pub fn events(&self) -> &EventStore {
        &self.events
    }

    pub fn rules(&self) -> &RuleStore {
        &self.rules
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }

    pub fn end_date_policy(&self) -> EndDatePolicy {
        self.policy
    }

    // USERS:

    pub fn register(&self, new: NewUser) -> DatebookResult<User> {
        self.users.create(new)
    }

    /// Resolve a session to its user, failing if the user is unknown.
    pub fn user_for(&self, session: Session) -> DatebookResult<User> {
        self.users
            .find_by_id(session.user_id)
            .ok_or_else(|| DatebookError::not_found("User", session.user_id))
    }

    // EVENTS:

    pub fn event(&self, id: u64) -> DatebookResult<Event> {
        self.events
            .find_by_id(id)
            .ok_or_else(|| DatebookError::not_found("Event", id))
    }

    /// Validate and store a new event owned by a registered user.
    pub fn create_event(&self, new: NewEvent) -> DatebookResult<Event> {
        self.check_event(&new)?;
        self.events.create(new)
    }

    /// Store an event and then its rule. The rule is checked before
    /// anything is written; a failure saving it leaves the event in place.
    pub fn create_repeating_event(
        &self,
        new: NewEvent,
        repeat: Repeat,
    ) -> DatebookResult<(Event, Option<RecurrenceRule>)> {
        check_rule(new.start, &repeat.rule_for(0))?;
        let event = self.create_event(new)?;

        let id = event.id;
        self.rules.upsert(repeat.rule_for(id))?;
        Ok((event, self.rules.get(id)))
    }

    pub fn update_event(&self, id: u64, new: NewEvent) -> DatebookResult<Event> {
        self.check_event(&new)?;
        self.events.update(id, new)
    }

    /// Replace an event and set its rule in one call. Both are checked
    /// before either is written.
    pub fn update_repeating_event(
        &self,
        id: u64,
        new: NewEvent,
        repeat: Repeat,
    ) -> DatebookResult<(Event, Option<RecurrenceRule>)> {
        let rule = repeat.rule_for(id);
        check_rule(new.start, &rule)?;
        let event = self.update_event(id, new)?;

        self.rules.upsert(rule)?;
        Ok((event, self.rules.get(id)))
    }

    /// Delete an event. Its recurrence rule, if any, is left behind.
    pub fn delete_event(&self, id: u64) -> DatebookResult<bool> {
        self.events.delete(id)
    }

    fn check_event(&self, new: &NewEvent) -> DatebookResult<()> {
        new.validate()?;
        if self.users.find_by_id(new.user_id).is_none() {
            return Err(DatebookError::validation(format!(
                "user {} does not exist",
                new.user_id
            )));
        }
        Ok(())
    }

    // RECURRENCE:

    pub fn recurrence(&self, event_id: u64) -> DatebookResult<Option<RecurrenceRule>> {
        self.event(event_id)?;
        Ok(self.rules.get(event_id))
    }

    /// Set the rule for an existing event. Returns the rule now in effect,
    /// which is the previous one when `rule` does not repeat.
    pub fn set_recurrence(&self, rule: RecurrenceRule) -> DatebookResult<Option<RecurrenceRule>> {
        let event = self.event(rule.event_id)?;
        check_rule(event.start, &rule)?;

        self.rules.upsert(rule)?;
        Ok(self.rules.get(event.id))
    }

    pub fn clear_recurrence(&self, event_id: u64) -> DatebookResult<bool> {
        self.event(event_id)?;
        self.rules.remove(event_id)
    }

    // READS:

    /// Base events matching `filter`, each joined with its generated
    /// occurrences, ordered by start time.
    pub fn events_with_occurrences(&self, filter: &EventFilter) -> Vec<Occurrence> {
        let rules = self.rules.list();

        let mut listing: Vec<Occurrence> = self
            .events
            .list()
            .into_iter()
            .filter(|e| filter.matches_base(e))
            .flat_map(|base| {
                let generated: Vec<Occurrence> = rules
                    .get(&base.id)
                    .map(|rule| {
                        repetitions(&base, rule, self.policy)
                            .take_while(|occ| filter.range.to.is_none_or(|to| occ.event.start <= to))
                            .collect()
                    })
                    .unwrap_or_default();
                std::iter::once(Occurrence::base(base)).chain(generated)
            })
            .filter(|occ| filter.range.overlaps(&occ.event))
            .collect();

        listing.sort_by_key(|occ| occ.event.start);
        listing
    }

    /// Everything a user has on the calendar within `range`.
    pub fn occurrences_between(&self, session: Session, range: DateRange) -> Vec<Occurrence> {
        self.events_with_occurrences(&EventFilter::for_session(session).within(range))
    }

    pub fn stats(&self, session: Session) -> DatebookResult<Stats> {
        self.user_for(session)?;
        let events = self.events.find_by_user(session.user_id);
        Ok(Stats::collect(&events, &self.rules.list(), self.policy))
    }
}

/// Rule checks shared by every path that stores a rule for an event
/// starting at `start`.
fn check_rule(start: NaiveDateTime, rule: &RecurrenceRule) -> DatebookResult<()> {
    if rule.times == 0 {
        return Err(DatebookError::validation("times must be at least 1"));
    }
    if rule.times > RecurrenceRule::MAX_TIMES {
        return Err(DatebookError::validation(format!(
            "times must be at most {}",
            RecurrenceRule::MAX_TIMES
        )));
    }
    if let Some(until) = rule.end_date
        && until < start.date()
    {
        return Err(DatebookError::validation("end date is before the event starts"));
    }
    Ok(())
}
