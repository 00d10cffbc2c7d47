//! Explicit caller context.

use serde::{Deserialize, Serialize};

use crate::error::{DatebookError, DatebookResult};

/// The user a request or command acts for.
///
/// Passed explicitly to every operation that depends on who is asking,
/// instead of living in process-wide state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: u64,
}

impl Session {
    pub fn new(user_id: u64) -> DatebookResult<Self> {
        if user_id == 0 {
            return Err(DatebookError::invalid("user id", "0"));
        }
        Ok(Session { user_id })
    }

    /// Parse a session from a raw header or argument value.
    pub fn parse(raw: &str) -> DatebookResult<Self> {
        let user_id = raw
            .trim()
            .parse::<u64>()
            .map_err(|_| DatebookError::invalid("user id", raw.trim()))?;
        Self::new(user_id)
    }

    pub fn owns(&self, owner_id: u64) -> bool {
        self.user_id == owner_id
    }
}
