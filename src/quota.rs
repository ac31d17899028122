//! Daily upstream call budget
//!
//! A process-wide counter keyed by the current UTC calendar day. The day is
//! rotated and the counter consumed inside one critical section, so a
//! concurrent rotate can never race a consume. UTC is used rather than
//! server-local time so the reset instant is the same across deployment
//! regions.

use std::sync::{Mutex, PoisonError};

use chrono::{NaiveDate, Utc};
use tracing::info;

/// Counter state for one calendar day
#[derive(Debug)]
struct QuotaState {
    day: NaiveDate,
    count: u32,
}

/// Tracks upstream calls against a fixed daily ceiling
///
/// The guard knows nothing about cache keys; the quota is global while
/// cache entries are per-key.
#[derive(Debug)]
pub struct QuotaGuard {
    limit: u32,
    state: Mutex<QuotaState>,
}

impl QuotaGuard {
    /// Creates a guard allowing `limit` calls per UTC day
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            state: Mutex::new(QuotaState {
                day: Utc::now().date_naive(),
                count: 0,
            }),
        }
    }

    /// Attempts to consume one call from today's budget
    ///
    /// Rotates the day first if it has changed. Returns `false` once the
    /// ceiling is reached; all later calls that day are rejected until the
    /// next rotation.
    pub fn try_consume(&self) -> bool {
        self.try_consume_on(Utc::now().date_naive())
    }

    /// [`Self::try_consume`] with the current day injected
    ///
    /// The seam the rollover tests use to simulate a date change.
    pub fn try_consume_on(&self, today: NaiveDate) -> bool {
        let mut state = self.lock_state();
        rotate(&mut state, today);

        if state.count >= self.limit {
            return false;
        }
        state.count += 1;
        true
    }

    /// Resets the counter if the UTC day has changed since the last call
    ///
    /// Rotation is otherwise a side effect of [`Self::try_consume`]; this
    /// exists so the fetch path can rotate before its cache fast path, and
    /// is never driven by a scheduled task.
    pub fn rotate_if_new_day(&self) {
        let today = Utc::now().date_naive();
        rotate(&mut self.lock_state(), today);
    }

    /// Calls consumed so far today
    pub fn calls_today(&self) -> u32 {
        self.lock_state().count
    }

    /// Calls still available today
    pub fn remaining(&self) -> u32 {
        let state = self.lock_state();
        self.limit.saturating_sub(state.count)
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, QuotaState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn rotate(state: &mut QuotaState, today: NaiveDate) {
    if state.day != today {
        info!(%today, "rotating daily quota");
        state.day = today;
        state.count = 0;
    }
}
