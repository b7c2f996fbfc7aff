//! Daily search counter with local-date rollover.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::state_store::{keys, StateStore};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCounter {
    pub count: u32,
    /// Local date the count belongs to (YYYY-MM-DD)
    pub date: String,
}

impl SearchCounter {
    fn fresh(today: NaiveDate) -> Self {
        Self {
            count: 0,
            date: today.format("%Y-%m-%d").to_string(),
        }
    }

    /// Counter for `today`: the stored count if its date matches, else zero
    pub fn rolled_over(self, today: NaiveDate) -> Self {
        if self.date == today.format("%Y-%m-%d").to_string() {
            self
        } else {
            Self::fresh(today)
        }
    }
}

/// Today's count as seen from `today`
pub fn current(store: &StateStore, today: NaiveDate) -> SearchCounter {
    store
        .load_or_default::<Option<SearchCounter>>(keys::SEARCH_COUNTER)
        .map(|c| c.rolled_over(today))
        .unwrap_or_else(|| SearchCounter::fresh(today))
}

/// Record one search and persist the counter
pub fn increment_on(store: &StateStore, today: NaiveDate) -> Result<SearchCounter> {
    let mut counter = current(store, today);
    counter.count += 1;
    store.save(keys::SEARCH_COUNTER, &counter)?;
    Ok(counter)
}

/// Record one search against the local clock
pub fn increment(store: &StateStore) -> Result<SearchCounter> {
    increment_on(store, Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_counter_increments_within_a_day() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path()).unwrap();

        increment_on(&store, day("2024-03-01")).unwrap();
        let counter = increment_on(&store, day("2024-03-01")).unwrap();
        assert_eq!(counter.count, 2);
        assert_eq!(counter.date, "2024-03-01");
    }

    #[test]
    fn test_counter_resets_on_new_day() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path()).unwrap();

        increment_on(&store, day("2024-03-01")).unwrap();
        increment_on(&store, day("2024-03-01")).unwrap();

        assert_eq!(current(&store, day("2024-03-02")).count, 0);
        let counter = increment_on(&store, day("2024-03-02")).unwrap();
        assert_eq!(counter.count, 1);
        assert_eq!(counter.date, "2024-03-02");
    }
}
