use std::collections::BTreeMap;
use std::collections::btree_map;

use chrono::NaiveDate;
use serde::Serialize;

/// Signal value for a date on which no site can be reserved
pub const CLOSED: i32 = -1;

/// Signal value for a date on which every reservable site is taken
pub const BOOKED: i32 = 0;

/// Per-date availability for one facility.
///
/// Values are the number of open spots when positive, [`BOOKED`] when the
/// facility is full and [`CLOSED`] when nothing is reservable that day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DateSignal(BTreeMap<NaiveDate, i32>);

impl DateSignal {
    /// Create an empty signal
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Whether no date has been observed
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of observed dates
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Signal value for a date, if observed
    pub fn get(&self, date: &NaiveDate) -> Option<i32> {
        self.0.get(date).copied()
    }

    /// Iterate dates in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &i32)> {
        self.0.iter()
    }

    pub(crate) fn entry(&mut self, date: NaiveDate) -> btree_map::Entry<'_, NaiveDate, i32> {
        self.0.entry(date)
    }
}

impl FromIterator<(NaiveDate, i32)> for DateSignal {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, i32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A bookable campground with a resolved availability map
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facility {
    /// Provider resource location id
    pub facility_id: i64,
    /// Display name
    pub facility_name: String,
    /// Map queried for site availability
    pub map_id: i64,
}

/// One facility's availability as emitted by a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityRecord {
    pub rec_area_id: u32,
    pub provider: &'static str,
    pub facility_id: i64,
    pub facility_name: String,
    pub map_id: i64,
    pub availability: DateSignal,
}

/// Result of scanning a region or fetching a linked map
#[derive(Debug)]
pub enum UnitOutcome<T> {
    /// The unit produced a value
    Completed(T),
    /// The unit had nothing to contribute
    Skipped(String),
    /// The unit failed and was dropped
    Failed(ScanError),
}

/// Counters collected over one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub regions_scanned: usize,
    pub regions_failed: usize,
    pub facilities_resolved: usize,
    pub facilities_scanned: usize,
    pub facilities_failed: usize,
    pub links_merged: usize,
    pub links_skipped: usize,
    pub links_failed: usize,
}

/// Custom error type for scan operations
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// API error
    #[error("API error: {0}")]
    ApiError(String),

    /// Rate limited by external API
    #[error("Rate limited by external API")]
    RateLimited,

    /// Authentication failed with external service
    #[error("Authentication failed with external service")]
    AuthenticationFailed,

    /// Requested resource does not exist
    #[error("Resource not found")]
    NotFound,

    /// Transport failure talking to the provider
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Data format error
    #[error("Data format error: {0}")]
    DataFormat(String),

    /// Linked map id that is not an integer
    #[error("Invalid linked map id: {0}")]
    InvalidLinkedMap(String),

    /// Query window falls outside the supported calendar
    #[error("Invalid date range for availability query")]
    InvalidDateRange,

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
