use std::collections::btree_map::Entry;

use chrono::NaiveDate;

use crate::provider_types::{AVAILABILITY_WINDOW_DAYS, DayStatus, MapAvailability, SiteDays};
use crate::scan_types::{BOOKED, CLOSED, DateSignal};

/// Reduce one map's per-site daily statuses to a per-date signal.
///
/// Only sites that report at least a full window of days count as evidence.
/// When none do, the signal is empty, meaning "no data" rather than closed.
/// For each day, open sites win; the day is closed only when every site is
/// not reservable; otherwise it is booked.
pub fn parse_daily_availability(availability: &MapAvailability, start_date: NaiveDate) -> DateSignal {
    let window = AVAILABILITY_WINDOW_DAYS as usize;

    let sites: Vec<&SiteDays> = availability
        .sites
        .iter()
        .filter(|site| site.days.len() >= window)
        .collect();

    if sites.is_empty() {
        return DateSignal::new();
    }

    start_date
        .iter_days()
        .take(window)
        .enumerate()
        .map(|(offset, date)| {
            let available = count_status(&sites, offset, DayStatus::Available);
            let closed = count_status(&sites, offset, DayStatus::NotReservable);

            let value = if available > 0 {
                available as i32
            } else if closed == sites.len() {
                CLOSED
            } else {
                BOOKED
            };
            (date, value)
        })
        .collect()
}

fn count_status(sites: &[&SiteDays], offset: usize, status: DayStatus) -> usize {
    sites
        .iter()
        .filter(|site| site.days[offset] == status)
        .count()
}

/// Fold a linked map's signal into the accumulated signal for a facility.
///
/// A date only seen in `incoming` is copied. An open partition reopens a
/// closed date. A closed partition closes a date that has no openings. Open
/// partitions add their spots. Any other pairing leaves the accumulator
/// untouched, e.g. an accumulated `5` meeting an incoming `0` stays `5`.
pub fn merge_availability(accumulator: &mut DateSignal, incoming: &DateSignal) {
    for (&date, &value) in incoming.iter() {
        match accumulator.entry(date) {
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
            Entry::Occupied(mut entry) => {
                let current = *entry.get();
                if current == CLOSED && value > 0 {
                    entry.insert(value);
                } else if value == CLOSED && current <= 0 {
                    entry.insert(CLOSED);
                } else if value > 0 && current >= 0 {
                    entry.insert(current.max(0) + value);
                }
            }
        }
    }
}
