use std::collections::HashMap;

use serde_json::Value;

use crate::provider_types::{RawCampMap, RawFacility};
use crate::scan_types::Facility;

/// Resource category of a plain campsite
pub const CAMP_SITE: i64 = -2147483648;
/// Resource category of an overflow campsite
pub const OVERFLOW_SITE: i64 = -2147483647;
/// Resource category of a group campsite
pub const GROUP_SITE: i64 = -2147483643;

const CAMPSITE_CATEGORIES: [i64; 3] = [CAMP_SITE, OVERFLOW_SITE, GROUP_SITE];

const UNKNOWN_NAME: &str = "Unknown";

/// Reduce a region's raw facility listing to bookable campgrounds with a map.
///
/// Keeps provider order. `limit` truncates the result to its first `limit`
/// entries; `0` keeps everything.
pub fn resolve_facilities(
    facilities: &[RawFacility],
    maps: &[RawCampMap],
    limit: usize,
) -> Vec<Facility> {
    let map_by_location = child_maps_by_location(maps);

    let resolved = facilities.iter().filter_map(|facility| {
        if !is_campground(facility) {
            return None;
        }
        let location_id = facility.resource_location_id?;
        let map_id = *map_by_location.get(&location_id)?;

        Some(Facility {
            facility_id: location_id,
            facility_name: facility_name(facility),
            map_id,
        })
    });

    if limit > 0 {
        resolved.take(limit).collect()
    } else {
        resolved.collect()
    }
}

/// resourceLocationId -> childMapId over every map link; later links win
fn child_maps_by_location(maps: &[RawCampMap]) -> HashMap<i64, i64> {
    maps.iter()
        .flat_map(|map| map.map_links.iter())
        .filter_map(|link| Some((link.resource_location_id?, link.child_map_id?)))
        .collect()
}

fn is_campground(facility: &RawFacility) -> bool {
    facility
        .resource_category_ids
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter_map(Value::as_i64)
        .any(|category| CAMPSITE_CATEGORIES.contains(&category))
}

fn facility_name(facility: &RawFacility) -> String {
    facility
        .localized_full_name()
        .filter(|name| !name.is_empty())
        .or_else(|| {
            facility
                .resource_location_name
                .as_deref()
                .filter(|name| !name.is_empty())
        })
        .unwrap_or(UNKNOWN_NAME)
        .to_string()
}
