use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::scan_types::{Facility, ScanError};

/// Number of days covered by one availability query, starting today
pub const AVAILABILITY_WINDOW_DAYS: u32 = 90;

/// Equipment category for a single piece of non-group equipment
pub const NON_GROUP_EQUIPMENT: i64 = -32768;

/// Facility record from the `resourceLocation` endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFacility {
    pub resource_location_id: Option<i64>,

    /// Category ids; entries that are not integers are ignored when matching
    #[serde(default)]
    pub resource_category_ids: Option<Vec<Value>>,

    #[serde(default)]
    pub localized_values: Option<Vec<Value>>,

    #[serde(default)]
    pub resource_location_name: Option<String>,
}

impl RawFacility {
    /// Validate a raw facility listing, dropping records with the wrong shape.
    /// A response that is not a JSON array yields no facilities.
    pub fn list_from_value(value: Value) -> Vec<RawFacility> {
        let Value::Array(items) = value else {
            debug!("Facility listing is not an array, treating as empty");
            return Vec::new();
        };

        items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<RawFacility>(item) {
                Ok(facility) => Some(facility),
                Err(e) => {
                    debug!("Skipping malformed facility record: {}", e);
                    None
                }
            })
            .collect()
    }

    /// Localized full name of the first localized value, if present
    pub fn localized_full_name(&self) -> Option<&str> {
        self.localized_values
            .as_ref()?
            .first()?
            .get("fullName")?
            .as_str()
    }
}

/// Link from a map to the child map of a resource location
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapLink {
    pub resource_location_id: Option<i64>,
    pub child_map_id: Option<i64>,
}

/// Map record from the `maps` endpoint, reduced to its links
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCampMap {
    pub map_links: Vec<MapLink>,
}

impl RawCampMap {
    /// Validate a raw map listing. Non-object maps and malformed links are dropped.
    pub fn list_from_value(value: Value) -> Vec<RawCampMap> {
        let Value::Array(items) = value else {
            debug!("Map listing is not an array, treating as empty");
            return Vec::new();
        };

        items
            .into_iter()
            .filter_map(|item| {
                let Value::Object(mut fields) = item else {
                    return None;
                };
                let links = match fields.remove("mapLinks") {
                    Some(Value::Array(links)) => links,
                    _ => Vec::new(),
                };
                let map_links = links
                    .into_iter()
                    .filter_map(|link| serde_json::from_value::<MapLink>(link).ok())
                    .collect();
                Some(RawCampMap { map_links })
            })
            .collect()
    }
}

/// Daily status of one site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    /// Code 0
    Available,
    /// Code 1
    Reserved,
    /// Code 2
    NotReservable,
    /// Missing, non-object or unknown code
    Unrecognized,
}

impl DayStatus {
    /// Read a `{"availability": code}` day record
    pub fn from_value(value: &Value) -> Self {
        match value.get("availability").and_then(Value::as_i64) {
            Some(0) => DayStatus::Available,
            Some(1) => DayStatus::Reserved,
            Some(2) => DayStatus::NotReservable,
            _ => DayStatus::Unrecognized,
        }
    }
}

/// Day-by-day statuses for one site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteDays {
    pub site_id: String,
    pub days: Vec<DayStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMapAvailability {
    #[serde(default)]
    resource_availabilities: Option<Map<String, Value>>,

    #[serde(default)]
    map_link_availabilities: Option<Map<String, Value>>,
}

/// Validated response of the `availability/map` endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapAvailability {
    /// Sites whose availability is a list of day records
    pub sites: Vec<SiteDays>,
    /// Linked map ids, in the order the provider returned them
    pub linked_map_ids: Vec<String>,
}

impl MapAvailability {
    /// Validate a raw availability payload.
    ///
    /// Site values that are not lists are dropped. The payload itself must be
    /// an object whose two known fields, when present, are objects.
    pub fn from_value(value: Value) -> Result<Self, ScanError> {
        let raw: RawMapAvailability = serde_json::from_value(value)
            .map_err(|e| ScanError::DataFormat(format!("availability payload: {}", e)))?;

        let sites = raw
            .resource_availabilities
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(site_id, days)| match days {
                Value::Array(days) => Some(SiteDays {
                    site_id,
                    days: days.iter().map(DayStatus::from_value).collect(),
                }),
                _ => None,
            })
            .collect();

        let linked_map_ids = raw
            .map_link_availabilities
            .unwrap_or_default()
            .into_iter()
            .map(|(map_id, _)| map_id)
            .collect();

        Ok(Self {
            sites,
            linked_map_ids,
        })
    }
}

/// Query parameters for the `availability/map` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapAvailabilityQuery {
    pub map_id: i64,
    pub resource_location_id: i64,
    pub booking_category_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_reserving: bool,
    pub get_daily_availability: bool,
    pub party_size: u32,
    pub num_equipment: u32,
    pub equipment_category_id: i64,
    pub filter_data: String,
}

impl MapAvailabilityQuery {
    /// Daily availability query for one facility over the window starting at `start_date`
    pub fn daily(facility: &Facility, start_date: NaiveDate) -> Result<Self, ScanError> {
        let end_date = start_date
            .checked_add_days(Days::new(u64::from(AVAILABILITY_WINDOW_DAYS - 1)))
            .ok_or(ScanError::InvalidDateRange)?;

        Ok(Self {
            map_id: facility.map_id,
            resource_location_id: facility.facility_id,
            booking_category_id: 0,
            start_date,
            end_date,
            is_reserving: true,
            get_daily_availability: true,
            party_size: 1,
            num_equipment: 1,
            equipment_category_id: NON_GROUP_EQUIPMENT,
            filter_data: "[]".to_string(),
        })
    }

    /// Same query against another map
    pub fn with_map_id(&self, map_id: i64) -> Self {
        Self {
            map_id,
            ..self.clone()
        }
    }
}
