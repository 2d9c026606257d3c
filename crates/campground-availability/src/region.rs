use std::fmt;
use std::str::FromStr;

use crate::scan_types::ScanError;

/// A GoingToCamp reservation region (a park network with its own host)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Washington State Parks
    Washington,
    /// BC Parks
    BcParks,
    /// Parks Canada
    ParksCanada,
}

impl Region {
    /// Regions scanned when no single region is selected, in processing order
    pub const DEFAULT_ORDER: [Region; 3] = [Region::BcParks, Region::ParksCanada, Region::Washington];

    /// Numeric region id used by the provider
    pub const fn id(self) -> u32 {
        match self {
            Region::Washington => 3,
            Region::BcParks => 12,
            Region::ParksCanada => 14,
        }
    }

    /// Provider name emitted in result records
    pub const fn provider_name(self) -> &'static str {
        match self {
            Region::Washington => "wa_state_parks",
            Region::BcParks => "bcparks",
            Region::ParksCanada => "parks_canada",
        }
    }

    /// Reservation site host name
    pub const fn hostname(self) -> &'static str {
        match self {
            Region::Washington => "washington.goingtocamp.com",
            Region::BcParks => "camping.bcparks.ca",
            Region::ParksCanada => "reservation.pc.gc.ca",
        }
    }

    /// Look up a region by its numeric id
    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            3 => Some(Region::Washington),
            12 => Some(Region::BcParks),
            14 => Some(Region::ParksCanada),
            _ => None,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id(), self.provider_name())
    }
}

impl FromStr for Region {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(Region::from_id)
            .ok_or_else(|| {
                ScanError::ConfigError(format!(
                    "unknown region '{}', expected one of 3, 12, 14",
                    s
                ))
            })
    }
}
