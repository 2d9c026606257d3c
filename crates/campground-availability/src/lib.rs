//! # Campground Availability
//!
//! This crate fetches campsite availability from the GoingToCamp reservation
//! platform and reduces it to one per-date signal per campground.
//! It resolves bookable facilities, parses daily site statuses, merges linked
//! map partitions and drives the per-region fetch loop.

/// Supported reservation regions
mod region;
pub use region::*;

/// Typed views of raw provider payloads
mod provider_types;
pub use provider_types::*;

/// Types shared by the scan pipeline
mod scan_types;
pub use scan_types::*;

/// Facility filtering and map resolution
mod facility_resolver;
pub use facility_resolver::*;

/// Daily availability parsing and partition merging
mod availability;
pub use availability::*;

/// HTTP client for the GoingToCamp API
mod going_to_camp_client;
pub use going_to_camp_client::*;

/// Cookie session priming for GoingToCamp hosts
mod session_manager;
pub use session_manager::*;

/// Per-region, per-facility scan orchestration
mod executor;
pub use executor::*;
