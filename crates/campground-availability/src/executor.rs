use chrono::{Local, NaiveDate};
use tracing::{debug, error, info};

use crate::availability::{merge_availability, parse_daily_availability};
use crate::facility_resolver::resolve_facilities;
use crate::provider_types::{MapAvailability, MapAvailabilityQuery, RawCampMap, RawFacility};
use crate::region::Region;
use crate::scan_types::*;

/// Source of raw GoingToCamp data.
///
/// Session handling, authentication and transport belong to the implementor.
#[async_trait::async_trait]
pub trait AvailabilityProvider: Send + Sync {
    /// Every resource location of a region
    async fn list_campgrounds(&self, region: Region) -> Result<Vec<RawFacility>, ScanError>;

    /// Every map of a region, with its location links
    async fn list_camp_maps(&self, region: Region) -> Result<Vec<RawCampMap>, ScanError>;

    /// Per-site availability for the map named in `query`
    async fn query_map_availability(
        &self,
        region: Region,
        query: &MapAvailabilityQuery,
    ) -> Result<MapAvailability, ScanError>;
}

#[derive(Debug, Clone)]
pub struct ScanExecutorConfig {
    /// Regions to scan, in order (default: BC Parks, Parks Canada, Washington)
    pub regions: Vec<Region>,

    /// Maximum facilities scanned per region, 0 for no limit (default: 0)
    pub facility_limit: usize,

    /// First day of the availability window (default: today)
    pub start_date: NaiveDate,
}

impl Default for ScanExecutorConfig {
    fn default() -> Self {
        Self {
            regions: Region::DEFAULT_ORDER.to_vec(),
            facility_limit: 0,
            start_date: Local::now().date_naive(),
        }
    }
}

/// Records and counters produced by one run
#[derive(Debug)]
pub struct ScanRun {
    /// One record per scanned facility, region by region
    pub records: Vec<AvailabilityRecord>,
    pub summary: ScanSummary,
}

/// Drives the region -> facility -> linked map fetch loop.
///
/// Everything runs sequentially. A failed linked map, facility or region is
/// logged and left out; the run itself never fails.
pub struct ScanExecutor<P> {
    provider: P,
    config: ScanExecutorConfig,
}

impl<P: AvailabilityProvider> ScanExecutor<P> {
    pub fn new(provider: P, config: Option<ScanExecutorConfig>) -> Self {
        Self {
            provider,
            config: config.unwrap_or_default(),
        }
    }

    /// Scan every configured region
    pub async fn run(&self) -> ScanRun {
        info!(
            "Starting availability scan of {} region(s) from {}",
            self.config.regions.len(),
            self.config.start_date
        );

        let mut records = Vec::new();
        let mut summary = ScanSummary::default();

        for &region in &self.config.regions {
            match self.scan_region(region, &mut summary).await {
                UnitOutcome::Completed(region_records) => {
                    summary.regions_scanned += 1;
                    records.extend(region_records);
                }
                UnitOutcome::Skipped(reason) => {
                    summary.regions_scanned += 1;
                    info!("Skipping region {}: {}", region, reason);
                }
                UnitOutcome::Failed(e) => {
                    summary.regions_failed += 1;
                    error!("Error rec_area {}: {:?}", region.id(), anyhow::Error::from(e));
                }
            }
        }

        info!(
            "Scan finished: {} record(s), {} facility failure(s), {} region failure(s)",
            records.len(),
            summary.facilities_failed,
            summary.regions_failed
        );
        debug!("Scan summary: {:?}", summary);

        ScanRun { records, summary }
    }

    async fn scan_region(
        &self,
        region: Region,
        summary: &mut ScanSummary,
    ) -> UnitOutcome<Vec<AvailabilityRecord>> {
        let facilities = match self.resolve_region(region).await {
            Ok(facilities) => facilities,
            Err(e) => return UnitOutcome::Failed(e),
        };

        if facilities.is_empty() {
            return UnitOutcome::Skipped("no bookable campgrounds".to_string());
        }

        info!("Scanning {} campground(s) in region {}", facilities.len(), region);
        summary.facilities_resolved += facilities.len();

        let mut records = Vec::with_capacity(facilities.len());
        for facility in &facilities {
            match self.scan_facility(region, facility, summary).await {
                Ok(record) => {
                    summary.facilities_scanned += 1;
                    records.push(record);
                }
                Err(e) => {
                    summary.facilities_failed += 1;
                    error!("Error {}: {}", facility.facility_name, e);
                }
            }
        }

        UnitOutcome::Completed(records)
    }

    async fn resolve_region(&self, region: Region) -> Result<Vec<Facility>, ScanError> {
        let facilities = self.provider.list_campgrounds(region).await?;
        let maps = self.provider.list_camp_maps(region).await?;

        Ok(resolve_facilities(
            &facilities,
            &maps,
            self.config.facility_limit,
        ))
    }

    async fn scan_facility(
        &self,
        region: Region,
        facility: &Facility,
        summary: &mut ScanSummary,
    ) -> Result<AvailabilityRecord, ScanError> {
        let (query, primary) = self.fetch_primary_map(region, facility).await?;

        let mut availability = parse_daily_availability(&primary, self.config.start_date);

        for link_id in &primary.linked_map_ids {
            match self.fetch_linked_map(region, &query, link_id).await {
                UnitOutcome::Completed(linked) => {
                    summary.links_merged += 1;
                    if availability.is_empty() {
                        availability = linked;
                    } else {
                        merge_availability(&mut availability, &linked);
                    }
                }
                UnitOutcome::Skipped(reason) => {
                    summary.links_skipped += 1;
                    debug!("Linked map {} of {}: {}", link_id, facility.facility_name, reason);
                }
                UnitOutcome::Failed(e) => {
                    summary.links_failed += 1;
                    debug!(
                        "Linked map {} of {} failed: {}",
                        link_id, facility.facility_name, e
                    );
                }
            }
        }

        Ok(AvailabilityRecord {
            rec_area_id: region.id(),
            provider: region.provider_name(),
            facility_id: facility.facility_id,
            facility_name: facility.facility_name.clone(),
            map_id: facility.map_id,
            availability,
        })
    }

    async fn fetch_primary_map(
        &self,
        region: Region,
        facility: &Facility,
    ) -> Result<(MapAvailabilityQuery, MapAvailability), ScanError> {
        let query = MapAvailabilityQuery::daily(facility, self.config.start_date)?;
        let primary = self.provider.query_map_availability(region, &query).await?;
        Ok((query, primary))
    }

    async fn fetch_linked_map(
        &self,
        region: Region,
        query: &MapAvailabilityQuery,
        link_id: &str,
    ) -> UnitOutcome<DateSignal> {
        let Ok(map_id) = link_id.trim().parse::<i64>() else {
            return UnitOutcome::Failed(ScanError::InvalidLinkedMap(link_id.to_string()));
        };

        let linked = match self
            .provider
            .query_map_availability(region, &query.with_map_id(map_id))
            .await
        {
            Ok(linked) => linked,
            Err(e) => return UnitOutcome::Failed(e),
        };

        let signal = parse_daily_availability(&linked, self.config.start_date);
        if signal.is_empty() {
            UnitOutcome::Skipped("no qualifying sites".to_string())
        } else {
            UnitOutcome::Completed(signal)
        }
    }
}
