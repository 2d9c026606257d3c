use std::time::Duration;

use reqwest::{Client, Response};
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::executor::AvailabilityProvider;
use crate::provider_types::{MapAvailability, MapAvailabilityQuery, RawCampMap, RawFacility};
use crate::region::Region;
use crate::scan_types::ScanError;
use crate::session_manager::SessionManager;

const LIST_CAMPGROUNDS_PATH: &str = "/api/resourceLocation";
const CAMP_DETAILS_PATH: &str = "/api/maps";
const MAP_AVAILABILITY_PATH: &str = "/api/availability/map";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Settings for [`GoingToCampClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Replaces `https://{host}` for every region when set
    pub base_url: Option<String>,

    /// Per-request timeout (default: 30 seconds)
    pub timeout: Duration,

    /// User agent sent with every request
    pub user_agent: String,

    /// Minimum spacing between provider requests (default: none)
    pub request_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_interval: Duration::ZERO,
        }
    }
}

impl ClientConfig {
    /// Read settings from `GOINGTOCAMP_*` environment variables, keeping
    /// defaults for the ones that are unset
    pub fn from_env() -> Result<Self, ScanError> {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var("GOINGTOCAMP_BASE_URL") {
            config.base_url = Some(base_url);
        }
        if let Ok(user_agent) = std::env::var("GOINGTOCAMP_USER_AGENT") {
            config.user_agent = user_agent;
        }
        if let Some(secs) = env_number("GOINGTOCAMP_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(millis) = env_number("GOINGTOCAMP_REQUEST_INTERVAL_MS")? {
            config.request_interval = Duration::from_millis(millis);
        }

        Ok(config)
    }
}

fn env_number(name: &str) -> Result<Option<u64>, ScanError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| ScanError::ConfigError(format!("{} must be a whole number: {}", name, e))),
        Err(_) => Ok(None),
    }
}

/// Client for interacting with the GoingToCamp reservation API
pub struct GoingToCampClient {
    client: Client,
    session_manager: SessionManager,
    last_request: Mutex<Option<Instant>>,
    config: ClientConfig,
}

impl GoingToCampClient {
    /// Create a new GoingToCamp API client
    pub fn new(config: ClientConfig) -> Result<Self, ScanError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .cookie_store(true)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ScanError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            session_manager: SessionManager::new(),
            last_request: Mutex::new(None),
            config,
        })
    }

    /// Base URL serving a region
    pub fn base_url(&self, region: Region) -> String {
        match &self.config.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}", region.hostname()),
        }
    }

    /// List every resource location of a region
    pub async fn list_campgrounds(&self, region: Region) -> Result<Vec<RawFacility>, ScanError> {
        let value = self.get_json(region, LIST_CAMPGROUNDS_PATH, None).await?;
        Ok(RawFacility::list_from_value(value))
    }

    /// List the maps of a region, with their location links
    pub async fn list_camp_maps(&self, region: Region) -> Result<Vec<RawCampMap>, ScanError> {
        let value = self.get_json(region, CAMP_DETAILS_PATH, None).await?;
        Ok(RawCampMap::list_from_value(value))
    }

    /// Fetch per-site availability for one map
    pub async fn query_map_availability(
        &self,
        region: Region,
        query: &MapAvailabilityQuery,
    ) -> Result<MapAvailability, ScanError> {
        debug!(
            "Fetching availability for location {} on map {} from {} to {}",
            query.resource_location_id, query.map_id, query.start_date, query.end_date
        );

        let value = self
            .get_json(region, MAP_AVAILABILITY_PATH, Some(query))
            .await?;
        MapAvailability::from_value(value)
    }

    async fn get_json(
        &self,
        region: Region,
        path: &str,
        query: Option<&MapAvailabilityQuery>,
    ) -> Result<Value, ScanError> {
        let base_url = self.base_url(region);
        self.session_manager
            .ensure_session(&self.client, &base_url)
            .await;
        self.enforce_request_interval().await;

        let url = format!("{}{}", base_url, path);
        debug!("Making request to: {}", url);

        let mut request = self.client.get(&url).header("Accept", "application/json");
        if let Some(query) = query {
            request = request.query(query);
        }

        let response = request.send().await?;
        let response = check_status(response).await?;

        Ok(response.json::<Value>().await?)
    }

    async fn enforce_request_interval(&self) {
        let mut last_request = self.last_request.lock().await;

        if let Some(last) = *last_request {
            let elapsed = last.elapsed();
            if elapsed < self.config.request_interval {
                sleep(self.config.request_interval - elapsed).await;
            }
        }

        *last_request = Some(Instant::now());
    }
}

async fn check_status(response: Response) -> Result<Response, ScanError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read response body".to_string());
    debug!("API request failed with status {}: {}", status, body);

    match status.as_u16() {
        429 => Err(ScanError::RateLimited),
        401 | 403 => Err(ScanError::AuthenticationFailed),
        404 => Err(ScanError::NotFound),
        _ => Err(ScanError::ApiError(format!("HTTP {} - {}", status, body))),
    }
}

#[async_trait::async_trait]
impl AvailabilityProvider for GoingToCampClient {
    async fn list_campgrounds(&self, region: Region) -> Result<Vec<RawFacility>, ScanError> {
        GoingToCampClient::list_campgrounds(self, region).await
    }

    async fn list_camp_maps(&self, region: Region) -> Result<Vec<RawCampMap>, ScanError> {
        GoingToCampClient::list_camp_maps(self, region).await
    }

    async fn query_map_availability(
        &self,
        region: Region,
        query: &MapAvailabilityQuery,
    ) -> Result<MapAvailability, ScanError> {
        GoingToCampClient::query_map_availability(self, region, query).await
    }
}
