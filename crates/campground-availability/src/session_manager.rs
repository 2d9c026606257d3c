use std::collections::HashSet;

use reqwest::Client;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::scan_types::ScanError;

/// Primes GoingToCamp sessions by visiting each host's home page once.
///
/// The visit stores the host's session cookies in the client's cookie jar
/// before any API request is made. A host is only attempted once per run.
pub struct SessionManager {
    attempted_hosts: Mutex<HashSet<String>>,
}

impl SessionManager {
    /// Create a session manager with no primed hosts
    pub fn new() -> Self {
        Self {
            attempted_hosts: Mutex::new(HashSet::new()),
        }
    }

    /// Make sure a session exists for `base_url`, creating one on first use.
    /// Failing to create one is logged and otherwise ignored.
    pub async fn ensure_session(&self, client: &Client, base_url: &str) {
        {
            let mut attempted = self.attempted_hosts.lock().await;
            if !attempted.insert(base_url.to_string()) {
                return;
            }
        }

        if let Err(e) = self.create_new_session(client, base_url).await {
            warn!("Could not create session for {}: {}", base_url, e);
        }
    }

    /// Whether a session was already attempted for `base_url`
    pub async fn has_session(&self, base_url: &str) -> bool {
        self.attempted_hosts.lock().await.contains(base_url)
    }

    async fn create_new_session(&self, client: &Client, base_url: &str) -> Result<(), ScanError> {
        info!("Creating new session for {}", base_url);

        let response = client
            .get(format!("{}/", base_url))
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.5")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ScanError::ApiError(format!(
                "Session creation failed with status {}",
                response.status()
            )));
        }

        debug!("Session created for {}", base_url);
        Ok(())
    }
}
