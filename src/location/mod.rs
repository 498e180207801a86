use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Default IP-geolocation endpoint
pub const IPINFO_URL: &str = "https://ipinfo.io";

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Raw response from the IP-geolocation service; every field is optional
#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    #[serde(default)]
    loc: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    ip: Option<String>,
}

/// Approximate host location derived from the public IP address
#[derive(Debug)]
pub struct IpLocation {
    /// "lat,lon" pair when the service reported one
    pub coordinates: Option<(String, String)>,
    pub city: String,
    pub region: String,
    pub country: String,
    pub ip: String,
}

impl std::fmt::Display for IpLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.coordinates {
            Some((lat, lon)) => write!(
                f,
                "{} ({}, {}, {}) at latitude {}, longitude {}",
                self.ip, self.city, self.region, self.country, lat, lon
            ),
            None => write!(
                f,
                "{} ({}, {}, {}), coordinates unavailable",
                self.ip, self.city, self.region, self.country
            ),
        }
    }
}

/// Looks up the host's approximate location from its public IP
///
/// Purely informational; failures are reported by the caller as diagnostics
/// and never stop the caption pipeline.
pub async fn lookup(base_url: &str) -> Result<IpLocation> {
    debug!("Looking up IP-based location via {}", base_url);

    let client = reqwest::Client::builder()
        .timeout(LOOKUP_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;

    let response: IpInfoResponse = client
        .get(base_url)
        .send()
        .await
        .context("Failed to reach IP-geolocation service")?
        .error_for_status()
        .context("IP-geolocation service returned an error status")?
        .json()
        .await
        .context("Failed to decode IP-geolocation response")?;

    let coordinates = response.loc.as_deref().and_then(|loc| {
        loc.split_once(',')
            .map(|(lat, lon)| (lat.trim().to_string(), lon.trim().to_string()))
    });

    let location = IpLocation {
        coordinates,
        city: response.city.unwrap_or_else(|| "Unknown city".to_string()),
        region: response.region.unwrap_or_else(|| "Unknown region".to_string()),
        country: response.country.unwrap_or_else(|| "Unknown country".to_string()),
        ip: response.ip.unwrap_or_else(|| "Unknown IP".to_string()),
    };

    info!("Approximate location: {}", location);
    Ok(location)
}
