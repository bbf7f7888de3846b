use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

use crate::config::FlightsConfig;

/// A single flight seen at the requested airport within the last hour.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FlightState {
    /// Transponder address, unique per airframe.
    pub id: String,
    pub callsign: Option<String>,
    pub origin_country: String,
    pub on_ground: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum FlightError {
    #[error("airport {0} is not supported")]
    UnsupportedAirport(String),
    #[error("flight data provider failed: {0}")]
    Upstream(#[source] anyhow::Error),
}

#[async_trait]
pub trait FlightProvider: Send + Sync {
    /// Flights for an IATA airport code. Only codes in the IATA->ICAO
    /// table are supported.
    async fn flights(&self, airport: &str) -> Result<Vec<FlightState>, FlightError>;
}

/// OpenSky wants ICAO codes while the UI speaks IATA. Only Hyderabad is
/// mapped today, matching what the clock ships with.
pub fn icao_for(airport: &str) -> Option<&'static str> {
    match airport.to_ascii_uppercase().as_str() {
        "HYD" => Some("VEGY"),
        _ => None,
    }
}

/// Raw arrival/departure entry as OpenSky returns it. The origin country
/// and ground state are not part of these endpoints.
#[derive(Debug, serde::Deserialize)]
struct OpenSkyFlight {
    icao24: String,
    callsign: Option<String>,
}

/// Merge arrivals and departures, deduplicating by transponder address
/// (a flight arriving and departing within the window shows up in both).
fn merge_flights(batches: Vec<Vec<OpenSkyFlight>>) -> Vec<FlightState> {
    let mut seen: HashMap<String, FlightState> = HashMap::new();

    for flight in batches.into_iter().flatten() {
        seen.entry(flight.icao24.clone()).or_insert(FlightState {
            id: flight.icao24,
            callsign: flight.callsign.map(|c| c.trim().to_owned()).filter(|c| !c.is_empty()),
            origin_country: "N/A".to_owned(),
            on_ground: false,
        });
    }

    let mut flights: Vec<_> = seen.into_values().collect();
    flights.sort_by(|a, b| a.id.cmp(&b.id));
    flights
}

pub struct OpenSkyClient {
    config: FlightsConfig,
    client: reqwest::Client,
}

impl OpenSkyClient {
    pub fn new(config: FlightsConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    async fn fetch(&self, kind: &str, icao: &str, begin: u64, end: u64) -> Result<Vec<OpenSkyFlight>, FlightError> {
        let url = format!(
            "{}/flights/{}?airport={}&begin={}&end={}",
            self.config.base_url.trim_end_matches('/'),
            kind,
            icao,
            begin,
            end
        );

        let res = self
            .client
            .get(url)
            .timeout(Duration::from_millis(self.config.timeout_ms))
            .send()
            .await
            .map_err(|err| FlightError::Upstream(err.into()))?
            .error_for_status()
            .map_err(|err| FlightError::Upstream(err.into()))?;

        res.json().await.map_err(|err| FlightError::Upstream(err.into()))
    }
}

#[async_trait]
impl FlightProvider for OpenSkyClient {
    async fn flights(&self, airport: &str) -> Result<Vec<FlightState>, FlightError> {
        let icao = icao_for(airport).ok_or_else(|| FlightError::UnsupportedAirport(airport.to_owned()))?;

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let one_hour_ago = now.saturating_sub(3600);

        let (arrivals, departures) = tokio::try_join!(
            self.fetch("arrival", icao, one_hour_ago, now),
            self.fetch("departure", icao, one_hour_ago, now),
        )?;

        Ok(merge_flights(vec![arrivals, departures]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flight(icao24: &str, callsign: Option<&str>) -> OpenSkyFlight {
        OpenSkyFlight {
            icao24: icao24.to_owned(),
            callsign: callsign.map(|c| c.to_owned()),
        }
    }

    #[test]
    fn test_icao_mapping() {
        assert_eq!(icao_for("HYD"), Some("VEGY"));
        assert_eq!(icao_for("hyd"), Some("VEGY"));
        assert_eq!(icao_for("JFK"), None);
    }

    #[test]
    fn test_merge_deduplicates() {
        let merged = merge_flights(vec![
            vec![flight("abc123", Some("AIC840 ")), flight("def456", None)],
            vec![flight("abc123", Some("AIC840 "))],
        ]);

        assert_eq!(merged.len(), 2);
        let first = merged.iter().find(|f| f.id == "abc123").unwrap();
        assert_eq!(first.callsign.as_deref(), Some("AIC840"));
        assert_eq!(first.origin_country, "N/A");
        assert!(!first.on_ground);
    }

    #[test]
    fn test_merge_drops_blank_callsigns() {
        let merged = merge_flights(vec![vec![flight("abc123", Some("   "))]]);
        assert_eq!(merged[0].callsign, None);
    }
}
