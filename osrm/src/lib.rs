//! A minimal client for the OSRM `route/v1` service. Given two endpoints, it returns the driving
//! path between them as an ordered list of positions.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod lonlat;
mod response;

use anyhow::Result;

pub use lonlat::LonLat;
pub use response::{load_response_file, parse_response};

/// The public demo server. It's rate limited, so don't hammer it.
pub const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";
pub const DEFAULT_PROFILE: &str = "driving";

pub struct Client {
    base_url: String,
    profile: String,
}

impl Client {
    pub fn new(base_url: &str, profile: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            profile: profile.to_string(),
        }
    }

    pub fn route_url(&self, start: LonLat, end: LonLat) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=full&geometries=geojson",
            self.base_url,
            self.profile,
            start.x(),
            start.y(),
            end.x(),
            end.y()
        )
    }

    /// Blocks on one request. There's no retry; callers decide what a failure means.
    pub fn fetch(&self, start: LonLat, end: LonLat) -> Result<Vec<LonLat>> {
        let url = self.route_url(start, end);
        info!("Requesting route from {url}");
        let body = match ureq::get(&url).call() {
            Ok(resp) => resp.into_string()?,
            // OSRM reports things like NoRoute with a 400 and a JSON body explaining why
            Err(ureq::Error::Status(status, resp)) => {
                let body = resp.into_string()?;
                if let Err(err) = parse_response(&body) {
                    bail!("OSRM returned HTTP {status}: {err}");
                }
                bail!("OSRM returned HTTP {status}");
            }
            Err(err) => return Err(err.into()),
        };
        parse_response(&body)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_PROFILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_matches_osrm_format() {
        let client = Client::new("http://localhost:5000/", "driving");
        let url = client.route_url(
            LonLat::new(78.495095, 17.4065539),
            LonLat::new(78.45031, 17.42895),
        );
        assert_eq!(
            url,
            "http://localhost:5000/route/v1/driving/78.495095,17.4065539;78.45031,17.42895?overview=full&geometries=geojson"
        );
    }

    #[test]
    fn default_client_uses_public_server() {
        let url = Client::default().route_url(LonLat::new(1.0, 2.0), LonLat::new(3.5, -4.25));
        assert_eq!(
            url,
            "https://router.project-osrm.org/route/v1/driving/1,2;3.5,-4.25?overview=full&geometries=geojson"
        );
    }
}
