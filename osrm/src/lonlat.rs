use std::fmt;
use std::str::FromStr;

use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};

/// A position in WGS84 degrees. OSRM and GeoJSON both order these as (longitude, latitude).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    longitude: f64,
    latitude: f64,
}

impl LonLat {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    pub fn x(self) -> f64 {
        self.longitude
    }

    pub fn y(self) -> f64 {
        self.latitude
    }
}

impl fmt::Display for LonLat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.longitude, self.latitude)
    }
}

/// Parses "lon,lat", the same order used in OSRM URLs.
impl FromStr for LonLat {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let parts: Vec<&str> = input.split(',').map(|x| x.trim()).collect();
        if parts.len() != 2 {
            bail!("Expected \"lon,lat\", got {input}");
        }
        let longitude: f64 = parts[0].parse()?;
        let latitude: f64 = parts[1].parse()?;
        if !(-180.0..=180.0).contains(&longitude) || !(-90.0..=90.0).contains(&latitude) {
            bail!("{input} is out of range");
        }
        Ok(Self::new(longitude, latitude))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        let pt: LonLat = "78.495095, 17.4065539".parse().unwrap();
        assert_eq!(pt, LonLat::new(78.495095, 17.4065539));
        assert_eq!(pt.to_string(), "78.495095,17.4065539");

        assert!("78.495095".parse::<LonLat>().is_err());
        assert!("a,b".parse::<LonLat>().is_err());
        assert!("17.4,200.0".parse::<LonLat>().is_err());
    }
}
