use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use osrm::LonLat;

/// One timestamped waypoint of a route.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub lat: f64,
    pub lng: f64,
    pub timestamp: DateTime<Utc>,
}

impl Sample {
    pub fn new(lat: f64, lng: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            lat,
            lng,
            timestamp,
        }
    }

    pub fn lon_lat(&self) -> LonLat {
        LonLat::new(self.lng, self.lat)
    }
}

/// The samples a vehicle replays, in order. Nothing mutates this after it's built; a new route
/// means building a new one.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Route {
    // Timestamps strictly increase
    samples: Vec<Sample>,
}

impl Route {
    pub fn empty() -> Self {
        Self {
            samples: Vec::new(),
        }
    }

    pub fn new(samples: Vec<Sample>) -> Result<Self> {
        for pair in samples.windows(2) {
            if pair[0].timestamp >= pair[1].timestamp {
                bail!(
                    "Route samples out-of-order: {} then {}",
                    pair[0].timestamp,
                    pair[1].timestamp
                );
            }
        }
        Ok(Self { samples })
    }

    /// The router only gives positions, so make up times: point `i` happens at
    /// `load_time + i * spacing`.
    pub fn from_points(
        points: &[LonLat],
        load_time: DateTime<Utc>,
        spacing: Duration,
    ) -> Result<Self> {
        if spacing <= Duration::zero() {
            bail!("Sample spacing must be positive, not {spacing}");
        }
        let mut samples = Vec::new();
        let mut time = load_time;
        for (idx, pt) in points.iter().enumerate() {
            if idx > 0 {
                time = match time.checked_add_signed(spacing) {
                    Some(t) => t,
                    None => bail!("Point {idx} is out of range with spacing {spacing}"),
                };
            }
            samples.push(Sample::new(pt.y(), pt.x(), time));
        }
        Self::new(samples)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// None for an empty route
    pub fn last_idx(&self) -> Option<usize> {
        self.samples.len().checked_sub(1)
    }

    pub fn get(&self, idx: usize) -> Option<&Sample> {
        self.samples.get(idx)
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
}
