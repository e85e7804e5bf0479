use anyhow::Result;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;

use model::{ReplayController, Sample};

/// The map starts centered here, at RTC X Roads metro station in Hyderabad.
pub const INITIAL_CENTER: [f64; 2] = [17.385044, 78.486671];
pub const INITIAL_ZOOM: usize = 14;

struct LineStyle {
    color: &'static str,
    weight: f64,
    opacity: f64,
}

const FULL_ROUTE: LineStyle = LineStyle {
    color: "#044ab3",
    weight: 4.0,
    opacity: 0.8,
};
const TRAVELED: LineStyle = LineStyle {
    color: "green",
    weight: 5.0,
    opacity: 0.8,
};

/// Everything a map needs to draw the current state of a replay, as GeoJSON.
pub struct Scene {
    collection: FeatureCollection,
}

impl Scene {
    pub fn new(replay: &ReplayController) -> Self {
        let mut features = Vec::new();

        let route = replay.route().samples();
        if let Some(f) = polyline("route", route, &FULL_ROUTE) {
            features.push(f);
        }
        if let Some(f) = polyline("traveled", replay.traveled(), &TRAVELED) {
            features.push(f);
        }
        if let Some(sample) = replay.current() {
            features.push(marker("vehicle", sample, "🚗", 24));
        }
        if let Some(sample) = replay.destination() {
            features.push(marker("destination", sample, "📍", 35));
        }

        let mut map = JsonObject::new();
        map.insert("center".to_string(), json!(INITIAL_CENTER));
        map.insert("zoom".to_string(), json!(INITIAL_ZOOM));
        let mut foreign_members = JsonObject::new();
        foreign_members.insert("map".to_string(), serde_json::Value::Object(map));

        Self {
            collection: FeatureCollection {
                bbox: None,
                features,
                foreign_members: Some(foreign_members),
            },
        }
    }

    pub fn features(&self) -> &[Feature] {
        &self.collection.features
    }

    pub fn to_geojson(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.collection)?)
    }

    pub fn write(&self, path: &str) -> Result<()> {
        fs_err::write(path, self.to_geojson()?)?;
        Ok(())
    }
}

// A line needs at least two points; a single-sample route is just its markers.
fn polyline(kind: &str, samples: &[Sample], style: &LineStyle) -> Option<Feature> {
    if samples.len() < 2 {
        return None;
    }
    let coordinates = samples.iter().map(|s| vec![s.lng, s.lat]).collect();

    let mut properties = JsonObject::new();
    properties.insert("kind".to_string(), json!(kind));
    properties.insert("color".to_string(), json!(style.color));
    properties.insert("weight".to_string(), json!(style.weight));
    properties.insert("opacity".to_string(), json!(style.opacity));
    Some(feature(Value::LineString(coordinates), properties))
}

fn marker(kind: &str, sample: &Sample, icon: &str, icon_size: usize) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("kind".to_string(), json!(kind));
    properties.insert("icon".to_string(), json!(icon));
    properties.insert("icon_size".to_string(), json!([icon_size, icon_size]));
    properties.insert("timestamp".to_string(), json!(sample.timestamp.to_rfc3339()));
    feature(Value::Point(vec![sample.lng, sample.lat]), properties)
}

fn feature(value: Value, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use model::Route;
    use osrm::LonLat;

    use super::*;

    fn replay(len: usize) -> ReplayController {
        let points: Vec<LonLat> = (0..len)
            .map(|i| LonLat::new(78.49 + 0.001 * i as f64, 17.40 + 0.001 * i as f64))
            .collect();
        let load_time = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        ReplayController::new(
            Route::from_points(&points, load_time, Duration::milliseconds(5000)).unwrap(),
        )
    }

    fn kinds(scene: &Scene) -> Vec<String> {
        scene
            .features()
            .iter()
            .map(|f| f.property("kind").unwrap().as_str().unwrap().to_string())
            .collect()
    }

    fn line_len(f: &Feature) -> usize {
        match f.geometry.as_ref().unwrap().value {
            Value::LineString(ref pts) => pts.len(),
            _ => panic!("not a line"),
        }
    }

    #[test]
    fn empty_route_draws_nothing() {
        let scene = Scene::new(&ReplayController::new(Route::empty()));
        assert!(scene.features().is_empty());
        let json: serde_json::Value = serde_json::from_str(&scene.to_geojson().unwrap()).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["map"]["zoom"], 14);
    }

    #[test]
    fn traveled_prefix_grows() {
        let mut replay = replay(5);
        let scene = Scene::new(&replay);
        // Nothing traveled yet
        assert_eq!(kinds(&scene), vec!["route", "vehicle", "destination"]);
        assert_eq!(line_len(&scene.features()[0]), 5);

        replay.play();
        replay.tick();
        replay.tick();
        let scene = Scene::new(&replay);
        assert_eq!(
            kinds(&scene),
            vec!["route", "traveled", "vehicle", "destination"]
        );
        assert_eq!(line_len(&scene.features()[1]), 3);
        assert_eq!(
            scene.features()[1].property("color").unwrap().as_str(),
            Some("green")
        );

        match scene.features()[2].geometry.as_ref().unwrap().value {
            Value::Point(ref pt) => {
                let current = replay.current().unwrap();
                assert_eq!(pt, &vec![current.lng, current.lat]);
            }
            _ => panic!("vehicle should be a point"),
        }
    }
}
